use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, TryRecvError};

/// How a file dialog was closed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PickOutcome {
    Picked(PathBuf),
    Dismissed
}

impl From<Option<PathBuf>> for PickOutcome {
    fn from(answer: Option<PathBuf>) -> Self {
        match answer {
            Some(path) => PickOutcome::Picked(path),
            None => PickOutcome::Dismissed
        }
    }
}

/// Asks the user for an audio file without holding up the render loop.
pub trait FilePicker {
    /// Opens the dialog and returns at once. `false` when one is already open.
    fn begin_pick(&mut self) -> bool;

    /// The answer of a closed dialog. `None` while the dialog is still open or none was opened.
    fn poll_pick(&mut self) -> Option<PickOutcome>;
}

/// Runs a blocking dialog function on its own thread and hands the answer back over a channel.
pub struct ThreadedPicker {
    dialog: fn() -> Option<PathBuf>,
    pending: Option<Receiver<Option<PathBuf>>>
}

impl ThreadedPicker {
    pub fn new(dialog: fn() -> Option<PathBuf>) -> Self {
        Self { dialog, pending: None }
    }

    pub fn is_open(&self) -> bool {
        self.pending.is_some()
    }
}

impl FilePicker for ThreadedPicker {
    fn begin_pick(&mut self) -> bool {
        if self.pending.is_some() {
            return false;
        }
        let (sender, receiver) = channel();
        let dialog = self.dialog;
        let spawned = std::thread::Builder::new()
            .name("file-picker".to_string())
            .spawn(move || {
                // the receiver is gone only if the app shut down meanwhile
                let _ = sender.send(dialog());
            });
        match spawned {
            Ok(_) => {
                self.pending = Some(receiver);
                true
            }
            Err(error) => {
                log::warn!("failed to open the file picker: {}", error);
                false
            }
        }
    }

    fn poll_pick(&mut self) -> Option<PickOutcome> {
        let answer = match self.pending.as_ref()?.try_recv() {
            Ok(answer) => PickOutcome::from(answer),
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => {
                log::warn!("file picker thread ended without an answer");
                PickOutcome::Dismissed
            }
        };
        self.pending = None;
        Some(answer)
    }
}
