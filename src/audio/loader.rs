use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use crate::audio::{AudioError, LoadId, LoadOutcome, SoundHandle};

type Completion<S> = (LoadId, LoadOutcome<S>);

/// Runs each load on its own thread and reports back over a channel.
///
/// Only the most recent request can complete as `Loaded`; anything it
/// superseded completes as `Cancelled`, even if decoding succeeded.
pub struct ThreadedLoader<S = SoundHandle> {
    latest: Arc<AtomicU64>,
    sender: Sender<Completion<S>>,
    receiver: Receiver<Completion<S>>,
    decode: fn(&Path) -> Result<S, AudioError>
}

impl ThreadedLoader<SoundHandle> {
    pub fn new() -> Self {
        Self::with_decoder(SoundHandle::from_file)
    }
}

impl Default for ThreadedLoader<SoundHandle> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Send + 'static> ThreadedLoader<S> {
    pub fn with_decoder(decode: fn(&Path) -> Result<S, AudioError>) -> Self {
        let (sender, receiver) = channel();
        Self {
            latest: Arc::new(AtomicU64::new(0)),
            sender,
            receiver,
            decode
        }
    }

    pub fn begin(&mut self, id: LoadId, path: PathBuf) {
        self.latest.store(id.0, Ordering::Release);
        let latest = Arc::clone(&self.latest);
        let sender = self.sender.clone();
        let decode = self.decode;
        let spawned = std::thread::Builder::new()
            .name("audio-loader".to_string())
            .spawn(move || {
                let result = decode(&path);
                let outcome = if latest.load(Ordering::Acquire) != id.0 {
                    LoadOutcome::Cancelled
                } else {
                    match result {
                        Ok(sound) => LoadOutcome::Loaded(sound),
                        Err(error) => LoadOutcome::Failed(error)
                    }
                };
                // the receiving side only disappears on shutdown
                let _ = sender.send((id, outcome));
            });
        if let Err(error) = spawned {
            let _ = self.sender.send((id, LoadOutcome::Failed(AudioError::LoaderThread(error))));
        }
    }

    /// Drains every completion received so far without blocking.
    pub fn poll(&mut self) -> Vec<Completion<S>> {
        self.receiver.try_iter().collect()
    }
}
