use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use crate::audio::{AudioBackend, LoadId, LoadOutcome};

pub const CUSTOM_LABEL_MAX_CHARS: usize = 12;
pub const DEFAULT_CUSTOM_LABEL: &str = "CUSTOM \u{2191}";

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Track {
    Planetarium,
    Atmosphere,
    Lullaby,
    Custom
}

impl Track {
    pub const BUNDLED: [Track; 3] = [Track::Planetarium, Track::Atmosphere, Track::Lullaby];
    pub const ALL: [Track; 4] = [Track::Planetarium, Track::Atmosphere, Track::Lullaby, Track::Custom];

    pub fn file_name(self) -> Option<&'static str> {
        match self {
            Track::Planetarium => Some("planetarium.wav"),
            Track::Atmosphere => Some("atmosphere.wav"),
            Track::Lullaby => Some("lullaby.wav"),
            Track::Custom => None
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Track::Planetarium => "PLANETARIUM",
            Track::Atmosphere => "ATMOSPHERE",
            Track::Lullaby => "LULLABY",
            Track::Custom => DEFAULT_CUSTOM_LABEL
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum PlaybackState {
    Idle,
    Loading { track: Track, id: LoadId },
    Playing(Track),
    Failed { track: Track, reason: String }
}

/// What a track button shows.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Indicator {
    Off,
    Loading,
    Active,
    Failed
}

/// Button label for a user supplied file: last extension dropped, uppercased, at most 12 characters.
pub fn custom_label(file_name: &str) -> String {
    let stem = match file_name.rfind('.') {
        Some(idx) if idx + 1 < file_name.len() => &file_name[..idx],
        _ => file_name
    };
    stem.to_uppercase()
        .chars()
        .take(CUSTOM_LABEL_MAX_CHARS)
        .collect()
}

/// Looping music player with one active source.
///
/// Every selection stops what is playing and starts a new load. Only the
/// newest load may start playback; older completions are dropped.
pub struct AudioController<B: AudioBackend> {
    backend: B,
    tracks_dir: PathBuf,
    state: PlaybackState,
    volume: f32,
    last_load_id: u64,
    custom_file: Option<PathBuf>,
    custom_label: String
}

impl<B: AudioBackend> AudioController<B> {
    pub fn new(backend: B, tracks_dir: impl Into<PathBuf>, volume: f32) -> Self {
        Self {
            backend,
            tracks_dir: tracks_dir.into(),
            state: PlaybackState::Idle,
            volume: volume.clamp(0.0, 1.0),
            last_load_id: 0,
            custom_file: None,
            custom_label: DEFAULT_CUSTOM_LABEL.to_string()
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn custom_label(&self) -> &str {
        &self.custom_label
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn is_playing(&self) -> bool {
        self.backend.is_playing()
    }

    /// The track audibly playing right now, if any.
    pub fn current_track(&self) -> Option<Track> {
        match self.state {
            PlaybackState::Playing(track) => Some(track),
            _ => None
        }
    }

    pub fn indicator(&self, track: Track) -> Indicator {
        match &self.state {
            PlaybackState::Loading { track: loading, .. } if *loading == track => Indicator::Loading,
            PlaybackState::Playing(playing) if *playing == track => Indicator::Active,
            PlaybackState::Failed { track: failed, .. } if *failed == track => Indicator::Failed,
            _ => Indicator::Off
        }
    }

    /// Returns `false` when nothing changed: the track is already playing,
    /// or it is the custom slot and no file was ever picked.
    pub fn select(&mut self, track: Track) -> bool {
        if self.state == PlaybackState::Playing(track) && self.backend.is_playing() {
            return false;
        }
        let path = match track.file_name() {
            Some(file_name) => self.tracks_dir.join(file_name),
            None => match &self.custom_file {
                Some(path) => path.clone(),
                None => return false
            }
        };
        self.start_load(track, &path);
        true
    }

    /// Result of the file picker. A cancelled picker (`None`) changes nothing.
    pub fn select_custom(&mut self, file: Option<PathBuf>) -> bool {
        let path = match file {
            Some(path) => path,
            None => return false
        };
        let file_name = path
            .file_name()
            .map(|it| it.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.custom_label = custom_label(&file_name);
        self.start_load(Track::Custom, &path);
        self.custom_file = Some(path);
        true
    }

    /// Reloads a track whose load failed. No-op in any other state.
    pub fn retry(&mut self) -> bool {
        match &self.state {
            PlaybackState::Failed { track, .. } => {
                let track = *track;
                self.select(track)
            }
            _ => false
        }
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        if self.backend.is_playing() {
            self.backend.set_volume(self.volume);
        }
    }

    /// Applies finished loads. Call once per frame.
    pub fn poll(&mut self) {
        for (id, outcome) in self.backend.poll_loads() {
            let track = match self.state {
                PlaybackState::Loading { track, id: pending } if pending == id => track,
                _ => {
                    log::debug!("dropping outcome of superseded load {:?}", id);
                    continue;
                }
            };
            self.state = match outcome {
                LoadOutcome::Loaded(sound) => match self.backend.play_looped(sound, self.volume) {
                    Ok(()) => {
                        log::info!("now playing {:?}", track);
                        PlaybackState::Playing(track)
                    }
                    Err(error) => {
                        log::warn!("failed to start {:?}: {}", track, error);
                        PlaybackState::Failed { track, reason: error.to_string() }
                    }
                },
                LoadOutcome::Failed(error) => {
                    log::warn!("failed to load {:?}: {}", track, error);
                    PlaybackState::Failed { track, reason: error.to_string() }
                }
                LoadOutcome::Cancelled => PlaybackState::Idle
            };
        }
    }

    fn start_load(&mut self, track: Track, path: &Path) {
        if self.backend.is_playing() {
            self.backend.stop();
        }
        self.last_load_id += 1;
        let id = LoadId(self.last_load_id);
        log::info!("loading {:?} from {}", track, path.display());
        self.state = PlaybackState::Loading { track, id };
        self.backend.begin_load(id, path);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::audio::AudioError;

    /// Records calls; loads complete only when the test says so.
    #[derive(Default)]
    pub(crate) struct ScriptedBackend {
        pub requests: Vec<(LoadId, PathBuf)>,
        pub completions: Vec<(LoadId, LoadOutcome<PathBuf>)>,
        pub playing: Option<PathBuf>,
        pub volume: Option<f32>,
        pub stops: usize,
        pub no_output: bool
    }

    impl ScriptedBackend {
        pub fn complete_latest(&mut self) {
            let (id, path) = self.requests.last().cloned().expect("a pending request");
            self.completions.push((id, LoadOutcome::Loaded(path)));
        }

        pub fn fail_latest(&mut self) {
            let (id, path) = self.requests.last().cloned().expect("a pending request");
            self.completions.push((id, LoadOutcome::Failed(AudioError::Empty { path })));
        }
    }

    impl AudioBackend for ScriptedBackend {
        type Sound = PathBuf;

        fn begin_load(&mut self, id: LoadId, path: &Path) {
            self.requests.push((id, path.to_path_buf()));
        }

        fn poll_loads(&mut self) -> Vec<(LoadId, LoadOutcome<PathBuf>)> {
            std::mem::take(&mut self.completions)
        }

        fn play_looped(&mut self, sound: PathBuf, volume: f32) -> Result<(), AudioError> {
            if self.no_output {
                return Err(AudioError::OutputUnavailable);
            }
            self.playing = Some(sound);
            self.volume = Some(volume);
            Ok(())
        }

        fn stop(&mut self) {
            self.stops += 1;
            self.playing = None;
        }

        fn set_volume(&mut self, volume: f32) {
            self.volume = Some(volume);
        }

        fn is_playing(&self) -> bool {
            self.playing.is_some()
        }
    }

    fn controller() -> AudioController<ScriptedBackend> {
        AudioController::new(ScriptedBackend::default(), "tracks", 0.5)
    }

    fn active_count(controller: &AudioController<ScriptedBackend>) -> usize {
        Track::ALL
            .iter()
            .filter(|&&it| controller.indicator(it) == Indicator::Active)
            .count()
    }

    #[test]
    fn custom_labels_are_stripped_uppercased_and_truncated() {
        assert_eq!(custom_label("song.mp3"), "SONG");
        assert_eq!(custom_label("my.favourite.track.ogg"), "MY.FAVOURITE");
        assert_eq!(custom_label("a very long file name.wav"), "A VERY LONG ");
        assert_eq!(custom_label("noextension"), "NOEXTENSION");
        assert_eq!(custom_label("trailingdot."), "TRAILINGDOT.");
        assert_eq!(custom_label(".hidden"), "");
    }

    #[test]
    fn selection_loads_then_plays() {
        let mut controller = controller();
        assert!(controller.select(Track::Planetarium));
        assert_eq!(controller.indicator(Track::Planetarium), Indicator::Loading);
        assert_eq!(controller.backend().requests[0].1, Path::new("tracks/planetarium.wav"));

        controller.backend_mut().complete_latest();
        controller.poll();
        assert_eq!(controller.state(), &PlaybackState::Playing(Track::Planetarium));
        assert_eq!(controller.indicator(Track::Planetarium), Indicator::Active);
        assert_eq!(controller.backend().volume, Some(0.5));
    }

    #[test]
    fn reselecting_the_playing_track_is_a_no_op() {
        let mut controller = controller();
        controller.select(Track::Lullaby);
        controller.backend_mut().complete_latest();
        controller.poll();

        assert!(!controller.select(Track::Lullaby));
        assert_eq!(controller.backend().requests.len(), 1);
        assert_eq!(controller.backend().stops, 0);
        assert_eq!(controller.state(), &PlaybackState::Playing(Track::Lullaby));
    }

    #[test]
    fn switching_tracks_stops_the_old_one_first() {
        let mut controller = controller();
        controller.select(Track::Planetarium);
        controller.backend_mut().complete_latest();
        controller.poll();

        assert!(controller.select(Track::Atmosphere));
        assert_eq!(controller.backend().stops, 1);
        assert!(!controller.is_playing());
        assert_eq!(controller.indicator(Track::Planetarium), Indicator::Off);
        assert_eq!(controller.indicator(Track::Atmosphere), Indicator::Loading);

        controller.backend_mut().complete_latest();
        controller.poll();
        assert_eq!(controller.indicator(Track::Atmosphere), Indicator::Active);
        assert_eq!(controller.indicator(Track::Planetarium), Indicator::Off);
        assert_eq!(active_count(&controller), 1);
    }

    #[test]
    fn stale_completion_does_not_win() {
        let mut controller = controller();
        controller.select(Track::Planetarium);
        let (first_id, first_path) = controller.backend().requests[0].clone();
        controller.select(Track::Lullaby);

        controller.backend_mut().completions.push((first_id, LoadOutcome::Loaded(first_path)));
        controller.poll();
        assert_eq!(controller.indicator(Track::Lullaby), Indicator::Loading);
        assert!(!controller.is_playing());

        controller.backend_mut().complete_latest();
        controller.poll();
        assert_eq!(controller.current_track(), Some(Track::Lullaby));
    }

    #[test]
    fn failed_load_is_visible_and_retryable() {
        let mut controller = controller();
        controller.select(Track::Atmosphere);
        controller.backend_mut().fail_latest();
        controller.poll();
        assert_eq!(controller.indicator(Track::Atmosphere), Indicator::Failed);
        assert!(matches!(controller.state(), PlaybackState::Failed { track: Track::Atmosphere, .. }));

        assert!(controller.retry());
        assert_eq!(controller.indicator(Track::Atmosphere), Indicator::Loading);
        assert_eq!(controller.backend().requests.len(), 2);
    }

    #[test]
    fn retry_outside_failure_does_nothing() {
        let mut controller = controller();
        assert!(!controller.retry());
        controller.select(Track::Planetarium);
        assert!(!controller.retry());
        assert_eq!(controller.backend().requests.len(), 1);
    }

    #[test]
    fn cancelled_picker_changes_nothing() {
        let mut controller = controller();
        controller.select(Track::Planetarium);
        controller.backend_mut().complete_latest();
        controller.poll();

        assert!(!controller.select_custom(None));
        assert_eq!(controller.custom_label(), DEFAULT_CUSTOM_LABEL);
        assert_eq!(controller.state(), &PlaybackState::Playing(Track::Planetarium));
        assert_eq!(controller.backend().requests.len(), 1);
    }

    #[test]
    fn custom_file_is_labelled_and_played() {
        let mut controller = controller();
        assert!(controller.select_custom(Some(PathBuf::from("/music/Night Drive Mix.flac"))));
        assert_eq!(controller.custom_label(), "NIGHT DRIVE ");
        assert_eq!(controller.indicator(Track::Custom), Indicator::Loading);

        controller.backend_mut().complete_latest();
        controller.poll();
        assert_eq!(controller.current_track(), Some(Track::Custom));
        assert_eq!(
            controller.backend().playing.as_deref(),
            Some(Path::new("/music/Night Drive Mix.flac"))
        );
    }

    #[test]
    fn custom_slot_without_a_file_cannot_be_selected() {
        let mut controller = controller();
        assert!(!controller.select(Track::Custom));
        assert_eq!(controller.state(), &PlaybackState::Idle);
    }

    #[test]
    fn volume_is_clamped_and_applied_while_playing() {
        let mut controller = controller();
        controller.set_volume(3.0);
        assert_eq!(controller.volume(), 1.0);
        assert_eq!(controller.backend().volume, None);

        controller.select(Track::Planetarium);
        controller.backend_mut().complete_latest();
        controller.poll();
        assert_eq!(controller.backend().volume, Some(1.0));

        controller.set_volume(0.0);
        assert_eq!(controller.backend().volume, Some(0.0));
    }

    #[test]
    fn only_one_button_is_ever_active() {
        let mut controller = controller();
        let clicks = [
            Track::Planetarium, Track::Atmosphere, Track::Atmosphere,
            Track::Lullaby, Track::Planetarium, Track::Planetarium
        ];
        for track in clicks {
            controller.select(track);
            assert!(active_count(&controller) <= 1);
            if !controller.backend().requests.is_empty() {
                controller.backend_mut().complete_latest();
            }
            controller.poll();
            assert_eq!(active_count(&controller), 1);
            assert_eq!(controller.indicator(track), Indicator::Active);
        }
    }

    #[test]
    fn missing_output_marks_the_track_failed() {
        let backend = ScriptedBackend { no_output: true, ..ScriptedBackend::default() };
        let mut controller = AudioController::new(backend, "tracks", 0.5);
        controller.select(Track::Lullaby);
        controller.backend_mut().complete_latest();
        controller.poll();
        assert_eq!(controller.indicator(Track::Lullaby), Indicator::Failed);
        assert_eq!(active_count(&controller), 0);
    }
}
