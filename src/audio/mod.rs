pub mod controller;
pub mod loader;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use rodio::{Sink, Source, PlayError, StreamError, decoder::DecoderError};
use thiserror::Error;
use loader::ThreadedLoader;

type FileDecoder = rodio::Decoder<BufReader<File>>;

#[derive(Error, Debug)]
pub enum AudioError {
    #[error("failed to open {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error
    },
    #[error("failed to decode {path}")]
    Decode {
        path: PathBuf,
        #[source]
        source: DecoderError
    },
    #[error("{path} contains no samples")]
    Empty { path: PathBuf },
    #[error("no audio output available")]
    NoOutput(#[from] StreamError),
    #[error("audio output was not initialised")]
    OutputUnavailable,
    #[error("failed to create a playback sink")]
    Sink(#[from] PlayError),
    #[error("failed to start the loader thread")]
    LoaderThread(#[source] std::io::Error)
}

/// Identifies one load request. Later requests always get larger ids.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadId(pub u64);

#[derive(Debug)]
pub enum LoadOutcome<S> {
    Loaded(S),
    Failed(AudioError),
    /// A newer request superseded this one before it finished.
    Cancelled
}

/// A fully decoded sound, cheap to clone.
#[derive(Clone)]
pub struct SoundHandle(rodio::source::Buffered<FileDecoder>);

impl SoundHandle {
    /// Opens and decodes the whole file up front, so playback never stalls on disk.
    pub fn from_file(path: &Path) -> Result<Self, AudioError> {
        let file = File::open(path)
            .map_err(|source| AudioError::Open { path: path.to_path_buf(), source })?;
        let decoder = rodio::Decoder::new(BufReader::new(file))
            .map_err(|source| AudioError::Decode { path: path.to_path_buf(), source })?;
        let buffered = decoder.buffered();
        // buffered clones share decoded frames, so draining one fills them for all
        let sample_count = buffered.clone().count();
        if sample_count == 0 {
            return Err(AudioError::Empty { path: path.to_path_buf() });
        }
        log::debug!("decoded {} samples from {}", sample_count, path.display());
        Ok(Self(buffered))
    }
}

/// Owns the output stream and the single music sink. Starting a new loop drops the old sink.
pub struct SoundDriver {
    _stream: rodio::OutputStream,
    stream_handle: rodio::OutputStreamHandle,
    music_sink: Option<Sink>
}

impl SoundDriver {
    pub fn try_create() -> Result<Self, AudioError> {
        let (_stream, stream_handle) = rodio::OutputStream::try_default()?;
        Ok(Self {
            _stream,
            stream_handle,
            music_sink: None
        })
    }

    pub fn play_looped(&mut self, sound: SoundHandle, volume: f32) -> Result<(), AudioError> {
        self.stop();
        let sink = Sink::try_new(&self.stream_handle)?;
        sink.set_volume(volume);
        sink.append(sound.0.repeat_infinite());
        self.music_sink = Some(sink);
        Ok(())
    }

    pub fn set_volume(&self, volume: f32) {
        if let Some(sink) = &self.music_sink {
            sink.set_volume(volume);
        }
    }

    pub fn stop(&mut self) {
        if let Some(sink) = self.music_sink.take() {
            sink.stop();
        }
    }

    pub fn playback_in_progress(&self) -> bool {
        match &self.music_sink {
            Some(sink) => !sink.empty() && !sink.is_paused(),
            None => false
        }
    }
}

/// Everything the controller needs from an audio implementation.
pub trait AudioBackend {
    type Sound;

    /// Starts loading `path`; the outcome shows up in a later [`AudioBackend::poll_loads`].
    fn begin_load(&mut self, id: LoadId, path: &Path);
    fn poll_loads(&mut self) -> Vec<(LoadId, LoadOutcome<Self::Sound>)>;
    fn play_looped(&mut self, sound: Self::Sound, volume: f32) -> Result<(), AudioError>;
    fn stop(&mut self);
    fn set_volume(&mut self, volume: f32);
    fn is_playing(&self) -> bool;
}

/// rodio playback with loading on worker threads.
/// Without an output device loads still run, but starting playback fails with
/// [`AudioError::OutputUnavailable`].
pub struct RodioBackend {
    driver: Option<SoundDriver>,
    loader: ThreadedLoader
}

impl RodioBackend {
    pub fn new() -> Self {
        let driver = match SoundDriver::try_create() {
            Ok(driver) => Some(driver),
            Err(error) => {
                log::warn!("Failed to init audio: {}", error);
                None
            }
        };
        Self { driver, loader: ThreadedLoader::new() }
    }
}

impl Default for RodioBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioBackend for RodioBackend {
    type Sound = SoundHandle;

    fn begin_load(&mut self, id: LoadId, path: &Path) {
        self.loader.begin(id, path.to_path_buf());
    }

    fn poll_loads(&mut self) -> Vec<(LoadId, LoadOutcome<SoundHandle>)> {
        self.loader.poll()
    }

    fn play_looped(&mut self, sound: SoundHandle, volume: f32) -> Result<(), AudioError> {
        match &mut self.driver {
            Some(driver) => driver.play_looped(sound, volume),
            None => Err(AudioError::OutputUnavailable)
        }
    }

    fn stop(&mut self) {
        if let Some(driver) = &mut self.driver {
            driver.stop();
        }
    }

    fn set_volume(&mut self, volume: f32) {
        if let Some(driver) = &self.driver {
            driver.set_volume(volume);
        }
    }

    fn is_playing(&self) -> bool {
        self.driver
            .as_ref()
            .map(|it| it.playback_in_progress())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_wav(path: &Path, samples: &[i16]) {
        let data_len = (samples.len() * 2) as u32;
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
        bytes.extend_from_slice(b"WAVEfmt ");
        bytes.extend_from_slice(&16u32.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&8000u32.to_le_bytes());
        bytes.extend_from_slice(&16000u32.to_le_bytes());
        bytes.extend_from_slice(&2u16.to_le_bytes());
        bytes.extend_from_slice(&16u16.to_le_bytes());
        bytes.extend_from_slice(b"data");
        bytes.extend_from_slice(&data_len.to_le_bytes());
        for sample in samples {
            bytes.extend_from_slice(&sample.to_le_bytes());
        }
        let mut file = File::create(path).unwrap();
        file.write_all(&bytes).unwrap();
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = SoundHandle::from_file(&dir.path().join("nowhere.wav"));
        assert!(matches!(result, Err(AudioError::Open { .. })));
    }

    #[test]
    fn garbage_file_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("noise.wav");
        std::fs::write(&path, b"definitely not a riff header, just some text").unwrap();
        let result = SoundHandle::from_file(&path);
        assert!(matches!(result, Err(AudioError::Decode { .. })));
    }

    #[test]
    fn wav_without_samples_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("silence.wav");
        write_wav(&path, &[]);
        let result = SoundHandle::from_file(&path);
        assert!(matches!(result, Err(AudioError::Empty { .. })));
    }

    #[test]
    fn playback_without_output_reports_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        write_wav(&path, &[0, 8000, 16000, 8000, 0, -8000, -16000, -8000]);
        let sound = SoundHandle::from_file(&path).unwrap();

        let mut backend = RodioBackend { driver: None, loader: ThreadedLoader::new() };
        let result = backend.play_looped(sound, 0.5);
        assert!(matches!(result, Err(AudioError::OutputUnavailable)));
        assert!(!backend.is_playing());
    }
}
