//! Read-only configuration loaded from a TOML file.
//!
//! Every field has a default, so an empty or partial file is valid.
//! Nothing is ever written back.

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::audio::controller::Track;
use crate::params::{DEFAULT_HUE_SHIFT_SPEED, DEFAULT_STAR_COUNT, DEFAULT_STAR_SPEED};
use crate::scene::gradient::BASE_HUE;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error
    },
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scene: SceneConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub assets: AssetConfig
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    #[serde(default = "default_star_count")]
    pub star_count: usize,
    #[serde(default = "default_star_speed")]
    pub star_speed: f32,
    #[serde(default = "default_hue_shift_speed")]
    pub hue_shift_speed: f32,
    #[serde(default = "default_base_hue")]
    pub base_hue: f32,
    #[serde(default)]
    pub seed: Option<u64>
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioConfig {
    #[serde(default = "default_volume")]
    pub volume: f32,
    #[serde(default = "default_tracks_dir")]
    pub tracks_dir: PathBuf,
    #[serde(default = "default_initial_track")]
    pub initial_track: Track
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    /// Window pixels per frame buffer pixel.
    #[serde(default = "default_render_scale")]
    pub render_scale: u32
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetConfig {
    #[serde(default = "default_sprite_sheet")]
    pub sprite_sheet: PathBuf
}

fn default_star_count() -> usize { DEFAULT_STAR_COUNT }
fn default_star_speed() -> f32 { DEFAULT_STAR_SPEED }
fn default_hue_shift_speed() -> f32 { DEFAULT_HUE_SHIFT_SPEED }
fn default_base_hue() -> f32 { BASE_HUE }
fn default_volume() -> f32 { 0.5 }
fn default_tracks_dir() -> PathBuf { PathBuf::from("assets/audio") }
fn default_initial_track() -> Track { Track::Planetarium }
fn default_title() -> String { "star tunnel".to_string() }
fn default_width() -> u32 { 1280 }
fn default_height() -> u32 { 720 }
fn default_render_scale() -> u32 { 2 }
fn default_sprite_sheet() -> PathBuf { PathBuf::from("assets/spaceObjects.png") }

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            star_count: default_star_count(),
            star_speed: default_star_speed(),
            hue_shift_speed: default_hue_shift_speed(),
            base_hue: default_base_hue(),
            seed: None
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            volume: default_volume(),
            tracks_dir: default_tracks_dir(),
            initial_track: default_initial_track()
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            width: default_width(),
            height: default_height(),
            render_scale: default_render_scale()
        }
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self { sprite_sheet: default_sprite_sheet() }
    }
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&content)
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            log::info!("no config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_document_yields_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.scene.star_count, 1500);
        assert!((config.audio.volume - 0.5).abs() < f32::EPSILON);
        assert_eq!(config.audio.initial_track, Track::Planetarium);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = Config::from_toml_str(r#"
            [scene]
            star_count = 3000
            seed = 7

            [audio]
            initial_track = "lullaby"
        "#).unwrap();
        assert_eq!(config.scene.star_count, 3000);
        assert_eq!(config.scene.seed, Some(7));
        assert!((config.scene.star_speed - 4.0).abs() < f32::EPSILON);
        assert_eq!(config.audio.initial_track, Track::Lullaby);
        assert_eq!(config.window, WindowConfig::default());
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        let result = Config::from_toml_str("[scene]\nstar_count = \"many\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[window]\nrender_scale = 3").unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.window.render_scale, 3);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(matches!(Config::load(&path), Err(ConfigError::Read { .. })));
        assert_eq!(Config::load_or_default(&path).unwrap(), Config::default());
    }
}
