use crate::config::SceneConfig;

pub const DEFAULT_HUE_SHIFT_SPEED: f32 = 0.03;
pub const DEFAULT_STAR_SPEED: f32 = 4.0;
pub const DEFAULT_STAR_COUNT: usize = 1500;

/// Scalars read by the per-frame tick.
///
/// Only the UI dispatcher writes these, one field per action,
/// so the setters are crate-private.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SceneParams {
    hue_shift_speed: f32,
    star_speed: f32,
    star_count: usize
}

impl Default for SceneParams {
    fn default() -> Self {
        Self {
            hue_shift_speed: DEFAULT_HUE_SHIFT_SPEED,
            star_speed: DEFAULT_STAR_SPEED,
            star_count: DEFAULT_STAR_COUNT
        }
    }
}

impl From<&SceneConfig> for SceneParams {
    fn from(config: &SceneConfig) -> Self {
        Self {
            hue_shift_speed: config.hue_shift_speed,
            star_speed: config.star_speed,
            star_count: config.star_count
        }
    }
}

impl SceneParams {
    pub fn hue_shift_speed(&self) -> f32 { self.hue_shift_speed }

    pub fn star_speed(&self) -> f32 { self.star_speed }

    pub fn star_count(&self) -> usize { self.star_count }

    pub(crate) fn set_hue_shift_speed(&mut self, value: f32) {
        self.hue_shift_speed = value;
    }

    pub(crate) fn set_star_speed(&mut self, value: f32) {
        self.star_speed = value;
    }

    pub(crate) fn set_star_count(&mut self, value: usize) {
        self.star_count = value;
    }
}
