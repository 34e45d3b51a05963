use crate::params::SceneParams;
use crate::ui::UiAction;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Slider {
    min: f32,
    max: f32,
    step: f32,
    value: f32
}

impl Slider {
    pub fn new(min: f32, max: f32, step: f32, value: f32) -> Self {
        let mut slider = Self { min, max, step, value: min };
        slider.set_value(value);
        slider
    }

    pub fn min(&self) -> f32 { self.min }

    pub fn max(&self) -> f32 { self.max }

    pub fn step(&self) -> f32 { self.step }

    pub fn value(&self) -> f32 { self.value }

    /// `(value - min) / (max - min)`, zero for a degenerate range.
    pub fn fill_fraction(&self) -> f32 {
        let range = self.max - self.min;
        if range <= 0.0 {
            return 0.0;
        }
        (self.value - self.min) / range
    }

    /// Snaps to the nearest step inside the range. Returns `true` if the value changed.
    pub fn set_value(&mut self, value: f32) -> bool {
        let clamped = value.clamp(self.min, self.max.max(self.min));
        let snapped = if self.step > 0.0 {
            let steps = ((clamped - self.min) / self.step).round();
            (self.min + steps * self.step).min(self.max)
        } else {
            clamped
        };
        let changed = snapped != self.value;
        self.value = snapped;
        changed
    }

    pub fn set_from_fraction(&mut self, fraction: f32) -> bool {
        let fraction = fraction.clamp(0.0, 1.0);
        self.set_value(self.min + fraction * (self.max - self.min))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SliderKind {
    Volume,
    HueShiftSpeed,
    StarCount,
    StarSpeed
}

impl SliderKind {
    pub const ALL: [SliderKind; 4] = [
        SliderKind::Volume,
        SliderKind::HueShiftSpeed,
        SliderKind::StarCount,
        SliderKind::StarSpeed
    ];

    pub fn label(self) -> &'static str {
        match self {
            SliderKind::Volume => "VOLUME",
            SliderKind::HueShiftSpeed => "HUE SHIFT",
            SliderKind::StarCount => "STARS",
            SliderKind::StarSpeed => "SPEED"
        }
    }

    /// `(min, max, step)`
    pub fn range(self) -> (f32, f32, f32) {
        match self {
            SliderKind::Volume => (0.0, 1.0, 0.01),
            SliderKind::HueShiftSpeed => (0.0, 0.3, 0.005),
            SliderKind::StarCount => (100.0, 5000.0, 100.0),
            SliderKind::StarSpeed => (0.5, 20.0, 0.5)
        }
    }

    pub fn make_slider(self, value: f32) -> Slider {
        let (min, max, step) = self.range();
        Slider::new(min, max, step, value)
    }

    /// `value` as this slider would hold it: clamped to the range and snapped to a step.
    pub fn snap(self, value: f32) -> f32 {
        self.make_slider(value).value()
    }

    pub fn initial_value(self, params: &SceneParams, volume: f32) -> f32 {
        match self {
            SliderKind::Volume => volume,
            SliderKind::HueShiftSpeed => params.hue_shift_speed(),
            SliderKind::StarCount => params.star_count() as f32,
            SliderKind::StarSpeed => params.star_speed()
        }
    }

    pub fn readout(self, value: f32) -> String {
        match self {
            SliderKind::Volume => volume_readout(value),
            SliderKind::HueShiftSpeed => hue_shift_readout(value),
            SliderKind::StarCount => star_count_readout(value),
            SliderKind::StarSpeed => star_speed_readout(value)
        }
    }

    pub fn action(self, value: f32) -> UiAction {
        match self {
            SliderKind::Volume => UiAction::SetVolume(value),
            SliderKind::HueShiftSpeed => UiAction::SetHueShiftSpeed(value),
            SliderKind::StarCount => UiAction::SetStarCount(value.round().max(0.0) as usize),
            SliderKind::StarSpeed => UiAction::SetStarSpeed(value)
        }
    }
}

pub fn volume_readout(volume: f32) -> String {
    format!("{}", (volume * 100.0).round() as i32)
}

/// Scaled so the default speed of 0.03 reads `1.0`.
pub fn hue_shift_readout(speed: f32) -> String {
    format!("{:.1}", speed * 100.0 / 3.0)
}

pub fn star_count_readout(count: f32) -> String {
    format!("{}", count.round() as i64)
}

pub fn star_speed_readout(speed: f32) -> String {
    format!("{:.1}", speed)
}
