use crate::audio::controller::{Indicator, Track};
use crate::rendering::blittable::Rgba;
use crate::ui::UiAction;

pub const INDICATOR_OFF: Rgba = [70, 70, 96, 255];
pub const INDICATOR_LOADING: Rgba = [232, 180, 64, 255];
pub const INDICATOR_ACTIVE: Rgba = [96, 220, 255, 255];
pub const INDICATOR_FAILED: Rgba = [232, 72, 72, 255];

pub fn indicator_color(indicator: Indicator) -> Rgba {
    match indicator {
        Indicator::Off => INDICATOR_OFF,
        Indicator::Loading => INDICATOR_LOADING,
        Indicator::Active => INDICATOR_ACTIVE,
        Indicator::Failed => INDICATOR_FAILED
    }
}

/// The custom slot shows the picked file's label instead of its fixed one.
pub fn button_label(track: Track, custom_label: &str) -> &str {
    match track {
        Track::Custom => custom_label,
        _ => track.label()
    }
}

/// The custom button always opens the picker, the others select their track.
pub fn button_action(track: Track) -> UiAction {
    match track {
        Track::Custom => UiAction::PickCustomFile,
        _ => UiAction::SelectTrack(track)
    }
}

/// Tracks bound to the number keys, `1` first.
pub fn track_for_number(number: usize) -> Option<Track> {
    number
        .checked_sub(1)
        .and_then(|idx| Track::BUNDLED.get(idx))
        .copied()
}
