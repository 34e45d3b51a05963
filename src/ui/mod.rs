pub mod font;
pub mod panel;
pub mod slider;
pub mod sound_buttons;

use crate::audio::controller::{Indicator, Track};
use crate::params::SceneParams;
use crate::rendering::blittable::{Rect, Rgba};
use crate::rendering::shapes::{blend_rectangle, fill_rectangle, stroke_rectangle};
use crate::rendering::FrameBuffer;
use crate::window::KeyCode;
use font::BitmapFont;
use panel::{PanelId, PanelVisibility};
use slider::{Slider, SliderKind};

/// Everything the control surface can ask for. Each variant drives exactly one
/// parameter or one side effect.
#[derive(Clone, Debug, PartialEq)]
pub enum UiAction {
    SetVolume(f32),
    SetHueShiftSpeed(f32),
    SetStarCount(usize),
    SetStarSpeed(f32),
    SelectTrack(Track),
    PickCustomFile,
    RetryTrack,
    TogglePanels
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Widget {
    Toggle,
    TrackButton(Track),
    Slider(SliderKind)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HoverState {
    None,
    Hovered(Widget),
    Clicked(Widget)
}

const MARGIN: i32 = 8;
const PADDING: i32 = 6;
const PANEL_WIDTH: i32 = 112;
const TITLE_HEIGHT: i32 = 8;
const BUTTON_HEIGHT: i32 = 11;
const ROW_GAP: i32 = 3;
const SLIDER_ROW_HEIGHT: i32 = 16;
const SLIDER_BAR_OFFSET: i32 = 8;
const SLIDER_BAR_HEIGHT: i32 = 4;
const TOGGLE_SIZE: i32 = 11;

const PANEL_BACKGROUND: Rgba = [4, 4, 16, 255];
const PANEL_OPACITY: f32 = 0.6;
const PANEL_BORDER: Rgba = [72, 72, 120, 255];
const TEXT_COLOR: Rgba = [210, 210, 235, 255];
const DIM_TEXT_COLOR: Rgba = [130, 130, 170, 255];
const BAR_BACKGROUND: Rgba = [40, 40, 64, 255];
const BAR_FILL: Rgba = [140, 120, 255, 255];
const HOVER_COLOR: Rgba = [255, 255, 255, 255];

const SOUND_SLIDERS: [SliderKind; 1] = [SliderKind::Volume];
const VISUAL_SLIDERS: [SliderKind; 3] = [
    SliderKind::HueShiftSpeed,
    SliderKind::StarCount,
    SliderKind::StarSpeed
];

struct Layout {
    toggle: Rect,
    panels: [(PanelId, Rect); 2],
    track_buttons: [(Track, Rect); 4],
    sliders: [(SliderKind, Rect); 4]
}

/// Turns a signed rectangle into a clipped one, so tiny frames degrade to empty widgets.
fn make_rect(x: i32, y: i32, w: i32, h: i32) -> Rect {
    let left = x.max(0) as usize;
    let top = y.max(0) as usize;
    let right = (x + w).max(0) as usize;
    let bottom = (y + h).max(0) as usize;
    Rect {
        x_range: left..right.max(left),
        y_range: top..bottom.max(top)
    }
}

fn sound_panel_height() -> i32 {
    PADDING * 2 + TITLE_HEIGHT + (BUTTON_HEIGHT + ROW_GAP) * Track::ALL.len() as i32 + SLIDER_ROW_HEIGHT
}

fn visual_panel_height() -> i32 {
    PADDING * 2 + TITLE_HEIGHT + SLIDER_ROW_HEIGHT * VISUAL_SLIDERS.len() as i32
}

impl Layout {
    fn compute(width: usize, height: usize) -> Self {
        let (width, height) = (width as i32, height as i32);

        let toggle = make_rect(width - MARGIN - TOGGLE_SIZE, MARGIN, TOGGLE_SIZE, TOGGLE_SIZE);

        let sound_height = sound_panel_height();
        let sound_x = MARGIN;
        let sound_y = height - MARGIN - sound_height;
        let visual_height = visual_panel_height();
        let visual_x = width - MARGIN - PANEL_WIDTH;
        let visual_y = height - MARGIN - visual_height;

        let inner_width = PANEL_WIDTH - PADDING * 2;
        let mut row_y = sound_y + PADDING + TITLE_HEIGHT;
        let track_buttons = Track::ALL.map(|track| {
            let rect = make_rect(sound_x + PADDING, row_y, inner_width, BUTTON_HEIGHT);
            row_y += BUTTON_HEIGHT + ROW_GAP;
            (track, rect)
        });
        let volume_row = make_rect(sound_x + PADDING, row_y, inner_width, SLIDER_ROW_HEIGHT);

        let mut row_y = visual_y + PADDING + TITLE_HEIGHT;
        let [hue_row, stars_row, speed_row] = VISUAL_SLIDERS.map(|kind| {
            let rect = make_rect(visual_x + PADDING, row_y, inner_width, SLIDER_ROW_HEIGHT);
            row_y += SLIDER_ROW_HEIGHT;
            (kind, rect)
        });

        Self {
            toggle,
            panels: [
                (PanelId::Sound, make_rect(sound_x, sound_y, PANEL_WIDTH, sound_height)),
                (PanelId::Visual, make_rect(visual_x, visual_y, PANEL_WIDTH, visual_height))
            ],
            track_buttons,
            sliders: [(SOUND_SLIDERS[0], volume_row), hue_row, stars_row, speed_row]
        }
    }
}

fn slider_panel(kind: SliderKind) -> PanelId {
    if SOUND_SLIDERS.contains(&kind) {
        PanelId::Sound
    } else {
        PanelId::Visual
    }
}

fn contains(rect: &Rect, x: f32, y: f32) -> bool {
    x >= 0.0 && y >= 0.0 && rect.contains(x as usize, y as usize)
}

/// Horizontal position inside a slider row mapped to `0..=1`, first to last pixel.
fn bar_fraction(row: &Rect, x: f32) -> f32 {
    let span = (row.get_width().max(2) - 1) as f32;
    ((x - row.x_range.start as f32) / span).clamp(0.0, 1.0)
}

/// The on-screen control surface: two panels of sliders and sound buttons plus a visibility toggle.
///
/// Pointer handling follows press/release semantics: buttons fire on release over the
/// widget that was pressed, sliders emit on press and while dragged.
pub struct ControlPanel {
    font: BitmapFont,
    sliders: [Slider; 4],
    visibility: PanelVisibility,
    layout: Layout,
    hover: HoverState,
    dragging: Option<SliderKind>
}

impl ControlPanel {
    pub fn new(params: &SceneParams, volume: f32, width: usize, height: usize) -> Self {
        Self {
            font: BitmapFont::new(1),
            sliders: SliderKind::ALL.map(|kind| kind.make_slider(kind.initial_value(params, volume))),
            visibility: PanelVisibility::default(),
            layout: Layout::compute(width, height),
            hover: HoverState::None,
            dragging: None
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.layout = Layout::compute(width, height);
        self.hover = HoverState::None;
        self.dragging = None;
    }

    pub fn slider(&self, kind: SliderKind) -> &Slider {
        &self.sliders[Self::slider_index(kind)]
    }

    pub fn visibility(&self) -> &PanelVisibility {
        &self.visibility
    }

    pub fn hover(&self) -> HoverState {
        self.hover
    }

    pub fn toggle_panels(&mut self) -> bool {
        self.dragging = None;
        self.visibility.toggle()
    }

    pub fn widget_rect(&self, widget: Widget) -> &Rect {
        match widget {
            Widget::Toggle => &self.layout.toggle,
            Widget::TrackButton(track) => self.layout.track_buttons
                .iter()
                .find(|(it, _)| *it == track)
                .map(|(_, rect)| rect)
                .unwrap_or(&self.layout.toggle),
            Widget::Slider(kind) => &self.layout.sliders[Self::slider_index(kind)].1
        }
    }

    /// Topmost interactive widget under the pointer. Widgets of hidden panels are ignored.
    pub fn widget_at(&self, x: f32, y: f32) -> Option<Widget> {
        if contains(&self.layout.toggle, x, y) {
            return Some(Widget::Toggle);
        }
        if !self.visibility.is_hidden(PanelId::Sound) {
            for (track, rect) in self.layout.track_buttons.iter() {
                if contains(rect, x, y) {
                    return Some(Widget::TrackButton(*track));
                }
            }
        }
        self.layout.sliders
            .iter()
            .filter(|(kind, _)| !self.visibility.is_hidden(slider_panel(*kind)))
            .find(|(_, rect)| contains(rect, x, y))
            .map(|(kind, _)| Widget::Slider(*kind))
    }

    pub fn on_mouse_move(&mut self, x: f32, y: f32) -> Option<UiAction> {
        if let Some(kind) = self.dragging {
            return self.drag_slider(kind, x);
        }
        self.hover = match (self.hover, self.widget_at(x, y)) {
            (HoverState::Clicked(pressed), _) => HoverState::Clicked(pressed),
            (_, Some(widget)) => HoverState::Hovered(widget),
            (_, None) => HoverState::None
        };
        None
    }

    pub fn on_mouse_down(&mut self, x: f32, y: f32) -> Option<UiAction> {
        match self.widget_at(x, y) {
            Some(Widget::Slider(kind)) => {
                self.dragging = Some(kind);
                self.hover = HoverState::Hovered(Widget::Slider(kind));
                self.drag_slider(kind, x)
            }
            Some(widget) => {
                self.hover = HoverState::Clicked(widget);
                None
            }
            None => {
                self.hover = HoverState::None;
                None
            }
        }
    }

    pub fn on_mouse_up(&mut self, x: f32, y: f32) -> Option<UiAction> {
        self.dragging = None;
        let released_over = self.widget_at(x, y);
        let action = match self.hover {
            HoverState::Clicked(pressed) if released_over == Some(pressed) => match pressed {
                Widget::Toggle => Some(UiAction::TogglePanels),
                Widget::TrackButton(track) => Some(sound_buttons::button_action(track)),
                Widget::Slider(_) => None
            },
            _ => None
        };
        self.hover = released_over.map_or(HoverState::None, HoverState::Hovered);
        action
    }

    pub fn on_key_down(&mut self, key_code: KeyCode) -> Option<UiAction> {
        match key_code {
            KeyCode::H => Some(UiAction::TogglePanels),
            KeyCode::C => Some(UiAction::PickCustomFile),
            KeyCode::R => Some(UiAction::RetryTrack),
            KeyCode::Key1 | KeyCode::Kp1 => sound_buttons::track_for_number(1).map(UiAction::SelectTrack),
            KeyCode::Key2 | KeyCode::Kp2 => sound_buttons::track_for_number(2).map(UiAction::SelectTrack),
            KeyCode::Key3 | KeyCode::Kp3 => sound_buttons::track_for_number(3).map(UiAction::SelectTrack),
            _ => None
        }
    }

    pub fn draw(&self, frame: &mut FrameBuffer, indicator: impl Fn(Track) -> Indicator, custom_label: &str) {
        for (panel, rect) in self.layout.panels.iter() {
            if self.visibility.is_hidden(*panel) {
                continue;
            }
            self.draw_panel_frame(frame, *panel, rect);
        }

        if !self.visibility.is_hidden(PanelId::Sound) {
            for (track, rect) in self.layout.track_buttons.iter() {
                self.draw_track_button(frame, *track, rect, indicator(*track), custom_label);
            }
        }

        for (kind, rect) in self.layout.sliders.iter() {
            if self.visibility.is_hidden(slider_panel(*kind)) {
                continue;
            }
            self.draw_slider(frame, *kind, rect);
        }

        self.draw_toggle(frame);
    }

    fn drag_slider(&mut self, kind: SliderKind, x: f32) -> Option<UiAction> {
        let fraction = bar_fraction(&self.layout.sliders[Self::slider_index(kind)].1, x);
        let slider = &mut self.sliders[Self::slider_index(kind)];
        if slider.set_from_fraction(fraction) {
            Some(kind.action(slider.value()))
        } else {
            None
        }
    }

    fn slider_index(kind: SliderKind) -> usize {
        match kind {
            SliderKind::Volume => 0,
            SliderKind::HueShiftSpeed => 1,
            SliderKind::StarCount => 2,
            SliderKind::StarSpeed => 3
        }
    }

    fn is_hovered(&self, widget: Widget) -> bool {
        matches!(self.hover, HoverState::Hovered(it) | HoverState::Clicked(it) if it == widget)
    }

    fn draw_panel_frame(&self, frame: &mut FrameBuffer, panel: PanelId, rect: &Rect) {
        let (x, y) = (rect.x_range.start as i32, rect.y_range.start as i32);
        let (w, h) = (rect.get_width() as u32, rect.get_height() as u32);
        blend_rectangle(frame, x, y, w, h, PANEL_BACKGROUND, PANEL_OPACITY);
        stroke_rectangle(frame, x, y, w, h, PANEL_BORDER);
        self.font.draw_text(frame, x + PADDING, y + PADDING, panel.title(), DIM_TEXT_COLOR);
    }

    fn draw_track_button(
        &self,
        frame: &mut FrameBuffer,
        track: Track,
        rect: &Rect,
        indicator: Indicator,
        custom_label: &str
    ) {
        let (x, y) = (rect.x_range.start as i32, rect.y_range.start as i32);
        let (w, h) = (rect.get_width() as u32, rect.get_height() as u32);
        let color = sound_buttons::indicator_color(indicator);

        if indicator == Indicator::Active {
            blend_rectangle(frame, x, y, w, h, color, 0.2);
        }
        let border = if self.is_hovered(Widget::TrackButton(track)) { HOVER_COLOR } else { color };
        stroke_rectangle(frame, x, y, w, h, border);
        fill_rectangle(frame, x + 3, y + 4, 3, 3, color);

        let label = sound_buttons::button_label(track, custom_label);
        self.font.draw_text(frame, x + 9, y + 3, label, TEXT_COLOR);
    }

    fn draw_slider(&self, frame: &mut FrameBuffer, kind: SliderKind, rect: &Rect) {
        let slider = self.slider(kind);
        let (x, y) = (rect.x_range.start as i32, rect.y_range.start as i32);
        let width = rect.get_width() as i32;

        let label_color = if self.is_hovered(Widget::Slider(kind)) { HOVER_COLOR } else { TEXT_COLOR };
        self.font.draw_text(frame, x, y, kind.label(), label_color);
        let readout = kind.readout(slider.value());
        let readout_x = x + width - self.font.measure(&readout) as i32;
        self.font.draw_text(frame, readout_x, y, &readout, DIM_TEXT_COLOR);

        let bar_y = y + SLIDER_BAR_OFFSET;
        fill_rectangle(frame, x, bar_y, width.max(0) as u32, SLIDER_BAR_HEIGHT as u32, BAR_BACKGROUND);
        let filled = (slider.fill_fraction() * width as f32).round() as i32;
        fill_rectangle(frame, x, bar_y, filled.max(0) as u32, SLIDER_BAR_HEIGHT as u32, BAR_FILL);
        let handle_x = (x + filled - 1).clamp(x, (x + width - 2).max(x));
        fill_rectangle(frame, handle_x, bar_y - 1, 2, SLIDER_BAR_HEIGHT as u32 + 2, HOVER_COLOR);
    }

    fn draw_toggle(&self, frame: &mut FrameBuffer) {
        let rect = &self.layout.toggle;
        let (x, y) = (rect.x_range.start as i32, rect.y_range.start as i32);
        let (w, h) = (rect.get_width() as u32, rect.get_height() as u32);
        blend_rectangle(frame, x, y, w, h, PANEL_BACKGROUND, PANEL_OPACITY);
        let border = if self.is_hovered(Widget::Toggle) { HOVER_COLOR } else { PANEL_BORDER };
        stroke_rectangle(frame, x, y, w, h, border);
        let glyph = if self.visibility.toggle_marked_hidden() { "+" } else { "-" };
        self.font.draw_text(frame, x + 4, y + 3, glyph, TEXT_COLOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::audio::controller::DEFAULT_CUSTOM_LABEL;

    const WIDTH: usize = 640;
    const HEIGHT: usize = 360;

    fn make_panel() -> ControlPanel {
        ControlPanel::new(&SceneParams::default(), 0.5, WIDTH, HEIGHT)
    }

    fn center(rect: &Rect) -> (f32, f32) {
        (
            (rect.x_range.start + rect.x_range.end) as f32 * 0.5,
            (rect.y_range.start + rect.y_range.end) as f32 * 0.5
        )
    }

    fn click(panel: &mut ControlPanel, (x, y): (f32, f32)) -> Option<UiAction> {
        panel.on_mouse_move(x, y);
        assert_eq!(panel.on_mouse_down(x, y), None);
        panel.on_mouse_up(x, y)
    }

    #[test]
    fn sliders_start_from_params() {
        let panel = make_panel();
        assert_relative_eq!(panel.slider(SliderKind::Volume).value(), 0.5);
        assert_relative_eq!(panel.slider(SliderKind::StarCount).value(), 1500.0);
        assert_relative_eq!(panel.slider(SliderKind::StarSpeed).value(), 4.0);
        assert_relative_eq!(panel.slider(SliderKind::HueShiftSpeed).value(), 0.03, epsilon = 1e-6);
    }

    #[test]
    fn clicking_a_track_button_selects_it() {
        let mut panel = make_panel();
        let target = center(panel.widget_rect(Widget::TrackButton(Track::Atmosphere)));
        assert_eq!(click(&mut panel, target), Some(UiAction::SelectTrack(Track::Atmosphere)));

        let custom = center(panel.widget_rect(Widget::TrackButton(Track::Custom)));
        assert_eq!(click(&mut panel, custom), Some(UiAction::PickCustomFile));
    }

    #[test]
    fn releasing_elsewhere_cancels_the_click() {
        let mut panel = make_panel();
        let (x, y) = center(panel.widget_rect(Widget::TrackButton(Track::Lullaby)));
        panel.on_mouse_down(x, y);
        assert_eq!(panel.on_mouse_up(WIDTH as f32 * 0.5, HEIGHT as f32 * 0.5), None);
        assert_eq!(panel.hover(), HoverState::None);
    }

    #[test]
    fn dragging_a_slider_emits_quantised_values() {
        let mut panel = make_panel();
        let rect = panel.widget_rect(Widget::Slider(SliderKind::Volume)).clone();
        let (_, y) = center(&rect);

        let start = rect.x_range.start as f32;
        let end = rect.x_range.end as f32 - 1.0;
        assert_eq!(panel.on_mouse_down(end, y), Some(UiAction::SetVolume(1.0)));
        assert_eq!(panel.on_mouse_move(start - 30.0, y + 40.0), Some(UiAction::SetVolume(0.0)));
        assert_eq!(panel.on_mouse_move(start - 10.0, y), None);
        assert_eq!(panel.on_mouse_up(start, y), None);
        assert_eq!(panel.on_mouse_move(end, y), None);
        assert_relative_eq!(panel.slider(SliderKind::Volume).value(), 0.0);
    }

    #[test]
    fn star_count_slider_emits_counts() {
        let mut panel = make_panel();
        let rect = panel.widget_rect(Widget::Slider(SliderKind::StarCount)).clone();
        let (_, y) = center(&rect);
        let action = panel.on_mouse_down(rect.x_range.end as f32 - 1.0, y);
        assert_eq!(action, Some(UiAction::SetStarCount(5000)));
    }

    #[test]
    fn hidden_panels_ignore_the_pointer() {
        let mut panel = make_panel();
        let button = center(panel.widget_rect(Widget::TrackButton(Track::Planetarium)));
        let slider = center(panel.widget_rect(Widget::Slider(SliderKind::StarSpeed)));
        let toggle = center(panel.widget_rect(Widget::Toggle));

        assert_eq!(click(&mut panel, toggle), Some(UiAction::TogglePanels));
        assert!(panel.toggle_panels());
        assert_eq!(panel.widget_at(button.0, button.1), None);
        assert_eq!(panel.on_mouse_down(slider.0, slider.1), None);
        assert_eq!(panel.on_mouse_up(slider.0, slider.1), None);

        assert_eq!(click(&mut panel, toggle), Some(UiAction::TogglePanels));
        assert!(!panel.toggle_panels());
        assert_eq!(panel.widget_at(button.0, button.1), Some(Widget::TrackButton(Track::Planetarium)));
    }

    #[test]
    fn keyboard_shortcuts() {
        let mut panel = make_panel();
        assert_eq!(panel.on_key_down(KeyCode::H), Some(UiAction::TogglePanels));
        assert_eq!(panel.on_key_down(KeyCode::Key1), Some(UiAction::SelectTrack(Track::Planetarium)));
        assert_eq!(panel.on_key_down(KeyCode::Kp3), Some(UiAction::SelectTrack(Track::Lullaby)));
        assert_eq!(panel.on_key_down(KeyCode::C), Some(UiAction::PickCustomFile));
        assert_eq!(panel.on_key_down(KeyCode::R), Some(UiAction::RetryTrack));
        assert_eq!(panel.on_key_down(KeyCode::Space), None);
    }

    #[test]
    fn drawing_touches_the_panels_only_when_shown() {
        let mut panel = make_panel();
        let rect = panel.widget_rect(Widget::TrackButton(Track::Planetarium)).clone();
        let (x, y) = (rect.x_range.start as i32, rect.y_range.start as i32);

        let mut frame = FrameBuffer::new(WIDTH, HEIGHT);
        panel.draw(&mut frame, |_| Indicator::Off, DEFAULT_CUSTOM_LABEL);
        assert_eq!(frame.get_pixel(x, y), Some(sound_buttons::INDICATOR_OFF));

        panel.toggle_panels();
        let mut frame = FrameBuffer::new(WIDTH, HEIGHT);
        panel.draw(&mut frame, |_| Indicator::Off, DEFAULT_CUSTOM_LABEL);
        assert_eq!(frame.get_pixel(x, y), Some(crate::rendering::CLEAR_COLOR));
    }

    #[test]
    fn tiny_frames_do_not_panic() {
        let mut panel = make_panel();
        panel.resize(16, 16);
        let mut frame = FrameBuffer::new(16, 16);
        panel.draw(&mut frame, |_| Indicator::Active, "X");
        panel.on_mouse_down(8.0, 8.0);
        panel.on_mouse_up(8.0, 8.0);
    }
}
