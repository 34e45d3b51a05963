use std::path::Path;
use crate::audio::AudioBackend;
use crate::audio::controller::{AudioController, Track};
use crate::config::{Config, SceneConfig};
use crate::params::SceneParams;
use crate::picker::{FilePicker, PickOutcome};
use crate::rendering::FrameBuffer;
use crate::rendering::scene_renderer::render_scene;
use crate::rendering::sprite_sheet::SpriteSheet;
use crate::scene::Scene;
use crate::scene::space_objects::FRAME_COUNT;
use crate::ui::{ControlPanel, UiAction};
use crate::ui::slider::SliderKind;
use crate::window::{frame_dimensions, ContextHandler, FrameContext, KeyCode, KeyMods};

const PROCEDURAL_FRAME_SIZE: usize = 64;

/// Loads the space object sheet, falling back to generated art when the file is unusable.
pub fn load_sprite_sheet(path: &Path) -> SpriteSheet {
    match SpriteSheet::load(path, FRAME_COUNT) {
        Ok(sheet) => sheet,
        Err(error) => {
            log::warn!(
                "can't use sprite sheet {} ({}), generating one instead",
                path.display(),
                error
            );
            SpriteSheet::procedural(FRAME_COUNT, PROCEDURAL_FRAME_SIZE)
        }
    }
}

/// Scene settings snapped onto the slider grids, so each readout equals its parameter.
fn slider_aligned(config: &SceneConfig) -> SceneConfig {
    let aligned = SceneConfig {
        star_count: SliderKind::StarCount.snap(config.star_count as f32).round() as usize,
        star_speed: SliderKind::StarSpeed.snap(config.star_speed),
        hue_shift_speed: SliderKind::HueShiftSpeed.snap(config.hue_shift_speed),
        ..config.clone()
    };
    if aligned != *config {
        log::info!(
            "scene settings adjusted to slider ranges: {} stars, speed {}, hue shift {}",
            aligned.star_count,
            aligned.star_speed,
            aligned.hue_shift_speed
        );
    }
    aligned
}

/// The whole backdrop: scene, parameters, music and controls wired together.
pub struct BackdropApp<B: AudioBackend, P: FilePicker> {
    title: String,
    scene: Scene,
    params: SceneParams,
    audio: AudioController<B>,
    panel: ControlPanel,
    sprites: SpriteSheet,
    picker: P,
    initial_track: Track
}

impl<B: AudioBackend, P: FilePicker> BackdropApp<B, P> {
    pub fn new(config: &Config, backend: B, picker: P) -> Self {
        let sprites = load_sprite_sheet(&config.assets.sprite_sheet);
        Self::with_sprite_sheet(config, backend, picker, sprites)
    }

    pub fn with_sprite_sheet(config: &Config, backend: B, picker: P, sprites: SpriteSheet) -> Self {
        let (width, height) = frame_dimensions(
            config.window.width as f32,
            config.window.height as f32,
            config.window.render_scale
        );
        let scene_config = slider_aligned(&config.scene);
        let params = SceneParams::from(&scene_config);
        let audio = AudioController::new(
            backend,
            config.audio.tracks_dir.clone(),
            SliderKind::Volume.snap(config.audio.volume)
        );
        Self {
            title: config.window.title.clone(),
            scene: Scene::new(&scene_config, width as u32, height as u32),
            panel: ControlPanel::new(&params, audio.volume(), width, height),
            params,
            audio,
            sprites,
            picker,
            initial_track: config.audio.initial_track
        }
    }

    pub fn params(&self) -> &SceneParams {
        &self.params
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn audio(&self) -> &AudioController<B> {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut AudioController<B> {
        &mut self.audio
    }

    pub fn panel(&self) -> &ControlPanel {
        &self.panel
    }

    /// Starts the configured track. No custom file exists yet at startup,
    /// so a custom initial track falls back to the first bundled one.
    pub fn start_audio(&mut self) {
        let track = match self.initial_track {
            Track::Custom => {
                log::warn!(
                    "initial track can't be custom before a file is picked, starting {:?}",
                    Track::BUNDLED[0]
                );
                Track::BUNDLED[0]
            }
            track => track
        };
        self.audio.select(track);
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.scene.resize(width as u32, height as u32);
        self.panel.resize(width, height);
    }

    /// One frame: picker answers, finished loads, animation, scene, controls.
    pub fn tick(&mut self, frame: &mut FrameBuffer) {
        if let Some(outcome) = self.picker.poll_pick() {
            match outcome {
                PickOutcome::Picked(path) => {
                    self.audio.select_custom(Some(path));
                }
                PickOutcome::Dismissed => log::debug!("file picker dismissed")
            }
        }
        self.audio.poll();
        self.scene.tick(&self.params);
        render_scene(frame, &self.scene, &self.sprites);
        let audio = &self.audio;
        self.panel.draw(frame, |track| audio.indicator(track), audio.custom_label());
    }

    pub fn apply(&mut self, action: UiAction) {
        match action {
            UiAction::SetVolume(volume) => self.audio.set_volume(volume),
            UiAction::SetHueShiftSpeed(speed) => self.params.set_hue_shift_speed(speed),
            UiAction::SetStarCount(count) => {
                self.params.set_star_count(count);
                self.scene.rebuild_stars(count);
            }
            UiAction::SetStarSpeed(speed) => self.params.set_star_speed(speed),
            UiAction::SelectTrack(track) => {
                self.audio.select(track);
            }
            UiAction::PickCustomFile => {
                if !self.picker.begin_pick() {
                    log::debug!("file picker already open");
                }
            }
            UiAction::RetryTrack => {
                self.audio.retry();
            }
            UiAction::TogglePanels => {
                let hidden = self.panel.toggle_panels();
                log::debug!("panels hidden: {}", hidden);
            }
        }
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        if let Some(action) = self.panel.on_mouse_move(x, y) {
            self.apply(action);
        }
    }

    pub fn pointer_pressed(&mut self, x: f32, y: f32) {
        if let Some(action) = self.panel.on_mouse_down(x, y) {
            self.apply(action);
        }
    }

    pub fn pointer_released(&mut self, x: f32, y: f32) {
        if let Some(action) = self.panel.on_mouse_up(x, y) {
            self.apply(action);
        }
    }

    pub fn key_pressed(&mut self, key_code: KeyCode) {
        if let Some(action) = self.panel.on_key_down(key_code) {
            self.apply(action);
        }
    }
}

impl<B: AudioBackend, P: FilePicker> ContextHandler for BackdropApp<B, P> {
    fn get_window_title(&self) -> &str {
        &self.title
    }

    fn on_mouse_move(&mut self, ctx: &mut FrameContext) {
        let (x, y) = ctx.get_mouse_pos();
        self.pointer_moved(x, y);
    }

    fn on_mouse_down(&mut self, ctx: &mut FrameContext, button_number: u8) {
        if button_number == 0 {
            let (x, y) = ctx.get_mouse_pos();
            self.pointer_pressed(x, y);
        }
    }

    fn on_mouse_up(&mut self, ctx: &mut FrameContext, button_number: u8) {
        if button_number == 0 {
            let (x, y) = ctx.get_mouse_pos();
            self.pointer_released(x, y);
        }
    }

    fn on_key_down(&mut self, _ctx: &mut FrameContext, key_code: KeyCode, key_mods: KeyMods) {
        if key_mods.control || key_mods.command {
            return;
        }
        self.key_pressed(key_code);
    }

    fn on_resize(&mut self, _ctx: &mut FrameContext, width: usize, height: usize) {
        self.resize(width, height);
    }

    fn init(&mut self, ctx: &mut FrameContext) {
        let (width, height) = ctx.frame_size();
        self.resize(width, height);
        self.start_audio();
    }

    fn update(&mut self, ctx: &mut FrameContext, _dt: f32) {
        self.tick(ctx.frame_mut());
    }
}
