use std::convert::TryFrom;
use orom_miniquad::*;

use crate::config::WindowConfig;
use crate::rendering::blittable::SizedSurface;
use crate::rendering::FrameBuffer;
use crate::scene::camera::MIN_VIEWPORT;
use crate::utility::FrameClock;

#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
pub enum KeyCode {
    Space,
    Key0,
    Key1,
    Key2,
    Key3,
    Key4,
    Key5,
    Key6,
    Key7,
    Key8,
    Key9,
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    Escape,
    Enter,
    Tab,
    Backspace,
    Right,
    Left,
    Down,
    Up,
    Kp0,
    Kp1,
    Kp2,
    Kp3,
    Kp4,
    Kp5,
    Kp6,
    Kp7,
    Kp8,
    Kp9
}

#[derive(Copy, Clone, Debug, Default)]
pub struct KeyMods {
    pub control: bool,
    pub command: bool
}

impl From<orom_miniquad::KeyMods> for KeyMods {
    fn from(keymods: orom_miniquad::KeyMods) -> Self {
        Self {
            control: keymods.ctrl,
            command: keymods.logo
        }
    }
}

impl TryFrom<orom_miniquad::KeyCode> for KeyCode {
    type Error = ();

    fn try_from(value: orom_miniquad::KeyCode) -> Result<Self, Self::Error> {
        match value {
            orom_miniquad::KeyCode::Space => Ok(KeyCode::Space),
            orom_miniquad::KeyCode::Key0 => Ok(KeyCode::Key0),
            orom_miniquad::KeyCode::Key1 => Ok(KeyCode::Key1),
            orom_miniquad::KeyCode::Key2 => Ok(KeyCode::Key2),
            orom_miniquad::KeyCode::Key3 => Ok(KeyCode::Key3),
            orom_miniquad::KeyCode::Key4 => Ok(KeyCode::Key4),
            orom_miniquad::KeyCode::Key5 => Ok(KeyCode::Key5),
            orom_miniquad::KeyCode::Key6 => Ok(KeyCode::Key6),
            orom_miniquad::KeyCode::Key7 => Ok(KeyCode::Key7),
            orom_miniquad::KeyCode::Key8 => Ok(KeyCode::Key8),
            orom_miniquad::KeyCode::Key9 => Ok(KeyCode::Key9),
            orom_miniquad::KeyCode::A => Ok(KeyCode::A),
            orom_miniquad::KeyCode::B => Ok(KeyCode::B),
            orom_miniquad::KeyCode::C => Ok(KeyCode::C),
            orom_miniquad::KeyCode::D => Ok(KeyCode::D),
            orom_miniquad::KeyCode::E => Ok(KeyCode::E),
            orom_miniquad::KeyCode::F => Ok(KeyCode::F),
            orom_miniquad::KeyCode::G => Ok(KeyCode::G),
            orom_miniquad::KeyCode::H => Ok(KeyCode::H),
            orom_miniquad::KeyCode::I => Ok(KeyCode::I),
            orom_miniquad::KeyCode::J => Ok(KeyCode::J),
            orom_miniquad::KeyCode::K => Ok(KeyCode::K),
            orom_miniquad::KeyCode::L => Ok(KeyCode::L),
            orom_miniquad::KeyCode::M => Ok(KeyCode::M),
            orom_miniquad::KeyCode::N => Ok(KeyCode::N),
            orom_miniquad::KeyCode::O => Ok(KeyCode::O),
            orom_miniquad::KeyCode::P => Ok(KeyCode::P),
            orom_miniquad::KeyCode::Q => Ok(KeyCode::Q),
            orom_miniquad::KeyCode::R => Ok(KeyCode::R),
            orom_miniquad::KeyCode::S => Ok(KeyCode::S),
            orom_miniquad::KeyCode::T => Ok(KeyCode::T),
            orom_miniquad::KeyCode::U => Ok(KeyCode::U),
            orom_miniquad::KeyCode::V => Ok(KeyCode::V),
            orom_miniquad::KeyCode::W => Ok(KeyCode::W),
            orom_miniquad::KeyCode::X => Ok(KeyCode::X),
            orom_miniquad::KeyCode::Y => Ok(KeyCode::Y),
            orom_miniquad::KeyCode::Z => Ok(KeyCode::Z),
            orom_miniquad::KeyCode::Escape => Ok(KeyCode::Escape),
            orom_miniquad::KeyCode::Enter => Ok(KeyCode::Enter),
            orom_miniquad::KeyCode::Tab => Ok(KeyCode::Tab),
            orom_miniquad::KeyCode::Backspace => Ok(KeyCode::Backspace),
            orom_miniquad::KeyCode::Right => Ok(KeyCode::Right),
            orom_miniquad::KeyCode::Left => Ok(KeyCode::Left),
            orom_miniquad::KeyCode::Down => Ok(KeyCode::Down),
            orom_miniquad::KeyCode::Up => Ok(KeyCode::Up),
            orom_miniquad::KeyCode::Kp0 => Ok(KeyCode::Kp0),
            orom_miniquad::KeyCode::Kp1 => Ok(KeyCode::Kp1),
            orom_miniquad::KeyCode::Kp2 => Ok(KeyCode::Kp2),
            orom_miniquad::KeyCode::Kp3 => Ok(KeyCode::Kp3),
            orom_miniquad::KeyCode::Kp4 => Ok(KeyCode::Kp4),
            orom_miniquad::KeyCode::Kp5 => Ok(KeyCode::Kp5),
            orom_miniquad::KeyCode::Kp6 => Ok(KeyCode::Kp6),
            orom_miniquad::KeyCode::Kp7 => Ok(KeyCode::Kp7),
            orom_miniquad::KeyCode::Kp8 => Ok(KeyCode::Kp8),
            orom_miniquad::KeyCode::Kp9 => Ok(KeyCode::Kp9),
            _ => Err(()),
        }
    }
}

/// Frame size for a window size: divided by the render scale, never below `MIN_VIEWPORT`.
pub fn frame_dimensions(window_width: f32, window_height: f32, render_scale: u32) -> (usize, usize) {
    let scale = render_scale.max(1) as f32;
    let min = MIN_VIEWPORT as usize;
    (
        ((window_width / scale).floor().max(0.0) as usize).max(min),
        ((window_height / scale).floor().max(0.0) as usize).max(min)
    )
}

/// Per-window state handed to a [`ContextHandler`]: the software frame and input snapshot.
pub struct FrameContext {
    frame: FrameBuffer,
    render_scale: u32,
    window_width: f32,
    window_height: f32,
    mouse_x: f32,
    mouse_y: f32
}

impl FrameContext {
    pub fn new(window_width: f32, window_height: f32, render_scale: u32) -> Self {
        let (width, height) = frame_dimensions(window_width, window_height, render_scale);
        Self {
            frame: FrameBuffer::new(width, height),
            render_scale: render_scale.max(1),
            window_width,
            window_height,
            mouse_x: 0.0,
            mouse_y: 0.0
        }
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    pub fn frame_mut(&mut self) -> &mut FrameBuffer {
        &mut self.frame
    }

    pub fn frame_size(&self) -> (usize, usize) {
        (self.frame.get_width(), self.frame.get_height())
    }

    /// Pointer position in frame pixels.
    pub fn get_mouse_pos(&self) -> (f32, f32) {
        (self.mouse_x, self.mouse_y)
    }

    /// Returns `true` when the frame had to be reallocated.
    pub fn resize_window(&mut self, window_width: f32, window_height: f32) -> bool {
        self.window_width = window_width;
        self.window_height = window_height;
        let new_size = frame_dimensions(window_width, window_height, self.render_scale);
        if new_size == self.frame_size() {
            return false;
        }
        self.frame.resize(new_size.0, new_size.1);
        true
    }

    pub fn set_mouse_from_window(&mut self, x: f32, y: f32) {
        let (width, height) = self.frame_size();
        let window_width = self.window_width.max(1.0);
        let window_height = self.window_height.max(1.0);
        self.mouse_x = (x / window_width * width as f32).clamp(0.0, width as f32);
        self.mouse_y = (y / window_height * height as f32).clamp(0.0, height as f32);
    }
}

pub trait ContextHandler {
    fn get_window_title(&self) -> &str;
    fn on_mouse_move(&mut self, _ctx: &mut FrameContext) {}
    fn on_mouse_down(&mut self, _ctx: &mut FrameContext, _button_number: u8) {}
    fn on_mouse_up(&mut self, _ctx: &mut FrameContext, _button_number: u8) {}
    fn on_key_down(&mut self, _ctx: &mut FrameContext, _key_code: KeyCode, _key_mods: KeyMods) {}
    /// Called after the frame was reallocated to `width × height`.
    fn on_resize(&mut self, _ctx: &mut FrameContext, _width: usize, _height: usize) {}
    fn init(&mut self, ctx: &mut FrameContext);
    fn update(&mut self, ctx: &mut FrameContext, dt: f32);
}

pub struct Stage<CtxHandler: ContextHandler> {
    pipeline: Pipeline,
    binding: Bindings,
    frame_texture: Texture,
    context_data: FrameContext,
    handler: CtxHandler,
    frame_clock: FrameClock
}

fn make_frame_texture(ctx: &mut Context, frame: &FrameBuffer) -> Texture {
    Texture::from_data_and_format(
        ctx,
        frame.as_bytes(),
        TextureParams {
            format: TextureFormat::RGBA8,
            wrap: TextureWrap::Clamp,
            filter: FilterMode::Nearest,
            width: frame.get_width() as _,
            height: frame.get_height() as _,
            depth: 1
        },
        TextureKind::Texture2D
    )
}

impl<CtxHandler: ContextHandler> Stage<CtxHandler> {
    pub fn new(ctx: &mut Context, handler: CtxHandler, render_scale: u32) -> Stage<CtxHandler> {
        #[rustfmt::skip]
        let verts: &[f32] = &[
            /* pos         uv */
            -1.0, -1.0,    0.0, 0.0,
             1.0,  1.0,    1.0, 1.0,
            -1.0,  1.0,    0.0, 1.0,
             1.0, -1.0,    1.0, 0.0,
        ];

        let vertex_buffer = Buffer::immutable(
            ctx,
            BufferType::VertexBuffer,
            &verts
        );

        let index_buffer = Buffer::immutable(
            ctx,
            BufferType::IndexBuffer,
            &[0u16, 1, 2, 0, 3, 1]
        );

        let (window_width, window_height) = ctx.screen_size();
        let mut context_data = FrameContext::new(window_width, window_height, render_scale);

        let mut handler = handler;
        handler.init(&mut context_data);

        let frame_texture = make_frame_texture(ctx, &context_data.frame);

        let binding = Bindings {
            vertex_buffers: vec![vertex_buffer],
            index_buffer,
            images: vec![frame_texture]
        };

        let shader = Shader::new(
            ctx,
            frame_shader::VERTEX,
            frame_shader::FRAGMENT,
            frame_shader::meta()
        ).unwrap(); // crash if failed to create a shader

        let pipeline = Pipeline::new(
            ctx,
            &[BufferLayout::default()],
            &[
                VertexAttribute::new("pos", VertexFormat::Float2),
                VertexAttribute::new("uv", VertexFormat::Float2),
            ],
            shader
        );

        Self {
            pipeline,
            binding,
            frame_texture,
            context_data,
            handler,
            frame_clock: FrameClock::start()
        }
    }
}

impl<CtxHandler: ContextHandler> EventHandler for Stage<CtxHandler> {
    fn update(&mut self, ctx: &mut Context) {
        let dt = self.frame_clock.tick();
        self.handler.update(&mut self.context_data, dt);
        self.frame_texture.update(ctx, self.context_data.frame.as_bytes());
    }

    fn draw(&mut self, ctx: &mut Context) {
        ctx.begin_default_pass(PassAction::clear_color(0.0, 0.0, 0.0, 1.0));
        ctx.apply_pipeline(&self.pipeline);
        ctx.apply_bindings(&self.binding);
        ctx.draw(0, 6, 1);
        ctx.end_render_pass();

        ctx.commit_frame();
    }

    fn resize_event(&mut self, ctx: &mut Context, width: f32, height: f32) {
        if !self.context_data.resize_window(width, height) {
            return;
        }
        let (frame_width, frame_height) = self.context_data.frame_size();
        self.handler.on_resize(&mut self.context_data, frame_width, frame_height);

        self.frame_texture.delete();
        self.frame_texture = make_frame_texture(ctx, &self.context_data.frame);
        self.binding.images[0] = self.frame_texture;
    }

    fn mouse_motion_event(&mut self, _ctx: &mut Context, x: f32, y: f32) {
        self.context_data.set_mouse_from_window(x, y);
        self.handler.on_mouse_move(&mut self.context_data);
    }

    fn mouse_button_down_event(&mut self, _ctx: &mut Context, button: MouseButton, x: f32, y: f32) {
        self.context_data.set_mouse_from_window(x, y);
        match button {
            MouseButton::Left => { self.handler.on_mouse_down(&mut self.context_data, 0); },
            MouseButton::Middle => { self.handler.on_mouse_down(&mut self.context_data, 1); },
            MouseButton::Right => { self.handler.on_mouse_down(&mut self.context_data, 2); },
            _ => {}
        }
    }

    fn mouse_button_up_event(&mut self, _ctx: &mut Context, button: MouseButton, x: f32, y: f32) {
        self.context_data.set_mouse_from_window(x, y);
        match button {
            MouseButton::Left => { self.handler.on_mouse_up(&mut self.context_data, 0); },
            MouseButton::Middle => { self.handler.on_mouse_up(&mut self.context_data, 1); },
            MouseButton::Right => { self.handler.on_mouse_up(&mut self.context_data, 2); },
            _ => {}
        }
    }

    fn key_down_event(
        &mut self,
        _ctx: &mut Context,
        keycode: orom_miniquad::KeyCode,
        keymods: orom_miniquad::KeyMods,
        repeat: bool,
    ) {
        let new_key_mods = KeyMods::from(keymods);
        if repeat {
            return;
        }
        if let Ok(key_code) = KeyCode::try_from(keycode) {
            self.handler.on_key_down(
                &mut self.context_data,
                key_code,
                new_key_mods
            );
        }
    }
}

mod frame_shader {
    use orom_miniquad::*;

    pub const VERTEX:&str = r#"#version 100
        attribute vec2 pos;
        attribute vec2 uv;

        varying lowp vec2 texcoord;

        void main() {
            gl_Position = vec4(pos, 0.0, 1.0);
            texcoord = vec2(uv.x, 1.0 - uv.y);
        }
    "#;

    pub const FRAGMENT:&str = r#"#version 100
        varying lowp vec2 texcoord;

        uniform sampler2D tex;

        void main() {
            gl_FragColor = vec4(texture2D(tex, texcoord).rgb, 1.0);
        }
    "#;

    pub fn meta() -> ShaderMeta {
        ShaderMeta {
            images: vec!["tex".to_string()],
            uniforms: UniformBlockLayout { uniforms: Vec::new() }
        }
    }
}

pub fn start<CtxHandler: 'static + ContextHandler>(handler: CtxHandler, config: &WindowConfig) {
    let conf = conf::Conf {
        window_title: handler.get_window_title().to_string(),
        window_width: config.width as _,
        window_height: config.height as _,
        high_dpi: false,
        fullscreen: false,
        sample_count: 1,
        window_resizable: true
    };
    let render_scale = config.render_scale;

    orom_miniquad::start(conf, move |mut ctx| {
        UserData::owning(Stage::new(&mut ctx, handler, render_scale), ctx)
    });
}
