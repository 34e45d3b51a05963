pub mod blittable;
pub mod scene_renderer;
pub mod shapes;
pub mod sprite_sheet;
pub mod transform;

use blittable::{blend_over, BufferProviderMut, Rgba, SizedSurface};

pub const CLEAR_COLOR: Rgba = [0, 0, 0, 255];

/// The software render target, uploaded to the window texture once per frame.
#[derive(Clone)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Rgba>
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![CLEAR_COLOR; width * height]
        }
    }

    /// Reallocates; previous contents are discarded.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels = vec![CLEAR_COLOR; width * height];
    }

    pub fn clear(&mut self, color: Rgba) {
        for pixel in self.pixels.iter_mut() {
            *pixel = color;
        }
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn get_pixel(&self, x: i32, y: i32) -> Option<Rgba> {
        self.offset(x, y).map(|idx| self.pixels[idx])
    }

    pub fn put_pixel(&mut self, x: i32, y: i32, color: Rgba) {
        if let Some(idx) = self.offset(x, y) {
            self.pixels[idx] = color;
        }
    }

    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Rgba, opacity: f32) {
        if let Some(idx) = self.offset(x, y) {
            blend_over(&mut self.pixels[idx], color, opacity);
        }
    }

    #[inline(always)]
    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        if (0..self.width as i32).contains(&x) && (0..self.height as i32).contains(&y) {
            Some(y as usize * self.width + x as usize)
        } else {
            None
        }
    }
}

impl SizedSurface for FrameBuffer {
    fn get_width(&self) -> usize { self.width }

    fn get_height(&self) -> usize { self.height }
}

impl BufferProviderMut<Rgba> for FrameBuffer {
    fn get_buffer_mut(&mut self) -> &mut [Rgba] {
        &mut self.pixels
    }
}
