pub type Rgba = [u8; 4];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x_range: std::ops::Range<usize>,
    pub y_range: std::ops::Range<usize>
}
impl Rect {
    pub fn get_width(&self) -> usize {
        self.x_range.end - self.x_range.start
    }
    pub fn get_height(&self) -> usize {
        self.y_range.end - self.y_range.start
    }
    pub fn contains(&self, x: usize, y: usize) -> bool {
        self.x_range.contains(&x) && self.y_range.contains(&y)
    }
}

pub trait SizedSurface {
    fn get_width(&self) -> usize;
    fn get_height(&self) -> usize;
}

pub trait BufferProviderMut<T> {
    fn get_buffer_mut(&mut self) -> &mut [T];
}

/// Straight-alpha "source over" blend. `opacity` multiplies the source alpha.
#[inline(always)]
pub fn blend_over(dst: &mut Rgba, src: Rgba, opacity: f32) {
    let alpha = (src[3] as f32 / 255.0) * opacity.clamp(0.0, 1.0);
    if alpha <= 0.0 { return; }
    for channel in 0..3 {
        let blended = src[channel] as f32 * alpha + dst[channel] as f32 * (1.0 - alpha);
        dst[channel] = blended.round().min(255.0) as u8;
    }
    let dst_alpha = dst[3] as f32 / 255.0;
    dst[3] = ((alpha + dst_alpha * (1.0 - alpha)) * 255.0).round() as u8;
}
