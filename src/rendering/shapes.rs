use crate::rendering::blittable::{blend_over, BufferProviderMut, Rgba, SizedSurface};

pub fn fill_rectangle<T: Copy>(
    dest: &mut (impl BufferProviderMut<T> + SizedSurface),
    x: i32, y: i32,
    w: u32, h: u32,
    color: T
) {
    let (dw, dh) = (dest.get_width(), dest.get_height());
    let mut w = w as i32;
    let mut h = h as i32;

    if x < 0 { w += x; }
    if y < 0 { h += y; }
    if w <= 0 || h <= 0 { return; }

    let x = x.max(0) as usize;
    let y = y.max(0) as usize;
    let w = w as usize;
    let h = h as usize;

    let left = x.min(dw);
    let right = (x + w).min(dw);
    let buffer = dest.get_buffer_mut();

    let mut stride = y * dw;
    for _ in y.min(dh)..(y + h).min(dh) {
        for px in &mut buffer[stride+left..stride+right] {
            *px = color;
        }
        stride += dw;
    }
}

/// Same clipping as [`fill_rectangle`], but alpha blended.
pub fn blend_rectangle(
    dest: &mut (impl BufferProviderMut<Rgba> + SizedSurface),
    x: i32, y: i32,
    w: u32, h: u32,
    color: Rgba,
    opacity: f32
) {
    let (dw, dh) = (dest.get_width() as i32, dest.get_height() as i32);
    let left = x.clamp(0, dw);
    let right = (x + w as i32).clamp(0, dw);
    let top = y.clamp(0, dh);
    let bottom = (y + h as i32).clamp(0, dh);
    let buffer = dest.get_buffer_mut();
    for row in top..bottom {
        let stride = (row * dw) as usize;
        for px in &mut buffer[stride + left as usize..stride + right as usize] {
            blend_over(px, color, opacity);
        }
    }
}

/// One pixel wide outline.
pub fn stroke_rectangle<T: Copy>(
    dest: &mut (impl BufferProviderMut<T> + SizedSurface),
    x: i32, y: i32,
    w: u32, h: u32,
    color: T
) {
    if w == 0 || h == 0 { return; }
    fill_rectangle(dest, x, y, w, 1, color);
    fill_rectangle(dest, x, y + h as i32 - 1, w, 1, color);
    fill_rectangle(dest, x, y, 1, h, color);
    fill_rectangle(dest, x + w as i32 - 1, y, 1, h, color);
}
