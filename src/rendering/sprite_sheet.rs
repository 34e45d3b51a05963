use std::path::Path;
use noise::{NoiseFn, Perlin, Seedable};
use thiserror::Error;
use crate::rendering::blittable::{Rgba, SizedSurface};
use crate::utility::StopWatch;

#[derive(Error, Debug)]
pub enum SpriteSheetError {
    #[error("failed to load sprite sheet image")]
    Image(#[from] image::ImageError),
    #[error("a {width} px wide sheet cannot hold {frame_count} frames")]
    TooNarrow { width: usize, frame_count: usize }
}

/// A horizontal strip of equally sized frames.
pub struct SpriteSheet {
    width: usize,
    height: usize,
    frame_count: usize,
    pixels: Vec<Rgba>
}

impl SpriteSheet {
    pub fn load(path: &Path, frame_count: usize) -> Result<Self, SpriteSheetError> {
        let image = image::open(path)?.to_rgba8();
        Self::from_rgba(
            image.width() as usize,
            image.height() as usize,
            image.pixels().map(|it| it.0).collect(),
            frame_count
        )
    }

    pub fn from_rgba(width: usize, height: usize, pixels: Vec<Rgba>, frame_count: usize) -> Result<Self, SpriteSheetError> {
        if frame_count == 0 || width < frame_count {
            return Err(SpriteSheetError::TooNarrow { width, frame_count });
        }
        Ok(Self { width, height, frame_count, pixels })
    }

    /// Noise-textured stand-ins used when no sheet image is available.
    pub fn procedural(frame_count: usize, frame_size: usize) -> Self {
        let _watch = StopWatch::named("procedural sprite sheet");
        let frame_count = frame_count.max(1);
        let width = frame_size * frame_count;
        let height = frame_size;
        let mut pixels = vec![[0u8; 4]; width * height];
        for frame in 0..frame_count {
            let perlin = Perlin::new().set_seed(frame as u32 * 7919 + 1);
            let tint = FRAME_TINTS[frame % FRAME_TINTS.len()];
            for y in 0..frame_size {
                for x in 0..frame_size {
                    let u = (x as f64 + 0.5) / frame_size as f64 * 2.0 - 1.0;
                    let v = (y as f64 + 0.5) / frame_size as f64 * 2.0 - 1.0;
                    pixels[y * width + frame * frame_size + x] =
                        procedural_texel(&perlin, frame, u, v, tint);
                }
            }
        }
        Self { width, height, frame_count, pixels }
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn frame_width(&self) -> usize {
        self.width / self.frame_count
    }

    /// Nearest texel of `frame` at `u, v` in `0..1`, `v = 0` being the top edge.
    pub fn sample(&self, frame: usize, u: f32, v: f32) -> Rgba {
        let frame_width = self.frame_width();
        let frame = frame % self.frame_count;
        let x = ((u.clamp(0.0, 1.0) * frame_width as f32) as usize).min(frame_width - 1);
        let y = ((v.clamp(0.0, 1.0) * self.height as f32) as usize).min(self.height.saturating_sub(1));
        self.pixels[y * self.width + frame * frame_width + x]
    }
}

impl SizedSurface for SpriteSheet {
    fn get_width(&self) -> usize { self.width }

    fn get_height(&self) -> usize { self.height }
}

const FRAME_TINTS: [[f64; 3]; 5] = [
    [0.55, 0.50, 0.45],
    [0.85, 0.60, 0.35],
    [0.45, 0.65, 0.95],
    [0.80, 0.85, 0.90],
    [0.65, 0.40, 0.85]
];

fn procedural_texel(perlin: &Perlin, frame: usize, u: f64, v: f64, tint: [f64; 3]) -> Rgba {
    let angle = v.atan2(u);
    let distance = (u * u + v * v).sqrt();
    let rough_edge = 0.75 + 0.12 * perlin.get([angle.cos() * 1.5, angle.sin() * 1.5, 0.5]);
    let ringed = frame % FRAME_TINTS.len() == 2;
    let ring = ringed && (v * 3.0).abs() < 0.35 && (0.55..0.95).contains(&u.abs());

    let radius = if ringed { 0.5 } else { rough_edge };
    if distance > radius && !ring {
        return [0, 0, 0, 0];
    }

    let detail = perlin.get([u * 4.0, v * (if frame == 1 { 0.8 } else { 4.0 }), 1.7]);
    // light comes from the upper left
    let shade = if ring { 0.8 } else { (1.0 - (u + v + 0.6).max(0.0) * 0.45).clamp(0.25, 1.0) };
    let brightness = ((0.75 + detail * 0.35) * shade).clamp(0.0, 1.0);
    let edge_fade = if ring { 1.0 } else { ((radius - distance) * 20.0).clamp(0.0, 1.0) };
    [
        (tint[0] * brightness * 255.0) as u8,
        (tint[1] * brightness * 255.0) as u8,
        (tint[2] * brightness * 255.0) as u8,
        (edge_fade * 255.0) as u8
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn procedural_sheet_has_one_frame_per_slot() {
        let sheet = SpriteSheet::procedural(5, 32);
        assert_eq!(sheet.frame_count(), 5);
        assert_eq!(sheet.frame_width(), 32);
        assert_eq!(sheet.get_width(), 160);
        assert_eq!(sheet.get_height(), 32);
        for frame in 0..5 {
            assert_eq!(sheet.sample(frame, 0.5, 0.5)[3], 255, "frame {} center", frame);
            assert_eq!(sheet.sample(frame, 0.0, 0.0)[3], 0, "frame {} corner", frame);
        }
    }

    #[test]
    fn sampling_picks_the_requested_frame() {
        let pixels = (0..4).map(|it| [it as u8, 0, 0, 255]).collect();
        let sheet = SpriteSheet::from_rgba(4, 1, pixels, 4).unwrap();
        assert_eq!(sheet.sample(0, 0.5, 0.5)[0], 0);
        assert_eq!(sheet.sample(2, 0.5, 0.5)[0], 2);
        assert_eq!(sheet.sample(3, 1.0, 1.0)[0], 3);
    }

    #[test]
    fn sheet_narrower_than_frame_count_is_rejected() {
        let result = SpriteSheet::from_rgba(3, 1, vec![[0; 4]; 3], 5);
        assert!(matches!(result, Err(SpriteSheetError::TooNarrow { width: 3, frame_count: 5 })));
    }

    #[test]
    fn missing_file_is_an_image_error() {
        let result = SpriteSheet::load(Path::new("definitely/not/here.png"), 5);
        assert!(matches!(result, Err(SpriteSheetError::Image(_))));
    }
}
