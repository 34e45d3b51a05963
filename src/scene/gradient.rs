use crate::resources::{ResourceHandle, ResourceKind, ResourceRegistry};

pub const BASE_HUE: f32 = 250.0;
pub const GRADIENT_HEIGHT: usize = 512;

/// (offset, hue delta in degrees, lightness) for each color stop, saturation is always full.
const COLOR_STOPS: [(f32, f32, f32); 3] = [
    (0.0, 0.0, 0.0),
    (0.5, 3.0, 0.007),
    (1.0, 5.0, 0.015)
];

/// `hue` in degrees (any value, wraps modulo 360), `saturation` and `lightness` in `0..=1`.
pub fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> [f32; 3] {
    let hue = hue.rem_euclid(360.0);
    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let sector = hue / 60.0;
    let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
    let (r, g, b) = match sector as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x)
    };
    let m = lightness - chroma / 2.0;
    [r + m, g + m, b + m]
}

/// A 1×512 vertical gradient, top row first.
#[derive(Clone)]
pub struct GradientTexture {
    hue: f32,
    rows: Vec<[u8; 4]>
}

impl GradientTexture {
    pub fn generate(hue: f32) -> Self {
        let stops = COLOR_STOPS.map(|(offset, delta, lightness)| {
            (offset, hsl_to_rgb(hue + delta, 1.0, lightness))
        });
        let rows = (0..GRADIENT_HEIGHT)
            .map(|y| {
                let t = (y as f32 + 0.5) / GRADIENT_HEIGHT as f32;
                let [r, g, b] = sample_stops(&stops, t);
                [to_byte(r), to_byte(g), to_byte(b), 255]
            })
            .collect();
        Self { hue, rows }
    }

    pub fn hue(&self) -> f32 {
        self.hue
    }

    pub fn rows(&self) -> &[[u8; 4]] {
        &self.rows
    }

    /// Row for a normalized vertical position, `0.0` being the top.
    pub fn sample(&self, v: f32) -> [u8; 4] {
        let idx = ((v * GRADIENT_HEIGHT as f32) as usize).min(GRADIENT_HEIGHT - 1);
        self.rows[idx]
    }
}

fn sample_stops(stops: &[(f32, [f32; 3])], t: f32) -> [f32; 3] {
    for pair in stops.windows(2) {
        let (start, from) = pair[0];
        let (end, to) = pair[1];
        if t <= end {
            let k = ((t - start) / (end - start)).clamp(0.0, 1.0);
            return [
                from[0] + (to[0] - from[0]) * k,
                from[1] + (to[1] - from[1]) * k,
                from[2] + (to[2] - from[2]) * k
            ];
        }
    }
    stops[stops.len() - 1].1
}

fn to_byte(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// The scene background. The texture is regenerated every frame and the previous one released.
pub struct BackgroundGradient {
    hue: f32,
    texture: GradientTexture,
    handle: ResourceHandle
}

impl BackgroundGradient {
    pub fn new(base_hue: f32, registry: &mut ResourceRegistry) -> Self {
        Self {
            hue: base_hue,
            texture: GradientTexture::generate(base_hue),
            handle: registry.allocate(ResourceKind::Texture)
        }
    }

    pub fn hue(&self) -> f32 {
        self.hue
    }

    pub fn texture(&self) -> &GradientTexture {
        &self.texture
    }

    pub fn handle(&self) -> ResourceHandle {
        self.handle
    }

    pub fn advance(&mut self, hue_shift_speed: f32, registry: &mut ResourceRegistry) {
        self.hue += hue_shift_speed;
        let texture = GradientTexture::generate(self.hue);
        let handle = registry.allocate(ResourceKind::Texture);
        registry.release(self.handle);
        self.texture = texture;
        self.handle = handle;
    }
}
