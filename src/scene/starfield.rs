use glam::{Vec3, vec3};
use rand::Rng;
use crate::resources::{ResourceHandle, ResourceKind, ResourceRegistry};
use crate::utility::StopWatch;

pub const STAR_SPREAD: f32 = 1000.0;
pub const CONE_STRENGTH: f32 = 2.5;
pub const STAR_DRIFT: f32 = 0.02;

/// How far along the tunnel a depth is, `1.0` at the camera plane and `0.0` at the far end.
///
/// Not clamped: depths beyond the spread go negative and positive depths exceed one.
pub fn depth_progress(z: f32) -> f32 {
    1.0 - z.abs() / STAR_SPREAD
}

/// Flat `x, y, z` buffer of star positions. Slots have no identity beyond their index.
pub struct StarField {
    positions: Vec<f32>,
    geometry: ResourceHandle
}

impl StarField {
    pub fn new(count: usize, rng: &mut impl Rng, registry: &mut ResourceRegistry) -> Self {
        Self {
            positions: seed_positions(count, rng),
            geometry: registry.allocate(ResourceKind::Geometry)
        }
    }

    /// Throws away every star and reseeds `count` new ones in fresh geometry.
    pub fn rebuild(&mut self, count: usize, rng: &mut impl Rng, registry: &mut ResourceRegistry) {
        let _watch = StopWatch::named("star field rebuild");
        registry.release(self.geometry);
        self.geometry = registry.allocate(ResourceKind::Geometry);
        self.positions = seed_positions(count, rng);
        log::info!("star field rebuilt with {} stars", count);
    }

    pub fn len(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn geometry(&self) -> ResourceHandle {
        self.geometry
    }

    pub fn star(&self, idx: usize) -> Vec3 {
        let base = idx * 3;
        vec3(self.positions[base], self.positions[base + 1], self.positions[base + 2])
    }

    pub fn stars(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.positions
            .chunks_exact(3)
            .map(|it| vec3(it[0], it[1], it[2]))
    }

    pub fn update(&mut self, star_speed: f32, camera_z: f32, rng: &mut impl Rng) {
        for star in self.positions.chunks_exact_mut(3) {
            let mut x = star[0];
            let mut y = star[1];
            let mut z = star[2] + star_speed;

            let progress = depth_progress(z);
            x += x * progress * STAR_DRIFT * CONE_STRENGTH;
            y += y * progress * STAR_DRIFT * CONE_STRENGTH;

            if z > camera_z {
                x = spread_coordinate(rng);
                y = spread_coordinate(rng);
                z = -STAR_SPREAD;
            }

            star[0] = x;
            star[1] = y;
            star[2] = z;
        }
    }

    #[cfg(test)]
    pub(crate) fn set_star(&mut self, idx: usize, position: Vec3) {
        let base = idx * 3;
        self.positions[base..base + 3].copy_from_slice(&position.to_array());
    }
}

fn spread_coordinate(rng: &mut impl Rng) -> f32 {
    (rng.gen::<f32>() - 0.5) * STAR_SPREAD
}

fn seed_positions(count: usize, rng: &mut impl Rng) -> Vec<f32> {
    let mut positions = Vec::with_capacity(count * 3);
    for _ in 0..count {
        positions.push(spread_coordinate(rng));
        positions.push(spread_coordinate(rng));
        positions.push(rng.gen::<f32>() * -STAR_SPREAD);
    }
    positions
}
