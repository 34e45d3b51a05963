use glam::{Vec3, vec3};
use rand::Rng;
use crate::scene::starfield::{depth_progress, STAR_SPREAD};

pub const FRAME_COUNT: usize = 5;
pub const SPACE_OBJECT_COUNT: usize = 5;
pub const OBJECT_DRIFT: f32 = 0.005;
/// Objects linger this far past the camera before they respawn.
pub const RESPAWN_MARGIN: f32 = 5.0;

const LATERAL_FRACTION: f32 = 0.25;
const MIN_SCALE: f32 = 3.0;
const SCALE_RANGE: f32 = 3.5;
const MIN_SPEED: f32 = 0.6;
const SPEED_RANGE: f32 = 1.2;
const ROTATION_SPEED_RANGE: f32 = 0.015;
/// Steady respawns land in the farthest fifth of the tunnel.
const FAR_BAND: f32 = 0.2;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SpawnMode {
    /// Startup placement anywhere along the tunnel so the pool does not arrive as one wave.
    Initial,
    /// Regular respawn near the far end.
    Steady
}

/// A billboard sprite showing one frame of the space-object sheet.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpaceObject {
    pub position: Vec3,
    pub rotation: f32,
    pub scale: f32,
    pub speed: f32,
    pub rotation_speed: f32,
    pub frame: usize
}

impl SpaceObject {
    pub fn spawned(mode: SpawnMode, rng: &mut impl Rng) -> Self {
        let mut object = Self {
            position: Vec3::ZERO,
            rotation: 0.0,
            scale: MIN_SCALE,
            speed: MIN_SPEED,
            rotation_speed: 0.0,
            frame: 0
        };
        object.respawn(mode, rng);
        object
    }

    /// Re-rolls everything but the accumulated rotation, in place.
    pub fn respawn(&mut self, mode: SpawnMode, rng: &mut impl Rng) {
        self.frame = rng.gen_range(0..FRAME_COUNT);

        let lateral_spread = STAR_SPREAD * LATERAL_FRACTION;
        let z = match mode {
            SpawnMode::Initial => rng.gen::<f32>() * -STAR_SPREAD,
            SpawnMode::Steady => -STAR_SPREAD * (1.0 - FAR_BAND + rng.gen::<f32>() * FAR_BAND)
        };
        self.position = vec3(
            (rng.gen::<f32>() - 0.5) * lateral_spread,
            (rng.gen::<f32>() - 0.5) * lateral_spread,
            z
        );

        self.scale = MIN_SCALE + rng.gen::<f32>() * SCALE_RANGE;
        self.rotation_speed = (rng.gen::<f32>() - 0.5) * ROTATION_SPEED_RANGE;
        self.speed = MIN_SPEED + rng.gen::<f32>() * SPEED_RANGE;
    }

    /// Returns `true` when the object respawned this frame.
    pub fn update(&mut self, camera_z: f32, rng: &mut impl Rng) -> bool {
        self.position.z += self.speed;
        self.rotation += self.rotation_speed;

        let progress = depth_progress(self.position.z);
        self.position.x += self.position.x * progress * OBJECT_DRIFT;
        self.position.y += self.position.y * progress * OBJECT_DRIFT;

        if self.position.z > camera_z + RESPAWN_MARGIN {
            self.respawn(SpawnMode::Steady, rng);
            true
        } else {
            false
        }
    }
}

/// Fixed pool of space objects living for the whole session.
pub struct SpaceObjectPool {
    objects: [SpaceObject; SPACE_OBJECT_COUNT]
}

impl SpaceObjectPool {
    pub fn new(rng: &mut impl Rng) -> Self {
        let mut objects = [SpaceObject::spawned(SpawnMode::Initial, rng); SPACE_OBJECT_COUNT];
        for object in objects.iter_mut().skip(1) {
            object.respawn(SpawnMode::Initial, rng);
        }
        Self { objects }
    }

    pub fn objects(&self) -> &[SpaceObject] {
        &self.objects
    }

    pub fn update(&mut self, camera_z: f32, rng: &mut impl Rng) {
        for object in self.objects.iter_mut() {
            if object.update(camera_z, rng) {
                log::trace!("space object respawned with frame {}", object.frame);
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn objects_mut(&mut self) -> &mut [SpaceObject] {
        &mut self.objects
    }
}
