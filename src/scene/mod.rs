pub mod camera;
pub mod gradient;
pub mod space_objects;
pub mod starfield;

use rand::SeedableRng;
use rand::rngs::StdRng;
use crate::config::SceneConfig;
use crate::params::SceneParams;
use crate::resources::ResourceRegistry;
use camera::PerspectiveCamera;
use gradient::BackgroundGradient;
use space_objects::SpaceObjectPool;
use starfield::StarField;

/// Everything the per-frame tick animates. Owns no windowing or GPU state.
pub struct Scene {
    camera: PerspectiveCamera,
    registry: ResourceRegistry,
    background: BackgroundGradient,
    stars: StarField,
    space_objects: SpaceObjectPool,
    rng: StdRng
}

impl Scene {
    pub fn new(config: &SceneConfig, width: u32, height: u32) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy()
        };
        let mut registry = ResourceRegistry::new();
        let background = BackgroundGradient::new(config.base_hue, &mut registry);
        let stars = StarField::new(config.star_count, &mut rng, &mut registry);
        let space_objects = SpaceObjectPool::new(&mut rng);
        Self {
            camera: PerspectiveCamera::new(width, height),
            registry,
            background,
            stars,
            space_objects,
            rng
        }
    }

    pub fn tick(&mut self, params: &SceneParams) {
        self.background.advance(params.hue_shift_speed(), &mut self.registry);
        let camera_z = self.camera.z();
        self.stars.update(params.star_speed(), camera_z, &mut self.rng);
        self.space_objects.update(camera_z, &mut self.rng);
    }

    pub fn rebuild_stars(&mut self, count: usize) {
        self.stars.rebuild(count, &mut self.rng, &mut self.registry);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.resize(width, height);
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn background(&self) -> &BackgroundGradient {
        &self.background
    }

    pub fn stars(&self) -> &StarField {
        &self.stars
    }

    pub fn space_objects(&self) -> &SpaceObjectPool {
        &self.space_objects
    }

    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    #[cfg(test)]
    pub(crate) fn space_objects_mut(&mut self) -> &mut SpaceObjectPool {
        &mut self.space_objects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::resources::ResourceKind;

    fn seeded_config() -> SceneConfig {
        SceneConfig { seed: Some(42), ..SceneConfig::default() }
    }

    #[test]
    fn new_scene_follows_config() {
        let scene = Scene::new(&seeded_config(), 320, 200);
        assert_eq!(scene.stars().len(), 1500);
        assert_eq!(scene.space_objects().objects().len(), 5);
        assert_relative_eq!(scene.background().hue(), gradient::BASE_HUE);
        assert_eq!(scene.camera().viewport(), (320, 200));
    }

    #[test]
    fn tick_advances_hue_by_shift_speed() {
        let mut scene = Scene::new(&seeded_config(), 320, 200);
        let params = SceneParams::default();
        for _ in 0..10 {
            scene.tick(&params);
        }
        assert_relative_eq!(scene.background().hue(), gradient::BASE_HUE + 0.3, epsilon = 1e-3);
    }

    #[test]
    fn repeated_ticks_and_rebuilds_do_not_leak() {
        let mut scene = Scene::new(&seeded_config(), 320, 200);
        let params = SceneParams::default();
        for count in [3000, 100, 1500] {
            scene.rebuild_stars(count);
            scene.tick(&params);
            scene.tick(&params);
        }
        assert_eq!(scene.registry().live_count(ResourceKind::Texture), 1);
        assert_eq!(scene.registry().live_count(ResourceKind::Geometry), 1);
    }

    #[test]
    fn same_seed_gives_same_scene() {
        let mut first = Scene::new(&seeded_config(), 320, 200);
        let mut second = Scene::new(&seeded_config(), 320, 200);
        let params = SceneParams::default();
        for _ in 0..5 {
            first.tick(&params);
            second.tick(&params);
        }
        assert_eq!(first.stars().positions(), second.stars().positions());
        assert_eq!(first.space_objects().objects(), second.space_objects().objects());
    }
}
