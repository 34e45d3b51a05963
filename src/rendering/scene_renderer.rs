use glam::{vec2, Vec3};
use crate::rendering::blittable::{Rgba, SizedSurface};
use crate::rendering::shapes::blend_rectangle;
use crate::rendering::sprite_sheet::SpriteSheet;
use crate::rendering::transform::Transform;
use crate::rendering::FrameBuffer;
use crate::scene::camera::PerspectiveCamera;
use crate::scene::gradient::GradientTexture;
use crate::scene::space_objects::SpaceObject;
use crate::scene::Scene;

pub const STAR_SIZE: f32 = 1.5;
pub const STAR_OPACITY: f32 = 0.9;
pub const STAR_COLOR: Rgba = [255, 255, 255, 255];
/// Same cap GL implementations put on point sprites.
pub const MAX_STAR_PIXELS: f32 = 64.0;
/// Texels at or below this alpha are discarded.
pub const ALPHA_TEST: f32 = 0.01;

/// Draws the background, then sprites and the star cloud back to front.
pub fn render_scene(frame: &mut FrameBuffer, scene: &Scene, sheet: &SpriteSheet) {
    let camera = scene.camera();
    render_background(frame, scene.background().texture());

    let mut sprites: Vec<(f32, &SpaceObject)> = scene
        .space_objects()
        .objects()
        .iter()
        .map(|it| (camera.z() - it.position.z, it))
        .collect();
    sprites.sort_by(|a, b| b.0.total_cmp(&a.0));

    // the star cloud sits at the origin and is sorted as a single object
    let cloud_distance = camera.z();
    let (behind, in_front): (Vec<_>, Vec<_>) = sprites
        .into_iter()
        .partition(|(distance, _)| *distance >= cloud_distance);

    for (_, object) in behind {
        draw_sprite(frame, camera, sheet, object);
    }
    for star in scene.stars().stars() {
        draw_star(frame, camera, star);
    }
    for (_, object) in in_front {
        draw_sprite(frame, camera, sheet, object);
    }
}

pub(crate) fn render_background(frame: &mut FrameBuffer, texture: &GradientTexture) {
    let (width, height) = (frame.get_width() as i32, frame.get_height() as i32);
    for y in 0..height {
        let color = texture.sample((y as f32 + 0.5) / height as f32);
        for x in 0..width {
            frame.put_pixel(x, y, color);
        }
    }
}

pub(crate) fn draw_star(frame: &mut FrameBuffer, camera: &PerspectiveCamera, position: Vec3) {
    let projected = match camera.project(position) {
        Some(it) => it,
        None => return
    };
    let (_, viewport_height) = camera.viewport();
    let size = (STAR_SIZE * viewport_height as f32 * 0.5 / projected.distance).min(MAX_STAR_PIXELS);

    if size < 1.0 {
        // sub-pixel points fade by their covered area
        frame.blend_pixel(
            projected.x.floor() as i32,
            projected.y.floor() as i32,
            STAR_COLOR,
            STAR_OPACITY * size * size
        );
        return;
    }

    let half = size * 0.5;
    blend_rectangle(
        frame,
        (projected.x - half).round() as i32,
        (projected.y - half).round() as i32,
        size.round() as u32,
        size.round() as u32,
        STAR_COLOR,
        STAR_OPACITY
    );
}

pub(crate) fn draw_sprite(
    frame: &mut FrameBuffer,
    camera: &PerspectiveCamera,
    sheet: &SpriteSheet,
    object: &SpaceObject
) {
    let projected = match camera.project(object.position) {
        Some(it) => it,
        None => return
    };
    let size = object.scale * camera.pixels_per_unit(projected.distance);
    let transform = Transform::from_angle_translation_scale(
        -object.rotation,
        (projected.x, projected.y),
        (size, size)
    );
    let inverse = match transform.inverse() {
        Some(it) => it,
        None => return
    };

    let (min, max) = transform.unit_quad_bounds();
    let left = (min.x.floor() as i32).max(0);
    let top = (min.y.floor() as i32).max(0);
    let right = (max.x.ceil() as i32).min(frame.get_width() as i32);
    let bottom = (max.y.ceil() as i32).min(frame.get_height() as i32);

    for y in top..bottom {
        for x in left..right {
            let local = inverse.transform_point2(vec2(x as f32 + 0.5, y as f32 + 0.5));
            if local.x.abs() > 0.5 || local.y.abs() > 0.5 {
                continue;
            }
            let texel = sheet.sample(object.frame, local.x + 0.5, local.y + 0.5);
            if texel[3] as f32 / 255.0 <= ALPHA_TEST {
                continue;
            }
            frame.blend_pixel(x, y, texel, 1.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec3;
    use crate::config::SceneConfig;
    use crate::rendering::CLEAR_COLOR;

    const RED: Rgba = [255, 0, 0, 255];
    const GREEN: Rgba = [0, 255, 0, 255];

    fn sheet_with(frames: [Rgba; 5]) -> SpriteSheet {
        SpriteSheet::from_rgba(5, 1, frames.to_vec(), 5).unwrap()
    }

    fn object_at(position: Vec3, frame: usize) -> SpaceObject {
        SpaceObject {
            position,
            rotation: 0.3,
            scale: 3.0,
            speed: 1.0,
            rotation_speed: 0.0,
            frame
        }
    }

    #[test]
    fn background_runs_from_dark_top_to_lighter_bottom() {
        let mut frame = FrameBuffer::new(8, 64);
        let texture = GradientTexture::generate(250.0);
        render_background(&mut frame, &texture);
        let top = frame.get_pixel(4, 0).unwrap();
        let bottom = frame.get_pixel(4, 63).unwrap();
        assert_eq!(top, texture.rows()[0]);
        assert!(bottom[2] > top[2]);
        assert_eq!(frame.get_pixel(0, 63), frame.get_pixel(7, 63));
    }

    #[test]
    fn near_star_covers_several_pixels() {
        let camera = PerspectiveCamera::new(64, 64);
        let mut frame = FrameBuffer::new(64, 64);
        draw_star(&mut frame, &camera, vec3(0.0, 0.0, -5.0));
        let lit = frame.pixels().iter().filter(|it| it[0] > 200).count();
        // 1.5 * 32 / 10 rounds to a 5 px square
        assert_eq!(lit, 25);
        assert!(frame.get_pixel(32, 32).unwrap()[0] > 200);
    }

    #[test]
    fn distant_star_is_faint() {
        let camera = PerspectiveCamera::new(64, 64);
        let mut frame = FrameBuffer::new(64, 64);
        draw_star(&mut frame, &camera, vec3(0.0, 0.0, -995.0));
        let pixel = frame.get_pixel(32, 32).unwrap();
        assert!(pixel[0] > 0 && pixel[0] < 20, "{:?}", pixel);
    }

    #[test]
    fn star_behind_camera_is_skipped() {
        let camera = PerspectiveCamera::new(64, 64);
        let mut frame = FrameBuffer::new(64, 64);
        draw_star(&mut frame, &camera, vec3(0.0, 0.0, 6.0));
        assert!(frame.pixels().iter().all(|it| *it == CLEAR_COLOR));
    }

    #[test]
    fn sprite_samples_its_own_frame() {
        let camera = PerspectiveCamera::new(64, 64);
        let sheet = sheet_with([[0; 4], [0; 4], RED, [0; 4], [0; 4]]);
        let mut frame = FrameBuffer::new(64, 64);
        draw_sprite(&mut frame, &camera, &sheet, &object_at(Vec3::ZERO, 2));
        assert_eq!(frame.get_pixel(32, 32), Some(RED));
        assert_eq!(frame.get_pixel(0, 0), Some(CLEAR_COLOR));
    }

    #[test]
    fn transparent_texels_are_discarded() {
        let camera = PerspectiveCamera::new(64, 64);
        let sheet = sheet_with([[0; 4], [9, 9, 9, 2], RED, RED, RED]);
        let mut frame = FrameBuffer::new(64, 64);
        draw_sprite(&mut frame, &camera, &sheet, &object_at(Vec3::ZERO, 0));
        draw_sprite(&mut frame, &camera, &sheet, &object_at(Vec3::ZERO, 1));
        assert!(frame.pixels().iter().all(|it| *it == CLEAR_COLOR));
    }

    #[test]
    fn nearer_sprite_is_drawn_last() {
        let config = SceneConfig { seed: Some(3), star_count: 0, ..SceneConfig::default() };
        let mut scene = Scene::new(&config, 64, 64);
        {
            let objects = scene.space_objects_mut().objects_mut();
            for object in objects.iter_mut() {
                *object = object_at(vec3(0.0, 0.0, -1500.0), 0);
            }
            objects[0] = object_at(vec3(0.0, 0.0, 2.0), 3);
            objects[1] = object_at(vec3(0.0, 0.0, -3.0), 2);
        }
        let sheet = sheet_with([[0; 4], [0; 4], RED, GREEN, [0; 4]]);
        let mut frame = FrameBuffer::new(64, 64);
        render_scene(&mut frame, &scene, &sheet);
        assert_eq!(frame.get_pixel(32, 32), Some(GREEN));
    }

    #[test]
    fn seeded_scene_renders_stars() {
        let config = SceneConfig { seed: Some(11), ..SceneConfig::default() };
        let scene = Scene::new(&config, 96, 64);
        let sheet = SpriteSheet::procedural(5, 16);
        let mut frame = FrameBuffer::new(96, 64);
        render_scene(&mut frame, &scene, &sheet);
        let bright = frame.pixels().iter().filter(|it| it[0] > 40).count();
        assert!(bright > 0);
    }
}
