use glam::{Mat3A, Vec2, vec2};

/// Screen-space placement of a unit quad: scale, then rotate, then translate.
#[derive(Copy, Clone)]
pub struct Transform {
    translation: (f32, f32),
    rotation: f32,
    scale: (f32, f32),
    pub(crate) matrix: Mat3A
}

impl Transform {
    pub fn from_angle_translation_scale(angle: f32, translation: (f32, f32), scale: (f32, f32)) -> Self {
        let mut transform = Self {
            translation,
            rotation: angle,
            scale,
            matrix: Mat3A::IDENTITY
        };
        transform.actualize_matrix();
        transform
    }

    fn actualize_matrix(&mut self) {
        self.matrix =
            Mat3A::from_translation(vec2(self.translation.0, self.translation.1)) *
                Mat3A::from_angle(self.rotation) *
                Mat3A::from_scale(vec2(self.scale.0, self.scale.1))
    }

    pub fn transform_point(&self, point: Vec2) -> Vec2 {
        self.matrix.transform_point2(point)
    }

    /// Maps screen positions back into quad-local space, `None` for a degenerate scale.
    pub fn inverse(&self) -> Option<Mat3A> {
        if self.scale.0 == 0.0 || self.scale.1 == 0.0 {
            return None;
        }
        Some(self.matrix.inverse())
    }

    /// Screen bounds `(min, max)` of the quad spanning `-0.5..0.5` on both axes.
    pub fn unit_quad_bounds(&self) -> (Vec2, Vec2) {
        let corners = [
            vec2(-0.5, -0.5),
            vec2(0.5, -0.5),
            vec2(0.5, 0.5),
            vec2(-0.5, 0.5)
        ].map(|it| self.transform_point(it));
        let min = corners.iter().fold(Vec2::splat(f32::MAX), |acc, it| acc.min(*it));
        let max = corners.iter().fold(Vec2::splat(f32::MIN), |acc, it| acc.max(*it));
        (min, max)
    }
}
