use glam::{Mat4, Vec3, vec3};

pub const FOV_Y_DEGREES: f32 = 75.0;
pub const NEAR: f32 = 0.1;
pub const FAR: f32 = 2000.0;
pub const CAMERA_Z: f32 = 5.0;

/// Viewport dimensions never drop below this, so the aspect ratio stays finite.
pub const MIN_VIEWPORT: u32 = 16;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Projected {
    pub x: f32,
    pub y: f32,
    /// Distance in front of the camera along the view axis.
    pub distance: f32
}

#[derive(Clone, Debug)]
pub struct PerspectiveCamera {
    position: Vec3,
    width: u32,
    height: u32,
    view_projection: Mat4
}

impl PerspectiveCamera {
    pub fn new(width: u32, height: u32) -> Self {
        let mut camera = Self {
            position: vec3(0.0, 0.0, CAMERA_Z),
            width: MIN_VIEWPORT,
            height: MIN_VIEWPORT,
            view_projection: Mat4::IDENTITY
        };
        camera.resize(width, height);
        camera
    }

    pub fn z(&self) -> f32 {
        self.position.z
    }

    pub fn viewport(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width.max(MIN_VIEWPORT);
        self.height = height.max(MIN_VIEWPORT);
        let projection = Mat4::perspective_rh_gl(
            FOV_Y_DEGREES.to_radians(),
            self.aspect(),
            NEAR,
            FAR
        );
        self.view_projection = projection * Mat4::from_translation(-self.position);
    }

    /// Maps a world position to viewport pixels, `None` when it is outside the depth range.
    pub fn project(&self, point: Vec3) -> Option<Projected> {
        let clip = self.view_projection * point.extend(1.0);
        let distance = clip.w;
        if distance <= NEAR || distance >= FAR {
            return None;
        }
        let ndc = clip.truncate() / distance;
        Some(Projected {
            x: (ndc.x + 1.0) * 0.5 * self.width as f32,
            y: (1.0 - ndc.y) * 0.5 * self.height as f32,
            distance
        })
    }

    /// How many viewport pixels one world unit spans at `distance`.
    pub fn pixels_per_unit(&self, distance: f32) -> f32 {
        let half_fov_tan = (FOV_Y_DEGREES.to_radians() * 0.5).tan();
        self.height as f32 / (2.0 * half_fov_tan * distance.max(NEAR))
    }
}
