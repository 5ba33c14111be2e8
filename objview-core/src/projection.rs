/// Camera projection settings and viewport mapping
use crate::error::LinalgError;
use crate::linalg::{mat4, Mat4};

/// Fixed perspective parameters for the orbit camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Vertical field of view in radians
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Projection {
    pub const DEFAULT_FOV_Y: f32 = std::f32::consts::FRAC_PI_4; // 45 degrees
    pub const DEFAULT_NEAR: f32 = 0.1;
    pub const DEFAULT_FAR: f32 = 1000.0;

    pub fn matrix(&self, aspect: f32) -> Result<Mat4, LinalgError> {
        mat4::perspective(self.fov_y, aspect, self.near, self.far)
    }

    /// Camera distance at which a sphere of `radius` fills the vertical
    /// field of view, scaled by `margin`.
    pub fn framing_distance(&self, radius: f32, margin: f32) -> f32 {
        radius / (self.fov_y / 2.0).tan() * margin
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov_y: Self::DEFAULT_FOV_Y,
            near: Self::DEFAULT_NEAR,
            far: Self::DEFAULT_FAR,
        }
    }
}

/// Size of the render target in pixels (or terminal cells).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Map a homogeneous clip-space point to screen space.
    ///
    /// Returns `(x, y, depth)` with `y` growing downwards, or `None` when
    /// the point is behind the camera or outside the view volume.
    pub fn clip_to_screen(&self, clip: [f32; 4]) -> Option<(f32, f32, f32)> {
        let w = clip[3];
        // Prevent division by near-zero depth values
        if w < 1e-6 {
            return None;
        }

        let ndc_x = clip[0] / w;
        let ndc_y = clip[1] / w;
        let depth = clip[2] / w;

        if !(-1.0..=1.0).contains(&ndc_x) || !(-1.0..=1.0).contains(&ndc_y) || !(-1.0..=1.0).contains(&depth) {
            return None;
        }

        let screen_x = (ndc_x + 1.0) * 0.5 * self.width as f32;
        let screen_y = (1.0 - ndc_y) * 0.5 * self.height as f32;

        Some((screen_x, screen_y, depth))
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800, 600)
    }
}
