/// Mutable per-session view state read by the transform composer
use crate::color::Rgb;
use crate::config::ViewerConfig;
use crate::error::LinalgError;
use crate::geometry::MeshBounds;
use crate::linalg::{check_scalar, vec3};

/// Positional light in spherical coordinates around the mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightParams {
    /// Degrees around the +Y axis, measured from +X towards +Z
    pub azimuth: f32,
    /// Degrees above the XZ plane; 90 is straight up. Measured from the
    /// horizon, not from the +Y pole.
    pub elevation: f32,
    /// Multiple of the mesh bounding radius
    pub distance: f32,
}

impl LightParams {
    /// Reject non-finite angles or distance.
    pub fn validate(&self) -> Result<(), LinalgError> {
        check_scalar("light_position", "azimuth", self.azimuth)?;
        check_scalar("light_position", "elevation", self.elevation)?;
        check_scalar("light_position", "distance", self.distance)?;
        Ok(())
    }
}

impl Default for LightParams {
    fn default() -> Self {
        Self {
            azimuth: 45.0,
            elevation: 30.0,
            distance: 1.5,
        }
    }
}

/// Phong material terms packed into the uniform block
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub ambient: Rgb,
    pub diffuse: Rgb,
    pub specular: Rgb,
    pub specular_power: f32,
}

impl Material {
    /// Reject non-finite colour channels or exponent.
    pub fn validate(&self) -> Result<(), LinalgError> {
        vec3::from_slice("material", "ambient", &self.ambient.0)?;
        vec3::from_slice("material", "diffuse", &self.diffuse.0)?;
        vec3::from_slice("material", "specular", &self.specular.0)?;
        check_scalar("material", "specular_power", self.specular_power)?;
        Ok(())
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: Rgb([25.0 / 255.0; 3]),
            diffuse: Rgb([0.0, 0.0, 1.0]),
            specular: Rgb::WHITE,
            specular_power: 32.0,
        }
    }
}

/// Everything the input layer can change between frames.
///
/// Owned by the host; input handlers take `&mut`, the composer takes `&`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformState {
    /// Accumulated rotation about X, in radians
    pub rot_x: f32,
    /// Accumulated rotation about Y, in radians
    pub rot_y: f32,
    /// Camera distance along +Z
    pub camera_z: f32,
    pub light: LightParams,
    pub material: Material,
}

impl TransformState {
    pub fn new(camera_z: f32) -> Self {
        Self {
            rot_x: 0.0,
            rot_y: 0.0,
            camera_z,
            light: LightParams::default(),
            material: Material::default(),
        }
    }

    /// Initial state for a freshly loaded mesh: camera backed off far enough
    /// to frame the whole bounding sphere.
    pub fn framing(config: &ViewerConfig, bounds: &MeshBounds) -> Self {
        let camera_z = config
            .camera
            .projection()
            .framing_distance(bounds.radius, config.input.initial_distance);

        Self {
            rot_x: 0.0,
            rot_y: 0.0,
            camera_z,
            light: config.light.params(),
            material: config.material.material(),
        }
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.rot_x += dx;
        self.rot_y += dy;
    }
}

impl Default for TransformState {
    fn default() -> Self {
        Self::new(5.0)
    }
}
