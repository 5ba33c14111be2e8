//! Viewer configuration (`objview.toml`)
//!
//! Camera clip planes, initial light and material values, and input
//! sensitivities. Every field has a default, so a config file only needs to
//! name the values it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::error::ConfigError;
use crate::projection::Projection;
use crate::transform::{LightParams, Material};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ViewerConfig {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub light: LightConfig,
    #[serde(default)]
    pub material: MaterialConfig,
    #[serde(default)]
    pub input: InputConfig,
}

/// Perspective camera settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Vertical field of view in degrees (default: 45)
    #[serde(default = "default_fov_y_degrees")]
    pub fov_y_degrees: f32,
    /// Near clip plane (default: 0.1)
    #[serde(default = "default_near")]
    pub near: f32,
    /// Far clip plane (default: 1000)
    #[serde(default = "default_far")]
    pub far: f32,
}

/// Initial light placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightConfig {
    /// Degrees around +Y (default: 45)
    #[serde(default = "default_azimuth")]
    pub azimuth: f32,
    /// Degrees above the XZ plane, so 90 is straight up for any azimuth
    /// (default: 30). This is measured from the horizon, not from the +Y
    /// pole, so 30 sits lower than a pole-angle of 30 would.
    #[serde(default = "default_elevation")]
    pub elevation: f32,
    /// Multiple of the mesh radius (default: 1.5)
    #[serde(default = "default_light_distance")]
    pub distance: f32,
}

/// Initial material colours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialConfig {
    #[serde(default = "default_ambient")]
    pub ambient: Rgb,
    #[serde(default = "default_diffuse")]
    pub diffuse: Rgb,
    #[serde(default = "default_specular")]
    pub specular: Rgb,
    /// Phong exponent (default: 32)
    #[serde(default = "default_specular_power")]
    pub specular_power: f32,
    /// Clear colour for backends that have one (default: #808080)
    #[serde(default = "default_background")]
    pub background: Rgb,
}

/// Orbit and zoom sensitivities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Radians of rotation per pixel dragged (default: 0.01)
    #[serde(default = "default_drag_sensitivity")]
    pub drag_sensitivity: f32,
    /// Zoom step as a fraction of the mesh radius (default: 0.2)
    #[serde(default = "default_zoom_step")]
    pub zoom_step: f32,
    /// Closest camera distance in mesh radii (default: 0.5)
    #[serde(default = "default_min_zoom")]
    pub min_zoom: f32,
    /// Farthest camera distance in mesh radii (default: 10)
    #[serde(default = "default_max_zoom")]
    pub max_zoom: f32,
    /// Margin applied to the framing distance at load (default: 1.2)
    #[serde(default = "default_initial_distance")]
    pub initial_distance: f32,
    /// Degrees per light adjustment keypress (default: 5)
    #[serde(default = "default_light_step")]
    pub light_step: f32,
}

fn default_fov_y_degrees() -> f32 {
    45.0
}
fn default_near() -> f32 {
    Projection::DEFAULT_NEAR
}
fn default_far() -> f32 {
    Projection::DEFAULT_FAR
}

fn default_azimuth() -> f32 {
    45.0
}
fn default_elevation() -> f32 {
    30.0
}
fn default_light_distance() -> f32 {
    1.5
}

fn default_ambient() -> Rgb {
    Rgb([25.0 / 255.0; 3])
}
fn default_diffuse() -> Rgb {
    Rgb([0.0, 0.0, 1.0])
}
fn default_specular() -> Rgb {
    Rgb::WHITE
}
fn default_specular_power() -> f32 {
    32.0
}
fn default_background() -> Rgb {
    Rgb([128.0 / 255.0; 3])
}

fn default_drag_sensitivity() -> f32 {
    0.01
}
fn default_zoom_step() -> f32 {
    0.2
}
fn default_min_zoom() -> f32 {
    0.5
}
fn default_max_zoom() -> f32 {
    10.0
}
fn default_initial_distance() -> f32 {
    1.2
}
fn default_light_step() -> f32 {
    5.0
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: default_fov_y_degrees(),
            near: default_near(),
            far: default_far(),
        }
    }
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            azimuth: default_azimuth(),
            elevation: default_elevation(),
            distance: default_light_distance(),
        }
    }
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            ambient: default_ambient(),
            diffuse: default_diffuse(),
            specular: default_specular(),
            specular_power: default_specular_power(),
            background: default_background(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            drag_sensitivity: default_drag_sensitivity(),
            zoom_step: default_zoom_step(),
            min_zoom: default_min_zoom(),
            max_zoom: default_max_zoom(),
            initial_distance: default_initial_distance(),
            light_step: default_light_step(),
        }
    }
}

impl CameraConfig {
    pub fn projection(&self) -> Projection {
        Projection {
            fov_y: self.fov_y_degrees.to_radians(),
            near: self.near,
            far: self.far,
        }
    }
}

impl LightConfig {
    pub fn params(&self) -> LightParams {
        LightParams {
            azimuth: self.azimuth,
            elevation: self.elevation,
            distance: self.distance,
        }
    }
}

impl MaterialConfig {
    pub fn material(&self) -> Material {
        Material {
            ambient: self.ambient,
            diffuse: self.diffuse,
            specular: self.specular,
            specular_power: self.specular_power,
        }
    }
}

impl ViewerConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load from `path`. A missing file is an error; use
    /// [`ViewerConfig::default`] when no config was requested.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_matches_viewer_defaults() {
        let config = ViewerConfig::default();
        assert_eq!(config.light.params(), LightParams::default());
        assert_eq!(config.material.material(), Material::default());
        assert!((config.camera.projection().fov_y - std::f32::consts::FRAC_PI_4).abs() < 1e-6);
        assert_eq!(config.material.background.to_hex(), "#808080");
    }

    #[test]
    fn test_round_trip() {
        let config = ViewerConfig::default();
        let text = config.to_toml_string().unwrap();
        assert!(text.contains("diffuse = \"#0000ff\""));
        assert_eq!(ViewerConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config = ViewerConfig::from_toml_str(
            r##"
            [light]
            azimuth = 120.0

            [material]
            diffuse = "#ff0000"
            "##,
        )
        .unwrap();

        assert_eq!(config.light.azimuth, 120.0);
        assert_eq!(config.light.elevation, 30.0);
        assert_eq!(config.material.diffuse, Rgb([1.0, 0.0, 0.0]));
        assert_eq!(config.input, InputConfig::default());
    }

    #[test]
    fn test_bad_color_rejected() {
        let err = ViewerConfig::from_toml_str("[material]\nambient = \"blue\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[input]\nzoom_step = 0.5").unwrap();

        let config = ViewerConfig::load(file.path()).unwrap();
        assert_eq!(config.input.zoom_step, 0.5);

        let err = ViewerConfig::load(file.path().with_extension("missing")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
