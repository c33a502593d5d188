/// Render configuration, loadable from TOML
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::shading::Light;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Output raster width in pixels
    pub width: u32,
    /// Output raster height in pixels
    pub height: u32,
    /// Distance to the projection plane
    pub near: f32,
    /// Depth the buffer is reset to; nothing drawn beyond it
    pub far: f32,
    /// Plane-to-NDC scale factor
    pub ndc_scale: f32,
    /// Initial distance of the camera from the origin along +Z
    pub camera_distance: f32,
    /// Camera movement per key press
    pub camera_step: f32,
    /// Model rotation per key press
    pub rotation_step_degrees: f32,
    /// Checker tiles per unit of surface coordinate
    pub checker_tiles: u32,
    pub lights: Vec<Light>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 500,
            height: 500,
            near: 1.0,
            far: 1000.0,
            ndc_scale: 2.0,
            camera_distance: 5.0,
            camera_step: 0.5,
            rotation_step_degrees: 10.0,
            checker_tiles: 10,
            lights: Light::default_rig(),
        }
    }
}

impl RenderConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        let config = Self::from_toml_str(&contents)?;
        log::info!("Loaded configuration from '{}'", path.display());
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }

    fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::Config("raster size must be non-zero".into()));
        }
        if !(self.near > 0.0 && self.far > self.near) {
            return Err(Error::Config(format!(
                "expected 0 < near < far, got near = {} and far = {}",
                self.near, self.far
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RenderConfig::default();
        assert_eq!((config.width, config.height), (500, 500));
        assert_eq!(config.far, 1000.0);
        assert_eq!(config.checker_tiles, 10);
        assert_eq!(config.lights.len(), 2);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = RenderConfig::from_toml_str("width = 320\nheight = 200\n").unwrap();
        assert_eq!(config.width, 320);
        assert_eq!(config.height, 200);
        assert_eq!(config.near, 1.0);
        assert_eq!(config.lights, Light::default_rig());
    }

    #[test]
    fn test_lights_from_toml() {
        let source = r#"
[[lights]]
ka = 1.0
kd = 1.0
ke = 0.0
shininess = 8.0
ambient = [0.1, 0.1, 0.1]
diffuse = [1.0, 1.0, 1.0]
specular = [1.0, 1.0, 1.0]
position = [0.0, 5.0, 0.0]
"#;
        let config = RenderConfig::from_toml_str(source).unwrap();
        assert_eq!(config.lights.len(), 1);
        assert_eq!(config.lights[0].position, [0.0, 5.0, 0.0]);
        assert_eq!(config.lights[0].shininess, 8.0);
    }

    #[test]
    fn test_round_trip_through_toml() {
        let config = RenderConfig::default();
        let text = config.to_toml_string().unwrap();
        assert_eq!(RenderConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_invalid_planes_rejected() {
        assert!(matches!(
            RenderConfig::from_toml_str("near = 10.0\nfar = 5.0\n"),
            Err(Error::Config(_))
        ));
        assert!(RenderConfig::from_toml_str("width = 0\n").is_err());
        assert!(RenderConfig::from_toml_str("width = \"wide\"\n").is_err());
    }
}
