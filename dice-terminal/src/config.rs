use dice_core::{DampingFunction, LightConfig, LightModel, RotationChannel, ShadingStage};
use nalgebra::Vector3;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Errors raised while loading the configuration file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration loaded from an optional TOML file
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub light: LightSection,
    #[serde(default)]
    pub animation: AnimationSection,
    #[serde(default)]
    pub render: RenderSection,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LightSection {
    pub power: f32,
    pub shininess: f32,
    /// Eye-space point the light direction is computed against
    pub direction: [f32; 3],
    pub model: LightModel,
    pub damping: DampingFunction,
    pub shading: ShadingStage,
}

impl Default for LightSection {
    fn default() -> Self {
        let light = LightConfig::default();
        Self {
            power: light.power,
            shininess: light.shininess,
            direction: light.direction.into(),
            model: light.model,
            damping: light.damping,
            shading: light.shading,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AnimationSection {
    /// Channel driven by the arrow keys at startup
    pub channel: RotationChannel,
}

impl Default for AnimationSection {
    fn default() -> Self {
        Self {
            channel: RotationChannel::PedestalPivot,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RenderSection {
    pub target_fps: u32,
    /// Width of a character cell divided by its height
    pub cell_aspect: f32,
}

impl Default for RenderSection {
    fn default() -> Self {
        Self {
            target_fps: 30,
            cell_aspect: 0.5,
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.render.target_fps == 0 {
            return Err(ConfigError::Invalid("render.target_fps must be positive".into()));
        }
        if !(self.render.cell_aspect > 0.0) {
            return Err(ConfigError::Invalid("render.cell_aspect must be positive".into()));
        }
        if !self.light.power.is_finite() || !self.light.shininess.is_finite() {
            return Err(ConfigError::Invalid("light values must be finite".into()));
        }
        Ok(())
    }

    pub fn light_config(&self) -> LightConfig {
        LightConfig {
            power: self.light.power,
            direction: Vector3::from(self.light.direction),
            shininess: self.light.shininess,
            model: self.light.model,
            damping: self.light.damping,
            shading: self.light.shading,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.light_config(), LightConfig::default());
        assert_eq!(config.animation.channel, RotationChannel::PedestalPivot);
        assert_eq!(config.render.target_fps, 30);
        assert_eq!(config.render.cell_aspect, 0.5);
    }

    #[test]
    fn test_partial_sections() {
        let config = AppConfig::from_toml_str(
            r#"
            [light]
            model = "cel_shaded"
            damping = "squared"
            power = 0.8

            [animation]
            channel = "world_pivot"
            "#,
        )
        .unwrap();
        let light = config.light_config();
        assert_eq!(light.model, LightModel::CelShaded);
        assert_eq!(light.damping, DampingFunction::Squared);
        assert_eq!(light.power, 0.8);
        assert_eq!(light.shininess, 16.0);
        assert_eq!(light.shading, ShadingStage::Fragment);
        assert_eq!(config.animation.channel, RotationChannel::WorldPivot);
    }

    #[test]
    fn test_unknown_model_is_rejected() {
        let result = AppConfig::from_toml_str("[light]\nmodel = \"blinn\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_zero_fps_is_rejected() {
        let result = AppConfig::from_toml_str("[render]\ntarget_fps = 0\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = AppConfig::load(Path::new("/nonexistent/dice.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
