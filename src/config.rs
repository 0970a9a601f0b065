use crate::heightfield::{GridSpec, NoiseParams};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration limit violated: {0}")]
    Limit(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub grid: GridSettings,
    pub noise: NoiseSettings,
    pub limits: LimitSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridSettings {
    pub width: u32,
    pub length: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoiseSettings {
    pub scale: f64,
    pub height_multiplier: f64,
    pub octaves: u32,
    pub persistence: f64,
    pub lacunarity: f64,
}

/// Upper bounds for the generation parameters.
///
/// Policy bounds, not invariants: deployments can raise them in the
/// config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitSettings {
    pub max_width: u32,
    pub max_length: u32,
    pub max_octaves: u32,
    pub max_scale: f64,
    pub max_height_multiplier: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            grid: GridSettings {
                width: 64,
                length: 64,
            },
            noise: NoiseSettings {
                scale: 8.0,
                height_multiplier: 2.0,
                octaves: 2,
                persistence: 0.5,
                lacunarity: 2.0,
            },
            limits: LimitSettings {
                max_width: 100,
                max_length: 100,
                max_octaves: 16,
                max_scale: 10.0,
                max_height_multiplier: 5.0,
            },
            logging: LoggingSettings {
                level: "info".to_string(),
            },
        }
    }
}

impl GeneratorConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: GeneratorConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            eprintln!("Failed to load config: {}, using defaults", e);
            Self::default()
        })
    }

    /// Enforce the configured limits before generation runs.
    ///
    /// Grid dimensions below 1 are rejected here as well, so the core never
    /// sees them. A non-positive noise scale is deliberately NOT an error;
    /// the noise field clamps it to a small epsilon.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.width < 1 || self.grid.width > self.limits.max_width {
            return Err(ConfigError::Limit(format!(
                "grid.width must be in [1, {}], got {}",
                self.limits.max_width, self.grid.width
            )));
        }
        if self.grid.length < 1 || self.grid.length > self.limits.max_length {
            return Err(ConfigError::Limit(format!(
                "grid.length must be in [1, {}], got {}",
                self.limits.max_length, self.grid.length
            )));
        }
        if self.noise.octaves < 1 || self.noise.octaves > self.limits.max_octaves {
            return Err(ConfigError::Limit(format!(
                "noise.octaves must be in [1, {}], got {}",
                self.limits.max_octaves, self.noise.octaves
            )));
        }
        if self.noise.scale > self.limits.max_scale && self.limits.max_scale > 0.0 {
            return Err(ConfigError::Limit(format!(
                "noise.scale must be at most {}, got {}",
                self.limits.max_scale, self.noise.scale
            )));
        }
        if self.noise.height_multiplier < 0.0
            || self.noise.height_multiplier > self.limits.max_height_multiplier
        {
            return Err(ConfigError::Limit(format!(
                "noise.height_multiplier must be in [0, {}], got {}",
                self.limits.max_height_multiplier, self.noise.height_multiplier
            )));
        }
        if self.noise.persistence <= 0.0 {
            return Err(ConfigError::Limit(format!(
                "noise.persistence must be positive, got {}",
                self.noise.persistence
            )));
        }
        if self.noise.lacunarity <= 0.0 {
            return Err(ConfigError::Limit(format!(
                "noise.lacunarity must be positive, got {}",
                self.noise.lacunarity
            )));
        }
        Ok(())
    }

    pub fn grid_spec(&self) -> GridSpec {
        GridSpec::new(self.grid.width, self.grid.length)
    }

    pub fn noise_params(&self) -> NoiseParams {
        NoiseParams {
            scale: self.noise.scale,
            height_multiplier: self.noise.height_multiplier,
            octaves: self.noise.octaves,
            persistence: self.noise.persistence,
            lacunarity: self.noise.lacunarity,
        }
    }
}
