use std::path::{Path, PathBuf};

use builder::Configuration;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO Error")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Parse Error")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Invalid TOML error")]
    Invalid { message: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub build: BuildSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildSection {
    pub small_change_bytes: u32,
    pub max_waste_ratio: f64,
    pub max_external_ratio: f64,
}

impl Default for BuildSection {
    fn default() -> Self {
        BuildSection {
            small_change_bytes: 4096,
            max_waste_ratio: 0.25,
            max_external_ratio: 0.05,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingSection {
    pub dir: Option<PathBuf>,
}

impl Default for CliConfig {
    fn default() -> Self {
        CliConfig {
            build: BuildSection::default(),
            logging: LoggingSection::default(),
        }
    }
}

impl CliConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();
        let text = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io {
            path: path.clone(),
            source: e,
        })?;

        let cfg: CliConfig = toml::from_str(&text).map_err(|e| ConfigError::ParseToml {
            path: path.clone(),
            source: e,
        })?;

        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.build.small_change_bytes == 0 {
            return Err(ConfigError::Invalid {
                message: "build.small_change_bytes must be positive".to_string(),
            });
        }
        if self.build.max_waste_ratio < 0.0 {
            return Err(ConfigError::Invalid {
                message: "build.max_waste_ratio must not be negative".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.build.max_external_ratio) {
            return Err(ConfigError::Invalid {
                message: "build.max_external_ratio must be between 0.0 and 1.0".to_string(),
            });
        }
        Ok(())
    }

    pub fn to_build_configuration(&self) -> Configuration {
        Configuration::new(
            self.build.small_change_bytes,
            self.build.max_waste_ratio,
            self.build.max_external_ratio,
        )
    }
}
