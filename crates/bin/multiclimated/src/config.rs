//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `multiclimate.toml` in the working directory, or the file named
//! by `MULTICLIMATE_CONFIG`. Every field has a sensible default so the file
//! is optional. Environment variables take precedence over file values.

use multiclimate_adapter_virtual::{VirtualConfig, VirtualError};
use multiclimate_domain::system::SystemApplication;
use serde::Deserialize;

const DEFAULT_PATH: &str = "multiclimate.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Controller settings.
    pub system: SystemConfig,
    /// Seed of the virtual installation; empty means the demo installation.
    pub installation: VirtualConfig,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Controller configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    /// Firmware family, which decides the zone mode table.
    pub application: SystemApplication,
}

impl Config {
    /// Load configuration from the config file (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// result does not validate.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("MULTICLIMATE_CONFIG").unwrap_or_else(|_| DEFAULT_PATH.into());
        let mut config = Self::from_file(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(
        &mut self,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(val) = var("MULTICLIMATE_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("MULTICLIMATE_APPLICATION") {
            self.system.application = val
                .parse()
                .map_err(|err| ConfigError::Validation(format!("{err}")))?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.logging.filter.trim().is_empty() {
            return Err(ConfigError::Validation(
                "logging filter must not be empty".to_string(),
            ));
        }
        self.installation.validate()?;
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "multiclimated=info,multiclimate=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// The `[installation]` table is inconsistent.
    #[error("invalid installation")]
    Installation(#[from] VirtualError),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
