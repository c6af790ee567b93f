use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::types::Config;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

impl Config {
    /// Returns the path to the configuration file.
    ///
    /// Uses `~/.config/multiverso-hub/config.toml` on Linux, or the
    /// equivalent via `dirs::config_dir()`. Falls back to the current
    /// directory if config_dir is unavailable.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("multiverso-hub").join("config.toml")
    }

    /// Loads configuration from the default config file.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Loads configuration from `path`.
    ///
    /// - A missing file yields `Config::default()`.
    /// - Otherwise the file is parsed as TOML and validated.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// Checks:
    /// - `api.base_url` is an http(s) URL
    /// - timeouts and telemetry capacity are non-zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_url = self.api.base_url.trim();
        if base_url.is_empty() {
            return Err(ConfigError::ValidationError {
                message: "api.base_url must not be empty".to_string(),
            });
        }

        match reqwest::Url::parse(base_url) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            Ok(url) => {
                return Err(ConfigError::ValidationError {
                    message: format!("api.base_url has unsupported scheme '{}'", url.scheme()),
                });
            }
            Err(e) => {
                return Err(ConfigError::ValidationError {
                    message: format!("api.base_url '{}' is not a valid URL: {}", base_url, e),
                });
            }
        }

        if self.api.timeout_seconds == 0 || self.api.connect_timeout_seconds == 0 {
            return Err(ConfigError::ValidationError {
                message: "api timeouts must be greater than zero".to_string(),
            });
        }

        if self.telemetry.capacity == 0 {
            return Err(ConfigError::ValidationError {
                message: "telemetry.capacity must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}
