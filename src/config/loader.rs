use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::types::Config;

/// Environment variable naming an alternative config file.
pub const CONFIG_ENV: &str = "DEXEC_CONFIG";

/// Environment variable overriding `defaults.timeout_seconds`.
pub const TIMEOUT_ENV: &str = "DEXEC_TIMEOUT";

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
    /// `$DEXEC_CONFIG` if set, otherwise `dexec/config.toml` under
    /// `dirs::config_dir()`. Falls back to the current directory if
    /// config_dir is unavailable.
    pub fn config_path() -> PathBuf {
        if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
            return PathBuf::from(path);
        }
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("dexec").join("config.toml")
    }

    /// Loads configuration from the default config file.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Loads configuration from `path`.
    ///
    /// - If the file doesn't exist, returns `Config::default()`.
    /// - If the file exists, parses it as TOML and validates.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
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

    /// Apply environment overrides, reading variables through `lookup`.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(TIMEOUT_ENV) {
            self.defaults.timeout_seconds =
                raw.trim()
                    .parse()
                    .map_err(|_| ConfigError::ValidationError {
                        message: format!(
                            "{} must be a whole number of seconds, got '{}'",
                            TIMEOUT_ENV, raw
                        ),
                    })?;
        }
        Ok(self)
    }

    /// Validates the configuration.
    ///
    /// Checks:
    /// - The runtime binary is not empty
    /// - The ping timeout is positive
    /// - Image rows have a bare extension and an untagged repository
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.defaults.docker_bin.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "docker_bin must not be empty".to_string(),
            });
        }

        if self.defaults.ping_timeout_seconds == 0 {
            return Err(ConfigError::ValidationError {
                message: "ping_timeout_seconds must be greater than 0".to_string(),
            });
        }

        for entry in &self.images {
            if entry.extension.is_empty() || entry.extension.starts_with('.') {
                return Err(ConfigError::ValidationError {
                    message: format!(
                        "Image extension '{}' must be non-empty and have no leading dot",
                        entry.extension
                    ),
                });
            }

            let tagged = entry
                .repository
                .rsplit_once(':')
                .is_some_and(|(_, tag)| !tag.contains('/'));
            if entry.repository.is_empty() || tagged {
                return Err(ConfigError::ValidationError {
                    message: format!(
                        "Image repository '{}' for extension '{}' must be non-empty and untagged; use 'version'",
                        entry.repository, entry.extension
                    ),
                });
            }
        }

        Ok(())
    }
}
