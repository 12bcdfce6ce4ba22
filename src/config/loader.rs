use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::types::Config;
use crate::ui::pagination::PageSize;

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
    /// Uses `~/.config/auction-admin/config.toml` on Unix/macOS,
    /// or equivalent on other platforms via `dirs::config_dir()`.
    /// Falls back to current directory if config_dir is unavailable.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("auction-admin").join("config.toml")
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
            tracing::debug!(path = %path.display(), "config file missing, using defaults");
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
    /// - `ui.default_page_size` is one of the selectable page sizes
    /// - `ui.tick_rate_ms` is non-zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_url = self.api.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "api.base_url '{}' must start with http:// or https://",
                    self.api.base_url
                ),
            });
        }

        if PageSize::from_u32(self.ui.default_page_size).is_none() {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "ui.default_page_size must be one of 5, 10, 15 (got {})",
                    self.ui.default_page_size
                ),
            });
        }

        if self.ui.tick_rate_ms == 0 {
            return Err(ConfigError::ValidationError {
                message: "ui.tick_rate_ms must be greater than zero".to_string(),
            });
        }

        Ok(())
    }

    /// Page size a freshly mounted list screen starts with.
    pub fn default_page_size(&self) -> PageSize {
        PageSize::from_u32(self.ui.default_page_size).unwrap_or_default()
    }
}
