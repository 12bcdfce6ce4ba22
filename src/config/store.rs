//! Shared configuration storage.
//!
//! The TUI and the API worker share one store; reload replaces it atomically.
//! The worker rebuilds its HTTP client before the next request when `[api]`
//! changed.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::loader::ConfigError;
use crate::config::types::Config;

/// Thread-safe config container with interior mutability.
#[derive(Clone)]
pub struct ConfigStore {
    inner: Arc<RwLock<Config>>,
    path: PathBuf,
}

impl ConfigStore {
    /// Create a new ConfigStore from initial config and path.
    pub fn new(config: Config, path: PathBuf) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
            path,
        }
    }

    /// Get a clone of the current config.
    pub fn get(&self) -> Config {
        self.inner.read().clone()
    }

    /// Reload config from the file.
    ///
    /// On success, atomically replaces the current config.
    /// On failure, keeps the old config and returns the error.
    pub fn reload(&self) -> Result<(), ConfigError> {
        let config = Config::load_from(&self.path)?;
        *self.inner.write() = config;
        Ok(())
    }

    /// Get the config file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reload_keeps_old_config_on_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api]\nbase_url = \"http://a.example\"\n").unwrap();

        let store = ConfigStore::new(Config::load_from(&path).unwrap(), path.clone());
        assert_eq!(store.get().api.base_url, "http://a.example");

        std::fs::write(&path, "[api]\nbase_url = \"not a url\"\n").unwrap();
        assert!(store.reload().is_err());
        assert_eq!(store.get().api.base_url, "http://a.example");

        std::fs::write(&path, "[api]\nbase_url = \"https://b.example\"\n").unwrap();
        store.reload().unwrap();
        assert_eq!(store.get().api.base_url, "https://b.example");
    }
}
