//! Settings persistence port and its adapters.

use super::Configuration;
use crate::error::StoreError;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Load and save the producer settings. Both operations are atomic as far as
/// the engine is concerned.
pub trait ConfigStore: Send + Sync {
    fn load(&self) -> Result<Configuration, StoreError>;
    fn save(&self, config: &Configuration) -> Result<(), StoreError>;
}

/// TOML file under the user's config directory
pub struct TomlConfigStore {
    path: PathBuf,
}

impl TomlConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$XDG_CONFIG_HOME/quire/settings.toml`, falling back to the working
    /// directory when no home directory can be determined.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("", "", "quire")
            .map(|dirs| dirs.config_dir().join("settings.toml"))
            .unwrap_or_else(|| PathBuf::from(".quire").join("settings.toml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl ConfigStore for TomlConfigStore {
    fn load(&self) -> Result<Configuration, StoreError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No settings file yet, starting empty");
            return Ok(Configuration::new());
        }
        let content = std::fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        Ok(toml::from_str(&content)?)
    }

    fn save(&self, config: &Configuration) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }
        let content = toml::to_string_pretty(config)?;

        // Rename over the old file so readers never see a half-written one
        let tmp_path = self.path.with_extension("toml.tmp");
        std::fs::write(&tmp_path, content.as_bytes()).map_err(|e| self.io_error(e))?;
        std::fs::rename(&tmp_path, &self.path).map_err(|e| self.io_error(e))?;

        debug!(path = %self.path.display(), fields = config.len(), "Settings saved");
        Ok(())
    }
}

/// In-memory store that records every save
#[derive(Default)]
pub struct MemoryConfigStore {
    current: Mutex<Configuration>,
    saves: Mutex<Vec<Configuration>>,
}

impl MemoryConfigStore {
    pub fn new(initial: Configuration) -> Self {
        Self {
            current: Mutex::new(initial),
            saves: Mutex::new(Vec::new()),
        }
    }

    /// Every configuration passed to `save`, oldest first
    pub fn saves(&self) -> Vec<Configuration> {
        self.saves.lock().clone()
    }

    pub fn save_count(&self) -> usize {
        self.saves.lock().len()
    }
}

impl ConfigStore for MemoryConfigStore {
    fn load(&self) -> Result<Configuration, StoreError> {
        Ok(self.current.lock().clone())
    }

    fn save(&self, config: &Configuration) -> Result<(), StoreError> {
        *self.current.lock() = config.clone();
        self.saves.lock().push(config.clone());
        Ok(())
    }
}
