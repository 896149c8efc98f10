//! Application Configuration
//!
//! Layered configuration for the command-line shell: defaults, the global file,
//! the workspace file, then `QUIRE__`-prefixed environment variables. Producer
//! settings are separate and live in the settings store.

use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::settings::TomlConfigStore;
use config::{Config, ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod sources;

pub use sources::global_file::global_config_path;
pub use sources::workspace_file::{workspace_config_path, WORKSPACE_CONFIG_FILE};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Settings file location (defaults to the user config directory)
    #[serde(default)]
    pub settings_path: Option<PathBuf>,

    /// Rendered document options
    #[serde(default)]
    pub document: DocumentConfig,

    /// Producer identities that should not be registered
    #[serde(default)]
    pub disabled: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentConfig {
    #[serde(default = "default_title")]
    pub title: String,

    /// Output file; stdout when unset
    #[serde(default)]
    pub output: Option<PathBuf>,
}

fn default_title() -> String {
    "Project digest".to_string()
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            output: None,
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.document.title.trim().is_empty() {
            return Err(ApiError::ConfigError(
                "document.title cannot be empty".to_string(),
            ));
        }
        if let Some(blank) = self.disabled.iter().find(|id| id.trim().is_empty()) {
            return Err(ApiError::ConfigError(format!(
                "disabled contains an empty producer identity: {:?}",
                blank
            )));
        }
        Ok(())
    }

    /// Settings file path; relative paths are anchored at `workspace_root`
    pub fn resolve_settings_path(&self, workspace_root: &Path) -> PathBuf {
        match &self.settings_path {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => workspace_root.join(path),
            None => TomlConfigStore::default_path(),
        }
    }

    pub fn is_disabled(&self, producer_id: &str) -> bool {
        self.disabled.iter().any(|id| id == producer_id)
    }
}

/// Loads `AppConfig` from its layered sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Defaults, global file, workspace file, environment
    pub fn load(workspace_root: &Path) -> Result<AppConfig, ApiError> {
        let builder = builder_with_defaults()?;
        let builder = sources::global_file::add_to_builder(builder)?;
        let builder = sources::workspace_file::add_to_builder(builder, workspace_root)?;
        Self::finish(builder)
    }

    /// Defaults, then exactly `path`, then environment
    pub fn load_from_file(path: &Path) -> Result<AppConfig, ApiError> {
        if !path.exists() {
            return Err(ApiError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let builder = builder_with_defaults()?.add_source(File::from(path));
        Self::finish(builder)
    }

    fn finish(builder: ConfigBuilder<config::builder::DefaultState>) -> Result<AppConfig, ApiError> {
        let config = builder
            .add_source(
                Environment::with_prefix("QUIRE")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;
        let app: AppConfig = config.try_deserialize()?;
        app.validate()?;
        Ok(app)
    }
}

fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ApiError> {
    Ok(Config::builder()
        .set_default("document.title", default_title())?
        .set_default("logging.level", "warn")?)
}
