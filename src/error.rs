//! Error types for the Quire document assembly engine.

use crate::producer::ProducerId;
use thiserror::Error;

/// Errors that escape the engine's public operations.
///
/// Per-producer step failures never appear here; they are logged and turned
/// into "this producer contributed nothing".
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Duplicate producer identity: {0}")]
    DuplicateIdentity(ProducerId),

    #[error("Circular dependency involving producer: {0}")]
    CircularDependency(ProducerId),

    #[error("Configuration cancelled by operator at producer: {0}")]
    ConfigurationCancelled(ProducerId),

    #[error("Settings store error: {0}")]
    Store(#[from] StoreError),
}

/// Errors raised by a producer's configure, eligibility or run step
#[derive(Debug, Error)]
pub enum ProducerError {
    #[error("Producer step failed: {0}")]
    Failed(String),

    #[error("Prompt failed: {0}")]
    Prompt(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Could not parse {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ProducerError {
    fn from(err: reqwest::Error) -> Self {
        ProducerError::Http(err.to_string())
    }
}

/// Settings persistence errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Settings I/O error at {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Failed to parse settings: {0}")]
    Deserialize(#[from] toml::de::Error),
}

/// Application shell errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Output error: {0}")]
    OutputError(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl ApiError {
    /// True when the operator deliberately withdrew from a configuration pass
    pub fn is_cancellation(&self) -> bool {
        matches!(
            self,
            ApiError::Engine(EngineError::ConfigurationCancelled(_))
        )
    }
}
