//! Logging System
//!
//! Structured logging using the `tracing` crate. Logs go to stderr by default so
//! that stdout stays free for the rendered document.

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text
    #[serde(default = "default_format")]
    pub format: String,

    /// Output destination: stderr, file
    #[serde(default = "default_output")]
    pub output: String,

    /// Log file path (if output is "file")
    #[serde(default = "default_log_file")]
    pub file: PathBuf,

    /// Enable colored output (text format on stderr only)
    #[serde(default = "default_true")]
    pub color: bool,

    /// Module-specific log levels
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_output() -> String {
    "stderr".to_string()
}

fn default_log_file() -> PathBuf {
    PathBuf::from(".quire/quire.log")
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_format(),
            output: default_output(),
            file: default_log_file(),
            color: default_true(),
            modules: HashMap::new(),
        }
    }
}

/// Initialize the logging system
///
/// Priority order (highest to lowest):
/// 1. Environment variables (QUIRE_LOG, QUIRE_LOG_FORMAT, QUIRE_LOG_OUTPUT)
/// 2. Config (file settings with CLI flags already applied)
/// 3. Defaults
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<(), ApiError> {
    let filter = build_env_filter(config)?;
    let format = determine_format(config)?;
    let output = determine_output(config)?;
    let use_color = config.map(|c| c.color).unwrap_or(true);

    let base_subscriber = Registry::default().with(filter);

    let open_file = || -> Result<std::fs::File, ApiError> {
        let log_file = config
            .map(|c| c.file.clone())
            .unwrap_or_else(default_log_file);
        if let Some(parent) = log_file.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ApiError::ConfigError(format!("Failed to create log directory: {}", e))
            })?;
        }
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .map_err(|e| {
                ApiError::ConfigError(format!("Failed to open log file {:?}: {}", log_file, e))
            })
    };

    let installed = match (format, output) {
        (LogFormat::Json, LogOutput::File) => base_subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(open_file()?),
            )
            .try_init(),
        (LogFormat::Json, LogOutput::Stderr) => base_subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        (LogFormat::Text, LogOutput::File) => base_subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(false)
                    .with_writer(open_file()?),
            )
            .try_init(),
        (LogFormat::Text, LogOutput::Stderr) => base_subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(use_color)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    installed.map_err(|e| ApiError::ConfigError(format!("Failed to install logger: {}", e)))
}

/// Build environment filter from config or environment variables
fn build_env_filter(config: Option<&LoggingConfig>) -> Result<EnvFilter, ApiError> {
    if let Ok(filter) = EnvFilter::try_from_env("QUIRE_LOG") {
        return Ok(filter);
    }

    let level = config.map(|c| c.level.as_str()).unwrap_or("warn");
    if level == "off" {
        return Ok(EnvFilter::new("off"));
    }

    let mut filter = EnvFilter::new(level);
    if let Some(config) = config {
        for (module, module_level) in &config.modules {
            let directive = format!("{}={}", module, module_level);
            filter = filter.add_directive(
                directive
                    .parse()
                    .map_err(|e| ApiError::ConfigError(format!("Invalid log directive: {}", e)))?,
            );
        }
    }
    Ok(filter)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogOutput {
    Stderr,
    File,
}

/// Determine output format from environment or config
fn determine_format(config: Option<&LoggingConfig>) -> Result<LogFormat, ApiError> {
    if let Ok(format) = std::env::var("QUIRE_LOG_FORMAT") {
        if let Ok(parsed) = parse_format(&format) {
            return Ok(parsed);
        }
    }
    parse_format(config.map(|c| c.format.as_str()).unwrap_or("text"))
}

fn parse_format(format: &str) -> Result<LogFormat, ApiError> {
    match format {
        "text" => Ok(LogFormat::Text),
        "json" => Ok(LogFormat::Json),
        other => Err(ApiError::ConfigError(format!(
            "Invalid log format: {} (must be 'json' or 'text')",
            other
        ))),
    }
}

/// Determine output destination from environment or config
fn determine_output(config: Option<&LoggingConfig>) -> Result<LogOutput, ApiError> {
    if let Ok(output) = std::env::var("QUIRE_LOG_OUTPUT") {
        return parse_output(&output);
    }
    parse_output(config.map(|c| c.output.as_str()).unwrap_or("stderr"))
}

fn parse_output(output: &str) -> Result<LogOutput, ApiError> {
    match output {
        "stderr" => Ok(LogOutput::Stderr),
        "file" => Ok(LogOutput::File),
        other => Err(ApiError::ConfigError(format!(
            "Invalid log output: {} (must be 'stderr' or 'file')",
            other
        ))),
    }
}
