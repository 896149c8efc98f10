//! CLI parse: clap types for Quire. No behavior; definitions only.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Quire - assemble one document from dependency-ordered content producers
#[derive(Parser)]
#[command(name = "quire")]
#[command(about = "Assemble one document from dependency-ordered content producers")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DocumentFormat {
    Markdown,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List producers in execution order
    Producers {
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Walk every producer's settings questions, saving after each producer
    Configure {
        /// Ask again for fields that were already answered or declined
        #[arg(long)]
        reset: bool,
        /// Take answers from QUIRE_SET_* environment variables instead of prompting
        #[arg(long)]
        non_interactive: bool,
    },
    /// Show current settings with sensitive values masked
    Settings {
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Run all eligible producers and render the document
    Build {
        /// Write the document here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long, value_enum, default_value = "markdown")]
        format: DocumentFormat,
    },
}
