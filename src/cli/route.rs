//! CLI route: builds the engine for a workspace and dispatches commands.

use crate::cli::parse::{Commands, DocumentFormat, OutputFormat};
use crate::cli::presentation::{
    format_outcome_summary, format_producers_json, format_producers_text, format_settings_json,
    format_settings_text,
};
use crate::config::{AppConfig, ConfigLoader};
use crate::engine::Engine;
use crate::error::ApiError;
use crate::producer::ProducerDescriptor;
use crate::producers::builtin_producers;
use crate::prompt::{Prompter, StaticPrompter, TerminalPrompter};
use crate::render::render_markdown;
use crate::settings::{ConfigStore, ConfigureOptions, TomlConfigStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Per-invocation context: workspace, loaded app config and settings store
pub struct RunContext {
    workspace: PathBuf,
    config: AppConfig,
    store: Arc<dyn ConfigStore>,
}

impl RunContext {
    pub fn new(workspace: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = match config_path {
            Some(path) => ConfigLoader::load_from_file(&path)?,
            None => ConfigLoader::load(&workspace)?,
        };
        let settings_path = config.resolve_settings_path(&workspace);
        debug!(settings = %settings_path.display(), "Using settings file");
        Ok(Self::with_store(
            workspace,
            config,
            Arc::new(TomlConfigStore::new(settings_path)),
        ))
    }

    /// Context over an explicit settings store
    pub fn with_store(workspace: PathBuf, config: AppConfig, store: Arc<dyn ConfigStore>) -> Self {
        Self {
            workspace,
            config,
            store,
        }
    }

    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    /// Fresh engine with every enabled built-in producer registered
    pub fn build_engine(&self, prompter: Arc<dyn Prompter>) -> Result<Engine, ApiError> {
        let mut engine = Engine::new(Arc::clone(&self.store));
        for producer in builtin_producers(prompter, &self.workspace) {
            let id = producer.descriptor().id.clone();
            if self.config.is_disabled(id.as_str()) {
                info!(producer = %id, "Producer disabled by configuration");
                continue;
            }
            engine.register(producer)?;
        }
        Ok(engine)
    }

    pub async fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Producers { format } => self.handle_producers(*format),
            Commands::Configure {
                reset,
                non_interactive,
            } => self.handle_configure(*reset, *non_interactive).await,
            Commands::Settings { format } => self.handle_settings(*format),
            Commands::Build { output, format } => self.handle_build(output.as_deref(), *format).await,
        }
    }

    fn handle_producers(&self, format: OutputFormat) -> Result<String, ApiError> {
        let engine = self.build_engine(Arc::new(StaticPrompter::new()))?;
        let order = engine.execution_order()?;
        let ordered: Vec<&ProducerDescriptor> = order
            .iter()
            .filter_map(|id| engine.registry().get(id.as_str()))
            .map(|p| p.descriptor())
            .collect();
        match format {
            OutputFormat::Text => Ok(format_producers_text(&ordered)),
            OutputFormat::Json => format_producers_json(&ordered),
        }
    }

    async fn handle_configure(&self, reset: bool, non_interactive: bool) -> Result<String, ApiError> {
        let prompter: Arc<dyn Prompter> = if non_interactive {
            Arc::new(StaticPrompter::from_env())
        } else {
            Arc::new(TerminalPrompter::new())
        };
        let engine = self.build_engine(prompter)?;
        let options = ConfigureOptions { reset };

        let current = engine.load_settings()?;
        let updated = engine.run_config_prompts(current, &options).await?;
        let masked = updated.mask(&engine.sensitive_fields());
        engine.shutdown();

        Ok(format!(
            "Settings saved ({} fields).\n{}",
            masked.len(),
            format_settings_text(&masked)
        ))
    }

    fn handle_settings(&self, format: OutputFormat) -> Result<String, ApiError> {
        let engine = self.build_engine(Arc::new(StaticPrompter::new()))?;
        let settings = engine.load_settings()?;
        let masked = settings.mask(&engine.sensitive_fields());
        match format {
            OutputFormat::Text => Ok(format_settings_text(&masked)),
            OutputFormat::Json => format_settings_json(&masked),
        }
    }

    async fn handle_build(
        &self,
        output: Option<&Path>,
        format: DocumentFormat,
    ) -> Result<String, ApiError> {
        let engine = self.build_engine(Arc::new(StaticPrompter::new()))?;
        let settings = engine.load_settings()?;
        let report = engine.execute_with_report(&settings).await?;
        engine.shutdown();
        info!(
            steps = report.outcomes.len(),
            failed = report.failed().count(),
            fragments = report.fragments.len(),
            tokens = report.total_tokens(),
            "Build finished"
        );
        // Stdout may carry the document itself, so the operator summary goes to stderr.
        eprintln!("{}", format_outcome_summary(&report));

        let document = match format {
            DocumentFormat::Markdown => render_markdown(
                &self.config.document.title,
                &report.fragments,
                chrono::Utc::now(),
            ),
            DocumentFormat::Json => serde_json::to_string_pretty(&report.fragments)
                .map_err(|e| ApiError::OutputError(e.to_string()))?,
        };

        let target = output
            .map(Path::to_path_buf)
            .or_else(|| self.config.document.output.clone())
            .map(|path| self.workspace.join(path));
        match target {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        ApiError::OutputError(format!(
                            "Failed to create {}: {}",
                            parent.display(),
                            e
                        ))
                    })?;
                }
                std::fs::write(&path, document.as_bytes()).map_err(|e| {
                    ApiError::OutputError(format!("Failed to write {}: {}", path.display(), e))
                })?;
                Ok(format!(
                    "Wrote {} sections to {}",
                    report.fragments.len(),
                    path.display()
                ))
            }
            None => Ok(document),
        }
    }
}
