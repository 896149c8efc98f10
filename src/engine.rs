//! Producer orchestration engine
//!
//! Registers producers, orders them by declared dependency, drives the
//! configuration pass and the execution pass, and merges the emitted fragments
//! into one ordered sequence. Each `Engine` is an independent run context;
//! nothing is shared between instances.

use crate::error::EngineError;
use crate::fragment::ContentFragment;
use crate::producer::{Producer, ProducerId};
use crate::settings::{ConfigStore, ConfigureOptions, Configuration};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::info;

pub mod executor;
pub mod orchestrator;
pub mod registry;
pub mod resolver;

pub use executor::{ExecutionReport, StepOutcome};
pub use registry::Registry;

pub struct Engine {
    registry: Registry,
    store: Arc<dyn ConfigStore>,
}

impl Engine {
    /// Create an engine that checkpoints settings into `store`
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self {
            registry: Registry::new(),
            store,
        }
    }

    pub fn register(&mut self, producer: Arc<dyn Producer>) -> Result<(), EngineError> {
        self.registry.register(producer)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Settings fields that any display surface must mask
    pub fn sensitive_fields(&self) -> BTreeSet<String> {
        self.registry.sensitive_fields()
    }

    pub fn execution_order(&self) -> Result<Vec<ProducerId>, EngineError> {
        self.registry.execution_order()
    }

    /// Current settings from the store
    pub fn load_settings(&self) -> Result<Configuration, EngineError> {
        Ok(self.store.load()?)
    }

    pub async fn run_config_prompts(
        &self,
        config: Configuration,
        options: &ConfigureOptions,
    ) -> Result<Configuration, EngineError> {
        orchestrator::run_config_prompts(&self.registry, self.store.as_ref(), config, options)
            .await
    }

    /// Execute all producers and return the ordered fragment sequence
    pub async fn execute(&self, config: &Configuration) -> Result<Vec<ContentFragment>, EngineError> {
        Ok(self.execute_with_report(config).await?.fragments)
    }

    pub async fn execute_with_report(
        &self,
        config: &Configuration,
    ) -> Result<ExecutionReport, EngineError> {
        executor::execute(&self.registry, config).await
    }

    /// End this engine's lifecycle and release its producers
    pub fn shutdown(self) {
        info!(producers = self.registry.len(), "Engine shut down");
    }
}
