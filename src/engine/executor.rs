//! Execution pass: runs eligible producers in order, isolates failures and
//! aggregates the fragments they emit.

use crate::engine::registry::Registry;
use crate::error::{EngineError, ProducerError};
use crate::fragment::{aggregate, total_tokens, ContentFragment};
use crate::producer::{DependencyView, ProducerId, ProducerOutput, ProducerResult};
use crate::settings::Configuration;
use futures::FutureExt;
use serde::Serialize;
use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, error, info};

/// What happened to one producer during an execution pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepOutcome {
    /// Eligibility check returned false
    Skipped,
    /// Ran and had nothing to contribute
    Empty,
    /// Ran and recorded an output for dependents
    Produced { fragments: usize },
    /// Eligibility check or run failed; output withheld
    Failed { error: String },
}

/// Result of one execution pass
#[derive(Debug, Clone, Default)]
pub struct ExecutionReport {
    /// Aggregated fragments, ordered by priority then execution order
    pub fragments: Vec<ContentFragment>,
    /// One entry per registered producer, in execution order
    pub outcomes: Vec<(ProducerId, StepOutcome)>,
}

impl ExecutionReport {
    pub fn outcome(&self, id: &str) -> Option<&StepOutcome> {
        self.outcomes
            .iter()
            .find(|(pid, _)| pid.as_str() == id)
            .map(|(_, outcome)| outcome)
    }

    pub fn failed(&self) -> impl Iterator<Item = (&ProducerId, &str)> {
        self.outcomes.iter().filter_map(|(id, outcome)| match outcome {
            StepOutcome::Failed { error } => Some((id, error.as_str())),
            _ => None,
        })
    }

    pub fn total_tokens(&self) -> usize {
        total_tokens(&self.fragments)
    }
}

/// Execute every registered producer once, in dependency order.
///
/// Only resolution errors escape. A failing producer is logged, its output is
/// not recorded, and its dependents simply see no entry for it.
pub async fn execute(
    registry: &Registry,
    config: &Configuration,
) -> Result<ExecutionReport, EngineError> {
    let order = registry.execution_order()?;
    let mut recorded: HashMap<ProducerId, Arc<ProducerOutput>> = HashMap::new();
    let mut emitted: Vec<ContentFragment> = Vec::new();
    let mut outcomes = Vec::with_capacity(order.len());

    for id in order {
        let Some(producer) = registry.get(id.as_str()) else {
            continue;
        };
        let deps = DependencyView::restricted(&producer.descriptor().needs, &recorded);

        let eligible = std::panic::catch_unwind(AssertUnwindSafe(|| {
            producer.is_eligible(config, &deps)
        }))
        .unwrap_or_else(|panic| Err(panicked(panic)));

        let outcome = match eligible {
            Ok(false) => {
                debug!(producer = %id, visible = deps.len(), "Producer not eligible, skipping");
                StepOutcome::Skipped
            }
            Err(err) => {
                error!(producer = %id, error = %err, "Eligibility check failed");
                StepOutcome::Failed {
                    error: err.to_string(),
                }
            }
            Ok(true) => {
                let run = AssertUnwindSafe(producer.run(config, &deps))
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|panic| Err(panicked(panic)));
                match run {
                    Ok(None) => {
                        debug!(producer = %id, "Producer had nothing to contribute");
                        StepOutcome::Empty
                    }
                    Ok(Some(ProducerResult { fragments, output })) => {
                        let count = fragments.len();
                        debug!(
                            producer = %id,
                            fragments = count,
                            output = output.kind(),
                            "Producer output recorded"
                        );
                        emitted.extend(fragments);
                        recorded.insert(id.clone(), Arc::new(output));
                        StepOutcome::Produced { fragments: count }
                    }
                    Err(err) => {
                        error!(producer = %id, error = %err, "Producer run failed; output withheld");
                        StepOutcome::Failed {
                            error: err.to_string(),
                        }
                    }
                }
            }
        };
        outcomes.push((id, outcome));
    }

    let fragments = aggregate(emitted);
    let report = ExecutionReport {
        fragments,
        outcomes,
    };
    info!(
        producers = report.outcomes.len(),
        fragments = report.fragments.len(),
        failed = report.failed().count(),
        estimated_tokens = report.total_tokens(),
        "Execution pass complete"
    );
    Ok(report)
}

fn panicked(panic: Box<dyn Any + Send>) -> ProducerError {
    let message = panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    ProducerError::Failed(format!("panicked: {message}"))
}
