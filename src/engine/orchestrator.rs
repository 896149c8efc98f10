//! Configuration pass: walks producers in execution order and checkpoints
//! settings after every producer that changed them.

use crate::engine::registry::Registry;
use crate::error::EngineError;
use crate::producer::ConfigureOutcome;
use crate::settings::{ConfigStore, ConfigureOptions, Configuration};
use tracing::{debug, info, warn};

/// Run every producer's configure step in order and return the final settings.
///
/// Settings are saved to `store` right after each producer that changed them,
/// so a cancellation at step N keeps everything decided in steps 1..N-1.
/// Cancellation stops the pass and is returned as `ConfigurationCancelled`;
/// any other step error is logged and the pass moves on.
pub async fn run_config_prompts(
    registry: &Registry,
    store: &dyn ConfigStore,
    config: Configuration,
    options: &ConfigureOptions,
) -> Result<Configuration, EngineError> {
    let order = registry.execution_order()?;
    let mut current = config;
    let mut checkpoints = 0usize;

    for id in &order {
        let Some(producer) = registry.get(id.as_str()) else {
            continue;
        };
        debug!(producer = %id, reset = options.reset, "Configuring producer");

        match producer.configure(current.clone(), options).await {
            Ok(ConfigureOutcome::Completed(updated)) => {
                if updated == current {
                    continue;
                }
                store.save(&updated)?;
                checkpoints += 1;
                debug!(producer = %id, "Settings checkpoint saved");
                current = updated;
            }
            Ok(ConfigureOutcome::Cancelled) => {
                warn!(
                    producer = %id,
                    checkpoints,
                    "Configuration cancelled; earlier choices are kept"
                );
                return Err(EngineError::ConfigurationCancelled(id.clone()));
            }
            Err(err) => {
                warn!(producer = %id, error = %err, "Configuration step failed; continuing");
            }
        }
    }

    info!(producers = order.len(), checkpoints, "Configuration pass complete");
    Ok(current)
}
