//! Built-in producers
//!
//! Small collaborators that feed the engine: local commit history, open pull
//! requests from the code host, an operator-maintained notes file, a
//! contributor tally and a headline overview.

use crate::error::ProducerError;
use crate::producer::{ConfigureOutcome, Producer};
use crate::prompt::{PromptReply, Prompter};
use crate::settings::{ConfigureOptions, Configuration};
use std::path::Path;
use std::sync::Arc;

pub mod contributors;
pub mod history;
pub mod notes;
pub mod overview;
pub mod pulls;

pub use contributors::ContributorsProducer;
pub use history::HistoryProducer;
pub use notes::NotesProducer;
pub use overview::OverviewProducer;
pub use pulls::PullRequestsProducer;

/// Fragment priorities of the built-in producers
pub mod priority {
    pub const OVERVIEW: i32 = 0;
    pub const HISTORY: i32 = 20;
    pub const PULLS: i32 = 25;
    pub const NOTES: i32 = 30;
    pub const CONTRIBUTORS: i32 = 40;
}

/// One settings question asked by a producer's configure step
#[derive(Debug, Clone, Copy)]
pub struct Question {
    pub field: &'static str,
    pub text: &'static str,
    pub secret: bool,
}

/// Ask every question whose field still needs an answer and record replies.
///
/// Each question runs on the blocking pool since a prompter may wait on the
/// terminal. Stops at the first cancellation; answers given earlier in the
/// same step are discarded with it.
pub async fn ask_all(
    prompter: &Arc<dyn Prompter>,
    mut config: Configuration,
    options: &ConfigureOptions,
    questions: &[Question],
) -> Result<ConfigureOutcome, ProducerError> {
    for &question in questions {
        if !config.should_ask(question.field, options) {
            continue;
        }
        let current = config.value(question.field).map(str::to_string);
        let prompter = Arc::clone(prompter);
        let reply = tokio::task::spawn_blocking(move || {
            prompter.ask(
                question.field,
                question.text,
                current.as_deref(),
                question.secret,
            )
        })
        .await
        .map_err(|e| ProducerError::Prompt(format!("prompt task failed: {}", e)))??;

        match reply {
            PromptReply::Answer(value) => config.set(question.field, value),
            PromptReply::Declined => config.decline(question.field),
            PromptReply::Skipped => {}
            PromptReply::Cancelled => return Ok(ConfigureOutcome::Cancelled),
        }
    }
    Ok(ConfigureOutcome::Completed(config))
}

/// Built-in producers in registration order. `workspace` anchors relative paths.
pub fn builtin_producers(prompter: Arc<dyn Prompter>, workspace: &Path) -> Vec<Arc<dyn Producer>> {
    vec![
        Arc::new(HistoryProducer::new(Arc::clone(&prompter), workspace)),
        Arc::new(PullRequestsProducer::new(Arc::clone(&prompter))),
        Arc::new(NotesProducer::new(prompter, workspace)),
        Arc::new(ContributorsProducer::new()),
        Arc::new(OverviewProducer::new()),
    ]
}
