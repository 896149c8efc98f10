//! Recent commit history read from a local git repository.

use super::{ask_all, priority, Question};
use crate::error::ProducerError;
use crate::fragment::ContentFragment;
use crate::producer::output::{ids, CommitSummary, HistoryOutput};
use crate::producer::{
    ConfigureOutcome, DependencyView, Producer, ProducerDescriptor, ProducerOutput, ProducerResult,
};
use crate::prompt::Prompter;
use crate::settings::{ConfigureOptions, Configuration};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use tracing::debug;

pub const FIELD_REPOSITORY: &str = "history.repository";
pub const FIELD_SINCE_DAYS: &str = "history.since_days";

const DEFAULT_SINCE_DAYS: u32 = 7;
const MAX_COMMITS: usize = 200;
const FIELD_SEP: char = '\u{1f}';

const QUESTIONS: &[Question] = &[
    Question {
        field: FIELD_REPOSITORY,
        text: "Git repository to summarize",
        secret: false,
    },
    Question {
        field: FIELD_SINCE_DAYS,
        text: "Days of history to include",
        secret: false,
    },
];

pub struct HistoryProducer {
    descriptor: ProducerDescriptor,
    prompter: Arc<dyn Prompter>,
    workspace: PathBuf,
}

impl HistoryProducer {
    pub fn new(prompter: Arc<dyn Prompter>, workspace: &Path) -> Self {
        Self {
            descriptor: ProducerDescriptor::new(ids::HISTORY, "Commit history"),
            prompter,
            workspace: workspace.to_path_buf(),
        }
    }

    fn repository(&self, config: &Configuration) -> Option<PathBuf> {
        config
            .value(FIELD_REPOSITORY)
            .map(|repo| self.workspace.join(repo))
    }
}

#[async_trait]
impl Producer for HistoryProducer {
    fn descriptor(&self) -> &ProducerDescriptor {
        &self.descriptor
    }

    async fn configure(
        &self,
        config: Configuration,
        options: &ConfigureOptions,
    ) -> Result<ConfigureOutcome, ProducerError> {
        ask_all(&self.prompter, config, options, QUESTIONS).await
    }

    fn is_eligible(
        &self,
        config: &Configuration,
        _deps: &DependencyView,
    ) -> Result<bool, ProducerError> {
        Ok(config.value(FIELD_REPOSITORY).is_some())
    }

    async fn run(
        &self,
        config: &Configuration,
        _deps: &DependencyView,
    ) -> Result<Option<ProducerResult>, ProducerError> {
        let Some(repository) = self.repository(config) else {
            return Ok(None);
        };
        let since_days = config
            .parsed::<u32>(FIELD_SINCE_DAYS)
            .unwrap_or(DEFAULT_SINCE_DAYS);

        let log = tokio::task::spawn_blocking(move || git_log(&repository, since_days))
            .await
            .map_err(|e| ProducerError::Failed(format!("git log task failed: {}", e)))??;
        let commits = parse_log(&log);
        debug!(commits = commits.len(), since_days, "Commit history read");

        let mut result = ProducerResult::new(ProducerOutput::History(HistoryOutput {
            commits: commits.clone(),
        }));
        if !commits.is_empty() {
            result = result.with_fragment(ContentFragment::new(
                &self.descriptor.id,
                "Recent changes",
                format_commits(&commits),
                priority::HISTORY,
            ));
        }
        Ok(Some(result))
    }
}

fn git_log(repository: &Path, since_days: u32) -> Result<String, ProducerError> {
    let output = Command::new("git")
        .arg("-C")
        .arg(repository)
        .arg("log")
        .arg(format!("--since={} days ago", since_days))
        .arg("--no-merges")
        .arg("--date=short")
        .arg(format!("--max-count={}", MAX_COMMITS))
        .arg("--pretty=format:%h%x1f%an%x1f%ad%x1f%s")
        .output()?;

    if !output.status.success() {
        return Err(ProducerError::Failed(format!(
            "git log in {} failed: {}",
            repository.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Parse `git log` output in `hash<US>author<US>date<US>subject` form.
/// Malformed lines are dropped.
pub fn parse_log(log: &str) -> Vec<CommitSummary> {
    log.lines()
        .filter_map(|line| {
            let mut parts = line.splitn(4, FIELD_SEP);
            let hash = parts.next()?.trim();
            let author = parts.next()?.trim();
            let date = parts.next()?.trim();
            let subject = parts.next()?.trim();
            if hash.is_empty() {
                return None;
            }
            Some(CommitSummary {
                hash: hash.to_string(),
                author: author.to_string(),
                date: date.to_string(),
                subject: subject.to_string(),
            })
        })
        .collect()
}

fn format_commits(commits: &[CommitSummary]) -> String {
    commits
        .iter()
        .map(|c| format!("- {} (`{}`, {}, {})", c.subject, c.hash, c.author, c.date))
        .collect::<Vec<_>>()
        .join("\n")
}
