//! Typed producer outputs and the restricted dependency view.

use super::ProducerId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Identities of the built-in producers, one per `ProducerOutput` variant
pub mod ids {
    pub const HISTORY: &str = "history";
    pub const PULLS: &str = "pulls";
    pub const NOTES: &str = "notes";
    pub const CONTRIBUTORS: &str = "contributors";
    pub const OVERVIEW: &str = "overview";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitSummary {
    pub hash: String,
    pub author: String,
    pub date: String,
    pub subject: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryOutput {
    pub commits: Vec<CommitSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestSummary {
    pub number: u64,
    pub title: String,
    pub author: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestsOutput {
    pub repository: String,
    pub pulls: Vec<PullRequestSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotesOutput {
    pub text: String,
    pub word_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorTally {
    pub name: String,
    pub commits: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributorsOutput {
    pub authors: Vec<AuthorTally>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverviewOutput {
    pub sections: Vec<String>,
}

/// Output a producer hands to its dependents. One variant per known producer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProducerOutput {
    History(HistoryOutput),
    PullRequests(PullRequestsOutput),
    Notes(NotesOutput),
    Contributors(ContributorsOutput),
    Overview(OverviewOutput),
}

impl ProducerOutput {
    pub fn kind(&self) -> &'static str {
        match self {
            ProducerOutput::History(_) => "history",
            ProducerOutput::PullRequests(_) => "pull_requests",
            ProducerOutput::Notes(_) => "notes",
            ProducerOutput::Contributors(_) => "contributors",
            ProducerOutput::Overview(_) => "overview",
        }
    }
}

/// Read-only snapshot of the outputs a producer is allowed to see.
///
/// Holds an entry only for identities the producer declared in `needs` whose
/// run succeeded earlier in the same pass. Missing entries are never defaulted.
#[derive(Debug, Clone, Default)]
pub struct DependencyView {
    outputs: BTreeMap<ProducerId, Arc<ProducerOutput>>,
}

impl DependencyView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict `recorded` to exactly the identities in `needs`
    pub fn restricted(
        needs: &[ProducerId],
        recorded: &HashMap<ProducerId, Arc<ProducerOutput>>,
    ) -> Self {
        let outputs = needs
            .iter()
            .filter_map(|id| recorded.get(id).map(|out| (id.clone(), Arc::clone(out))))
            .collect();
        Self { outputs }
    }

    pub fn with(mut self, id: impl Into<ProducerId>, output: ProducerOutput) -> Self {
        self.outputs.insert(id.into(), Arc::new(output));
        self
    }

    pub fn get(&self, id: &str) -> Option<&ProducerOutput> {
        self.outputs.get(id).map(Arc::as_ref)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.outputs.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &ProducerId> {
        self.outputs.keys()
    }

    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    pub fn history(&self) -> Option<&HistoryOutput> {
        match self.get(ids::HISTORY)? {
            ProducerOutput::History(out) => Some(out),
            _ => None,
        }
    }

    pub fn pull_requests(&self) -> Option<&PullRequestsOutput> {
        match self.get(ids::PULLS)? {
            ProducerOutput::PullRequests(out) => Some(out),
            _ => None,
        }
    }

    pub fn notes(&self) -> Option<&NotesOutput> {
        match self.get(ids::NOTES)? {
            ProducerOutput::Notes(out) => Some(out),
            _ => None,
        }
    }

    pub fn contributors(&self) -> Option<&ContributorsOutput> {
        match self.get(ids::CONTRIBUTORS)? {
            ProducerOutput::Contributors(out) => Some(out),
            _ => None,
        }
    }
}
