//! Commit counts per author, derived from the history producer's output.

use super::priority;
use crate::error::ProducerError;
use crate::fragment::ContentFragment;
use crate::producer::output::{ids, AuthorTally, CommitSummary, ContributorsOutput};
use crate::producer::{
    DependencyView, Producer, ProducerDescriptor, ProducerOutput, ProducerResult,
};
use crate::settings::Configuration;
use async_trait::async_trait;
use std::collections::HashMap;

pub struct ContributorsProducer {
    descriptor: ProducerDescriptor,
}

impl ContributorsProducer {
    pub fn new() -> Self {
        Self {
            descriptor: ProducerDescriptor::new(ids::CONTRIBUTORS, "Contributors")
                .needs([ids::HISTORY]),
        }
    }
}

impl Default for ContributorsProducer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Producer for ContributorsProducer {
    fn descriptor(&self) -> &ProducerDescriptor {
        &self.descriptor
    }

    fn is_eligible(
        &self,
        _config: &Configuration,
        deps: &DependencyView,
    ) -> Result<bool, ProducerError> {
        Ok(deps.history().is_some_and(|h| !h.commits.is_empty()))
    }

    async fn run(
        &self,
        _config: &Configuration,
        deps: &DependencyView,
    ) -> Result<Option<ProducerResult>, ProducerError> {
        let Some(history) = deps.history() else {
            return Ok(None);
        };
        let authors = tally(&history.commits);
        let body = authors
            .iter()
            .map(|a| {
                let noun = if a.commits == 1 { "commit" } else { "commits" };
                format!("- {} ({} {})", a.name, a.commits, noun)
            })
            .collect::<Vec<_>>()
            .join("\n");

        let fragment = ContentFragment::new(
            &self.descriptor.id,
            "Contributors",
            body,
            priority::CONTRIBUTORS,
        );
        let output = ProducerOutput::Contributors(ContributorsOutput { authors });
        Ok(Some(ProducerResult::new(output).with_fragment(fragment)))
    }
}

/// Most active first; ties broken by name
pub fn tally(commits: &[CommitSummary]) -> Vec<AuthorTally> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for commit in commits {
        *counts.entry(commit.author.as_str()).or_default() += 1;
    }
    let mut authors: Vec<AuthorTally> = counts
        .into_iter()
        .map(|(name, commits)| AuthorTally {
            name: name.to_string(),
            commits,
        })
        .collect();
    authors.sort_by(|a, b| b.commits.cmp(&a.commits).then_with(|| a.name.cmp(&b.name)));
    authors
}
