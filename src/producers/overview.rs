//! Headline overview built from whichever upstream outputs are visible.

use super::priority;
use crate::error::ProducerError;
use crate::fragment::ContentFragment;
use crate::producer::output::{ids, OverviewOutput};
use crate::producer::{
    DependencyView, Producer, ProducerDescriptor, ProducerOutput, ProducerResult,
};
use crate::settings::Configuration;
use async_trait::async_trait;

pub struct OverviewProducer {
    descriptor: ProducerDescriptor,
}

impl OverviewProducer {
    pub fn new() -> Self {
        Self {
            descriptor: ProducerDescriptor::new(ids::OVERVIEW, "Overview").needs([
                ids::HISTORY,
                ids::PULLS,
                ids::NOTES,
                ids::CONTRIBUTORS,
            ]),
        }
    }
}

impl Default for OverviewProducer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Producer for OverviewProducer {
    fn descriptor(&self) -> &ProducerDescriptor {
        &self.descriptor
    }

    fn is_eligible(
        &self,
        _config: &Configuration,
        deps: &DependencyView,
    ) -> Result<bool, ProducerError> {
        Ok(!deps.is_empty())
    }

    async fn run(
        &self,
        _config: &Configuration,
        deps: &DependencyView,
    ) -> Result<Option<ProducerResult>, ProducerError> {
        let sections = summarize(deps);
        if sections.is_empty() {
            return Ok(None);
        }
        let body = sections
            .iter()
            .map(|line| format!("- {}", line))
            .collect::<Vec<_>>()
            .join("\n");
        let fragment =
            ContentFragment::new(&self.descriptor.id, "Overview", body, priority::OVERVIEW);
        let output = ProducerOutput::Overview(OverviewOutput { sections });
        Ok(Some(ProducerResult::new(output).with_fragment(fragment)))
    }
}

fn summarize(deps: &DependencyView) -> Vec<String> {
    let mut sections = Vec::new();
    if let Some(history) = deps.history() {
        sections.push(format!("{} commits in the reporting window", history.commits.len()));
    }
    if let Some(contributors) = deps.contributors() {
        sections.push(format!("{} active contributors", contributors.authors.len()));
    }
    if let Some(pulls) = deps.pull_requests() {
        sections.push(format!(
            "{} open pull requests in {}",
            pulls.pulls.len(),
            pulls.repository
        ));
    }
    if let Some(notes) = deps.notes() {
        sections.push(format!("{} words of notes", notes.word_count));
    }
    sections
}
