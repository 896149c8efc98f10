//! Open pull requests fetched from the code host's REST API.

use super::{ask_all, priority, Question};
use crate::error::ProducerError;
use crate::fragment::ContentFragment;
use crate::producer::output::{ids, PullRequestSummary, PullRequestsOutput};
use crate::producer::{
    ConfigureOutcome, DependencyView, Producer, ProducerDescriptor, ProducerOutput, ProducerResult,
};
use crate::prompt::Prompter;
use crate::settings::{ConfigureOptions, Configuration};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub const FIELD_REPOSITORY: &str = "hosting.repository";
pub const FIELD_TOKEN: &str = "hosting.token";
/// Not prompted; set it in the settings file for self-hosted instances
pub const FIELD_API_URL: &str = "hosting.api_url";

const DEFAULT_API_URL: &str = "https://api.github.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const PAGE_SIZE: u32 = 50;

const QUESTIONS: &[Question] = &[
    Question {
        field: FIELD_REPOSITORY,
        text: "Hosted repository (owner/name)",
        secret: false,
    },
    Question {
        field: FIELD_TOKEN,
        text: "API token for the code host",
        secret: true,
    },
];

#[derive(Debug, Deserialize)]
struct ApiPull {
    number: u64,
    title: String,
    html_url: String,
    user: Option<ApiUser>,
}

#[derive(Debug, Deserialize)]
struct ApiUser {
    login: String,
}

impl From<ApiPull> for PullRequestSummary {
    fn from(pull: ApiPull) -> Self {
        PullRequestSummary {
            number: pull.number,
            title: pull.title,
            author: pull
                .user
                .map(|u| u.login)
                .unwrap_or_else(|| "unknown".to_string()),
            url: pull.html_url,
        }
    }
}

pub struct PullRequestsProducer {
    descriptor: ProducerDescriptor,
    prompter: Arc<dyn Prompter>,
}

impl PullRequestsProducer {
    pub fn new(prompter: Arc<dyn Prompter>) -> Self {
        Self {
            descriptor: ProducerDescriptor::new(ids::PULLS, "Open pull requests")
                .sensitive([FIELD_TOKEN]),
            prompter,
        }
    }

    async fn fetch(
        &self,
        config: &Configuration,
        repository: &str,
    ) -> Result<Vec<PullRequestSummary>, ProducerError> {
        let api_url = config
            .value(FIELD_API_URL)
            .unwrap_or(DEFAULT_API_URL)
            .trim_end_matches('/');
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("quire/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let mut request = client
            .get(format!("{}/repos/{}/pulls", api_url, repository))
            .query(&[("state", "open".to_string()), ("per_page", PAGE_SIZE.to_string())])
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = config.value(FIELD_TOKEN) {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProducerError::Http(format!(
                "{} returned {}: {}",
                repository,
                status,
                body.chars().take(200).collect::<String>()
            )));
        }
        let pulls: Vec<ApiPull> = response.json().await?;
        Ok(pulls.into_iter().map(PullRequestSummary::from).collect())
    }
}

#[async_trait]
impl Producer for PullRequestsProducer {
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
        Ok(config
            .value(FIELD_REPOSITORY)
            .is_some_and(is_repository_slug))
    }

    async fn run(
        &self,
        config: &Configuration,
        _deps: &DependencyView,
    ) -> Result<Option<ProducerResult>, ProducerError> {
        let Some(repository) = config.value(FIELD_REPOSITORY) else {
            return Ok(None);
        };
        let pulls = self.fetch(config, repository).await?;
        debug!(repository, pulls = pulls.len(), "Pull requests fetched");

        let fragment = ContentFragment::new(
            &self.descriptor.id,
            "Open pull requests",
            format_pulls(&pulls),
            priority::PULLS,
        );
        let output = ProducerOutput::PullRequests(PullRequestsOutput {
            repository: repository.to_string(),
            pulls,
        });
        Ok(Some(ProducerResult::new(output).with_fragment(fragment)))
    }
}

fn is_repository_slug(value: &str) -> bool {
    matches!(value.split_once('/'), Some((owner, name))
        if !owner.is_empty() && !name.is_empty() && !name.contains('/'))
}

fn format_pulls(pulls: &[PullRequestSummary]) -> String {
    if pulls.is_empty() {
        return "No open pull requests.".to_string();
    }
    pulls
        .iter()
        .map(|p| format!("- #{} {} (@{})", p.number, p.title, p.author))
        .collect::<Vec<_>>()
        .join("\n")
}
