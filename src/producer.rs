//! Producer contract
//!
//! A producer is a self-describing unit of content generation. It declares an
//! identity and the producers whose output it needs, may consult settings (or
//! the operator) during the configuration pass, and may emit content fragments
//! plus a typed output for its dependents during the execution pass.

use crate::error::ProducerError;
use crate::fragment::ContentFragment;
use crate::settings::{ConfigureOptions, Configuration};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

pub mod output;

pub use output::{DependencyView, ProducerOutput};

/// Unique producer identity within a registry
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProducerId(String);

impl ProducerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProducerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProducerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ProducerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for ProducerId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Passive description of a producer. Immutable once registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProducerDescriptor {
    pub id: ProducerId,
    /// Human-readable name
    pub name: String,
    /// Identities this producer depends on, in declaration order
    #[serde(default)]
    pub needs: Vec<ProducerId>,
    /// Settings fields that must never be displayed in plain text
    #[serde(default)]
    pub sensitive_fields: Vec<String>,
}

impl ProducerDescriptor {
    pub fn new(id: impl Into<ProducerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            needs: Vec::new(),
            sensitive_fields: Vec::new(),
        }
    }

    pub fn needs<I, S>(mut self, needs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ProducerId>,
    {
        self.needs = needs.into_iter().map(Into::into).collect();
        self
    }

    pub fn sensitive<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sensitive_fields = fields.into_iter().map(Into::into).collect();
        self
    }
}

/// Result of a producer's configure step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigureOutcome {
    /// The step finished; carries the (possibly updated) settings
    Completed(Configuration),
    /// The operator withdrew; the configuration pass stops here
    Cancelled,
}

/// Content and dependent-facing output of one successful run
#[derive(Debug, Clone)]
pub struct ProducerResult {
    pub fragments: Vec<ContentFragment>,
    pub output: ProducerOutput,
}

impl ProducerResult {
    pub fn new(output: ProducerOutput) -> Self {
        Self {
            fragments: Vec::new(),
            output,
        }
    }

    pub fn with_fragment(mut self, fragment: ContentFragment) -> Self {
        self.fragments.push(fragment);
        self
    }
}

/// The contract every producer implements.
///
/// Steps run one at a time. `deps` only ever holds outputs of producers named
/// in the descriptor's `needs` that ran successfully in the current pass.
#[async_trait]
pub trait Producer: Send + Sync {
    fn descriptor(&self) -> &ProducerDescriptor;

    /// Consult settings or the operator. The default leaves settings untouched.
    async fn configure(
        &self,
        config: Configuration,
        _options: &ConfigureOptions,
    ) -> Result<ConfigureOutcome, ProducerError> {
        Ok(ConfigureOutcome::Completed(config))
    }

    /// Pure decision whether `run` should be called
    fn is_eligible(
        &self,
        config: &Configuration,
        deps: &DependencyView,
    ) -> Result<bool, ProducerError>;

    /// Produce content. `Ok(None)` means "nothing to contribute".
    async fn run(
        &self,
        config: &Configuration,
        deps: &DependencyView,
    ) -> Result<Option<ProducerResult>, ProducerError>;
}
