//! Content fragments and their aggregation into one ordered sequence.

use crate::producer::ProducerId;
use serde::{Deserialize, Serialize};

/// One titled, prioritized piece of emitted content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentFragment {
    pub title: String,
    pub body: String,
    /// Lower sorts earlier in the final document
    pub priority: i32,
    /// Rough token count of title and body
    pub estimated_tokens: usize,
    pub producer: ProducerId,
}

impl ContentFragment {
    pub fn new(
        producer: &ProducerId,
        title: impl Into<String>,
        body: impl Into<String>,
        priority: i32,
    ) -> Self {
        let title = title.into();
        let body = body.into();
        let estimated_tokens = estimate_tokens(&title) + estimate_tokens(&body);
        Self {
            title,
            body,
            priority,
            estimated_tokens,
            producer: producer.clone(),
        }
    }
}

/// Four characters per token, rounded up
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}

/// Order fragments by ascending priority.
///
/// The sort is stable: equal priorities keep emission order, which is the
/// producer execution order.
pub fn aggregate(mut fragments: Vec<ContentFragment>) -> Vec<ContentFragment> {
    fragments.sort_by_key(|fragment| fragment.priority);
    fragments
}

/// Sum of the size estimates of `fragments`
pub fn total_tokens(fragments: &[ContentFragment]) -> usize {
    fragments.iter().map(|f| f.estimated_tokens).sum()
}
