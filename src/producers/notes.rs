//! Operator notes read from a markdown file and tidied for inclusion.

use super::{ask_all, priority, Question};
use crate::error::ProducerError;
use crate::fragment::ContentFragment;
use crate::producer::output::{ids, NotesOutput};
use crate::producer::{
    ConfigureOutcome, DependencyView, Producer, ProducerDescriptor, ProducerOutput, ProducerResult,
};
use crate::prompt::Prompter;
use crate::settings::{ConfigureOptions, Configuration};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use unicode_normalization::UnicodeNormalization;

pub const FIELD_PATH: &str = "notes.path";

const QUESTIONS: &[Question] = &[Question {
    field: FIELD_PATH,
    text: "Markdown notes file to include",
    secret: false,
}];

pub struct NotesProducer {
    descriptor: ProducerDescriptor,
    prompter: Arc<dyn Prompter>,
    workspace: PathBuf,
}

impl NotesProducer {
    pub fn new(prompter: Arc<dyn Prompter>, workspace: &Path) -> Self {
        Self {
            descriptor: ProducerDescriptor::new(ids::NOTES, "Notes"),
            prompter,
            workspace: workspace.to_path_buf(),
        }
    }
}

#[async_trait]
impl Producer for NotesProducer {
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
        Ok(config.value(FIELD_PATH).is_some())
    }

    async fn run(
        &self,
        config: &Configuration,
        _deps: &DependencyView,
    ) -> Result<Option<ProducerResult>, ProducerError> {
        let Some(path) = config.value(FIELD_PATH) else {
            return Ok(None);
        };
        let file = self.workspace.join(path);
        let text = tokio::task::spawn_blocking(move || {
            std::fs::read_to_string(&file).map(|raw| clean_markdown(&raw))
        })
        .await
        .map_err(|e| ProducerError::Failed(format!("notes read task failed: {}", e)))??;
        if text.is_empty() {
            return Ok(None);
        }

        let word_count = text.split_whitespace().count();
        let fragment =
            ContentFragment::new(&self.descriptor.id, "Notes", text.clone(), priority::NOTES);
        let output = ProducerOutput::Notes(NotesOutput { text, word_count });
        Ok(Some(ProducerResult::new(output).with_fragment(fragment)))
    }
}

/// Normalize to NFC, drop front matter and HTML comments, strip trailing
/// whitespace and collapse runs of blank lines.
pub fn clean_markdown(raw: &str) -> String {
    let normalized: String = raw.replace("\r\n", "\n").nfc().collect();
    let body = strip_front_matter(&normalized);
    let body = strip_html_comments(body);

    let mut out: Vec<&str> = Vec::new();
    for line in body.lines().map(str::trim_end) {
        if line.is_empty() && out.last().map_or(true, |prev| prev.is_empty()) {
            continue;
        }
        out.push(line);
    }
    while out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }
    out.join("\n")
}

/// Drop a leading `---` block. Both fences must be lines that read exactly
/// `---` once trailing whitespace is trimmed; an unclosed block is kept.
fn strip_front_matter(text: &str) -> &str {
    let mut lines = text.split_inclusive('\n');
    let mut offset = match lines.next() {
        Some(first) if first.trim_end() == "---" => first.len(),
        _ => return text,
    };
    for line in lines {
        offset += line.len();
        if line.trim_end() == "---" {
            return &text[offset..];
        }
    }
    text
}

fn strip_html_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("<!--") {
        out.push_str(&rest[..start]);
        match rest[start..].find("-->") {
            Some(end) => rest = &rest[start + end + 3..],
            None => {
                rest = "";
                break;
            }
        }
    }
    out.push_str(rest);
    out
}
