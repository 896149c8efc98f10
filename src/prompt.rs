//! Operator prompts used by producers during the configuration pass.

use crate::error::ProducerError;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::io::ErrorKind;

/// Prefix of environment variables read by [`StaticPrompter::from_env`]
pub const ENV_PREFIX: &str = "QUIRE_SET_";

/// Reply to a single settings question
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptReply {
    Answer(String),
    /// The operator explicitly chose none
    Declined,
    /// No answer available; the field stays unasked
    Skipped,
    /// The operator withdrew from the whole configuration pass
    Cancelled,
}

/// Source of answers for settings fields.
///
/// `ask` may block on operator input; callers run it off the async workers.
pub trait Prompter: Send + Sync {
    /// Ask for the value of `field`. `default` is the current value, if any;
    /// for `secret` fields neither it nor the input may be echoed.
    fn ask(
        &self,
        field: &str,
        question: &str,
        default: Option<&str>,
        secret: bool,
    ) -> Result<PromptReply, ProducerError>;
}

/// Interactive prompts on the controlling terminal.
///
/// Empty input declines the field, except when it already holds a value, which
/// is kept (secrets included). End-of-input or an interrupt cancels the pass.
pub struct TerminalPrompter;

impl TerminalPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TerminalPrompter {
    fn ask(
        &self,
        _field: &str,
        question: &str,
        default: Option<&str>,
        secret: bool,
    ) -> Result<PromptReply, ProducerError> {
        use dialoguer::{Input, Password};

        let keep_on_empty = default.is_some();
        let hint = if keep_on_empty {
            "leave empty to keep the current value"
        } else {
            "leave empty to decline"
        };

        let answer = if secret {
            Password::new()
                .with_prompt(format!("{question} ({hint})"))
                .allow_empty_password(true)
                .interact()
        } else {
            let mut input = Input::<String>::new()
                .with_prompt(format!("{question} ({hint})"))
                .allow_empty(true);
            if let Some(default) = default {
                input = input.default(default.to_string());
            }
            input.interact_text()
        };

        match answer {
            Ok(value) => Ok(interpret_input(&value, keep_on_empty)),
            Err(dialoguer::Error::IO(err))
                if matches!(err.kind(), ErrorKind::Interrupted | ErrorKind::UnexpectedEof) =>
            {
                Ok(PromptReply::Cancelled)
            }
            Err(err) => Err(ProducerError::Prompt(format!(
                "Failed to get user input: {}",
                err
            ))),
        }
    }
}

/// Reply for raw terminal input. Empty input declines the field unless
/// `keep_on_empty`, in which case the field is left as it was.
fn interpret_input(input: &str, keep_on_empty: bool) -> PromptReply {
    match input.trim() {
        "" if keep_on_empty => PromptReply::Skipped,
        "" => PromptReply::Declined,
        value => PromptReply::Answer(value.to_string()),
    }
}

/// Answers from a fixed field map; unknown fields are skipped.
///
/// Used for non-interactive runs and records every field it was asked about.
#[derive(Default)]
pub struct StaticPrompter {
    replies: HashMap<String, PromptReply>,
    asked: Mutex<Vec<String>>,
}

impl StaticPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, field: impl Into<String>, reply: PromptReply) -> Self {
        self.replies.insert(field.into(), reply);
        self
    }

    pub fn answer(self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.reply(field, PromptReply::Answer(value.into()))
    }

    /// Build from `QUIRE_SET_<SECTION>__<NAME>` variables.
    ///
    /// `QUIRE_SET_HISTORY__SINCE_DAYS=14` answers `history.since_days`; a value
    /// of `-` declines the field.
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut prompter = Self::new();
        for (key, value) in vars {
            let Some(rest) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let field = rest.to_lowercase().replace("__", ".");
            let reply = match value.trim() {
                "-" => PromptReply::Declined,
                "" => continue,
                other => PromptReply::Answer(other.to_string()),
            };
            prompter.replies.insert(field, reply);
        }
        prompter
    }

    /// Fields asked so far, in order
    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().clone()
    }
}

impl Prompter for StaticPrompter {
    fn ask(
        &self,
        field: &str,
        _question: &str,
        _default: Option<&str>,
        _secret: bool,
    ) -> Result<PromptReply, ProducerError> {
        self.asked.lock().push(field.to_string());
        Ok(self
            .replies
            .get(field)
            .cloned()
            .unwrap_or(PromptReply::Skipped))
    }
}
