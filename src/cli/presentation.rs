//! CLI presentation: text and json formatters per command.

use crate::engine::{ExecutionReport, StepOutcome};
use crate::error::ApiError;
use crate::producer::ProducerDescriptor;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use owo_colors::OwoColorize;
use std::collections::BTreeMap;

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value).map_err(|e| ApiError::OutputError(e.to_string()))
}

/// Producers in execution order
pub fn format_producers_text(ordered: &[&ProducerDescriptor]) -> String {
    if ordered.is_empty() {
        return "No producers registered.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["#", "Producer", "Name", "Needs", "Sensitive"]);
    for (position, descriptor) in ordered.iter().enumerate() {
        let needs = join_or_dash(descriptor.needs.iter().map(|n| n.as_str()));
        let sensitive = join_or_dash(descriptor.sensitive_fields.iter().map(String::as_str));
        table.add_row(vec![
            (position + 1).to_string(),
            descriptor.id.to_string(),
            descriptor.name.clone(),
            needs,
            sensitive,
        ]);
    }
    table.to_string()
}

pub fn format_producers_json(ordered: &[&ProducerDescriptor]) -> Result<String, ApiError> {
    to_json(&ordered)
}

/// Masked settings as a two-column table
pub fn format_settings_text(masked: &BTreeMap<String, String>) -> String {
    if masked.is_empty() {
        return "No settings recorded yet. Run `quire configure`.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Field", "Value"]);
    for (field, value) in masked {
        table.add_row(vec![field, value]);
    }
    table.to_string()
}

pub fn format_settings_json(masked: &BTreeMap<String, String>) -> Result<String, ApiError> {
    to_json(masked)
}

/// One line per producer, for stderr after a build
pub fn format_outcome_summary(report: &ExecutionReport) -> String {
    let mut lines: Vec<String> = report
        .outcomes
        .iter()
        .map(|(id, outcome)| match outcome {
            StepOutcome::Produced { fragments } => {
                format!("{} {} ({} sections)", "✓".green(), id, fragments)
            }
            StepOutcome::Empty => format!("{} {} (nothing to add)", "·".dimmed(), id),
            StepOutcome::Skipped => format!("{} {} (skipped)", "·".dimmed(), id),
            StepOutcome::Failed { error } => format!("{} {}: {}", "✗".red(), id, error),
        })
        .collect();
    lines.push(format!(
        "{} sections, ~{} tokens",
        report.fragments.len(),
        report.total_tokens()
    ));
    lines.join("\n")
}

fn join_or_dash<'a>(items: impl Iterator<Item = &'a str>) -> String {
    let joined = items.collect::<Vec<_>>().join(", ");
    if joined.is_empty() {
        "-".to_string()
    } else {
        joined
    }
}
