//! Command routing over a temporary workspace and an in-memory settings store.

use quire::cli::{Commands, DocumentFormat, OutputFormat, RunContext};
use quire::config::AppConfig;
use quire::settings::{Configuration, MemoryConfigStore, MASK};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

fn context(temp: &TempDir, config: AppConfig, settings: Configuration) -> RunContext {
    RunContext::with_store(
        temp.path().to_path_buf(),
        config,
        Arc::new(MemoryConfigStore::new(settings)),
    )
}

#[tokio::test]
async fn producers_are_listed_in_execution_order_without_disabled_ones() {
    let temp = TempDir::new().unwrap();
    let config = AppConfig {
        disabled: vec!["pulls".to_string()],
        ..AppConfig::default()
    };
    let ctx = context(&temp, config, Configuration::new());

    let json = ctx
        .execute(&Commands::Producers {
            format: OutputFormat::Json,
        })
        .await
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    let ids: Vec<&str> = parsed
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["history", "notes", "contributors", "overview"]);
}

#[tokio::test]
async fn settings_output_masks_sensitive_fields() {
    let temp = TempDir::new().unwrap();
    let settings = Configuration::new()
        .with("hosting.repository", "acme/widgets")
        .with("hosting.token", "ghp_do_not_print");
    let ctx = context(&temp, AppConfig::default(), settings);

    let json = ctx
        .execute(&Commands::Settings {
            format: OutputFormat::Json,
        })
        .await
        .unwrap();
    assert!(!json.contains("ghp_do_not_print"));
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["hosting.token"], MASK);
    assert_eq!(parsed["hosting.repository"], "acme/widgets");

    let text = ctx
        .execute(&Commands::Settings {
            format: OutputFormat::Text,
        })
        .await
        .unwrap();
    assert!(text.contains(MASK));
    assert!(!text.contains("ghp_do_not_print"));
}

#[tokio::test]
async fn build_writes_document_from_eligible_producers() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("NOTES.md"),
        "---\nlayout: notes\n---\n# Week 42\n\nShipped the release.\n",
    )
    .unwrap();
    let settings = Configuration::new().with("notes.path", "NOTES.md");
    let ctx = context(&temp, AppConfig::default(), settings);

    let message = ctx
        .execute(&Commands::Build {
            output: Some("out/digest.md".into()),
            format: DocumentFormat::Markdown,
        })
        .await
        .unwrap();
    assert!(message.contains("2 sections"), "unexpected message: {message}");

    let document = fs::read_to_string(temp.path().join("out").join("digest.md")).unwrap();
    assert!(document.starts_with("# Project digest\n"));
    let overview = document.find("## Overview").expect("overview section");
    let notes = document.find("## Notes").expect("notes section");
    assert!(overview < notes, "overview has the lowest priority value");
    assert!(document.contains("Shipped the release."));
    assert!(!document.contains("layout: notes"));
}

#[tokio::test]
async fn build_to_stdout_returns_the_document_without_the_run_summary() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("NOTES.md"), "Shipped the release.\n").unwrap();
    let config = AppConfig {
        disabled: vec!["pulls".to_string()],
        ..AppConfig::default()
    };
    let settings = Configuration::new().with("notes.path", "NOTES.md");
    let ctx = context(&temp, config, settings);

    let document = ctx
        .execute(&Commands::Build {
            output: None,
            format: DocumentFormat::Markdown,
        })
        .await
        .unwrap();
    assert!(document.starts_with("# Project digest\n"));
    assert!(document.contains("Shipped the release."));
    assert!(!document.contains("(skipped)"), "summary leaked: {document}");
    assert!(!document.contains("tokens"), "summary leaked: {document}");
}

#[tokio::test]
async fn build_without_settings_renders_an_empty_document() {
    let temp = TempDir::new().unwrap();
    let config = AppConfig {
        disabled: vec!["pulls".to_string()],
        ..AppConfig::default()
    };
    let ctx = context(&temp, config, Configuration::new());

    let json = ctx
        .execute(&Commands::Build {
            output: None,
            format: DocumentFormat::Json,
        })
        .await
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn non_interactive_configure_takes_answers_from_the_environment() {
    let temp = TempDir::new().unwrap();
    let ctx = context(&temp, AppConfig::default(), Configuration::new());

    std::env::set_var("QUIRE_SET_NOTES__PATH", "NOTES.md");
    let out = ctx
        .execute(&Commands::Configure {
            reset: false,
            non_interactive: true,
        })
        .await;
    std::env::remove_var("QUIRE_SET_NOTES__PATH");

    let out = out.unwrap();
    assert!(out.contains("notes.path"));
    assert!(out.contains("NOTES.md"));
}
