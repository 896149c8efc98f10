//! A failing producer never aborts the execution pass.

use super::test_utils::{engine_with, journal, titles, TestProducer};
use quire::engine::StepOutcome;
use quire::error::ProducerError;
use quire::settings::Configuration;

#[tokio::test]
async fn run_error_is_isolated_and_dependents_see_no_output() {
    let log = journal();
    let (engine, _) = engine_with(vec![
        TestProducer::new("broken", &log).fails("upstream unavailable").arc(),
        TestProducer::new("steady", &log).emits("steady", 10, 0).arc(),
        TestProducer::new("dependent", &log)
            .needs(&["broken"])
            .eligible_when(|_, deps| Ok(!deps.contains("broken")))
            .emits("fallback", 20, 0)
            .arc(),
    ]);

    let report = engine.execute_with_report(&Configuration::new()).await.unwrap();
    assert_eq!(titles(&report.fragments), vec!["steady", "fallback"]);
    assert!(matches!(
        report.outcome("broken"),
        Some(StepOutcome::Failed { error }) if error.contains("upstream unavailable")
    ));
    let failed: Vec<&str> = report.failed().map(|(id, _)| id.as_str()).collect();
    assert_eq!(failed, vec!["broken"]);
}

#[tokio::test]
async fn eligibility_error_counts_as_failure() {
    let log = journal();
    let (engine, _) = engine_with(vec![
        TestProducer::new("picky", &log)
            .eligible_when(|_, _| Err(ProducerError::Parse("bad setting".to_string())))
            .emits("never", 1, 0)
            .arc(),
        TestProducer::new("after", &log).emits("after", 1, 0).arc(),
    ]);

    let report = engine.execute_with_report(&Configuration::new()).await.unwrap();
    assert!(matches!(report.outcome("picky"), Some(StepOutcome::Failed { .. })));
    assert_eq!(titles(&report.fragments), vec!["after"]);
    assert!(!log.lock().contains(&"run:picky".to_string()));
}

#[tokio::test]
async fn panicking_run_is_contained() {
    let log = journal();
    let (engine, _) = engine_with(vec![
        TestProducer::new("explodes", &log)
            .runs(|_, _, _| panic!("boom"))
            .arc(),
        TestProducer::new("survivor", &log).emits("survivor", 1, 0).arc(),
    ]);

    let report = engine.execute_with_report(&Configuration::new()).await.unwrap();
    assert!(matches!(
        report.outcome("explodes"),
        Some(StepOutcome::Failed { error }) if error.contains("boom")
    ));
    assert_eq!(titles(&report.fragments), vec!["survivor"]);
}

#[tokio::test]
async fn panicking_eligibility_check_is_contained() {
    let log = journal();
    let (engine, _) = engine_with(vec![
        TestProducer::new("fragile", &log)
            .eligible_when(|_, _| panic!("bad state"))
            .arc(),
        TestProducer::new("survivor", &log).emits("survivor", 1, 0).arc(),
    ]);

    let report = engine.execute_with_report(&Configuration::new()).await.unwrap();
    assert!(matches!(report.outcome("fragile"), Some(StepOutcome::Failed { .. })));
    assert_eq!(report.fragments.len(), 1);
}

#[tokio::test]
async fn failure_does_not_cascade_into_transitive_dependents() {
    let log = journal();
    let (engine, _) = engine_with(vec![
        TestProducer::new("root", &log).fails("nope").arc(),
        TestProducer::new("middle", &log)
            .needs(&["root"])
            .eligible_when(|_, deps| Ok(deps.contains("root")))
            .emits("middle", 1, 1)
            .arc(),
        TestProducer::new("leaf", &log)
            .needs(&["middle"])
            .eligible_when(|_, deps| Ok(deps.is_empty()))
            .emits("leaf", 1, 0)
            .arc(),
    ]);

    let report = engine.execute_with_report(&Configuration::new()).await.unwrap();
    assert_eq!(report.outcome("middle"), Some(&StepOutcome::Skipped));
    assert_eq!(report.outcome("leaf"), Some(&StepOutcome::Produced { fragments: 1 }));
    assert_eq!(report.outcomes.len(), 3);
}
