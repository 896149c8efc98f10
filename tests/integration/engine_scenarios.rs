//! End-to-end engine behaviour: ordering, dependency views and aggregation.

use super::test_utils::{commit_count, engine_with, journal, order_of, titles, TestProducer};
use quire::engine::{Engine, StepOutcome};
use quire::error::EngineError;
use quire::settings::{Configuration, MemoryConfigStore};
use std::sync::Arc;

#[test]
fn dependent_registered_after_dependency() {
    let log = journal();
    let (engine, _) = engine_with(vec![
        TestProducer::new("A", &log).arc(),
        TestProducer::new("B", &log).needs(&["A"]).arc(),
    ]);
    assert_eq!(order_of(&engine), vec!["A", "B"]);
}

#[test]
fn chain_registered_in_reverse_is_reordered() {
    let log = journal();
    let (engine, _) = engine_with(vec![
        TestProducer::new("C", &log).needs(&["B"]).arc(),
        TestProducer::new("B", &log).needs(&["A"]).arc(),
        TestProducer::new("A", &log).arc(),
    ]);
    assert_eq!(order_of(&engine), vec!["A", "B", "C"]);
}

#[tokio::test]
async fn cycle_is_rejected_by_every_pass() {
    let log = journal();
    let (engine, _) = engine_with(vec![
        TestProducer::new("A", &log).needs(&["B"]).arc(),
        TestProducer::new("B", &log).needs(&["A"]).arc(),
    ]);

    let err = engine.execution_order().unwrap_err();
    assert!(matches!(err, EngineError::CircularDependency(ref id) if ["A", "B"].contains(&id.as_str())));
    assert!(err.to_string().contains('A') || err.to_string().contains('B'));

    assert!(matches!(
        engine.execute(&Configuration::new()).await,
        Err(EngineError::CircularDependency(_))
    ));
    assert!(matches!(
        engine
            .run_config_prompts(Configuration::new(), &Default::default())
            .await,
        Err(EngineError::CircularDependency(_))
    ));
    assert!(log.lock().is_empty(), "no producer step may run on a cyclic graph");
}

#[test]
fn duplicate_registration_fails_and_keeps_first() {
    let log = journal();
    let mut engine = Engine::new(Arc::new(MemoryConfigStore::default()));
    engine.register(TestProducer::new("A", &log).arc()).unwrap();
    let err = engine
        .register(TestProducer::new("A", &log).sensitive(&["secret"]).arc())
        .unwrap_err();
    assert!(matches!(err, EngineError::DuplicateIdentity(ref id) if id.as_str() == "A"));
    assert_eq!(engine.registry().len(), 1);
    assert!(engine.sensitive_fields().is_empty());
}

#[tokio::test]
async fn dependent_reads_dependency_output_and_priorities_order_the_result() {
    let log = journal();
    let (engine, _) = engine_with(vec![
        TestProducer::new("A", &log).emits("X", 10, 3).arc(),
        TestProducer::new("B", &log)
            .needs(&["A"])
            .eligible_when(|_, deps| Ok(commit_count(deps, "A").is_some_and(|n| n > 0)))
            .emits("Y", 5, 0)
            .arc(),
    ]);

    let fragments = engine.execute(&Configuration::new()).await.unwrap();
    assert_eq!(titles(&fragments), vec!["Y", "X"]);
    assert_eq!(fragments[0].producer.as_str(), "B");
}

#[tokio::test]
async fn dependency_view_never_leaks_undeclared_outputs() {
    let log = journal();
    let (engine, _) = engine_with(vec![
        TestProducer::new("A", &log).emits("a", 1, 1).arc(),
        TestProducer::new("B", &log).emits("b", 1, 2).arc(),
        TestProducer::new("only-a", &log)
            .needs(&["A"])
            .eligible_when(|_, deps| {
                let ids: Vec<&str> = deps.ids().map(|id| id.as_str()).collect();
                Ok(ids == vec!["A"])
            })
            .emits("saw exactly A", 1, 0)
            .arc(),
        TestProducer::new("none", &log)
            .eligible_when(|_, deps| Ok(deps.is_empty()))
            .emits("saw nothing", 1, 0)
            .arc(),
    ]);

    let report = engine.execute_with_report(&Configuration::new()).await.unwrap();
    assert_eq!(
        report.outcome("only-a"),
        Some(&StepOutcome::Produced { fragments: 1 })
    );
    assert_eq!(report.outcome("none"), Some(&StepOutcome::Produced { fragments: 1 }));
}

#[tokio::test]
async fn equal_priorities_keep_execution_order() {
    let log = journal();
    // Registration order differs from execution order: "late" needs "early".
    let (engine, _) = engine_with(vec![
        TestProducer::new("late", &log).needs(&["early"]).emits("second", 7, 0).arc(),
        TestProducer::new("early", &log).emits("first", 7, 1).arc(),
        TestProducer::new("other", &log).emits("third", 7, 0).arc(),
        TestProducer::new("top", &log).emits("zeroth", 0, 0).arc(),
    ]);

    let fragments = engine.execute(&Configuration::new()).await.unwrap();
    assert_eq!(titles(&fragments), vec!["zeroth", "first", "second", "third"]);
}

#[tokio::test]
async fn ineligible_producer_is_skipped_silently() {
    let log = journal();
    let (engine, _) = engine_with(vec![
        TestProducer::new("gated", &log)
            .eligible_when(|config, _| Ok(config.value("gate").is_some()))
            .emits("gated", 1, 0)
            .arc(),
    ]);

    let report = engine.execute_with_report(&Configuration::new()).await.unwrap();
    assert_eq!(report.outcome("gated"), Some(&StepOutcome::Skipped));
    assert!(report.fragments.is_empty());
    assert_eq!(*log.lock(), vec!["eligible:gated"]);

    log.lock().clear();
    let open = Configuration::new().with("gate", "open");
    let fragments = engine.execute(&open).await.unwrap();
    assert_eq!(titles(&fragments), vec!["gated"]);
    assert_eq!(*log.lock(), vec!["eligible:gated", "run:gated"]);
}

#[tokio::test]
async fn empty_result_records_no_output_for_dependents() {
    let log = journal();
    let (engine, _) = engine_with(vec![
        TestProducer::new("quiet", &log).arc(),
        TestProducer::new("reader", &log)
            .needs(&["quiet"])
            .eligible_when(|_, deps| Ok(deps.contains("quiet")))
            .emits("unreachable", 1, 0)
            .arc(),
    ]);

    let report = engine.execute_with_report(&Configuration::new()).await.unwrap();
    assert_eq!(report.outcome("quiet"), Some(&StepOutcome::Empty));
    assert_eq!(report.outcome("reader"), Some(&StepOutcome::Skipped));
}

#[tokio::test]
async fn each_run_starts_from_empty_outputs() {
    let log = journal();
    let (engine, _) = engine_with(vec![
        TestProducer::new("A", &log)
            .eligible_when(|config, _| Ok(config.value("run-a").is_some()))
            .emits("a", 1, 1)
            .arc(),
        TestProducer::new("B", &log)
            .needs(&["A"])
            .eligible_when(|_, deps| Ok(deps.contains("A")))
            .emits("b", 2, 0)
            .arc(),
    ]);

    let first = engine
        .execute(&Configuration::new().with("run-a", "yes"))
        .await
        .unwrap();
    assert_eq!(titles(&first), vec!["a", "b"]);

    let second = engine.execute(&Configuration::new()).await.unwrap();
    assert!(second.is_empty(), "outputs from a previous run must not be visible");
}

#[tokio::test]
async fn independent_engines_do_not_share_state() {
    let log = journal();
    let (first, first_store) = engine_with(vec![TestProducer::new("A", &log).sets("k", "1").arc()]);
    let (second, second_store) = engine_with(vec![TestProducer::new("A", &log).arc()]);

    first
        .run_config_prompts(Configuration::new(), &Default::default())
        .await
        .unwrap();
    assert_eq!(first_store.save_count(), 1);
    assert_eq!(second_store.save_count(), 0);
    assert!(second.load_settings().unwrap().is_empty());

    first.shutdown();
    second.shutdown();
}
