pub mod cli_context;
pub mod engine_scenarios;
pub mod failure_isolation;
