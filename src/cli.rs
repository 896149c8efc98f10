//! CLI domain: parse, route, output and presentation only.
//! Engine orchestration stays in `engine`; the route table wires it to commands.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::{exit_code, map_error};
pub use parse::{Cli, Commands, DocumentFormat, OutputFormat};
pub use presentation::{
    format_outcome_summary, format_producers_json, format_producers_text, format_settings_json,
    format_settings_text,
};
pub use route::RunContext;
