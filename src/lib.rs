//! Quire: dependency-ordered document assembly
//!
//! Registers content producers, orders them by their declared needs, drives an
//! interactive configuration pass and an isolated execution pass, and merges
//! everything the producers emit into one priority-ordered document.

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod fragment;
pub mod logging;
pub mod producer;
pub mod producers;
pub mod prompt;
pub mod render;
pub mod settings;
