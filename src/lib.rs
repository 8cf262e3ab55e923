//! Warden - project validation, diagnostics aggregation and quality scoring
//!
//! Warden runs four validator families (imports, webhook, UI data flow and
//! dependency injection) over a project, folds their findings and failures
//! into one scored [`models::ValidationReport`] and derives prioritized
//! recommendations from it.

pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error_handler;
pub mod errors;
pub mod models;
pub mod orchestrator;
pub mod output;
pub mod utils;
pub mod validators;
