//! Command-line shell around the `triage` library
//!
//! Reads ticket batches and fixtures from disk and hands them to the
//! evaluation harness. All triage decisions live in the library.

pub mod config;
pub mod loader;

pub use config::CliConfig;
pub use loader::{load_expected, load_model_labels, load_tickets, parse_tickets, TicketBatch};
