//! CLI support for qopt
//!
//! Provides programmatic access to the `qopt` command-line functionality so
//! that other tools can embed it.

mod check;
mod docs;
mod tokens;

pub use check::{CheckOptions, OutputFormat, execute_check, load_settings};
pub use docs::{DocCategory, get_doc_category, get_docs_overview};
pub use tokens::dump_tokens;

use std::io;

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Parse error: {0}")]
    Parse(#[from] crate::ParseError),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No input provided. Pass the option text as an argument or pipe it to stdin.")]
    NoInput,

    #[error("Unknown category: '{0}'\nRun 'qopt docs' to see available categories.")]
    UnknownCategory(String),
}
