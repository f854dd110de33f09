//! Error types for layout and rendering.
//!
//! Malformed templates, unresolved placeholders, and bad markup are all
//! recovered locally (dropped with a diagnostic); only broken layout
//! invariants surface here as hard failures.

use crate::template::ColumnId;

/// Error type for rendering operations.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The template config could not be used at all.
    #[error("template config error: {0}")]
    Config(String),

    /// The template or information snapshot JSON failed to parse.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error reading template or snapshot files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A targeted row lookup missed; the layout bookkeeping is broken.
    #[error("row {id} not found in column {column}")]
    RowNotFound { id: u64, column: ColumnId },

    /// A row reached output with unbalanced name/value lines.
    #[error("row {id} has {names} name lines but {values} value lines")]
    NameValueImbalance { id: u64, names: usize, values: usize },
}
