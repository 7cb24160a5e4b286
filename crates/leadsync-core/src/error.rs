//! Error types for leadsync-core

use thiserror::Error;

/// Result type alias using leadsync-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a reconciliation run.
///
/// Per-record problems (duplicates, validation failures, card conflicts) are
/// not errors; they end up in the audit log as rejected entries.
#[derive(Error, Debug)]
pub enum Error {
    /// `SQLite` error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read/write error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Input header row does not match the lead schema
    #[error("Schema error: {0}")]
    Schema(String),

    /// Lead not found (or not in a state the operation applies to)
    #[error("Lead not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
