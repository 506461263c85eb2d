//! Structured error types for callercard
//!
//! The lookup engine itself never fails (missing or malformed call logs
//! degrade to empty results). These errors cover the outer collaborators:
//! CSV logging, JSON output, writing the example config and reading
//! input text.

use thiserror::Error;

/// All possible errors in callercard
#[derive(Error, Debug)]
pub enum CallerCardError {
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Unknown-caller CSV write error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A phone number had no digits after normalization
    #[error("Phone number '{0}' contains no digits")]
    EmptyPhone(String),
}

/// Convenience Result type using CallerCardError
pub type Result<T> = std::result::Result<T, CallerCardError>;
