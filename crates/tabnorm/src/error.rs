//! Error types for the tabnorm library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for tabnorm operations.
///
/// Row-level parse failures are not errors: they are collected as
/// [`CoercionFailure`](crate::transform::CoercionFailure) values and
/// reported in aggregate.
#[derive(Debug, Error)]
pub enum TabnormError {
    /// Error reading or writing a file.
    #[error("IO error for '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid delimiter detected or specified.
    #[error("Invalid delimiter: {0}")]
    InvalidDelimiter(String),

    /// Empty file or no data to process.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// A header names the same column twice.
    #[error("Duplicate column '{column}' in header")]
    DuplicateColumn { column: String },

    /// A pass referenced a column the dataset does not have.
    #[error("Unknown column '{column}'")]
    UnknownColumn { column: String },

    /// A categorical value fell outside a remapping's known codes.
    #[error("Unmapped code '{value}' in column '{column}' at row {row}")]
    UnmappedCode {
        row: usize,
        column: String,
        value: String,
    },

    /// Configuration error (overlapping or gapped bucket ranges, malformed steps).
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TabnormError {
    pub(crate) fn unknown_column(column: impl Into<String>) -> Self {
        TabnormError::UnknownColumn {
            column: column.into(),
        }
    }
}

/// Result type alias for tabnorm operations.
pub type Result<T> = std::result::Result<T, TabnormError>;
