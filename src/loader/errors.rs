//! # Loader Errors

use thiserror::Error;

/// Result type for table loading
pub type LoaderResult<T> = Result<T, LoaderError>;

/// Table loading errors. Any of these aborts the query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoaderError {
    /// No backing source for the table name
    #[error("Table not found: {table} ({location})")]
    TableNotFound { table: String, location: String },

    /// Source exists but cannot be parsed
    #[error("Malformed source {source_name} at line {line}: {reason}")]
    MalformedSource {
        source_name: String,
        line: usize,
        reason: String,
    },

    /// Read failure other than a missing file
    #[error("I/O error reading {location}: {reason}")]
    Io { location: String, reason: String },
}

impl LoaderError {
    pub fn table_not_found(table: impl Into<String>, location: impl Into<String>) -> Self {
        LoaderError::TableNotFound {
            table: table.into(),
            location: location.into(),
        }
    }

    pub fn malformed(source_name: impl Into<String>, line: usize, reason: impl Into<String>) -> Self {
        LoaderError::MalformedSource {
            source_name: source_name.into(),
            line,
            reason: reason.into(),
        }
    }

    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            LoaderError::TableNotFound { .. } => "FQ_TABLE_NOT_FOUND",
            LoaderError::MalformedSource { .. } => "FQ_MALFORMED_SOURCE",
            LoaderError::Io { .. } => "FQ_LOAD_IO",
        }
    }
}
