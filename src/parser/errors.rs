//! # Parser Errors

use thiserror::Error;

/// Result type for parsing
pub type ParseResult<T> = Result<T, ParseError>;

/// Query text could not be turned into a descriptor
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Empty or whitespace-only input
    #[error("Empty query")]
    Empty,

    /// Not a `SELECT ... FROM ...` statement
    #[error("Invalid query format: {0}")]
    InvalidFormat(String),

    /// Malformed JOIN clause
    #[error("Invalid JOIN clause: {0}")]
    InvalidJoin(String),

    /// Malformed WHERE condition
    #[error("Invalid WHERE clause: {0}")]
    InvalidWhere(String),

    /// Malformed GROUP BY list
    #[error("Invalid GROUP BY clause: {0}")]
    InvalidGroupBy(String),

    /// Syntax the engine deliberately does not support
    #[error("Unsupported syntax: {0}")]
    Unsupported(String),
}

impl ParseError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        "FQ_QUERY_INVALID"
    }
}
