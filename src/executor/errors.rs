//! Executor error types
//!
//! Error codes:
//! - FQ_UNSUPPORTED_OPERATOR
//! - FQ_QUERY_INVALID (from the parser)
//! - FQ_TABLE_NOT_FOUND, FQ_MALFORMED_SOURCE, FQ_LOAD_IO (from the loader)
//!
//! Every executor error is fatal to the query: no partial results are
//! returned.

use thiserror::Error;

use crate::loader::LoaderError;
use crate::parser::ParseError;

/// Result type for executor operations
pub type ExecutorResult<T> = Result<T, ExecutorError>;

/// Query execution errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutorError {
    /// WHERE clause uses an operator outside `= != > < >= <=`
    #[error("Unsupported operator: {0}")]
    UnsupportedOperator(String),

    /// Query text could not be parsed
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A table could not be loaded
    #[error(transparent)]
    Load(#[from] LoaderError),
}

impl ExecutorError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ExecutorError::UnsupportedOperator(_) => "FQ_UNSUPPORTED_OPERATOR",
            ExecutorError::Parse(e) => e.code(),
            ExecutorError::Load(e) => e.code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_operator_verbatim() {
        let err = ExecutorError::UnsupportedOperator("<>".to_string());
        assert_eq!(err.to_string(), "Unsupported operator: <>");
        assert_eq!(err.code(), "FQ_UNSUPPORTED_OPERATOR");
    }

    #[test]
    fn test_wrapped_codes() {
        let err = ExecutorError::from(LoaderError::table_not_found("t", "memory"));
        assert_eq!(err.code(), "FQ_TABLE_NOT_FOUND");

        let err = ExecutorError::from(ParseError::Empty);
        assert_eq!(err.code(), "FQ_QUERY_INVALID");
        assert_eq!(err.to_string(), "Empty query");
    }
}
