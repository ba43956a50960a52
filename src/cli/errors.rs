//! CLI-specific error types
//!
//! All CLI errors end the process with a non-zero exit status.

use std::fmt;
use std::io;

use crate::executor::ExecutorError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdin/stdout)
    IoError,
    /// Query parsing or execution failed
    QueryFailed,
    /// Async runtime could not be started
    RuntimeFailed,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "FQ_CLI_CONFIG_ERROR",
            Self::IoError => "FQ_CLI_IO_ERROR",
            Self::QueryFailed => "FQ_CLI_QUERY_FAILED",
            Self::RuntimeFailed => "FQ_CLI_RUNTIME_FAILED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
    /// Code of the query error that caused this, if any
    query_code: Option<&'static str>,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            query_code: None,
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Runtime start failure
    pub fn runtime_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::RuntimeFailed, msg)
    }

    /// Query failure, keeping the engine's code
    pub fn query_failed(err: &ExecutorError) -> Self {
        Self {
            code: CliErrorCode::QueryFailed,
            message: err.to_string(),
            query_code: Some(err.code()),
        }
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Code reported in the JSON error response: the query error's code
    /// when there is one, the CLI code otherwise
    pub fn response_code(&self) -> &'static str {
        self.query_code.unwrap_or_else(|| self.code_str())
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.response_code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<ExecutorError> for CliError {
    fn from(e: ExecutorError) -> Self {
        Self::query_failed(&e)
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::LoaderError;

    #[test]
    fn test_query_failure_keeps_engine_code() {
        let err = CliError::from(ExecutorError::from(LoaderError::table_not_found(
            "orders", "memory",
        )));
        assert_eq!(err.code(), &CliErrorCode::QueryFailed);
        assert_eq!(err.code_str(), "FQ_CLI_QUERY_FAILED");
        assert_eq!(err.response_code(), "FQ_TABLE_NOT_FOUND");
        assert!(err.to_string().starts_with("FQ_TABLE_NOT_FOUND: "));
    }

    #[test]
    fn test_plain_cli_error_code() {
        let err = CliError::config_error("bad delimiter");
        assert_eq!(err.response_code(), "FQ_CLI_CONFIG_ERROR");
        assert_eq!(err.message(), "bad delimiter");
    }
}
