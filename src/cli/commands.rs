//! CLI command implementations
//!
//! Commands run synchronously; `query` drives the async engine on a
//! current-thread tokio runtime. Failures are reported as a JSON error
//! object on stdout and returned so the process exits non-zero.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::executor::{ExecutorError, QueryEngine};
use crate::loader::CsvTableLoader;
use crate::observability::{log_event_with_fields, Event, Logger, Severity};
use crate::parser::parse_query;
use crate::table::Row;

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{read_query, write_error, write_json, write_response};

/// Configuration file structure
///
/// Every field is optional in the file:
///
/// ```json
/// { "data_dir": ".", "delimiter": ",", "extension": "csv", "log_level": "warn" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding `<table>.<extension>` files
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Field delimiter, exactly one character
    #[serde(default = "default_delimiter")]
    pub delimiter: String,

    /// Table file extension, without the dot
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Minimum log severity: trace, info, warn, error or fatal
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_data_dir() -> String {
    ".".to_string()
}
fn default_delimiter() -> String {
    ",".to_string()
}
fn default_extension() -> String {
    "csv".to_string()
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            delimiter: default_delimiter(),
            extension: default_extension(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Loads the config file if given, then applies the data directory override
    pub fn resolve(path: Option<&Path>, data_dir: Option<&Path>) -> CliResult<Self> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Some(dir) = data_dir {
            config.data_dir = dir.to_string_lossy().into_owned();
        }
        Ok(config)
    }

    /// Validate field values
    pub fn validate(&self) -> CliResult<()> {
        self.delimiter_char()?;

        if self.extension.is_empty() {
            return Err(CliError::config_error("extension must not be empty"));
        }

        self.severity()?;

        Ok(())
    }

    /// The delimiter as a single character
    pub fn delimiter_char(&self) -> CliResult<char> {
        let mut chars = self.delimiter.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(CliError::config_error(format!(
                "Invalid delimiter: '{}'. Must be exactly one character.",
                self.delimiter
            ))),
        }
    }

    /// The configured log level
    pub fn severity(&self) -> CliResult<Severity> {
        Severity::from_name(&self.log_level).ok_or_else(|| {
            CliError::config_error(format!(
                "Invalid log_level: '{}'. Expected trace, info, warn, error or fatal.",
                self.log_level
            ))
        })
    }

    /// Get data directory as Path
    pub fn data_path(&self) -> &Path {
        Path::new(&self.data_dir)
    }

    /// Builds the file loader this config describes
    pub fn loader(&self) -> CliResult<CsvTableLoader> {
        Ok(CsvTableLoader::new(self.data_path())
            .with_delimiter(self.delimiter_char()?)
            .with_extension(self.extension.as_str()))
    }
}

/// Main entry point for CLI
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Query {
            config,
            data_dir,
            sql,
        } => query(config.as_deref(), data_dir.as_deref(), sql),
        Command::Parse { sql } => parse(sql),
    }
}

/// Execute one query and print `{"status":"ok","data":[...]}`
pub fn query(config_path: Option<&Path>, data_dir: Option<&Path>, sql: Option<String>) -> CliResult<()> {
    let outcome = Config::resolve(config_path, data_dir).and_then(|config| {
        config.validate()?;
        Logger::set_min_severity(config.severity()?);
        log_event_with_fields(
            Event::ConfigLoaded,
            &[("data_dir", &config.data_dir), ("extension", &config.extension)],
        );

        let text = read_query(sql)?;
        execute_query(&config, &text)
    });

    match outcome {
        Ok(rows) => write_response(serde_json::to_value(&rows)?),
        Err(err) => {
            write_error(err.response_code(), err.message())?;
            Err(err)
        }
    }
}

/// Runs `sql` against the tables `config` describes
pub fn execute_query(config: &Config, sql: &str) -> CliResult<Vec<Row>> {
    let engine = QueryEngine::new(config.loader()?);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::runtime_failed(format!("Failed to start runtime: {}", e)))?;

    Ok(runtime.block_on(engine.execute_select(sql))?)
}

/// Parse one query and print its descriptor
pub fn parse(sql: Option<String>) -> CliResult<()> {
    let outcome = read_query(sql).and_then(|text| {
        parse_query(&text).map_err(|e| CliError::from(ExecutorError::from(e)))
    });

    match outcome {
        Ok(descriptor) => write_json(&serde_json::to_value(&descriptor)?),
        Err(err) => {
            write_error(err.response_code(), err.message())?;
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::errors::CliErrorCode;
    use super::*;
    use crate::table::Value;
    use serde_json::json;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_config(temp_dir: &TempDir, config: serde_json::Value) -> PathBuf {
        let config_path = temp_dir.path().join("flatquery.json");
        fs::write(&config_path, config.to_string()).unwrap();
        config_path
    }

    #[test]
    fn test_config_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(&temp_dir, json!({}));

        let config = Config::load(&path).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.delimiter_char().unwrap(), ',');
        assert_eq!(config.severity().unwrap(), Severity::Warn);
    }

    #[test]
    fn test_config_rejects_long_delimiter() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(&temp_dir, json!({ "delimiter": ";;" }));

        let err = Config::load(&path).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
    }

    #[test]
    fn test_config_rejects_unknown_log_level() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(&temp_dir, json!({ "log_level": "verbose" }));

        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_config_rejects_empty_extension() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(&temp_dir, json!({ "extension": "" }));

        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_missing_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = Config::load(&temp_dir.path().join("absent.json")).unwrap_err();
        assert_eq!(err.code_str(), "FQ_CLI_CONFIG_ERROR");
    }

    #[test]
    fn test_data_dir_override() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(&temp_dir, json!({ "data_dir": "/elsewhere", "delimiter": ";" }));

        let config = Config::resolve(Some(&path), Some(Path::new("/tables"))).unwrap();
        assert_eq!(config.data_dir, "/tables");
        assert_eq!(config.delimiter, ";");
    }

    #[test]
    fn test_execute_query_over_files() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("orders.tsv"),
            "id\tamount\n1\t50\n2\t150\n",
        )
        .unwrap();

        let config = Config {
            data_dir: temp_dir.path().to_string_lossy().into_owned(),
            delimiter: "\t".to_string(),
            extension: "tsv".to_string(),
            ..Config::default()
        };

        let rows = execute_query(&config, "SELECT SUM(amount) FROM orders WHERE amount > 100").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("SUM(amount)"), Some(&Value::Number(150.0)));
    }

    #[test]
    fn test_execute_query_reports_engine_code() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            data_dir: temp_dir.path().to_string_lossy().into_owned(),
            ..Config::default()
        };

        let err = execute_query(&config, "SELECT id FROM missing").unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::QueryFailed);
        assert_eq!(err.response_code(), "FQ_TABLE_NOT_FOUND");
    }
}
