//! Delimited-file table loader

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::observability::{log_event_with_fields, Event};
use crate::table::Table;

use super::csv::parse_delimited;
use super::errors::{LoaderError, LoaderResult};
use super::TableLoader;

/// Default file extension for table sources
pub const DEFAULT_EXTENSION: &str = "csv";

/// Loads `<data_dir>/<table>.<extension>` on every call.
#[derive(Debug, Clone)]
pub struct CsvTableLoader {
    data_dir: PathBuf,
    delimiter: char,
    extension: String,
}

impl CsvTableLoader {
    /// Comma-delimited `.csv` files under `data_dir`
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            delimiter: ',',
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    /// Sets the field delimiter
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets the file extension (without the dot)
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Returns the data directory
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Resolves a table name to its file path.
    ///
    /// Names that would escape the data directory resolve to nothing.
    pub fn table_path(&self, table: &str) -> Option<PathBuf> {
        if table.is_empty()
            || table.contains('/')
            || table.contains('\\')
            || table.contains("..")
        {
            return None;
        }
        Some(self.data_dir.join(format!("{}.{}", table, self.extension)))
    }
}

impl TableLoader for CsvTableLoader {
    async fn load_table(&self, table: &str) -> LoaderResult<Table> {
        let path = self
            .table_path(table)
            .ok_or_else(|| LoaderError::table_not_found(table, "invalid table name"))?;
        let location = path.display().to_string();

        let bytes = tokio::fs::read(&path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                LoaderError::table_not_found(table, location.as_str())
            } else {
                LoaderError::Io {
                    location: location.clone(),
                    reason: e.to_string(),
                }
            }
        })?;

        let content = String::from_utf8(bytes)
            .map_err(|e| LoaderError::malformed(location.as_str(), 0, format!("invalid UTF-8: {}", e)))?;

        let rows = parse_delimited(&content, self.delimiter, &location)?;

        log_event_with_fields(
            Event::TableLoaded,
            &[("table", table), ("rows", &rows.len().to_string())],
        );

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Value;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_existing_table() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("student.csv"), "id,name\n1,John\n2,Jane\n").unwrap();

        let loader = CsvTableLoader::new(dir.path());
        let rows = loader.load_table("student").await.unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].get("name"), Some(&Value::text("Jane")));
    }

    #[tokio::test]
    async fn test_missing_table() {
        let dir = TempDir::new().unwrap();
        let loader = CsvTableLoader::new(dir.path());

        let err = loader.load_table("nope").await.unwrap_err();
        assert_eq!(err.code(), "FQ_TABLE_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_path_escape_rejected() {
        let dir = TempDir::new().unwrap();
        let loader = CsvTableLoader::new(dir.path());

        assert!(loader.table_path("../etc/passwd").is_none());
        let err = loader.load_table("../secret").await.unwrap_err();
        assert!(matches!(err, LoaderError::TableNotFound { .. }));
    }

    #[tokio::test]
    async fn test_custom_delimiter_and_extension() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("t.tsv"), "a\tb\n1\t2\n").unwrap();

        let loader = CsvTableLoader::new(dir.path())
            .with_delimiter('\t')
            .with_extension("tsv");
        let rows = loader.load_table("t").await.unwrap();

        assert_eq!(rows[0].get("b"), Some(&Value::text("2")));
    }

    #[tokio::test]
    async fn test_malformed_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("bad.csv"), "a,b\n1,2,3\n").unwrap();

        let loader = CsvTableLoader::new(dir.path());
        let err = loader.load_table("bad").await.unwrap_err();

        assert_eq!(err.code(), "FQ_MALFORMED_SOURCE");
    }
}
