//! In-memory table loader

use std::collections::HashMap;

use crate::table::Table;

use super::errors::{LoaderError, LoaderResult};
use super::TableLoader;

/// Serves tables registered by name. Each load returns a fresh copy.
#[derive(Debug, Clone, Default)]
pub struct MemoryTableLoader {
    tables: HashMap<String, Table>,
}

impl MemoryTableLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) a table
    pub fn insert(&mut self, name: impl Into<String>, rows: Table) {
        self.tables.insert(name.into(), rows);
    }

    /// Builder form of [`MemoryTableLoader::insert`]
    pub fn with_table(mut self, name: impl Into<String>, rows: Table) -> Self {
        self.insert(name, rows);
        self
    }
}

impl TableLoader for MemoryTableLoader {
    async fn load_table(&self, table: &str) -> LoaderResult<Table> {
        self.tables
            .get(table)
            .cloned()
            .ok_or_else(|| LoaderError::table_not_found(table, "memory"))
    }
}
