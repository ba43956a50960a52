//! Table loading
//!
//! A [`TableLoader`] turns a table name into rows. Loading is the only
//! suspension point of query execution; a failure aborts the query.
//!
//! Loaders are called through `&self` and keep no per-query state, so
//! concurrent queries may share one. Nothing is cached between calls.

mod csv;
mod errors;
mod file;
mod memory;

use std::future::Future;

use crate::table::Table;

pub use csv::parse_delimited;
pub use errors::{LoaderError, LoaderResult};
pub use file::{CsvTableLoader, DEFAULT_EXTENSION};
pub use memory::MemoryTableLoader;

/// Source of named tables
pub trait TableLoader: Send + Sync {
    /// Loads every row of `table` in source order
    fn load_table(&self, table: &str) -> impl Future<Output = LoaderResult<Table>> + Send;
}

impl<L: TableLoader> TableLoader for &L {
    async fn load_table(&self, table: &str) -> LoaderResult<Table> {
        (**self).load_table(table).await
    }
}
