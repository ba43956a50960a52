//! flatquery - SELECT queries over delimited files
//!
//! Parses a small SQL subset (projection, one equality join, conjunctive
//! WHERE, GROUP BY, SUM/MIN/MAX/COUNT/AVG) and evaluates it over tables
//! loaded on demand.
//!
//! ```ignore
//! use flatquery::{CsvTableLoader, QueryEngine};
//!
//! let engine = QueryEngine::new(CsvTableLoader::new("./data"));
//! let rows = engine.execute_select("SELECT dept, COUNT(*) FROM employees GROUP BY dept").await?;
//! ```

pub mod cli;
pub mod executor;
pub mod loader;
pub mod observability;
pub mod parser;
pub mod table;

pub use executor::{execute_select, ExecutorError, ExecutorResult, QueryEngine};
pub use loader::{CsvTableLoader, LoaderError, MemoryTableLoader, TableLoader};
pub use parser::{parse_query, ParseError, QueryDescriptor};
pub use table::{Row, Table, Value};
