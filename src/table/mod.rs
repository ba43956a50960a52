//! In-memory table representation
//!
//! A table is an ordered sequence of rows sharing one column set. Rows are
//! never mutated once loaded; joins and grouping build new rows.

mod row;
mod value;

pub use row::{Row, Table};
pub use value::Value;
