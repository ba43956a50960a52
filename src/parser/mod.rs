//! Query text parsing
//!
//! Turns SELECT statement text into a [`QueryDescriptor`], the read-only
//! structure the executor consumes.
//!
//! # Supported shape
//!
//! - One base table, at most one INNER/LEFT/RIGHT equality join
//! - Conjunctive WHERE only (no OR, no parentheses)
//! - GROUP BY on plain columns
//! - Aggregates `SUM`, `MIN`, `MAX`, `COUNT`, `AVG` in the select list

mod ast;
mod errors;
mod expr;
mod parser;

pub use ast::{
    split_qualified, JoinClause, JoinCondition, JoinType, QueryDescriptor, WhereClause,
};
pub use errors::{ParseError, ParseResult};
pub use expr::{AggregateArg, AggregateExpr, AggregateFunction, OutputExpr};
pub use parser::parse_query;
