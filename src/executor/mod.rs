//! Query execution
//!
//! # Execution Flow (strict order)
//!
//! 1. Load the base table
//! 2. If a join is requested, load the joined table and join; rows now carry
//!    `table.field` names
//! 3. If GROUP BY is present, group the working set
//! 4. Apply every WHERE clause (conjunction)
//! 5. Dispatch on query shape:
//!    - aggregate without GROUP BY: one summary row over the filtered set
//!    - GROUP BY: group the filtered set again
//!    - otherwise: project the requested fields
//!
//! Table loading is the only suspension point. Any error aborts the query
//! with no partial result.

mod aggregate;
mod errors;
mod executor;
mod filters;
mod join;
mod projector;

pub use aggregate::{group_key, Aggregator, GROUP_KEY_SEPARATOR};
pub use errors::{ExecutorError, ExecutorResult};
pub use executor::{execute_select, QueryEngine};
pub use filters::{ComparisonOp, PredicateFilter};
pub use join::JoinEvaluator;
pub use projector::Projector;
