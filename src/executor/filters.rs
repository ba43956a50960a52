//! Predicate filtering for query execution
//!
//! Comparison policy:
//! - `=` and `!=` compare raw text exactly (`"1.0" != "1"`).
//! - `>`, `<`, `>=`, `<=` compare numerically when both the cell and the
//!   literal are finite numbers, otherwise byte-wise as strings.
//! - An absent cell satisfies only `!=`.
//! - Number cells (produced by grouping) compare numerically against a
//!   numeric literal.
//!
//! Clauses combine with AND only.

use std::cmp::Ordering;

use crate::parser::WhereClause;
use crate::table::{Row, Value};

use super::errors::{ExecutorError, ExecutorResult};

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Eq,
    Ne,
    Gt,
    Lt,
    Gte,
    Lte,
}

impl ComparisonOp {
    /// Parses an operator token. Anything unknown is fatal to the query.
    pub fn from_token(token: &str) -> ExecutorResult<Self> {
        match token {
            "=" => Ok(ComparisonOp::Eq),
            "!=" => Ok(ComparisonOp::Ne),
            ">" => Ok(ComparisonOp::Gt),
            "<" => Ok(ComparisonOp::Lt),
            ">=" => Ok(ComparisonOp::Gte),
            "<=" => Ok(ComparisonOp::Lte),
            other => Err(ExecutorError::UnsupportedOperator(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOp::Eq => "=",
            ComparisonOp::Ne => "!=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Lt => "<",
            ComparisonOp::Gte => ">=",
            ComparisonOp::Lte => "<=",
        }
    }

    fn holds(self, ordering: Ordering) -> bool {
        match self {
            ComparisonOp::Eq => ordering == Ordering::Equal,
            ComparisonOp::Ne => ordering != Ordering::Equal,
            ComparisonOp::Gt => ordering == Ordering::Greater,
            ComparisonOp::Lt => ordering == Ordering::Less,
            ComparisonOp::Gte => ordering != Ordering::Less,
            ComparisonOp::Lte => ordering != Ordering::Greater,
        }
    }
}

/// Evaluates WHERE clauses against rows
pub struct PredicateFilter;

impl PredicateFilter {
    /// Evaluates a single clause against a row
    pub fn evaluate(row: &Row, clause: &WhereClause) -> ExecutorResult<bool> {
        let op = ComparisonOp::from_token(&clause.operator)?;
        Ok(Self::compare(row.get_or_null(&clause.field), op, &clause.value))
    }

    /// Checks if a row satisfies every clause (AND semantics)
    pub fn matches(row: &Row, clauses: &[WhereClause]) -> ExecutorResult<bool> {
        for clause in clauses {
            if !Self::evaluate(row, clause)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Keeps the rows that satisfy every clause, preserving order.
    ///
    /// All operators are validated before any row is examined, so an
    /// unsupported operator fails even on an empty row set.
    pub fn filter(rows: Vec<Row>, clauses: &[WhereClause]) -> ExecutorResult<Vec<Row>> {
        if clauses.is_empty() {
            return Ok(rows);
        }

        let compiled = clauses
            .iter()
            .map(|clause| {
                ComparisonOp::from_token(&clause.operator)
                    .map(|op| (clause.field.as_str(), op, clause.value.as_str()))
            })
            .collect::<ExecutorResult<Vec<_>>>()?;

        Ok(rows
            .into_iter()
            .filter(|row| {
                compiled
                    .iter()
                    .all(|(field, op, literal)| Self::compare(row.get_or_null(field), *op, literal))
            })
            .collect())
    }

    fn compare(actual: &Value, op: ComparisonOp, literal: &str) -> bool {
        match actual {
            Value::Null => op == ComparisonOp::Ne,
            Value::Text(text) => match op {
                ComparisonOp::Eq => text == literal,
                ComparisonOp::Ne => text != literal,
                _ => op.holds(compare_text(text, literal)),
            },
            Value::Number(n) => match parse_number(literal) {
                Some(bound) => match n.partial_cmp(&bound) {
                    Some(ordering) => op.holds(ordering),
                    // NaN is unordered against everything
                    None => op == ComparisonOp::Ne,
                },
                None => op.holds(actual.to_string().as_str().cmp(literal)),
            },
        }
    }
}

fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

fn compare_text(a: &str, b: &str) -> Ordering {
    match (parse_number(a), parse_number(b)) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        _ => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clause(field: &str, op: &str, value: &str) -> WhereClause {
        WhereClause::new(field, op, value)
    }

    #[test]
    fn test_equality_is_exact_text() {
        let row = Row::new().with("name", "Alice").with("score", "1.0");

        assert!(PredicateFilter::evaluate(&row, &clause("name", "=", "Alice")).unwrap());
        assert!(!PredicateFilter::evaluate(&row, &clause("name", "=", "alice")).unwrap());
        // No numeric coercion for equality
        assert!(!PredicateFilter::evaluate(&row, &clause("score", "=", "1")).unwrap());
        assert!(PredicateFilter::evaluate(&row, &clause("score", "!=", "1")).unwrap());
    }

    #[test]
    fn test_numeric_looking_strings_order_numerically() {
        let row = Row::new().with("amount", "50");

        // Byte-wise "50" > "100"; numerically it is not
        assert!(!PredicateFilter::evaluate(&row, &clause("amount", ">", "100")).unwrap());
        assert!(PredicateFilter::evaluate(&row, &clause("amount", "<", "100")).unwrap());
        assert!(PredicateFilter::evaluate(&row, &clause("amount", ">=", "50.0")).unwrap());
        assert!(PredicateFilter::evaluate(&row, &clause("amount", "<=", "50")).unwrap());
    }

    #[test]
    fn test_non_numeric_strings_order_lexicographically() {
        let row = Row::new().with("name", "Bob");

        assert!(PredicateFilter::evaluate(&row, &clause("name", ">", "Alice")).unwrap());
        assert!(PredicateFilter::evaluate(&row, &clause("name", "<", "Carol")).unwrap());
        // Mixed: "Bob" vs "100" compares as text
        assert!(PredicateFilter::evaluate(&row, &clause("name", ">", "100")).unwrap());
    }

    #[test]
    fn test_absent_field_only_satisfies_not_equal() {
        let row = Row::new().with("name", "Alice");

        for op in ["=", ">", "<", ">=", "<="] {
            assert!(!PredicateFilter::evaluate(&row, &clause("age", op, "1")).unwrap());
        }
        assert!(PredicateFilter::evaluate(&row, &clause("age", "!=", "1")).unwrap());
    }

    #[test]
    fn test_number_cells_compare_numerically() {
        let row = Row::new().with("COUNT(*)", Value::Number(2.0));

        assert!(PredicateFilter::evaluate(&row, &clause("COUNT(*)", "=", "2")).unwrap());
        assert!(PredicateFilter::evaluate(&row, &clause("COUNT(*)", ">", "1")).unwrap());
        assert!(!PredicateFilter::evaluate(&row, &clause("COUNT(*)", "<", "2")).unwrap());
    }

    #[test]
    fn test_unsupported_operator() {
        let row = Row::new().with("age", "30");
        let err = PredicateFilter::evaluate(&row, &clause("age", "<>", "1")).unwrap_err();
        assert_eq!(err, ExecutorError::UnsupportedOperator("<>".to_string()));
    }

    #[test]
    fn test_unsupported_operator_fails_on_empty_input() {
        let result = PredicateFilter::filter(Vec::new(), &[clause("age", "LIKE", "1")]);
        assert!(matches!(result, Err(ExecutorError::UnsupportedOperator(op)) if op == "LIKE"));
    }

    #[test]
    fn test_conjunction() {
        let rows = vec![
            Row::new().with("age", "25").with("dept", "eng"),
            Row::new().with("age", "35").with("dept", "eng"),
            Row::new().with("age", "35").with("dept", "hr"),
        ];

        let one = PredicateFilter::filter(rows.clone(), &[clause("age", ">", "30")]).unwrap();
        assert_eq!(one.len(), 2);

        let both = PredicateFilter::filter(
            rows.clone(),
            &[clause("age", ">", "30"), clause("dept", "=", "eng")],
        )
        .unwrap();
        assert_eq!(both.len(), 1);
        assert!(both.len() <= one.len());

        let none = PredicateFilter::filter(rows.clone(), &[]).unwrap();
        assert_eq!(none, rows);
        assert!(PredicateFilter::matches(&rows[1], &[clause("age", ">", "30"), clause("dept", "=", "eng")]).unwrap());
    }
}
