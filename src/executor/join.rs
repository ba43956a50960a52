//! Nested-loop equality joins
//!
//! The left row is always probed at the condition's left field name and the
//! right row at the right field name, whatever table the qualifiers name.
//! Output rows carry only the requested `table.field` columns: a field whose
//! qualifier is the left table is read from the left row, any other
//! qualified field from the right row. Unqualified fields are absent.
//!
//! Keys compare by value with absence as a value of its own: an absent key
//! matches another absent key and nothing else. An operand without a table
//! qualifier probes no field, so its key is always absent.

use crate::parser::{split_qualified, JoinCondition, JoinType};
use crate::table::{Row, Value};

/// Join evaluation over two row sets
pub struct JoinEvaluator;

impl JoinEvaluator {
    /// Dispatches on the join kind
    pub fn join(
        kind: JoinType,
        left: &[Row],
        right: &[Row],
        condition: &JoinCondition,
        fields: &[String],
        left_table: &str,
    ) -> Vec<Row> {
        match kind {
            JoinType::Inner => Self::inner(left, right, condition, fields, left_table),
            JoinType::Left => Self::left(left, right, condition, fields, left_table),
            JoinType::Right => Self::right(left, right, condition, fields, left_table),
        }
    }

    /// One output row per matching pair; unmatched rows are dropped
    pub fn inner(
        left: &[Row],
        right: &[Row],
        condition: &JoinCondition,
        fields: &[String],
        left_table: &str,
    ) -> Vec<Row> {
        let mut output = Vec::new();
        for left_row in left {
            for right_row in right.iter().filter(|r| keys_match(left_row, r, condition)) {
                output.push(merge(fields, left_table, Some(left_row), Some(right_row)));
            }
        }
        output
    }

    /// Every left row appears at least once; unmatched ones get absent right fields
    pub fn left(
        left: &[Row],
        right: &[Row],
        condition: &JoinCondition,
        fields: &[String],
        left_table: &str,
    ) -> Vec<Row> {
        let mut output = Vec::new();
        for left_row in left {
            let before = output.len();
            for right_row in right.iter().filter(|r| keys_match(left_row, r, condition)) {
                output.push(merge(fields, left_table, Some(left_row), Some(right_row)));
            }
            if output.len() == before {
                output.push(merge(fields, left_table, Some(left_row), None));
            }
        }
        output
    }

    /// Every right row appears at least once; unmatched ones get absent left fields
    pub fn right(
        left: &[Row],
        right: &[Row],
        condition: &JoinCondition,
        fields: &[String],
        left_table: &str,
    ) -> Vec<Row> {
        let mut output = Vec::new();
        for right_row in right {
            let before = output.len();
            for left_row in left.iter().filter(|l| keys_match(l, right_row, condition)) {
                output.push(merge(fields, left_table, Some(left_row), Some(right_row)));
            }
            if output.len() == before {
                output.push(merge(fields, left_table, None, Some(right_row)));
            }
        }
        output
    }
}

fn keys_match(left: &Row, right: &Row, condition: &JoinCondition) -> bool {
    join_key(left, condition.left_field()) == join_key(right, condition.right_field())
}

fn join_key<'a>(row: &'a Row, field: Option<&str>) -> Option<&'a Value> {
    field
        .and_then(|field| row.get(field))
        .filter(|value| !value.is_null())
}

fn merge(fields: &[String], left_table: &str, left: Option<&Row>, right: Option<&Row>) -> Row {
    let mut row = Row::with_capacity(fields.len());
    for field in fields {
        let value = match split_qualified(field) {
            Some((table, column)) => {
                let source = if table == left_table { left } else { right };
                source.map(|r| r.get_or_null(column).clone())
            }
            None => None,
        };
        row.insert(field.as_str(), value.unwrap_or(Value::Null));
    }
    row
}
