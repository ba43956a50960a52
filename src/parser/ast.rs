//! Query descriptor structures
//!
//! The parsed, read-only representation of a SELECT statement.

use serde::Serialize;

use super::expr::AggregateExpr;

/// Join kinds supported by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JoinType {
    Inner,
    Left,
    Right,
}

impl JoinType {
    /// Parses a join keyword, case-insensitively
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_uppercase().as_str() {
            "INNER" => Some(JoinType::Inner),
            "LEFT" => Some(JoinType::Left),
            "RIGHT" => Some(JoinType::Right),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JoinType::Inner => "INNER",
            JoinType::Left => "LEFT",
            JoinType::Right => "RIGHT",
        }
    }
}

/// Equality join condition, `left = right`, each side `table.field`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinCondition {
    pub left: String,
    pub right: String,
}

impl JoinCondition {
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }

    /// Field name of the left operand: the segment after its qualifier.
    /// An operand without a qualifier names no field.
    pub fn left_field(&self) -> Option<&str> {
        qualified_field(&self.left)
    }

    /// Field name of the right operand, as for [`JoinCondition::left_field`]
    pub fn right_field(&self) -> Option<&str> {
        qualified_field(&self.right)
    }
}

/// Splits `table.field` into its qualifier and field name
pub fn split_qualified(name: &str) -> Option<(&str, &str)> {
    name.split_once('.')
}

fn qualified_field(name: &str) -> Option<&str> {
    name.split('.').nth(1)
}

/// Join clause: kind, joined table and condition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinClause {
    #[serde(rename = "joinType")]
    pub kind: JoinType,
    #[serde(rename = "joinTable")]
    pub table: String,
    #[serde(rename = "joinCondition")]
    pub condition: JoinCondition,
}

/// A single WHERE comparison.
///
/// The operator is kept as the raw token; it is validated when evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WhereClause {
    pub field: String,
    pub operator: String,
    pub value: String,
}

impl WhereClause {
    pub fn new(
        field: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }
}

/// Parsed SELECT statement
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryDescriptor {
    /// Output expressions in order
    pub fields: Vec<String>,
    /// Base table
    pub table: String,
    /// WHERE clauses, all combined with AND
    pub where_clauses: Vec<WhereClause>,
    /// Optional single join
    #[serde(flatten)]
    pub join: Option<JoinClause>,
    /// GROUP BY columns
    pub group_by_fields: Option<Vec<String>>,
    /// Aggregate in the select list and no GROUP BY
    pub has_aggregate_without_group_by: bool,
}

impl QueryDescriptor {
    /// Creates a descriptor selecting `fields` from `table`
    pub fn new<I, S>(table: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut query = Self {
            fields: fields.into_iter().map(Into::into).collect(),
            table: table.into(),
            where_clauses: Vec::new(),
            join: None,
            group_by_fields: None,
            has_aggregate_without_group_by: false,
        };
        query.refresh_aggregate_flag();
        query
    }

    /// Adds a WHERE clause
    pub fn with_where(
        mut self,
        field: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.where_clauses
            .push(WhereClause::new(field, operator, value));
        self
    }

    /// Sets the join clause
    pub fn with_join(
        mut self,
        kind: JoinType,
        table: impl Into<String>,
        condition: JoinCondition,
    ) -> Self {
        self.join = Some(JoinClause {
            kind,
            table: table.into(),
            condition,
        });
        self
    }

    /// Sets the GROUP BY columns
    pub fn with_group_by<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_by_fields = Some(fields.into_iter().map(Into::into).collect());
        self.refresh_aggregate_flag();
        self
    }

    /// Returns true if a join was requested
    pub fn has_join(&self) -> bool {
        self.join.is_some()
    }

    fn refresh_aggregate_flag(&mut self) {
        self.has_aggregate_without_group_by = self.group_by_fields.is_none()
            && self
                .fields
                .iter()
                .any(|field| AggregateExpr::parse(field).is_some());
    }
}
