//! Aggregate expression grammar
//!
//! ```text
//! aggregate := FUNC "(" arg ")"
//! FUNC      := SUM | MIN | MAX | COUNT | AVG      (case-insensitive)
//! arg       := "*" | ident ("." ident)?
//! ident     := [A-Za-z0-9_]+
//! ```
//!
//! Anything that does not match is a plain column reference.

use std::fmt;

/// Aggregate functions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateFunction {
    Sum,
    Min,
    Max,
    Count,
    Avg,
}

impl AggregateFunction {
    /// Parses a function name, case-insensitively
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "SUM" => Some(AggregateFunction::Sum),
            "MIN" => Some(AggregateFunction::Min),
            "MAX" => Some(AggregateFunction::Max),
            "COUNT" => Some(AggregateFunction::Count),
            "AVG" => Some(AggregateFunction::Avg),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AggregateFunction::Sum => "SUM",
            AggregateFunction::Min => "MIN",
            AggregateFunction::Max => "MAX",
            AggregateFunction::Count => "COUNT",
            AggregateFunction::Avg => "AVG",
        }
    }
}

impl fmt::Display for AggregateFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregateArg {
    /// `*`
    Star,
    /// A column name, possibly `table.column`
    Column(String),
}

impl AggregateArg {
    /// Column name, or `*`
    pub fn as_str(&self) -> &str {
        match self {
            AggregateArg::Star => "*",
            AggregateArg::Column(name) => name,
        }
    }
}

/// A parsed `FUNC(arg)` expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateExpr {
    pub function: AggregateFunction,
    pub argument: AggregateArg,
}

impl AggregateExpr {
    /// Parses `FUNC(arg)`. Returns `None` for anything else.
    pub fn parse(expr: &str) -> Option<Self> {
        let expr = expr.trim();
        let open = expr.find('(')?;
        let inner = expr[open + 1..].strip_suffix(')')?;

        let function = AggregateFunction::from_name(expr[..open].trim_end())?;
        let inner = inner.trim();

        let argument = if inner == "*" {
            AggregateArg::Star
        } else if is_column_name(inner) {
            AggregateArg::Column(inner.to_string())
        } else {
            return None;
        };

        Some(Self { function, argument })
    }
}

fn is_ident(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_column_name(s: &str) -> bool {
    match s.split_once('.') {
        Some((table, column)) => is_ident(table) && is_ident(column),
        None => is_ident(s),
    }
}

/// One output expression of a SELECT list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputExpr {
    Aggregate(AggregateExpr),
    Column,
}

impl OutputExpr {
    pub fn parse(expr: &str) -> Self {
        match AggregateExpr::parse(expr) {
            Some(agg) => OutputExpr::Aggregate(agg),
            None => OutputExpr::Column,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_aggregates() {
        let expr = AggregateExpr::parse("SUM(amount)").unwrap();
        assert_eq!(expr.function, AggregateFunction::Sum);
        assert_eq!(expr.argument, AggregateArg::Column("amount".into()));

        let expr = AggregateExpr::parse("COUNT(*)").unwrap();
        assert_eq!(expr.function, AggregateFunction::Count);
        assert_eq!(expr.argument, AggregateArg::Star);
    }

    #[test]
    fn test_parse_case_and_spacing() {
        let expr = AggregateExpr::parse(" avg( age ) ").unwrap();
        assert_eq!(expr.function, AggregateFunction::Avg);
        assert_eq!(expr.argument.as_str(), "age");
    }

    #[test]
    fn test_parse_qualified_argument() {
        let expr = AggregateExpr::parse("MAX(enrollment.grade)").unwrap();
        assert_eq!(expr.argument.as_str(), "enrollment.grade");
    }

    #[test]
    fn test_non_aggregates_are_columns() {
        assert!(AggregateExpr::parse("name").is_none());
        assert!(AggregateExpr::parse("MEDIAN(age)").is_none());
        assert!(AggregateExpr::parse("SUM(a + b)").is_none());
        assert!(AggregateExpr::parse("SUM()").is_none());
        assert!(AggregateExpr::parse("SUM(age").is_none());
        assert_eq!(OutputExpr::parse("student.name"), OutputExpr::Column);
    }
}
