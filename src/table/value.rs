//! Cell values
//!
//! Loaded cells are always text. Numbers only appear once an aggregate
//! has been evaluated; coercion happens at that point and nowhere else.

use std::fmt;

use serde::{Serialize, Serializer};

/// Largest integer an f64 represents exactly
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// A single cell value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value (unmatched join side, missing column)
    Null,
    /// Raw text as read from the source
    Text(String),
    /// Result of aggregate evaluation
    Number(f64),
}

impl Value {
    /// Create a text value
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    /// Returns true for the absent value
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the text if this is a text value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the number if this is a number value
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Coerces to a real number for aggregate arithmetic.
    ///
    /// Text that does not parse and the absent value both yield NaN.
    pub fn to_f64(&self) -> f64 {
        match self {
            Value::Null => f64::NAN,
            Value::Text(s) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
            Value::Number(n) => *n,
        }
    }

    /// Fragment used when building a group key
    pub(crate) fn key_fragment(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Text(s) => s.clone(),
            Value::Number(n) => format_number(*n),
        }
    }
}

fn is_integral(n: f64) -> bool {
    n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_EXACT_INT
}

fn format_number(n: f64) -> String {
    if is_integral(n) {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Text(s) => write!(f, "{}", s),
            Value::Number(n) => write!(f, "{}", format_number(*n)),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Text(s) => serializer.serialize_str(s),
            // JSON has no NaN or infinity
            Value::Number(n) if !n.is_finite() => serializer.serialize_none(),
            Value::Number(n) if is_integral(*n) => serializer.serialize_i64(*n as i64),
            Value::Number(n) => serializer.serialize_f64(*n),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(n as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_f64_coercion() {
        assert_eq!(Value::text("42").to_f64(), 42.0);
        assert_eq!(Value::text(" 2.5 ").to_f64(), 2.5);
        assert!(Value::text("abc").to_f64().is_nan());
        assert!(Value::Null.to_f64().is_nan());
        assert_eq!(Value::Number(7.0).to_f64(), 7.0);
    }

    #[test]
    fn test_serialize_integral_number_as_integer() {
        let out = serde_json::to_value(Value::Number(150.0)).unwrap();
        assert_eq!(out, json!(150));
        assert_eq!(serde_json::to_string(&Value::Number(150.0)).unwrap(), "150");
    }

    #[test]
    fn test_serialize_fractional_and_nan() {
        assert_eq!(serde_json::to_value(Value::Number(2.5)).unwrap(), json!(2.5));
        assert_eq!(serde_json::to_value(Value::Number(f64::NAN)).unwrap(), json!(null));
        assert_eq!(serde_json::to_value(Value::Null).unwrap(), json!(null));
        assert_eq!(serde_json::to_value(Value::text("x")).unwrap(), json!("x"));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Number(3.0).to_string(), "3");
        assert_eq!(Value::Number(0.5).to_string(), "0.5");
        assert_eq!(Value::Null.to_string(), "NULL");
    }
}
