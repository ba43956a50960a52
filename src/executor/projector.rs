//! Field projection

use crate::table::Row;

/// Extracts requested fields from rows
pub struct Projector;

impl Projector {
    /// Builds one row per input row holding exactly `fields`, in order.
    /// Missing fields come out absent.
    pub fn project(rows: &[Row], fields: &[String]) -> Vec<Row> {
        rows.iter()
            .map(|row| {
                fields
                    .iter()
                    .map(|field| (field.as_str(), row.get_or_null(field).clone()))
                    .collect::<Row>()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Value;

    #[test]
    fn test_project_selects_in_order() {
        let rows = vec![Row::new().with("id", "1").with("name", "Alice").with("age", "30")];
        let out = Projector::project(&rows, &["name".to_string(), "id".to_string()]);

        let names: Vec<_> = out[0].column_names().collect();
        assert_eq!(names, vec!["name", "id"]);
    }

    #[test]
    fn test_missing_field_is_absent() {
        let rows = vec![Row::new().with("id", "1")];
        let out = Projector::project(&rows, &["email".to_string()]);
        assert_eq!(out[0].get("email"), Some(&Value::Null));
    }
}
