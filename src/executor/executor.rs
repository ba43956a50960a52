//! Query orchestration
//!
//! Stages run in a fixed order: load, join, group, filter, then dispatch
//! on query shape. Grouping runs before filtering, so a WHERE clause on a
//! grouped query sees the grouped rows.

use crate::loader::TableLoader;
use crate::observability::{log_event_with_fields, Event, ObservationScope};
use crate::parser::{parse_query, QueryDescriptor};
use crate::table::Row;

use super::aggregate::Aggregator;
use super::errors::{ExecutorError, ExecutorResult};
use super::filters::PredicateFilter;
use super::join::JoinEvaluator;
use super::projector::Projector;

/// Runs SELECT queries against tables supplied by a loader
///
/// The engine keeps no state between calls; every query reloads its tables.
pub struct QueryEngine<L: TableLoader> {
    loader: L,
}

impl<L: TableLoader> QueryEngine<L> {
    /// Creates an engine over `loader`
    pub fn new(loader: L) -> Self {
        Self { loader }
    }

    /// Returns the loader
    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Parses `text` and executes it
    pub async fn execute_select(&self, text: &str) -> ExecutorResult<Vec<Row>> {
        log_event_with_fields(Event::QueryReceived, &[("sql", text)]);

        let query = match parse_query(text) {
            Ok(query) => query,
            Err(err) => {
                let err = ExecutorError::from(err);
                reject(&err);
                return Err(err);
            }
        };
        log_event_with_fields(Event::QueryParsed, &[("table", &query.table)]);

        self.execute(&query).await
    }

    /// Executes a parsed query
    pub async fn execute(&self, query: &QueryDescriptor) -> ExecutorResult<Vec<Row>> {
        let scope = ObservationScope::with_fields("QUERY", &[("table", query.table.as_str())]);

        match self.run(query).await {
            Ok(rows) => {
                let count = rows.len().to_string();
                log_event_with_fields(
                    Event::QueryExecuted,
                    &[("table", &query.table), ("rows", &count)],
                );
                scope.complete_with_fields(&[("rows", &count)]);
                Ok(rows)
            }
            Err(err) => {
                reject(&err);
                scope.fail(err.code(), &err.to_string());
                Err(err)
            }
        }
    }

    async fn run(&self, query: &QueryDescriptor) -> ExecutorResult<Vec<Row>> {
        let mut rows = self.loader.load_table(&query.table).await?;

        if let Some(join) = &query.join {
            let joined = self.loader.load_table(&join.table).await?;
            rows = JoinEvaluator::join(
                join.kind,
                &rows,
                &joined,
                &join.condition,
                &query.fields,
                &query.table,
            );
            log_stage(Event::JoinApplied, &rows);
        }

        if let Some(group_by) = &query.group_by_fields {
            rows = Aggregator::group_by(&rows, group_by, &query.fields);
            log_stage(Event::GroupingApplied, &rows);
        }

        let filtered = PredicateFilter::filter(rows, &query.where_clauses)?;
        log_stage(Event::FilterApplied, &filtered);

        if query.has_aggregate_without_group_by {
            return Ok(vec![Aggregator::summarize(&filtered, &query.fields)]);
        }
        if let Some(group_by) = &query.group_by_fields {
            return Ok(Aggregator::group_by(&filtered, group_by, &query.fields));
        }
        Ok(Projector::project(&filtered, &query.fields))
    }
}

/// Parses and executes `text` against `loader` in one call
pub async fn execute_select<L: TableLoader>(loader: &L, text: &str) -> ExecutorResult<Vec<Row>> {
    QueryEngine::new(loader).execute_select(text).await
}

fn log_stage(event: Event, rows: &[Row]) {
    let count = rows.len().to_string();
    log_event_with_fields(event, &[("rows", &count)]);
}

fn reject(err: &ExecutorError) {
    let message = err.to_string();
    log_event_with_fields(Event::QueryRejected, &[("code", err.code()), ("message", &message)]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{LoaderError, MemoryTableLoader};
    use crate::parser::ParseError;
    use crate::table::Value;

    fn engine() -> QueryEngine<MemoryTableLoader> {
        let loader = MemoryTableLoader::new()
            .with_table(
                "orders",
                vec![
                    Row::new().with("id", "1").with("amount", "50"),
                    Row::new().with("id", "2").with("amount", "150"),
                ],
            )
            .with_table(
                "employees",
                vec![
                    Row::new().with("id", "1").with("dept", "eng"),
                    Row::new().with("id", "2").with("dept", "eng"),
                    Row::new().with("id", "3").with("dept", "hr"),
                ],
            )
            .with_table(
                "student",
                vec![
                    Row::new().with("id", "1").with("name", "John"),
                    Row::new().with("id", "2").with("name", "Jane"),
                    Row::new().with("id", "3").with("name", "Bob"),
                ],
            )
            .with_table(
                "enrollment",
                vec![
                    Row::new().with("student_id", "1").with("course", "Math"),
                    Row::new().with("student_id", "2").with("course", "Chemistry"),
                    Row::new().with("student_id", "5").with("course", "Biology"),
                ],
            );
        QueryEngine::new(loader)
    }

    #[tokio::test]
    async fn test_sum_with_where() {
        let rows = engine()
            .execute_select("SELECT SUM(amount) FROM orders WHERE amount > 100")
            .await
            .unwrap();
        assert_eq!(rows, vec![Row::new().with("SUM(amount)", 150.0)]);
    }

    #[tokio::test]
    async fn test_group_by_count() {
        let rows = engine()
            .execute_select("SELECT dept, COUNT(*) FROM employees GROUP BY dept")
            .await
            .unwrap();
        assert_eq!(
            rows,
            vec![
                Row::new().with("dept", "eng").with("COUNT(*)", 2.0),
                Row::new().with("dept", "hr").with("COUNT(*)", 1.0),
            ]
        );
    }

    #[tokio::test]
    async fn test_plain_projection() {
        let rows = engine()
            .execute_select("SELECT id FROM orders WHERE amount < 100")
            .await
            .unwrap();
        assert_eq!(rows, vec![Row::new().with("id", "1")]);
    }

    #[tokio::test]
    async fn test_grouped_where_on_group_column() {
        let rows = engine()
            .execute_select("SELECT dept, COUNT(*) FROM employees WHERE dept = 'hr' GROUP BY dept")
            .await
            .unwrap();
        assert_eq!(rows, vec![Row::new().with("dept", "hr").with("COUNT(*)", 1.0)]);
    }

    #[tokio::test]
    async fn test_grouped_where_on_raw_column_sees_grouped_rows() {
        // Grouped rows carry no `id` column, so the clause matches nothing
        let rows = engine()
            .execute_select("SELECT dept, COUNT(*) FROM employees WHERE id = 1 GROUP BY dept")
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_left_join() {
        let rows = engine()
            .execute_select(
                "SELECT student.name, enrollment.course FROM student \
                 LEFT JOIN enrollment ON student.id = enrollment.student_id",
            )
            .await
            .unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2].get("student.name"), Some(&Value::text("Bob")));
        assert_eq!(rows[2].get("enrollment.course"), Some(&Value::Null));
    }

    #[tokio::test]
    async fn test_join_then_filter() {
        let rows = engine()
            .execute_select(
                "SELECT student.name, enrollment.course FROM student \
                 INNER JOIN enrollment ON student.id = enrollment.student_id \
                 WHERE enrollment.course = 'Math'",
            )
            .await
            .unwrap();
        assert_eq!(
            rows,
            vec![Row::new()
                .with("student.name", "John")
                .with("enrollment.course", "Math")]
        );
    }

    #[tokio::test]
    async fn test_unsupported_operator_aborts() {
        let query = QueryDescriptor::new("orders", ["id"]).with_where("amount", "<>", "5");
        let err = engine().execute(&query).await.unwrap_err();
        assert_eq!(err, ExecutorError::UnsupportedOperator("<>".to_string()));
    }

    #[tokio::test]
    async fn test_missing_table() {
        let err = engine().execute_select("SELECT id FROM nowhere").await.unwrap_err();
        assert_eq!(
            err,
            ExecutorError::Load(LoaderError::table_not_found("nowhere", "memory"))
        );
        assert_eq!(err.code(), "FQ_TABLE_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_missing_join_table() {
        let err = engine()
            .execute_select("SELECT a.x FROM orders INNER JOIN nowhere ON orders.id = nowhere.id")
            .await
            .unwrap_err();
        assert_eq!(err.code(), "FQ_TABLE_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_parse_error_surfaces() {
        let err = engine().execute_select("DELETE FROM orders").await.unwrap_err();
        assert!(matches!(err, ExecutorError::Parse(ParseError::InvalidFormat(_))));
    }

    #[tokio::test]
    async fn test_free_function_matches_engine() {
        let engine = engine();
        let sql = "SELECT dept, COUNT(*) FROM employees GROUP BY dept";

        let direct = engine.execute_select(sql).await.unwrap();
        let one_shot = execute_select(engine.loader(), sql).await.unwrap();
        assert_eq!(direct, one_shot);

        let err = execute_select(engine.loader(), "SELECT FROM").await.unwrap_err();
        assert_eq!(err.code(), "FQ_QUERY_INVALID");
    }

    #[tokio::test]
    async fn test_free_function() {
        let loader = MemoryTableLoader::new()
            .with_table("t", vec![Row::new().with("a", "1"), Row::new().with("a", "2")]);
        let rows = execute_select(&loader, "SELECT COUNT(*) FROM t").await.unwrap();
        assert_eq!(rows, vec![Row::new().with("COUNT(*)", 2.0)]);
    }
}
