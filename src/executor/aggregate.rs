//! Grouping and aggregate evaluation
//!
//! Two entry points:
//! - [`Aggregator::group_by`]: one output row per distinct group key, in
//!   first-seen order, supporting SUM, MIN, MAX and COUNT.
//! - [`Aggregator::summarize`]: a single row over the whole input,
//!   additionally supporting AVG.
//!
//! Values are coerced to `f64` only here. A value that does not parse
//! becomes NaN and NaN propagates through SUM, MIN, MAX and AVG.

use std::collections::HashMap;

use crate::parser::{AggregateExpr, AggregateFunction, OutputExpr};
use crate::table::{Row, Value};

/// Separator between the parts of a group key.
///
/// Values containing it can collide (`"a-b" + "c"` vs `"a" + "b-c"`).
pub const GROUP_KEY_SEPARATOR: &str = "-";

/// Builds the group key of a row
pub fn group_key(row: &Row, group_by_fields: &[String]) -> String {
    group_by_fields
        .iter()
        .map(|field| row.get_or_null(field).key_fragment())
        .collect::<Vec<_>>()
        .join(GROUP_KEY_SEPARATOR)
}

fn add(a: f64, b: f64) -> f64 {
    a + b
}

fn nan_min(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.min(b)
    }
}

fn nan_max(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.max(b)
    }
}

/// An output expression parsed once, paired with its column name
struct Planned<'a> {
    name: &'a str,
    expr: OutputExpr,
}

/// Parses output expressions for grouping. AVG is not a grouped
/// aggregate and is treated as a plain column.
fn plan_grouped(output_exprs: &[String]) -> Vec<Planned<'_>> {
    output_exprs
        .iter()
        .map(|name| {
            let expr = match OutputExpr::parse(name) {
                OutputExpr::Aggregate(AggregateExpr {
                    function: AggregateFunction::Avg,
                    ..
                }) => OutputExpr::Column,
                other => other,
            };
            Planned {
                name: name.as_str(),
                expr,
            }
        })
        .collect()
}

/// Per-group running state.
///
/// A row that already carries a number under an aggregate's own column
/// name is the output of an earlier grouping pass; that number is folded
/// in as a partial result instead of reading the raw argument.
#[derive(Debug, Clone)]
pub struct GroupAccumulator {
    first_row: Row,
    count: f64,
    /// Running SUM/MIN/MAX per output expression, seeded by the first value
    values: Vec<Option<f64>>,
}

impl GroupAccumulator {
    fn new(first_row: Row, width: usize) -> Self {
        Self {
            first_row,
            count: 0.0,
            values: vec![None; width],
        }
    }

    fn observe(&mut self, row: &Row, planned: &[Planned<'_>]) {
        let partial_count = planned.iter().find_map(|p| match &p.expr {
            OutputExpr::Aggregate(agg) if agg.function == AggregateFunction::Count => {
                row.get(p.name).and_then(Value::as_number)
            }
            _ => None,
        });
        self.count += partial_count.unwrap_or(1.0);

        for (slot, p) in planned.iter().enumerate() {
            let OutputExpr::Aggregate(agg) = &p.expr else {
                continue;
            };

            let combine: fn(f64, f64) -> f64 = match agg.function {
                AggregateFunction::Sum => add,
                AggregateFunction::Min => nan_min,
                AggregateFunction::Max => nan_max,
                AggregateFunction::Count | AggregateFunction::Avg => continue,
            };

            let value = row
                .get(p.name)
                .and_then(Value::as_number)
                .unwrap_or_else(|| row.get_or_null(agg.argument.as_str()).to_f64());

            self.values[slot] = Some(match self.values[slot] {
                Some(acc) => combine(acc, value),
                None => value,
            });
        }
    }

    fn finalize(self, group_by_fields: &[String], planned: &[Planned<'_>]) -> Row {
        let mut row = Row::with_capacity(group_by_fields.len() + planned.len());

        for field in group_by_fields {
            row.insert(field.as_str(), self.first_row.get_or_null(field).clone());
        }

        for (slot, p) in planned.iter().enumerate() {
            if row.contains(p.name) {
                continue;
            }
            let value = match &p.expr {
                OutputExpr::Column => self.first_row.get_or_null(p.name).clone(),
                OutputExpr::Aggregate(agg) => match agg.function {
                    AggregateFunction::Count => Value::Number(self.count),
                    _ => self.values[slot].map_or(Value::Null, Value::Number),
                },
            };
            row.insert(p.name, value);
        }

        row
    }
}

/// Grouping and whole-set aggregation
pub struct Aggregator;

impl Aggregator {
    /// Groups rows by `group_by_fields` and evaluates `output_exprs` per group.
    ///
    /// Output has the group-by columns first, then the remaining output
    /// expressions in order. Groups appear in first-seen order.
    pub fn group_by(rows: &[Row], group_by_fields: &[String], output_exprs: &[String]) -> Vec<Row> {
        let planned = plan_grouped(output_exprs);

        let mut index: HashMap<String, usize> = HashMap::new();
        let mut groups: Vec<GroupAccumulator> = Vec::new();

        for row in rows {
            let key = group_key(row, group_by_fields);
            let position = *index.entry(key).or_insert_with(|| {
                groups.push(GroupAccumulator::new(row.clone(), planned.len()));
                groups.len() - 1
            });
            groups[position].observe(row, &planned);
        }

        groups
            .into_iter()
            .map(|group| group.finalize(group_by_fields, &planned))
            .collect()
    }

    /// Evaluates `output_exprs` over the whole row set as a single row.
    ///
    /// Over zero rows: COUNT is 0, SUM is 0, AVG is NaN and MIN/MAX are
    /// absent. Plain columns are copied from the first row.
    pub fn summarize(rows: &[Row], output_exprs: &[String]) -> Row {
        let mut result = Row::with_capacity(output_exprs.len());

        for name in output_exprs {
            let value = match OutputExpr::parse(name) {
                OutputExpr::Column => rows
                    .first()
                    .map_or(Value::Null, |row| row.get_or_null(name).clone()),
                OutputExpr::Aggregate(agg) => Self::aggregate(rows, &agg),
            };
            result.insert(name.as_str(), value);
        }

        result
    }

    fn aggregate(rows: &[Row], agg: &AggregateExpr) -> Value {
        let column = agg.argument.as_str();
        let values = rows.iter().map(|row| row.get_or_null(column).to_f64());

        match agg.function {
            AggregateFunction::Count => Value::from(rows.len()),
            AggregateFunction::Sum => Value::Number(values.sum()),
            AggregateFunction::Avg => Value::Number(values.sum::<f64>() / rows.len() as f64),
            AggregateFunction::Min => values.reduce(nan_min).map_or(Value::Null, Value::Number),
            AggregateFunction::Max => values.reduce(nan_max).map_or(Value::Null, Value::Number),
        }
    }
}
