//! SELECT statement parser
//!
//! ```text
//! SELECT <fields> FROM <table>
//!   [(INNER|LEFT|RIGHT) JOIN <table> ON <t.f> = <t.f>]
//!   [WHERE <cond> [AND <cond>]*]
//!   [GROUP BY <field>[, <field>]*]
//! ```
//!
//! Keywords are case-insensitive. A trailing `;` is ignored.

use std::sync::OnceLock;

use regex::Regex;

use super::ast::{JoinClause, JoinCondition, JoinType, QueryDescriptor, WhereClause};
use super::errors::{ParseError, ParseResult};

fn regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("hard-coded pattern compiles"))
}

fn select_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"(?is)^\s*SELECT\s+(?P<fields>.+?)\s+FROM\s+(?P<rest>.+?)\s*;?\s*$")
}

fn group_by_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"(?i)\s+GROUP\s+BY(\s+|$)")
}

fn where_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"(?i)\s+WHERE(\s+|$)")
}

fn join_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(
        &RE,
        r"(?is)^(?P<table>\S+)\s+(?P<kind>\w+)\s+JOIN\s+(?P<join_table>\S+)\s+ON\s+(?P<condition>.+)$",
    )
}

fn join_condition_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"^(?P<left>[\w.]+)\s*=\s*(?P<right>[\w.]+)$")
}

fn symbolic_condition_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(
        &RE,
        r"^(?P<field>[^\s<>=!]+)\s*(?P<op>[<>=!]+)\s*(?P<value>.+)$",
    )
}

fn word_condition_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(
        &RE,
        r"^(?P<field>\S+)\s+(?P<op>[A-Za-z]+)\s+(?P<value>.+)$",
    )
}

/// Parses query text into a [`QueryDescriptor`]
pub fn parse_query(text: &str) -> ParseResult<QueryDescriptor> {
    if text.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let caps = select_re().captures(text).ok_or_else(|| {
        ParseError::InvalidFormat("expected SELECT <fields> FROM <table>".to_string())
    })?;

    let fields = parse_fields(&caps["fields"])?;
    let rest = caps["rest"].trim();

    // GROUP BY is always last, WHERE precedes it
    let (rest, group_by_fields) = match group_by_re().find(rest) {
        Some(m) => (&rest[..m.start()], Some(parse_group_by(&rest[m.end()..])?)),
        None => (rest, None),
    };

    let (from_part, where_clauses) = match where_re().find(rest) {
        Some(m) => (&rest[..m.start()], parse_where(&rest[m.end()..])?),
        None => (rest, Vec::new()),
    };

    let (table, join) = parse_from(from_part.trim())?;

    let mut query = QueryDescriptor::new(table, fields);
    query.where_clauses = where_clauses;
    query.join = join;
    if let Some(group_by) = group_by_fields {
        query = query.with_group_by(group_by);
    }

    Ok(query)
}

/// Splits on commas outside parentheses
fn split_top_level(list: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();

    for c in list.chars() {
        match c {
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            ',' if depth == 0 => {
                parts.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    parts.push(current.trim().to_string());

    parts
}

fn parse_fields(list: &str) -> ParseResult<Vec<String>> {
    let fields = split_top_level(list);
    if fields.iter().any(|f| f.is_empty()) {
        return Err(ParseError::InvalidFormat(format!(
            "empty entry in field list '{}'",
            list.trim()
        )));
    }
    Ok(fields)
}

fn parse_group_by(list: &str) -> ParseResult<Vec<String>> {
    let fields: Vec<String> = list.split(',').map(|f| f.trim().to_string()).collect();
    if fields.iter().any(|f| f.is_empty()) {
        return Err(ParseError::InvalidGroupBy(format!(
            "empty entry in '{}'",
            list.trim()
        )));
    }
    Ok(fields)
}

fn parse_from(from: &str) -> ParseResult<(String, Option<JoinClause>)> {
    if from.is_empty() {
        return Err(ParseError::InvalidFormat("missing table name".to_string()));
    }

    let has_join = from
        .split_whitespace()
        .any(|word| word.eq_ignore_ascii_case("JOIN"));

    if !has_join {
        if from.split_whitespace().count() != 1 {
            return Err(ParseError::InvalidFormat(format!(
                "unexpected text after table name: '{}'",
                from
            )));
        }
        return Ok((from.to_string(), None));
    }

    let caps = join_re()
        .captures(from)
        .ok_or_else(|| ParseError::InvalidJoin(from.to_string()))?;

    let kind = JoinType::from_keyword(&caps["kind"])
        .ok_or_else(|| ParseError::Unsupported(format!("{} JOIN", &caps["kind"])))?;

    let condition_text = caps["condition"].trim();
    let condition = join_condition_re()
        .captures(condition_text)
        .ok_or_else(|| {
            ParseError::InvalidJoin(format!(
                "expected <table.field> = <table.field>, got '{}'",
                condition_text
            ))
        })?;

    let join = JoinClause {
        kind,
        table: caps["join_table"].to_string(),
        condition: JoinCondition::new(&condition["left"], &condition["right"]),
    };

    Ok((caps["table"].to_string(), Some(join)))
}

fn parse_where(text: &str) -> ParseResult<Vec<WhereClause>> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ParseError::InvalidWhere("empty condition".to_string()));
    }
    if text.starts_with('(') {
        return Err(ParseError::Unsupported(
            "parenthesized WHERE conditions".to_string(),
        ));
    }

    split_conditions(text)?
        .into_iter()
        .map(parse_condition)
        .collect()
}

/// Splits a WHERE body on AND keywords outside quoted values.
///
/// A quoted value is one word, so `'Tom and Jerry'` never splits. An OR
/// keyword outside quotes is rejected.
fn split_conditions(text: &str) -> ParseResult<Vec<&str>> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut quote: Option<char> = None;
    let mut word_start: Option<usize> = None;

    // A trailing space closes the last word
    for (i, c) in text.char_indices().chain(std::iter::once((text.len(), ' '))) {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }

        if c == '\'' || c == '"' {
            quote = Some(c);
            word_start = word_start.or(Some(i));
        } else if c.is_whitespace() {
            if let Some(ws) = word_start.take() {
                let word = &text[ws..i];
                if word.eq_ignore_ascii_case("AND") {
                    parts.push(&text[start..ws]);
                    start = i;
                } else if word.eq_ignore_ascii_case("OR") {
                    return Err(ParseError::Unsupported("OR in WHERE clause".to_string()));
                }
            }
        } else {
            word_start = word_start.or(Some(i));
        }
    }

    if quote.is_some() {
        return Err(ParseError::InvalidWhere(format!(
            "unterminated quote in '{}'",
            text
        )));
    }

    parts.push(&text[start..]);
    Ok(parts)
}

fn parse_condition(condition: &str) -> ParseResult<WhereClause> {
    let condition = condition.trim();
    let caps = symbolic_condition_re()
        .captures(condition)
        .or_else(|| word_condition_re().captures(condition))
        .ok_or_else(|| ParseError::InvalidWhere(condition.to_string()))?;

    Ok(WhereClause::new(
        &caps["field"],
        &caps["op"],
        strip_quotes(caps["value"].trim()),
    ))
}

fn strip_quotes(value: &str) -> &str {
    for quote in ['\'', '"'] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
