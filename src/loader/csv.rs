//! Delimited text reader
//!
//! First record is the header. Fields may be quoted with `"`; a doubled
//! `""` inside a quoted field is a literal quote. Quoted fields may span
//! lines. Blank lines are skipped.

use crate::table::{Row, Table, Value};

use super::errors::{LoaderError, LoaderResult};

/// Parses delimited `content` into rows keyed by the header.
///
/// `source_name` only appears in error messages.
pub fn parse_delimited(content: &str, delimiter: char, source_name: &str) -> LoaderResult<Table> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut records = Records::new(content, delimiter, source_name);

    let header = match records.next_record()? {
        Some((_, header)) => header,
        None => return Ok(Table::new()),
    };

    let mut rows = Table::new();
    while let Some((line, fields)) = records.next_record()? {
        if fields.len() != header.len() {
            return Err(LoaderError::malformed(
                source_name,
                line,
                format!("expected {} fields, found {}", header.len(), fields.len()),
            ));
        }

        let mut row = Row::with_capacity(header.len());
        for (column, field) in header.iter().zip(fields) {
            row.insert(column.as_str(), Value::Text(field));
        }
        rows.push(row);
    }

    Ok(rows)
}

/// Record-at-a-time tokenizer
struct Records<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    delimiter: char,
    source_name: &'a str,
    line: usize,
}

impl<'a> Records<'a> {
    fn new(content: &'a str, delimiter: char, source_name: &'a str) -> Self {
        Self {
            chars: content.chars().peekable(),
            delimiter,
            source_name,
            line: 1,
        }
    }

    /// Returns the next non-blank record with the line it started on
    fn next_record(&mut self) -> LoaderResult<Option<(usize, Vec<String>)>> {
        loop {
            if self.chars.peek().is_none() {
                return Ok(None);
            }

            let start_line = self.line;
            let fields = self.read_record()?;

            let blank = fields.len() == 1 && fields[0].is_empty();
            if !blank {
                return Ok(Some((start_line, fields)));
            }
        }
    }

    fn read_record(&mut self) -> LoaderResult<Vec<String>> {
        let mut fields = Vec::new();
        let mut field = String::new();
        let mut quoted = false;
        let mut was_quoted = false;
        let quote_line = self.line;

        while let Some(c) = self.chars.next() {
            if quoted {
                match c {
                    '"' if self.chars.peek() == Some(&'"') => {
                        self.chars.next();
                        field.push('"');
                    }
                    '"' => quoted = false,
                    '\n' => {
                        self.line += 1;
                        field.push(c);
                    }
                    _ => field.push(c),
                }
                continue;
            }

            match c {
                '"' if field.is_empty() && !was_quoted => {
                    quoted = true;
                    was_quoted = true;
                }
                c if c == self.delimiter => {
                    fields.push(std::mem::take(&mut field));
                    was_quoted = false;
                }
                '\r' if self.chars.peek() == Some(&'\n') => {}
                '\n' => {
                    self.line += 1;
                    fields.push(field);
                    return Ok(fields);
                }
                _ => {
                    if was_quoted {
                        return Err(LoaderError::malformed(
                            self.source_name,
                            self.line,
                            "unexpected character after closing quote",
                        ));
                    }
                    field.push(c);
                }
            }
        }

        if quoted {
            return Err(LoaderError::malformed(
                self.source_name,
                quote_line,
                "unterminated quoted field",
            ));
        }

        fields.push(field);
        Ok(fields)
    }
}
