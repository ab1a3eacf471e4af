//! Excel-compatible CSV tokenizer
//!
//! A single left-to-right scan with one character of lookahead, replicating
//! how spreadsheet applications read CSV:
//!
//! - A quote opens a quoted span only at the very start of a field; anywhere
//!   else it is kept as a literal character.
//! - Inside a quoted span `""` is a literal quote, delimiters and line breaks
//!   are ordinary content, and a lone quote closes the span.
//! - `\r\n`, `\n` and a lone `\r` all end a row.
//! - Fields are never trimmed.
//!
//! The tokenizer never fails. An unterminated quote absorbs the rest of the
//! input into one field, which is flushed as the final row.

use super::delimiter::{detect_delimiter, parse_sep_hint};
use crate::util::{split_first_line, strip_bom};

/// One CSV row; insertion order is column order.
pub type Row = Vec<String>;

/// Options for CSV parsing
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvOptions {
    /// Explicit delimiter. Overrides both the `sep=` hint and detection.
    pub delimiter: Option<char>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Unquoted,
    Quoted,
}

/// Parse CSV `content`, detecting the delimiter unless one is given.
pub fn parse_csv(content: &str, delimiter: Option<char>) -> Vec<Row> {
    parse_csv_with_options(content, &CsvOptions { delimiter })
}

/// Parse CSV `content` according to `options`.
pub fn parse_csv_with_options(content: &str, options: &CsvOptions) -> Vec<Row> {
    let content = strip_bom(content);
    let (hint, body) = take_sep_hint(content);
    let delimiter = options
        .delimiter
        .or(hint)
        .unwrap_or_else(|| detect_delimiter(body));

    tracing::debug!(delimiter = ?delimiter, hinted = hint.is_some(), "tokenizing CSV");
    tokenize(body, delimiter)
}

/// Remove a leading `sep=X` line, returning the hinted delimiter and the body.
fn take_sep_hint(content: &str) -> (Option<char>, &str) {
    let (first_line, rest) = split_first_line(content);
    match parse_sep_hint(first_line) {
        Some(delimiter) => (Some(delimiter), rest),
        None => (None, content),
    }
}

/// Accumulates the row currently being built.
#[derive(Default)]
struct RowBuilder {
    rows: Vec<Row>,
    row: Row,
    field: String,
    /// Anything (a character, a delimiter, a quote) was consumed on this row.
    dirty: bool,
}

impl RowBuilder {
    fn push_char(&mut self, ch: char) {
        self.field.push(ch);
        self.dirty = true;
    }

    fn end_field(&mut self) {
        self.row.push(std::mem::take(&mut self.field));
        self.dirty = true;
    }

    /// End the current row. Blank lines produce no row.
    fn end_row(&mut self) {
        if self.dirty {
            self.row.push(std::mem::take(&mut self.field));
            self.rows.push(std::mem::take(&mut self.row));
        }
        self.dirty = false;
    }

    fn finish(mut self) -> Vec<Row> {
        self.end_row();
        self.rows
    }
}

fn tokenize(body: &str, delimiter: char) -> Vec<Row> {
    let mut out = RowBuilder::default();
    let mut state = State::Unquoted;
    let mut chars = body.chars().peekable();

    while let Some(ch) = chars.next() {
        match state {
            State::Quoted => {
                if ch == '"' {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        out.push_char('"');
                    } else {
                        state = State::Unquoted;
                    }
                } else {
                    out.push_char(ch);
                }
            }
            State::Unquoted => match ch {
                '"' if out.field.is_empty() => {
                    state = State::Quoted;
                    out.dirty = true;
                }
                c if c == delimiter => out.end_field(),
                '\r' => {
                    if chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                    out.end_row();
                }
                '\n' => out.end_row(),
                c => out.push_char(c),
            },
        }
    }

    out.finish()
}
