//! Structural reader for `CREATE TABLE` statements
//!
//! Recovers table and column names, raw column types and the three column
//! flags (`PRIMARY KEY`, `NOT NULL`, `UNIQUE`) from DDL text. This is not a
//! SQL validator: anything that does not look like a table header or a
//! column line is skipped without error.
//!
//! All patterns run on the `regex` crate, whose matching time is linear in
//! the input, so adversarial DDL cannot trigger catastrophic backtracking.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::column_split::{split_segments, ColumnSplit};
use crate::util::{contains_ci, starts_with_ci};

/// `CREATE TABLE [IF NOT EXISTS] name ( body ) ;`
static CREATE_TABLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)CREATE\s+TABLE\s+(?:IF\s+NOT\s+EXISTS\s+)?([A-Za-z0-9_."`]+)\s*\(([\s\S]+?)\)\s*;"#,
    )
    .expect("Invalid CREATE TABLE regex")
});

/// `name type[(p[, s])] rest`, identifiers and digits ASCII only
static COLUMN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?s)^([A-Za-z0-9_."`]+)\s+([A-Za-z0-9_]+(?:\([0-9]+(?:,\s*[0-9]+)?\))?)(.*)$"#,
    )
    .expect("Invalid column regex")
});

/// Segment prefixes that introduce table-level constraints rather than columns
const TABLE_CONSTRAINT_PREFIXES: [&str; 4] = ["PRIMARY KEY", "FOREIGN KEY", "CONSTRAINT", "CHECK"];

/// Options for DDL parsing
#[derive(Debug, Clone, Copy, Default)]
pub struct DdlOptions {
    pub column_split: ColumnSplit,
}

/// A table recovered from a `CREATE TABLE` statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedTable {
    #[serde(rename = "tableName")]
    pub name: String,
    pub columns: Vec<Column>,
}

/// A column definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub name: String,
    /// Lowercased type token including any precision suffix, e.g. `numeric(10,2)`
    #[serde(rename = "type")]
    pub data_type: String,
    pub is_primary_key: bool,
    pub is_not_null: bool,
    pub is_unique: bool,
}

/// Parse every `CREATE TABLE` statement in `sql` using the default options.
pub fn parse_sql_schema(sql: &str) -> Vec<ParsedTable> {
    parse_sql_schema_with_options(sql, &DdlOptions::default())
}

/// Parse every `CREATE TABLE` statement in `sql`.
///
/// Tables whose body yields no columns are omitted.
pub fn parse_sql_schema_with_options(sql: &str, options: &DdlOptions) -> Vec<ParsedTable> {
    let mut tables = Vec::new();

    for caps in CREATE_TABLE_RE.captures_iter(sql) {
        let (Some(name), Some(body)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        let name = strip_identifier_quotes(name.as_str());

        let columns: Vec<Column> = split_segments(body.as_str(), options.column_split)
            .iter()
            .filter(|segment| !is_table_constraint(segment))
            .filter_map(|segment| parse_column(segment))
            .collect();

        if name.is_empty() || columns.is_empty() {
            tracing::debug!(table = %name, "skipping table with no recoverable columns");
            continue;
        }

        tables.push(ParsedTable { name, columns });
    }

    tables
}

fn strip_identifier_quotes(ident: &str) -> String {
    ident.replace(['"', '`'], "")
}

fn is_table_constraint(segment: &str) -> bool {
    TABLE_CONSTRAINT_PREFIXES
        .iter()
        .any(|prefix| starts_with_ci(segment, prefix))
}

/// Parse one column line; `None` if it does not look like `name type ...`.
fn parse_column(segment: &str) -> Option<Column> {
    let Some(caps) = COLUMN_RE.captures(segment) else {
        tracing::trace!(segment, "segment is not a column definition");
        return None;
    };

    let name = strip_identifier_quotes(caps.get(1)?.as_str());
    let data_type = caps.get(2)?.as_str().to_lowercase();
    let constraints = caps.get(3).map_or("", |m| m.as_str());

    Some(Column {
        name,
        data_type,
        is_primary_key: contains_ci(constraints, "PRIMARY KEY"),
        is_not_null: contains_ci(constraints, "NOT NULL"),
        is_unique: contains_ci(constraints, "UNIQUE"),
    })
}
