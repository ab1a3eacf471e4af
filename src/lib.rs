//! schema-recover: recovers database schemas from loosely structured text
//!
//! Three independent parsers turn untrusted text into typed values:
//!
//! - [`parser::parse_csv`]: Excel-compatible CSV with delimiter detection
//! - [`parser::parse_sql_schema`]: tables and columns from `CREATE TABLE` DDL
//! - [`parser::extract_json_objects`]: JSON values embedded in model output
//!
//! All parsers are pure functions over a string. [`recover`] is a thin
//! file-level driver used by the command line tool.

pub mod error;
pub mod model;
pub mod parser;
pub mod util;

use std::path::{Path, PathBuf};

use anyhow::Result;
use rayon::prelude::*;
use serde::Serialize;
use serde_json::{Map, Value};

pub use error::SchemaRecoverError;
use model::{CanonicalField, FormSchema};
use parser::{ColumnSplit, CsvOptions, DdlOptions, ParsedTable, Row};

/// Default ceiling on input size for file-level recovery (10 MiB)
pub const DEFAULT_MAX_INPUT_BYTES: usize = 10 * 1024 * 1024;

/// Which parser an input is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Csv,
    Sql,
    Json,
    /// JSON whose values are field maps or schemas to normalize
    Fields,
}

impl InputKind {
    /// Infer the kind from a file extension (`.csv`/`.tsv`/`.txt`, `.sql`/`.ddl`, else JSON)
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("csv" | "tsv" | "txt") => InputKind::Csv,
            Some("sql" | "ddl") => InputKind::Sql,
            _ => InputKind::Json,
        }
    }
}

/// Options for recovering one input file
#[derive(Debug, Clone)]
pub struct RecoverOptions {
    /// Path to the input file
    pub input_path: PathBuf,
    /// Parser to use
    pub kind: InputKind,
    /// Explicit CSV delimiter (overrides `sep=` and detection)
    pub delimiter: Option<char>,
    /// How DDL table bodies are split into columns
    pub column_split: ColumnSplit,
    /// Inputs larger than this are rejected before parsing
    pub max_input_bytes: usize,
}

impl RecoverOptions {
    pub fn new(input_path: impl Into<PathBuf>, kind: InputKind) -> Self {
        Self {
            input_path: input_path.into(),
            kind,
            delimiter: None,
            column_split: ColumnSplit::default(),
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
        }
    }
}

/// Structures recovered from one input
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Recovered {
    Csv {
        rows: Vec<Row>,
        schema: FormSchema,
        records: Vec<Map<String, Value>>,
    },
    Sql {
        tables: Vec<ParsedTable>,
    },
    Json {
        values: Vec<Value>,
        failures: usize,
        /// Object values as schemas, dependency ordered
        schemas: Vec<FormSchema>,
    },
    Fields {
        fields: Vec<CanonicalField>,
    },
}

/// Read, decode and parse one input file
pub fn recover(options: &RecoverOptions) -> Result<Recovered> {
    let path = &options.input_path;
    let bytes = std::fs::read(path).map_err(|source| SchemaRecoverError::InputReadError {
        path: path.clone(),
        source,
    })?;

    if bytes.len() > options.max_input_bytes {
        return Err(SchemaRecoverError::InputTooLarge {
            len: bytes.len(),
            limit: options.max_input_bytes,
        }
        .into());
    }

    let text = util::decode_text(&bytes)
        .ok_or_else(|| SchemaRecoverError::UndecodableInput { path: path.clone() })?;

    tracing::info!(
        path = %path.display(),
        kind = ?options.kind,
        bytes = bytes.len(),
        "recovering input"
    );

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("schema");

    let recovered = match options.kind {
        InputKind::Csv => {
            let rows = parser::parse_csv_with_options(
                &text,
                &CsvOptions {
                    delimiter: options.delimiter,
                },
            );
            let import = model::import_csv(&rows, stem);
            Recovered::Csv {
                rows,
                schema: import.schema,
                records: import.records,
            }
        }
        InputKind::Sql => Recovered::Sql {
            tables: parser::parse_sql_schema_with_options(
                &text,
                &DdlOptions {
                    column_split: options.column_split,
                },
            ),
        },
        InputKind::Json => {
            let extraction = parser::extract_json_objects(&text)?;
            let schemas = model::order_by_dependency(model::collect_schemas(
                extraction.values.clone(),
                stem,
            ));
            Recovered::Json {
                values: extraction.values,
                failures: extraction.failures,
                schemas,
            }
        }
        InputKind::Fields => {
            let extraction = parser::extract_json_objects(&text)?;
            let mut fields = Vec::new();
            for value in &extraction.values {
                let raw = value.get("fields").unwrap_or(value);
                fields.extend(model::normalize_fields(raw)?);
            }
            Recovered::Fields { fields }
        }
    };

    Ok(recovered)
}

/// Recover several inputs in parallel; results keep the input order.
pub fn recover_many(options: &[RecoverOptions]) -> Vec<Result<Recovered>> {
    options.par_iter().map(recover).collect()
}
