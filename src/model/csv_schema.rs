//! Schema and record inference for tokenized CSV
//!
//! The first row is the header; the second row is the sample used to guess
//! each column's type. Every later row becomes a record with cells coerced
//! to the guessed type.

use serde_json::{Map, Number, Value};

use super::field::FieldType;
use super::schema::FormSchema;
use crate::parser::Row;

/// A schema plus the records converted from the data rows
#[derive(Debug, Clone, PartialEq)]
pub struct CsvImport {
    pub schema: FormSchema,
    pub records: Vec<Map<String, Value>>,
}

/// Guess a column type from one sample cell.
pub fn infer_field_type(sample: &str) -> FieldType {
    if parse_number(sample).is_some() {
        FieldType::Numeric
    } else if sample.eq_ignore_ascii_case("true") || sample.eq_ignore_ascii_case("false") {
        FieldType::Boolean
    } else {
        FieldType::Text
    }
}

/// Convert a cell to a JSON value of the given type.
///
/// Numeric cells that are empty or do not parse become `null`.
pub fn coerce_cell(value: &str, field_type: &FieldType) -> Value {
    match field_type {
        FieldType::Numeric => parse_number(value).unwrap_or(Value::Null),
        FieldType::Boolean => Value::Bool(value.eq_ignore_ascii_case("true")),
        _ => Value::String(value.to_string()),
    }
}

/// Parse a finite number, integers preferred. Surrounding whitespace is ignored.
fn parse_number(raw: &str) -> Option<Value> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(int) = trimmed.parse::<i64>() {
        return Some(Value::from(int));
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .and_then(Number::from_f64)
        .map(Value::Number)
}

/// Infer a schema from tokenized rows and convert the data rows.
pub fn import_csv(rows: &[Row], form_id: &str) -> CsvImport {
    let Some((header, data)) = rows.split_first() else {
        return CsvImport {
            schema: empty_schema(form_id),
            records: Vec::new(),
        };
    };

    let sample = data.first();
    let types: Vec<FieldType> = (0..header.len())
        .map(|idx| infer_field_type(cell(sample, idx)))
        .collect();

    let mut fields = Map::new();
    for (name, field_type) in header.iter().zip(&types) {
        let mut field = Map::new();
        field.insert("fieldId".to_string(), Value::String(name.clone()));
        field.insert("fieldType".to_string(), Value::String(field_type.as_str().to_string()));
        field.insert("allowMultiple".to_string(), Value::Bool(false));
        fields.insert(name.clone(), Value::Object(field));
    }

    let records: Vec<Map<String, Value>> = data
        .iter()
        .map(|row| {
            header
                .iter()
                .zip(&types)
                .enumerate()
                .map(|(idx, (name, field_type))| {
                    (name.clone(), coerce_cell(cell(Some(row), idx), field_type))
                })
                .collect()
        })
        .collect();

    tracing::debug!(columns = header.len(), records = data.len(), "inferred CSV schema");

    let mut extra = Map::new();
    extra.insert(
        "description".to_string(),
        Value::String(format!("Auto-generated schema from CSV: {}", form_id)),
    );

    CsvImport {
        schema: FormSchema {
            form_id: form_id.to_string(),
            fields: Value::Object(fields),
            extra,
        },
        records,
    }
}

fn cell(row: Option<&Row>, idx: usize) -> &str {
    row.and_then(|r| r.get(idx)).map_or("", String::as_str)
}

fn empty_schema(form_id: &str) -> FormSchema {
    FormSchema {
        form_id: form_id.to_string(),
        fields: Value::Object(Map::new()),
        extra: Map::new(),
    }
}
