//! Form schemas recovered from model output or CSV imports

use serde::Serialize;
use serde_json::{Map, Value};

use super::field::{normalize_fields, CanonicalField};
use crate::error::SchemaRecoverError;

/// A form schema: an id, its fields and any other producer keys
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormSchema {
    #[serde(rename = "formId")]
    pub form_id: String,
    /// Object keyed by field id, or an array of field objects
    pub fields: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FormSchema {
    /// Build a schema from a parsed JSON object.
    ///
    /// A missing or empty `formId` is replaced by `fallback_id`; a missing
    /// `fields` becomes an empty object.
    pub fn from_value(value: Value, fallback_id: &str) -> Result<Self, SchemaRecoverError> {
        let Value::Object(mut obj) = value else {
            return Err(SchemaRecoverError::InvalidFieldShape {
                message: "schema must be a JSON object".to_string(),
            });
        };

        let form_id = match obj.remove("formId") {
            Some(Value::String(id)) if !id.is_empty() => id,
            _ => fallback_id.to_string(),
        };
        let fields = match obj.remove("fields") {
            Some(Value::Null) | None => Value::Object(Map::new()),
            Some(fields) => fields,
        };

        Ok(FormSchema {
            form_id,
            fields,
            extra: obj,
        })
    }

    /// Fields in canonical form
    pub fn canonical_fields(&self) -> Result<Vec<CanonicalField>, SchemaRecoverError> {
        normalize_fields(&self.fields)
    }

    /// True if any field embeds or picks from another schema
    pub fn references_other_schemas(&self) -> bool {
        self.canonical_fields()
            .map(|fields| fields.iter().any(|f| f.kind().references_other_schema()))
            .unwrap_or(false)
    }
}

/// Turn extracted JSON values into schemas.
///
/// Top-level arrays are flattened one level; entries that are not objects
/// are skipped. Fallback ids are `{prefix}_{n}` with `n` counting from 1.
pub fn collect_schemas(values: Vec<Value>, fallback_prefix: &str) -> Vec<FormSchema> {
    values
        .into_iter()
        .flat_map(|value| match value {
            Value::Array(items) => items,
            other => vec![other],
        })
        .filter(Value::is_object)
        .enumerate()
        .filter_map(|(idx, value)| {
            FormSchema::from_value(value, &format!("{}_{}", fallback_prefix, idx + 1)).ok()
        })
        .collect()
}

/// Order schemas so that ones referencing others are saved last.
///
/// Stable: each group keeps its original order.
pub fn order_by_dependency(schemas: Vec<FormSchema>) -> Vec<FormSchema> {
    let (dependent, independent): (Vec<_>, Vec<_>) = schemas
        .into_iter()
        .partition(FormSchema::references_other_schemas);
    independent.into_iter().chain(dependent).collect()
}
