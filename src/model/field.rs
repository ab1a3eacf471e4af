//! Canonical field records
//!
//! Schema producers disagree on field shape. Model replies and CSV imports
//! key fields by id in an object; other producers send an array. Names vary
//! too (`fieldId` vs `name`, `fieldType` vs `type`, `isRequired` vs
//! `required`). [`normalize_fields`] absorbs all of that once, using the key
//! tables below, into [`CanonicalField`].

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::SchemaRecoverError;
use crate::parser::Column;

/// Keys holding the field id, first present wins
const ID_KEYS: [&str; 3] = ["fieldId", "name", "id"];
/// Keys holding the field type, first present wins
const TYPE_KEYS: [&str; 2] = ["fieldType", "type"];
/// Keys marking a field required; any truthy key sets the flag
const REQUIRED_KEYS: [&str; 3] = ["isRequired", "required", "isPrimary"];
/// Keys marking a field unique; any truthy key sets the flag
const UNIQUE_KEYS: [&str; 2] = ["isUnique", "unique"];

/// Known field types. Anything else is kept verbatim as `Other`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Numeric,
    Boolean,
    RefForm,
    Computed,
    Embed,
    RefPickList,
    Other(String),
}

impl FieldType {
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_uppercase().as_str() {
            "TEXT" => FieldType::Text,
            "NUMERIC" => FieldType::Numeric,
            "BOOLEAN" => FieldType::Boolean,
            "REF_FORM" => FieldType::RefForm,
            "COMPUTED" => FieldType::Computed,
            "EMBED" => FieldType::Embed,
            "REF_PICK_LIST" => FieldType::RefPickList,
            _ => FieldType::Other(name.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FieldType::Text => "TEXT",
            FieldType::Numeric => "NUMERIC",
            FieldType::Boolean => "BOOLEAN",
            FieldType::RefForm => "REF_FORM",
            FieldType::Computed => "COMPUTED",
            FieldType::Embed => "EMBED",
            FieldType::RefPickList => "REF_PICK_LIST",
            FieldType::Other(name) => name,
        }
    }

    /// Types that point at another schema and must be saved after it
    pub fn references_other_schema(&self) -> bool {
        matches!(self, FieldType::Embed | FieldType::RefPickList)
    }
}

/// Single normalized field representation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalField {
    pub id: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub required: bool,
    pub unique: bool,
    /// Every key not consumed above (`refFormId`, `formula`, ...), verbatim
    pub extra: Map<String, Value>,
}

impl CanonicalField {
    pub fn kind(&self) -> FieldType {
        FieldType::parse(&self.field_type)
    }
}

impl From<&Column> for CanonicalField {
    fn from(column: &Column) -> Self {
        let mut extra = Map::new();
        if column.is_primary_key {
            extra.insert("primaryKey".to_string(), Value::Bool(true));
        }
        CanonicalField {
            id: column.name.clone(),
            field_type: column.data_type.clone(),
            required: column.is_not_null || column.is_primary_key,
            unique: column.is_unique || column.is_primary_key,
            extra,
        }
    }
}

/// Normalize a field map (object keyed by id) or field array.
///
/// `null` yields no fields; any other non-container is rejected.
pub fn normalize_fields(raw: &Value) -> Result<Vec<CanonicalField>, SchemaRecoverError> {
    match raw {
        Value::Object(map) => Ok(map
            .iter()
            .map(|(key, entry)| normalize_entry(entry, Some(key)))
            .collect()),
        Value::Array(items) => Ok(items.iter().map(|entry| normalize_entry(entry, None)).collect()),
        Value::Null => Ok(Vec::new()),
        other => Err(SchemaRecoverError::InvalidFieldShape {
            message: format!("expected an object or array of fields, got {}", kind_name(other)),
        }),
    }
}

fn normalize_entry(entry: &Value, key: Option<&str>) -> CanonicalField {
    let empty = Map::new();
    let obj = entry.as_object().unwrap_or(&empty);

    let id = first_present(obj, &ID_KEYS)
        .and_then(scalar_to_string)
        .or_else(|| key.map(str::to_string))
        .unwrap_or_default();
    let field_type = first_present(obj, &TYPE_KEYS)
        .and_then(Value::as_str)
        .map_or_else(|| FieldType::Text.as_str().to_string(), str::to_string);

    let extra = obj
        .iter()
        .filter(|(k, _)| !is_consumed(k))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    CanonicalField {
        id,
        field_type,
        required: any_truthy(obj, &REQUIRED_KEYS),
        unique: any_truthy(obj, &UNIQUE_KEYS),
        extra,
    }
}

fn first_present<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .find(|value| !value.is_null())
}

fn any_truthy(obj: &Map<String, Value>, keys: &[&str]) -> bool {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .any(is_truthy)
}

fn is_consumed(key: &str) -> bool {
    ID_KEYS
        .iter()
        .chain(TYPE_KEYS.iter())
        .chain(REQUIRED_KEYS.iter())
        .chain(UNIQUE_KEYS.iter())
        .any(|k| *k == key)
}

/// Booleans as-is, non-zero numbers, and the string `"true"`.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
