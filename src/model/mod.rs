//! Schema model: canonical fields, form schemas and CSV-derived schemas

mod csv_schema;
mod field;
mod schema;

pub use csv_schema::{coerce_cell, import_csv, infer_field_type, CsvImport};
pub use field::{normalize_fields, CanonicalField, FieldType};
pub use schema::{collect_schemas, order_by_dependency, FormSchema};
