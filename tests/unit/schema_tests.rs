//! Form schema and CSV schema inference tests

use pretty_assertions::assert_eq;
use schema_recover::model::{
    coerce_cell, collect_schemas, import_csv, infer_field_type, order_by_dependency, FieldType,
    FormSchema,
};
use schema_recover::parser::{extract_json_objects, parse_csv};
use serde_json::{json, Value};

// ============================================================================
// FormSchema post-processing
// ============================================================================

#[test]
fn test_from_value_fills_missing_form_id_and_fields() {
    let schema = FormSchema::from_value(json!({"appsId": "shop"}), "schema_1").unwrap();
    assert_eq!(schema.form_id, "schema_1");
    assert_eq!(schema.fields, json!({}));
    assert_eq!(schema.extra.get("appsId"), Some(&json!("shop")));
}

#[test]
fn test_from_value_keeps_existing_form_id() {
    let schema =
        FormSchema::from_value(json!({"formId": "pets", "fields": []}), "fallback").unwrap();
    assert_eq!(schema.form_id, "pets");
    assert_eq!(schema.fields, json!([]));
}

#[test]
fn test_from_value_rejects_non_objects() {
    assert!(FormSchema::from_value(json!([1]), "x").is_err());
}

#[test]
fn test_schema_serializes_flat() {
    let schema = FormSchema::from_value(
        json!({"formId": "pets", "fields": {}, "description": "Pets"}),
        "x",
    )
    .unwrap();
    assert_eq!(
        serde_json::to_value(&schema).unwrap(),
        json!({"formId": "pets", "fields": {}, "description": "Pets"})
    );
}

#[test]
fn test_collect_schemas_flattens_arrays_and_skips_scalars() {
    let values = vec![
        json!([{"formId": "a"}, {"fields": {}}]),
        json!(7),
        json!({"formId": "c"}),
    ];
    let ids: Vec<String> = collect_schemas(values, "gen")
        .into_iter()
        .map(|s| s.form_id)
        .collect();
    assert_eq!(ids, vec!["a", "gen_2", "c"]);
}

#[test]
fn test_order_by_dependency_moves_referencing_schemas_last() {
    let text = r#"
{"formId": "orders", "fields": {"items": {"fieldId": "items", "fieldType": "EMBED"}}}
{"formId": "customers", "fields": {"name": {"fieldId": "name", "fieldType": "TEXT"}}}
{"formId": "tickets", "fields": [{"name": "status", "type": "REF_PICK_LIST"}]}
{"formId": "products", "fields": {}}
"#;
    let values = extract_json_objects(text).unwrap().values;
    let ordered = order_by_dependency(collect_schemas(values, "s"));
    let ids: Vec<&str> = ordered.iter().map(|s| s.form_id.as_str()).collect();
    assert_eq!(ids, vec!["customers", "products", "orders", "tickets"]);
}

// ============================================================================
// CSV type inference
// ============================================================================

#[test]
fn test_infer_field_type() {
    assert_eq!(infer_field_type("42"), FieldType::Numeric);
    assert_eq!(infer_field_type(" 3.5 "), FieldType::Numeric);
    assert_eq!(infer_field_type("-1e3"), FieldType::Numeric);
    assert_eq!(infer_field_type("TRUE"), FieldType::Boolean);
    assert_eq!(infer_field_type("false"), FieldType::Boolean);
    assert_eq!(infer_field_type(""), FieldType::Text);
    assert_eq!(infer_field_type("   "), FieldType::Text);
    assert_eq!(infer_field_type("NaN"), FieldType::Text);
    assert_eq!(infer_field_type("abc"), FieldType::Text);
}

#[test]
fn test_coerce_cell() {
    assert_eq!(coerce_cell("42", &FieldType::Numeric), json!(42));
    assert_eq!(coerce_cell("2.5", &FieldType::Numeric), json!(2.5));
    assert_eq!(coerce_cell("", &FieldType::Numeric), Value::Null);
    assert_eq!(coerce_cell("n/a", &FieldType::Numeric), Value::Null);
    assert_eq!(coerce_cell("True", &FieldType::Boolean), json!(true));
    assert_eq!(coerce_cell("yes", &FieldType::Boolean), json!(false));
    assert_eq!(coerce_cell(" x ", &FieldType::Text), json!(" x "));
}

#[test]
fn test_import_csv_infers_schema_and_records() {
    let rows = parse_csv("name;age;active\nAnn;31;true\nBob;;false\nCy", None);
    let import = import_csv(&rows, "people");

    assert_eq!(import.schema.form_id, "people");
    assert_eq!(
        import.schema.fields,
        json!({
            "name": {"fieldId": "name", "fieldType": "TEXT", "allowMultiple": false},
            "age": {"fieldId": "age", "fieldType": "NUMERIC", "allowMultiple": false},
            "active": {"fieldId": "active", "fieldType": "BOOLEAN", "allowMultiple": false}
        })
    );

    assert_eq!(import.records.len(), 3);
    assert_eq!(
        Value::Object(import.records[1].clone()),
        json!({"name": "Bob", "age": null, "active": false})
    );
    // Short rows are padded with empty cells
    assert_eq!(
        Value::Object(import.records[2].clone()),
        json!({"name": "Cy", "age": null, "active": false})
    );
}

#[test]
fn test_import_csv_header_only_and_empty() {
    let rows = parse_csv("a,b", None);
    let import = import_csv(&rows, "t");
    assert!(import.records.is_empty());
    assert_eq!(import.schema.fields["a"]["fieldType"], "TEXT");

    let import = import_csv(&[], "t");
    assert_eq!(import.schema.fields, json!({}));
    assert!(import.records.is_empty());
}
