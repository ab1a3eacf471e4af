//! File-level recovery tests

use pretty_assertions::assert_eq;
use schema_recover::parser::ColumnSplit;
use schema_recover::{
    recover, recover_many, InputKind, RecoverOptions, Recovered, SchemaRecoverError,
};
use serde_json::json;

use crate::common::InputFile;

#[test]
fn test_input_kind_from_extension() {
    use std::path::Path;
    assert_eq!(InputKind::from_path(Path::new("data.CSV")), InputKind::Csv);
    assert_eq!(InputKind::from_path(Path::new("export.tsv")), InputKind::Csv);
    assert_eq!(InputKind::from_path(Path::new("schema.sql")), InputKind::Sql);
    assert_eq!(InputKind::from_path(Path::new("reply.md")), InputKind::Json);
    assert_eq!(InputKind::from_path(Path::new("noext")), InputKind::Json);
}

#[test]
fn test_recover_csv_file() {
    let input = InputFile::new(".csv", "sep=;\r\nname;qty\r\nbolt;12\r\nnut;7\r\n");
    let recovered = recover(&RecoverOptions::new(input.path(), InputKind::Csv)).unwrap();

    let Recovered::Csv { rows, schema, records } = recovered else {
        panic!("Expected CSV result");
    };
    assert_eq!(rows.len(), 3);
    assert_eq!(schema.fields["qty"]["fieldType"], "NUMERIC");
    assert_eq!(records[1].get("qty"), Some(&json!(7)));
}

#[test]
fn test_recover_windows_1252_csv() {
    // "café,1" encoded as Windows-1252
    let input = InputFile::with_bytes(".csv", b"name,n\ncaf\xE9,1\n");
    let recovered = recover(&RecoverOptions::new(input.path(), InputKind::Csv)).unwrap();
    let Recovered::Csv { rows, .. } = recovered else {
        panic!("Expected CSV result");
    };
    assert_eq!(rows[1][0], "café");
}

#[test]
fn test_recover_sql_file_with_paren_depth_split() {
    let input = InputFile::new(
        ".sql",
        "CREATE TABLE items (id INT PRIMARY KEY, price DECIMAL(8,2) NOT NULL);",
    );
    let mut options = RecoverOptions::new(input.path(), InputKind::Sql);
    options.column_split = ColumnSplit::ParenDepth;

    let Recovered::Sql { tables } = recover(&options).unwrap() else {
        panic!("Expected SQL result");
    };
    assert_eq!(tables[0].columns[1].data_type, "decimal(8,2)");
    assert!(tables[0].columns[1].is_not_null);
}

#[test]
fn test_recover_json_reply_orders_schemas() {
    let reply = "Here you go:\n```json\n{\"formId\": \"orders\", \"fields\": {\"line\": {\"fieldType\": \"EMBED\"}}}\n```\n```json\n{\"fields\": {\"name\": {\"fieldType\": \"TEXT\"}}}\n```";
    let input = InputFile::new(".md", reply);
    let recovered = recover(&RecoverOptions::new(input.path(), InputKind::Json)).unwrap();

    let Recovered::Json { values, failures, schemas } = recovered else {
        panic!("Expected JSON result");
    };
    assert_eq!(values.len(), 2);
    assert_eq!(failures, 0);
    assert_eq!(schemas[1].form_id, "orders");
    assert!(schemas[0].form_id.ends_with("_2"));
}

#[test]
fn test_recover_fields_from_schema() {
    let input = InputFile::new(
        ".json",
        r#"{"formId": "pets", "fields": [{"name": "species", "type": "TEXT", "required": true}]}"#,
    );
    let Recovered::Fields { fields } =
        recover(&RecoverOptions::new(input.path(), InputKind::Fields)).unwrap()
    else {
        panic!("Expected fields result");
    };
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].id, "species");
    assert!(fields[0].required);
}

#[test]
fn test_recover_json_without_json_fails() {
    let input = InputFile::new(".txt", "I could not generate a schema, sorry.");
    let err = recover(&RecoverOptions::new(input.path(), InputKind::Json)).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<SchemaRecoverError>(),
        Some(SchemaRecoverError::NoJsonFound { .. })
    ));
}

#[test]
fn test_recover_rejects_oversized_input() {
    let input = InputFile::new(".sql", "CREATE TABLE t (id INT);");
    let mut options = RecoverOptions::new(input.path(), InputKind::Sql);
    options.max_input_bytes = 4;

    let err = recover(&options).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<SchemaRecoverError>(),
        Some(SchemaRecoverError::InputTooLarge { limit: 4, .. })
    ));
}

#[test]
fn test_recover_missing_file() {
    let options = RecoverOptions::new("/definitely/not/here.csv", InputKind::Csv);
    let err = recover(&options).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<SchemaRecoverError>(),
        Some(SchemaRecoverError::InputReadError { .. })
    ));
}

#[test]
fn test_recover_many_preserves_order() {
    let csv = InputFile::new(".csv", "a,b\n1,2");
    let sql = InputFile::new(".sql", "CREATE TABLE t (id INT);");
    let options = vec![
        RecoverOptions::new(sql.path(), InputKind::from_path(&sql.path())),
        RecoverOptions::new("/missing.json", InputKind::Json),
        RecoverOptions::new(csv.path(), InputKind::from_path(&csv.path())),
    ];

    let results = recover_many(&options);
    assert_eq!(results.len(), 3);
    assert!(matches!(results[0], Ok(Recovered::Sql { .. })));
    assert!(results[1].is_err());
    assert!(matches!(results[2], Ok(Recovered::Csv { .. })));
}

#[test]
fn test_recovered_serializes_with_kind_tag() {
    let input = InputFile::new(".sql", "CREATE TABLE t (id INT);");
    let recovered = recover(&RecoverOptions::new(input.path(), InputKind::Sql)).unwrap();
    let json = serde_json::to_value(&recovered).unwrap();
    assert_eq!(json["kind"], "sql");
    assert_eq!(json["tables"][0]["tableName"], "t");
}
