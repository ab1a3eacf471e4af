//! Text-to-structure parsers: CSV, SQL DDL and JSON embedded in prose

mod column_split;
mod csv_parser;
mod ddl_parser;
mod delimiter;
mod json_extractor;
mod json_repair;
mod json_scanner;

pub use column_split::ColumnSplit;
pub use csv_parser::{parse_csv, parse_csv_with_options, CsvOptions, Row};
pub use ddl_parser::{
    parse_sql_schema, parse_sql_schema_with_options, Column, DdlOptions, ParsedTable,
};
pub use delimiter::{detect_delimiter, CANDIDATES, DEFAULT_DELIMITER, SAMPLE_LINES};
pub use json_extractor::{
    extract_candidates, extract_json_objects, CandidateResult, Extraction, ExtractionStage,
    JsonCandidate,
};
pub use json_repair::{sanitize, single_to_double_quotes};
