//! Error types for schema-recover

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while recovering schemas from text
#[derive(Error, Debug)]
pub enum SchemaRecoverError {
    #[error("No JSON could be extracted ({candidates} candidates, {failures} failed to parse)")]
    NoJsonFound { candidates: usize, failures: usize },

    #[error("Input is {len} bytes, exceeding the limit of {limit} bytes")]
    InputTooLarge { len: usize, limit: usize },

    #[error("Failed to read input file: {path}")]
    InputReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Input file is neither UTF-8 nor Windows-1252: {path}")]
    UndecodableInput { path: PathBuf },

    #[error("Invalid field shape: {message}")]
    InvalidFieldShape { message: String },
}
