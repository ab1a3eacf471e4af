//! Common test utilities for schema-recover tests

use std::io::Write;
use std::path::PathBuf;

use tempfile::NamedTempFile;

/// A temporary input file that lives as long as the handle
pub struct InputFile {
    file: NamedTempFile,
}

impl InputFile {
    /// Create a temp file with the given extension and raw bytes
    pub fn with_bytes(suffix: &str, bytes: &[u8]) -> Self {
        let mut file = NamedTempFile::with_suffix(suffix).expect("Failed to create temp file");
        file.write_all(bytes).expect("Failed to write temp file");
        file.flush().expect("Failed to flush temp file");
        Self { file }
    }

    /// Create a temp file with the given extension and text content
    pub fn new(suffix: &str, content: &str) -> Self {
        Self::with_bytes(suffix, content.as_bytes())
    }

    pub fn path(&self) -> PathBuf {
        self.file.path().to_path_buf()
    }
}
