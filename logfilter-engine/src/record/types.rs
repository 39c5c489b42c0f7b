//! `LogRecord` and the parser's internal line classification.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

/// A reconstructed multi-line log record.
///
/// `content` preserves the original bytes, including internal newlines but
/// not the line terminator of the final line. Invalid UTF-8 is preserved
/// byte-for-byte; decoding to text is deferred to the filter chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub content: Vec<u8>,
    pub timestamp: Option<NaiveDateTime>,
    pub source_path: PathBuf,
    pub line_start: u64,
    pub line_end: u64,
    /// Set when the record was cut short by the size cap.
    pub truncated: bool,
}

impl LogRecord {
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }
}
