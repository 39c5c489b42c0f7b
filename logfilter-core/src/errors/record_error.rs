//! Per-record recoverable errors.

use std::path::{Path, PathBuf};

use super::error_code::{self, LogFilterErrorCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordErrorKind {
    OversizeTruncated,
    OrphanContinuation,
}

/// Recorded and counted; the offending record is truncated or absorbed,
/// the file is never abandoned because of a `RecordError`.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{kind:?}: {path} line {line}")]
pub struct RecordError {
    pub kind: RecordErrorKind,
    pub path: PathBuf,
    pub line: u64,
}

impl RecordError {
    pub fn new(kind: RecordErrorKind, path: impl AsRef<Path>, line: u64) -> Self {
        Self {
            kind,
            path: path.as_ref().to_path_buf(),
            line,
        }
    }
}

impl LogFilterErrorCode for RecordError {
    fn error_code(&self) -> &'static str {
        match self.kind {
            RecordErrorKind::OversizeTruncated => error_code::RECORD_OVERSIZE_TRUNCATED,
            RecordErrorKind::OrphanContinuation => error_code::RECORD_ORPHAN_CONTINUATION,
        }
    }
}
