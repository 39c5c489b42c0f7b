//! Per-file recoverable errors.

use std::path::{Path, PathBuf};

use super::error_code::{self, LogFilterErrorCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileErrorKind {
    NotFound,
    PermissionDenied,
    DecompressionFailed,
    IoError,
    OversizeSkipped,
    Internal,
}

/// Recorded on a `FileReport` and counted; never aborts the run.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{kind:?}: {path}{}", cause.as_ref().map(|c| format!(" ({c})")).unwrap_or_default())]
pub struct FileError {
    pub kind: FileErrorKind,
    pub path: PathBuf,
    pub cause: Option<String>,
}

impl FileError {
    pub fn new(kind: FileErrorKind, path: impl AsRef<Path>) -> Self {
        Self {
            kind,
            path: path.as_ref().to_path_buf(),
            cause: None,
        }
    }

    pub fn with_cause(kind: FileErrorKind, path: impl AsRef<Path>, cause: impl ToString) -> Self {
        Self {
            kind,
            path: path.as_ref().to_path_buf(),
            cause: Some(cause.to_string()),
        }
    }

    pub fn from_io(path: impl AsRef<Path>, err: &std::io::Error) -> Self {
        Self::with_cause(FileErrorKind::from(err.kind()), path, err)
    }
}

impl From<std::io::ErrorKind> for FileErrorKind {
    fn from(kind: std::io::ErrorKind) -> Self {
        match kind {
            std::io::ErrorKind::NotFound => FileErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => FileErrorKind::PermissionDenied,
            _ => FileErrorKind::IoError,
        }
    }
}

impl LogFilterErrorCode for FileError {
    fn error_code(&self) -> &'static str {
        match self.kind {
            FileErrorKind::NotFound => error_code::FILE_NOT_FOUND,
            FileErrorKind::PermissionDenied => error_code::FILE_PERMISSION_DENIED,
            FileErrorKind::DecompressionFailed => error_code::FILE_DECOMPRESSION_FAILED,
            FileErrorKind::IoError => error_code::FILE_IO_ERROR,
            FileErrorKind::OversizeSkipped => error_code::FILE_OVERSIZE_SKIPPED,
            FileErrorKind::Internal => error_code::FILE_INTERNAL,
        }
    }
}

impl From<std::io::Error> for FileErrorKind {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::NotFound => FileErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => FileErrorKind::PermissionDenied,
            _ => FileErrorKind::IoError,
        }
    }
}
