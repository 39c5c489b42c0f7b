//! Configuration validation errors, surfaced at pipeline init.

use super::error_code::{self, LogFilterErrorCode};

/// Fatal at pipeline init. Owned by the external config loader in principle,
/// but raised by `FilterConfig::validate` wherever the core needs to reject
/// an inconsistent setting before any work starts.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid config field `{field}`: {message}")]
pub struct ConfigError {
    pub field: String,
    pub message: String,
}

impl ConfigError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl LogFilterErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        error_code::CONFIG_ERROR
    }
}
