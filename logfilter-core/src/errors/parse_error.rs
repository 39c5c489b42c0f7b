//! Expression parsing errors.

use super::error_code::{self, LogFilterErrorCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    EmptyExpression,
    UnterminatedString,
    UnexpectedToken,
    UnbalancedParen,
}

/// Fatal at pipeline init: the expression failed to tokenize or parse.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{kind:?} at position {position}{}", expected.as_ref().map(|e| format!(" (expected {e})")).unwrap_or_default())]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub position: usize,
    pub expected: Option<String>,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, position: usize) -> Self {
        Self {
            kind,
            position,
            expected: None,
        }
    }

    pub fn with_expected(kind: ParseErrorKind, position: usize, expected: impl Into<String>) -> Self {
        Self {
            kind,
            position,
            expected: Some(expected.into()),
        }
    }
}

impl LogFilterErrorCode for ParseError {
    fn error_code(&self) -> &'static str {
        match self.kind {
            ParseErrorKind::EmptyExpression => error_code::PARSE_EMPTY_EXPRESSION,
            ParseErrorKind::UnterminatedString => error_code::PARSE_UNTERMINATED_STRING,
            ParseErrorKind::UnexpectedToken => error_code::PARSE_UNEXPECTED_TOKEN,
            ParseErrorKind::UnbalancedParen => error_code::PARSE_UNBALANCED_PAREN,
        }
    }
}
