use crate::lookahead::RangeError;
use serde::Serialize;
use thiserror::Error;

/// Coarse classification of a [`ParseError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Lexical,
    UnexpectedEof,
    TokenMismatch,
    UnexpectedToken,
    UnsupportedDirective,
    InvalidChoices,
    Lookahead,
}

/// A fatal parse failure. Parsing of the current input stops at the first one.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("unexpected character {ch:?} at offset {offset}")]
    Lexical { ch: char, offset: usize },

    #[error("unterminated string starting at offset {offset}")]
    UnterminatedString { offset: usize },

    #[error("unexpected end of input at offset {offset}, expected {expected}")]
    UnexpectedEof { expected: String, offset: usize },

    #[error("expected {expected} at offset {offset}, found {found}")]
    TokenMismatch {
        expected: String,
        found: String,
        offset: usize,
    },

    #[error("unexpected token '{text}' at offset {offset}")]
    UnexpectedToken { text: String, offset: usize },

    #[error("unsupported directive '@{name}' at offset {offset}")]
    UnsupportedDirective { name: String, offset: usize },

    #[error("property of type '{class}' cannot declare a choice list (offset {offset})")]
    InvalidChoices { class: String, offset: usize },

    #[error(transparent)]
    Lookahead(#[from] RangeError),
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::Lexical { .. } | ParseError::UnterminatedString { .. } => {
                ErrorKind::Lexical
            }
            ParseError::UnexpectedEof { .. } => ErrorKind::UnexpectedEof,
            ParseError::TokenMismatch { .. } => ErrorKind::TokenMismatch,
            ParseError::UnexpectedToken { .. } => ErrorKind::UnexpectedToken,
            ParseError::UnsupportedDirective { .. } => ErrorKind::UnsupportedDirective,
            ParseError::InvalidChoices { .. } => ErrorKind::InvalidChoices,
            ParseError::Lookahead(_) => ErrorKind::Lookahead,
        }
    }

    /// Byte offset the error refers to, if it has one.
    pub fn offset(&self) -> Option<usize> {
        match self {
            ParseError::Lexical { offset, .. }
            | ParseError::UnterminatedString { offset }
            | ParseError::UnexpectedEof { offset, .. }
            | ParseError::TokenMismatch { offset, .. }
            | ParseError::UnexpectedToken { offset, .. }
            | ParseError::UnsupportedDirective { offset, .. }
            | ParseError::InvalidChoices { offset, .. } => Some(*offset),
            ParseError::Lookahead(_) => None,
        }
    }

    pub(crate) fn eof(expected: impl Into<String>, offset: usize) -> Self {
        ParseError::UnexpectedEof {
            expected: expected.into(),
            offset,
        }
    }

    pub(crate) fn mismatch(
        expected: impl Into<String>,
        found: impl Into<String>,
        offset: usize,
    ) -> Self {
        ParseError::TokenMismatch {
            expected: expected.into(),
            found: found.into(),
            offset,
        }
    }

    /// Render as `{kind, offset, message}`. `offset` is null when unknown.
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "kind":    self.kind(),
            "offset":  self.offset(),
            "message": self.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_groups_lexical_variants() {
        let a = ParseError::Lexical { ch: '#', offset: 3 };
        let b = ParseError::UnterminatedString { offset: 9 };
        assert_eq!(a.kind(), ErrorKind::Lexical);
        assert_eq!(b.kind(), ErrorKind::Lexical);
        assert_eq!(b.offset(), Some(9));
    }

    #[test]
    fn json_rendering_has_kind_offset_and_message() {
        let e = ParseError::mismatch("')'", "ident 'x'", 12);
        let v = e.to_json_value();
        assert_eq!(v["kind"], "token_mismatch");
        assert_eq!(v["offset"], 12);
        assert_eq!(v["message"], "expected ')' at offset 12, found ident 'x'");
    }

    #[test]
    fn range_error_has_no_offset() {
        let e = ParseError::from(RangeError { index: 0, size: 3 });
        assert_eq!(e.kind(), ErrorKind::Lookahead);
        assert_eq!(e.offset(), None);
        assert_eq!(e.to_json_value()["offset"], serde_json::Value::Null);
    }
}
