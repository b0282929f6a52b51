//! Record (`{ k: v }`) and array (`[ a, b ]`) literals.
//!
//! Values are raw token text, nested records or nested arrays. The key/value
//! separator depends on where the record appears.

use super::Parser;
use crate::ast::{Value, ValueMap};
use crate::error::ParseError;
use crate::lexer::{Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Separator {
    /// JSON-shaped `{ key: value }`, used by base clauses.
    Colon,
    /// FGD-native `{ key = value }`, used by entity groups and metaprops.
    Equals,
}

impl Separator {
    fn as_str(self) -> &'static str {
        match self {
            Separator::Colon => ":",
            Separator::Equals => "=",
        }
    }
}

fn scalar(kind: TokenKind, text: &str) -> Value {
    match (kind, text) {
        (TokenKind::Ident, "true") => Value::Bool(true),
        (TokenKind::Ident, "false") => Value::Bool(false),
        (TokenKind::Ident, "null") => Value::Null,
        (TokenKind::Number, _) => Value::Number(text.to_owned()),
        _ => Value::String(text.to_owned()),
    }
}

impl<'src> Parser<'src> {
    pub(super) fn parse_record(&mut self, sep: Separator) -> Result<ValueMap, ParseError> {
        self.ts.expect(TokenKind::Brace, Some("{"))?;
        let mut record = ValueMap::new();
        while !self.ts.is(TokenKind::Brace, "}")? {
            let key = self.record_key()?;
            self.ts.expect(TokenKind::Symbol, Some(sep.as_str()))?;
            let value = self.parse_value(sep)?;
            record.insert(key, value);
            self.ts.accept(TokenKind::Symbol, Some(","))?;
        }
        self.ts.expect(TokenKind::Brace, Some("}"))?;
        Ok(record)
    }

    pub(super) fn parse_array(&mut self, sep: Separator) -> Result<Vec<Value>, ParseError> {
        self.ts.expect(TokenKind::Bracket, Some("["))?;
        let mut items = Vec::new();
        while !self.ts.is(TokenKind::Bracket, "]")? {
            items.push(self.parse_value(sep)?);
            self.ts.accept(TokenKind::Symbol, Some(","))?;
        }
        self.ts.expect(TokenKind::Bracket, Some("]"))?;
        Ok(items)
    }

    fn parse_value(&mut self, sep: Separator) -> Result<Value, ParseError> {
        if self.ts.is(TokenKind::Brace, "{")? {
            return Ok(Value::Map(self.parse_record(sep)?));
        }
        if self.ts.is(TokenKind::Bracket, "[")? {
            return Ok(Value::Array(self.parse_array(sep)?));
        }
        let t = self.ts.next_or_fail("value")?;
        match t.kind {
            TokenKind::Ident | TokenKind::String | TokenKind::Number | TokenKind::Symbol => {
                Ok(scalar(t.kind, self.ts.text(&t)))
            }
            _ => Err(self.mismatch("value", t)),
        }
    }

    fn record_key(&mut self) -> Result<String, ParseError> {
        let t = self.ts.next_or_fail("record key")?;
        match t.kind {
            TokenKind::Ident | TokenKind::String | TokenKind::Number => {
                Ok(self.ts.text(&t).to_owned())
            }
            _ => Err(self.mismatch("record key", t)),
        }
    }

    /// A mismatch error for a token that was already consumed.
    pub(super) fn mismatch(&self, expected: &str, found: Token) -> ParseError {
        ParseError::mismatch(
            expected,
            format!("{} '{}'", found.kind, self.ts.text(&found)),
            found.span.start,
        )
    }
}
