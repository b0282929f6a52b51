//! Grammar-level token access: the tokenizer behind a [`LookaheadStream`],
//! plus expect/accept combinators and string-literal concatenation.

use crate::ast::Span;
use crate::error::ParseError;
use crate::lexer::{Token, TokenKind, Tokenizer};
use crate::lookahead::LookaheadStream;

/// Deepest lookahead any grammar rule needs.
pub const LOOKAHEAD: usize = 3;

pub struct TokenStream<'src> {
    src: &'src str,
    tokens: LookaheadStream<Tokenizer<'src>>,
}

fn describe(kind: TokenKind, text: Option<&str>) -> String {
    match text {
        Some(t) => format!("{} '{}'", kind, t),
        None => kind.to_string(),
    }
}

impl<'src> TokenStream<'src> {
    pub fn new(src: &'src str) -> Self {
        TokenStream {
            src,
            tokens: LookaheadStream::new(Tokenizer::new(src), LOOKAHEAD),
        }
    }

    pub fn source(&self) -> &'src str {
        self.src
    }

    pub fn text(&self, token: &Token) -> &'src str {
        token.text(self.src)
    }

    /// Span of the source text a token was read from, quotes included.
    pub fn extent(&self, token: &Token) -> Span {
        match token.kind {
            TokenKind::String => Span::new(token.span.start - 1, token.span.end + 1),
            _ => token.span,
        }
    }

    fn found(&self, token: &Token) -> String {
        describe(token.kind, Some(self.text(token)))
    }

    fn is_match(&self, token: &Token, kind: TokenKind, text: Option<&str>) -> bool {
        token.kind == kind && text.map_or(true, |t| self.text(token) == t)
    }

    fn unwrap_item(item: Option<&Result<Token, ParseError>>) -> Result<Option<Token>, ParseError> {
        match item {
            None => Ok(None),
            Some(Ok(t)) => Ok(Some(*t)),
            Some(Err(e)) => Err(e.clone()),
        }
    }

    // -- Cursor --------------------------------------------------

    /// The most recently consumed token.
    pub fn current(&self) -> Result<Token, ParseError> {
        Self::unwrap_item(self.tokens.behind(1)?)?
            .ok_or_else(|| ParseError::eof("a consumed token", 0))
    }

    pub fn current_text(&self) -> Result<&'src str, ParseError> {
        Ok(self.text(&self.current()?))
    }

    /// End offset of the last consumed token (closing quote included), or 0.
    pub fn last_end(&self) -> usize {
        self.current().map(|t| self.extent(&t).end).unwrap_or(0)
    }

    pub fn more(&mut self) -> bool {
        !self.tokens.is_done()
    }

    /// Undo the last consumption, re-queueing `token`.
    pub fn pushback(&mut self, token: Token) {
        self.tokens.back(Ok(token));
    }

    pub fn next(&mut self) -> Result<Option<Token>, ParseError> {
        match self.tokens.next() {
            None => Ok(None),
            Some(item) => item.map(Some),
        }
    }

    pub fn next_or_fail(&mut self, expected: &str) -> Result<Token, ParseError> {
        self.next()?
            .ok_or_else(|| ParseError::eof(expected, self.src.len()))
    }

    // -- Lookahead -----------------------------------------------

    pub fn peek(&mut self, n: usize) -> Result<Option<Token>, ParseError> {
        Self::unwrap_item(self.tokens.ahead(n)?)
    }

    /// The token `n` ahead if it has the given kind (and text, when given).
    pub fn ahead(
        &mut self,
        n: usize,
        kind: TokenKind,
        text: Option<&str>,
    ) -> Result<Option<Token>, ParseError> {
        if n == 1 {
            self.split_switch(kind)?;
        }
        Ok(self
            .peek(n)?
            .filter(|t| self.is_match(t, kind, text)))
    }

    pub fn is(&mut self, kind: TokenKind, text: &str) -> Result<bool, ParseError> {
        Ok(self.ahead(1, kind, Some(text))?.is_some())
    }

    pub fn behind(&self, n: usize) -> Result<Token, ParseError> {
        Self::unwrap_item(self.tokens.behind(n)?)?
            .ok_or_else(|| ParseError::eof(format!("{} consumed tokens", n), 0))
    }

    /// Error describing whatever token comes next, for a rule that wanted `expected`.
    pub fn unexpected(&mut self, expected: &str) -> ParseError {
        match self.peek(1) {
            Err(e) => e,
            Ok(None) => ParseError::eof(expected, self.src.len()),
            Ok(Some(t)) => ParseError::mismatch(expected, self.found(&t), t.span.start),
        }
    }

    /// True when `second` starts exactly where `first` ends.
    pub fn adjacent(first: &Token, second: &Token) -> bool {
        first.span.end == second.span.start
    }

    /// A `{{`/`}}` where a single brace is wanted is split into two braces.
    fn split_switch(&mut self, kind: TokenKind) -> Result<(), ParseError> {
        if kind != TokenKind::Brace {
            return Ok(());
        }
        if let Some(t) = self.peek(1)? {
            if t.kind == TokenKind::Switch {
                let mid = t.span.start + 1;
                self.tokens.expand_next([
                    Ok(Token::new(TokenKind::Brace, t.span.start, mid)),
                    Ok(Token::new(TokenKind::Brace, mid, t.span.end)),
                ]);
            }
        }
        Ok(())
    }

    // -- Consumption ---------------------------------------------

    pub fn expect(&mut self, kind: TokenKind, text: Option<&str>) -> Result<Token, ParseError> {
        self.split_switch(kind)?;
        match self.next()? {
            None => Err(ParseError::eof(describe(kind, text), self.src.len())),
            Some(t) if self.is_match(&t, kind, text) => Ok(t),
            Some(t) => Err(ParseError::mismatch(
                describe(kind, text),
                self.found(&t),
                t.span.start,
            )),
        }
    }

    pub fn expect_text(
        &mut self,
        kind: TokenKind,
        text: Option<&str>,
    ) -> Result<&'src str, ParseError> {
        let t = self.expect(kind, text)?;
        Ok(self.text(&t))
    }

    /// Consume the next token only if it matches.
    pub fn accept(&mut self, kind: TokenKind, text: Option<&str>) -> Result<bool, ParseError> {
        if self.ahead(1, kind, text)?.is_some() {
            self.next()?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Like [`accept`](Self::accept) against several texts; returns the index matched.
    pub fn accept_one(
        &mut self,
        kind: TokenKind,
        texts: &[&str],
    ) -> Result<Option<usize>, ParseError> {
        let Some(t) = self.ahead(1, kind, None)? else {
            return Ok(None);
        };
        let text = self.text(&t);
        match texts.iter().position(|x| *x == text) {
            Some(i) => {
                self.next()?;
                Ok(Some(i))
            }
            None => Ok(None),
        }
    }

    /// Consume the next token if it does NOT match; `at_eof` at end of input.
    pub fn accept_not(
        &mut self,
        kind: TokenKind,
        text: Option<&str>,
        at_eof: bool,
    ) -> Result<bool, ParseError> {
        self.split_switch(kind)?;
        match self.peek(1)? {
            None => Ok(at_eof),
            Some(t) if self.is_match(&t, kind, text) => Ok(false),
            Some(_) => {
                self.next()?;
                Ok(true)
            }
        }
    }

    /// A string literal followed by any number of `+ "more"` continuations,
    /// joined with newlines. `init` is a first literal the caller already read.
    pub fn literal(&mut self, init: Option<String>) -> Result<String, ParseError> {
        let mut text = match init {
            Some(s) => s,
            None => self.expect_text(TokenKind::String, None)?.to_owned(),
        };
        while self.ahead(1, TokenKind::Symbol, Some("+"))?.is_some()
            && self.ahead(2, TokenKind::String, None)?.is_some()
        {
            self.next()?;
            let t = self.next_or_fail("string")?;
            text.push('\n');
            text.push_str(self.text(&t));
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn current_fails_before_first_token() {
        let s = TokenStream::new("a");
        assert_eq!(s.current().unwrap_err().kind(), ErrorKind::UnexpectedEof);
    }

    #[test]
    fn current_and_behind_follow_consumption() {
        let mut s = TokenStream::new("a b c");
        s.next().unwrap();
        s.next().unwrap();
        assert_eq!(s.current_text().unwrap(), "b");
        assert_eq!(s.text(&s.behind(2).unwrap()), "a");
        assert!(s.behind(3).is_err());
    }

    #[test]
    fn expect_reports_kind_and_text_mismatch() {
        let mut s = TokenStream::new("( x");
        assert!(s.expect(TokenKind::Paren, Some("(")).is_ok());
        let err = s.expect(TokenKind::Paren, Some(")")).unwrap_err();
        assert_eq!(
            err,
            ParseError::TokenMismatch {
                expected: "paren ')'".into(),
                found: "ident 'x'".into(),
                offset: 2,
            }
        );
        let err = s.expect(TokenKind::Paren, Some(")")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
        assert_eq!(err.offset(), Some(3));
    }

    #[test]
    fn accept_leaves_stream_alone_on_mismatch() {
        let mut s = TokenStream::new("= x");
        assert!(!s.accept(TokenKind::Symbol, Some(":")).unwrap());
        assert!(s.accept(TokenKind::Symbol, Some("=")).unwrap());
        assert_eq!(s.expect_text(TokenKind::Ident, None).unwrap(), "x");
        assert!(!s.more());
    }

    #[test]
    fn accept_one_returns_index() {
        let mut s = TokenStream::new("output input");
        assert_eq!(
            s.accept_one(TokenKind::Ident, &["input", "output"]).unwrap(),
            Some(1)
        );
        assert_eq!(s.accept_one(TokenKind::Ident, &["prop"]).unwrap(), None);
        assert_eq!(
            s.accept_one(TokenKind::Ident, &["input", "output"]).unwrap(),
            Some(0)
        );
    }

    #[test]
    fn accept_not_consumes_non_matching_tokens() {
        let mut s = TokenStream::new("a b ]");
        let mut seen = Vec::new();
        while s.accept_not(TokenKind::Bracket, Some("]"), false).unwrap() {
            seen.push(s.current_text().unwrap());
        }
        assert_eq!(seen, vec!["a", "b"]);
        assert!(s.accept(TokenKind::Bracket, Some("]")).unwrap());
        assert!(s.accept_not(TokenKind::Bracket, None, true).unwrap());
    }

    #[test]
    fn pushback_requeues_token() {
        let mut s = TokenStream::new("x y");
        let x = s.next().unwrap().unwrap();
        s.pushback(x);
        assert_eq!(s.next().unwrap(), Some(x));
    }

    #[test]
    fn literal_concatenates_with_newlines() {
        let mut s = TokenStream::new(r#""one" + "two" + "three" : x"#);
        assert_eq!(s.literal(None).unwrap(), "one\ntwo\nthree");
        assert!(s.is(TokenKind::Symbol, ":").unwrap());
    }

    #[test]
    fn literal_leaves_plus_without_string() {
        let mut s = TokenStream::new(r#""a" + b"#);
        assert_eq!(s.literal(None).unwrap(), "a");
        assert!(s.is(TokenKind::Symbol, "+").unwrap());
    }

    #[test]
    fn closing_switch_splits_into_braces() {
        let src = "}} x";
        let mut s = TokenStream::new(src);
        let first = s.expect(TokenKind::Brace, Some("}")).unwrap();
        assert_eq!(first.span, Span::new(0, 1));
        let second = s.expect(TokenKind::Brace, Some("}")).unwrap();
        assert_eq!(second.span, Span::new(1, 2));
        assert_eq!(s.expect_text(TokenKind::Ident, None).unwrap(), "x");
    }

    #[test]
    fn switch_is_kept_when_asked_for() {
        let mut s = TokenStream::new("{{");
        assert!(s.accept(TokenKind::Switch, Some("{{")).unwrap());
    }

    #[test]
    fn lexical_errors_surface_on_peek() {
        let mut s = TokenStream::new("a $");
        assert!(s.peek(1).unwrap().is_some());
        assert_eq!(s.peek(2).unwrap_err().kind(), ErrorKind::Lexical);
    }

    #[test]
    fn unexpected_describes_next_token() {
        let mut s = TokenStream::new("a ]");
        s.next().unwrap();
        assert_eq!(
            s.unexpected("expression"),
            ParseError::TokenMismatch {
                expected: "expression".into(),
                found: "bracket ']'".into(),
                offset: 2,
            }
        );
        s.next().unwrap();
        assert_eq!(s.unexpected("expression").kind(), ErrorKind::UnexpectedEof);
    }

    #[test]
    fn extent_includes_quotes() {
        let mut s = TokenStream::new(r#" "abc" "#);
        let t = s.next().unwrap().unwrap();
        assert_eq!(t.span, Span::new(2, 5));
        assert_eq!(s.extent(&t), Span::new(1, 6));
        assert_eq!(s.last_end(), 6);
    }
}
