use crate::ast::Span;
use crate::error::ParseError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// One punctuation character; operators are assembled by the parser.
    Symbol,
    Paren,
    Bracket,
    Brace,
    /// `{{` or `}}`
    Switch,
    Ident,
    /// Quoted string; the span excludes the quotes.
    String,
    Number,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Symbol => "symbol",
            TokenKind::Paren => "paren",
            TokenKind::Bracket => "bracket",
            TokenKind::Brace => "brace",
            TokenKind::Switch => "switch",
            TokenKind::Ident => "ident",
            TokenKind::String => "string",
            TokenKind::Number => "number",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, start: usize, end: usize) -> Self {
        Token {
            kind,
            span: Span::new(start, end),
        }
    }

    pub fn text<'src>(&self, src: &'src str) -> &'src str {
        &src[self.span.start..self.span.end]
    }
}

/// Single-character symbols. `-` is handled separately because it may
/// start a number.
const SYMBOLS: &[u8] = b"@,.:=+*&>~<!|^;/%?";

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_part(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b'/' | b'-')
}

/// Lazy scanner over FGD source text.
///
/// Yields tokens in source order. Whitespace and `//` comments are skipped.
/// After the first error the tokenizer is exhausted.
pub struct Tokenizer<'src> {
    src: &'src str,
    bytes: &'src [u8],
    pos: usize,
    failed: bool,
}

impl<'src> Tokenizer<'src> {
    pub fn new(src: &'src str) -> Self {
        Tokenizer {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            failed: false,
        }
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn char_at(&self, pos: usize) -> char {
        self.src[pos..].chars().next().unwrap_or('\u{FFFD}')
    }

    fn skip_trivia(&mut self) {
        while let Some(b) = self.peek_at(0) {
            if b.is_ascii_whitespace() {
                self.pos += 1;
            } else if b == b'/' && self.peek_at(1) == Some(b'/') {
                while let Some(c) = self.peek_at(0) {
                    if c == b'\n' {
                        break;
                    }
                    self.pos += 1;
                }
            } else if !b.is_ascii() {
                let c = self.char_at(self.pos);
                if c.is_whitespace() || c == '\u{FEFF}' {
                    self.pos += c.len_utf8();
                } else {
                    break;
                }
            } else {
                break;
            }
        }
    }

    fn single(&mut self, kind: TokenKind) -> Token {
        let start = self.pos;
        self.pos += 1;
        Token::new(kind, start, self.pos)
    }

    fn brace(&mut self, b: u8) -> Token {
        let start = self.pos;
        if self.peek_at(1) == Some(b) {
            self.pos += 2;
            Token::new(TokenKind::Switch, start, self.pos)
        } else {
            self.pos += 1;
            Token::new(TokenKind::Brace, start, self.pos)
        }
    }

    fn string(&mut self, quote: u8) -> Result<Token, ParseError> {
        let open = self.pos;
        let mut pos = open + 1;
        loop {
            match self.bytes.get(pos) {
                None => return Err(ParseError::UnterminatedString { offset: open }),
                Some(b'\\') => pos += 2,
                Some(&b) if b == quote => break,
                Some(_) => pos += 1,
            }
        }
        self.pos = pos + 1;
        Ok(Token::new(TokenKind::String, open + 1, pos))
    }

    fn ident_tail(&mut self) {
        while let Some(b) = self.peek_at(0) {
            if !is_ident_part(b) || (b == b'/' && self.peek_at(1) == Some(b'/')) {
                break;
            }
            self.pos += 1;
        }
    }

    fn ident(&mut self) -> Token {
        let start = self.pos;
        self.pos += 1;
        self.ident_tail();
        Token::new(TokenKind::Ident, start, self.pos)
    }

    fn number(&mut self) -> Token {
        let start = self.pos;
        if self.peek_at(0) == Some(b'-') {
            self.pos += 1;
        }
        while let Some(b) = self.peek_at(0) {
            if !(b.is_ascii_digit() || b == b'.') {
                break;
            }
            self.pos += 1;
        }
        // `1st` and friends are identifiers.
        if self.peek_at(0).is_some_and(is_ident_start) {
            self.ident_tail();
            return Token::new(TokenKind::Ident, start, self.pos);
        }
        Token::new(TokenKind::Number, start, self.pos)
    }

    fn scan(&mut self, b: u8) -> Result<Token, ParseError> {
        let token = match b {
            b'(' | b')' => self.single(TokenKind::Paren),
            b'[' | b']' => self.single(TokenKind::Bracket),
            b'{' | b'}' => self.brace(b),
            b'"' | b'\'' => self.string(b)?,
            b'-' if self
                .peek_at(1)
                .is_some_and(|n| n.is_ascii_digit() || n == b'.') =>
            {
                self.number()
            }
            b'-' => self.single(TokenKind::Symbol),
            b if b.is_ascii_digit() => self.number(),
            b if is_ident_start(b) => self.ident(),
            b if SYMBOLS.contains(&b) => self.single(TokenKind::Symbol),
            _ => {
                return Err(ParseError::Lexical {
                    ch: self.char_at(self.pos),
                    offset: self.pos,
                })
            }
        };
        Ok(token)
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Result<Token, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        self.skip_trivia();
        let b = self.peek_at(0)?;
        let result = self.scan(b);
        if result.is_err() {
            self.failed = true;
        }
        Some(result)
    }
}

/// Tokenize an entire string into a Vec, stopping at the first error.
pub fn tokenize(src: &str) -> Result<Vec<Token>, ParseError> {
    Tokenizer::new(src).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds_and_texts(src: &str) -> Vec<(TokenKind, &str)> {
        tokenize(src)
            .unwrap()
            .into_iter()
            .map(|t| (t.kind, t.text(src)))
            .collect()
    }

    #[test]
    fn classifies_punctuation() {
        use TokenKind::*;
        assert_eq!(
            kinds_and_texts("@ ( ) [ ] { } : = ,"),
            vec![
                (Symbol, "@"),
                (Paren, "("),
                (Paren, ")"),
                (Bracket, "["),
                (Bracket, "]"),
                (Brace, "{"),
                (Brace, "}"),
                (Symbol, ":"),
                (Symbol, "="),
                (Symbol, ","),
            ]
        );
    }

    #[test]
    fn double_braces_are_switch_tokens() {
        use TokenKind::*;
        assert_eq!(
            kinds_and_texts("{{ a }} {"),
            vec![(Switch, "{{"), (Ident, "a"), (Switch, "}}"), (Brace, "{")]
        );
    }

    #[test]
    fn operators_stay_single_characters() {
        let toks = kinds_and_texts("-> == <<");
        let texts: Vec<_> = toks.iter().map(|(_, t)| *t).collect();
        assert_eq!(texts, vec!["-", ">", "=", "=", "<", "<"]);
        assert!(toks.iter().all(|(k, _)| *k == TokenKind::Symbol));
    }

    #[test]
    fn string_span_excludes_quotes() {
        let src = r#"  "hello world" 'x'"#;
        let toks = tokenize(src).unwrap();
        assert_eq!(toks[0].kind, TokenKind::String);
        assert_eq!(toks[0].span, Span::new(3, 14));
        assert_eq!(toks[0].text(src), "hello world");
        assert_eq!(toks[1].text(src), "x");
    }

    #[test]
    fn escaped_quote_does_not_close_string() {
        let src = r#""say \"hi\"" next"#;
        let toks = kinds_and_texts(src);
        assert_eq!(toks[0], (TokenKind::String, r#"say \"hi\""#));
        assert_eq!(toks[1], (TokenKind::Ident, "next"));
    }

    #[test]
    fn other_quote_kind_does_not_close_string() {
        let toks = kinds_and_texts(r#""it's""#);
        assert_eq!(toks, vec![(TokenKind::String, "it's")]);
    }

    #[test]
    fn unterminated_string_is_an_error() {
        let err = tokenize("name \"open").unwrap_err();
        assert_eq!(err, ParseError::UnterminatedString { offset: 5 });
    }

    #[test]
    fn identifiers_include_paths() {
        let toks = kinds_and_texts("models/props/crate.mdl some_name2 a-b");
        assert_eq!(
            toks,
            vec![
                (TokenKind::Ident, "models/props/crate.mdl"),
                (TokenKind::Ident, "some_name2"),
                (TokenKind::Ident, "a-b"),
            ]
        );
    }

    #[test]
    fn numbers_and_negative_numbers() {
        use TokenKind::*;
        assert_eq!(
            kinds_and_texts("12 -8 0.25 -.5 - 3"),
            vec![
                (Number, "12"),
                (Number, "-8"),
                (Number, "0.25"),
                (Number, "-.5"),
                (Symbol, "-"),
                (Number, "3"),
            ]
        );
    }

    #[test]
    fn digit_led_identifiers() {
        assert_eq!(
            kinds_and_texts("1st 2d_skybox"),
            vec![(TokenKind::Ident, "1st"), (TokenKind::Ident, "2d_skybox")]
        );
    }

    #[test]
    fn comments_and_whitespace_are_skipped() {
        let src = "// header\n@Version(2) // trailing\n\t// last";
        let toks = kinds_and_texts(src);
        assert_eq!(toks.len(), 5);
        assert_eq!(toks[1], (TokenKind::Ident, "Version"));
    }

    #[test]
    fn identifier_stops_before_comment() {
        let toks = kinds_and_texts("base//comment\nnext");
        assert_eq!(
            toks,
            vec![(TokenKind::Ident, "base"), (TokenKind::Ident, "next")]
        );
    }

    #[test]
    fn byte_order_mark_is_trivia() {
        let src = "\u{FEFF}@include";
        let toks = tokenize(src).unwrap();
        assert_eq!(toks[0].span, Span::new(3, 4));
    }

    #[test]
    fn unknown_character_reports_offset() {
        let err = tokenize("ok #").unwrap_err();
        assert_eq!(err, ParseError::Lexical { ch: '#', offset: 3 });
    }

    #[test]
    fn tokenizer_stops_after_error() {
        let mut t = Tokenizer::new("# a");
        assert!(matches!(t.next(), Some(Err(_))));
        assert!(t.next().is_none());
    }

    #[test]
    fn empty_input_has_no_tokens() {
        assert!(tokenize("").unwrap().is_empty());
        assert!(tokenize("   // only a comment").unwrap().is_empty());
    }
}
