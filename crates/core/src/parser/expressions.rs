use super::Parser;
use crate::ast::{Expr, ExprForm, ExprNode, Span};
use crate::error::ParseError;
use crate::lexer::{Token, TokenKind};
use crate::stream::TokenStream;

/// Binding power of a binary operator; higher binds tighter.
fn binding_power(op: &str) -> Option<u8> {
    let bp = match op {
        "*" | "/" | "%" => 12,
        "+" | "-" => 11,
        "<<" | ">>" => 10,
        "<" | "<=" | ">" | ">=" => 9,
        "==" | "!=" => 8,
        "&" => 7,
        "^" => 6,
        "|" => 5,
        "&&" => 4,
        "||" => 3,
        ".." => 2,
        "->" => 1,
        _ => return None,
    };
    Some(bp)
}

/// Prefix operators bind at their table power, or as tightly as a primary.
fn prefix_power(op: &str) -> u8 {
    binding_power(op).unwrap_or(13)
}

fn compound(span: Span, form: ExprForm, op: &str, lhs: Option<Expr>, rhs: Expr) -> Expr {
    Expr::Compound(Box::new(ExprNode {
        span,
        form,
        op: op.to_owned(),
        lhs,
        rhs,
    }))
}

impl<'src> Parser<'src> {
    // -- Entry points --------------------------------------------

    /// Parse one expression, or `None` when the next token cannot start one.
    /// Nothing is consumed in the `None` case.
    pub(super) fn parse_expr(&mut self) -> Result<Option<Expr>, ParseError> {
        Ok(self.expr_bp(0)?.map(|(e, _)| e))
    }

    /// Like [`parse_expr`](Self::parse_expr) but an absent expression is an error.
    pub(super) fn require_expr(&mut self) -> Result<Expr, ParseError> {
        Ok(self.require_bp(0)?.0)
    }

    fn require_bp(&mut self, min_bp: u8) -> Result<(Expr, Span), ParseError> {
        match self.expr_bp(min_bp)? {
            Some(e) => Ok(e),
            None => Err(self.ts.unexpected("expression")),
        }
    }

    // -- Pratt loop ----------------------------------------------

    fn expr_bp(&mut self, min_bp: u8) -> Result<Option<(Expr, Span)>, ParseError> {
        let Some((mut lhs, mut span)) = self.primary()? else {
            return Ok(None);
        };
        loop {
            if self.ts.ahead(1, TokenKind::Bracket, Some("["))?.is_some() {
                self.ts.next()?;
                let (index, _) = self.require_bp(0)?;
                let close = self.ts.expect(TokenKind::Bracket, Some("]"))?;
                span = span.to(close.span);
                lhs = compound(span, ExprForm::Postfix, "[]", Some(lhs), index);
                continue;
            }
            let Some((op, bp, width)) = self.peek_operator()? else {
                break;
            };
            if bp <= min_bp {
                break;
            }
            for _ in 0..width {
                self.ts.next()?;
            }
            let (rhs, rhs_span) = self.require_bp(bp)?;
            span = span.to(rhs_span);
            lhs = compound(span, ExprForm::Infix, &op, Some(lhs), rhs);
        }
        Ok(Some((lhs, span)))
    }

    /// The binary operator formed by the next one or two adjacent symbols.
    fn peek_operator(&mut self) -> Result<Option<(String, u8, usize)>, ParseError> {
        let Some(first) = self.ts.ahead(1, TokenKind::Symbol, None)? else {
            return Ok(None);
        };
        let head = self.ts.text(&first);
        if let Some(second) = self.ts.ahead(2, TokenKind::Symbol, None)? {
            if TokenStream::adjacent(&first, &second) {
                let pair = format!("{}{}", head, self.ts.text(&second));
                if let Some(bp) = binding_power(&pair) {
                    return Ok(Some((pair, bp, 2)));
                }
            }
        }
        Ok(binding_power(head).map(|bp| (head.to_owned(), bp, 1)))
    }

    // -- Primaries -----------------------------------------------

    fn primary(&mut self) -> Result<Option<(Expr, Span)>, ParseError> {
        let Some(t) = self.ts.next()? else {
            return Ok(None);
        };
        let text = self.ts.text(&t);
        let parsed = match (t.kind, text) {
            (TokenKind::String | TokenKind::Ident | TokenKind::Number, _) => {
                (Expr::Literal(text.to_owned()), self.ts.extent(&t))
            }
            (TokenKind::Paren, "(") => self.group(t, TokenKind::Paren, ")", "()")?,
            (TokenKind::Bracket, "[") => self.group(t, TokenKind::Bracket, "]", "[]")?,
            (TokenKind::Brace, "{") => self.map_literal(t)?,
            (TokenKind::Switch, "{{") => self.switch(t)?,
            (TokenKind::Symbol, "+" | "-" | "!" | "~") => {
                let (operand, end) = self.require_bp(prefix_power(text))?;
                let span = t.span.to(end);
                (compound(span, ExprForm::Unary, text, None, operand), span)
            }
            _ => {
                self.ts.pushback(t);
                return Ok(None);
            }
        };
        Ok(Some(parsed))
    }

    fn group(
        &mut self,
        open: Token,
        kind: TokenKind,
        close: &str,
        op: &str,
    ) -> Result<(Expr, Span), ParseError> {
        let (inner, _) = self.require_bp(0)?;
        let end = self.ts.expect(kind, Some(close))?;
        let span = open.span.to(end.span);
        Ok((compound(span, ExprForm::Unary, op, None, inner), span))
    }

    /// `{ key: value, ... }`
    fn map_literal(&mut self, open: Token) -> Result<(Expr, Span), ParseError> {
        let mut entries = Vec::new();
        while !self.ts.is(TokenKind::Brace, "}")? {
            let (key, key_span) = self.require_bp(0)?;
            self.ts.expect(TokenKind::Symbol, Some(":"))?;
            let (value, value_span) = self.require_bp(0)?;
            let span = key_span.to(value_span);
            entries.push(compound(span, ExprForm::Infix, ":", Some(key), value));
            self.ts.accept(TokenKind::Symbol, Some(","))?;
        }
        let close = self.ts.expect(TokenKind::Brace, Some("}"))?;
        let span = open.span.to(close.span);
        Ok((
            compound(span, ExprForm::Unary, "{}", None, Expr::List(entries)),
            span,
        ))
    }

    /// `{{ "default", case, case, ... }}`
    fn switch(&mut self, open: Token) -> Result<(Expr, Span), ParseError> {
        let mut default = None;
        let mut cases = Vec::new();
        let end = loop {
            if let Some(close) = self.switch_close()? {
                break close;
            }
            if self.ts.accept(TokenKind::Symbol, Some(","))? {
                continue;
            }
            let is_string = self.ts.ahead(1, TokenKind::String, None)?.is_some();
            let Some((expr, _)) = self.expr_bp(0)? else {
                return Err(self.ts.unexpected("'}}'"));
            };
            match expr {
                Expr::Literal(_) if is_string && default.is_none() => default = Some(expr),
                _ => cases.push(expr),
            }
        };
        let span = open.span.to(end);
        Ok((
            compound(span, ExprForm::Unary, "{{}}", default, Expr::List(cases)),
            span,
        ))
    }

    /// Consume a switch terminator: a `}}` token or two adjacent `}` braces.
    fn switch_close(&mut self) -> Result<Option<Span>, ParseError> {
        if let Some(t) = self.ts.ahead(1, TokenKind::Switch, Some("}}"))? {
            self.ts.next()?;
            return Ok(Some(t.span));
        }
        let first = self.ts.peek(1)?;
        let second = self.ts.peek(2)?;
        if let (Some(a), Some(b)) = (first, second) {
            let closes = |t: &Token| t.kind == TokenKind::Brace && self.ts.text(t) == "}";
            if closes(&a) && closes(&b) && TokenStream::adjacent(&a, &b) {
                self.ts.next()?;
                self.ts.next()?;
                return Ok(Some(a.span.to(b.span)));
            }
        }
        Ok(None)
    }
}
