//! Entries inside a class body: inputs, outputs and keyvalue properties.
//!
//! ```text
//! [input|output] name [(type)] [[attrs]] [{record}] [: "title" [: default] [: "description"]] [= [choices]]
//! ```

use super::literals::Separator;
use super::Parser;
use crate::ast::{Choice, Expr, ExprForm, PropDecl, PropKind, Span, Value, ValueMap};
use crate::error::ParseError;
use crate::lexer::{Token, TokenKind};
use once_cell::sync::Lazy;
use regex::Regex;

static OUTPUT_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^On[A-Za-z]").unwrap());
static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").unwrap());

/// Property types that may carry an `= [ ... ]` list.
const CHOICE_CLASSES: &[&str] = &["integer", "flags", "choices", "tag_list"];

/// Whether a lone title actually reads like a description.
fn reads_as_description(title: &str) -> bool {
    let len = title.chars().count();
    let words = WORD.find_iter(title).count();
    let sentence = title.ends_with('.');
    len > 48 || (len > 32 && sentence) || (words >= 3 && sentence) || (words >= 5 && len > 8)
}

fn truthy(value: &str) -> bool {
    !(value.is_empty() || value == "0" || value.eq_ignore_ascii_case("false"))
}

impl<'src> Parser<'src> {
    /// Entries up to and including the closing `]`.
    pub(super) fn parse_class_body(&mut self, body: &mut Vec<PropDecl>) -> Result<(), ParseError> {
        while !self.ts.is(TokenKind::Bracket, "]")? {
            body.push(self.parse_prop()?);
        }
        self.ts.expect(TokenKind::Bracket, Some("]"))?;
        Ok(())
    }

    fn parse_prop(&mut self) -> Result<PropDecl, ParseError> {
        let kind = if self.ts.ahead(2, TokenKind::Ident, None)?.is_some() {
            match self.ts.accept_one(TokenKind::Ident, &["input", "output"])? {
                Some(0) => PropKind::Input,
                Some(_) => PropKind::Output,
                None => PropKind::Prop,
            }
        } else {
            PropKind::Prop
        };
        let name = self.ts.expect(TokenKind::Ident, None)?;
        let start = match kind {
            PropKind::Prop => name.span.start,
            _ => self.ts.behind(2)?.span.start,
        };
        let name = self.ts.text(&name).to_owned();
        let kind = if kind == PropKind::Prop && OUTPUT_NAME.is_match(&name) {
            PropKind::Output
        } else {
            kind
        };
        let mut prop = PropDecl::new(Span::new(start, start), kind, name);

        let typed = self.ts.is(TokenKind::Paren, "(")?;
        if typed {
            self.parse_type_clause(&mut prop)?;
        }
        if self.ts.is(TokenKind::Bracket, "[")? {
            self.parse_attributes(&mut prop)?;
            if !typed && self.ts.is(TokenKind::Paren, "(")? {
                self.parse_type_clause(&mut prop)?;
            }
        }
        if self.ts.is(TokenKind::Brace, "{")? {
            let extra = self.parse_record(Separator::Equals)?;
            prop.metaprops.get_or_insert_with(ValueMap::new).extend(extra);
        }

        self.parse_prop_texts(&mut prop)?;

        if let Some(eq) = self.ts.ahead(1, TokenKind::Symbol, Some("="))? {
            if !CHOICE_CLASSES.contains(&prop.class.as_str()) {
                return Err(ParseError::InvalidChoices {
                    class: prop.class.clone(),
                    offset: eq.span.start,
                });
            }
            self.ts.next()?;
            prop.choices = Some(self.parse_choices(&prop.class)?);
        }

        prop.span.end = self.ts.last_end();
        Ok(prop)
    }

    /// `( [*] type[:sub...] ) [readonly] [report]`
    fn parse_type_clause(&mut self, prop: &mut PropDecl) -> Result<(), ParseError> {
        self.ts.expect(TokenKind::Paren, Some("("))?;
        prop.star = self.ts.accept(TokenKind::Symbol, Some("*"))?;
        let mut class = self.ts.expect_text(TokenKind::Ident, None)?.to_lowercase();
        while self.ts.accept(TokenKind::Symbol, Some(":"))? {
            class.push(':');
            class.push_str(self.ts.expect_text(TokenKind::Ident, None)?);
        }
        self.ts.expect(TokenKind::Paren, Some(")"))?;
        prop.class = class;

        // A marker is not the next property's name, which would have a `(`.
        while self.ts.ahead(2, TokenKind::Paren, Some("("))?.is_none() {
            match self.ts.accept_one(TokenKind::Ident, &["readonly", "report"])? {
                Some(i) => {
                    let marker = ["readonly", "report"][i];
                    prop.metaprops
                        .get_or_insert_with(ValueMap::new)
                        .insert(marker.to_owned(), Value::Bool(true));
                }
                None => break,
            }
        }
        Ok(())
    }

    /// `[ name, !name, name="value" ... ]`
    fn parse_attributes(&mut self, prop: &mut PropDecl) -> Result<(), ParseError> {
        self.ts.expect(TokenKind::Bracket, Some("["))?;
        while !self.ts.is(TokenKind::Bracket, "]")? {
            let negated = self.ts.accept(TokenKind::Symbol, Some("!"))?;
            let key = self.ts.expect_text(TokenKind::Ident, None)?;
            let value = if self.ts.accept(TokenKind::Symbol, Some("="))? {
                let t = self.ts.next_or_fail("attribute value")?;
                Some(self.ts.text(&t).to_owned())
            } else {
                None
            };
            let enabled = !negated && value.as_deref().map_or(true, truthy);
            match key {
                "report" => prop.report = Some(enabled),
                "readonly" => prop.readonly = Some(enabled),
                "important" => prop.important = Some(enabled),
                "group" if value.is_some() => prop.group = value,
                _ => {
                    let v = match value {
                        Some(v) if !negated => Value::String(v),
                        _ => Value::Bool(!negated),
                    };
                    prop.metaprops
                        .get_or_insert_with(ValueMap::new)
                        .insert(key.to_owned(), v);
                }
            }
            self.ts.accept(TokenKind::Symbol, Some(","))?;
        }
        self.ts.expect(TokenKind::Bracket, Some("]"))?;
        Ok(())
    }

    /// `: "title" : default : "description"` with every part optional.
    fn parse_prop_texts(&mut self, prop: &mut PropDecl) -> Result<(), ParseError> {
        if !self.ts.accept(TokenKind::Symbol, Some(":"))? {
            return Ok(());
        }
        if self.ts.ahead(1, TokenKind::String, None)?.is_some() {
            prop.title = Some(self.ts.literal(None)?);
        }

        if self.ts.accept(TokenKind::Symbol, Some(":"))? {
            let quoted = self.ts.ahead(1, TokenKind::String, None)?.is_some();
            let default = if self.ts.is(TokenKind::Symbol, ":")? {
                None
            } else {
                self.parse_expr()?
            };
            if self.ts.accept(TokenKind::Symbol, Some(":"))? {
                prop.default = default;
                if self.ts.ahead(1, TokenKind::String, None)?.is_some() {
                    prop.description = Some(self.ts.literal(None)?);
                }
            } else if let Some(default) = default {
                let mut parts = Vec::new();
                if self.quoted_parts(&default, quoted, &mut parts) {
                    prop.description = Some(parts.join("\n"));
                } else {
                    prop.default = Some(default);
                }
            }
        }

        if let Some(title) = prop.title.take() {
            if prop.description.is_none() && reads_as_description(&title) {
                prop.description = Some(title);
            } else {
                let title = title.strip_suffix('.').map(str::to_owned).unwrap_or(title);
                prop.title = Some(title);
            }
        }
        Ok(())
    }

    /// Collect the texts of `"a" + "b" + ...` into `parts`. False for any
    /// other expression, including chains with a bare identifier or number.
    fn quoted_parts(&self, expr: &Expr, first_quoted: bool, parts: &mut Vec<String>) -> bool {
        match expr {
            Expr::Literal(text) if first_quoted => {
                parts.push(text.clone());
                true
            }
            Expr::Compound(n) if n.form == ExprForm::Infix && n.op == "+" => {
                let rhs_quoted = self.ts.source()[..n.span.end].ends_with(['"', '\'']);
                match (&n.lhs, &n.rhs) {
                    (Some(lhs), Expr::Literal(rhs)) if rhs_quoted => {
                        if !self.quoted_parts(lhs, first_quoted, parts) {
                            return false;
                        }
                        parts.push(rhs.clone());
                        true
                    }
                    _ => false,
                }
            }
            _ => false,
        }
    }

    /// `[ id : name [: default [: description]] ... ]`, raw token text throughout.
    fn parse_choices(&mut self, class: &str) -> Result<Vec<Choice>, ParseError> {
        self.ts.expect(TokenKind::Bracket, Some("["))?;
        let mut choices = Vec::new();
        while !self.ts.is(TokenKind::Bracket, "]")? {
            let id = self.choice_part("choice id")?;
            self.ts.expect(TokenKind::Symbol, Some(":"))?;
            let name = self.choice_part("choice name")?;
            let mut choice = Choice {
                id: self.ts.text(&id).to_owned(),
                name: self.ts.text(&name).to_owned(),
                default: None,
                description: None,
            };
            if self.ts.accept(TokenKind::Symbol, Some(":"))? {
                let t = self.choice_part("choice default")?;
                choice.default = Some(self.choice_default(class, t));
                if self.ts.accept(TokenKind::Symbol, Some(":"))? {
                    let t = self.choice_part("choice description")?;
                    choice.description = Some(self.ts.text(&t).to_owned());
                }
            }
            choices.push(choice);
        }
        self.ts.expect(TokenKind::Bracket, Some("]"))?;
        Ok(choices)
    }

    fn choice_part(&mut self, expected: &str) -> Result<Token, ParseError> {
        let t = self.ts.next_or_fail(expected)?;
        match t.kind {
            TokenKind::Ident | TokenKind::String | TokenKind::Number => Ok(t),
            _ => Err(self.mismatch(expected, t)),
        }
    }

    fn choice_default(&self, class: &str, t: Token) -> Value {
        let text = self.ts.text(&t);
        match (class, text) {
            ("flags", "0") => Value::Bool(false),
            ("flags", "1") => Value::Bool(true),
            _ if t.kind == TokenKind::Number => Value::Number(text.to_owned()),
            _ => Value::String(text.to_owned()),
        }
    }
}
