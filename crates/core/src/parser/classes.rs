use super::literals::Separator;
use super::Parser;
use crate::ast::{BaseArgs, BaseDecl, ClassDecl, Expr, Span};
use crate::error::ParseError;
use crate::lexer::TokenKind;

/// Tag names carried by a `tags(...)` base clause.
pub(super) fn tag_names(args: &BaseArgs) -> Vec<String> {
    match args {
        BaseArgs::Scalar(e) => e.literal().map(str::to_owned).into_iter().collect(),
        BaseArgs::List(items) => items
            .iter()
            .filter_map(Expr::literal)
            .map(str::to_owned)
            .collect(),
        BaseArgs::Record(_) => Vec::new(),
    }
}

impl<'src> Parser<'src> {
    /// `@Kind base(args) base{record} ... [= name] [: "desc"] ( ; | [ body ]+ )`
    pub(super) fn parse_class_decl(
        &mut self,
        at: Span,
        keyword: &str,
    ) -> Result<ClassDecl, ParseError> {
        let mut class = ClassDecl {
            kind: keyword.to_owned(),
            name: self.names.next_name(at),
            named: false,
            desc: None,
            bases: Vec::new(),
            body: Vec::new(),
        };

        while let Some(t) = self.ts.ahead(1, TokenKind::Ident, None)? {
            self.ts.next()?;
            let name = self.ts.text(&t).to_owned();
            let args = if self.ts.is(TokenKind::Brace, "{")? {
                BaseArgs::Record(self.parse_record(Separator::Colon)?)
            } else if self.ts.accept(TokenKind::Paren, Some("("))? {
                self.parse_base_args()?
            } else {
                BaseArgs::List(Vec::new())
            };
            class.bases.push(BaseDecl { name, args });
        }

        if self.ts.accept(TokenKind::Symbol, Some("="))? {
            class.name = self.ts.expect_text(TokenKind::Ident, None)?.to_owned();
            class.named = true;
        }
        if self.ts.accept(TokenKind::Symbol, Some(":"))? {
            class.desc = Some(self.ts.literal(None)?);
        }
        if self.ts.accept(TokenKind::Symbol, Some(";"))? {
            return Ok(class);
        }

        self.ts.expect(TokenKind::Bracket, Some("["))?;
        loop {
            self.parse_class_body(&mut class.body)?;
            if !self.ts.accept(TokenKind::Bracket, Some("["))? {
                break;
            }
        }
        Ok(class)
    }

    /// Arguments after `name(`; commas between them are optional.
    fn parse_base_args(&mut self) -> Result<BaseArgs, ParseError> {
        let mut args = Vec::new();
        while !self.ts.is(TokenKind::Paren, ")")? {
            args.push(self.require_expr()?);
            self.ts.accept(TokenKind::Symbol, Some(","))?;
        }
        self.ts.expect(TokenKind::Paren, Some(")"))?;
        if args.len() == 1 {
            if let Some(only) = args.pop() {
                return Ok(BaseArgs::Scalar(only));
            }
        }
        Ok(BaseArgs::List(args))
    }
}
