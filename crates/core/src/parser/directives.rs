use super::literals::Separator;
use super::Parser;
use crate::ast::NodeKind;
use crate::error::ParseError;
use crate::lexer::{Token, TokenKind};
use indexmap::IndexMap;

impl<'src> Parser<'src> {
    /// Everything after `@keyword` for the non-class directives.
    pub(super) fn parse_directive(
        &mut self,
        keyword: &str,
        directive: Token,
    ) -> Result<NodeKind, ParseError> {
        match keyword.to_ascii_lowercase().as_str() {
            "version" => self.parse_version(),
            "include" => Ok(NodeKind::Include {
                name: self.parse_file_argument()?,
            }),
            "exclude" => Ok(NodeKind::Exclude {
                name: self.parse_file_argument()?,
            }),
            "mapsize" => self.parse_mapsize(),
            "materialexclusion" => self.parse_material_exclusion(),
            "autovisgroup" => self.parse_auto_vis_group(),
            "entitygroup" => self.parse_entity_group(),
            "visgroupfilter" => self.parse_vis_group_filter(),
            _ => Err(ParseError::UnsupportedDirective {
                name: keyword.to_owned(),
                offset: directive.span.start,
            }),
        }
    }

    // -- Simple directives ---------------------------------------

    fn parse_version(&mut self) -> Result<NodeKind, ParseError> {
        self.ts.expect(TokenKind::Paren, Some("("))?;
        let t = self.ts.expect(TokenKind::Number, None)?;
        let version = self
            .ts
            .text(&t)
            .parse::<i64>()
            .map_err(|_| self.mismatch("integer version", t))?;
        self.ts.expect(TokenKind::Paren, Some(")"))?;
        Ok(NodeKind::Version { version })
    }

    /// `("file")`, `(file)` or a bare `"file"`.
    fn parse_file_argument(&mut self) -> Result<String, ParseError> {
        let parens = self.ts.accept(TokenKind::Paren, Some("("))?;
        let t = self.ts.next_or_fail("file name")?;
        if !matches!(t.kind, TokenKind::String | TokenKind::Ident) {
            return Err(self.mismatch("file name", t));
        }
        if parens {
            self.ts.expect(TokenKind::Paren, Some(")"))?;
        }
        Ok(self.ts.text(&t).to_owned())
    }

    fn parse_mapsize(&mut self) -> Result<NodeKind, ParseError> {
        self.ts.expect(TokenKind::Paren, Some("("))?;
        let x = self.ts.expect_text(TokenKind::Number, None)?.to_owned();
        self.ts.accept(TokenKind::Symbol, Some(","))?;
        let y = self.ts.expect_text(TokenKind::Number, None)?.to_owned();
        self.ts.expect(TokenKind::Paren, Some(")"))?;
        Ok(NodeKind::MapSize { x, y })
    }

    // -- Lists and groups ----------------------------------------

    /// `[ "a" "b", ... ]` of strings with optional commas.
    fn string_list(&mut self) -> Result<Vec<String>, ParseError> {
        self.ts.expect(TokenKind::Bracket, Some("["))?;
        let mut list = Vec::new();
        while !self.ts.is(TokenKind::Bracket, "]")? {
            list.push(self.ts.expect_text(TokenKind::String, None)?.to_owned());
            self.ts.accept(TokenKind::Symbol, Some(","))?;
        }
        self.ts.expect(TokenKind::Bracket, Some("]"))?;
        Ok(list)
    }

    fn parse_material_exclusion(&mut self) -> Result<NodeKind, ParseError> {
        Ok(NodeKind::MaterialExclusion {
            list: self.string_list()?,
        })
    }

    /// `= "Parent" [ "Group" [ "entity", ... ] ... ]`
    fn parse_auto_vis_group(&mut self) -> Result<NodeKind, ParseError> {
        self.ts.expect(TokenKind::Symbol, Some("="))?;
        let name = self.ts.literal(None)?;
        self.ts.expect(TokenKind::Bracket, Some("["))?;
        let mut groups = IndexMap::new();
        while !self.ts.is(TokenKind::Bracket, "]")? {
            let group = self.ts.expect_text(TokenKind::String, None)?.to_owned();
            let members = self.string_list()?;
            groups.insert(group, members);
            self.ts.accept(TokenKind::Symbol, Some(","))?;
        }
        self.ts.expect(TokenKind::Bracket, Some("]"))?;
        Ok(NodeKind::AutoVisGroup { name, groups })
    }

    /// `"Name" { key = value ... }?`
    fn parse_entity_group(&mut self) -> Result<NodeKind, ParseError> {
        let name = self.ts.expect_text(TokenKind::String, None)?.to_owned();
        let meta = if self.ts.is(TokenKind::Brace, "{")? {
            Some(self.parse_record(Separator::Equals)?)
        } else {
            None
        };
        Ok(NodeKind::EntityGroup { name, meta })
    }

    /// `{ key = "value" ... }`
    fn parse_vis_group_filter(&mut self) -> Result<NodeKind, ParseError> {
        self.ts.expect(TokenKind::Brace, Some("{"))?;
        let mut args = IndexMap::new();
        while !self.ts.is(TokenKind::Brace, "}")? {
            let key = self.ts.expect_text(TokenKind::Ident, None)?.to_owned();
            self.ts.expect(TokenKind::Symbol, Some("="))?;
            let value = self.ts.expect_text(TokenKind::String, None)?.to_owned();
            args.insert(key, value);
            self.ts.accept(TokenKind::Symbol, Some(","))?;
        }
        self.ts.expect(TokenKind::Brace, Some("}"))?;
        Ok(NodeKind::VisGroupFilter { args })
    }
}
