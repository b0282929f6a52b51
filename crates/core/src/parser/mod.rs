//! Recursive-descent parser for FGD files.
//!
//! [`Parser`] is a lazy iterator of top-level [`Node`]s. Each `next` call
//! reads one `@directive`; once the input is exhausted it yields a single
//! [`ParserMetadata`] node summarising the classes, tags and property
//! classes seen, then ends. The first error ends the sequence.
use crate::ast::{ClassDecl, Node, NodeKind, ParserMetadata, Span};
use crate::error::ParseError;
use crate::lexer::TokenKind;
use crate::names::{NameSource, SequentialNames};
use crate::stream::TokenStream;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace};

mod classes;
mod directives;
mod expressions;
mod literals;
mod properties;

/// Directive keywords that introduce a class declaration.
static CLASS_KEYWORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:\w*(?:class|event|data)|struct)$").unwrap());

pub fn is_class_keyword(keyword: &str) -> bool {
    CLASS_KEYWORD.is_match(keyword)
}

// ──────────────────────────────────────────────
// Parser
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Directives,
    Finished,
}

/// Everything accumulated across declarations during one parse.
struct ParserState {
    stage: Stage,
    registry: ParserMetadata,
}

pub struct Parser<'src> {
    ts: TokenStream<'src>,
    name: String,
    names: Box<dyn NameSource + 'src>,
    state: ParserState,
}

impl<'src> Parser<'src> {
    pub fn new(name: &str, src: &'src str) -> Self {
        Parser::with_names(name, src, SequentialNames::default())
    }

    /// Like [`Parser::new`] with a custom source of placeholder class names.
    pub fn with_names(name: &str, src: &'src str, names: impl NameSource + 'src) -> Self {
        Parser {
            ts: TokenStream::new(src),
            name: name.to_owned(),
            names: Box::new(names),
            state: ParserState {
                stage: Stage::Directives,
                registry: ParserMetadata::default(),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn next_node(&mut self) -> Result<Option<Node>, ParseError> {
        if self.state.stage == Stage::Finished {
            return Ok(None);
        }
        let Some(at) = self.ts.next()? else {
            self.state.stage = Stage::Finished;
            return Ok(Some(self.metadata_node()));
        };
        if at.kind != TokenKind::Symbol || self.ts.text(&at) != "@" {
            return Err(ParseError::UnexpectedToken {
                text: self.ts.text(&at).to_owned(),
                offset: at.span.start,
            });
        }
        let directive = self.ts.expect(TokenKind::Ident, None)?;
        let keyword = self.ts.text(&directive);
        trace!(file = %self.name, keyword, offset = at.span.start, "directive");

        let kind = if is_class_keyword(keyword) {
            let class = self.parse_class_decl(at.span, keyword)?;
            self.register(&class);
            NodeKind::Class(class)
        } else {
            self.parse_directive(keyword, directive)?
        };
        Ok(Some(Node {
            span: Span::new(at.span.start, self.ts.last_end()),
            kind,
        }))
    }

    /// Record a finished class in the cross-declaration registry.
    fn register(&mut self, class: &ClassDecl) {
        let registry = &mut self.state.registry;
        if class.named {
            registry
                .classes
                .entry(class.kind.to_lowercase())
                .or_default()
                .insert(class.name.clone());
        }
        for base in class.bases.iter().filter(|b| b.name.eq_ignore_ascii_case("tags")) {
            for tag in classes::tag_names(&base.args) {
                registry.class_tags.insert(tag);
            }
        }
        for prop in &class.body {
            if !prop.class.is_empty() {
                registry.property_classes.insert(prop.class.clone());
            }
            if let Some(group) = &prop.group {
                registry.property_groups.insert(group.clone());
            }
        }
        debug!(
            file = %self.name,
            kind = %class.kind,
            class = %class.name,
            properties = class.body.len(),
            "class declared"
        );
    }

    fn metadata_node(&mut self) -> Node {
        let meta = std::mem::take(&mut self.state.registry);
        debug!(
            file = %self.name,
            class_kinds = meta.classes.len(),
            tags = meta.class_tags.len(),
            property_classes = meta.property_classes.len(),
            "parse finished"
        );
        Node {
            span: Span::new(0, self.ts.source().len()),
            kind: NodeKind::Metadata(meta),
        }
    }
}

impl Iterator for Parser<'_> {
    type Item = Result<Node, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_node() {
            Ok(node) => node.map(Ok),
            Err(e) => {
                self.state.stage = Stage::Finished;
                Some(Err(e))
            }
        }
    }
}

/// Lazily parse `src`. `name` identifies the input in log output.
pub fn parse<'src>(name: &str, src: &'src str) -> Parser<'src> {
    Parser::new(name, src)
}

/// Parse `src` to completion, returning every node or the first error.
pub fn parse_all(name: &str, src: &str) -> Result<Vec<Node>, ParseError> {
    parse(name, src).collect()
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
