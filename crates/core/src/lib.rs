#![allow(clippy::result_large_err)]
//! fgd-core: parser for Valve Forge Game Data (`.fgd`) files.
//!
//! Source text flows through a small pipeline of pull-based stages:
//! [`Tokenizer`] produces tokens, [`TokenStream`] adds bounded lookahead and
//! grammar combinators, and [`Parser`] yields one [`Node`] per top-level
//! `@directive` followed by a final [`ParserMetadata`] summary.
//!
//! # Public API
//!
//! - [`parse()`] / [`parse_all()`] -- lazily or eagerly parse one file
//! - [`Parser::with_names`] -- inject a [`NameSource`] for unnamed classes
//! - [`serialize::document`] -- render a parse as a JSON document
//! - [`ParseError`] -- the single error type of every stage
//!
//! The crate performs no I/O.

pub mod ast;
pub mod error;
pub mod lexer;
pub mod lookahead;
pub mod names;
pub mod parser;
pub mod serialize;
pub mod stream;

// ── Convenience re-exports ───────────────────────────────────────────

pub use ast::{
    BaseArgs, BaseDecl, Choice, ClassDecl, Expr, ExprForm, ExprNode, Node, NodeKind,
    ParserMetadata, PropDecl, PropKind, Span, Value, ValueMap,
};
pub use error::{ErrorKind, ParseError};
pub use lexer::{tokenize, Token, TokenKind, Tokenizer};
pub use lookahead::{LookaheadStream, RangeError};
pub use names::{NameSource, SequentialNames};
pub use parser::{parse, parse_all, Parser};
pub use stream::{TokenStream, LOOKAHEAD};
