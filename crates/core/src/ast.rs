//! Shared AST types for the FGD parser.
//!
//! These types are produced by the parser and consumed by the serializer.
//! They live here so that the lexer, the token stream and every grammar
//! module can import them without depending on each other.

use indexmap::IndexMap;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ──────────────────────────────────────────────
// Spans
// ──────────────────────────────────────────────

/// Half-open `[start, end)` byte range into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    /// Smallest span covering both `self` and `other`.
    pub fn to(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

// ──────────────────────────────────────────────
// Values
// ──────────────────────────────────────────────

/// Ordered key → value map used by records and metaprops.
pub type ValueMap = IndexMap<String, Value>;

/// Literal, record and array data. Numbers keep their source text.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Number(String),
    Bool(bool),
    Null,
    Array(Vec<Value>),
    Map(ValueMap),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::Number(s) => Some(s),
            _ => None,
        }
    }
}

// ──────────────────────────────────────────────
// Expressions
// ──────────────────────────────────────────────

/// Shape of a compound expression node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExprForm {
    Infix,
    Postfix,
    Unary,
}

impl ExprForm {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExprForm::Infix => "infix",
            ExprForm::Postfix => "postfix",
            ExprForm::Unary => "unary",
        }
    }
}

/// An expression from the embedded expression language.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Bare string, identifier or number text.
    Literal(String),
    Compound(Box<ExprNode>),
    /// Switch cases and map-literal entries.
    List(Vec<Expr>),
}

impl Expr {
    pub fn literal(&self) -> Option<&str> {
        match self {
            Expr::Literal(s) => Some(s),
            _ => None,
        }
    }

    pub fn node(&self) -> Option<&ExprNode> {
        match self {
            Expr::Compound(n) => Some(n),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExprNode {
    pub span: Span,
    pub form: ExprForm,
    pub op: String,
    pub lhs: Option<Expr>,
    pub rhs: Expr,
}

// ──────────────────────────────────────────────
// Class declarations
// ──────────────────────────────────────────────

/// Arguments attached to one base/implements clause.
#[derive(Debug, Clone, PartialEq)]
pub enum BaseArgs {
    /// `name(a)` collapses to the single argument.
    Scalar(Expr),
    /// `name`, `name()` and `name(a, b, ...)`.
    List(Vec<Expr>),
    /// `name{ key: value }`
    Record(ValueMap),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BaseDecl {
    pub name: String,
    pub args: BaseArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropKind {
    Input,
    Output,
    Prop,
}

impl PropKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropKind::Input => "input",
            PropKind::Output => "output",
            PropKind::Prop => "prop",
        }
    }
}

/// One entry of a `choices`/`flags` list: `id : name [: default [: description]]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    pub id: String,
    pub name: String,
    pub default: Option<Value>,
    pub description: Option<String>,
}

/// One input/output/property entry inside a class body.
#[derive(Debug, Clone, PartialEq)]
pub struct PropDecl {
    pub span: Span,
    pub kind: PropKind,
    pub star: bool,
    pub name: String,
    pub class: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub group: Option<String>,
    pub report: Option<bool>,
    pub readonly: Option<bool>,
    pub important: Option<bool>,
    pub metaprops: Option<ValueMap>,
    pub default: Option<Expr>,
    pub choices: Option<Vec<Choice>>,
}

impl PropDecl {
    pub(crate) fn new(span: Span, kind: PropKind, name: String) -> Self {
        PropDecl {
            span,
            kind,
            star: false,
            name,
            class: String::new(),
            title: None,
            description: None,
            group: None,
            report: None,
            readonly: None,
            important: None,
            metaprops: None,
            default: None,
            choices: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    /// Directive keyword exactly as written, e.g. `SolidClass`.
    pub kind: String,
    pub name: String,
    /// False while `name` is still the generated placeholder.
    pub named: bool,
    pub desc: Option<String>,
    pub bases: Vec<BaseDecl>,
    pub body: Vec<PropDecl>,
}

// ──────────────────────────────────────────────
// Top-level nodes
// ──────────────────────────────────────────────

/// Summary of everything discovered during one parse. Always the last node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParserMetadata {
    /// Lower-cased directive keyword → class names.
    pub classes: BTreeMap<String, BTreeSet<String>>,
    pub class_tags: BTreeSet<String>,
    pub property_classes: BTreeSet<String>,
    pub property_groups: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Version { version: i64 },
    Include { name: String },
    Exclude { name: String },
    MapSize { x: String, y: String },
    MaterialExclusion { list: Vec<String> },
    EntityGroup { name: String, meta: Option<ValueMap> },
    VisGroupFilter { args: IndexMap<String, String> },
    AutoVisGroup { name: String, groups: IndexMap<String, Vec<String>> },
    Class(ClassDecl),
    Metadata(ParserMetadata),
}

impl NodeKind {
    /// The `type` tag used when the node is serialized.
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeKind::Version { .. } => "Version",
            NodeKind::Include { .. } => "Include",
            NodeKind::Exclude { .. } => "Exclude",
            NodeKind::MapSize { .. } => "MapSize",
            NodeKind::MaterialExclusion { .. } => "MaterialExclusion",
            NodeKind::EntityGroup { .. } => "EntityGroup",
            NodeKind::VisGroupFilter { .. } => "VisGroupFilter",
            NodeKind::AutoVisGroup { .. } => "AutoVisGroup",
            NodeKind::Class(_) => "Class",
            NodeKind::Metadata(_) => "ParserMetadata",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub span: Span,
    pub kind: NodeKind,
}

impl Node {
    pub fn class(&self) -> Option<&ClassDecl> {
        match &self.kind {
            NodeKind::Class(c) => Some(c),
            _ => None,
        }
    }
}
