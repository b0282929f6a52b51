//! JSON rendering of parsed nodes.
//!
//! A document is `[{"name": ...}, node, ..., metadata]`. Spans render as
//! `"start:end"` strings and numbers keep their source text. Keys appear in
//! insertion order.

use crate::ast::*;
use crate::error::ParseError;
use serde_json::{json, Map, Value as Json};

/// Collect a parse into one JSON document, stopping at the first error.
pub fn document<I>(name: &str, nodes: I) -> Result<Json, ParseError>
where
    I: IntoIterator<Item = Result<Node, ParseError>>,
{
    let mut out = vec![json!({ "name": name })];
    for node in nodes {
        out.push(node_to_json(&node?));
    }
    Ok(Json::Array(out))
}

pub fn node_to_json(node: &Node) -> Json {
    let mut m = Map::new();
    m.insert("span".to_owned(), json!(node.span.to_string()));
    m.insert("type".to_owned(), json!(node.kind.type_name()));
    match &node.kind {
        NodeKind::Version { version } => {
            m.insert("version".to_owned(), json!(version));
        }
        NodeKind::Include { name } | NodeKind::Exclude { name } => {
            m.insert("name".to_owned(), json!(name));
        }
        NodeKind::MapSize { x, y } => {
            m.insert("x".to_owned(), json!(x));
            m.insert("y".to_owned(), json!(y));
        }
        NodeKind::MaterialExclusion { list } => {
            m.insert("list".to_owned(), json!(list));
        }
        NodeKind::EntityGroup { name, meta } => {
            m.insert("name".to_owned(), json!(name));
            if let Some(meta) = meta {
                m.insert("meta".to_owned(), value_map_to_json(meta));
            }
        }
        NodeKind::VisGroupFilter { args } => {
            let args: Map<String, Json> =
                args.iter().map(|(k, v)| (k.clone(), json!(v))).collect();
            m.insert("args".to_owned(), Json::Object(args));
        }
        NodeKind::AutoVisGroup { name, groups } => {
            m.insert("name".to_owned(), json!(name));
            let groups: Map<String, Json> =
                groups.iter().map(|(k, v)| (k.clone(), json!(v))).collect();
            m.insert("groups".to_owned(), Json::Object(groups));
        }
        NodeKind::Class(class) => serialize_class(&mut m, class),
        NodeKind::Metadata(meta) => {
            m.insert("meta".to_owned(), serialize_metadata(meta));
        }
    }
    Json::Object(m)
}

// ── Classes ──────────────────────────────────────────────────────────

fn serialize_class(m: &mut Map<String, Json>, class: &ClassDecl) {
    m.insert("kind".to_owned(), json!(class.kind));
    m.insert("name".to_owned(), json!(class.name));
    m.insert("desc".to_owned(), json!(class.desc));
    let bases: Vec<Json> = class
        .bases
        .iter()
        .map(|b| json!({ "name": b.name, "args": base_args_to_json(&b.args) }))
        .collect();
    m.insert("impl".to_owned(), Json::Array(bases));
    let body: Vec<Json> = class.body.iter().map(prop_to_json).collect();
    m.insert("body".to_owned(), Json::Array(body));
}

fn base_args_to_json(args: &BaseArgs) -> Json {
    match args {
        BaseArgs::Scalar(e) => expr_to_json(e),
        BaseArgs::List(items) => Json::Array(items.iter().map(expr_to_json).collect()),
        BaseArgs::Record(r) => value_map_to_json(r),
    }
}

fn prop_to_json(p: &PropDecl) -> Json {
    let mut m = Map::new();
    m.insert("span".to_owned(), json!(p.span.to_string()));
    m.insert("kind".to_owned(), json!(p.kind.as_str()));
    if p.star {
        m.insert("star".to_owned(), json!(true));
    }
    m.insert("name".to_owned(), json!(p.name));
    m.insert("class".to_owned(), json!(p.class));
    m.insert("title".to_owned(), json!(p.title));
    m.insert(
        "default".to_owned(),
        p.default.as_ref().map_or(Json::Null, expr_to_json),
    );
    m.insert("description".to_owned(), json!(p.description));
    if let Some(group) = &p.group {
        m.insert("group".to_owned(), json!(group));
    }
    for (key, flag) in [
        ("report", p.report),
        ("readonly", p.readonly),
        ("important", p.important),
    ] {
        if let Some(flag) = flag {
            m.insert(key.to_owned(), json!(flag));
        }
    }
    if let Some(meta) = &p.metaprops {
        m.insert("metaprops".to_owned(), value_map_to_json(meta));
    }
    if let Some(choices) = &p.choices {
        let choices: Vec<Json> = choices.iter().map(choice_to_json).collect();
        m.insert("choices".to_owned(), Json::Array(choices));
    }
    Json::Object(m)
}

fn choice_to_json(c: &Choice) -> Json {
    let mut m = Map::new();
    m.insert("id".to_owned(), json!(c.id));
    m.insert("name".to_owned(), json!(c.name));
    if let Some(default) = &c.default {
        m.insert("default".to_owned(), value_to_json(default));
    }
    if let Some(description) = &c.description {
        m.insert("description".to_owned(), json!(description));
    }
    Json::Object(m)
}

fn serialize_metadata(meta: &ParserMetadata) -> Json {
    let classes: Map<String, Json> = meta
        .classes
        .iter()
        .map(|(kind, names)| (kind.clone(), json!(names)))
        .collect();
    json!({
        "classes": classes,
        "class_tags": meta.class_tags,
        "property_classes": meta.property_classes,
        "property_groups": meta.property_groups,
    })
}

// ── Expressions and values ───────────────────────────────────────────

pub fn expr_to_json(e: &Expr) -> Json {
    match e {
        Expr::Literal(s) => json!(s),
        Expr::List(items) => Json::Array(items.iter().map(expr_to_json).collect()),
        Expr::Compound(n) => {
            let mut m = Map::new();
            m.insert("span".to_owned(), json!(n.span.to_string()));
            m.insert("expr".to_owned(), json!(n.form.as_str()));
            m.insert("op".to_owned(), json!(n.op));
            if let Some(lhs) = &n.lhs {
                m.insert("lhs".to_owned(), expr_to_json(lhs));
            }
            m.insert("rhs".to_owned(), expr_to_json(&n.rhs));
            Json::Object(m)
        }
    }
}

pub fn value_to_json(v: &Value) -> Json {
    match v {
        Value::String(s) | Value::Number(s) => json!(s),
        Value::Bool(b) => json!(b),
        Value::Null => Json::Null,
        Value::Array(items) => Json::Array(items.iter().map(value_to_json).collect()),
        Value::Map(m) => value_map_to_json(m),
    }
}

fn value_map_to_json(m: &ValueMap) -> Json {
    Json::Object(
        m.iter()
            .map(|(k, v)| (k.clone(), value_to_json(v)))
            .collect(),
    )
}
