//! Helpers over the tree-sitter Python grammar.
//!
//! Node-kind predicates, field access, and literal readers used by the
//! module index and the analysis passes. All functions are total: malformed
//! or unexpected trees yield `None` rather than panicking.

use arborium_tree_sitter::{Language, Node, Parser, Tree};

/// Parse Python source into a tree-sitter tree.
pub fn parse(source: &str) -> Tree {
    let mut parser = Parser::new();
    let language: Language = arborium_python::language().into();
    parser
        .set_language(&language)
        .expect("failed to set language");
    parser.parse(source, None).expect("failed to parse source")
}

/// Text of a node within its source.
pub fn text<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

/// Named children of a node, in document order.
pub fn named_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

/// All nodes bound to the given field, in document order.
pub fn children_by_field<'t>(node: Node<'t>, field: &str) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.children_by_field_name(field, &mut cursor).collect()
}

/// All named nodes under `node` (inclusive), pre-order.
pub fn descendants<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut out = Vec::new();
    collect_descendants(node, &mut out);
    out
}

fn collect_descendants<'t>(node: Node<'t>, out: &mut Vec<Node<'t>>) {
    if node.is_named() {
        out.push(node);
    }
    for child in named_children(node) {
        collect_descendants(child, out);
    }
}

/// The `name` field text of a function or class definition.
pub fn definition_name<'s>(node: Node<'_>, source: &'s str) -> Option<&'s str> {
    node.child_by_field_name("name").map(|n| text(n, source))
}

/// Unwrap a `decorated_definition` to the definition it wraps.
pub fn unwrap_decorated(node: Node<'_>) -> Node<'_> {
    if node.kind() == "decorated_definition" {
        node.child_by_field_name("definition").unwrap_or(node)
    } else {
        node
    }
}

/// Find a function definition by bare name, anywhere in the tree.
pub fn find_function<'t>(root: Node<'t>, source: &str, name: &str) -> Option<Node<'t>> {
    descendants(root).into_iter().find(|n| {
        n.kind() == "function_definition" && definition_name(*n, source) == Some(name)
    })
}

/// Find a class definition by name, anywhere in the tree.
pub fn find_class<'t>(root: Node<'t>, source: &str, name: &str) -> Option<Node<'t>> {
    descendants(root)
        .into_iter()
        .find(|n| n.kind() == "class_definition" && definition_name(*n, source) == Some(name))
}

/// Find a method definition directly inside a class body.
pub fn find_method<'t>(class_node: Node<'t>, source: &str, name: &str) -> Option<Node<'t>> {
    let body = class_node.child_by_field_name("body")?;
    named_children(body)
        .into_iter()
        .map(unwrap_decorated)
        .find(|n| n.kind() == "function_definition" && definition_name(*n, source) == Some(name))
}

/// A literal constant value in source.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Str(String),
    Bool(bool),
    None,
}

impl Literal {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Literal::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Literal::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// Read a literal constant, if the node is one.
pub fn literal(node: Node<'_>, source: &str) -> Option<Literal> {
    match node.kind() {
        "integer" => int_literal(node, source).map(Literal::Int),
        "string" => string_literal(node, source).map(Literal::Str),
        "true" => Some(Literal::Bool(true)),
        "false" => Some(Literal::Bool(false)),
        "none" => Some(Literal::None),
        _ => None,
    }
}

/// Integer literal value. Underscore separators are accepted.
pub fn int_literal(node: Node<'_>, source: &str) -> Option<i64> {
    if node.kind() != "integer" {
        return None;
    }
    text(node, source).replace('_', "").parse().ok()
}

/// String literal content, concatenating content and escape fragments.
///
/// F-string interpolations disqualify the node: a string with computed
/// parts is not a literal.
pub fn string_literal(node: Node<'_>, source: &str) -> Option<String> {
    if node.kind() != "string" {
        return None;
    }
    let mut out = String::new();
    for child in named_children(node) {
        match child.kind() {
            "string_content" | "escape_sequence" => out.push_str(text(child, source)),
            "string_start" | "string_end" => {}
            _ => return None,
        }
    }
    Some(out)
}

/// The raised expression of a `raise_statement`, excluding any `from` cause.
pub fn raise_exception<'t>(node: Node<'t>) -> Option<Node<'t>> {
    let cause = node.child_by_field_name("cause");
    named_children(node)
        .into_iter()
        .find(|n| n.kind() != "comment" && Some(*n) != cause)
}

/// Whether `node` is the callee (`function` field) of a call expression.
pub fn is_call_callee(node: Node<'_>) -> bool {
    match node.parent() {
        Some(parent) if parent.kind() == "call" => {
            parent.child_by_field_name("function") == Some(node)
        }
        _ => false,
    }
}
