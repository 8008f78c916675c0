//! Dotted-path reconstruction from expression nodes.
//!
//! `a.b().c` becomes `"a.b.c"`; the chain fails when the leftmost producer
//! is anything but a bare name (a subscript, a literal, a lambda).

use arborium_tree_sitter::Node;

use crate::python;

/// Reconstruct the full dotted attribute path of an expression.
pub fn attribute_path(node: Node<'_>, source: &str) -> Option<String> {
    let mut names = Vec::new();
    if !collect(node, source, &mut names) {
        return None;
    }
    names.reverse();
    Some(names.join("."))
}

fn collect(node: Node<'_>, source: &str, names: &mut Vec<String>) -> bool {
    match node.kind() {
        "identifier" => {
            names.push(python::text(node, source).to_owned());
            true
        }
        "attribute" => {
            let (Some(object), Some(attr)) = (
                node.child_by_field_name("object"),
                node.child_by_field_name("attribute"),
            ) else {
                return false;
            };
            names.push(python::text(attr, source).to_owned());
            collect(object, source, names)
        }
        "call" => match node.child_by_field_name("function") {
            Some(function) => collect(function, source, names),
            None => false,
        },
        _ => false,
    }
}

/// The symbolic name of an assignable or raisable expression.
///
/// Supported forms: a name, a call of a name, an attribute chain, or an
/// `await` of one of those. Everything else (lambdas, comprehensions,
/// binary operations) has no symbolic name.
pub fn symbolic_target(node: Node<'_>, source: &str) -> Option<String> {
    match node.kind() {
        "identifier" => Some(python::text(node, source).to_owned()),
        "attribute" => attribute_path(node, source),
        "call" => node
            .child_by_field_name("function")
            .and_then(|f| symbolic_target(f, source)),
        "await" => python::named_children(node)
            .into_iter()
            .next()
            .and_then(|inner| symbolic_target(inner, source)),
        _ => None,
    }
}

/// The dotted path of a type annotation, stripping one layer of generic
/// wrapping: `Annotated[X, …]` resolves to `X`, any other subscripted
/// generic to its head. Quoted forward references are unwrapped.
pub fn annotation_path(node: Node<'_>, source: &str) -> Option<String> {
    match node.kind() {
        "type" => python::named_children(node)
            .into_iter()
            .next()
            .and_then(|inner| annotation_path(inner, source)),
        "string" => python::string_literal(node, source).filter(|s| !s.is_empty()),
        "subscript" => {
            let value = node.child_by_field_name("value")?;
            let head = attribute_path(value, source)?;
            if head == "Annotated" || head.ends_with(".Annotated") {
                python::children_by_field(node, "subscript")
                    .into_iter()
                    .next()
                    .and_then(|first| annotation_path(first, source))
            } else {
                Some(head)
            }
        }
        _ => attribute_path(node, source),
    }
}
