//! Dependency tree flattening.
//!
//! The framework injects parameters marked `Depends(...)`; each dependency
//! is itself a callable whose own parameters may declare further
//! dependencies. The compiler consumes the flattened tree: the handler
//! first, then every transitive dependency in declaration order.

use std::rc::Rc;

use arborium_tree_sitter::Node;
use indexmap::IndexSet;
use log::debug;

use crate::framework::{FrameworkSymbol, Route};
use crate::project::{Project, PyModule};
use crate::python;
use crate::resolve::path::{annotation_path, attribute_path};
use crate::resolve::{Callable, FunctionRef, NameResolver, Resolved};

const RESOLVE_FUEL: u8 = 8;
const MAX_DEPTH: usize = 16;

/// Flatten a route's dependency tree into callables, handler included.
pub fn dependency_tree(project: &Project, route: &Route) -> Vec<Callable> {
    let mut callables = vec![Callable::Function(route.handler.clone())];
    let mut seen: IndexSet<Callable> = IndexSet::new();
    collect(project, &route.handler, &mut callables, &mut seen, 0);
    callables
}

fn collect(
    project: &Project,
    func: &FunctionRef,
    callables: &mut Vec<Callable>,
    seen: &mut IndexSet<Callable>,
    depth: usize,
) {
    if depth >= MAX_DEPTH {
        debug!("dependency tree depth limit reached at {}.{}", func.module, func.qualname);
        return;
    }
    let Some(module) = project.module(&func.module) else {
        return;
    };
    let Some(node) = module.find_function(&func.qualname) else {
        return;
    };
    let Some(params) = node.child_by_field_name("parameters") else {
        return;
    };

    for param in python::named_children(params) {
        let Some(dependency) = parameter_dependency(project, &module, param) else {
            continue;
        };
        if !seen.insert(dependency.clone()) {
            continue;
        }
        callables.push(dependency.clone());
        match &dependency {
            Callable::Function(f) => collect(project, f, callables, seen, depth + 1),
            Callable::Class(c) | Callable::Instance(c) => {
                collect(project, &c.method("__init__"), callables, seen, depth + 1);
            }
        }
    }
}

/// The dependency callable declared by one parameter, if any.
///
/// Recognized forms: a `Depends(target)` default value, and
/// `Annotated[T, Depends(target)]` metadata. An argumentless `Depends()`
/// falls back to the parameter's annotated type, which the framework
/// treats as the callable.
fn parameter_dependency(
    project: &Project,
    module: &Rc<PyModule>,
    param: Node<'_>,
) -> Option<Callable> {
    let (annotation, default) = match param.kind() {
        "typed_default_parameter" => (
            param.child_by_field_name("type"),
            param.child_by_field_name("value"),
        ),
        "default_parameter" => (None, param.child_by_field_name("value")),
        "typed_parameter" => (param.child_by_field_name("type"), None),
        _ => return None,
    };

    let depends_call = default
        .filter(|d| is_depends_call(project, module, *d))
        .or_else(|| annotated_depends(project, module, annotation?));
    let call = depends_call?;

    let resolver = NameResolver::new(project);
    let target = call
        .child_by_field_name("arguments")
        .and_then(|arguments| {
            python::named_children(arguments)
                .into_iter()
                .find(|a| a.kind() != "keyword_argument" && a.kind() != "comment")
        });

    let resolved = match target {
        Some(expr) => {
            let path = attribute_path(expr, module.source())?;
            resolver.resolve_in_module(module, &path, RESOLVE_FUEL)
        }
        // `Depends()` without arguments: the annotated type is the callable
        None => {
            let annotation = annotation?;
            let path = annotation_path(annotation, module.source())?;
            resolver.resolve_in_module(module, &path, RESOLVE_FUEL)
        }
    };

    match resolved {
        Some(Resolved::Function(f)) => Some(Callable::Function(f)),
        Some(Resolved::Class(c)) => Some(Callable::Class(c)),
        Some(Resolved::Instance(c)) => Some(Callable::Instance(c)),
        _ => None,
    }
}

fn is_depends_call(project: &Project, module: &Rc<PyModule>, node: Node<'_>) -> bool {
    if node.kind() != "call" {
        return false;
    }
    let Some(callee) = node.child_by_field_name("function") else {
        return false;
    };
    let Some(path) = attribute_path(callee, module.source()) else {
        return false;
    };
    matches!(
        NameResolver::new(project).resolve_in_module(module, &path, RESOLVE_FUEL),
        Some(Resolved::Framework(FrameworkSymbol::Depends))
    )
}

/// `Annotated[T, Depends(...)]`: the first `Depends` call in the metadata.
fn annotated_depends<'t>(
    project: &Project,
    module: &Rc<PyModule>,
    annotation: Node<'t>,
) -> Option<Node<'t>> {
    let mut node = annotation;
    if node.kind() == "type" {
        node = python::named_children(node).into_iter().next()?;
    }
    if node.kind() != "subscript" {
        return None;
    }
    let value = node.child_by_field_name("value")?;
    let head = attribute_path(value, module.source())?;
    if head != "Annotated" && !head.ends_with(".Annotated") {
        return None;
    }
    python::children_by_field(node, "subscript")
        .into_iter()
        .skip(1)
        .find(|meta| is_depends_call(project, module, *meta))
}
