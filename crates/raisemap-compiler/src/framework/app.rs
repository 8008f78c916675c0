//! Application object location and route discovery.

use std::rc::Rc;

use arborium_tree_sitter::Node;
use log::debug;

use crate::framework::FrameworkSymbol;
use crate::project::{Project, PyModule};
use crate::python;
use crate::resolve::path::attribute_path;
use crate::resolve::{FunctionRef, NameResolver, Resolved};
use crate::{Error, Result};

const RESOLVE_FUEL: u8 = 8;

/// HTTP method decorators recognized on application and router objects.
const HTTP_METHODS: &[&str] = &[
    "get", "post", "put", "delete", "patch", "options", "head", "trace",
];

/// The located application object.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AppRef {
    pub module: String,
    pub attribute: String,
    pub title: String,
    pub version: String,
    pub description: Option<String>,
}

/// One registered route.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Route {
    pub path: String,
    /// Uppercase HTTP methods, as the framework stores them.
    pub methods: Vec<String>,
    pub include_in_schema: bool,
    pub handler: FunctionRef,
}

/// Find `attribute = FastAPI(...)` in the named module.
pub fn locate_app(project: &Project, module: &str, attribute: &str) -> Result<AppRef> {
    let Some(py_module) = project.module(module) else {
        return Err(Error::ModuleNotFound {
            module: module.to_owned(),
            root: project.root().to_owned(),
        });
    };

    let Some(value) = toplevel_assignment(&py_module, attribute) else {
        return Err(Error::AttributeNotFound {
            module: module.to_owned(),
            attribute: attribute.to_owned(),
        });
    };

    if value.kind() != "call" || !resolves_to_application(project, &py_module, value) {
        return Err(Error::NotAnApplication {
            module: module.to_owned(),
            attribute: attribute.to_owned(),
        });
    }

    let title = string_kwarg(&py_module, value, "title").unwrap_or_else(|| "FastAPI".to_owned());
    let version = string_kwarg(&py_module, value, "version").unwrap_or_else(|| "0.1.0".to_owned());
    let description = string_kwarg(&py_module, value, "description");

    Ok(AppRef {
        module: module.to_owned(),
        attribute: attribute.to_owned(),
        title,
        version,
        description,
    })
}

/// The right-hand side of a top-level `name = ...` binding.
fn toplevel_assignment<'m>(module: &'m PyModule, name: &str) -> Option<Node<'m>> {
    for statement in python::named_children(module.root()) {
        if statement.kind() != "expression_statement" {
            continue;
        }
        for child in python::named_children(statement) {
            if child.kind() != "assignment" {
                continue;
            }
            let Some(left) = child.child_by_field_name("left") else {
                continue;
            };
            if left.kind() != "identifier" || module.text(left) != name {
                continue;
            }
            if let Some(right) = child.child_by_field_name("right") {
                return Some(right);
            }
        }
    }
    None
}

/// Like [`toplevel_assignment`], but only call-expression bindings.
fn toplevel_assignment_call<'m>(module: &'m PyModule, name: &str) -> Option<Node<'m>> {
    toplevel_assignment(module, name).filter(|node| node.kind() == "call")
}

/// Whether a constructor call produces an application: either the
/// framework class itself or a user subclass of it.
fn resolves_to_application(project: &Project, module: &Rc<PyModule>, call: Node<'_>) -> bool {
    let Some(callee) = call.child_by_field_name("function") else {
        return false;
    };
    let Some(path) = attribute_path(callee, module.source()) else {
        return false;
    };
    let resolver = NameResolver::new(project);
    match resolver.resolve_in_module(module, &path, RESOLVE_FUEL) {
        Some(Resolved::Framework(FrameworkSymbol::Application)) => true,
        Some(Resolved::Class(class)) => resolver.lineage(&class).application,
        _ => false,
    }
}

fn string_kwarg(module: &PyModule, call: Node<'_>, name: &str) -> Option<String> {
    let arguments = call.child_by_field_name("arguments")?;
    for argument in python::named_children(arguments) {
        if argument.kind() != "keyword_argument" {
            continue;
        }
        let (Some(key), Some(value)) = (
            argument.child_by_field_name("name"),
            argument.child_by_field_name("value"),
        ) else {
            continue;
        };
        if module.text(key) == name {
            return python::string_literal(value, module.source());
        }
    }
    None
}

fn bool_kwarg(module: &PyModule, call: Node<'_>, name: &str) -> Option<bool> {
    let arguments = call.child_by_field_name("arguments")?;
    for argument in python::named_children(arguments) {
        if argument.kind() != "keyword_argument" {
            continue;
        }
        let (Some(key), Some(value)) = (
            argument.child_by_field_name("name"),
            argument.child_by_field_name("value"),
        ) else {
            continue;
        };
        if module.text(key) == name {
            return match value.kind() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            };
        }
    }
    None
}

fn first_string_arg(module: &PyModule, call: Node<'_>) -> Option<String> {
    let arguments = call.child_by_field_name("arguments")?;
    python::named_children(arguments)
        .into_iter()
        .find(|a| a.kind() != "keyword_argument" && a.kind() != "comment")
        .and_then(|a| python::string_literal(a, module.source()))
}

/// Collect the application's routes: decorated endpoints in the app's own
/// module plus routers pulled in through `include_router`.
///
/// Routes are returned in registration (document) order, which fixes the
/// output order of the whole pass.
pub fn discover_routes(project: &Project, app: &AppRef) -> Vec<Route> {
    let mut routes = Vec::new();
    let Some(module) = project.module(&app.module) else {
        return routes;
    };

    collect_decorated_routes(&module, &app.attribute, "", &mut routes);

    // app.include_router(router, prefix="...")
    for statement in python::named_children(module.root()) {
        if statement.kind() != "expression_statement" {
            continue;
        }
        for child in python::named_children(statement) {
            if child.kind() != "call" {
                continue;
            }
            let Some(callee) = child.child_by_field_name("function") else {
                continue;
            };
            let Some(path) = attribute_path(callee, module.source()) else {
                continue;
            };
            if path != format!("{}.include_router", app.attribute) {
                continue;
            }
            include_router(project, &module, child, &mut routes);
        }
    }

    routes
}

fn include_router(
    project: &Project,
    app_module: &Rc<PyModule>,
    call: Node<'_>,
    routes: &mut Vec<Route>,
) {
    let Some(arguments) = call.child_by_field_name("arguments") else {
        return;
    };
    let Some(router_arg) = python::named_children(arguments)
        .into_iter()
        .find(|a| a.kind() != "keyword_argument" && a.kind() != "comment")
    else {
        return;
    };
    let Some(router_path) = attribute_path(router_arg, app_module.source()) else {
        return;
    };
    let prefix = string_kwarg(app_module, call, "prefix").unwrap_or_default();

    // the router variable may live in this module or be imported
    let Some((router_module, router_name)) =
        locate_router(project, app_module, &router_path)
    else {
        debug!("could not locate router '{router_path}'");
        return;
    };

    // honor the router's own prefix kwarg
    let router_prefix = toplevel_assignment_call(&router_module, &router_name)
        .and_then(|c| string_kwarg(&router_module, c, "prefix"))
        .unwrap_or_default();

    collect_decorated_routes(
        &router_module,
        &router_name,
        &format!("{prefix}{router_prefix}"),
        routes,
    );
}

/// Resolve a router reference to its defining module and variable name.
fn locate_router(
    project: &Project,
    app_module: &Rc<PyModule>,
    router_path: &str,
) -> Option<(Rc<PyModule>, String)> {
    if !router_path.contains('.') {
        if toplevel_assignment_call(app_module, router_path).is_some() {
            return Some((Rc::clone(app_module), router_path.to_owned()));
        }
    }
    // expand the head through the module namespace, then split off the
    // defining module
    let (head, rest) = match router_path.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (router_path, None),
    };
    let expanded = match app_module.lookup_global(head) {
        Some(crate::project::GlobalBinding::Import(target)) => match rest {
            Some(rest) => format!("{target}.{rest}"),
            None => target.clone(),
        },
        _ => router_path.to_owned(),
    };
    let (module, remainder) = project.split_module_path(&expanded)?;
    match remainder.as_slice() {
        [name] => Some((module, name.clone())),
        _ => None,
    }
}

/// Scan a module for `@owner.<method>("/path")` decorated definitions.
fn collect_decorated_routes(
    module: &Rc<PyModule>,
    owner: &str,
    prefix: &str,
    routes: &mut Vec<Route>,
) {
    for statement in python::named_children(module.root()) {
        if statement.kind() != "decorated_definition" {
            continue;
        }
        let definition = python::unwrap_decorated(statement);
        if definition.kind() != "function_definition" {
            continue;
        }
        let Some(handler_name) = python::definition_name(definition, module.source()) else {
            continue;
        };

        for decorator in python::named_children(statement) {
            if decorator.kind() != "decorator" {
                continue;
            }
            let Some(call) = python::named_children(decorator)
                .into_iter()
                .find(|n| n.kind() == "call")
            else {
                continue;
            };
            let Some(callee) = call.child_by_field_name("function") else {
                continue;
            };
            let Some(path) = attribute_path(callee, module.source()) else {
                continue;
            };
            let Some((decorated_owner, method)) = path.rsplit_once('.') else {
                continue;
            };
            if decorated_owner != owner || !HTTP_METHODS.contains(&method) {
                continue;
            }

            let route_path = first_string_arg(module, call).unwrap_or_default();
            let include_in_schema =
                bool_kwarg(module, call, "include_in_schema").unwrap_or(true);

            routes.push(Route {
                path: format!("{prefix}{route_path}"),
                methods: vec![method.to_uppercase()],
                include_in_schema,
                handler: FunctionRef::new(module.name(), handler_name),
            });
        }
    }
}
