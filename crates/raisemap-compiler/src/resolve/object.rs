//! Resolution of dotted paths to objects of the analyzed program.

use std::rc::Rc;

use arborium_tree_sitter::Node;
use indexmap::{IndexMap, IndexSet};
use log::debug;

use crate::analyze::AssignmentMap;
use crate::framework::{self, FrameworkSymbol};
use crate::project::{GlobalBinding, Project, PyModule};
use crate::python::{self, Literal};
use crate::resolve::builtins::{is_builtin, is_builtin_exception};
use crate::resolve::path::annotation_path;
use crate::resolve::{Callable, ClassRef, ExceptionClass, FunctionRef, Resolved};

/// Lookup depth bound; chains of rebindings deeper than this are dropped.
const FUEL: u8 = 8;

/// The resolution view of a single user-defined callable.
///
/// Carries what the runtime would expose as `__globals__`, `__qualname__`,
/// and `__annotations__`: the defining module, the qualified name, and the
/// parameter annotation table (one layer of generic wrapping stripped).
pub struct FunctionCtx {
    pub module: Rc<PyModule>,
    pub qualname: String,
    pub annotations: IndexMap<String, String>,
}

impl FunctionCtx {
    /// Build the context from a function definition node.
    pub fn new(module: Rc<PyModule>, qualname: String, def_node: Node<'_>) -> Self {
        let mut annotations = IndexMap::new();
        if let Some(params) = def_node.child_by_field_name("parameters") {
            for param in python::named_children(params) {
                let (name_node, type_node) = match param.kind() {
                    "typed_parameter" => (
                        python::named_children(param)
                            .into_iter()
                            .find(|n| n.kind() == "identifier"),
                        param.child_by_field_name("type"),
                    ),
                    "typed_default_parameter" => (
                        param.child_by_field_name("name"),
                        param.child_by_field_name("type"),
                    ),
                    _ => (None, None),
                };
                if let (Some(name), Some(type_node)) = (name_node, type_node) {
                    if let Some(path) = annotation_path(type_node, module.source()) {
                        annotations.insert(module.text(name).to_owned(), path);
                    }
                }
            }
        }
        Self {
            module,
            qualname,
            annotations,
        }
    }

    /// The class enclosing this function, per its qualified name.
    pub fn enclosing_class(&self) -> Option<&str> {
        self.qualname.rsplit_once('.').map(|(prefix, _)| {
            prefix.rsplit_once('.').map_or(prefix, |(_, last)| last)
        })
    }
}

/// Exception lineage of a user class, derived from its base chains.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lineage {
    /// Reaches the framework HTTP exception root.
    pub http: bool,
    /// Reaches any exception root at all.
    pub exception: bool,
    /// Reaches the framework application class.
    pub application: bool,
}

/// Symbolic object resolution over the module index.
pub struct NameResolver<'p> {
    project: &'p Project,
}

impl<'p> NameResolver<'p> {
    pub fn new(project: &'p Project) -> Self {
        Self { project }
    }

    /// Resolve an absolute dotted path: framework symbols first, then the
    /// longest loadable module prefix followed by member lookup.
    pub fn resolve_dotted(&self, dotted: &str, fuel: u8) -> Option<Resolved> {
        if fuel == 0 {
            debug!("resolution fuel exhausted at '{dotted}'");
            return None;
        }
        if let Some(symbol) = framework::known_symbol(dotted) {
            return Some(Resolved::Framework(symbol));
        }
        let (module, rest) = self.project.split_module_path(dotted)?;
        if rest.is_empty() {
            return Some(Resolved::Module(module));
        }
        let rest: Vec<&str> = rest.iter().map(String::as_str).collect();
        self.member(&module, &rest, fuel)
    }

    /// Resolve a possibly-relative dotted path within a module namespace,
    /// falling back to the builtins for bare names.
    pub fn resolve_in_module(
        &self,
        module: &Rc<PyModule>,
        dotted: &str,
        fuel: u8,
    ) -> Option<Resolved> {
        let segments: Vec<&str> = dotted.split('.').collect();
        if let Some(resolved) = self.member(module, &segments, fuel) {
            return Some(resolved);
        }
        if segments.len() == 1 && is_builtin(segments[0]) {
            return Some(Resolved::Builtin(segments[0].to_owned()));
        }
        None
    }

    /// Member lookup: `rest` relative to `module`.
    fn member(&self, module: &Rc<PyModule>, rest: &[&str], fuel: u8) -> Option<Resolved> {
        if fuel == 0 {
            return None;
        }
        let Some((head, tail)) = rest.split_first() else {
            return Some(Resolved::Module(Rc::clone(module)));
        };

        match module.lookup_global(head) {
            Some(GlobalBinding::Import(target)) => {
                let full = join_path(target, tail);
                self.resolve_dotted(&full, fuel - 1)
            }
            Some(GlobalBinding::Assigned { symbolic, is_call }) => {
                let symbolic = symbolic.clone();
                let is_call = *is_call;
                let base = self.resolve_in_module(module, &symbolic, fuel - 1)?;
                match (base, tail.is_empty()) {
                    (Resolved::Class(c), true) => Some(if is_call {
                        Resolved::Instance(c)
                    } else {
                        Resolved::Class(c)
                    }),
                    (Resolved::Class(c) | Resolved::Instance(c), false) => {
                        self.class_member(&c, tail)
                    }
                    (other, true) => Some(other),
                    _ => None,
                }
            }
            Some(GlobalBinding::Def) | None => self.definition_member(module, head, tail),
        }
    }

    fn definition_member(
        &self,
        module: &Rc<PyModule>,
        head: &str,
        tail: &[&str],
    ) -> Option<Resolved> {
        if module.find_class(head).is_some() {
            let class = ClassRef::new(module.name(), head);
            return if tail.is_empty() {
                Some(Resolved::Class(class))
            } else {
                self.class_member(&class, tail)
            };
        }
        if module.find_function(head).is_some() {
            return if tail.is_empty() {
                Some(Resolved::Function(FunctionRef::new(module.name(), head)))
            } else {
                None
            };
        }
        None
    }

    /// A single method segment on a class; deeper chains do not resolve.
    fn class_member(&self, class: &ClassRef, tail: &[&str]) -> Option<Resolved> {
        let [method] = tail else { return None };
        let module = self.project.module(&class.module)?;
        if module.class_defines_method(&class.name, method) {
            Some(Resolved::Function(class.method(method)))
        } else {
            None
        }
    }

    /// Head resolution for a call or attribute site, in the unified order:
    /// module globals, assignment map, parameter annotations, builtins.
    fn resolve_head(
        &self,
        head: &str,
        ctx: &FunctionCtx,
        assignments: &AssignmentMap,
    ) -> Option<Resolved> {
        if let Some(resolved) = self.member(&ctx.module, &[head], FUEL) {
            return Some(resolved);
        }
        if let Some(symbolic) = assignments.get(head) {
            return self.resolve_in_module(&ctx.module, symbolic, FUEL);
        }
        if let Some(annotation) = ctx.annotations.get(head) {
            let resolved = self.resolve_in_module(&ctx.module, annotation, FUEL)?;
            // an annotated parameter names the type of a value
            return Some(match resolved {
                Resolved::Class(c) => Resolved::Instance(c),
                other => other,
            });
        }
        if is_builtin(head) {
            return Some(Resolved::Builtin(head.to_owned()));
        }
        None
    }

    /// A chain segment looked up on an already-resolved base.
    fn member_of(&self, base: &Resolved, segment: &str) -> Option<Resolved> {
        match base {
            Resolved::Module(m) => self.member(m, &[segment], FUEL),
            Resolved::Class(c) | Resolved::Instance(c) => self.class_member(c, &[segment]),
            _ => None,
        }
    }

    /// Resolve the callables reachable from a call site's dotted path.
    ///
    /// A bare name yields at most one callable. A dotted chain resolves its
    /// head and then looks every remaining segment up on that base, so a
    /// builder chain `Service().foo().bar()` contributes each method of
    /// `Service`. A `self.`/`cls.` head dispatches through the enclosing
    /// class's attribute annotations; plain methods of the own class are
    /// not followed.
    pub fn resolve_callables(
        &self,
        dotted: &str,
        ctx: &FunctionCtx,
        assignments: &AssignmentMap,
    ) -> Vec<Callable> {
        let segments: Vec<&str> = dotted.split('.').collect();
        let Some((head, tail)) = segments.split_first() else {
            return Vec::new();
        };

        if *head == "self" || *head == "cls" {
            return self.resolve_self_attribute(&segments, ctx);
        }

        let Some(base) = self.resolve_head(head, ctx, assignments) else {
            debug!(
                "could not resolve '{head}' in {}.{}",
                ctx.module.name(),
                ctx.qualname
            );
            return Vec::new();
        };

        if tail.is_empty() {
            return to_callable(base).into_iter().collect();
        }
        tail.iter()
            .filter_map(|segment| self.member_of(&base, segment))
            .filter_map(to_callable)
            .collect()
    }

    /// `self.attr.method()` where `attr` is a class-level annotation of the
    /// enclosing class. Contributes the attribute class's constructor plus
    /// each chained method.
    fn resolve_self_attribute(&self, segments: &[&str], ctx: &FunctionCtx) -> Vec<Callable> {
        let Some(class_name) = ctx.enclosing_class() else {
            return Vec::new();
        };
        let Some(property) = segments.get(1) else {
            return Vec::new();
        };
        let annotations = ctx.module.class_annotations(class_name);
        let Some(annotation) = annotations.get(*property) else {
            // a method of the own class, or an unannotated attribute
            return Vec::new();
        };
        let Some(Resolved::Class(attr_class) | Resolved::Instance(attr_class)) =
            self.resolve_in_module(&ctx.module, annotation, FUEL)
        else {
            debug!(
                "could not resolve attribute class '{annotation}' for {}.{}",
                ctx.module.name(),
                class_name
            );
            return Vec::new();
        };

        let mut callables = vec![Callable::Function(attr_class.method("__init__"))];
        for segment in &segments[2..] {
            if let Some(Resolved::Function(f)) = self.class_member(&attr_class, &[*segment]) {
                callables.push(Callable::Function(f));
            }
        }
        callables
    }

    /// Resolve a raise site's symbolic name to an exception class.
    ///
    /// Consults the module namespace and builtins only; local assignments
    /// were already substituted during name extraction. Accepts classes
    /// whose base chain reaches an exception root; everything else is null.
    pub fn resolve_exception(&self, symbol: &str, ctx: &FunctionCtx) -> Option<ExceptionClass> {
        match self.resolve_in_module(&ctx.module, symbol, FUEL)? {
            Resolved::Framework(FrameworkSymbol::HttpException) => Some(ExceptionClass::Root),
            Resolved::Class(class) | Resolved::Instance(class) => {
                if self.lineage(&class).exception {
                    Some(ExceptionClass::User(class))
                } else {
                    None
                }
            }
            Resolved::Builtin(name) if is_builtin_exception(&name) => {
                Some(ExceptionClass::Builtin(name))
            }
            _ => None,
        }
    }

    /// Whether a raise site's class maps to an HTTP error response.
    pub fn is_http_exception(&self, class: &ExceptionClass) -> bool {
        match class {
            ExceptionClass::Root => true,
            ExceptionClass::User(c) => self.lineage(c).http,
            ExceptionClass::Builtin(_) => false,
        }
    }

    /// Walk a class's base chains and classify what they reach.
    pub fn lineage(&self, class: &ClassRef) -> Lineage {
        let mut lineage = Lineage::default();
        let mut visited: IndexSet<ClassRef> = IndexSet::new();
        let mut stack = vec![class.clone()];

        while let Some(current) = stack.pop() {
            if !visited.insert(current.clone()) {
                continue;
            }
            let Some(module) = self.project.module(&current.module) else {
                continue;
            };
            for base_path in module.class_bases(&current.name) {
                match self.resolve_in_module(&module, &base_path, FUEL) {
                    Some(Resolved::Framework(FrameworkSymbol::HttpException)) => {
                        lineage.http = true;
                        lineage.exception = true;
                    }
                    Some(Resolved::Framework(FrameworkSymbol::Application)) => {
                        lineage.application = true;
                    }
                    Some(Resolved::Builtin(name)) if is_builtin_exception(&name) => {
                        lineage.exception = true;
                    }
                    Some(Resolved::Class(base)) => stack.push(base),
                    _ => {}
                }
            }
        }
        lineage
    }

    /// The effective literal value of a class attribute, searching the
    /// class body first and then its user base classes, depth-first.
    pub fn effective_class_attr(&self, class: &ClassRef, attr: &str) -> Option<Literal> {
        let mut visited: IndexSet<ClassRef> = IndexSet::new();
        self.class_attr_recursive(class, attr, &mut visited)
    }

    fn class_attr_recursive(
        &self,
        class: &ClassRef,
        attr: &str,
        visited: &mut IndexSet<ClassRef>,
    ) -> Option<Literal> {
        if !visited.insert(class.clone()) {
            return None;
        }
        let module = self.project.module(&class.module)?;
        if let Some(literal) = module.class_attr_literal(&class.name, attr) {
            return Some(literal);
        }
        for base_path in module.class_bases(&class.name) {
            if let Some(Resolved::Class(base)) = self.resolve_in_module(&module, &base_path, FUEL)
            {
                if let Some(literal) = self.class_attr_recursive(&base, attr, visited) {
                    return Some(literal);
                }
            }
        }
        None
    }

    /// Structural detection of a precomputed-schema method on the class or
    /// any user ancestor.
    pub fn has_schema_method(&self, class: &ClassRef) -> bool {
        let mut visited: IndexSet<ClassRef> = IndexSet::new();
        let mut stack = vec![class.clone()];
        while let Some(current) = stack.pop() {
            if !visited.insert(current.clone()) {
                continue;
            }
            let Some(module) = self.project.module(&current.module) else {
                continue;
            };
            if module.class_defines_method(&current.name, "get_json_schema") {
                return true;
            }
            for base_path in module.class_bases(&current.name) {
                if let Some(Resolved::Class(base)) =
                    self.resolve_in_module(&module, &base_path, FUEL)
                {
                    stack.push(base);
                }
            }
        }
        false
    }
}

fn to_callable(resolved: Resolved) -> Option<Callable> {
    match resolved {
        Resolved::Function(f) => Some(Callable::Function(f)),
        Resolved::Class(c) => Some(Callable::Class(c)),
        Resolved::Instance(c) => Some(Callable::Instance(c)),
        _ => None,
    }
}

fn join_path(base: &str, tail: &[&str]) -> String {
    if tail.is_empty() {
        base.to_owned()
    } else {
        format!("{base}.{}", tail.join("."))
    }
}
