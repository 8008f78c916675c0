//! The per-function raise-site visitor.

use std::rc::Rc;

use arborium_tree_sitter::Node;
use log::debug;

use crate::analyze::AssignmentMap;
use crate::analyze::walker::CallGraphWalker;
use crate::project::PyModule;
use crate::python;
use crate::resolve::path::attribute_path;
use crate::resolve::{Callable, ExceptionClass, FunctionCtx, FunctionRef, NameResolver, Resolved};

const RESOLVE_FUEL: u8 = 8;

/// A syntactic location that propagates an exception.
///
/// The raise node is identified by its byte range and re-located on demand;
/// `class` is `None` when the raised expression could not be resolved to a
/// concrete exception class. Such sites are carried but produce no schema.
#[derive(Debug, Clone)]
pub struct RaiseSite {
    pub class: Option<ExceptionClass>,
    /// The function whose body contains the raise.
    pub function: FunctionRef,
    pub module: Rc<PyModule>,
    pub start: usize,
    pub end: usize,
}

impl RaiseSite {
    /// Re-locate the `raise_statement` node in the defining module.
    pub fn raise_node(&self) -> Option<Node<'_>> {
        self.module
            .node_at(self.start, self.end)
            .filter(|n| n.kind() == "raise_statement")
    }
}

/// Walks one function body, collecting raise sites and dispatching call
/// sites to the walker. Ephemeral: one finder per analyzed function.
pub struct ExceptionFinder<'w, 'p> {
    walker: &'w mut CallGraphWalker<'p>,
    ctx: FunctionCtx,
    assignments: AssignmentMap,
    sites: Vec<RaiseSite>,
}

impl<'w, 'p> ExceptionFinder<'w, 'p> {
    pub fn new(walker: &'w mut CallGraphWalker<'p>, ctx: FunctionCtx) -> Self {
        debug!("analyzing {}.{}", ctx.module.name(), ctx.qualname);
        Self {
            walker,
            ctx,
            assignments: AssignmentMap::new(),
            sites: Vec::new(),
        }
    }

    pub fn into_sites(self) -> Vec<RaiseSite> {
        self.sites
    }

    /// Pre-order walk in document order. Assignments update the map as
    /// they are encountered, so later nodes see the latest binding.
    pub fn visit(&mut self, node: Node<'_>) {
        match node.kind() {
            // deliberately not traversed
            "decorator" => return,
            "assignment" => {
                self.assignments.record(node, self.ctx.module.source());
            }
            "raise_statement" => {
                self.visit_raise(node);
            }
            "call" => {
                self.visit_call(node);
            }
            "attribute" => {
                if !python::is_call_callee(node) {
                    self.visit_attribute(node);
                }
            }
            _ => {}
        }
        for child in python::named_children(node) {
            self.visit(child);
        }
    }

    fn visit_raise(&mut self, node: Node<'_>) {
        let Some(exception) = python::raise_exception(node) else {
            debug!(
                "bare re-raise in {}.{}; the propagated exception is unknown",
                self.ctx.module.name(),
                self.ctx.qualname
            );
            self.push_site(None, node);
            return;
        };

        let Some(symbol) = self.assignments.symbolic(exception, self.ctx.module.source()) else {
            debug!(
                "failed to extract exception name in {}.{}",
                self.ctx.module.name(),
                self.ctx.qualname
            );
            self.push_site(None, node);
            return;
        };

        let resolver = NameResolver::new(self.walker.project());
        let class = resolver.resolve_exception(&symbol, &self.ctx);
        self.push_site(class, node);
    }

    fn push_site(&mut self, class: Option<ExceptionClass>, raise_node: Node<'_>) {
        self.sites.push(RaiseSite {
            class,
            function: FunctionRef::new(self.ctx.module.name(), self.ctx.qualname.clone()),
            module: Rc::clone(&self.ctx.module),
            start: raise_node.start_byte(),
            end: raise_node.end_byte(),
        });
    }

    fn visit_call(&mut self, node: Node<'_>) {
        let Some(callee) = node.child_by_field_name("function") else {
            return;
        };
        let source = self.ctx.module.source();
        let chain = match callee.kind() {
            "identifier" => Some(python::text(callee, source).to_owned()),
            "attribute" => {
                let chain = attribute_path(callee, source);
                if chain.is_none() {
                    debug!(
                        "failed to reconstruct callee path in {}.{}",
                        self.ctx.module.name(),
                        self.ctx.qualname
                    );
                }
                chain
            }
            _ => None,
        };
        let Some(chain) = chain else { return };

        let resolver = NameResolver::new(self.walker.project());
        let callables = resolver.resolve_callables(&chain, &self.ctx, &self.assignments);
        for callable in callables {
            let sites = self.walker.raise_sites(&callable);
            self.sites.extend(sites);
        }
    }

    /// `x.method` used as a value (for example, passed as a dependency):
    /// when `x` was assigned something that resolves to a class, the
    /// attribute is analyzed as a method of that class.
    fn visit_attribute(&mut self, node: Node<'_>) {
        let (Some(object), Some(attr)) = (
            node.child_by_field_name("object"),
            node.child_by_field_name("attribute"),
        ) else {
            return;
        };
        if object.kind() != "identifier" {
            return;
        }
        let source = self.ctx.module.source();
        let Some(symbol) = self.assignments.get(python::text(object, source)) else {
            return;
        };
        let symbol = symbol.to_owned();

        let resolver = NameResolver::new(self.walker.project());
        let Some(Resolved::Class(class) | Resolved::Instance(class)) =
            resolver.resolve_in_module(&self.ctx.module, &symbol, RESOLVE_FUEL)
        else {
            return;
        };
        let method = python::text(attr, source);
        let module = match self.walker.project().module(&class.module) {
            Some(module) => module,
            None => return,
        };
        if module.class_defines_method(&class.name, method) {
            let callable = Callable::Function(class.method(method));
            let sites = self.walker.raise_sites(&callable);
            self.sites.extend(sites);
        }
    }
}
