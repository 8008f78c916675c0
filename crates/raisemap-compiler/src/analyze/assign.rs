//! Per-function assignment tracking.
//!
//! Maps a local name to the symbolic name it was most recently bound to,
//! so a later `raise exc` or `exc.method()` can be resolved. Only bindings
//! whose right-hand side has a symbolic name (a name, a call of a name, an
//! attribute chain, or an `await` of one of those) are recorded; everything
//! else is dropped. Scope is a single function body, with no flow
//! sensitivity beyond document order.

use arborium_tree_sitter::Node;
use indexmap::IndexMap;

use crate::python;
use crate::resolve::path::symbolic_target;

#[derive(Debug, Default)]
pub struct AssignmentMap {
    bindings: IndexMap<String, String>,
}

impl AssignmentMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an `assignment` node. Rebinding the same name overwrites.
    pub fn record(&mut self, assignment: Node<'_>, source: &str) {
        let Some(left) = assignment.child_by_field_name("left") else {
            return;
        };
        if left.kind() != "identifier" {
            // tuple targets and attribute targets carry no single symbol
            return;
        }
        let Some(right) = assignment.child_by_field_name("right") else {
            return;
        };
        if let Some(symbolic) = self.symbolic(right, source) {
            self.bindings
                .insert(python::text(left, source).to_owned(), symbolic);
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.bindings.get(name).map(String::as_str)
    }

    /// The symbolic name of an expression, with bare names substituted
    /// through the map.
    pub fn symbolic(&self, node: Node<'_>, source: &str) -> Option<String> {
        let raw = symbolic_target(node, source)?;
        if !raw.contains('.') {
            if let Some(bound) = self.get(&raw) {
                return Some(bound.to_owned());
            }
        }
        Some(raw)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
