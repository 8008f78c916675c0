//! A parsed Python module and its symbolic namespace.
//!
//! The module-level namespace (imports, definitions, assignments) stands in
//! for the runtime `__globals__` of every function the module defines.
//! Lookups walk the tree on demand; nothing is evaluated.

use std::cell::OnceCell;
use std::path::{Path, PathBuf};

use arborium_tree_sitter::{Node, Tree};
use indexmap::IndexMap;
use log::{debug, info};

use crate::python::{self, Literal};
use crate::resolve::path::{annotation_path, attribute_path, symbolic_target};

/// What a top-level name is bound to.
#[derive(Debug, Clone, PartialEq)]
pub enum GlobalBinding {
    /// Imported name; the value is the absolute dotted target.
    Import(String),
    /// Function or class defined in this module.
    Def,
    /// Module-level assignment with a symbolic right-hand side.
    Assigned { symbolic: String, is_call: bool },
}

/// A parsed user module.
pub struct PyModule {
    name: String,
    path: PathBuf,
    source: String,
    tree: Tree,
    globals: OnceCell<IndexMap<String, GlobalBinding>>,
}

impl PyModule {
    /// Parse a module; `None` (with an info-level diagnostic) when the
    /// source does not parse cleanly.
    pub fn parse(name: &str, path: &Path, source: String) -> Option<Self> {
        let tree = python::parse(&source);
        if tree.root_node().has_error() {
            info!("failed to parse source for module '{name}' ({})", path.display());
            return None;
        }
        Some(Self {
            name: name.to_owned(),
            path: path.to_owned(),
            source,
            tree,
            globals: OnceCell::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    pub fn text(&self, node: Node<'_>) -> &str {
        python::text(node, &self.source)
    }

    fn is_package(&self) -> bool {
        self.path.file_name().is_some_and(|f| f == "__init__.py")
    }

    /// Look up a top-level name in this module's namespace.
    pub fn lookup_global(&self, name: &str) -> Option<&GlobalBinding> {
        self.globals().get(name)
    }

    fn globals(&self) -> &IndexMap<String, GlobalBinding> {
        self.globals.get_or_init(|| self.build_globals())
    }

    fn build_globals(&self) -> IndexMap<String, GlobalBinding> {
        let mut table = IndexMap::new();
        for statement in python::named_children(self.root()) {
            match statement.kind() {
                "import_statement" => self.collect_import(statement, &mut table),
                "import_from_statement" => self.collect_import_from(statement, &mut table),
                "function_definition" | "class_definition" => {
                    if let Some(name) = python::definition_name(statement, &self.source) {
                        table.insert(name.to_owned(), GlobalBinding::Def);
                    }
                }
                "decorated_definition" => {
                    let def = python::unwrap_decorated(statement);
                    if let Some(name) = python::definition_name(def, &self.source) {
                        table.insert(name.to_owned(), GlobalBinding::Def);
                    }
                }
                "expression_statement" => {
                    for child in python::named_children(statement) {
                        if child.kind() == "assignment" {
                            self.collect_assignment(child, &mut table);
                        }
                    }
                }
                _ => {}
            }
        }
        table
    }

    fn collect_import(&self, statement: Node<'_>, table: &mut IndexMap<String, GlobalBinding>) {
        for name in python::children_by_field(statement, "name") {
            match name.kind() {
                "dotted_name" => {
                    // `import a.b` binds `a` to the package `a`
                    let dotted = self.text(name);
                    if let Some(first) = dotted.split('.').next() {
                        table.insert(first.to_owned(), GlobalBinding::Import(first.to_owned()));
                    }
                }
                "aliased_import" => {
                    let target = name.child_by_field_name("name").map(|n| self.text(n));
                    let alias = name.child_by_field_name("alias").map(|n| self.text(n));
                    if let (Some(target), Some(alias)) = (target, alias) {
                        table.insert(alias.to_owned(), GlobalBinding::Import(target.to_owned()));
                    }
                }
                _ => {}
            }
        }
    }

    fn collect_import_from(&self, statement: Node<'_>, table: &mut IndexMap<String, GlobalBinding>) {
        let Some(base) = statement
            .child_by_field_name("module_name")
            .and_then(|m| self.import_base(m))
        else {
            return;
        };
        for name in python::children_by_field(statement, "name") {
            match name.kind() {
                "dotted_name" => {
                    let imported = self.text(name);
                    table.insert(
                        imported.to_owned(),
                        GlobalBinding::Import(format!("{base}.{imported}")),
                    );
                }
                "aliased_import" => {
                    let target = name.child_by_field_name("name").map(|n| self.text(n));
                    let alias = name.child_by_field_name("alias").map(|n| self.text(n));
                    if let (Some(target), Some(alias)) = (target, alias) {
                        table.insert(
                            alias.to_owned(),
                            GlobalBinding::Import(format!("{base}.{target}")),
                        );
                    }
                }
                "wildcard_import" => {
                    debug!("wildcard import from '{base}' in '{}' is not tracked", self.name);
                }
                _ => {}
            }
        }
    }

    /// Absolute dotted base of an import source, resolving relative dots
    /// against this module's package.
    fn import_base(&self, module_name: Node<'_>) -> Option<String> {
        match module_name.kind() {
            "dotted_name" => Some(self.text(module_name).to_owned()),
            "relative_import" => {
                let text = self.text(module_name);
                let level = text.chars().take_while(|c| *c == '.').count();
                let suffix = text.trim_start_matches('.');

                let mut parts: Vec<&str> = self.name.split('.').collect();
                if !self.is_package() {
                    parts.pop();
                }
                for _ in 1..level {
                    parts.pop()?;
                }
                let mut base = parts.join(".");
                if base.is_empty() {
                    return None;
                }
                if !suffix.is_empty() {
                    base = format!("{base}.{suffix}");
                }
                Some(base)
            }
            _ => None,
        }
    }

    fn collect_assignment(&self, assignment: Node<'_>, table: &mut IndexMap<String, GlobalBinding>) {
        let Some(left) = assignment.child_by_field_name("left") else {
            return;
        };
        if left.kind() != "identifier" {
            return;
        }
        let Some(right) = assignment.child_by_field_name("right") else {
            return;
        };
        if let Some(symbolic) = symbolic_target(right, &self.source) {
            table.insert(
                self.text(left).to_owned(),
                GlobalBinding::Assigned {
                    symbolic,
                    is_call: right.kind() == "call",
                },
            );
        }
    }

    /// Find a function definition by qualified name.
    ///
    /// A bare name matches the first function definition anywhere in the
    /// module, in document order; `Class.method` looks the method up in the
    /// class body.
    pub fn find_function(&self, qualname: &str) -> Option<Node<'_>> {
        match qualname.rsplit_once('.') {
            None => python::find_function(self.root(), &self.source, qualname),
            Some((class_name, method)) => {
                let class_node = self.find_class(class_name)?;
                python::find_method(class_node, &self.source, method)
            }
        }
    }

    /// Find a class definition by name.
    pub fn find_class(&self, name: &str) -> Option<Node<'_>> {
        python::find_class(self.root(), &self.source, name)
    }

    /// Class-level annotations (`attr: Type`), one layer of generic
    /// wrapping stripped.
    pub fn class_annotations(&self, class_name: &str) -> IndexMap<String, String> {
        let mut annotations = IndexMap::new();
        let Some(class_node) = self.find_class(class_name) else {
            return annotations;
        };
        let Some(body) = class_node.child_by_field_name("body") else {
            return annotations;
        };
        for statement in python::named_children(body) {
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
                let Some(type_node) = child.child_by_field_name("type") else {
                    continue;
                };
                if left.kind() != "identifier" {
                    continue;
                }
                if let Some(path) = annotation_path(type_node, &self.source) {
                    annotations.insert(self.text(left).to_owned(), path);
                }
            }
        }
        annotations
    }

    /// Attribute paths of a class's direct bases.
    pub fn class_bases(&self, class_name: &str) -> Vec<String> {
        let Some(class_node) = self.find_class(class_name) else {
            return Vec::new();
        };
        let Some(superclasses) = class_node.child_by_field_name("superclasses") else {
            return Vec::new();
        };
        python::named_children(superclasses)
            .into_iter()
            .filter(|n| n.kind() != "keyword_argument")
            .filter_map(|n| attribute_path(n, &self.source))
            .collect()
    }

    /// A literal class attribute (`status_code = 500`) declared directly in
    /// the class body.
    pub fn class_attr_literal(&self, class_name: &str, attr: &str) -> Option<Literal> {
        let class_node = self.find_class(class_name)?;
        let body = class_node.child_by_field_name("body")?;
        for statement in python::named_children(body) {
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
                if left.kind() != "identifier" || self.text(left) != attr {
                    continue;
                }
                let Some(right) = child.child_by_field_name("right") else {
                    continue;
                };
                return python::literal(right, &self.source);
            }
        }
        None
    }

    /// Whether the class body defines the named method.
    pub fn class_defines_method(&self, class_name: &str, method: &str) -> bool {
        self.find_class(class_name)
            .and_then(|c| python::find_method(c, &self.source, method))
            .is_some()
    }

    /// Smallest named node spanning the given byte range.
    pub fn node_at(&self, start: usize, end: usize) -> Option<Node<'_>> {
        self.root().named_descendant_for_byte_range(start, end)
    }
}

impl std::fmt::Debug for PyModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PyModule")
            .field("name", &self.name)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}
