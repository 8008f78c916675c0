//! Shared helpers for compiler tests.

use arborium_tree_sitter::{Node, Tree};
use tempfile::TempDir;

use crate::project::{Project, ScanScope};
use crate::python;

/// A throwaway on-disk project tree.
pub struct TestProject {
    dir: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    /// Write a module file, creating parent packages as needed.
    pub fn write(&self, relative: &str, source: &str) -> &Self {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create package dir");
        }
        std::fs::write(path, source).expect("write module");
        self
    }

    /// A project rooted here with a single scope prefix (plus the
    /// framework package).
    pub fn project(&self, scope: &str) -> Project {
        Project::new(self.dir.path(), ScanScope::single(scope).with_framework())
    }

    pub fn project_with_scope(&self, scope: ScanScope) -> Project {
        Project::new(self.dir.path(), scope)
    }
}

/// Parse a source snippet.
pub fn parse(source: &str) -> Tree {
    python::parse(source)
}

/// First node of the given kind, pre-order.
pub fn find_kind<'t>(root: Node<'t>, kind: &str) -> Option<Node<'t>> {
    python::descendants(root).into_iter().find(|n| n.kind() == kind)
}
