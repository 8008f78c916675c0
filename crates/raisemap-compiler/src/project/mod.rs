//! The on-disk module index.
//!
//! Replaces the runtime import system: a dotted module name is located as a
//! file under the project root, parsed on demand, and cached for the
//! duration of a pass. Scope filtering decides which modules the analysis
//! may descend into.

mod module;
mod scope;

#[cfg(test)]
mod module_tests;
#[cfg(test)]
mod scope_tests;

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use indexmap::IndexMap;
use log::{debug, info};

pub use module::{GlobalBinding, PyModule};
pub use scope::{ModuleFilter, ScanScope, is_stdlib};

/// A scan root plus the per-pass module cache.
pub struct Project {
    root: PathBuf,
    filter: ModuleFilter,
    modules: RefCell<IndexMap<String, Option<Rc<PyModule>>>>,
}

impl Project {
    pub fn new(root: impl Into<PathBuf>, scope: ScanScope) -> Self {
        Self {
            root: root.into(),
            filter: ModuleFilter::new(scope),
            modules: RefCell::new(IndexMap::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn scope(&self) -> &ScanScope {
        self.filter.scope()
    }

    /// Whether the analysis may descend into the named module.
    pub fn should_visit(&self, module: &str) -> bool {
        self.filter.should_visit(module)
    }

    /// Load (or fetch from the pass cache) the named module.
    pub fn module(&self, name: &str) -> Option<Rc<PyModule>> {
        if let Some(cached) = self.modules.borrow().get(name) {
            return cached.clone();
        }
        let loaded = self.load(name);
        self.modules
            .borrow_mut()
            .insert(name.to_owned(), loaded.clone());
        loaded
    }

    fn load(&self, name: &str) -> Option<Rc<PyModule>> {
        let Some(path) = self.locate(name) else {
            debug!("no source file for module '{name}' under {}", self.root.display());
            return None;
        };
        let source = match std::fs::read_to_string(&path) {
            Ok(source) => source,
            Err(err) => {
                info!("failed to read source for module '{name}' ({}): {err}", path.display());
                return None;
            }
        };
        PyModule::parse(name, &path, source).map(Rc::new)
    }

    fn locate(&self, name: &str) -> Option<PathBuf> {
        let relative: PathBuf = name.split('.').collect();
        let file = self.root.join(&relative).with_extension("py");
        if file.is_file() {
            return Some(file);
        }
        let package = self.root.join(&relative).join("__init__.py");
        if package.is_file() {
            return Some(package);
        }
        None
    }

    /// Split a dotted path into its longest loadable module prefix and the
    /// remaining attribute segments.
    pub fn split_module_path(&self, dotted: &str) -> Option<(Rc<PyModule>, Vec<String>)> {
        let segments: Vec<&str> = dotted.split('.').collect();
        for end in (1..=segments.len()).rev() {
            let prefix = segments[..end].join(".");
            if let Some(module) = self.module(&prefix) {
                let rest = segments[end..].iter().map(|s| (*s).to_owned()).collect();
                return Some((module, rest));
            }
        }
        None
    }
}
