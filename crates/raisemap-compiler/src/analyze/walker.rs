//! Call-graph orchestration and the per-pass visited table.

use indexmap::IndexMap;
use log::debug;

use crate::analyze::finder::{ExceptionFinder, RaiseSite};
use crate::project::Project;
use crate::resolve::{Callable, ClassRef, FunctionCtx, FunctionRef};

/// Identity of a callable in the source program.
type FunctionKey = (String, String);

/// Recurses through the call graph, memoizing each callable's raise sites.
///
/// The table is seeded with an empty entry before a function's body is
/// descended into, so mutually recursive user code terminates: a re-entrant
/// hit observes the in-progress entry and contributes nothing. The table
/// lives for exactly one pass.
pub struct CallGraphWalker<'p> {
    project: &'p Project,
    visited: IndexMap<FunctionKey, Vec<RaiseSite>>,
}

impl<'p> CallGraphWalker<'p> {
    pub fn new(project: &'p Project) -> Self {
        Self {
            project,
            visited: IndexMap::new(),
        }
    }

    pub fn project(&self) -> &'p Project {
        self.project
    }

    /// All raise sites reachable from a callable.
    pub fn raise_sites(&mut self, callable: &Callable) -> Vec<RaiseSite> {
        match callable {
            Callable::Function(func) => self.function_sites(func),
            Callable::Class(class) | Callable::Instance(class) => self.class_sites(class),
        }
    }

    /// Constructing or calling a class analyzes both `__init__` and
    /// `__call__`; either may be what the call site actually invoked.
    fn class_sites(&mut self, class: &ClassRef) -> Vec<RaiseSite> {
        if !self.project.should_visit(&class.module) {
            return Vec::new();
        }
        let mut sites = self.function_sites(&class.method("__init__"));
        sites.extend(self.function_sites(&class.method("__call__")));
        sites
    }

    fn function_sites(&mut self, func: &FunctionRef) -> Vec<RaiseSite> {
        if !self.project.should_visit(&func.module) {
            return Vec::new();
        }
        let key = (func.module.clone(), func.qualname.clone());
        if let Some(sites) = self.visited.get(&key) {
            return sites.clone();
        }
        self.visited.insert(key.clone(), Vec::new());
        let sites = self.analyze(func);
        self.visited.insert(key, sites.clone());
        sites
    }

    fn analyze(&mut self, func: &FunctionRef) -> Vec<RaiseSite> {
        let Some(module) = self.project.module(&func.module) else {
            return Vec::new();
        };
        let Some(node) = module.find_function(&func.qualname) else {
            debug!(
                "function '{}' not found in module '{}'",
                func.qualname, func.module
            );
            return Vec::new();
        };
        let ctx = FunctionCtx::new(module.clone(), func.qualname.clone(), node);
        let mut finder = ExceptionFinder::new(self, ctx);
        finder.visit(node);
        finder.into_sites()
    }

    /// Number of callables analyzed so far in this pass.
    pub fn analyzed_count(&self) -> usize {
        self.visited.len()
    }

    /// Drop the visited table; subsequent passes see fresh resolution.
    pub fn clear(&mut self) {
        self.visited.clear();
    }
}
