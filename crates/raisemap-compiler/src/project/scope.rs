//! Scan scope and standard-library filtering.
//!
//! A module is entered only when it is user code: `__main__`, or any module
//! whose dotted name matches a configured scope prefix, provided it is not
//! part of the standard library. Third-party packages that happen to match
//! a scope prefix are in scope; users can name their own package.

use std::cell::RefCell;

use indexmap::{IndexMap, IndexSet};

use crate::{Error, Result};

/// Standard-library top-level module names.
///
/// The symbolic stand-in for checking whether a module's source file lives
/// under the interpreter's stdlib path.
const STDLIB_MODULES: &[&str] = &[
    "abc", "argparse", "array", "ast", "asyncio", "base64", "binascii", "bisect", "builtins",
    "calendar", "collections", "concurrent", "contextlib", "contextvars", "copy", "csv",
    "ctypes", "dataclasses", "datetime", "decimal", "difflib", "dis", "email", "enum", "errno",
    "fnmatch", "fractions", "functools", "gc", "getpass", "glob", "gzip", "hashlib", "heapq",
    "hmac", "html", "http", "importlib", "inspect", "io", "ipaddress", "itertools", "json",
    "keyword", "linecache", "locale", "logging", "math", "mimetypes", "multiprocessing",
    "numbers", "operator", "os", "pathlib", "pickle", "platform", "posixpath", "pprint",
    "queue", "random", "re", "secrets", "select", "shlex", "shutil", "signal", "site",
    "socket", "sqlite3", "ssl", "stat", "statistics", "string", "struct", "subprocess",
    "sys", "sysconfig", "tempfile", "textwrap", "threading", "time", "token", "tokenize",
    "traceback", "types", "typing", "unicodedata", "unittest", "urllib", "uuid", "warnings",
    "weakref", "xml", "zipfile", "zlib",
];

/// Whether a dotted module name belongs to the standard library.
pub fn is_stdlib(module: &str) -> bool {
    let top = module.split('.').next().unwrap_or(module);
    STDLIB_MODULES.contains(&top)
}

/// An ordered set of module-name prefixes designating user code.
///
/// Fixed for the duration of a pass.
#[derive(Debug, Clone)]
pub struct ScanScope {
    prefixes: IndexSet<String>,
}

impl ScanScope {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn single(prefix: impl Into<String>) -> Self {
        Self::new([prefix.into()])
    }

    /// Append the framework package so its public symbols resolve.
    pub fn with_framework(mut self) -> Self {
        self.prefixes.insert("fastapi".to_owned());
        self
    }

    /// Derive a scope from the module that defines the application.
    ///
    /// Fails when the application lives in `__main__` (or the name is
    /// empty): there is no top-level package to scan, and the caller must
    /// provide the scope explicitly.
    pub fn infer(app_module: &str) -> Result<Self> {
        let top = app_module.split('.').next().unwrap_or("");
        if top.is_empty() || top == "__main__" {
            return Err(Error::ScopeInference);
        }
        Ok(Self::single(top).with_framework())
    }

    /// Whether a dotted module name matches the scope.
    ///
    /// `__main__` always matches. A name without dots is matched as
    /// `name.` so that `tests` matches the prefix `tests`.
    pub fn matches(&self, module: &str) -> bool {
        if module == "__main__" {
            return true;
        }
        let candidate = if module.contains('.') {
            module.to_owned()
        } else {
            format!("{module}.")
        };
        self.prefixes.iter().any(|p| candidate.starts_with(p))
    }

    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.prefixes.iter().map(String::as_str)
    }
}

/// Caching filter deciding whether a module should be descended into.
#[derive(Debug)]
pub struct ModuleFilter {
    scope: ScanScope,
    cache: RefCell<IndexMap<String, bool>>,
}

impl ModuleFilter {
    pub fn new(scope: ScanScope) -> Self {
        Self {
            scope,
            cache: RefCell::new(IndexMap::new()),
        }
    }

    pub fn scope(&self) -> &ScanScope {
        &self.scope
    }

    /// Whether `module` is in scope for analysis. Cached per name.
    pub fn should_visit(&self, module: &str) -> bool {
        if let Some(cached) = self.cache.borrow().get(module) {
            return *cached;
        }
        let result = !is_stdlib(module) && self.scope.matches(module);
        self.cache.borrow_mut().insert(module.to_owned(), result);
        result
    }
}
