//! Symbolic name resolution.
//!
//! The unified lookup path behind the finder: dotted attribute paths are
//! reconstructed from expression nodes and resolved through a function's
//! module namespace, its assignment map, its parameter annotations, and the
//! builtins - in that order. Nothing is evaluated; a name either resolves
//! to a known kind of object or the caller moves on.

pub mod builtins;
pub mod path;

mod object;


use std::rc::Rc;

use crate::framework::FrameworkSymbol;
use crate::project::PyModule;

pub use object::{FunctionCtx, Lineage, NameResolver};

/// A user-defined callable, identified by module and qualified name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
pub struct FunctionRef {
    pub module: String,
    pub qualname: String,
}

impl FunctionRef {
    pub fn new(module: impl Into<String>, qualname: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            qualname: qualname.into(),
        }
    }
}

/// A user-defined class, identified by module and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
pub struct ClassRef {
    pub module: String,
    pub name: String,
}

impl ClassRef {
    pub fn new(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            name: name.into(),
        }
    }

    pub fn method(&self, name: &str) -> FunctionRef {
        FunctionRef::new(&self.module, format!("{}.{name}", self.name))
    }
}

/// What a dotted path resolved to.
#[derive(Debug, Clone)]
pub enum Resolved {
    Module(Rc<PyModule>),
    Function(FunctionRef),
    Class(ClassRef),
    /// A value known to be an instance of a user class.
    Instance(ClassRef),
    Framework(FrameworkSymbol),
    Builtin(String),
}

/// A callable the walker can descend into.
///
/// The sum the call graph dispatches over: a plain function or method, a
/// class (construct or call), or a callable instance of a user class.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Callable {
    Function(FunctionRef),
    Class(ClassRef),
    Instance(ClassRef),
}

impl Callable {
    pub fn module(&self) -> &str {
        match self {
            Callable::Function(f) => &f.module,
            Callable::Class(c) | Callable::Instance(c) => &c.module,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Callable::Function(f) => format!("{}.{}", f.module, f.qualname),
            Callable::Class(c) => format!("{}.{} (class)", c.module, c.name),
            Callable::Instance(c) => format!("{}.{} (instance)", c.module, c.name),
        }
    }
}

/// An exception class identified at a raise site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExceptionClass {
    /// A user-defined subclass of an exception root.
    User(ClassRef),
    /// The framework HTTP exception raised directly.
    Root,
    /// A builtin exception; carried but never an HTTP response.
    Builtin(String),
}

impl ExceptionClass {
    /// Class name used for schema naming fallbacks.
    pub fn class_name(&self) -> &str {
        match self {
            ExceptionClass::User(c) => &c.name,
            ExceptionClass::Root => "HTTPException",
            ExceptionClass::Builtin(name) => name,
        }
    }
}
