//! raisemap compiler: exception discovery and OpenAPI enrichment.
//!
//! This crate provides the compilation pipeline for raisemap:
//! - `project` - on-disk module index (discovery, parsing, scan scope)
//! - `python` - helpers over the tree-sitter Python grammar
//! - `resolve` - symbolic name, object, and type resolution
//! - `analyze` - raise-site discovery (finder, call-graph walker, extractor)
//! - `openapi` - response schema construction and document merging
//! - `framework` - the web-framework collaborator model (routes, dependencies)
//! - `compile` - high-level Compiler facade
//!
//! The compiler never executes user code. Every lookup that the original
//! runtime environment would answer with reflection is answered here by
//! walking parsed source: module files are located under the project root,
//! parsed on demand, and all resolution is symbolic. Analysis is
//! best-effort by design; an unresolvable name or an unparseable file
//! degrades the result, never the pass.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod analyze;
pub mod compile;
pub mod framework;
pub mod openapi;
pub mod project;
pub mod python;
pub mod resolve;

#[cfg(test)]
pub mod test_utils;


use std::path::PathBuf;

pub use compile::{Compiler, compile_app};
pub use framework::{AppRef, Route};
pub use project::{Project, ScanScope};

/// Errors surfaced to callers of the compiler.
///
/// Everything else in the pipeline is best-effort: unresolved names and
/// unreadable sources are logged and skipped, they never abort a pass.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Application path did not look like `module:attribute`.
    #[error("malformed application path '{path}': expected '<module>:<attribute>'")]
    MalformedAppPath { path: String },

    /// The named module could not be located under the project root.
    #[error("module '{module}' not found under {root}")]
    ModuleNotFound { module: String, root: PathBuf },

    /// The module exists but does not bind the named attribute.
    #[error("attribute '{attribute}' not found in module '{module}'")]
    AttributeNotFound { module: String, attribute: String },

    /// The attribute is bound to something that is not an application object.
    #[error("attribute '{attribute}' in module '{module}' is not a FastAPI application")]
    NotAnApplication { module: String, attribute: String },

    /// No scan scope was provided and none could be inferred.
    #[error(
        "could not determine the module that defines the application; \
         pass the scan scope explicitly, e.g. `raisemap compile app.main:app ./openapi.json app`"
    )]
    ScopeInference,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for compiler operations.
pub type Result<T> = std::result::Result<T, Error>;
