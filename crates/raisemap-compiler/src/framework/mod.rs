//! The web-framework collaborator model.
//!
//! The compiler consumes routes, dependency trees, and a base document from
//! the framework. At runtime those come from the framework itself; here
//! they are reconstructed symbolically from the same parsed sources: the
//! application object, its decorated endpoints (including routers), and the
//! `Depends(...)` wiring of parameters.

mod app;
mod dependencies;
mod document;


pub use app::{AppRef, Route, discover_routes, locate_app};
pub use dependencies::dependency_tree;
pub use document::base_document;

use raisemap_core::status;

/// A symbol belonging to the framework itself, resolved from a well-known
/// table rather than from source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameworkSymbol {
    /// The application class (`fastapi.FastAPI`).
    Application,
    /// The router class (`fastapi.APIRouter`).
    Router,
    /// The dependency marker (`fastapi.Depends`).
    Depends,
    /// The HTTP exception root; the base every HTTP error subclasses.
    HttpException,
    /// The status constant module.
    StatusModule,
    /// One constant of the status module.
    StatusConstant(u16),
}

/// Resolve an absolute dotted path against the framework's public surface.
pub fn known_symbol(dotted: &str) -> Option<FrameworkSymbol> {
    match dotted {
        "fastapi.FastAPI" | "fastapi.applications.FastAPI" => Some(FrameworkSymbol::Application),
        "fastapi.APIRouter" | "fastapi.routing.APIRouter" => Some(FrameworkSymbol::Router),
        "fastapi.Depends" | "fastapi.param_functions.Depends" => Some(FrameworkSymbol::Depends),
        "fastapi.HTTPException"
        | "fastapi.exceptions.HTTPException"
        | "starlette.exceptions.HTTPException" => Some(FrameworkSymbol::HttpException),
        "fastapi.status" | "starlette.status" => Some(FrameworkSymbol::StatusModule),
        _ => {
            let (module, constant) = dotted.rsplit_once('.')?;
            if module == "fastapi.status" || module == "starlette.status" {
                status::code_for_constant(constant).map(FrameworkSymbol::StatusConstant)
            } else {
                None
            }
        }
    }
}
