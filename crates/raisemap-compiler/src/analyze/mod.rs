//! Raise-site discovery.
//!
//! The finder walks one function body at a time, tracking local symbolic
//! assignments and collecting raise sites; the call-graph walker owns the
//! per-pass visited table and dispatches into called functions, constructed
//! classes, and attribute-accessed methods; the extractor turns a resolved
//! site into a `(status_code, detail)` pair.

mod assign;
mod extract;
mod finder;
mod walker;

#[cfg(test)]
mod assign_tests;
#[cfg(test)]
mod extract_tests;

pub use assign::AssignmentMap;
pub use extract::RaiseSiteExtractor;
pub use finder::{ExceptionFinder, RaiseSite};
pub use walker::CallGraphWalker;
