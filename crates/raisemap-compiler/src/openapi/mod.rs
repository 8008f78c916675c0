//! Response schema construction and OpenAPI document merging.

mod merge;
mod schema;

#[cfg(test)]
mod merge_tests;
#[cfg(test)]
mod schema_tests;

pub use merge::SchemaMerger;
pub use schema::response_record;
