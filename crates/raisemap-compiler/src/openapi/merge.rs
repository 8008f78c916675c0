//! Merging discovered response records into an OpenAPI document.

use indexmap::IndexSet;
use log::debug;
use serde_json::{Value, json};

use raisemap_core::ResponseRecord;

use crate::framework::Route;

/// Injects response records into `paths[path][method].responses` and the
/// component schema registry.
///
/// Per route, records are keyed by `(status_code, schema_name)` and
/// duplicates are silently collapsed. Two distinct schemas sharing a
/// status code lift the response to an `anyOf` union, in discovery order.
/// The component registry is written at most once per schema name.
pub struct SchemaMerger;

impl SchemaMerger {
    pub fn merge_route(document: &mut Value, route: &Route, records: &[ResponseRecord]) {
        let mut added: IndexSet<(u16, String)> = IndexSet::new();

        for record in records {
            if !added.insert((record.status_code, record.schema_name.clone())) {
                continue;
            }
            Self::register_component(document, record);
            for method in &route.methods {
                Self::merge_response(document, &route.path, &method.to_lowercase(), record);
            }
        }
    }

    fn register_component(document: &mut Value, record: &ResponseRecord) {
        let Some(root) = document.as_object_mut() else {
            return;
        };
        let components = root.entry("components").or_insert_with(|| json!({}));
        let Some(components) = components.as_object_mut() else {
            return;
        };
        let schemas = components.entry("schemas").or_insert_with(|| json!({}));
        let Some(schemas) = schemas.as_object_mut() else {
            return;
        };
        if !schemas.contains_key(&record.schema_name) {
            schemas.insert(record.schema_name.clone(), record.response_schema.clone());
        }
    }

    fn merge_response(document: &mut Value, path: &str, method: &str, record: &ResponseRecord) {
        let Some(responses) = document
            .pointer_mut(&format!("/paths/{}/{method}/responses", escape(path)))
            .and_then(Value::as_object_mut)
        else {
            debug!("no response table for {method} {path}; skipping merge");
            return;
        };

        let status_key = record.status_code.to_string();
        let reference = json!({ "$ref": Self::component_ref(&record.schema_name) });

        match responses.get_mut(&status_key) {
            None => {
                responses.insert(
                    status_key,
                    json!({
                        "description": record.description(),
                        "content": {
                            "application/json": { "schema": reference }
                        }
                    }),
                );
            }
            Some(existing) => {
                let Some(schema) = existing
                    .pointer_mut("/content/application~1json/schema")
                else {
                    debug!("response {status_key} for {method} {path} has no JSON schema; replacing");
                    *existing = json!({
                        "description": record.description(),
                        "content": {
                            "application/json": { "schema": reference }
                        }
                    });
                    return;
                };
                Self::merge_union(schema, reference);
            }
        }
    }

    /// Lift a single-schema response to a union, or append in place.
    fn merge_union(schema: &mut Value, reference: Value) {
        if let Some(alternatives) = schema
            .get_mut("anyOf")
            .and_then(Value::as_array_mut)
        {
            if !alternatives.contains(&reference) {
                alternatives.push(reference);
            }
            return;
        }
        if *schema == reference {
            return;
        }
        let existing = schema.take();
        *schema = json!({ "anyOf": [existing, reference] });
    }

    fn component_ref(schema_name: &str) -> String {
        format!("#/components/schemas/{schema_name}")
    }
}

/// JSON pointer escaping for a route path segment.
fn escape(path: &str) -> String {
    path.replace('~', "~0").replace('/', "~1")
}
