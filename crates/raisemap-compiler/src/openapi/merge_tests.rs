use serde_json::{Value, json};

use raisemap_core::ResponseRecord;

use crate::framework::Route;
use crate::openapi::SchemaMerger;
use crate::resolve::FunctionRef;

fn route(path: &str, methods: &[&str]) -> Route {
    Route {
        path: path.to_owned(),
        methods: methods.iter().map(|m| (*m).to_owned()).collect(),
        include_in_schema: true,
        handler: FunctionRef::new("app.main", "handler"),
    }
}

fn base_doc(path: &str, method: &str) -> Value {
    json!({
        "openapi": "3.1.0",
        "info": { "title": "FastAPI", "version": "0.1.0" },
        "paths": {
            path: {
                method: {
                    "responses": {
                        "200": {
                            "description": "Successful Response",
                            "content": { "application/json": { "schema": {} } }
                        }
                    }
                }
            }
        }
    })
}

#[test]
fn inserts_single_schema_response() {
    let mut doc = base_doc("/payment", "post");
    let record = ResponseRecord::generic("PayError", 402, Some("pay up".to_owned()));
    SchemaMerger::merge_route(&mut doc, &route("/payment", &["POST"]), &[record.clone()]);

    let response = &doc["paths"]["/payment"]["post"]["responses"]["402"];
    assert_eq!(response["description"], json!("pay up"));
    assert_eq!(
        response["content"]["application/json"]["schema"],
        json!({ "$ref": "#/components/schemas/payUpSchema" })
    );
    assert_eq!(
        doc["components"]["schemas"]["payUpSchema"],
        record.response_schema
    );
}

#[test]
fn same_status_lifts_to_union_in_discovery_order() {
    let mut doc = base_doc("/x", "get");
    let first = ResponseRecord::generic("A", 500, Some("disk full".to_owned()));
    let second = ResponseRecord::generic("B", 500, Some("net down".to_owned()));
    let third = ResponseRecord::generic("C", 500, Some("really broken".to_owned()));
    SchemaMerger::merge_route(
        &mut doc,
        &route("/x", &["GET"]),
        &[first, second, third],
    );

    let schema = &doc["paths"]["/x"]["get"]["responses"]["500"]["content"]["application/json"]["schema"];
    assert_eq!(
        schema["anyOf"],
        json!([
            { "$ref": "#/components/schemas/diskFullSchema" },
            { "$ref": "#/components/schemas/netDownSchema" },
            { "$ref": "#/components/schemas/reallyBrokenSchema" },
        ])
    );
}

#[test]
fn duplicate_records_collapse_silently() {
    let mut doc = base_doc("/x", "get");
    let record = ResponseRecord::generic("A", 500, Some("boom".to_owned()));
    SchemaMerger::merge_route(
        &mut doc,
        &route("/x", &["GET"]),
        &[record.clone(), record.clone(), record],
    );

    let schema = &doc["paths"]["/x"]["get"]["responses"]["500"]["content"]["application/json"]["schema"];
    // still a single reference, not a union of identical refs
    assert_eq!(schema["$ref"], json!("#/components/schemas/boomSchema"));
    assert!(schema.get("anyOf").is_none());
}

#[test]
fn distinct_statuses_stay_separate() {
    let mut doc = base_doc("/x", "get");
    let a = ResponseRecord::generic("A", 404, Some("missing".to_owned()));
    let b = ResponseRecord::generic("B", 409, Some("conflict".to_owned()));
    SchemaMerger::merge_route(&mut doc, &route("/x", &["GET"]), &[a, b]);

    let responses = &doc["paths"]["/x"]["get"]["responses"];
    assert!(responses.get("404").is_some());
    assert!(responses.get("409").is_some());
    assert!(responses["404"]["content"]["application/json"]["schema"].get("anyOf").is_none());
}

#[test]
fn component_registry_written_once_per_name() {
    let mut doc = base_doc("/x", "get");
    let a = ResponseRecord::generic("A", 404, Some("gone".to_owned()));
    let b = ResponseRecord::generic("B", 410, Some("gone".to_owned()));
    SchemaMerger::merge_route(&mut doc, &route("/x", &["GET"]), &[a.clone(), b]);

    let schemas = doc["components"]["schemas"].as_object().unwrap();
    assert_eq!(schemas.len(), 1);
    assert_eq!(schemas["goneSchema"], a.response_schema);
}

#[test]
fn all_route_methods_receive_the_response() {
    let mut doc = json!({
        "openapi": "3.1.0",
        "info": { "title": "FastAPI", "version": "0.1.0" },
        "paths": {
            "/x": {
                "get": { "responses": {} },
                "post": { "responses": {} }
            }
        }
    });
    let record = ResponseRecord::generic("A", 500, None);
    SchemaMerger::merge_route(&mut doc, &route("/x", &["GET", "POST"]), &[record]);

    assert!(doc["paths"]["/x"]["get"]["responses"].get("500").is_some());
    assert!(doc["paths"]["/x"]["post"]["responses"].get("500").is_some());
}

#[test]
fn missing_path_entry_is_skipped() {
    let mut doc = json!({ "openapi": "3.1.0", "paths": {} });
    let record = ResponseRecord::generic("A", 500, None);
    // merging must not panic or invent a path item
    SchemaMerger::merge_route(&mut doc, &route("/ghost", &["GET"]), &[record]);
    assert!(doc["paths"].get("/ghost").is_none());
}
