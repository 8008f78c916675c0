//! Minimal base OpenAPI document.
//!
//! Stands in for the framework's own document generator: info from the
//! application object, one path item per route with the default success
//! response. The merger enriches this skeleton.

use serde_json::{Value, json};

use crate::framework::{AppRef, Route};

pub fn base_document(app: &AppRef, routes: &[Route]) -> Value {
    let mut info = json!({
        "title": app.title,
        "version": app.version,
    });
    if let Some(description) = &app.description {
        info["description"] = json!(description);
    }

    let mut document = json!({
        "openapi": "3.1.0",
        "info": info,
        "paths": {},
    });

    for route in routes {
        if !route.include_in_schema {
            continue;
        }
        for method in &route.methods {
            let method = method.to_lowercase();
            let operation = json!({
                "summary": summary(&route.handler.qualname),
                "operationId": operation_id(&route.handler.qualname, &route.path, &method),
                "responses": {
                    "200": {
                        "description": "Successful Response",
                        "content": { "application/json": { "schema": {} } }
                    }
                }
            });
            document["paths"][&route.path][method] = operation;
        }
    }

    document
}

/// `make_payment` becomes `Make Payment`.
fn summary(handler: &str) -> String {
    handler
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn operation_id(handler: &str, path: &str, method: &str) -> String {
    format!("{handler}{}_{method}", path.replace(['/', '{', '}'], "_"))
}
