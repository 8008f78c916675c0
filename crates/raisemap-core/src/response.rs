//! Response records: the unit of information handed to the schema merger.

use serde_json::{Value, json};

use crate::utils::to_camel_case;

/// A single discovered error response.
///
/// One record corresponds to one `(exception type, detail)` pair reachable
/// from a route. The schema name is deterministic: the same exception type
/// with the same detail always produces the same name, which is what makes
/// merge output reproducible.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ResponseRecord {
    pub status_code: u16,
    pub detail: Option<String>,
    pub schema_name: String,
    pub response_schema: Value,
}

impl ResponseRecord {
    /// Build the generic record for an exception class.
    ///
    /// When a concrete detail was extracted the schema's `detail` property
    /// is pinned to that literal and the schema is named after it; without
    /// a detail the property is a free-form string and the schema is named
    /// `{ClassName}ErrorSchema`.
    pub fn generic(class_name: &str, status_code: u16, detail: Option<String>) -> Self {
        let (schema_name, detail_schema) = match &detail {
            Some(text) => (
                format!("{}Schema", to_camel_case(text)),
                json!({ "const": text, "title": "Detail" }),
            ),
            None => (
                format!("{class_name}ErrorSchema"),
                json!({ "title": "Detail", "type": "string" }),
            ),
        };

        let response_schema = json!({
            "properties": { "detail": detail_schema },
            "required": ["detail"],
            "title": schema_name,
            "type": "object",
        });

        Self {
            status_code,
            detail,
            schema_name,
            response_schema,
        }
    }

    /// Human-readable description used for the response entry.
    pub fn description(&self) -> &str {
        self.detail.as_deref().unwrap_or("No description provided")
    }
}
