//! Document schema validation
//!
//! The canonical configuration document is validated against an embedded JSON
//! Schema before any typed deserialization happens, so malformed input fails
//! with a complete list of violations instead of the first serde error.

use once_cell::sync::Lazy;
use serde_json::Value as JsonValue;
use std::fmt;

/// The configuration document version this build supports
pub const SUPPORTED_VERSION: &str = "1.0";

static DOCUMENT_SCHEMA: &str = include_str!("../schemas/v1.json");

static VALIDATOR: Lazy<jsonschema::Validator> = Lazy::new(|| {
    let schema: JsonValue =
        serde_json::from_str(DOCUMENT_SCHEMA).expect("embedded schema is valid JSON");
    jsonschema::validator_for(&schema).expect("embedded schema compiles")
});

/// A single schema violation with its document location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    /// JSON pointer into the document, or `(root)`
    pub path: String,
    /// What the schema rejected
    pub message: String,
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Validate a raw document against the v1 schema.
///
/// Collects every violation; an empty list means the document is
/// schema-valid.
pub fn validate_document(raw: &JsonValue) -> Vec<SchemaViolation> {
    if VALIDATOR.is_valid(raw) {
        return Vec::new();
    }

    VALIDATOR
        .iter_errors(raw)
        .map(|error| {
            let path = error.instance_path.to_string();
            SchemaViolation {
                path: if path.is_empty() {
                    "(root)".to_string()
                } else {
                    path
                },
                message: error.to_string().replace('"', "'"),
            }
        })
        .collect()
}
