//! Error types for the configuration store
//!
//! Mutation operations fail fast with the first violated invariant; aggregate
//! checks (`validate`, rendering) collect findings instead and only surface a
//! `StoreError` for fatal conditions.

use thiserror::Error;

use valhelm_backend::BackendError;

use crate::schema::SchemaViolation;

/// Configuration store errors
#[derive(Debug, Error)]
pub enum StoreError {
    // ============ Structural Errors ============
    #[error("Path already exists: {path}")]
    DuplicatePath { path: String },

    #[error("Path not found: {path}{}", suggestion_text(.suggestion))]
    PathNotFound {
        path: String,
        suggestion: Option<String>,
    },

    #[error(
        "Invalid path format: '{path}' (expected dot-separated segments of [A-Za-z0-9_-])"
    )]
    InvalidPathFormat { path: String },

    #[error("Path '{path}' still has values for deployment(s): {}", .deployments.join(", "))]
    PathInUse {
        path: String,
        deployments: Vec<String>,
    },

    #[error("Deployment already exists: {name}")]
    DuplicateDeployment { name: String },

    #[error("Deployment not found: {name}{}", suggestion_text(.suggestion))]
    DeploymentNotFound {
        name: String,
        suggestion: Option<String>,
    },

    #[error("Deployment '{name}' is still referenced by values for path(s): {}", .paths.join(", "))]
    DeploymentInUse { name: String, paths: Vec<String> },

    #[error("Path conflict: '{path}' collides with the value defined at '{ancestor}'")]
    PathConflict { path: String, ancestor: String },

    #[error("Invalid release name: '{name}' (must not be empty)")]
    InvalidReleaseName { name: String },

    #[error("Invalid deployment name: '{name}' (must not be empty)")]
    InvalidDeploymentName { name: String },

    // ============ Value Errors ============
    #[error(
        "Invalid value type for path '{path}' in deployment '{deployment}': \
         got {actual}, expected string, number, boolean or null"
    )]
    InvalidValueType {
        path: String,
        deployment: String,
        actual: &'static str,
    },

    #[error("No value set for path '{path}' in deployment '{deployment}'")]
    ValueNotSet { path: String, deployment: String },

    #[error(
        "Path '{path}' is sensitive but deployment '{deployment}' has no secret backend configured"
    )]
    SensitiveValueNoBackend { path: String, deployment: String },

    #[error("Missing required value(s) for deployment '{deployment}': {}", .paths.join(", "))]
    MissingRequiredValues {
        deployment: String,
        paths: Vec<String>,
    },

    // ============ Backend Errors ============
    #[error(transparent)]
    Backend(#[from] BackendError),

    // ============ Schema Errors ============
    #[error("Unsupported configuration version: '{found}' (supported: {supported})")]
    UnsupportedVersion { found: String, supported: String },

    #[error("Configuration document failed schema validation with {} violation(s)", .violations.len())]
    SchemaValidation { violations: Vec<SchemaViolation> },

    #[error(
        "Invalid secret reference for path '{path}' in deployment '{deployment}': {reason}"
    )]
    InvalidSecretReference {
        path: String,
        deployment: String,
        reason: String,
    },

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Failed to serialize YAML: {0}")]
    YamlSerialize(#[from] serde_yaml::Error),
}

fn suggestion_text(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean '{s}'?)"),
        None => String::new(),
    }
}

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;
