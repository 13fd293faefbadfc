//! Error types for backend operations

use thiserror::Error;

use crate::auth::{AuthConfigIssue, BackendKind};

/// Backend operation errors
#[derive(Debug, Error)]
pub enum BackendError {
    // ============ Availability Errors ============
    #[error("No backend adapter registered for '{backend}'")]
    Unavailable { backend: BackendKind },

    #[error("Backend '{backend}' unreachable: {message}")]
    Unreachable {
        backend: BackendKind,
        message: String,
    },

    // ============ Authentication Errors ============
    #[error("Authentication against '{backend}' failed: {message}")]
    AuthenticationFailed {
        backend: BackendKind,
        message: String,
    },

    #[error("Invalid auth config for '{backend}': {}", format_issues(.issues))]
    InvalidAuthConfig {
        backend: BackendKind,
        issues: Vec<AuthConfigIssue>,
    },

    // ============ Configuration Errors ============
    #[error("Invalid backend config for '{backend}': missing {}", .missing.join(", "))]
    InvalidBackendConfig {
        backend: BackendKind,
        missing: Vec<String>,
    },

    // ============ Storage Errors ============
    #[error("No secret stored for key '{key}'")]
    SecretNotFound { key: String },
}

fn format_issues(issues: &[AuthConfigIssue]) -> String {
    issues
        .iter()
        .map(AuthConfigIssue::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type for backend operations
pub type Result<T> = std::result::Result<T, BackendError>;
