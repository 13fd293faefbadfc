//! CLI error types with exit code handling
//!
//! Maps core and backend errors to diagnostics with help text and an exit
//! code per error class.

use miette::Diagnostic;
use thiserror::Error;

use valhelm_core::StoreError;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// Configuration file problems (missing, already present, unreadable)
    #[error("{message}")]
    #[diagnostic(code(valhelm::cli::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// A store operation was rejected
    #[error("{message}")]
    #[diagnostic(code(valhelm::cli::store))]
    Store {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// A secret backend failed or is unavailable
    #[error("{message}")]
    #[diagnostic(code(valhelm::cli::backend))]
    Backend { message: String },

    /// Validation finished with findings
    #[error("Validation failed with {count} finding(s)")]
    #[diagnostic(code(valhelm::cli::validation))]
    ValidationFailed { count: usize },

    /// Another command holds the configuration lock
    #[error("Unable to acquire lock on {path}")]
    #[diagnostic(
        code(valhelm::cli::lock),
        help("another valhelm command may be running")
    )]
    Locked { path: String },

    /// IO error (file not found, permissions, etc.)
    #[error("IO error: {message}")]
    #[diagnostic(code(valhelm::cli::io))]
    Io { message: String },

    /// Invalid command-line input
    #[error("{message}")]
    #[diagnostic(code(valhelm::cli::usage))]
    Usage { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config { .. } => exit_codes::IO_ERROR,
            CliError::Store { .. } => exit_codes::STORE_ERROR,
            CliError::Backend { .. } => exit_codes::BACKEND_ERROR,
            CliError::ValidationFailed { .. } => exit_codes::VALIDATION_ERROR,
            CliError::Locked { .. } => exit_codes::ERROR,
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Usage { .. } => exit_codes::USAGE_ERROR,
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: None,
        }
    }

    /// Create a config error with help text
    pub fn config_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create a usage error
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }
}

impl From<StoreError> for CliError {
    fn from(err: StoreError) -> Self {
        let help = match &err {
            StoreError::SensitiveValueNoBackend { deployment, .. } => Some(format!(
                "attach a secret backend first: valhelm attach-backend {deployment} <kind>"
            )),
            StoreError::PathInUse { path, .. } => {
                Some(format!("remove the values first, or force: valhelm remove-path {path} --force"))
            }
            StoreError::DeploymentInUse { .. } => {
                Some("remove the referencing values first: valhelm remove-value <path> <deployment>".to_string())
            }
            _ => None,
        };

        match err {
            StoreError::Backend(backend_err) => CliError::Backend {
                message: backend_err.to_string(),
            },
            other => CliError::Store {
                message: other.to_string(),
                help,
            },
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io {
            message: err.to_string(),
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
