//! Backend and authentication enumerations
//!
//! `BackendKind` is the closed set of storage backends a deployment may use;
//! `AuthMethod` is the tagged set of authentication variants. Both are part of
//! the persisted configuration document, so their serde names are stable.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Storage backend kinds a deployment can be configured with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackendKind {
    /// No secret backend configured; only non-sensitive values are allowed
    #[default]
    NoBackend,
    /// git-secret encrypted files in the release repository
    GitSecret,
    /// AWS Secrets Manager
    Aws,
    /// Azure Key Vault
    Azure,
    /// GCP Secret Manager
    Gcp,
}

impl BackendKind {
    /// All kinds that can hold sensitive values
    pub const SECRET_KINDS: &'static [BackendKind] = &[
        BackendKind::GitSecret,
        BackendKind::Aws,
        BackendKind::Azure,
        BackendKind::Gcp,
    ];

    /// Stable string form used in documents and `secret://` references
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NoBackend => "no-backend",
            Self::GitSecret => "git-secret",
            Self::Aws => "aws",
            Self::Azure => "azure",
            Self::Gcp => "gcp",
        }
    }

    /// Parse a backend kind from its stable string form
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "no-backend" => Some(Self::NoBackend),
            "git-secret" => Some(Self::GitSecret),
            "aws" => Some(Self::Aws),
            "azure" => Some(Self::Azure),
            "gcp" => Some(Self::Gcp),
            _ => None,
        }
    }

    /// Whether this kind can store sensitive values
    pub fn is_secret(&self) -> bool {
        !matches!(self, Self::NoBackend)
    }

    /// Backend-config keys that must be present when attaching this kind
    pub fn required_config_keys(&self) -> &'static [&'static str] {
        match self {
            Self::Aws => &["region"],
            Self::Azure => &["vault_url"],
            Self::Gcp => &["project_id"],
            Self::NoBackend | Self::GitSecret => &[],
        }
    }

    /// Whether managed-identity auth makes sense for this kind
    pub fn supports_managed_identity(&self) -> bool {
        matches!(self, Self::Aws | Self::Azure | Self::Gcp)
    }

    /// Validate a backend-config map against this kind's required keys.
    ///
    /// Returns every missing or blank key, never just the first.
    pub fn missing_config_keys(
        &self,
        config: &IndexMap<String, serde_json::Value>,
    ) -> Vec<String> {
        self.required_config_keys()
            .iter()
            .filter(|key| {
                match config.get(**key) {
                    None => true,
                    Some(serde_json::Value::String(s)) => s.is_empty(),
                    Some(serde_json::Value::Null) => true,
                    Some(_) => false,
                }
            })
            .map(|key| (*key).to_string())
            .collect()
    }

    /// Validate an auth method against this kind.
    ///
    /// Collects every missing or malformed field; an empty list means the
    /// combination is acceptable.
    pub fn validate_auth(&self, auth: &AuthMethod) -> Vec<AuthConfigIssue> {
        let mut issues = Vec::new();

        match auth {
            AuthMethod::NoAuth => {
                // Secret backends treat no-auth as ambient credentials
                // (the SDK default chain); always acceptable.
            }
            AuthMethod::Env { prefix } => {
                if !self.is_secret() {
                    issues.push(AuthConfigIssue::new(
                        "type",
                        "no-backend deployments cannot carry authentication",
                    ));
                }
                if prefix.is_empty() {
                    issues.push(AuthConfigIssue::new("prefix", "must not be empty"));
                }
            }
            AuthMethod::File { path } => {
                if !self.is_secret() {
                    issues.push(AuthConfigIssue::new(
                        "type",
                        "no-backend deployments cannot carry authentication",
                    ));
                }
                if path.as_os_str().is_empty() {
                    issues.push(AuthConfigIssue::new("path", "must not be empty"));
                }
            }
            AuthMethod::Direct { credentials } => {
                if !self.is_secret() {
                    issues.push(AuthConfigIssue::new(
                        "type",
                        "no-backend deployments cannot carry authentication",
                    ));
                }
                if credentials.is_empty() {
                    issues.push(AuthConfigIssue::new("credentials", "must not be empty"));
                }
                for (key, value) in credentials {
                    if key.is_empty() {
                        issues.push(AuthConfigIssue::new("credentials", "contains an empty key"));
                    }
                    if value.is_empty() {
                        issues.push(AuthConfigIssue::new(
                            "credentials",
                            format!("credential '{key}' has an empty value"),
                        ));
                    }
                }
            }
            AuthMethod::ManagedIdentity => {
                if !self.supports_managed_identity() {
                    issues.push(AuthConfigIssue::new(
                        "type",
                        format!("managed-identity is not supported by '{}'", self),
                    ));
                }
            }
        }

        issues
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authentication variants for secret backends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum AuthMethod {
    /// No explicit credentials; secret backends fall back to ambient auth
    NoAuth,

    /// Credentials read from environment variables sharing a prefix
    Env { prefix: String },

    /// Credentials read from a file on disk
    File { path: PathBuf },

    /// Credentials supplied inline (CI secrets injection)
    Direct { credentials: IndexMap<String, String> },

    /// Cloud-provider managed identity (no local material)
    #[serde(alias = "managed_identity")]
    ManagedIdentity,
}

impl Default for AuthMethod {
    fn default() -> Self {
        Self::NoAuth
    }
}

impl AuthMethod {
    /// Stable variant tag used in documents
    pub const fn variant(&self) -> &'static str {
        match self {
            Self::NoAuth => "no-auth",
            Self::Env { .. } => "env",
            Self::File { .. } => "file",
            Self::Direct { .. } => "direct",
            Self::ManagedIdentity => "managed-identity",
        }
    }
}

/// A single missing or malformed auth-config field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfigIssue {
    /// The field the issue applies to (e.g. "prefix")
    pub field: String,
    /// What is wrong with it
    pub message: String,
}

impl AuthConfigIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for AuthConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}
