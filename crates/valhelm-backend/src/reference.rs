//! Secret reference strings
//!
//! Sensitive values never persist as literal content. The configuration
//! document stores a reference of the form `secret://<backend>/<key>` and the
//! actual secret lives in the named backend. References are non-secret
//! metadata: they are safe to display without backend credentials.

use std::fmt;

use crate::auth::BackendKind;

/// URI-style scheme prefix for secret references
const SCHEME: &str = "secret://";

/// A parsed `secret://<backend>/<key>` reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretRef {
    kind: BackendKind,
    key: String,
}

impl SecretRef {
    /// Create a reference to `key` in a secret backend
    ///
    /// `kind` must be a secret-capable backend; `no-backend` cannot hold
    /// secrets and is rejected.
    pub fn new(kind: BackendKind, key: impl Into<String>) -> Option<Self> {
        if !kind.is_secret() {
            return None;
        }
        Some(Self {
            kind,
            key: key.into(),
        })
    }

    /// The backend this reference points into
    pub fn kind(&self) -> BackendKind {
        self.kind
    }

    /// The opaque storage key inside the backend
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Parse a reference from its string form
    pub fn parse(s: &str) -> Option<Self> {
        let rest = s.strip_prefix(SCHEME)?;
        let (kind, key) = rest.split_once('/')?;
        let kind = BackendKind::parse(kind)?;
        if !kind.is_secret() || key.is_empty() {
            return None;
        }
        Some(Self {
            kind,
            key: key.to_string(),
        })
    }

    /// Whether a raw string looks like a secret reference
    pub fn is_reference(s: &str) -> bool {
        s.starts_with(SCHEME)
    }
}

impl fmt::Display for SecretRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SCHEME}{}/{}", self.kind, self.key)
    }
}
