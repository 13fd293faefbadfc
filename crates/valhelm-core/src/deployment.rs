//! Deployment model
//!
//! A deployment is a named target environment (dev, prod, ...) with its own
//! backend and auth configuration. New deployments start with
//! `no-backend`/`no-auth`; backend and auth are attached by separate
//! operations and are never silently defaulted afterwards.

use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use std::sync::Arc;

use valhelm_backend::{AuthMethod, BackendError, BackendKind, ValueBackend};

/// A named target environment
#[derive(Debug, Clone, PartialEq)]
pub struct Deployment {
    name: String,
    backend: BackendKind,
    auth: AuthMethod,
    backend_config: IndexMap<String, JsonValue>,
}

impl Deployment {
    /// Create a deployment with the `no-backend`/`no-auth` defaults
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            backend: BackendKind::NoBackend,
            auth: AuthMethod::NoAuth,
            backend_config: IndexMap::new(),
        }
    }

    /// Rebuild a deployment from its persisted parts
    pub(crate) fn from_parts(
        name: impl Into<String>,
        backend: BackendKind,
        auth: AuthMethod,
        backend_config: IndexMap<String, JsonValue>,
    ) -> Self {
        Self {
            name: name.into(),
            backend,
            auth,
            backend_config,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn backend(&self) -> BackendKind {
        self.backend
    }

    pub fn auth(&self) -> &AuthMethod {
        &self.auth
    }

    pub fn backend_config(&self) -> &IndexMap<String, JsonValue> {
        &self.backend_config
    }

    /// Whether this deployment can hold sensitive values
    pub fn has_secret_backend(&self) -> bool {
        self.backend.is_secret()
    }

    /// Attach a backend, validating kind-specific required config keys
    pub(crate) fn attach_backend(
        &mut self,
        kind: BackendKind,
        config: IndexMap<String, JsonValue>,
    ) -> Result<(), BackendError> {
        let missing = kind.missing_config_keys(&config);
        if !missing.is_empty() {
            return Err(BackendError::InvalidBackendConfig {
                backend: kind,
                missing,
            });
        }

        tracing::debug!(deployment = %self.name, backend = %kind, "attaching backend");
        self.backend = kind;
        self.backend_config = config;
        Ok(())
    }

    /// Attach an auth method, validated through the backend capability when an
    /// adapter is registered, otherwise through the kind-level rules
    pub(crate) fn attach_auth(
        &mut self,
        auth: AuthMethod,
        adapter: Option<Arc<dyn ValueBackend>>,
    ) -> Result<(), BackendError> {
        let issues = match adapter {
            Some(backend) => backend.validate_auth_config(&auth).err().unwrap_or_default(),
            None => self.backend.validate_auth(&auth),
        };
        if !issues.is_empty() {
            return Err(BackendError::InvalidAuthConfig {
                backend: self.backend,
                issues,
            });
        }

        tracing::debug!(deployment = %self.name, auth = auth.variant(), "attaching auth");
        self.auth = auth;
        Ok(())
    }
}
