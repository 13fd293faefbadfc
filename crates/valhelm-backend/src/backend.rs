//! Unified value-backend trait
//!
//! Every storage mechanism, from the process-local map for non-sensitive
//! values up to cloud secret managers, satisfies this one contract. Keys are
//! derived by the caller from (path, deployment) and are collision-free
//! store-wide; backends treat them as opaque.

use serde_json::Value as JsonValue;
use std::fmt;

use crate::auth::{AuthConfigIssue, AuthMethod, BackendKind};
use crate::error::Result;

/// Unified value-backend trait
///
/// Implementations must be `Send + Sync`: a single backend instance is shared
/// by every value routed to it for the lifetime of the process (or, for
/// secret backends, the authenticated session). All calls are synchronous and
/// blocking; resilience (retries, timeouts) belongs in the adapter, not here.
pub trait ValueBackend: Send + Sync + fmt::Debug {
    /// The backend kind this adapter serves
    fn kind(&self) -> BackendKind;

    /// Fetch the value stored under `key`
    ///
    /// Fails with `SecretNotFound` when the key is absent, or with
    /// `Unreachable`/`AuthenticationFailed` when the backing store cannot be
    /// consulted.
    fn get_value(&self, key: &str) -> Result<JsonValue>;

    /// Store `value` under `key`, replacing any previous value
    fn set_value(&self, key: &str, value: &JsonValue) -> Result<()>;

    /// Remove the value stored under `key`
    ///
    /// Fails with `SecretNotFound` when the key is absent.
    fn remove_value(&self, key: &str) -> Result<()>;

    /// Validate an auth method for this backend
    ///
    /// Collects every missing or malformed field. The default implementation
    /// applies the kind-level rules; adapters with extra requirements extend
    /// the list.
    fn validate_auth_config(
        &self,
        auth: &AuthMethod,
    ) -> std::result::Result<(), Vec<AuthConfigIssue>> {
        let issues = self.kind().validate_auth(auth);
        if issues.is_empty() { Ok(()) } else { Err(issues) }
    }
}
