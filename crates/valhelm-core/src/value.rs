//! Resolved-value wrapper
//!
//! A `Value` is bound at creation to exactly one (path, deployment, backend)
//! triple. The backend is chosen by a strict rule, not a default: sensitive
//! paths use the deployment's configured secret backend, everything else the
//! process-wide simple backend. The decision is encoded here, at construction,
//! so resolution never re-checks types at use.

use serde_json::Value as JsonValue;
use std::sync::Arc;

use valhelm_backend::{BackendRegistry, SecretRef, SimpleBackend, ValueBackend};

use crate::deployment::Deployment;
use crate::error::{Result, StoreError};
use crate::path::ValuePath;

/// The backend a value routes through, fixed at bind time
#[derive(Debug, Clone)]
enum BackendBinding {
    /// Non-sensitive: the shared process-local backend
    Simple(Arc<SimpleBackend>),
    /// Sensitive: a secret backend addressed through a reference
    Secret {
        reference: SecretRef,
        registry: Arc<BackendRegistry>,
    },
}

/// A single resolved-value access point for one (path, deployment) pair
#[derive(Debug, Clone)]
pub struct Value {
    path: ValuePath,
    deployment: String,
    binding: BackendBinding,
}

impl Value {
    /// Bind a value for its path and deployment.
    ///
    /// Sensitive paths require the deployment to carry a secret backend;
    /// binding against `no-backend` fails with `SensitiveValueNoBackend`.
    pub(crate) fn bind(
        path: &ValuePath,
        deployment: &Deployment,
        sensitive: bool,
        simple: &Arc<SimpleBackend>,
        registry: &Arc<BackendRegistry>,
    ) -> Result<Self> {
        let binding = if sensitive {
            let key = path.storage_key(deployment.name());
            let reference = SecretRef::new(deployment.backend(), key).ok_or_else(|| {
                StoreError::SensitiveValueNoBackend {
                    path: path.to_string(),
                    deployment: deployment.name().to_string(),
                }
            })?;
            BackendBinding::Secret {
                reference,
                registry: Arc::clone(registry),
            }
        } else {
            BackendBinding::Simple(Arc::clone(simple))
        };

        Ok(Self {
            path: path.clone(),
            deployment: deployment.name().to_string(),
            binding,
        })
    }

    /// Rebind a persisted secret reference (document load)
    pub(crate) fn from_reference(
        path: &ValuePath,
        deployment: &str,
        reference: SecretRef,
        registry: &Arc<BackendRegistry>,
    ) -> Self {
        Self {
            path: path.clone(),
            deployment: deployment.to_string(),
            binding: BackendBinding::Secret {
                reference,
                registry: Arc::clone(registry),
            },
        }
    }

    pub fn path(&self) -> &ValuePath {
        &self.path
    }

    pub fn deployment(&self) -> &str {
        &self.deployment
    }

    /// The secret reference, for sensitive values
    pub fn reference(&self) -> Option<&SecretRef> {
        match &self.binding {
            BackendBinding::Secret { reference, .. } => Some(reference),
            BackendBinding::Simple(_) => None,
        }
    }

    /// Fetch the value.
    ///
    /// With `resolve = false` a sensitive value yields its raw reference
    /// string instead of the secret content; no backend adapter or
    /// credentials are needed for that.
    pub fn get(&self, resolve: bool) -> Result<JsonValue> {
        match &self.binding {
            BackendBinding::Simple(backend) => {
                Ok(backend.get_value(&self.path.storage_key(&self.deployment))?)
            }
            BackendBinding::Secret {
                reference,
                registry,
            } => {
                if !resolve {
                    return Ok(JsonValue::String(reference.to_string()));
                }
                let adapter = registry.get(reference.kind())?;
                Ok(adapter.get_value(reference.key())?)
            }
        }
    }

    /// Store a value through the bound backend
    pub(crate) fn set(&self, value: &JsonValue) -> Result<()> {
        ensure_scalar(&self.path, &self.deployment, value)?;
        match &self.binding {
            BackendBinding::Simple(backend) => {
                backend.set_value(&self.path.storage_key(&self.deployment), value)?;
            }
            BackendBinding::Secret {
                reference,
                registry,
            } => {
                let adapter = registry.get(reference.kind())?;
                adapter.set_value(reference.key(), value)?;
            }
        }
        Ok(())
    }

    /// Remove the stored value. A key already absent from the backend is
    /// treated as removed.
    pub(crate) fn remove(&self) -> Result<()> {
        let result = match &self.binding {
            BackendBinding::Simple(backend) => {
                backend.remove_value(&self.path.storage_key(&self.deployment))
            }
            BackendBinding::Secret {
                reference,
                registry,
            } => registry
                .get(reference.kind())
                .and_then(|adapter| adapter.remove_value(reference.key())),
        };

        match result {
            Ok(()) => Ok(()),
            Err(valhelm_backend::BackendError::SecretNotFound { .. }) => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Reject values that are not representable as a configuration scalar
pub(crate) fn ensure_scalar(
    path: &ValuePath,
    deployment: &str,
    value: &JsonValue,
) -> Result<()> {
    match value {
        JsonValue::String(_) | JsonValue::Number(_) | JsonValue::Bool(_) | JsonValue::Null => {
            Ok(())
        }
        JsonValue::Array(_) => Err(StoreError::InvalidValueType {
            path: path.to_string(),
            deployment: deployment.to_string(),
            actual: "array",
        }),
        JsonValue::Object(_) => Err(StoreError::InvalidValueType {
            path: path.to_string(),
            deployment: deployment.to_string(),
            actual: "object",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use valhelm_backend::{BackendKind, MemoryBackend};

    fn secret_deployment(kind: BackendKind) -> Deployment {
        let mut deployment = Deployment::new("prod");
        let mut config = IndexMap::new();
        config.insert("region".to_string(), JsonValue::from("eu-west-1"));
        config.insert("vault_url".to_string(), JsonValue::from("https://kv"));
        config.insert("project_id".to_string(), JsonValue::from("acme"));
        deployment.attach_backend(kind, config).unwrap();
        deployment
    }

    #[test]
    fn test_non_sensitive_routes_to_simple_backend() {
        let simple = Arc::new(SimpleBackend::new());
        let registry = Arc::new(BackendRegistry::new());
        let path = ValuePath::parse("app.replicas").unwrap();
        // Deployment has a secret backend, but the rule is strict:
        // non-sensitive values always use the simple backend.
        let deployment = secret_deployment(BackendKind::Aws);

        let value = Value::bind(&path, &deployment, false, &simple, &registry).unwrap();
        value.set(&JsonValue::from(3)).unwrap();

        assert_eq!(simple.len(), 1);
        assert_eq!(value.get(true).unwrap(), JsonValue::from(3));
        assert_eq!(value.get(false).unwrap(), JsonValue::from(3));
        assert!(value.reference().is_none());
    }

    #[test]
    fn test_sensitive_requires_secret_backend() {
        let simple = Arc::new(SimpleBackend::new());
        let registry = Arc::new(BackendRegistry::new());
        let path = ValuePath::parse("app.db.password").unwrap();
        let deployment = Deployment::new("dev");

        let err = Value::bind(&path, &deployment, true, &simple, &registry).unwrap_err();
        assert!(matches!(err, StoreError::SensitiveValueNoBackend { .. }));
    }

    #[test]
    fn test_sensitive_resolve_and_raw_reference() {
        let simple = Arc::new(SimpleBackend::new());
        let mut registry = BackendRegistry::new();
        registry.register(Arc::new(MemoryBackend::new(BackendKind::Aws)));
        let registry = Arc::new(registry);

        let path = ValuePath::parse("app.db.password").unwrap();
        let deployment = secret_deployment(BackendKind::Aws);

        let value = Value::bind(&path, &deployment, true, &simple, &registry).unwrap();
        value.set(&JsonValue::from("hunter2")).unwrap();

        // Raw reference without touching the backend
        assert_eq!(
            value.get(false).unwrap(),
            JsonValue::from("secret://aws/app.db.password:prod")
        );
        // Resolution goes through the adapter
        assert_eq!(value.get(true).unwrap(), JsonValue::from("hunter2"));
        // Nothing leaked into the simple backend
        assert!(simple.is_empty());
    }

    #[test]
    fn test_sensitive_without_adapter_is_unavailable() {
        let simple = Arc::new(SimpleBackend::new());
        let registry = Arc::new(BackendRegistry::new());
        let path = ValuePath::parse("app.db.password").unwrap();
        let deployment = secret_deployment(BackendKind::Gcp);

        let value = Value::bind(&path, &deployment, true, &simple, &registry).unwrap();
        assert!(matches!(
            value.set(&JsonValue::from("x")),
            Err(StoreError::Backend(
                valhelm_backend::BackendError::Unavailable { .. }
            ))
        ));
        // The raw reference is still readable
        assert!(value.get(false).is_ok());
    }

    #[test]
    fn test_rejects_non_scalar_values() {
        let simple = Arc::new(SimpleBackend::new());
        let registry = Arc::new(BackendRegistry::new());
        let path = ValuePath::parse("app.replicas").unwrap();
        let deployment = Deployment::new("dev");

        let value = Value::bind(&path, &deployment, false, &simple, &registry).unwrap();
        let err = value.set(&serde_json::json!([1, 2])).unwrap_err();
        assert!(matches!(
            err,
            StoreError::InvalidValueType { actual: "array", .. }
        ));

        // Null is a valid scalar
        value.set(&JsonValue::Null).unwrap();
    }

    #[test]
    fn test_remove_is_idempotent() {
        let simple = Arc::new(SimpleBackend::new());
        let registry = Arc::new(BackendRegistry::new());
        let path = ValuePath::parse("app.replicas").unwrap();
        let deployment = Deployment::new("dev");

        let value = Value::bind(&path, &deployment, false, &simple, &registry).unwrap();
        value.set(&JsonValue::from(1)).unwrap();
        value.remove().unwrap();
        value.remove().unwrap();
    }
}
