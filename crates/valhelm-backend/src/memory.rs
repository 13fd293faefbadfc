//! In-memory secret backend for testing and local development
//!
//! Stands in for a cloud secret manager without requiring credentials or
//! network access. Tracks operation counts for assertions and can simulate an
//! unreachable store.

use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::auth::BackendKind;
use crate::backend::ValueBackend;
use crate::error::{BackendError, Result};

/// Counts of operations performed, for testing assertions
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OperationCounts {
    pub gets: usize,
    pub sets: usize,
    pub removes: usize,
}

/// In-memory secret backend
#[derive(Debug)]
pub struct MemoryBackend {
    kind: BackendKind,
    secrets: Mutex<HashMap<String, JsonValue>>,
    operations: Mutex<OperationCounts>,
    unreachable: AtomicBool,
}

impl MemoryBackend {
    /// Create an empty backend serving the given kind
    pub fn new(kind: BackendKind) -> Self {
        Self {
            kind,
            secrets: Mutex::new(HashMap::new()),
            operations: Mutex::new(OperationCounts::default()),
            unreachable: AtomicBool::new(false),
        }
    }

    /// Create with pre-populated secrets
    pub fn with_secrets(
        kind: BackendKind,
        secrets: impl IntoIterator<Item = (String, JsonValue)>,
    ) -> Self {
        let backend = Self::new(kind);
        {
            let mut store = backend.secrets.lock().unwrap();
            store.extend(secrets);
        }
        backend
    }

    /// Simulate the backing store being unreachable
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    /// Get operation counts for assertions
    pub fn operation_counts(&self) -> OperationCounts {
        *self.operations.lock().unwrap()
    }

    /// Number of stored secrets
    pub fn secret_count(&self) -> usize {
        self.secrets.lock().unwrap().len()
    }

    fn check_reachable(&self) -> Result<()> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(BackendError::Unreachable {
                backend: self.kind,
                message: "simulated outage".to_string(),
            });
        }
        Ok(())
    }
}

impl ValueBackend for MemoryBackend {
    fn kind(&self) -> BackendKind {
        self.kind
    }

    fn get_value(&self, key: &str) -> Result<JsonValue> {
        self.check_reachable()?;
        self.operations.lock().unwrap().gets += 1;
        self.secrets
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| BackendError::SecretNotFound {
                key: key.to_string(),
            })
    }

    fn set_value(&self, key: &str, value: &JsonValue) -> Result<()> {
        self.check_reachable()?;
        self.operations.lock().unwrap().sets += 1;
        self.secrets
            .lock()
            .unwrap()
            .insert(key.to_string(), value.clone());
        Ok(())
    }

    fn remove_value(&self, key: &str) -> Result<()> {
        self.check_reachable()?;
        self.operations.lock().unwrap().removes += 1;
        self.secrets
            .lock()
            .unwrap()
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| BackendError::SecretNotFound {
                key: key.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_get() {
        let backend = MemoryBackend::new(BackendKind::Aws);
        backend
            .set_value("app.db.password:prod", &JsonValue::from("hunter2"))
            .unwrap();

        assert_eq!(
            backend.get_value("app.db.password:prod").unwrap(),
            JsonValue::from("hunter2")
        );
        assert_eq!(backend.operation_counts().sets, 1);
        assert_eq!(backend.operation_counts().gets, 1);
    }

    #[test]
    fn test_missing_secret() {
        let backend = MemoryBackend::new(BackendKind::Gcp);
        assert!(matches!(
            backend.get_value("absent:dev"),
            Err(BackendError::SecretNotFound { .. })
        ));
    }

    #[test]
    fn test_unreachable_simulation() {
        let backend = MemoryBackend::new(BackendKind::Azure);
        backend.set_value("k:dev", &JsonValue::Null).unwrap();

        backend.set_unreachable(true);
        assert!(matches!(
            backend.get_value("k:dev"),
            Err(BackendError::Unreachable { .. })
        ));

        backend.set_unreachable(false);
        assert!(backend.get_value("k:dev").is_ok());
    }

    #[test]
    fn test_with_secrets() {
        let backend = MemoryBackend::with_secrets(
            BackendKind::GitSecret,
            [("a:dev".to_string(), JsonValue::from(true))],
        );
        assert_eq!(backend.secret_count(), 1);
        assert_eq!(backend.get_value("a:dev").unwrap(), JsonValue::from(true));
    }

    #[test]
    fn test_default_auth_validation_uses_kind_rules() {
        use crate::auth::AuthMethod;

        let backend = MemoryBackend::new(BackendKind::GitSecret);
        let issues = backend
            .validate_auth_config(&AuthMethod::ManagedIdentity)
            .unwrap_err();
        assert_eq!(issues.len(), 1);
    }
}
