//! Process-local backend for non-sensitive values
//!
//! Every non-sensitive value in a store routes here regardless of the
//! deployment's configured backend. Contents are rebuilt from the persisted
//! document on each load, so nothing outlives the process.

use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::auth::{AuthConfigIssue, AuthMethod, BackendKind};
use crate::backend::ValueBackend;
use crate::error::{BackendError, Result};

/// In-memory backend for non-sensitive values
///
/// Always available and never fails auth validation. Shared by every
/// non-sensitive value via `Arc`, hence the interior mutex.
#[derive(Debug, Default)]
pub struct SimpleBackend {
    values: Mutex<HashMap<String, JsonValue>>,
}

impl SimpleBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored values
    pub fn len(&self) -> usize {
        self.values.lock().unwrap().len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.values.lock().unwrap().is_empty()
    }
}

impl ValueBackend for SimpleBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::NoBackend
    }

    fn get_value(&self, key: &str) -> Result<JsonValue> {
        self.values
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| BackendError::SecretNotFound {
                key: key.to_string(),
            })
    }

    fn set_value(&self, key: &str, value: &JsonValue) -> Result<()> {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.clone());
        Ok(())
    }

    fn remove_value(&self, key: &str) -> Result<()> {
        self.values
            .lock()
            .unwrap()
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| BackendError::SecretNotFound {
                key: key.to_string(),
            })
    }

    fn validate_auth_config(
        &self,
        _auth: &AuthMethod,
    ) -> std::result::Result<(), Vec<AuthConfigIssue>> {
        // The local map needs no credentials
        Ok(())
    }
}
