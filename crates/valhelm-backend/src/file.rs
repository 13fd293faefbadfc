//! File-backed secret backend for local development
//!
//! Persists secrets as a JSON map in a local file so they survive across
//! process invocations, the way git-secret keeps secret material alongside
//! the repository. Contents are NOT encrypted; this backend is a development
//! stand-in, not a production secret manager.

use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::auth::BackendKind;
use crate::backend::ValueBackend;
use crate::error::{BackendError, Result};

/// Local-file secret backend
#[derive(Debug)]
pub struct FileBackend {
    kind: BackendKind,
    path: PathBuf,
}

impl FileBackend {
    /// Create a backend storing secrets for `kind` in `path`
    pub fn new(kind: BackendKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }

    /// The file secrets are stored in
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, err: impl std::fmt::Display) -> BackendError {
        BackendError::Unreachable {
            backend: self.kind,
            message: format!("{}: {err}", self.path.display()),
        }
    }

    fn load(&self) -> Result<BTreeMap<String, JsonValue>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        serde_json::from_str(&content).map_err(|e| self.io_error(e))
    }

    fn save(&self, secrets: &BTreeMap<String, JsonValue>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let content = serde_json::to_string_pretty(secrets).map_err(|e| self.io_error(e))?;
        fs::write(&self.path, content).map_err(|e| self.io_error(e))
    }
}

impl ValueBackend for FileBackend {
    fn kind(&self) -> BackendKind {
        self.kind
    }

    fn get_value(&self, key: &str) -> Result<JsonValue> {
        self.load()?
            .get(key)
            .cloned()
            .ok_or_else(|| BackendError::SecretNotFound {
                key: key.to_string(),
            })
    }

    fn set_value(&self, key: &str, value: &JsonValue) -> Result<()> {
        let mut secrets = self.load()?;
        secrets.insert(key.to_string(), value.clone());
        self.save(&secrets)
    }

    fn remove_value(&self, key: &str) -> Result<()> {
        let mut secrets = self.load()?;
        if secrets.remove(key).is_none() {
            return Err(BackendError::SecretNotFound {
                key: key.to_string(),
            });
        }
        self.save(&secrets)
    }
}
