//! Path entries
//!
//! A `PathEntry` owns the metadata and the per-deployment value collection for
//! one configuration path. Deployment existence is the store's job; the entry
//! enforces the path-local rules (sensitivity vs backend) and delegates the
//! rest to its values.

use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use std::sync::Arc;

use valhelm_backend::{BackendRegistry, SimpleBackend};

use crate::deployment::Deployment;
use crate::error::{Result, StoreError};
use crate::metadata::PathMetadata;
use crate::path::ValuePath;
use crate::value::{Value, ensure_scalar};

/// Metadata and per-deployment values for one configuration path
#[derive(Debug, Clone)]
pub struct PathEntry {
    path: ValuePath,
    metadata: PathMetadata,
    values: IndexMap<String, Value>,
}

impl PathEntry {
    /// Create an entry with no values
    pub fn new(path: ValuePath, metadata: PathMetadata) -> Self {
        Self {
            path,
            metadata,
            values: IndexMap::new(),
        }
    }

    pub fn path(&self) -> &ValuePath {
        &self.path
    }

    pub fn metadata(&self) -> &PathMetadata {
        &self.metadata
    }

    /// The value bound for a deployment, if set
    pub fn value(&self, deployment: &str) -> Option<&Value> {
        self.values.get(deployment)
    }

    /// Deployment names that have a value for this path
    pub fn deployments(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Values per deployment, in insertion order
    pub fn iter_values(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Whether any deployment holds a value
    pub fn has_values(&self) -> bool {
        !self.values.is_empty()
    }

    /// Set a value for a deployment, binding it lazily on first set.
    ///
    /// The scalar check runs before binding so a rejected value never leaves a
    /// dangling binding behind.
    pub(crate) fn set_value(
        &mut self,
        deployment: &Deployment,
        raw: &JsonValue,
        simple: &Arc<SimpleBackend>,
        registry: &Arc<BackendRegistry>,
    ) -> Result<()> {
        ensure_scalar(&self.path, deployment.name(), raw)?;

        if let Some(value) = self.values.get(deployment.name()) {
            return value.set(raw);
        }

        let value = Value::bind(&self.path, deployment, self.metadata.sensitive, simple, registry)?;
        value.set(raw)?;
        self.values.insert(deployment.name().to_string(), value);
        Ok(())
    }

    /// Insert an already-bound value (document load)
    pub(crate) fn insert_loaded(&mut self, deployment: &str, value: Value) {
        self.values.insert(deployment.to_string(), value);
    }

    /// Remove the value for a deployment, clearing its backend storage
    pub(crate) fn remove_value(&mut self, deployment: &str) -> Result<()> {
        let value = self
            .values
            .get(deployment)
            .ok_or_else(|| StoreError::ValueNotSet {
                path: self.path.to_string(),
                deployment: deployment.to_string(),
            })?;
        value.remove()?;
        self.values.shift_remove(deployment);
        Ok(())
    }

    /// Remove every value (forced path removal)
    pub(crate) fn clear_values(&mut self) -> Result<()> {
        for value in self.values.values() {
            value.remove()?;
        }
        self.values.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use valhelm_backend::{BackendKind, MemoryBackend};

    fn context() -> (Arc<SimpleBackend>, Arc<BackendRegistry>) {
        let mut registry = BackendRegistry::new();
        registry.register(Arc::new(MemoryBackend::new(BackendKind::Aws)));
        (Arc::new(SimpleBackend::new()), Arc::new(registry))
    }

    fn aws_deployment(name: &str) -> Deployment {
        let mut deployment = Deployment::new(name);
        let mut config = IndexMap::new();
        config.insert("region".to_string(), JsonValue::from("eu-west-1"));
        deployment.attach_backend(BackendKind::Aws, config).unwrap();
        deployment
    }

    #[test]
    fn test_set_and_get_value() {
        let (simple, registry) = context();
        let mut entry = PathEntry::new(
            ValuePath::parse("app.replicas").unwrap(),
            PathMetadata::default(),
        );
        let dev = Deployment::new("dev");

        entry
            .set_value(&dev, &JsonValue::from(3), &simple, &registry)
            .unwrap();

        let value = entry.value("dev").unwrap();
        assert_eq!(value.get(true).unwrap(), JsonValue::from(3));
        assert!(entry.value("prod").is_none());
    }

    #[test]
    fn test_sensitive_value_against_no_backend_fails() {
        let (simple, registry) = context();
        let mut entry = PathEntry::new(
            ValuePath::parse("app.db.password").unwrap(),
            PathMetadata::new(None, true, true),
        );
        let dev = Deployment::new("dev");

        let err = entry
            .set_value(&dev, &JsonValue::from("x"), &simple, &registry)
            .unwrap_err();
        assert!(matches!(err, StoreError::SensitiveValueNoBackend { .. }));
        assert!(!entry.has_values());
    }

    #[test]
    fn test_sensitive_value_with_backend_succeeds() {
        let (simple, registry) = context();
        let mut entry = PathEntry::new(
            ValuePath::parse("app.db.password").unwrap(),
            PathMetadata::new(None, true, true),
        );
        let prod = aws_deployment("prod");

        entry
            .set_value(&prod, &JsonValue::from("hunter2"), &simple, &registry)
            .unwrap();

        let value = entry.value("prod").unwrap();
        assert_eq!(
            value.get(false).unwrap(),
            JsonValue::from("secret://aws/app.db.password:prod")
        );
    }

    #[test]
    fn test_rejected_value_leaves_no_binding() {
        let (simple, registry) = context();
        let mut entry = PathEntry::new(
            ValuePath::parse("app.ports").unwrap(),
            PathMetadata::default(),
        );
        let dev = Deployment::new("dev");

        let err = entry
            .set_value(&dev, &serde_json::json!({"http": 80}), &simple, &registry)
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidValueType { .. }));
        assert!(!entry.has_values());
        assert!(simple.is_empty());
    }

    #[test]
    fn test_remove_value() {
        let (simple, registry) = context();
        let mut entry = PathEntry::new(
            ValuePath::parse("app.replicas").unwrap(),
            PathMetadata::default(),
        );
        let dev = Deployment::new("dev");

        entry
            .set_value(&dev, &JsonValue::from(1), &simple, &registry)
            .unwrap();
        entry.remove_value("dev").unwrap();

        assert!(!entry.has_values());
        assert!(simple.is_empty());
        assert!(matches!(
            entry.remove_value("dev"),
            Err(StoreError::ValueNotSet { .. })
        ));
    }

    #[test]
    fn test_clear_values() {
        let (simple, registry) = context();
        let mut entry = PathEntry::new(
            ValuePath::parse("app.replicas").unwrap(),
            PathMetadata::default(),
        );

        entry
            .set_value(&Deployment::new("dev"), &JsonValue::from(1), &simple, &registry)
            .unwrap();
        entry
            .set_value(&Deployment::new("prod"), &JsonValue::from(5), &simple, &registry)
            .unwrap();

        entry.clear_values().unwrap();
        assert!(!entry.has_values());
        assert!(simple.is_empty());
    }
}
