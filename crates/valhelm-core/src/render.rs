//! Deployment rendering
//!
//! Generation resolves every value set for one deployment and assembles the
//! nested values tree by exploding each dot-path into nested keys. Missing
//! required values are aggregated so a user fixes all of them in one pass; a
//! leaf/interior collision is fatal. Paths are processed in sorted order so
//! conflict detection does not depend on insertion order.

use serde_json::{Map, Value as JsonValue};

use crate::entry::PathEntry;
use crate::error::{Result, StoreError};
use crate::path::ValuePath;
use crate::store::ConfigStore;
use crate::suggest::closest_match;

/// A rendered values tree for one deployment, containing only resolved values
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedValues(JsonValue);

impl RenderedValues {
    /// The tree as a JSON value
    pub fn inner(&self) -> &JsonValue {
        &self.0
    }

    pub fn into_inner(self) -> JsonValue {
        self.0
    }

    /// Render as YAML, the form Helm consumes
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(&self.0)?)
    }

    /// Render as pretty-printed JSON
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.0)?)
    }
}

/// Builds the nested tree, tracking leaf vs interior occupancy per node
struct TreeBuilder {
    root: Map<String, JsonValue>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self { root: Map::new() }
    }

    fn insert(&mut self, path: &ValuePath, value: JsonValue) -> Result<()> {
        let segments: Vec<&str> = path.segments().collect();
        insert_at(&mut self.root, path, &segments, value, 0)
    }

    fn into_root(self) -> Map<String, JsonValue> {
        self.root
    }
}

fn insert_at(
    node: &mut Map<String, JsonValue>,
    full: &ValuePath,
    segments: &[&str],
    value: JsonValue,
    depth: usize,
) -> Result<()> {
    let segment = segments[depth];

    if depth + 1 == segments.len() {
        // Leaf position: an existing subtree here means some deeper path
        // already claimed this node as interior.
        if matches!(node.get(segment), Some(JsonValue::Object(_))) {
            return Err(StoreError::PathConflict {
                path: full.to_string(),
                ancestor: segments[..=depth].join("."),
            });
        }
        node.insert(segment.to_string(), value);
        return Ok(());
    }

    let child = node
        .entry(segment.to_string())
        .or_insert_with(|| JsonValue::Object(Map::new()));
    match child {
        JsonValue::Object(map) => insert_at(map, full, segments, value, depth + 1),
        // Interior needed, but a leaf value sits at this prefix
        _ => Err(StoreError::PathConflict {
            path: full.to_string(),
            ancestor: segments[..=depth].join("."),
        }),
    }
}

impl ConfigStore {
    /// Render the values tree for one deployment.
    ///
    /// Fails with `MissingRequiredValues` listing every required path without
    /// a value, with `PathConflict` on a leaf/interior collision, or with a
    /// typed backend error when resolution fails. Output is only produced
    /// when no violation was found.
    pub fn render(&self, deployment: &str) -> Result<RenderedValues> {
        if !self.deployments.contains_key(deployment) {
            return Err(StoreError::DeploymentNotFound {
                name: deployment.to_string(),
                suggestion: closest_match(deployment, self.deployments.keys().map(String::as_str)),
            });
        }

        let mut entries: Vec<&PathEntry> = self.paths.values().collect();
        entries.sort_by(|a, b| a.path().as_str().cmp(b.path().as_str()));

        let mut builder = TreeBuilder::new();
        let mut missing: Vec<String> = Vec::new();

        for entry in entries {
            match entry.value(deployment) {
                None => {
                    if entry.metadata().required {
                        missing.push(entry.path().to_string());
                    }
                }
                Some(value) => {
                    let resolved = value.get(true)?;
                    builder.insert(entry.path(), resolved)?;
                }
            }
        }

        if !missing.is_empty() {
            return Err(StoreError::MissingRequiredValues {
                deployment: deployment.to_string(),
                paths: missing,
            });
        }

        tracing::debug!(deployment, "rendered values tree");
        Ok(RenderedValues(JsonValue::Object(builder.into_root())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::PathMetadata;
    use indexmap::IndexMap;
    use std::sync::Arc;
    use valhelm_backend::{BackendKind, BackendRegistry, MemoryBackend};

    fn store() -> ConfigStore {
        let mut registry = BackendRegistry::new();
        registry.register(Arc::new(MemoryBackend::new(BackendKind::Aws)));
        let mut store = ConfigStore::with_registry("my-app", registry).unwrap();
        store.add_deployment("dev").unwrap();
        store
    }

    #[test]
    fn test_nested_tree_assembly() {
        let mut store = store();
        store.add_path("app.name", PathMetadata::default()).unwrap();
        store.add_path("app.db.host", PathMetadata::default()).unwrap();
        store.add_path("app.db.port", PathMetadata::default()).unwrap();
        store.add_path("replicas", PathMetadata::default()).unwrap();

        store.set_value("app.name", "dev", "web".into()).unwrap();
        store.set_value("app.db.host", "dev", "db.local".into()).unwrap();
        store.set_value("app.db.port", "dev", 5432.into()).unwrap();
        store.set_value("replicas", "dev", 2.into()).unwrap();

        let rendered = store.render("dev").unwrap();
        assert_eq!(
            rendered.inner(),
            &serde_json::json!({
                "app": {
                    "name": "web",
                    "db": {"host": "db.local", "port": 5432}
                },
                "replicas": 2
            })
        );
    }

    #[test]
    fn test_unset_optional_paths_are_omitted() {
        let mut store = store();
        store.add_path("app.name", PathMetadata::default()).unwrap();
        store.add_path("app.extra", PathMetadata::default()).unwrap();
        store.set_value("app.name", "dev", "web".into()).unwrap();

        let rendered = store.render("dev").unwrap();
        assert_eq!(
            rendered.inner(),
            &serde_json::json!({"app": {"name": "web"}})
        );
    }

    #[test]
    fn test_missing_required_values_all_reported() {
        let mut store = store();
        store
            .add_path("app.replicas", PathMetadata::new(None, true, false))
            .unwrap();
        store
            .add_path("app.image", PathMetadata::new(None, true, false))
            .unwrap();
        store.add_path("app.note", PathMetadata::default()).unwrap();

        let err = store.render("dev").unwrap_err();
        match err {
            StoreError::MissingRequiredValues { paths, deployment } => {
                assert_eq!(deployment, "dev");
                assert_eq!(paths, vec!["app.image", "app.replicas"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_leaf_interior_conflict_is_order_independent() {
        for (first, second) in [("a", "a.b"), ("a.b", "a")] {
            let mut store = store();
            store.add_path(first, PathMetadata::default()).unwrap();
            store.add_path(second, PathMetadata::default()).unwrap();
            store.set_value(first, "dev", 1.into()).unwrap();
            store.set_value(second, "dev", 2.into()).unwrap();

            let err = store.render("dev").unwrap_err();
            match err {
                StoreError::PathConflict { path, ancestor } => {
                    assert_eq!(path, "a.b");
                    assert_eq!(ancestor, "a");
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn test_deep_conflict() {
        let mut store = store();
        store.add_path("app.db", PathMetadata::default()).unwrap();
        store.add_path("app.db.host", PathMetadata::default()).unwrap();
        store.set_value("app.db", "dev", "inline".into()).unwrap();
        store.set_value("app.db.host", "dev", "h".into()).unwrap();

        let err = store.render("dev").unwrap_err();
        match err {
            StoreError::PathConflict { path, ancestor } => {
                assert_eq!(path, "app.db.host");
                assert_eq!(ancestor, "app.db");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_sensitive_values_resolve_in_output() {
        let mut store = store();
        let mut config = IndexMap::new();
        config.insert("region".to_string(), serde_json::Value::from("eu-west-1"));
        store
            .attach_backend("dev", BackendKind::Aws, config)
            .unwrap();
        store
            .add_path("app.db.password", PathMetadata::new(None, false, true))
            .unwrap();
        store
            .set_value("app.db.password", "dev", "hunter2".into())
            .unwrap();

        let rendered = store.render("dev").unwrap();
        // Output carries the resolved secret, never the reference string
        assert_eq!(
            rendered.inner(),
            &serde_json::json!({"app": {"db": {"password": "hunter2"}}})
        );
    }

    #[test]
    fn test_unknown_deployment() {
        let store = store();
        assert!(matches!(
            store.render("prod"),
            Err(StoreError::DeploymentNotFound { .. })
        ));
    }

    #[test]
    fn test_yaml_output() {
        let mut store = store();
        store.add_path("app.replicas", PathMetadata::default()).unwrap();
        store.set_value("app.replicas", "dev", 3.into()).unwrap();

        let yaml = store.render("dev").unwrap().to_yaml().unwrap();
        assert!(yaml.contains("replicas: 3"));
    }
}
