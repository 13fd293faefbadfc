//! End-to-end scenarios driving the full store surface

use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use std::sync::Arc;

use valhelm_backend::{AuthMethod, BackendKind, BackendRegistry, MemoryBackend};
use valhelm_core::{ConfigStore, PathMetadata, StoreError};

fn registry_with(kinds: &[BackendKind]) -> BackendRegistry {
    let mut registry = BackendRegistry::new();
    for kind in kinds {
        registry.register(Arc::new(MemoryBackend::new(*kind)));
    }
    registry
}

fn aws_config() -> IndexMap<String, JsonValue> {
    let mut config = IndexMap::new();
    config.insert("region".to_string(), JsonValue::from("eu-west-1"));
    config
}

/// Full lifecycle: a sensitive path cannot be set against a no-backend
/// deployment; after attaching a backend and auth, the same set succeeds and
/// rendering emits the resolved tree.
#[test]
fn sensitive_value_lifecycle_to_rendered_output() {
    let mut store =
        ConfigStore::with_registry("my-app", registry_with(&[BackendKind::Aws])).unwrap();

    store
        .add_path("app.replicas", PathMetadata::new(None, true, false))
        .unwrap();
    store
        .add_path("app.db.password", PathMetadata::new(None, true, true))
        .unwrap();
    store.add_deployment("dev").unwrap();

    // dev still has backend=no-backend
    let err = store
        .set_value("app.db.password", "dev", JsonValue::from("hunter2"))
        .unwrap_err();
    assert!(matches!(err, StoreError::SensitiveValueNoBackend { .. }));

    store
        .attach_backend("dev", BackendKind::Aws, aws_config())
        .unwrap();
    store
        .attach_auth(
            "dev",
            AuthMethod::Env {
                prefix: "VALHELM_".into(),
            },
        )
        .unwrap();

    store
        .set_value("app.db.password", "dev", JsonValue::from("hunter2"))
        .unwrap();

    // Rendering still fails while the other required value is missing
    let err = store.render("dev").unwrap_err();
    match err {
        StoreError::MissingRequiredValues { paths, .. } => {
            assert_eq!(paths, vec!["app.replicas"]);
        }
        other => panic!("unexpected error: {other}"),
    }

    store
        .set_value("app.replicas", "dev", JsonValue::from(3))
        .unwrap();

    let rendered = store.render("dev").unwrap();
    assert_eq!(
        rendered.inner(),
        &serde_json::json!({
            "app": {
                "replicas": 3,
                "db": {"password": "hunter2"}
            }
        })
    );
}

/// Leaf and interior definitions of the same prefix conflict at render time,
/// regardless of the order the paths were added.
#[test]
fn leaf_interior_conflict() {
    let mut store = ConfigStore::new("my-app").unwrap();
    store.add_deployment("dev").unwrap();
    store.add_path("a", PathMetadata::default()).unwrap();
    store.add_path("a.b", PathMetadata::default()).unwrap();
    store.set_value("a", "dev", JsonValue::from(1)).unwrap();
    store.set_value("a.b", "dev", JsonValue::from(2)).unwrap();

    assert!(matches!(
        store.render("dev"),
        Err(StoreError::PathConflict { .. })
    ));
}

/// Removing a deployment is blocked while values reference it and succeeds
/// once they are gone.
#[test]
fn remove_deployment_guarded_by_values() {
    let mut store = ConfigStore::new("my-app").unwrap();
    store.add_deployment("dev").unwrap();
    store.add_path("app.replicas", PathMetadata::default()).unwrap();
    store
        .set_value("app.replicas", "dev", JsonValue::from(2))
        .unwrap();

    assert!(matches!(
        store.remove_deployment("dev"),
        Err(StoreError::DeploymentInUse { .. })
    ));

    store.remove_value("app.replicas", "dev").unwrap();
    store.remove_deployment("dev").unwrap();
    assert!(store.deployment("dev").is_none());
}

/// A store saved and reloaded through its canonical document behaves
/// identically, including secret resolution through a fresh adapter set.
#[test]
fn persisted_store_roundtrip_with_secrets() {
    let adapter = Arc::new(MemoryBackend::new(BackendKind::Gcp));
    let mut registry = BackendRegistry::new();
    registry.register(adapter.clone());

    let mut store = ConfigStore::with_registry("my-app", registry).unwrap();
    store.add_deployment("prod").unwrap();
    let mut config = IndexMap::new();
    config.insert("project_id".to_string(), JsonValue::from("acme"));
    store
        .attach_backend("prod", BackendKind::Gcp, config)
        .unwrap();
    store
        .add_path("api.token", PathMetadata::new(None, false, true))
        .unwrap();
    store
        .set_value("api.token", "prod", JsonValue::from("tok-123"))
        .unwrap();

    let json = store.to_json_pretty().unwrap();
    assert!(!json.contains("tok-123"));

    // Reload sharing the same adapter, as a fresh process invocation would
    // share the same external secret manager.
    let mut registry = BackendRegistry::new();
    registry.register(adapter);
    let reloaded = ConfigStore::from_json_with(&json, registry).unwrap();

    assert_eq!(
        reloaded.get_value("api.token", "prod", true).unwrap(),
        JsonValue::from("tok-123")
    );
    assert_eq!(
        reloaded.render("prod").unwrap().inner(),
        &serde_json::json!({"api": {"token": "tok-123"}})
    );
}

/// validate() reports one finding per violation across categories.
#[test]
fn validation_finding_count_is_exact() {
    let mut store = ConfigStore::new("my-app").unwrap();
    store.add_deployment("dev").unwrap();
    store.add_deployment("prod").unwrap();
    store
        .add_path("app.image", PathMetadata::new(None, true, false))
        .unwrap();
    store
        .set_value("app.image", "dev", JsonValue::from("nginx"))
        .unwrap();

    // Exactly one violation: app.image has no value for prod
    let report = store.validate();
    assert_eq!(report.len(), 1);

    store
        .set_value("app.image", "prod", JsonValue::from("nginx"))
        .unwrap();
    assert!(store.validate().is_valid());
}

/// An unreachable backend surfaces a typed error instead of being retried or
/// swallowed.
#[test]
fn unreachable_backend_fails_typed() {
    let adapter = Arc::new(MemoryBackend::new(BackendKind::Azure));
    let mut registry = BackendRegistry::new();
    registry.register(adapter.clone());

    let mut store = ConfigStore::with_registry("my-app", registry).unwrap();
    store.add_deployment("prod").unwrap();
    let mut config = IndexMap::new();
    config.insert("vault_url".to_string(), JsonValue::from("https://kv"));
    store
        .attach_backend("prod", BackendKind::Azure, config)
        .unwrap();
    store
        .add_path("db.password", PathMetadata::new(None, false, true))
        .unwrap();
    store
        .set_value("db.password", "prod", JsonValue::from("x"))
        .unwrap();

    adapter.set_unreachable(true);

    assert!(matches!(
        store.get_value("db.password", "prod", true),
        Err(StoreError::Backend(
            valhelm_backend::BackendError::Unreachable { .. }
        ))
    ));
    // Raw reference access needs no backend round-trip
    assert!(store.get_value("db.password", "prod", false).is_ok());
    // Rendering resolves, so it fails the same way
    assert!(matches!(
        store.render("prod"),
        Err(StoreError::Backend(
            valhelm_backend::BackendError::Unreachable { .. }
        ))
    ));
}
