//! Canonical configuration document
//!
//! The persisted wire form of a store. Kept separate from the runtime model
//! so loading can validate the whole document (JSON Schema + structural
//! checks) before a single store object is built: `from_document` either
//! produces a complete store or nothing.
//!
//! Sensitive values persist as `secret://<backend>/<key>` reference strings;
//! non-sensitive values persist as literal scalars.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;

use valhelm_backend::{AuthMethod, BackendKind, BackendRegistry, SecretRef, ValueBackend};

use crate::deployment::Deployment;
use crate::entry::PathEntry;
use crate::error::{Result, StoreError};
use crate::metadata::PathMetadata;
use crate::path::ValuePath;
use crate::schema::{self, SUPPORTED_VERSION};
use crate::store::ConfigStore;
use crate::value::{Value, ensure_scalar};

/// Top-level configuration document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigDocument {
    pub version: String,
    pub release: String,
    #[serde(default)]
    pub deployments: IndexMap<String, DeploymentSpec>,
    #[serde(default)]
    pub config: Vec<PathSpec>,
}

/// Persisted form of one deployment (the name is the map key)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentSpec {
    pub backend: BackendKind,
    pub auth: AuthMethod,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub backend_config: IndexMap<String, JsonValue>,
}

/// Persisted form of one path entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSpec {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub sensitive: bool,
    #[serde(default)]
    pub values: IndexMap<String, JsonValue>,
}

impl ConfigStore {
    /// Produce the canonical document for this store
    pub fn to_document(&self) -> Result<ConfigDocument> {
        let mut deployments = IndexMap::new();
        for (name, deployment) in &self.deployments {
            deployments.insert(
                name.clone(),
                DeploymentSpec {
                    backend: deployment.backend(),
                    auth: deployment.auth().clone(),
                    backend_config: deployment.backend_config().clone(),
                },
            );
        }

        let mut config = Vec::new();
        for entry in self.paths.values() {
            let mut values = IndexMap::new();
            for (name, value) in entry.iter_values() {
                // resolve=false: secrets persist as references, never content
                values.insert(name.to_string(), value.get(false)?);
            }
            config.push(PathSpec {
                path: entry.path().to_string(),
                description: entry.metadata().description.clone(),
                required: entry.metadata().required,
                sensitive: entry.metadata().sensitive,
                values,
            });
        }

        Ok(ConfigDocument {
            version: self.version.clone(),
            release: self.release.clone(),
            deployments,
            config,
        })
    }

    /// Serialize the canonical document as pretty-printed JSON
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_document()?)?)
    }

    /// Build a store from a document, with no secret-backend adapters
    pub fn from_document(doc: ConfigDocument) -> Result<Self> {
        Self::from_document_with(doc, BackendRegistry::new())
    }

    /// Build a store from a document and the process's adapters.
    ///
    /// Fails atomically: every structural violation aborts the load before a
    /// store is returned.
    pub fn from_document_with(doc: ConfigDocument, registry: BackendRegistry) -> Result<Self> {
        let ConfigDocument {
            version,
            release,
            deployments,
            config,
        } = doc;

        if version != SUPPORTED_VERSION {
            return Err(StoreError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSION.to_string(),
            });
        }

        let mut store = ConfigStore::with_registry(release, registry)?;

        for (name, spec) in deployments {
            if name.is_empty() {
                return Err(StoreError::InvalidDeploymentName { name });
            }
            store.deployments.insert(
                name.clone(),
                Deployment::from_parts(name, spec.backend, spec.auth, spec.backend_config),
            );
        }

        for spec in config {
            let PathSpec {
                path,
                description,
                required,
                sensitive,
                values,
            } = spec;

            let path = ValuePath::parse(&path)?;
            if store.paths.contains_key(path.as_str()) {
                return Err(StoreError::DuplicatePath {
                    path: path.to_string(),
                });
            }

            let mut entry =
                PathEntry::new(path.clone(), PathMetadata::new(description, required, sensitive));

            for (deployment_name, raw) in values {
                let Some(deployment) = store.deployments.get(&deployment_name) else {
                    return Err(StoreError::DeploymentNotFound {
                        name: deployment_name,
                        suggestion: None,
                    });
                };

                if sensitive {
                    let value =
                        load_secret_reference(&path, deployment, &raw, &store.registry)?;
                    entry.insert_loaded(&deployment_name, value);
                } else {
                    ensure_scalar(&path, &deployment_name, &raw)?;
                    store
                        .simple
                        .set_value(&path.storage_key(&deployment_name), &raw)?;
                    let value =
                        Value::bind(&path, deployment, false, &store.simple, &store.registry)?;
                    entry.insert_loaded(&deployment_name, value);
                }
            }

            store.paths.insert(path.as_str().to_string(), entry);
        }

        Ok(store)
    }

    /// Parse and validate a JSON document, with no secret-backend adapters
    pub fn from_json(text: &str) -> Result<Self> {
        Self::from_json_with(text, BackendRegistry::new())
    }

    /// Parse and validate a JSON document.
    ///
    /// Schema validation runs on the raw value first and reports every
    /// violation at once; only a schema-valid document is deserialized and
    /// loaded.
    pub fn from_json_with(text: &str, registry: BackendRegistry) -> Result<Self> {
        let raw: JsonValue = serde_json::from_str(text)?;

        let violations = schema::validate_document(&raw);
        if !violations.is_empty() {
            return Err(StoreError::SchemaValidation { violations });
        }

        let doc: ConfigDocument = serde_json::from_value(raw)?;
        Self::from_document_with(doc, registry)
    }
}

fn load_secret_reference(
    path: &ValuePath,
    deployment: &Deployment,
    raw: &JsonValue,
    registry: &Arc<BackendRegistry>,
) -> Result<Value> {
    if !deployment.has_secret_backend() {
        return Err(StoreError::SensitiveValueNoBackend {
            path: path.to_string(),
            deployment: deployment.name().to_string(),
        });
    }

    let invalid = |reason: String| StoreError::InvalidSecretReference {
        path: path.to_string(),
        deployment: deployment.name().to_string(),
        reason,
    };

    let raw_str = raw
        .as_str()
        .ok_or_else(|| invalid("sensitive values must persist as secret:// references".into()))?;
    let reference = SecretRef::parse(raw_str)
        .ok_or_else(|| invalid(format!("'{raw_str}' is not a valid secret reference")))?;
    if reference.kind() != deployment.backend() {
        return Err(invalid(format!(
            "reference backend '{}' does not match deployment backend '{}'",
            reference.kind(),
            deployment.backend()
        )));
    }

    Ok(Value::from_reference(
        path,
        deployment.name(),
        reference,
        registry,
    ))
}
