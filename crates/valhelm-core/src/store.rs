//! Configuration store
//!
//! `ConfigStore` is the single source of truth: it owns the path map and the
//! deployment map, enforces the global invariants, and is the only surface
//! callers drive. Mutations fail fast and leave the store untouched on error;
//! whole-store checks live in `validate` and `render`.

use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use std::sync::Arc;

use valhelm_backend::{AuthMethod, BackendKind, BackendRegistry, SimpleBackend};

use crate::deployment::Deployment;
use crate::entry::PathEntry;
use crate::error::{Result, StoreError};
use crate::metadata::PathMetadata;
use crate::path::ValuePath;
use crate::schema::SUPPORTED_VERSION;
use crate::suggest::closest_match;

/// Top-level aggregate over paths, deployments and their values
#[derive(Debug)]
pub struct ConfigStore {
    pub(crate) version: String,
    pub(crate) release: String,
    pub(crate) deployments: IndexMap<String, Deployment>,
    pub(crate) paths: IndexMap<String, PathEntry>,
    pub(crate) simple: Arc<SimpleBackend>,
    pub(crate) registry: Arc<BackendRegistry>,
}

impl ConfigStore {
    /// Create an empty store for a release, with no secret-backend adapters
    pub fn new(release: impl Into<String>) -> Result<Self> {
        Self::with_registry(release, BackendRegistry::new())
    }

    /// Create an empty store with the process's secret-backend adapters
    pub fn with_registry(release: impl Into<String>, registry: BackendRegistry) -> Result<Self> {
        let release = release.into();
        if release.is_empty() {
            return Err(StoreError::InvalidReleaseName { name: release });
        }

        Ok(Self {
            version: SUPPORTED_VERSION.to_string(),
            release,
            deployments: IndexMap::new(),
            paths: IndexMap::new(),
            simple: Arc::new(SimpleBackend::new()),
            registry: Arc::new(registry),
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn release(&self) -> &str {
        &self.release
    }

    /// Deployments in insertion order
    pub fn deployments(&self) -> impl Iterator<Item = &Deployment> {
        self.deployments.values()
    }

    pub fn deployment(&self, name: &str) -> Option<&Deployment> {
        self.deployments.get(name)
    }

    /// Path entries in insertion order
    pub fn paths(&self) -> impl Iterator<Item = &PathEntry> {
        self.paths.values()
    }

    pub fn path(&self, path: &str) -> Option<&PathEntry> {
        self.paths.get(path)
    }

    // =========================================================================
    // Path operations
    // =========================================================================

    /// Add a configuration path with its metadata
    pub fn add_path(&mut self, path: &str, metadata: PathMetadata) -> Result<()> {
        let parsed = ValuePath::parse(path)?;
        if self.paths.contains_key(parsed.as_str()) {
            return Err(StoreError::DuplicatePath {
                path: path.to_string(),
            });
        }

        tracing::debug!(%path, "adding configuration path");
        self.paths
            .insert(parsed.as_str().to_string(), PathEntry::new(parsed, metadata));
        Ok(())
    }

    /// Remove a configuration path.
    ///
    /// Fails with `PathInUse` while any deployment still holds a value,
    /// unless `force` is given, in which case all values are removed first.
    pub fn remove_path(&mut self, path: &str, force: bool) -> Result<()> {
        let suggestion = closest_match(path, self.paths.keys().map(String::as_str));
        let entry = self
            .paths
            .get_mut(path)
            .ok_or_else(|| StoreError::PathNotFound {
                path: path.to_string(),
                suggestion,
            })?;

        if entry.has_values() {
            if !force {
                return Err(StoreError::PathInUse {
                    path: path.to_string(),
                    deployments: entry.deployments().map(str::to_string).collect(),
                });
            }
            entry.clear_values()?;
        }

        tracing::debug!(%path, force, "removing configuration path");
        self.paths.shift_remove(path);
        Ok(())
    }

    // =========================================================================
    // Deployment operations
    // =========================================================================

    /// Add a deployment with the `no-backend`/`no-auth` defaults
    pub fn add_deployment(&mut self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(StoreError::InvalidDeploymentName {
                name: name.to_string(),
            });
        }
        if self.deployments.contains_key(name) {
            return Err(StoreError::DuplicateDeployment {
                name: name.to_string(),
            });
        }

        tracing::debug!(deployment = %name, "adding deployment");
        self.deployments
            .insert(name.to_string(), Deployment::new(name));
        Ok(())
    }

    /// Attach a backend to a deployment.
    ///
    /// Switching to a different backend while sensitive values still
    /// reference the current one would dangle their stored references, so it
    /// fails with `DeploymentInUse`; remove those values first.
    pub fn attach_backend(
        &mut self,
        name: &str,
        kind: BackendKind,
        config: IndexMap<String, JsonValue>,
    ) -> Result<()> {
        let suggestion = closest_match(name, self.deployments.keys().map(String::as_str));
        let Some(deployment) = self.deployments.get_mut(name) else {
            return Err(StoreError::DeploymentNotFound {
                name: name.to_string(),
                suggestion,
            });
        };

        if kind != deployment.backend() {
            let sensitive_in_use: Vec<String> = self
                .paths
                .values()
                .filter(|entry| entry.metadata().sensitive && entry.value(name).is_some())
                .map(|entry| entry.path().to_string())
                .collect();
            if !sensitive_in_use.is_empty() {
                return Err(StoreError::DeploymentInUse {
                    name: name.to_string(),
                    paths: sensitive_in_use,
                });
            }
        }

        deployment.attach_backend(kind, config)?;
        Ok(())
    }

    /// Attach an auth method to a deployment, validated through the backend
    /// capability
    pub fn attach_auth(&mut self, name: &str, auth: AuthMethod) -> Result<()> {
        let suggestion = closest_match(name, self.deployments.keys().map(String::as_str));
        let Some(deployment) = self.deployments.get_mut(name) else {
            return Err(StoreError::DeploymentNotFound {
                name: name.to_string(),
                suggestion,
            });
        };

        let adapter = self.registry.adapter(deployment.backend());
        deployment.attach_auth(auth, adapter)?;
        Ok(())
    }

    /// Remove a deployment that no path references
    pub fn remove_deployment(&mut self, name: &str) -> Result<()> {
        if !self.deployments.contains_key(name) {
            return Err(StoreError::DeploymentNotFound {
                name: name.to_string(),
                suggestion: closest_match(name, self.deployments.keys().map(String::as_str)),
            });
        }

        let referencing: Vec<String> = self
            .paths
            .values()
            .filter(|entry| entry.value(name).is_some())
            .map(|entry| entry.path().to_string())
            .collect();
        if !referencing.is_empty() {
            return Err(StoreError::DeploymentInUse {
                name: name.to_string(),
                paths: referencing,
            });
        }

        tracing::debug!(deployment = %name, "removing deployment");
        self.deployments.shift_remove(name);
        Ok(())
    }

    // =========================================================================
    // Value operations
    // =========================================================================

    /// Set a value for a path and deployment
    pub fn set_value(&mut self, path: &str, deployment: &str, value: JsonValue) -> Result<()> {
        let Some(target) = self.deployments.get(deployment) else {
            return Err(StoreError::DeploymentNotFound {
                name: deployment.to_string(),
                suggestion: closest_match(deployment, self.deployments.keys().map(String::as_str)),
            });
        };
        let suggestion = closest_match(path, self.paths.keys().map(String::as_str));
        let Some(entry) = self.paths.get_mut(path) else {
            return Err(StoreError::PathNotFound {
                path: path.to_string(),
                suggestion,
            });
        };

        tracing::debug!(%path, deployment, "setting value");
        entry.set_value(target, &value, &self.simple, &self.registry)
    }

    /// Remove the value for a path and deployment
    pub fn remove_value(&mut self, path: &str, deployment: &str) -> Result<()> {
        if !self.deployments.contains_key(deployment) {
            return Err(StoreError::DeploymentNotFound {
                name: deployment.to_string(),
                suggestion: closest_match(deployment, self.deployments.keys().map(String::as_str)),
            });
        }
        let suggestion = closest_match(path, self.paths.keys().map(String::as_str));
        let Some(entry) = self.paths.get_mut(path) else {
            return Err(StoreError::PathNotFound {
                path: path.to_string(),
                suggestion,
            });
        };

        tracing::debug!(%path, deployment, "removing value");
        entry.remove_value(deployment)
    }

    /// Get the value for a path and deployment.
    ///
    /// With `resolve = false`, sensitive values yield their raw `secret://`
    /// reference string; no backend credentials are required.
    pub fn get_value(&self, path: &str, deployment: &str, resolve: bool) -> Result<JsonValue> {
        if !self.deployments.contains_key(deployment) {
            return Err(StoreError::DeploymentNotFound {
                name: deployment.to_string(),
                suggestion: closest_match(deployment, self.deployments.keys().map(String::as_str)),
            });
        }
        let entry = self
            .paths
            .get(path)
            .ok_or_else(|| StoreError::PathNotFound {
                path: path.to_string(),
                suggestion: closest_match(path, self.paths.keys().map(String::as_str)),
            })?;

        let value = entry
            .value(deployment)
            .ok_or_else(|| StoreError::ValueNotSet {
                path: path.to_string(),
                deployment: deployment.to_string(),
            })?;
        value.get(resolve)
    }
}
