//! Secret-backend adapters available to this build
//!
//! Cloud SDK adapters (AWS, Azure, GCP) satisfy the same `ValueBackend`
//! contract and register here when built in. This build ships file-backed
//! local adapters: secrets live unencrypted under `.valhelm-secrets/` next to
//! the configuration file, which is enough for development workflows and for
//! git-secret style repositories.

use std::path::Path;
use std::sync::Arc;

use valhelm_backend::{BackendKind, BackendRegistry, FileBackend};

/// Directory holding local secret files, relative to the configuration file
const SECRETS_DIR: &str = ".valhelm-secrets";

/// Build the adapter registry for a configuration file location
pub fn registry_for(config_path: &Path) -> BackendRegistry {
    let base = config_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(SECRETS_DIR);

    let mut registry = BackendRegistry::new();
    for kind in BackendKind::SECRET_KINDS {
        let file = base.join(format!("{kind}.json"));
        registry.register(Arc::new(FileBackend::new(*kind, file)));
    }
    registry
}
