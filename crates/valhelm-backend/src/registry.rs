//! Registry of secret-backend adapters
//!
//! The core engine never constructs secret backends itself; the caller
//! registers one adapter per backend kind before handing the registry to a
//! store. Lookups for unregistered kinds fail with `Unavailable`, which is
//! what distinguishes "this deployment uses AWS" from "this process can talk
//! to AWS".

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::auth::BackendKind;
use crate::backend::ValueBackend;
use crate::error::{BackendError, Result};

/// Adapters available to the current process, keyed by backend kind
#[derive(Default, Clone)]
pub struct BackendRegistry {
    adapters: HashMap<BackendKind, Arc<dyn ValueBackend>>,
}

impl BackendRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an adapter under its own kind, replacing any previous one
    pub fn register(&mut self, adapter: Arc<dyn ValueBackend>) {
        self.adapters.insert(adapter.kind(), adapter);
    }

    /// Look up the adapter for a kind, if registered
    pub fn adapter(&self, kind: BackendKind) -> Option<Arc<dyn ValueBackend>> {
        self.adapters.get(&kind).cloned()
    }

    /// Look up the adapter for a kind, failing with `Unavailable`
    pub fn get(&self, kind: BackendKind) -> Result<Arc<dyn ValueBackend>> {
        self.adapter(kind).ok_or_else(|| {
            tracing::warn!(backend = %kind, "no backend adapter registered");
            BackendError::Unavailable { backend: kind }
        })
    }

    /// Whether an adapter is registered for a kind
    pub fn contains(&self, kind: BackendKind) -> bool {
        self.adapters.contains_key(&kind)
    }

    /// Registered kinds, in no particular order
    pub fn kinds(&self) -> impl Iterator<Item = BackendKind> + '_ {
        self.adapters.keys().copied()
    }
}

impl fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendRegistry")
            .field("kinds", &self.adapters.keys().collect::<Vec<_>>())
            .finish()
    }
}
