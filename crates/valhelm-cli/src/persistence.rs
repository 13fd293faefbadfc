//! Configuration file persistence
//!
//! Commands follow the same lifecycle: acquire the exclusive lock, load the
//! document, run store operations, save. The lock guarantees at-most-one
//! writer across process invocations; the previous file contents are kept as
//! a `.bak` backup before each save.

use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use valhelm_backend::BackendRegistry;
use valhelm_core::ConfigStore;

use crate::error::{CliError, Result};

/// A configuration file on disk
#[derive(Debug, Clone)]
pub struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    fn lock_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "valhelm.json".to_string());
        self.path.with_file_name(format!(".{name}.lock"))
    }

    fn backup_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "valhelm.json".to_string());
        self.path.with_file_name(format!("{name}.bak"))
    }

    /// Acquire the exclusive advisory lock for this file.
    ///
    /// Held for the whole load-mutate-save cycle; released on drop.
    pub fn lock(&self) -> Result<FileLock> {
        let lock_path = self.lock_path();
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)?;

        file.try_lock_exclusive().map_err(|_| CliError::Locked {
            path: lock_path.display().to_string(),
        })?;

        tracing::debug!(path = %lock_path.display(), "acquired lock");
        Ok(FileLock { file, lock_path })
    }

    /// Load the store with the process's secret-backend adapters
    pub fn load(&self, registry: BackendRegistry) -> Result<ConfigStore> {
        if !self.exists() {
            return Err(CliError::config_with_help(
                format!("Configuration file {} not found", self.path.display()),
                "initialize one with: valhelm init <release>",
            ));
        }

        let content = fs::read_to_string(&self.path)?;
        ConfigStore::from_json_with(&content, registry).map_err(CliError::from)
    }

    /// Save the store, keeping the previous contents as a backup
    pub fn save(&self, store: &ConfigStore) -> Result<()> {
        let content = store.to_json_pretty().map_err(CliError::from)?;

        if self.exists() {
            fs::copy(&self.path, self.backup_path())?;
        }
        fs::write(&self.path, content + "\n")?;

        tracing::debug!(path = %self.path.display(), "saved configuration");
        Ok(())
    }
}

/// Held exclusive lock, released on drop
#[derive(Debug)]
pub struct FileLock {
    file: File,
    lock_path: PathBuf,
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs2::FileExt::unlock(&self.file);
        tracing::debug!(path = %self.lock_path.display(), "released lock");
    }
}
