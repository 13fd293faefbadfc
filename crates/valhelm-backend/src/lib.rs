//! Valhelm Backend - value storage contract for the Helm values and secrets manager
//!
//! This crate defines the capability every value backend must satisfy and ships
//! the local implementations:
//! - `SimpleBackend`: process-local storage for non-sensitive values
//! - `MemoryBackend`: in-memory secret backend for tests
//! - `FileBackend`: file-backed secret backend for local development
//!
//! Cloud secret managers (AWS, Azure, GCP, git-secret) plug in through the same
//! `ValueBackend` trait via a `BackendRegistry`; this crate only specifies the
//! contract they must satisfy, not their wire protocols.

pub mod auth;
pub mod backend;
pub mod error;
pub mod file;
pub mod memory;
pub mod reference;
pub mod registry;
pub mod simple;

pub use auth::{AuthConfigIssue, AuthMethod, BackendKind};
pub use backend::ValueBackend;
pub use error::{BackendError, Result};
pub use file::FileBackend;
pub use memory::{MemoryBackend, OperationCounts};
pub use reference::SecretRef;
pub use registry::BackendRegistry;
pub use simple::SimpleBackend;
