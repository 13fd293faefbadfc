//! Valhelm Core - configuration data model and value-resolution engine
//!
//! This crate provides the foundational types of valhelm:
//! - `ConfigStore`: the top-level aggregate over paths, deployments and values
//! - `PathEntry` / `PathMetadata`: per-path metadata and value collections
//! - `Deployment`: a named target environment with backend/auth configuration
//! - `Value`: a single resolved-value access point bound to a backend
//! - `ConfigDocument`: the canonical persisted form with schema validation
//! - `RenderedValues`: the per-deployment values tree rendering produces

pub mod deployment;
pub mod document;
pub mod entry;
pub mod error;
pub mod metadata;
pub mod path;
pub mod render;
pub mod schema;
pub mod store;
pub mod suggest;
pub mod validate;
pub mod value;

pub use deployment::Deployment;
pub use document::{ConfigDocument, DeploymentSpec, PathSpec};
pub use entry::PathEntry;
pub use error::{Result, StoreError};
pub use metadata::PathMetadata;
pub use path::ValuePath;
pub use render::RenderedValues;
pub use schema::{SUPPORTED_VERSION, SchemaViolation};
pub use store::ConfigStore;
pub use validate::{Finding, FindingKind, ValidationReport};
pub use value::Value;
