//! Configuration path syntax
//!
//! Paths are dot-delimited keys locating a value inside the rendered tree,
//! e.g. `app.db.password`. Segments are limited to `[A-Za-z0-9_-]`, which
//! keeps `:` free as the storage-key separator and `.` free as the segment
//! delimiter.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use crate::error::{Result, StoreError};

static PATH_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_-]+(\.[A-Za-z0-9_-]+)*$").expect("path pattern compiles")
});

/// A validated configuration path
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValuePath(String);

impl ValuePath {
    /// Parse and validate a path string
    pub fn parse(path: &str) -> Result<Self> {
        if !Self::is_valid(path) {
            return Err(StoreError::InvalidPathFormat {
                path: path.to_string(),
            });
        }
        Ok(Self(path.to_string()))
    }

    /// Whether a string is a syntactically valid path
    pub fn is_valid(path: &str) -> bool {
        PATH_PATTERN.is_match(path)
    }

    /// The path as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterate the dot-separated segments
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    /// Derive the backend storage key for this path in a deployment.
    ///
    /// `:` cannot occur inside a path, so the first `:` in a key always
    /// terminates the path part and keys are collision-free store-wide.
    pub fn storage_key(&self, deployment: &str) -> String {
        format!("{}:{deployment}", self.0)
    }
}

impl fmt::Display for ValuePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ValuePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
