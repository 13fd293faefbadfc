//! Per-path metadata

/// Descriptive and validation attributes of a configuration path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathMetadata {
    /// Human-readable description of what this path configures
    pub description: Option<String>,

    /// Whether every deployment must have a value before rendering succeeds
    pub required: bool,

    /// Whether values must resolve through a secret backend
    pub sensitive: bool,
}

impl PathMetadata {
    pub fn new(description: Option<String>, required: bool, sensitive: bool) -> Self {
        Self {
            description,
            required,
            sensitive,
        }
    }
}
