//! Whole-store validation
//!
//! `validate` aggregates every violation it finds, never stopping at the
//! first, so callers can report all problems in one pass. Each finding
//! carries enough context (path, deployment, field) to render an actionable
//! message.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use crate::schema::SUPPORTED_VERSION;
use crate::store::ConfigStore;

static RELEASE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    // What Helm accepts as a release name (RFC 1123 label)
    Regex::new(r"^[a-z0-9]([a-z0-9-]*[a-z0-9])?$").expect("release pattern compiles")
});

/// Categories of validation findings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindingKind {
    MissingRequiredValue,
    DanglingDeploymentReference,
    InvalidAuthConfig,
    InvalidBackendConfig,
    InvalidReleaseName,
    UnsupportedVersion,
}

/// A single validation finding with its context
#[derive(Debug, Clone)]
pub struct Finding {
    pub kind: FindingKind,
    /// The configuration path involved, if any
    pub path: Option<String>,
    /// The deployment involved, if any
    pub deployment: Option<String>,
    pub message: String,
}

impl Finding {
    fn new(kind: FindingKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            path: None,
            deployment: None,
            message: message.into(),
        }
    }

    fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    fn with_deployment(mut self, deployment: impl Into<String>) -> Self {
        self.deployment = Some(deployment.into());
        self
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(deployment) = &self.deployment {
            write!(f, "[{deployment}] ")?;
        }
        if let Some(path) = &self.path {
            write!(f, "{path}: ")?;
        }
        f.write_str(&self.message)
    }
}

/// The aggregated result of a whole-store validation pass
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    findings: Vec<Finding>,
}

impl ValidationReport {
    /// Whether no violation was found
    pub fn is_valid(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    fn push(&mut self, finding: Finding) {
        self.findings.push(finding);
    }
}

impl ConfigStore {
    /// Validate the whole store, collecting every violation
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::default();

        if self.version != SUPPORTED_VERSION {
            report.push(Finding::new(
                FindingKind::UnsupportedVersion,
                format!(
                    "unsupported version '{}' (supported: {SUPPORTED_VERSION})",
                    self.version
                ),
            ));
        }

        if !RELEASE_PATTERN.is_match(&self.release) {
            report.push(Finding::new(
                FindingKind::InvalidReleaseName,
                format!("'{}' is not a valid Helm release name", self.release),
            ));
        }

        // Backend/auth configuration per deployment
        for deployment in self.deployments.values() {
            for key in deployment
                .backend()
                .missing_config_keys(deployment.backend_config())
            {
                report.push(
                    Finding::new(
                        FindingKind::InvalidBackendConfig,
                        format!(
                            "backend '{}' requires config key '{key}'",
                            deployment.backend()
                        ),
                    )
                    .with_deployment(deployment.name()),
                );
            }

            for issue in deployment.backend().validate_auth(deployment.auth()) {
                report.push(
                    Finding::new(FindingKind::InvalidAuthConfig, issue.to_string())
                        .with_deployment(deployment.name()),
                );
            }
        }

        // Required values must exist for every deployment
        for entry in self.paths.values() {
            if entry.metadata().required {
                for name in self.deployments.keys() {
                    if entry.value(name).is_none() {
                        report.push(
                            Finding::new(
                                FindingKind::MissingRequiredValue,
                                "required path has no value".to_string(),
                            )
                            .with_path(entry.path().as_str())
                            .with_deployment(name),
                        );
                    }
                }
            }

            // Values referencing deployments that no longer exist
            for name in entry.deployments() {
                if !self.deployments.contains_key(name) {
                    report.push(
                        Finding::new(
                            FindingKind::DanglingDeploymentReference,
                            "value references an unknown deployment".to_string(),
                        )
                        .with_path(entry.path().as_str())
                        .with_deployment(name),
                    );
                }
            }
        }

        report
    }
}
