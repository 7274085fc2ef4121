use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for module-release operations.
///
/// Every variant is fatal: the release sequence stops at the first error and
/// nothing already written is rolled back.
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Manifest not found: {}", .0.display())]
    MissingManifest(PathBuf),

    #[error("Missing version number")]
    MissingVersion,

    #[error("Incorrect version argument: '{0}' (expected X.Y.Z, major, minor or patch)")]
    InvalidVersionArgument(String),

    #[error("Target version {0} is identical to current version")]
    NoOpVersion(String),

    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Watch error: {0}")]
    Watch(#[from] notify::Error),

    #[error("Link error: {0}")]
    Link(String),
}

/// Convenience type alias for Results in module-release
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a missing-configuration error with context
    pub fn missing_config(msg: impl Into<String>) -> Self {
        ReleaseError::MissingConfiguration(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    pub fn invalid_manifest(msg: impl Into<String>) -> Self {
        ReleaseError::InvalidManifest(msg.into())
    }

    pub fn link(msg: impl Into<String>) -> Self {
        ReleaseError::Link(msg.into())
    }
}
