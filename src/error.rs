//! Error types for cargo-tomlgen.
//!
//! All operations return `Result<T>` which aliases `Result<T, TomlgenError>`.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from manifest generation.
#[derive(Debug, Error)]
pub enum TomlgenError {
    /// Name is not a valid Cargo package name.
    #[error("Invalid package name '{0}': {1}")]
    InvalidName(String, String),

    /// A configuration key holds a value of the wrong shape.
    #[error("Invalid configuration '{0}': {1}")]
    InvalidConfig(String, String),

    /// Project metadata needed for the manifest is missing.
    #[error("Missing project metadata: {0}")]
    MissingMetadata(&'static str),

    /// Path cannot be expressed the way the manifest needs it.
    #[error("Invalid path '{}': {}", .0.display(), .1)]
    InvalidPath(PathBuf, String),

    /// Generated workspace was rejected by `cargo metadata`.
    #[error("Workspace verification failed: {0}")]
    VerificationFailed(String),

    /// File system operation failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Directory walk failed during discovery.
    #[error("Discovery error: {0}")]
    Walk(#[from] ignore::Error),

    /// TOML parse error in the configuration file.
    #[error("TOML error: {0}")]
    Toml(#[from] toml_edit::TomlError),

    /// Unexpected error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for cargo-tomlgen operations.
pub type Result<T> = std::result::Result<T, TomlgenError>;
