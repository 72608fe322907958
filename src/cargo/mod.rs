//! Cargo manifest synthesis.
//!
//! This module builds the `Cargo.toml` documents written by the generator.
//! It is split into two concerns:
//!
//! - **`package`**: The manifest of a single extension
//! - **`workspace`**: The workspace manifest listing every extension
//!
//! Documents are built with `toml_edit` so tables and keys keep the order
//! they were inserted in, and every value is serialized as valid TOML.

pub mod package;
pub mod workspace;

pub use package::{PackageContext, build_package_manifest, slugify};
pub use workspace::build_workspace_manifest;

use crate::error::{Result, TomlgenError};
use crate::fs::normalize_path;
use std::path::Path;

/// Path of `path` relative to `base`, with `/` separators.
///
/// Both paths are normalized first. Returns `.` when they name the same
/// directory.
pub(crate) fn relative_path(path: &Path, base: &Path) -> Result<String> {
    let (path, base) = (normalize_path(path), normalize_path(base));
    let relative = pathdiff::diff_paths(&path, &base).ok_or_else(|| {
        TomlgenError::InvalidPath(
            path.to_path_buf(),
            format!("cannot be made relative to {}", base.display()),
        )
    })?;

    let relative = relative.to_string_lossy().replace('\\', "/");
    if relative.is_empty() {
        Ok(".".to_string())
    } else {
        Ok(relative)
    }
}
