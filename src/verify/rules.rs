//! Validation rules for package names and paths.
//!
//! Pure functions with no I/O or side effects.

use crate::error::{Result, TomlgenError};
use std::path::{Component, Path};

const MAX_PACKAGE_NAME_LENGTH: usize = 64;
const RESERVED_PACKAGE_NAMES: &[&str] = &["test", "doc", "build", "bench"];

/// Validates a package name against Cargo rules.
///
/// ## Rules
/// - 1-64 ASCII characters
/// - Starts with letter or `_`
/// - Contains only `[a-zA-Z0-9_-]`
/// - Not reserved (`test`, `doc`, `build`, `bench`)
///
/// Dotted extension names like `lib.mylib.rustext` fail the character
/// rule; Cargo rejects them when it loads the manifest.
pub fn validate_package_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(TomlgenError::InvalidName(
            name.to_string(),
            "cannot be empty".to_string(),
        ));
    }

    if name.len() > MAX_PACKAGE_NAME_LENGTH {
        return Err(TomlgenError::InvalidName(
            name.to_string(),
            format!(
                "exceeds {} chars (has {})",
                MAX_PACKAGE_NAME_LENGTH,
                name.len()
            ),
        ));
    }

    if !name.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
        return Err(TomlgenError::InvalidName(
            name.to_string(),
            "must start with letter or underscore".to_string(),
        ));
    }

    for (idx, ch) in name.chars().enumerate() {
        if !ch.is_ascii_alphanumeric() && ch != '_' && ch != '-' {
            return Err(TomlgenError::InvalidName(
                name.to_string(),
                format!("invalid character '{}' at position {}", ch, idx),
            ));
        }
    }

    if RESERVED_PACKAGE_NAMES.contains(&name) {
        return Err(TomlgenError::InvalidName(
            name.to_string(),
            format!(
                "'{}' is reserved. Reserved: {}",
                name,
                RESERVED_PACKAGE_NAMES.join(", ")
            ),
        ));
    }

    Ok(())
}

/// Checks that `dir` lies inside `workspace_root`, lexically.
pub fn validate_within_workspace(dir: &Path, workspace_root: &Path) -> Result<()> {
    let outside = match pathdiff::diff_paths(dir, workspace_root) {
        Some(relative) => relative
            .components()
            .any(|c| matches!(c, Component::ParentDir)),
        None => true,
    };

    if outside {
        return Err(TomlgenError::InvalidPath(
            dir.to_path_buf(),
            format!("outside workspace root {}", workspace_root.display()),
        ));
    }

    Ok(())
}
