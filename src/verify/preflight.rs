//! Pre-flight checks performed before any manifest is written.
//!
//! Findings about individual extensions are warnings: the manifests are still
//! generated. Only a missing workspace root stops the run, since every write
//! below it would fail anyway.

use crate::discovery::Extension;
use crate::error::{Result, TomlgenError};
use crate::verify::rules::{validate_package_name, validate_within_workspace};
use std::path::Path;

/// Checks extensions and the workspace root.
///
/// # Warnings (non-fatal)
///
/// - Extension name is not a valid Cargo package name
/// - Extension library file does not exist
/// - Extension lies outside the workspace root (when generating a workspace)
///
/// # Errors
///
/// `InvalidPath` if the workspace root is not a directory.
///
/// Returns the number of warnings emitted.
pub fn preflight_checks(
    extensions: &[Extension],
    workspace_root: &Path,
    create_workspace: bool,
) -> Result<usize> {
    if !workspace_root.is_dir() {
        return Err(TomlgenError::InvalidPath(
            workspace_root.to_path_buf(),
            "workspace root is not a directory".to_string(),
        ));
    }

    let mut warnings = 0;

    for extension in extensions {
        if let Err(e) = validate_package_name(extension.name()) {
            log::warn!("{}", e);
            warnings += 1;
        }

        if !extension.libfile().is_file() {
            log::warn!(
                "Library file for '{}' not found: {}",
                extension.name(),
                extension.libfile().display()
            );
            warnings += 1;
        }

        if create_workspace
            && let Err(e) = validate_within_workspace(extension.manifest_dir(), workspace_root)
        {
            log::warn!("Extension '{}': {}", extension.name(), e);
            warnings += 1;
        }
    }

    if warnings > 0 {
        log::debug!("Pre-flight checks finished with {} warning(s)", warnings);
    }

    Ok(warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_valid_extension_has_no_warnings() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("native");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("lib.rs"), "").unwrap();

        let ext = Extension::new("native", dir.join("Cargo.toml"), dir.join("lib.rs"));
        assert_eq!(preflight_checks(&[ext], temp.path(), true).unwrap(), 0);
    }

    #[test]
    fn test_findings_are_warnings() {
        let temp = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();

        let dotted = Extension::new(
            "lib.native",
            temp.path().join("lib/native/Cargo.toml"),
            temp.path().join("lib/native/lib.rs"),
        );
        let elsewhere = Extension::new(
            "elsewhere",
            outside.path().join("Cargo.toml"),
            outside.path().join("lib.rs"),
        );

        // dotted name + missing libfile, missing libfile + outside workspace
        assert_eq!(
            preflight_checks(&[dotted, elsewhere], temp.path(), true).unwrap(),
            4
        );
    }

    #[test]
    fn test_missing_workspace_root() {
        let temp = TempDir::new().unwrap();
        let result = preflight_checks(&[], &temp.path().join("missing"), false);
        assert!(matches!(result, Err(TomlgenError::InvalidPath(..))));
    }
}
