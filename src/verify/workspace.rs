//! Post-write verification with `cargo metadata`.

use crate::error::{Result, TomlgenError};
use cargo_metadata::MetadataCommand;
use std::path::Path;

/// Loads `manifest_path` with `cargo metadata --no-deps`.
///
/// Catches manifests Cargo refuses to load, e.g. package names containing
/// dots or a workspace whose members do not point back at it.
///
/// # Errors
///
/// `VerificationFailed` with Cargo's message if the manifest is rejected.
pub fn verify_manifest(manifest_path: &Path) -> Result<()> {
    log::info!("Verifying {}...", manifest_path.display());

    let metadata = MetadataCommand::new()
        .manifest_path(manifest_path)
        .no_deps()
        .exec()
        .map_err(|e| {
            TomlgenError::VerificationFailed(format!("{}: {}", manifest_path.display(), e))
        })?;

    log::debug!(
        "Verification passed: {} package(s) in {}",
        metadata.packages.len(),
        metadata.workspace_root
    );
    Ok(())
}
