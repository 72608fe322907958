//! File system output.
//!
//! Applies the overwrite policy to generated manifests and reports what was
//! written.

pub mod writer;

pub use writer::{ManifestWriter, PendingManifest, Target, WriteOutcome};

use std::path::{Component, Path, PathBuf};

/// Resolves `.` and `..` components without touching the file system.
///
/// `..` past the root is dropped; leading `..` of a relative path is kept.
/// An empty result is `.`.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }

    if normalized.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        normalized
    }
}
