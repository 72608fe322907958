//! Workspace manifest listing every extension.
//!
//! ```toml
//! [workspace]
//! members = ["a/ext1", "b/ext2"]
//! ```

use super::relative_path;
use crate::discovery::Extension;
use crate::error::Result;
use std::path::Path;
use toml_edit::{Array, DocumentMut, Item, Table, value};

/// Builds the workspace manifest for `extensions`.
///
/// Members are the manifest directories relative to `workspace_root`, in the
/// order of `extensions`. Paths use `/` separators on every platform.
///
/// # Errors
///
/// `InvalidPath` if a manifest directory cannot be made relative to the root.
pub fn build_workspace_manifest(
    workspace_root: &Path,
    extensions: &[Extension],
) -> Result<DocumentMut> {
    let members = extensions
        .iter()
        .map(|ext| relative_path(ext.manifest_dir(), workspace_root))
        .collect::<Result<Array>>()?;

    let mut workspace = Table::new();
    workspace.insert("members", value(members));

    let mut doc = DocumentMut::new();
    doc.insert("workspace", Item::Table(workspace));
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use toml_edit::Value;

    fn extension(root: &Path, name: &str, dir: &str) -> Extension {
        Extension::new(
            name,
            root.join(dir).join("Cargo.toml"),
            root.join(dir).join("lib.rs"),
        )
    }

    #[test]
    fn test_members_in_order() {
        let root = PathBuf::from("/project");
        let extensions = vec![
            extension(&root, "a.ext1", "a/ext1"),
            extension(&root, "b.ext2", "b/ext2"),
        ];

        let doc = build_workspace_manifest(&root, &extensions).unwrap();

        let members: Vec<_> = doc["workspace"]["members"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(members, vec!["a/ext1", "b/ext2"]);
        assert!(
            doc.to_string()
                .contains(r#"members = ["a/ext1", "b/ext2"]"#)
        );
    }

    #[test]
    fn test_only_workspace_table() {
        let root = PathBuf::from("/project");
        let doc = build_workspace_manifest(&root, &[extension(&root, "ext", "ext")]).unwrap();

        let tables: Vec<_> = doc.iter().map(|(k, _)| k).collect();
        assert_eq!(tables, vec!["workspace"]);

        let keys: Vec<_> = doc["workspace"]
            .as_table()
            .unwrap()
            .iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, vec!["members"]);
    }

    #[test]
    fn test_extension_at_root() {
        let root = PathBuf::from("/project");
        let doc = build_workspace_manifest(&root, &[extension(&root, ".", "")]).unwrap();

        assert_eq!(doc["workspace"]["members"][0].as_str(), Some("."));
    }
}
