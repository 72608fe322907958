//! Package manifest (`Cargo.toml`) of a single extension.
//!
//! The generated manifest always has the same three tables:
//!
//! ```toml
//! [package]
//! name = "lib.mylib.rustext"
//! version = "1.2.3"
//! authors = ["A. Dev <a@x.com>"]
//! publish = false
//! workspace = "../../.."        # only when a workspace is generated
//!
//! [lib]
//! crate-type = ["cdylib"]
//! name = "lib_mylib_rustext"
//! path = "lib.rs"
//!
//! [dependencies]
//! pyo3 = { version = "0.22", features = ["extension-module"] }
//! ```

use super::relative_path;
use crate::discovery::Extension;
use crate::error::Result;
use crate::metadata::Authors;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use toml_edit::{Array, DocumentMut, Item, Table, Value, value};

/// Crate type of every extension library.
pub const CRATE_TYPE: &str = "cdylib";

static DISALLOWED_LIB_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]").expect("valid regex"));

/// Project-wide values shared by every package manifest.
#[derive(Debug, Clone, Copy)]
pub struct PackageContext<'a> {
    pub version: &'a str,
    pub authors: &'a Authors,
    /// Workspace root, set only when a workspace manifest is generated.
    pub workspace_root: Option<&'a Path>,
}

/// Library name for an extension name.
///
/// ASCII letters, digits and `_` are kept; every other character becomes
/// `_`, so the result has as many characters as the input.
pub fn slugify(name: &str) -> String {
    DISALLOWED_LIB_CHARS.replace_all(name, "_").into_owned()
}

/// Builds the manifest of `extension`.
///
/// Paths in the manifest are relative to the manifest's directory.
/// `dependencies` are inserted in order; a repeated key replaces the
/// earlier value in place.
///
/// # Errors
///
/// `InvalidPath` if a path cannot be made relative to the manifest
/// directory (e.g. a relative libfile with an absolute manifest path).
pub fn build_package_manifest(
    extension: &Extension,
    context: &PackageContext<'_>,
    dependencies: Vec<(String, Value)>,
) -> Result<DocumentMut> {
    let manifest_dir = extension.manifest_dir();
    let mut doc = DocumentMut::new();

    let mut package = Table::new();
    package.insert("name", value(extension.name()));
    package.insert("version", value(context.version));
    package.insert("authors", value(context.authors.to_array()));
    package.insert("publish", value(false));
    if let Some(root) = context.workspace_root {
        package.insert("workspace", value(relative_path(root, manifest_dir)?));
    }
    doc.insert("package", Item::Table(package));

    let mut lib = Table::new();
    lib.insert("crate-type", value(Array::from_iter([CRATE_TYPE])));
    lib.insert("name", value(slugify(extension.name())));
    lib.insert(
        "path",
        value(relative_path(extension.libfile(), manifest_dir)?),
    );
    doc.insert("lib", Item::Table(lib));

    let mut deps = Table::new();
    for (name, mut dependency) in dependencies {
        dependency.decor_mut().clear();
        if deps.insert(&name, value(dependency)).is_some() {
            log::debug!(
                "Dependency '{}' of '{}' overridden by extension section",
                name,
                extension.name()
            );
        }
    }
    doc.insert("dependencies", Item::Table(deps));

    Ok(doc)
}
