//! Discovery of extension roots.
//!
//! A directory is an extension root when it contains the entry file
//! (`lib.rs` unless configured otherwise). Each root becomes an [`Extension`]
//! whose manifest is expected next to the entry file.
//!
//! ## Example
//!
//! ```text
//! lib/
//!  └ mylib/
//!      └ rustext/
//!          ├ lib.rs
//!          └ Cargo.toml      <- manifest_path
//! ```
//!
//! Searching `lib` from the project root yields one extension named
//! `lib.mylib.rustext`.
//!
//! Entries are visited depth-first and sorted by file name, so the order of
//! the returned extensions is stable across runs and platforms.

use crate::error::{Result, TomlgenError};
use crate::fs::normalize_path;
use ignore::WalkBuilder;
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

/// Entry file looked for when no other name is configured.
pub const DEFAULT_LIBFILE: &str = "lib.rs";

/// File name of every generated manifest.
pub const MANIFEST_FILE: &str = "Cargo.toml";

/// A native extension embedded in the host project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    name: String,
    manifest_path: PathBuf,
    libfile: PathBuf,
    attributes: BTreeMap<String, String>,
}

impl Extension {
    pub fn new(
        name: impl Into<String>,
        manifest_path: impl Into<PathBuf>,
        libfile: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            manifest_path: manifest_path.into(),
            libfile: libfile.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Attaches pass-through attributes.
    pub fn with_attributes(mut self, attributes: BTreeMap<String, String>) -> Self {
        self.attributes = attributes;
        self
    }

    /// Dotted extension name, e.g. `lib.mylib.rustext`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    /// Directory holding the manifest. All relative paths written into the
    /// manifest are relative to this directory.
    pub fn manifest_dir(&self) -> &Path {
        self.manifest_path.parent().unwrap_or_else(|| Path::new(""))
    }

    pub fn libfile(&self) -> &Path {
        &self.libfile
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }
}

/// Builder for an extension search.
#[derive(Debug, Clone)]
pub struct Discovery {
    libfile: String,
    base: Option<PathBuf>,
    attributes: BTreeMap<String, String>,
}

impl Default for Discovery {
    fn default() -> Self {
        Self {
            libfile: DEFAULT_LIBFILE.to_string(),
            base: None,
            attributes: BTreeMap::new(),
        }
    }
}

impl Discovery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the entry file name marking an extension root.
    pub fn libfile(mut self, libfile: impl Into<String>) -> Self {
        self.libfile = libfile.into();
        self
    }

    /// Sets the directory extension names are relative to.
    ///
    /// Relative roots are resolved against it too. Defaults to the current
    /// working directory.
    pub fn base(mut self, base: impl Into<PathBuf>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Adds an attribute copied onto every extension found.
    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Walks `roots` (or the base directory if empty) and returns one
    /// extension per directory containing the entry file.
    ///
    /// # Errors
    ///
    /// - `InvalidPath`: a root is not a directory
    /// - `Walk`: a directory could not be read
    pub fn find<P: AsRef<Path>>(&self, roots: &[P]) -> Result<Vec<Extension>> {
        let base = match &self.base {
            Some(base) => normalize_path(base),
            None => std::env::current_dir()?,
        };

        let roots: Vec<PathBuf> = if roots.is_empty() {
            vec![base.clone()]
        } else {
            roots
                .iter()
                .map(|root| normalize_path(&base.join(root)))
                .collect()
        };

        let mut extensions = Vec::new();

        for root in &roots {
            if !root.is_dir() {
                return Err(TomlgenError::InvalidPath(
                    root.clone(),
                    "not a directory".to_string(),
                ));
            }

            log::debug!("Searching {} for '{}'", root.display(), self.libfile);

            let walker = WalkBuilder::new(root)
                .standard_filters(false)
                .sort_by_file_name(|a, b| a.cmp(b))
                .build();

            for entry in walker {
                let entry = entry?;

                let is_file = entry.file_type().is_some_and(|t| t.is_file());
                if !is_file || entry.file_name() != self.libfile.as_str() {
                    continue;
                }

                let Some(dir) = entry.path().parent() else {
                    continue;
                };

                let extension = Extension::new(
                    dotted_name(dir, &base),
                    dir.join(MANIFEST_FILE),
                    entry.path(),
                )
                .with_attributes(self.attributes.clone());

                log::debug!(
                    "Found extension '{}' at {}",
                    extension.name(),
                    dir.display()
                );
                extensions.push(extension);
            }
        }

        Ok(extensions)
    }
}

/// Finds extensions under `roots` relative to the current directory.
pub fn find_extensions<P: AsRef<Path>>(roots: &[P], libfile: &str) -> Result<Vec<Extension>> {
    Discovery::new().libfile(libfile).find(roots)
}

/// Directory path relative to `base` with separators replaced by dots.
fn dotted_name(dir: &Path, base: &Path) -> String {
    let relative = pathdiff::diff_paths(dir, base).unwrap_or_else(|| dir.to_path_buf());

    let parts: Vec<_> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            Component::ParentDir => Some("..".into()),
            _ => None,
        })
        .collect();

    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join(".")
    }
}
