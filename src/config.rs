//! Configuration file (`tomlgen.toml`).
//!
//! ```toml
//! [project]
//! version = "1.2.3"
//! author = "A. Dev"
//! author-email = "a@x.com"
//!
//! [tomlgen]
//! create-workspace = true
//! roots = ["lib"]
//!
//! [tomlgen.dependencies]
//! pyo3 = { version = "0.22", features = ["extension-module"] }
//!
//! [tomlgen.dependencies."lib.mylib.rustext"]
//! serde = "1"
//! ```
//!
//! Dependency values are copied into the generated manifests as written.
//! Missing tables are treated as empty; a known key holding the wrong type
//! is an error.

use crate::discovery::{Extension, MANIFEST_FILE};
use crate::error::{Result, TomlgenError};
use crate::fs::normalize_path;
use crate::metadata::{Authors, ProjectMetadata};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use toml_edit::{DocumentMut, Item, Table, TableLike, Value};

/// Name of the command table and prefix of every dependency section.
pub const COMMAND_NAME: &str = "tomlgen";

/// Configuration file looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = "tomlgen.toml";

const PROJECT_TABLE: &str = "project";
const DEPENDENCIES_KEY: &str = "dependencies";
const EXTENSIONS_KEY: &str = "extensions";

/// Options from the `[tomlgen]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOptions {
    pub authors: Option<Authors>,
    pub create_workspace: bool,
    pub force: bool,
    pub libfile: Option<String>,
    /// Discovery roots, resolved against the configuration directory.
    pub roots: Vec<PathBuf>,
}

/// Parsed configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    doc: DocumentMut,
    dir: PathBuf,
}

impl Config {
    /// Creates an empty configuration rooted at `dir`.
    pub fn empty(dir: impl Into<PathBuf>) -> Self {
        Self {
            doc: DocumentMut::new(),
            dir: dir.into(),
        }
    }

    /// Parses configuration text. Relative paths inside it resolve against `dir`.
    pub fn parse(content: &str, dir: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            doc: content.parse()?,
            dir: dir.into(),
        })
    }

    /// Reads and parses the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// - `Io`: File cannot be read
    /// - `Toml`: File is not valid TOML
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            TomlgenError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read {}: {}", path.display(), e),
            ))
        })?;

        log::debug!("Loaded configuration from {}", path.display());
        Self::parse(&content, config_dir(path))
    }

    /// Like [`Config::load`], but a missing file yields an empty configuration.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            log::debug!("No configuration at {}, using defaults", path.display());
            Ok(Self::empty(config_dir(path)))
        }
    }

    /// Directory relative configuration paths resolve against.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn command_table(&self) -> Option<&dyn TableLike> {
        self.doc.get(COMMAND_NAME).and_then(Item::as_table_like)
    }

    /// Dependency entries for an extension, in manifest order.
    ///
    /// Global entries (`[tomlgen.dependencies]`) come first, followed by the
    /// extension's own section. The per-extension section is either the
    /// quoted key `[tomlgen.dependencies."a.b"]` or the nested tables
    /// `[tomlgen.dependencies.a.b]`.
    pub fn dependencies(&self, extension: Option<&str>) -> Vec<(String, Value)> {
        let Some(section) = self
            .command_table()
            .and_then(|t| t.get(DEPENDENCIES_KEY))
            .and_then(Item::as_table)
        else {
            return Vec::new();
        };

        let mut entries = dependency_entries(section);

        if let Some(name) = extension
            && let Some(scoped) = extension_section(section, name)
        {
            entries.extend(dependency_entries(scoped));
        }

        entries
    }

    /// Reads the `[tomlgen]` options.
    pub fn options(&self) -> Result<CommandOptions> {
        let Some(table) = self.command_table() else {
            return Ok(CommandOptions::default());
        };

        let authors = match table.get("authors") {
            None => None,
            Some(item) => {
                if let Some(list) = item.as_str() {
                    Some(Authors::from_lines(list))
                } else {
                    Some(Authors::new(string_array(item, "tomlgen.authors")?))
                }
            }
        };

        let roots = match table.get("roots") {
            None => Vec::new(),
            Some(item) => string_array(item, "tomlgen.roots")?
                .into_iter()
                .map(|root| normalize_path(&self.dir.join(root)))
                .collect(),
        };

        Ok(CommandOptions {
            authors,
            create_workspace: get_bool(table, "create-workspace")?.unwrap_or(false),
            force: get_bool(table, "force")?.unwrap_or(false),
            libfile: get_str(table, COMMAND_NAME, "libfile")?,
            roots,
        })
    }

    /// Reads project metadata from the `[project]` table.
    ///
    /// # Errors
    ///
    /// - `MissingMetadata`: No version configured
    /// - `InvalidConfig`: A field is not a string
    pub fn project(&self) -> Result<ProjectMetadata> {
        let Some(table) = self.doc.get(PROJECT_TABLE).and_then(Item::as_table_like) else {
            return Err(TomlgenError::MissingMetadata("version"));
        };

        let version = get_str(table, PROJECT_TABLE, "version")?
            .ok_or(TomlgenError::MissingMetadata("version"))?;

        Ok(ProjectMetadata {
            version,
            author: get_str(table, PROJECT_TABLE, "author")?,
            author_email: get_str(table, PROJECT_TABLE, "author-email")?,
        })
    }

    /// Extensions declared with `[[tomlgen.extensions]]`.
    ///
    /// `name` and `path` (the manifest) are required; `libfile` defaults to
    /// `src/lib.rs` next to the manifest. Any other string keys are kept as
    /// attributes.
    pub fn extensions(&self) -> Result<Vec<Extension>> {
        let Some(item) = self.command_table().and_then(|t| t.get(EXTENSIONS_KEY)) else {
            return Ok(Vec::new());
        };

        let tables = item.as_array_of_tables().ok_or_else(|| {
            invalid("tomlgen.extensions", "expected an array of tables ([[tomlgen.extensions]])")
        })?;

        tables
            .iter()
            .map(|table| self.declared_extension(table))
            .collect()
    }

    fn declared_extension(&self, table: &Table) -> Result<Extension> {
        let key = "tomlgen.extensions";

        let name = get_str(table, key, "name")?.ok_or_else(|| invalid(key, "missing 'name'"))?;
        let path = get_str(table, key, "path")?
            .ok_or_else(|| invalid(key, &format!("missing 'path' for '{}'", name)))?;

        let mut manifest_path = normalize_path(&self.dir.join(path));
        if manifest_path.is_dir() {
            manifest_path.push(MANIFEST_FILE);
        }

        let libfile = match get_str(table, key, "libfile")? {
            Some(libfile) => normalize_path(&self.dir.join(libfile)),
            None => manifest_path
                .parent()
                .unwrap_or(&self.dir)
                .join("src")
                .join("lib.rs"),
        };

        let attributes: BTreeMap<String, String> = table
            .iter()
            .filter(|(k, _)| !matches!(*k, "name" | "path" | "libfile"))
            .filter_map(|(k, v)| v.as_str().map(|s| (k.to_string(), s.to_string())))
            .collect();

        Ok(Extension::new(name, manifest_path, libfile).with_attributes(attributes))
    }
}

fn config_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => normalize_path(parent),
        _ => PathBuf::from("."),
    }
}

fn extension_section<'a>(section: &'a Table, name: &str) -> Option<&'a Table> {
    if let Some(table) = section.get(name).and_then(Item::as_table) {
        return Some(table);
    }

    let mut current = section;
    for segment in name.split('.') {
        current = current.get(segment)?.as_table()?;
    }
    Some(current)
}

fn dependency_entries(table: &Table) -> Vec<(String, Value)> {
    table
        .iter()
        .filter_map(|(key, item)| item.as_value().map(|v| (key.to_string(), v.clone())))
        .collect()
}

fn invalid(key: &str, reason: &str) -> TomlgenError {
    TomlgenError::InvalidConfig(key.to_string(), reason.to_string())
}

fn get_str(table: &dyn TableLike, prefix: &str, key: &str) -> Result<Option<String>> {
    match table.get(key) {
        None => Ok(None),
        Some(item) => item
            .as_str()
            .map(|s| Some(s.to_string()))
            .ok_or_else(|| invalid(&format!("{}.{}", prefix, key), "expected a string")),
    }
}

fn get_bool(table: &dyn TableLike, key: &str) -> Result<Option<bool>> {
    match table.get(key) {
        None => Ok(None),
        Some(item) => item
            .as_bool()
            .map(Some)
            .ok_or_else(|| invalid(&format!("{}.{}", COMMAND_NAME, key), "expected a boolean")),
    }
}

fn string_array(item: &Item, key: &str) -> Result<Vec<String>> {
    let array = item
        .as_array()
        .ok_or_else(|| invalid(key, "expected an array of strings"))?;

    array
        .iter()
        .map(|v| {
            v.as_str()
                .map(String::from)
                .ok_or_else(|| invalid(key, "expected an array of strings"))
        })
        .collect()
}
