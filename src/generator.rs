//! Manifest generation for a set of extensions.
//!
//! The generator is a pure function of its inputs: extensions, the
//! configuration, the resolved authors and version, and the workspace
//! options. Writing is left to [`ManifestWriter`], which owns the
//! overwrite policy.

use crate::cargo::{PackageContext, build_package_manifest, build_workspace_manifest};
use crate::config::Config;
use crate::discovery::{Extension, MANIFEST_FILE};
use crate::error::Result;
use crate::fs::{ManifestWriter, Target};
use crate::metadata::Authors;
use std::path::{Path, PathBuf};
use toml_edit::DocumentMut;

/// Builds package and workspace manifests.
#[derive(Debug, Clone)]
pub struct ManifestGenerator<'a> {
    config: &'a Config,
    authors: Authors,
    version: String,
    workspace_root: PathBuf,
    create_workspace: bool,
}

impl<'a> ManifestGenerator<'a> {
    pub fn new(
        config: &'a Config,
        authors: Authors,
        version: impl Into<String>,
        workspace_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            config,
            authors,
            version: version.into(),
            workspace_root: workspace_root.into(),
            create_workspace: false,
        }
    }

    /// Also generate a workspace manifest, and link every package to it.
    pub fn create_workspace(mut self, create_workspace: bool) -> Self {
        self.create_workspace = create_workspace;
        self
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    /// `<workspace-root>/Cargo.toml`.
    pub fn workspace_manifest_path(&self) -> PathBuf {
        self.workspace_root.join(MANIFEST_FILE)
    }

    /// Builds the package manifest of one extension.
    pub fn build_manifest(&self, extension: &Extension) -> Result<DocumentMut> {
        let context = PackageContext {
            version: &self.version,
            authors: &self.authors,
            workspace_root: self
                .create_workspace
                .then_some(self.workspace_root.as_path()),
        };

        build_package_manifest(
            extension,
            &context,
            self.config.dependencies(Some(extension.name())),
        )
    }

    /// Builds the workspace manifest listing `extensions`.
    pub fn build_workspace_manifest(&self, extensions: &[Extension]) -> Result<DocumentMut> {
        build_workspace_manifest(&self.workspace_root, extensions)
    }

    /// Stages one manifest per extension, then the workspace manifest if
    /// requested and there is at least one extension.
    pub fn stage(&self, extensions: &[Extension], writer: &mut ManifestWriter) -> Result<()> {
        for extension in extensions {
            let doc = self.build_manifest(extension)?;
            writer.stage(
                Target::Extension(extension.name().to_string()),
                extension.manifest_path().to_path_buf(),
                doc.to_string(),
            );
        }

        if self.create_workspace && !extensions.is_empty() {
            let doc = self.build_workspace_manifest(extensions)?;
            writer.stage(
                Target::Workspace,
                self.workspace_manifest_path(),
                doc.to_string(),
            );
        }

        Ok(())
    }

    /// Stages and writes every manifest.
    pub fn generate(&self, extensions: &[Extension], writer: &mut ManifestWriter) -> Result<()> {
        self.stage(extensions, writer)?;
        writer.commit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::WriteOutcome;
    use crate::metadata::ProjectMetadata;
    use std::fs;
    use tempfile::TempDir;

    fn project_extension(root: &Path, name: &str, dir: &str) -> Extension {
        let dir = root.join(dir);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("lib.rs"), "").unwrap();
        Extension::new(name, dir.join("Cargo.toml"), dir.join("lib.rs"))
    }

    fn authors() -> Authors {
        Authors::from_metadata(&ProjectMetadata {
            version: "1.2.3".to_string(),
            author: Some("A. Dev".to_string()),
            author_email: Some("a@x.com".to_string()),
        })
        .unwrap()
    }

    #[test]
    fn test_end_to_end_package_section() {
        let temp = TempDir::new().unwrap();
        let config = Config::empty(temp.path());
        let extensions = vec![project_extension(temp.path(), "mylib.rustext", "mylib/rustext")];

        let generator = ManifestGenerator::new(&config, authors(), "1.2.3", temp.path());
        let mut writer = ManifestWriter::new(false, false);
        generator.generate(&extensions, &mut writer).unwrap();

        let content = fs::read_to_string(extensions[0].manifest_path()).unwrap();
        let doc: DocumentMut = content.parse().unwrap();

        let package = doc["package"].as_table().unwrap();
        let keys: Vec<_> = package.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["name", "version", "authors", "publish"]);
        assert_eq!(package["name"].as_str(), Some("mylib.rustext"));
        assert_eq!(package["version"].as_str(), Some("1.2.3"));
        assert_eq!(package["publish"].as_bool(), Some(false));
        assert!(content.contains(r#"authors = ["A. Dev <a@x.com>"]"#));

        assert!(!temp.path().join("Cargo.toml").exists());
    }

    #[test]
    fn test_second_run_without_force_changes_nothing() {
        let temp = TempDir::new().unwrap();
        let config = Config::empty(temp.path());
        let extensions = vec![
            project_extension(temp.path(), "a.ext1", "a/ext1"),
            project_extension(temp.path(), "b.ext2", "b/ext2"),
        ];
        let generator =
            ManifestGenerator::new(&config, authors(), "1.0.0", temp.path()).create_workspace(true);

        let mut first = ManifestWriter::new(false, false);
        generator.generate(&extensions, &mut first).unwrap();
        assert!(first.outcomes().all(|(_, o)| o == WriteOutcome::Created));

        let mut second = ManifestWriter::new(false, false);
        generator.generate(&extensions, &mut second).unwrap();
        assert_eq!(second.outcomes().count(), 3);
        assert!(second.outcomes().all(|(_, o)| o == WriteOutcome::Skipped));
    }

    #[test]
    fn test_forced_runs_are_byte_identical() {
        let temp = TempDir::new().unwrap();
        let config = Config::parse(
            "[tomlgen.dependencies]\nlibc = \"0.2\"\n",
            temp.path(),
        )
        .unwrap();
        let extensions = vec![project_extension(temp.path(), "ext", "ext")];
        let generator =
            ManifestGenerator::new(&config, authors(), "1.0.0", temp.path()).create_workspace(true);

        let manifest = extensions[0].manifest_path().to_path_buf();
        let workspace = generator.workspace_manifest_path();

        let mut writer = ManifestWriter::new(true, false);
        generator.generate(&extensions, &mut writer).unwrap();
        let first = (
            fs::read(&manifest).unwrap(),
            fs::read(&workspace).unwrap(),
        );

        let mut writer = ManifestWriter::new(true, false);
        generator.generate(&extensions, &mut writer).unwrap();
        assert_eq!(writer.outcome_of(&manifest), Some(WriteOutcome::Overwritten));

        let second = (
            fs::read(&manifest).unwrap(),
            fs::read(&workspace).unwrap(),
        );
        assert_eq!(first, second);
    }

    #[test]
    fn test_workspace_checked_at_its_own_path() {
        let temp = TempDir::new().unwrap();
        let config = Config::empty(temp.path());
        let extensions = vec![project_extension(temp.path(), "ext", "ext")];
        let generator =
            ManifestGenerator::new(&config, authors(), "1.0.0", temp.path()).create_workspace(true);

        // Existing workspace manifest, no extension manifest yet
        let workspace = generator.workspace_manifest_path();
        fs::write(&workspace, "# existing\n").unwrap();

        let mut writer = ManifestWriter::new(false, false);
        generator.generate(&extensions, &mut writer).unwrap();

        assert_eq!(
            writer.outcome_of(extensions[0].manifest_path()),
            Some(WriteOutcome::Created)
        );
        assert_eq!(writer.outcome_of(&workspace), Some(WriteOutcome::Skipped));
        assert_eq!(fs::read_to_string(&workspace).unwrap(), "# existing\n");
    }

    #[test]
    fn test_workspace_manifest_and_links() {
        let temp = TempDir::new().unwrap();
        let config = Config::empty(temp.path());
        let extensions = vec![
            project_extension(temp.path(), "a.ext1", "a/ext1"),
            project_extension(temp.path(), "b.ext2", "b/ext2"),
        ];
        let generator =
            ManifestGenerator::new(&config, authors(), "1.0.0", temp.path()).create_workspace(true);

        let mut writer = ManifestWriter::new(false, false);
        generator.generate(&extensions, &mut writer).unwrap();

        let workspace: DocumentMut = fs::read_to_string(generator.workspace_manifest_path())
            .unwrap()
            .parse()
            .unwrap();
        let tables: Vec<_> = workspace.iter().map(|(k, _)| k).collect();
        assert_eq!(tables, vec!["workspace"]);
        assert!(
            workspace
                .to_string()
                .contains(r#"members = ["a/ext1", "b/ext2"]"#)
        );

        let ext1: DocumentMut = fs::read_to_string(extensions[0].manifest_path())
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!(ext1["package"]["workspace"].as_str(), Some("../.."));
    }

    #[test]
    fn test_no_workspace_without_extensions() {
        let temp = TempDir::new().unwrap();
        let config = Config::empty(temp.path());
        let generator =
            ManifestGenerator::new(&config, authors(), "1.0.0", temp.path()).create_workspace(true);

        let mut writer = ManifestWriter::new(false, false);
        generator.stage(&[], &mut writer).unwrap();
        assert!(writer.is_empty());
        writer.commit().unwrap();
    }

    #[test]
    fn test_per_extension_dependencies() {
        let temp = TempDir::new().unwrap();
        let config = Config::parse(
            r#"
[tomlgen.dependencies]
libc = "0.2"

[tomlgen.dependencies."a.ext1"]
serde = "1"
"#,
            temp.path(),
        )
        .unwrap();
        let generator = ManifestGenerator::new(&config, authors(), "1.0.0", temp.path());

        let ext1 = generator
            .build_manifest(&project_extension(temp.path(), "a.ext1", "a/ext1"))
            .unwrap();
        let ext2 = generator
            .build_manifest(&project_extension(temp.path(), "b.ext2", "b/ext2"))
            .unwrap();

        assert!(ext1["dependencies"].get("serde").is_some());
        assert!(ext1["dependencies"].get("libc").is_some());
        assert!(ext2["dependencies"].get("serde").is_none());
        assert!(ext2["dependencies"].get("libc").is_some());
    }
}
