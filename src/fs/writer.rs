//! Ordered manifest writes with overwrite protection.
//!
//! Manifests are staged first and written in staging order by `commit()`.
//!
//! ## Write Policy
//!
//! - **Missing target**: written, logged at info level
//! - **Existing target**: skipped with a warning, unless `force` is set
//! - **Forced**: existing targets are overwritten in full
//! - **Dry run**: nothing is written; targets are reported as planned
//!
//! The first failed write aborts the commit. Later manifests are not
//! attempted and nothing already written is undone.
//!
//! ## Example
//!
//! ```no_run
//! # use cargo_tomlgen::fs::{ManifestWriter, Target};
//! # use std::path::PathBuf;
//! # fn example() -> cargo_tomlgen::Result<()> {
//! let mut writer = ManifestWriter::new(false, false);
//! writer.stage(
//!     Target::Workspace,
//!     PathBuf::from("Cargo.toml"),
//!     "[workspace]\nmembers = [\"ext\"]\n".to_string(),
//! );
//! writer.commit()?;
//! # Ok(())
//! # }
//! ```

use crate::error::{Result, TomlgenError};

use colored::Colorize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// What a manifest is generated for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Package manifest of the named extension.
    Extension(String),
    /// Workspace manifest at the project root.
    Workspace,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Extension(name) => write!(f, "'{}'", name),
            Target::Workspace => f.write_str("workspace"),
        }
    }
}

/// A manifest waiting to be written.
#[derive(Debug, Clone)]
pub struct PendingManifest {
    pub target: Target,
    pub path: PathBuf,
    pub content: String,
}

/// Result of applying the write policy to one manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Created,
    Overwritten,
    /// Target existed and `force` was not set.
    Skipped,
    /// Dry run; would have been written.
    Planned,
}

/// Writes staged manifests under the overwrite policy.
#[must_use = "ManifestWriter must be committed"]
pub struct ManifestWriter {
    pending: Vec<PendingManifest>,
    written: Vec<(PendingManifest, WriteOutcome)>,
    force: bool,
    dry_run: bool,
}

impl ManifestWriter {
    pub fn new(force: bool, dry_run: bool) -> Self {
        Self {
            pending: Vec::new(),
            written: Vec::new(),
            force,
            dry_run,
        }
    }

    /// Stages a manifest. Nothing touches the disk until `commit()`.
    pub fn stage(&mut self, target: Target, path: PathBuf, content: String) {
        log::debug!("Staging manifest for {}: {}", target, path.display());
        self.pending.push(PendingManifest {
            target,
            path,
            content,
        });
    }

    /// Number of manifests staged and not yet committed.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.pending.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Writes every staged manifest in order.
    ///
    /// # Errors
    ///
    /// `Io` from the first write that fails. Manifests staged after it are
    /// dropped without being attempted.
    pub fn commit(&mut self) -> Result<()> {
        let pending = std::mem::take(&mut self.pending);

        for manifest in pending {
            let outcome = self.write(&manifest)?;
            self.written.push((manifest, outcome));
        }

        Ok(())
    }

    fn write(&self, manifest: &PendingManifest) -> Result<WriteOutcome> {
        let exists = manifest.path.exists();

        if exists && !self.force {
            log::warn!(
                "skipping 'Cargo.toml' for {} -- already exists",
                manifest.target
            );
            return Ok(WriteOutcome::Skipped);
        }

        if self.dry_run {
            log::info!("would create 'Cargo.toml' for {}", manifest.target);
            return Ok(WriteOutcome::Planned);
        }

        log::info!("creating 'Cargo.toml' for {}", manifest.target);

        fs::write(&manifest.path, &manifest.content).map_err(|e| {
            log::error!("Failed to write {}: {}", manifest.path.display(), e);
            TomlgenError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to write {}: {}", manifest.path.display(), e),
            ))
        })?;

        Ok(if exists {
            WriteOutcome::Overwritten
        } else {
            WriteOutcome::Created
        })
    }

    /// Committed manifests with their outcome, in write order.
    pub fn outcomes(&self) -> impl Iterator<Item = (&PendingManifest, WriteOutcome)> {
        self.written.iter().map(|(m, o)| (m, *o))
    }

    /// Outcome recorded for `path`, if it was committed.
    pub fn outcome_of(&self, path: &Path) -> Option<WriteOutcome> {
        self.outcomes()
            .find(|(m, _)| m.path == path)
            .map(|(_, outcome)| outcome)
    }

    /// Prints a summary of committed manifests to stdout.
    ///
    /// Paths are relative to `workspace_root` with forward slashes. In dry-run
    /// mode the content of every planned manifest is printed as well.
    pub fn print_summary(&self, workspace_root: &Path) {
        if self.written.is_empty() {
            println!("\n{}", "No manifests generated".yellow());
            return;
        }

        let display_path = |path: &Path| -> String {
            let relative =
                pathdiff::diff_paths(path, workspace_root).unwrap_or_else(|| path.to_path_buf());
            relative.to_string_lossy().replace('\\', "/")
        };

        if self.dry_run {
            println!("\n{}", "DRY RUN - No files will be written".yellow().bold());
        } else {
            println!("\n{}", "Manifests:".green().bold());
        }

        let mut changed = 0;
        let mut skipped = 0;

        for (manifest, outcome) in self.outcomes() {
            let path = display_path(&manifest.path);
            match outcome {
                WriteOutcome::Created => {
                    changed += 1;
                    println!("   {} {} {}", "✓".green(), path, "(created)".dimmed());
                }
                WriteOutcome::Overwritten => {
                    changed += 1;
                    println!("   {} {} {}", "✓".green(), path, "(overwritten)".dimmed());
                }
                WriteOutcome::Skipped => {
                    skipped += 1;
                    println!("   {} {} {}", "•".yellow(), path, "(exists, skipped)".dimmed());
                }
                WriteOutcome::Planned => {
                    changed += 1;
                    println!("\n{} {}", "──".dimmed(), path.cyan().bold());
                    print!("{}", manifest.content);
                }
            }
        }

        println!();
        if self.dry_run {
            println!(
                "{} {} would be written. Run without {} to apply.",
                changed.to_string().cyan().bold(),
                if changed == 1 { "manifest" } else { "manifests" },
                "--dry-run".cyan()
            );
        } else {
            println!(
                "{} Wrote {} manifest{}, skipped {}",
                "✓".green().bold(),
                changed,
                if changed == 1 { "" } else { "s" },
                skipped
            );
        }

        if skipped > 0 {
            println!("{}", "Use --force to overwrite existing manifests.".dimmed());
        }
    }
}

impl Drop for ManifestWriter {
    fn drop(&mut self) {
        if !self.pending.is_empty() && !self.dry_run {
            log::warn!(
                "Writer dropped with {} uncommitted manifest(s)",
                self.pending.len()
            );
        }
    }
}
