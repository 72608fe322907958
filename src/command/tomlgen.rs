//! Orchestration of the `tomlgen` command.
//!
//! All values the generator needs are resolved here, once: configuration,
//! options (flags OR config), extensions, project metadata and authors.

use crate::config::{CommandOptions, Config, DEFAULT_CONFIG_FILE};
use crate::discovery::{DEFAULT_LIBFILE, Discovery, Extension};
use crate::error::Result;
use crate::fs::{ManifestWriter, normalize_path};
use crate::generator::ManifestGenerator;
use crate::metadata::Authors;
use crate::verify::{preflight_checks, verify_manifest};

use clap::Parser;
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Arguments for the `tomlgen` subcommand.
#[derive(Parser, Debug, Clone, Default)]
pub struct TomlgenArgs {
    /// Directories to search for extensions
    ///
    /// Defaults to `roots` from the configuration file, or to the current
    /// directory when no extensions are declared there either.
    #[arg(value_name = "DIR")]
    pub roots: Vec<PathBuf>,

    /// Create a workspace manifest at the root of the project
    #[arg(long, short = 'w')]
    pub create_workspace: bool,

    /// Overwrite existing manifests
    #[arg(long, short = 'f')]
    pub force: bool,

    /// File marking an extension directory [default: lib.rs]
    #[arg(long, value_name = "NAME")]
    pub libfile: Option<String>,

    /// Configuration file [default: tomlgen.toml]
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Workspace root (defaults to the configuration file's directory)
    #[arg(long, value_name = "DIR")]
    pub workspace_root: Option<PathBuf>,

    /// Attribute attached to every discovered extension
    #[arg(long = "attr", value_name = "KEY=VALUE", value_parser = parse_attribute)]
    pub attributes: Vec<(String, String)>,

    /// Show the manifests that would be written without writing them
    #[arg(long, short = 'n')]
    pub dry_run: bool,

    /// Check the generated manifests with `cargo metadata`
    #[arg(long)]
    pub verify: bool,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

fn parse_attribute(s: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;

    if key.trim().is_empty() {
        return Err(format!("empty attribute name in '{}'", s));
    }

    Ok((key.trim().to_string(), value.to_string()))
}

/// Executes manifest generation.
///
/// ## Phases
///
/// 1. Load configuration and resolve options
/// 2. Collect declared and discovered extensions
/// 3. Pre-flight checks
/// 4. Resolve project metadata and authors
/// 5. Build and stage every manifest
/// 6. Write under the overwrite policy
/// 7. Verify with `cargo metadata` (if `--verify`)
pub fn execute(args: TomlgenArgs) -> Result<()> {
    let cwd = std::env::current_dir()?;

    let config = load_config(&args, &cwd)?;
    let options = config.options()?;

    let create_workspace = args.create_workspace || options.create_workspace;
    let force = args.force || options.force;
    let workspace_root = match &args.workspace_root {
        Some(root) => normalize_path(&cwd.join(root)),
        None => config.dir().to_path_buf(),
    };

    log::debug!("Workspace root: {}", workspace_root.display());

    let extensions = collect_extensions(&args, &config, &options, &cwd)?;
    if extensions.is_empty() {
        log::warn!("No extensions found");
        println!("{}", "No extensions found, nothing to generate.".yellow());
        return Ok(());
    }

    log::debug!("Generating manifests for {} extension(s)", extensions.len());

    preflight_checks(&extensions, &workspace_root, create_workspace)?;

    let project = config.project()?;
    let authors = Authors::resolve(options.authors, &project)?;

    let generator = ManifestGenerator::new(&config, authors, project.version, workspace_root.clone())
        .create_workspace(create_workspace);

    let mut writer = ManifestWriter::new(force, args.dry_run);
    generator.stage(&extensions, &mut writer)?;

    if let Err(e) = writer.commit() {
        writer.print_summary(&workspace_root);
        return Err(e);
    }

    if args.verify && !args.dry_run {
        if create_workspace {
            verify_manifest(&generator.workspace_manifest_path())?;
        } else {
            for extension in &extensions {
                verify_manifest(extension.manifest_path())?;
            }
        }
    }

    writer.print_summary(&workspace_root);
    Ok(())
}

fn load_config(args: &TomlgenArgs, cwd: &Path) -> Result<Config> {
    match &args.config {
        Some(path) => Config::load(&normalize_path(&cwd.join(path))),
        None => Config::load_or_default(&cwd.join(DEFAULT_CONFIG_FILE)),
    }
}

/// Declared extensions first, then discovered ones.
///
/// Discovery runs when roots are given (CLI or configuration) or when
/// nothing is declared. A discovered extension sharing its manifest path
/// with an earlier one is dropped.
fn collect_extensions(
    args: &TomlgenArgs,
    config: &Config,
    options: &CommandOptions,
    cwd: &Path,
) -> Result<Vec<Extension>> {
    let mut extensions = config.extensions()?;

    let roots = if args.roots.is_empty() {
        options.roots.clone()
    } else {
        args.roots.clone()
    };

    if !roots.is_empty() || extensions.is_empty() {
        let libfile = args
            .libfile
            .clone()
            .or_else(|| options.libfile.clone())
            .unwrap_or_else(|| DEFAULT_LIBFILE.to_string());

        let discovery = args
            .attributes
            .iter()
            .fold(Discovery::new().base(cwd).libfile(libfile), |d, (k, v)| {
                d.attribute(k, v)
            });

        for extension in discovery.find(&roots)? {
            if extensions
                .iter()
                .any(|e| e.manifest_path() == extension.manifest_path())
            {
                log::debug!(
                    "Skipping discovered '{}', already declared",
                    extension.name()
                );
                continue;
            }
            extensions.push(extension);
        }
    }

    Ok(extensions)
}
