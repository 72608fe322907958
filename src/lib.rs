#![doc = include_str!("../README.md")]

pub mod cargo;
pub mod cli;
pub mod command;
pub mod config;
pub mod discovery;
pub mod error;
pub mod fs;
pub mod generator;
pub mod metadata;
pub mod verify;

pub use discovery::{Discovery, Extension, find_extensions};
pub use error::*;
pub use generator::ManifestGenerator;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn run() -> Result<()> {
    use clap::Parser;
    use cli::CargoCommand;

    let cli = cli::CargoCli::parse();
    match cli.command {
        CargoCommand::Tomlgen(args) => {
            init_logger(args.verbose);
            command::tomlgen::execute(args)
        }
    }
}

/// `info` by default, `debug` with `--verbose`; `RUST_LOG` overrides both.
fn init_logger(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .try_init();
}
