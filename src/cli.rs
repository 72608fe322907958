use crate::command::tomlgen::TomlgenArgs;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "cargo-tomlgen",
    bin_name = "cargo",
    version,
    styles = clap_cargo::style::CLAP_STYLING
)]
pub struct CargoCli {
    #[command(subcommand)]
    pub command: CargoCommand,
}

#[derive(Subcommand)]
pub enum CargoCommand {
    /// Generate `Cargo.toml` files for native extensions of a project.
    Tomlgen(TomlgenArgs),
}
