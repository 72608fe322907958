//! Binary entry point for `cargo-tomlgen`.

use std::process;

fn main() {
    if let Err(e) = cargo_tomlgen::run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
