//! Validation and verification around manifest generation.

pub mod preflight;
pub mod rules;
pub mod workspace;

pub use preflight::preflight_checks;
pub use rules::{validate_package_name, validate_within_workspace};
pub use workspace::verify_manifest;
