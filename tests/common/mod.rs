use assert_cmd::cargo::cargo_bin_cmd;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub const CONFIG: &str = r#"
[project]
version = "1.2.3"
author = "A. Dev"
author-email = "a@x.com"
"#;

/// Helper to create a project with two extensions under `lib/`:
/// `lib/mylib/rustext` and `lib/other`.
#[allow(unused)]
pub fn create_test_project() -> TempDir {
    create_project_with_config(CONFIG)
}

#[allow(unused)]
pub fn create_project_with_config(config: &str) -> TempDir {
    let temp = TempDir::new().unwrap();

    fs::write(temp.path().join("tomlgen.toml"), config).unwrap();

    for dir in ["lib/mylib/rustext", "lib/other"] {
        let dir = temp.path().join(dir);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("lib.rs"), "pub fn hello() {}\n").unwrap();
    }

    fs::create_dir_all(temp.path().join("lib/mylib/python")).unwrap();
    fs::write(temp.path().join("lib/mylib/python/__init__.py"), "").unwrap();

    temp
}

#[allow(unused)]
pub fn read(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative)).unwrap()
}

/// Parses a generated manifest.
#[allow(unused)]
pub fn read_manifest(root: &Path, relative: &str) -> toml_edit::DocumentMut {
    read(root, relative).parse().unwrap()
}

/// Helper to run the tomlgen command in `project_root`.
pub fn run_tomlgen(project_root: &Path, args: &[&str]) -> assert_cmd::assert::Assert {
    let mut cmd = cargo_bin_cmd!("cargo-tomlgen");
    cmd.arg("tomlgen")
        .args(args)
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .current_dir(project_root);

    cmd.assert()
}
