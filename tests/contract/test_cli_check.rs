// Contract test for `grinstall check` and `grinstall manifest`

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

use grinstall::models::layout::runtime_library_name;

fn grinstall(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("grinstall").unwrap();
    cmd.current_dir(dir.path())
        .env("XDG_CONFIG_HOME", dir.path())
        .env_remove("GRINSTALL_RUNTIME_VERSION")
        .env_remove("GRINSTALL_BASE_URL")
        .env_remove("GRDIR");
    cmd
}

#[test]
fn test_check_finds_runtime_in_package_dir() {
    let temp_dir = TempDir::new().unwrap();
    let gr = temp_dir.path().join("gr");
    fs::create_dir_all(&gr).unwrap();
    fs::write(gr.join(runtime_library_name(std::env::consts::OS)), b"lib").unwrap();

    grinstall(&temp_dir)
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ GR runtime found at"));
}

#[test]
fn test_check_honours_grdir() {
    let temp_dir = TempDir::new().unwrap();
    let grdir = temp_dir.path().join("opt-gr");
    fs::create_dir_all(grdir.join("lib")).unwrap();
    fs::write(grdir.join("lib").join(runtime_library_name(std::env::consts::OS)), b"lib").unwrap();

    let output = grinstall(&temp_dir)
        .env("GRDIR", &grdir)
        .args(["check", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["found"], true);
    assert!(json["runtime"].as_str().unwrap().contains("opt-gr"));
}

#[test]
fn test_manifest_lists_package_data() {
    let temp_dir = TempDir::new().unwrap();
    let gr = temp_dir.path().join("gr");
    fs::create_dir_all(gr.join("lib")).unwrap();
    fs::create_dir_all(gr.join("fonts")).unwrap();
    fs::write(gr.join("libGKS.so"), b"12345").unwrap();
    fs::write(gr.join("lib/x11plugin.so"), b"1").unwrap();
    fs::write(gr.join("fonts/gksfont.dat"), b"1").unwrap();
    fs::write(gr.join("README"), b"not bundled").unwrap();

    grinstall(&temp_dir)
        .arg("manifest")
        .assert()
        .success()
        .stdout(predicate::str::contains("libGKS.so"))
        .stdout(predicate::str::contains("lib/x11plugin.so"))
        .stdout(predicate::str::contains("fonts/gksfont.dat"))
        .stdout(predicate::str::contains("README").not())
        .stdout(predicate::str::contains("3 files, 7 bytes"));
}
