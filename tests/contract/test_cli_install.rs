// Contract test for `grinstall install`

use assert_cmd::Command;
use flate2::{write::GzEncoder, Compression};
use mockito::Server;
use predicates::prelude::*;
use tar::{Builder, Header};
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

fn runtime_archive() -> Vec<u8> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = Builder::new(encoder);
    let library = format!("gr/lib/{}", runtime_library_name(std::env::consts::OS));
    for (name, contents) in [(library.as_str(), "core"), ("gr/lib/pdfplugin.so", "pdf")] {
        let mut header = Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(0o755);
        header.set_cksum();
        builder.append_data(&mut header, name, contents.as_bytes()).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

#[test]
fn test_install_downloads_runtime() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/gr-0.17.3-Linux-x86_64.tar.gz")
        .with_status(200)
        .with_body(runtime_archive())
        .create();

    let temp_dir = TempDir::new().unwrap();
    let site = temp_dir.path().join("site");

    grinstall(&temp_dir)
        .args(["install", "--os", "Linux", "--arch", "x86_64", "--force", "--base-url"])
        .arg(server.url())
        .arg("--install-dir")
        .arg(&site)
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ Downloaded gr-0.17.3-Linux-x86_64.tar.gz"))
        .stdout(predicate::str::contains("✓ GR runtime available at"));

    mock.assert();
    assert!(site.join("gr").join(runtime_library_name(std::env::consts::OS)).exists());
    assert!(site.join("gr/lib/pdfplugin.so").exists());
    assert!(site.join("gr/.grinstall-receipt.json").exists());
}

#[test]
fn test_install_missing_archive_fails_with_url() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/gr-9.9.9-Linux-x86_64.tar.gz")
        .with_status(404)
        .create();

    let temp_dir = TempDir::new().unwrap();

    grinstall(&temp_dir)
        .args(["install", "--os", "Linux", "--arch", "x86_64", "--force"])
        .args(["--runtime-version", "9.9.9", "--base-url"])
        .arg(server.url())
        .assert()
        .code(3)
        .stderr(predicate::str::contains("GR runtime not found on:"))
        .stderr(predicate::str::contains("gr-9.9.9-Linux-x86_64.tar.gz"));
}

#[test]
fn test_install_dry_run_changes_nothing() {
    let temp_dir = TempDir::new().unwrap();

    let output = grinstall(&temp_dir)
        .args(["install", "--dry-run", "--force", "--os", "CentOS", "--arch", "x86_64", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["action"], "dry_run");
    assert_eq!(
        json["url"],
        "https://gr-framework.org/downloads/gr-0.17.3-CentOS-x86_64.tar.gz"
    );
    assert!(!temp_dir.path().join("gr").exists());
}

#[test]
fn test_install_json_output_is_only_the_report() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/gr-0.17.3-Linux-x86_64.tar.gz")
        .with_status(200)
        .with_body(runtime_archive())
        .create();

    let temp_dir = TempDir::new().unwrap();
    let site = temp_dir.path().join("site");

    let output = grinstall(&temp_dir)
        .args(["install", "--os", "Linux", "--arch", "x86_64", "--force", "--json", "--base-url"])
        .arg(server.url())
        .arg("--install-dir")
        .arg(&site)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["action"], "downloaded");
    assert_eq!(json["files_installed"], 2);
    assert!(json["runtime"].is_string());
}

#[test]
fn test_install_rejects_bad_digest() {
    let temp_dir = TempDir::new().unwrap();

    grinstall(&temp_dir)
        .args(["install", "--force", "--os", "Linux", "--sha256", "not-a-digest"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unsupported digest"));
}
