// Contract test for `grinstall detect`

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

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
fn test_detect_with_overrides() {
    let temp_dir = TempDir::new().unwrap();

    grinstall(&temp_dir)
        .args(["detect", "--os", "ubuntu", "--arch", "x86_64", "--runtime-version", "0.18.0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Operating system: Ubuntu"))
        .stdout(predicate::str::contains(
            "https://gr-framework.org/downloads/gr-0.18.0-Ubuntu-x86_64.tar.gz",
        ));
}

#[test]
fn test_detect_json_output() {
    let temp_dir = TempDir::new().unwrap();

    let output = grinstall(&temp_dir)
        .args(["detect", "--os", "Darwin", "--arch", "i686", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["os"], "Darwin");
    assert_eq!(json["arch"], "i686");
    assert_eq!(
        json["url"],
        "https://gr-framework.org/downloads/gr-0.17.3-Darwin-i686.tar.gz"
    );
}

#[test]
fn test_detect_reads_environment_and_config_file() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join("grinstall.toml"),
        "base_url = \"http://mirror.local/gr\"\nos = \"Debian\"\n",
    )
    .unwrap();

    grinstall(&temp_dir)
        .env("GRINSTALL_RUNTIME_VERSION", "0.21.1")
        .args(["detect", "--arch", "x86_64"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "http://mirror.local/gr/gr-0.21.1-Debian-x86_64.tar.gz",
        ));
}

#[test]
fn test_detect_rejects_unknown_os() {
    let temp_dir = TempDir::new().unwrap();

    grinstall(&temp_dir)
        .args(["detect", "--os", "plan9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown operating system"));
}

#[test]
fn test_invalid_config_file_exit_code() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("broken.toml"), "runtime_version = [").unwrap();

    grinstall(&temp_dir)
        .args(["--config", "broken.toml", "detect"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Configuration error"));
}
