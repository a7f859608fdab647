use std::path::{Path, PathBuf};

use grinstall::models::distribution::{Distribution, DEFAULT_BASE_URL};
use grinstall::models::platform::{Architecture, OperatingSystem, Platform};

fn etc(name: &str, contents: &str) -> (PathBuf, String) {
    (Path::new("/etc").join(name), contents.to_string())
}

fn url_for(target_os: &str, release_files: &[(PathBuf, String)], arch: Architecture) -> Option<String> {
    let os = OperatingSystem::classify(target_os, release_files)?;
    let dist = Distribution::new(DEFAULT_BASE_URL, "0.17.3", Platform::new(os, arch)).ok()?;
    Some(dist.url())
}

/// Typical hosts map to the published archive names
#[test]
fn test_urls_for_common_hosts() {
    let ubuntu = [
        etc("lsb-release", "DISTRIB_ID=Ubuntu\n"),
        etc("os-release", "NAME=\"Ubuntu\"\nID=ubuntu\n"),
    ];
    assert_eq!(
        url_for("linux", &ubuntu, Architecture::X86_64).as_deref(),
        Some("https://gr-framework.org/downloads/gr-0.17.3-Ubuntu-x86_64.tar.gz")
    );

    let centos = [
        etc("centos-release", "CentOS Linux release 7.4.1708 (Core)\n"),
        etc("os-release", "ID=\"centos\"\n"),
        etc("redhat-release", "CentOS Linux release 7.4.1708 (Core)\n"),
    ];
    assert_eq!(
        url_for("linux", &centos, Architecture::X86_64).as_deref(),
        Some("https://gr-framework.org/downloads/gr-0.17.3-CentOS-x86_64.tar.gz")
    );

    assert_eq!(
        url_for("macos", &[], Architecture::X86_64).as_deref(),
        Some("https://gr-framework.org/downloads/gr-0.17.3-Darwin-x86_64.tar.gz")
    );
    assert_eq!(
        url_for("windows", &[], Architecture::I686).as_deref(),
        Some("https://gr-framework.org/downloads/gr-0.17.3-Windows-i686.tar.gz")
    );
}

/// Hosts without a published build produce no URL
#[test]
fn test_unsupported_host_has_no_url() {
    assert_eq!(url_for("openbsd", &[], Architecture::X86_64), None);
}

/// Host detection always yields a published architecture
#[test]
fn test_host_detection_is_consistent() {
    let arch = Architecture::detect();
    if cfg!(target_pointer_width = "64") {
        assert_eq!(arch, Architecture::X86_64);
    } else {
        assert_eq!(arch, Architecture::I686);
    }

    if cfg!(any(target_os = "linux", target_os = "macos", target_os = "windows")) {
        assert!(OperatingSystem::detect().is_some());
    }
}
