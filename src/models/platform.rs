use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const OS_RELEASE: &str = "os-release";
const REDHAT_RELEASE: &str = "redhat-release";

/// Operating systems for which prebuilt runtime archives are published
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperatingSystem {
    Darwin,
    Windows,
    Ubuntu,
    Debian,
    CentOS,
    /// Generic Linux build, used when the distribution is not recognised
    Linux,
}

impl OperatingSystem {
    /// Token used for this OS in distribution file names
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Darwin => "Darwin",
            Self::Windows => "Windows",
            Self::Ubuntu => "Ubuntu",
            Self::Debian => "Debian",
            Self::CentOS => "CentOS",
            Self::Linux => "Linux",
        }
    }

    pub const fn all() -> &'static [Self] {
        &[
            Self::Darwin,
            Self::Windows,
            Self::Ubuntu,
            Self::Debian,
            Self::CentOS,
            Self::Linux,
        ]
    }

    pub const fn is_darwin(&self) -> bool {
        matches!(self, Self::Darwin)
    }

    /// Classify a host from its Rust target OS name and the `/etc/*-release`
    /// files found on it, given as `(path, contents)` pairs.
    pub fn classify(target_os: &str, release_files: &[(PathBuf, String)]) -> Option<Self> {
        match target_os {
            "macos" => Some(Self::Darwin),
            "windows" => Some(Self::Windows),
            "linux" => Some(Self::classify_linux(release_files)),
            _ => None,
        }
    }

    fn classify_linux(release_files: &[(PathBuf, String)]) -> Self {
        let has = |name: &str| {
            release_files
                .iter()
                .any(|(path, _)| path.file_name().is_some_and(|n| n == name))
        };
        let release_info = release_files
            .iter()
            .map(|(_, contents)| contents.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        if has(OS_RELEASE) {
            if release_info.contains("ID=ubuntu") {
                return Self::Ubuntu;
            }
            if release_info.contains("ID=debian") {
                return Self::Debian;
            }
        }
        if has(REDHAT_RELEASE) && release_info.contains("release 7") {
            return Self::CentOS;
        }
        Self::Linux
    }

    /// Detect the operating system of the running host
    pub fn detect() -> Option<Self> {
        let release_files = if std::env::consts::OS == "linux" {
            read_release_files(Path::new("/etc"))
        } else {
            Vec::new()
        };
        Self::classify(std::env::consts::OS, &release_files)
    }
}

impl fmt::Display for OperatingSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperatingSystem {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .find(|os| os.as_str().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| PlatformError::UnknownOperatingSystem(s.to_string()))
    }
}

/// Read every `*-release` file directly under `etc_dir`, sorted by path.
/// Unreadable files are skipped.
pub fn read_release_files(etc_dir: &Path) -> Vec<(PathBuf, String)> {
    let Ok(entries) = fs::read_dir(etc_dir) else {
        return Vec::new();
    };

    let mut files: Vec<(PathBuf, String)> = entries
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.ends_with("-release"))
        })
        .filter_map(|path| {
            let contents = fs::read_to_string(&path).ok()?;
            Some((path, contents))
        })
        .collect();
    files.sort_by(|a, b| a.0.cmp(&b.0));
    tracing::debug!(count = files.len(), dir = %etc_dir.display(), "read release files");
    files
}

/// CPU architectures for which prebuilt runtime archives are published
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Architecture {
    #[serde(rename = "x86_64")]
    X86_64,
    #[serde(rename = "i686")]
    I686,
}

impl Architecture {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::X86_64 => "x86_64",
            Self::I686 => "i686",
        }
    }

    /// 64-bit hosts get the `x86_64` build, everything else `i686`
    pub const fn from_pointer_width(bits: u32) -> Self {
        if bits > 32 {
            Self::X86_64
        } else {
            Self::I686
        }
    }

    pub const fn detect() -> Self {
        Self::from_pointer_width(usize::BITS)
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Architecture {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "x86_64" | "amd64" => Ok(Self::X86_64),
            "i686" | "i386" | "x86" => Ok(Self::I686),
            _ => Err(PlatformError::UnknownArchitecture(s.to_string())),
        }
    }
}

/// Target platform of a runtime archive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Platform {
    pub os: OperatingSystem,
    pub arch: Architecture,
}

impl Platform {
    pub const fn new(os: OperatingSystem, arch: Architecture) -> Self {
        Self { os, arch }
    }

    /// Detect the host platform, applying any explicit overrides.
    /// Returns `None` when the OS is neither overridden nor recognised.
    pub fn detect_with(os: Option<OperatingSystem>, arch: Option<Architecture>) -> Option<Self> {
        let os = os.or_else(OperatingSystem::detect)?;
        let arch = arch.unwrap_or_else(Architecture::detect);
        Some(Self::new(os, arch))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os, self.arch)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PlatformError {
    #[error("Unknown operating system '{0}'")]
    UnknownOperatingSystem(String),

    #[error("Unknown architecture '{0}'")]
    UnknownArchitecture(String),
}
