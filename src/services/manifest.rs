use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::models::layout::{InstallLayout, PACKAGE_DATA};
use crate::utils::error::{InstallError, Result};

/// One `package_data` pattern, compiled
#[derive(Debug, Clone)]
pub struct DataPattern {
    pattern: String,
    regex: Regex,
}

impl DataPattern {
    /// Compile a pattern where `*` matches within a single path segment
    pub fn new(pattern: &str) -> Result<Self> {
        let body = pattern
            .split('*')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join("[^/]*");
        let regex = Regex::new(&format!("^{body}$"))
            .map_err(|e| InstallError::Config(format!("Invalid package data pattern '{pattern}': {e}")))?;
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    pub fn matches(&self, relative: &str) -> bool {
        self.regex.is_match(relative)
    }
}

/// A file bundled with the package
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestEntry {
    /// Path relative to the package directory, `/`-separated
    pub path: String,
    pub size: u64,
}

/// Collects the installed files that ship with the `gr` package
#[derive(Debug, Clone)]
pub struct PackageManifest {
    patterns: Vec<DataPattern>,
}

impl PackageManifest {
    pub fn new() -> Result<Self> {
        Self::with_patterns(PACKAGE_DATA)
    }

    pub fn with_patterns(patterns: &[&str]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| DataPattern::new(p))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    pub fn is_package_data(&self, relative: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(relative))
    }

    /// Files under the package directory matching any pattern, sorted by path
    pub fn collect(&self, layout: &InstallLayout) -> Result<Vec<ManifestEntry>> {
        let package_dir = layout.package_dir();
        if !package_dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for entry in WalkDir::new(&package_dir).min_depth(1) {
            let entry = entry.map_err(|e| {
                InstallError::Io(std::io::Error::other(format!(
                    "Failed to walk {}: {e}",
                    package_dir.display()
                )))
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let Some(relative) = relative_slash_path(&package_dir, entry.path()) else {
                continue;
            };
            if self.is_package_data(&relative) {
                let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
                entries.push(ManifestEntry { path: relative, size });
            }
        }

        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }
}

fn relative_slash_path(root: &Path, path: &Path) -> Option<String> {
    let relative: PathBuf = path.strip_prefix(root).ok()?.to_path_buf();
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}
