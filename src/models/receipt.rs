use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::models::platform::Platform;
use crate::utils::error::{InstallError, Result};

/// Record of a runtime install, written next to the installed files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallReceipt {
    pub runtime_version: String,
    pub platform: Platform,
    pub url: String,
    pub installed_at: DateTime<Utc>,
    /// Final file locations, relative to the install base
    pub files: Vec<PathBuf>,
}

impl InstallReceipt {
    pub fn new(runtime_version: String, platform: Platform, url: String, files: Vec<PathBuf>) -> Self {
        Self {
            runtime_version,
            platform,
            url,
            installed_at: Utc::now(),
            files,
        }
    }

    /// Write the receipt through a temporary file in the same directory
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent)?;

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| InstallError::Config(format!("Failed to serialize receipt: {e}")))?;
        let mut file = NamedTempFile::new_in(parent)?;
        file.write_all(content.as_bytes())?;
        file.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    /// Load a receipt; a missing file is not an error
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        let receipt = serde_json::from_str(&content).map_err(|e| {
            InstallError::Config(format!("Invalid receipt {}: {e}", path.display()))
        })?;
        Ok(Some(receipt))
    }
}
