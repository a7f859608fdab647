// Configuration loading and validation

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::distribution::{DEFAULT_BASE_URL, DEFAULT_RUNTIME_VERSION};
use crate::models::platform::{Architecture, OperatingSystem};
use crate::utils::error::{InstallError, Result};

pub const CONFIG_FILE_NAME: &str = "grinstall.toml";

pub const ENV_RUNTIME_VERSION: &str = "GRINSTALL_RUNTIME_VERSION";
pub const ENV_BASE_URL: &str = "GRINSTALL_BASE_URL";
pub const ENV_GRDIR: &str = "GRDIR";

/// Installer settings, layered defaults → file → environment → flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InstallerConfig {
    pub runtime_version: String,
    pub base_url: String,
    /// Directory that receives the `gr/` package directory
    pub install_dir: Option<PathBuf>,
    /// Timeout for the archive download in seconds
    pub timeout_secs: u64,
    /// Existing GR installation to accept instead of downloading
    pub grdir: Option<PathBuf>,
    /// Additional directories searched for the runtime library
    pub search_dirs: Vec<PathBuf>,
    /// Pinned archive digest, `sha256-<base64>` or hex
    pub sha256: Option<String>,
    pub os: Option<OperatingSystem>,
    pub arch: Option<Architecture>,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            runtime_version: DEFAULT_RUNTIME_VERSION.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            install_dir: None,
            timeout_secs: 300, // 5 minutes
            grdir: None,
            search_dirs: Vec::new(),
            sha256: None,
            os: None,
            arch: None,
        }
    }
}

impl InstallerConfig {
    /// Resolve configuration: an explicit file must exist, otherwise the first
    /// of `./grinstall.toml` and the user config file is used if present.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => ConfigParser::load_file(path)?,
            None => match Self::discover() {
                Some(path) => ConfigParser::load_file(&path)?,
                None => Self::default(),
            },
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn discover() -> Option<PathBuf> {
        let local = PathBuf::from(CONFIG_FILE_NAME);
        if local.is_file() {
            return Some(local);
        }
        get_user_config_path().filter(|p| p.is_file())
    }

    /// Overlay values from environment variables
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(version) = non_empty(ENV_RUNTIME_VERSION) {
            self.runtime_version = version;
        }
        if let Some(url) = non_empty(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(grdir) = non_empty(ENV_GRDIR) {
            self.grdir = Some(PathBuf::from(grdir));
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.runtime_version.trim().is_empty() {
            return Err(InstallError::Config("runtime_version cannot be empty".to_string()));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(InstallError::Config(format!(
                "base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(InstallError::Config("timeout_secs must be greater than zero".to_string()));
        }
        Ok(())
    }

    /// Install base, defaulting to the current directory
    pub fn install_base(&self) -> Result<PathBuf> {
        match &self.install_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(std::env::current_dir()?),
        }
    }
}

/// TOML parsing for installer configuration files
pub struct ConfigParser;

impl ConfigParser {
    pub fn load_file(path: &Path) -> Result<InstallerConfig> {
        if !path.exists() {
            return Err(InstallError::Config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            InstallError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        tracing::debug!(path = %path.display(), "loading configuration");
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<InstallerConfig> {
        toml::from_str(content)
            .map_err(|e| InstallError::Config(format!("Invalid TOML syntax: {e}")))
    }
}

pub fn get_user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("grinstall").join("config.toml"))
}
