// Common error types for grinstall

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    /// The distribution server answered, but not with the archive
    #[error("GR runtime not found on: {url}")]
    RuntimeNotFound { url: String },

    #[error("Archive error: {0}")]
    Archive(String),

    #[error("Integrity check failed for {url}: expected {expected}, got {actual}")]
    Integrity {
        url: String,
        expected: String,
        actual: String,
    },

    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// Post-install verification could not find the runtime library
    #[error("Unable to install GR runtime (searched: {})", format_paths(.searched))]
    RuntimeMissing { searched: Vec<PathBuf> },
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, InstallError>;

/// Error as presented to the person running the command
#[derive(Debug)]
pub struct UserError {
    pub message: String,
    pub hint: Option<String>,
    pub exit_code: i32,
}

impl UserError {
    pub fn from_install_error(err: &InstallError) -> Self {
        let (hint, exit_code) = match err {
            InstallError::Config(_) => (
                Some("Check grinstall.toml or the command line flags".to_string()),
                2,
            ),
            InstallError::Network(_) | InstallError::RuntimeNotFound { .. } => (
                Some("Check the --base-url and --runtime-version values, or your network connection".to_string()),
                3,
            ),
            InstallError::UnsupportedPlatform(_) => (
                Some("Use --os and --arch to pick a published build".to_string()),
                3,
            ),
            InstallError::RuntimeMissing { .. } => (
                Some("Install GR manually and point GRDIR at it".to_string()),
                4,
            ),
            InstallError::Integrity { .. } => (
                Some("The archive may be corrupted or the pinned digest is stale".to_string()),
                1,
            ),
            InstallError::Io(_) | InstallError::Archive(_) => (None, 1),
        };

        Self {
            message: err.to_string(),
            hint,
            exit_code,
        }
    }

    pub fn print(&self) {
        eprintln!("error: {}", self.message);
        if let Some(hint) = &self.hint {
            eprintln!("  hint: {hint}");
        }
    }
}
