use crate::models::platform::Platform;
use crate::utils::error::{InstallError, Result};
use serde::{Deserialize, Serialize};

/// Server the prebuilt runtime archives are published on
pub const DEFAULT_BASE_URL: &str = "https://gr-framework.org/downloads";

/// Runtime version the bindings are built against
pub const DEFAULT_RUNTIME_VERSION: &str = "0.17.3";

/// A published runtime archive for one platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distribution {
    pub base_url: String,
    pub version: String,
    pub platform: Platform,
}

impl Distribution {
    pub fn new(base_url: impl Into<String>, version: impl Into<String>, platform: Platform) -> Result<Self> {
        let base_url = base_url.into();
        let version = version.into();

        if version.trim().is_empty() {
            return Err(InstallError::Config("Runtime version cannot be empty".to_string()));
        }
        if base_url.trim().is_empty() {
            return Err(InstallError::Config("Base URL cannot be empty".to_string()));
        }

        Ok(Self {
            base_url,
            version,
            platform,
        })
    }

    /// Archive file name, e.g. `gr-0.17.3-Ubuntu-x86_64.tar.gz`
    pub fn file_name(&self) -> String {
        format!(
            "gr-{version}-{os}-{arch}.tar.gz",
            version = self.version,
            os = self.platform.os,
            arch = self.platform.arch
        )
    }

    pub fn url(&self) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), self.file_name())
    }
}
