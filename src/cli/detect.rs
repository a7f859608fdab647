// Detect command implementation

use clap::Args;
use serde::Serialize;

use crate::models::distribution::Distribution;
use crate::models::layout::runtime_library_name;
use crate::models::platform::{Architecture, OperatingSystem, Platform};
use crate::utils::config::InstallerConfig;
use crate::utils::error::{InstallError, Result};

#[derive(Debug, Args)]
pub struct DetectCommand {
    /// Runtime version used for the URL
    #[arg(long, value_name = "VERSION")]
    pub runtime_version: Option<String>,
    /// Override the detected operating system
    #[arg(long)]
    pub os: Option<OperatingSystem>,
    /// Override the detected architecture
    #[arg(long)]
    pub arch: Option<Architecture>,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
pub struct DetectResponse {
    pub os: OperatingSystem,
    pub arch: Architecture,
    pub runtime_version: String,
    pub url: String,
    pub library: &'static str,
}

impl DetectCommand {
    pub fn run(&self, config: InstallerConfig) -> Result<()> {
        let response = self.resolve(&config)?;

        if self.json {
            let json = serde_json::to_string_pretty(&response)
                .map_err(|e| InstallError::Config(format!("Failed to serialize response: {e}")))?;
            println!("{json}");
        } else {
            println!("Operating system: {}", response.os);
            println!("Architecture:     {}", response.arch);
            println!("Runtime version:  {}", response.runtime_version);
            println!("Archive URL:      {}", response.url);
            println!("Runtime library:  {}", response.library);
        }
        Ok(())
    }

    pub fn resolve(&self, config: &InstallerConfig) -> Result<DetectResponse> {
        let os = self.os.or(config.os);
        let arch = self.arch.or(config.arch);
        let platform = Platform::detect_with(os, arch)
            .ok_or_else(|| InstallError::UnsupportedPlatform(std::env::consts::OS.to_string()))?;

        let version = self
            .runtime_version
            .clone()
            .unwrap_or_else(|| config.runtime_version.clone());
        let distribution = Distribution::new(&config.base_url, version, platform)?;

        Ok(DetectResponse {
            os: platform.os,
            arch: platform.arch,
            url: distribution.url(),
            runtime_version: distribution.version,
            library: runtime_library_name(std::env::consts::OS),
        })
    }
}
