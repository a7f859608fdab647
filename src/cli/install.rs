// Install command implementation
// Runs the installer and reports what it did

use clap::Args;
use std::path::PathBuf;

use crate::models::platform::{Architecture, OperatingSystem};
use crate::services::installer::{InstallAction, InstallOptions, InstallReport, RuntimeInstaller};
use crate::utils::config::InstallerConfig;
use crate::utils::error::{InstallError, Result};

#[derive(Debug, Args)]
pub struct InstallCommand {
    /// Directory that receives the gr/ package directory (default: current directory)
    #[arg(long, value_name = "DIR")]
    pub install_dir: Option<PathBuf>,
    /// Runtime version to download
    #[arg(long, value_name = "VERSION")]
    pub runtime_version: Option<String>,
    /// Distribution server base URL
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,
    /// Override the detected operating system
    #[arg(long)]
    pub os: Option<OperatingSystem>,
    /// Override the detected architecture
    #[arg(long)]
    pub arch: Option<Architecture>,
    /// Expected archive digest (sha256-<base64> or hex)
    #[arg(long, value_name = "DIGEST")]
    pub sha256: Option<String>,
    /// Download even if a runtime is already present
    #[arg(long)]
    pub force: bool,
    /// Print what would be downloaded without changing anything
    #[arg(long)]
    pub dry_run: bool,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl InstallCommand {
    pub async fn run(&self, config: InstallerConfig) -> Result<()> {
        let config = self.apply_to(config)?;
        let installer = RuntimeInstaller::new(config)?;

        let report = installer
            .run(InstallOptions {
                force: self.force,
                dry_run: self.dry_run,
                quiet: self.json,
            })
            .await?;

        if self.json {
            self.output_json_response(&report)
        } else {
            self.output_text_response(&report);
            Ok(())
        }
    }

    /// Overlay command line flags on the loaded configuration
    pub fn apply_to(&self, mut config: InstallerConfig) -> Result<InstallerConfig> {
        if let Some(dir) = &self.install_dir {
            config.install_dir = Some(dir.clone());
        }
        if let Some(version) = &self.runtime_version {
            config.runtime_version = version.clone();
        }
        if let Some(url) = &self.base_url {
            config.base_url = url.clone();
        }
        if self.os.is_some() {
            config.os = self.os;
        }
        if self.arch.is_some() {
            config.arch = self.arch;
        }
        if let Some(digest) = &self.sha256 {
            config.sha256 = Some(digest.clone());
        }
        config.validate()?;
        Ok(config)
    }

    fn output_json_response(&self, report: &InstallReport) -> Result<()> {
        let json = serde_json::to_string_pretty(report)
            .map_err(|e| InstallError::Config(format!("Failed to serialize report: {e}")))?;
        println!("{json}");
        Ok(())
    }

    fn output_text_response(&self, report: &InstallReport) {
        match report.action {
            InstallAction::AlreadyPresent => println!("Nothing to do."),
            InstallAction::Downloaded => println!(
                "Installed GR runtime: {} files ({} relocated), {:.1} MB in {:.1}s",
                report.files_installed,
                report.files_relocated,
                report.download_bytes as f64 / 1_048_576.0,
                report.duration_ms as f64 / 1000.0
            ),
            InstallAction::UnsupportedHost => {
                println!("No prebuilt runtime for this host; using the existing installation.");
            }
            InstallAction::DryRun => {
                if let Some(platform) = report.platform {
                    println!("Platform: {platform}");
                }
            }
        }
    }
}
