// Manifest command implementation

use clap::Args;
use std::path::PathBuf;

use crate::models::layout::InstallLayout;
use crate::services::manifest::PackageManifest;
use crate::utils::config::InstallerConfig;
use crate::utils::error::{InstallError, Result};

#[derive(Debug, Args)]
pub struct ManifestCommand {
    /// Directory containing the gr/ package directory (default: current directory)
    #[arg(long, value_name = "DIR")]
    pub install_dir: Option<PathBuf>,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ManifestCommand {
    pub fn run(&self, config: InstallerConfig) -> Result<()> {
        let base = match &self.install_dir {
            Some(dir) => dir.clone(),
            None => config.install_base()?,
        };
        let layout = InstallLayout::new(base);
        let entries = PackageManifest::new()?.collect(&layout)?;

        if self.json {
            let json = serde_json::to_string_pretty(&entries)
                .map_err(|e| InstallError::Config(format!("Failed to serialize manifest: {e}")))?;
            println!("{json}");
            return Ok(());
        }

        if entries.is_empty() {
            println!("No package data under {}", layout.package_dir().display());
            return Ok(());
        }
        for entry in &entries {
            println!("{:>10}  {}", entry.size, entry.path);
        }
        let total: u64 = entries.iter().map(|e| e.size).sum();
        println!("{} files, {total} bytes", entries.len());
        Ok(())
    }
}
