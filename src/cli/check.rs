// Check command implementation

use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use crate::models::layout::InstallLayout;
use crate::models::receipt::InstallReceipt;
use crate::services::runtime_locator::RuntimeLocator;
use crate::utils::config::InstallerConfig;
use crate::utils::error::{InstallError, Result};

#[derive(Debug, Args)]
pub struct CheckCommand {
    /// Directory containing the gr/ package directory (default: current directory)
    #[arg(long, value_name = "DIR")]
    pub install_dir: Option<PathBuf>,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub found: bool,
    pub runtime: Option<PathBuf>,
    pub searched: Vec<PathBuf>,
    pub receipt: Option<InstallReceipt>,
}

impl CheckCommand {
    pub fn run(&self, mut config: InstallerConfig) -> Result<()> {
        if let Some(dir) = &self.install_dir {
            config.install_dir = Some(dir.clone());
        }
        let layout = InstallLayout::new(config.install_base()?);
        let locator = RuntimeLocator::new(&layout, config.grdir.as_deref(), &config.search_dirs);

        let response = Self::inspect(&layout, &locator, !self.json)?;

        if self.json {
            let json = serde_json::to_string_pretty(&response)
                .map_err(|e| InstallError::Config(format!("Failed to serialize response: {e}")))?;
            println!("{json}");
        } else if let Some(runtime) = &response.runtime {
            println!("✓ GR runtime found at {}", runtime.display());
            if let Some(receipt) = &response.receipt {
                println!(
                    "  installed {} for {} on {}",
                    receipt.runtime_version,
                    receipt.platform,
                    receipt.installed_at.format("%Y-%m-%d %H:%M:%S UTC")
                );
            }
        }

        if response.found {
            Ok(())
        } else {
            Err(InstallError::RuntimeMissing {
                searched: response.searched,
            })
        }
    }

    pub fn inspect(layout: &InstallLayout, locator: &RuntimeLocator, verbose: bool) -> Result<CheckResponse> {
        let runtime = locator.load_runtime(!verbose);
        let receipt = InstallReceipt::load(&layout.receipt_path())?;

        Ok(CheckResponse {
            found: runtime.is_some(),
            runtime,
            searched: locator.candidates(),
            receipt,
        })
    }
}
