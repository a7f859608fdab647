use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::models::{
    distribution::Distribution,
    layout::{InstallLayout, PACKAGE_DIR},
    platform::Platform,
    receipt::InstallReceipt,
};
use crate::services::{
    downloader::{ExpectedDigest, RuntimeDownloader},
    extractor::{ArchiveExtractor, ExtractionReport},
    runtime_locator::RuntimeLocator,
};
use crate::utils::config::InstallerConfig;
use crate::utils::error::{InstallError, Result};

/// Flags for a single installer run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstallOptions {
    /// Download even when a runtime is already present
    pub force: bool,
    /// Resolve platform and URL, but do not download
    pub dry_run: bool,
    /// Suppress progress lines on stdout
    pub quiet: bool,
}

/// What the installer did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallAction {
    /// A usable runtime was found, nothing downloaded
    AlreadyPresent,
    /// An archive was downloaded and unpacked
    Downloaded,
    /// The host OS has no published build; only the final check ran
    UnsupportedHost,
    /// Nothing was changed
    DryRun,
}

/// Result of an installer run
#[derive(Debug, Clone, Serialize)]
pub struct InstallReport {
    pub action: InstallAction,
    pub platform: Option<Platform>,
    pub url: Option<String>,
    /// Runtime library found by the final check
    pub runtime: Option<PathBuf>,
    pub download_bytes: u64,
    pub files_installed: usize,
    pub files_relocated: usize,
    pub duration_ms: u128,
}

impl InstallReport {
    fn new(action: InstallAction) -> Self {
        Self {
            action,
            platform: None,
            url: None,
            runtime: None,
            download_bytes: 0,
            files_installed: 0,
            files_relocated: 0,
            duration_ms: 0,
        }
    }

    fn record_extraction(&mut self, extraction: &ExtractionReport) {
        self.files_installed = extraction.file_count();
        self.files_relocated = extraction.relocated.len();
    }
}

/// Build step that makes the GR runtime available to the bindings
#[derive(Debug)]
pub struct RuntimeInstaller {
    config: InstallerConfig,
    layout: InstallLayout,
    locator: RuntimeLocator,
    downloader: RuntimeDownloader,
    platform: Option<Platform>,
}

impl RuntimeInstaller {
    pub fn new(config: InstallerConfig) -> Result<Self> {
        let layout = InstallLayout::new(config.install_base()?);
        let locator = RuntimeLocator::new(&layout, config.grdir.as_deref(), &config.search_dirs);
        Self::with_locator(config, locator)
    }

    /// Create an installer with a custom runtime search (for testing)
    pub fn with_locator(config: InstallerConfig, locator: RuntimeLocator) -> Result<Self> {
        config.validate()?;
        let layout = InstallLayout::new(config.install_base()?);
        let downloader = RuntimeDownloader::new(config.timeout_secs)?;
        let platform = Platform::detect_with(config.os, config.arch);

        Ok(Self {
            config,
            layout,
            locator,
            downloader,
            platform,
        })
    }

    /// Replace the detected target platform; `None` acts as an unsupported host
    #[must_use]
    pub fn with_platform(mut self, platform: Option<Platform>) -> Self {
        self.platform = platform;
        self
    }

    pub const fn config(&self) -> &InstallerConfig {
        &self.config
    }

    pub const fn layout(&self) -> &InstallLayout {
        &self.layout
    }

    pub const fn locator(&self) -> &RuntimeLocator {
        &self.locator
    }

    /// Platform the archive will be fetched for, `None` on unsupported hosts
    pub const fn target_platform(&self) -> Option<Platform> {
        self.platform
    }

    pub fn distribution(&self, platform: Platform) -> Result<Distribution> {
        Distribution::new(&self.config.base_url, &self.config.runtime_version, platform)
    }

    /// Ensure the runtime is installed: reuse an existing one, otherwise
    /// download and unpack the archive for this host, then verify it loads.
    pub async fn run(&self, options: InstallOptions) -> Result<InstallReport> {
        let start = Instant::now();

        if !options.force {
            if let Some(existing) = self.locator.load_runtime(true) {
                progress(options, format_args!("✓ GR runtime already available at {}", existing.display()));
                let mut report = InstallReport::new(InstallAction::AlreadyPresent);
                report.runtime = Some(existing);
                report.duration_ms = start.elapsed().as_millis();
                return Ok(report);
            }
        }

        let mut report = match self.target_platform() {
            Some(platform) => self.install_for(platform, options).await?,
            None => {
                tracing::warn!(os = std::env::consts::OS, "no prebuilt GR runtime for this host");
                InstallReport::new(InstallAction::UnsupportedHost)
            }
        };

        if options.dry_run {
            report.duration_ms = start.elapsed().as_millis();
            return Ok(report);
        }

        let runtime = self.locator.load_runtime(false).ok_or_else(|| InstallError::RuntimeMissing {
            searched: self.locator.candidates(),
        })?;
        progress(options, format_args!("✓ GR runtime available at {}", runtime.display()));

        report.runtime = Some(runtime);
        report.duration_ms = start.elapsed().as_millis();
        Ok(report)
    }

    async fn install_for(&self, platform: Platform, options: InstallOptions) -> Result<InstallReport> {
        let distribution = self.distribution(platform)?;
        let url = distribution.url();

        if options.dry_run {
            progress(options, format_args!("Would download {url}"));
            let mut report = InstallReport::new(InstallAction::DryRun);
            report.platform = Some(platform);
            report.url = Some(url);
            return Ok(report);
        }

        let digest = self
            .config
            .sha256
            .as_deref()
            .map(ExpectedDigest::parse)
            .transpose()?;

        progress(
            options,
            format_args!("Downloading GR runtime {} for {platform}...", distribution.version),
        );
        let download = self.downloader.fetch_verified(&url, digest.as_ref()).await?;
        tracing::info!(bytes = download.size(), duration_ms = download.duration.as_millis(), "archive fetched");
        progress(
            options,
            format_args!("✓ Downloaded {} ({} bytes)", distribution.file_name(), download.size()),
        );

        let extractor = ArchiveExtractor::new(self.layout.clone());
        let extraction = extractor.extract_tar_gz(&download.data)?;
        let mut files = extraction.files.clone();

        if platform.os.is_darwin() {
            extractor.relocate_gksterm()?;
            let from = Path::new(PACKAGE_DIR).join("Applications").join("GKSTerm.app");
            let to = Path::new(PACKAGE_DIR).join("GKSTerm.app");
            for file in &mut files {
                if let Ok(rest) = file.strip_prefix(&from) {
                    let moved = to.join(rest);
                    *file = moved;
                }
            }
        }
        progress(
            options,
            format_args!(
                "✓ Installed {} files into {}",
                extraction.file_count(),
                self.layout.package_dir().display()
            ),
        );

        let receipt = InstallReceipt::new(distribution.version.clone(), platform, url.clone(), files);
        receipt.save(&self.layout.receipt_path())?;

        let mut report = InstallReport::new(InstallAction::Downloaded);
        report.platform = Some(platform);
        report.url = Some(url);
        report.download_bytes = download.size();
        report.record_extraction(&extraction);
        Ok(report)
    }
}

fn progress(options: InstallOptions, message: std::fmt::Arguments<'_>) {
    if !options.quiet {
        println!("{message}");
    }
}
