// CLI module for command-line interface

pub mod check;
pub mod detect;
pub mod install;
pub mod manifest;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::utils::config::InstallerConfig;
use crate::utils::error::Result;

use self::check::CheckCommand;
use self::detect::DetectCommand;
use self::install::InstallCommand;
use self::manifest::ManifestCommand;

/// Main CLI structure
#[derive(Parser)]
#[command(name = "grinstall")]
#[command(about = "Fetch and install the prebuilt GR runtime for the GR bindings")]
#[command(long_about = r#"grinstall makes the GR runtime (GKS, GR and GR3 shared libraries)
available to the GR language bindings.

If a runtime is already installed it is reused. Otherwise the prebuilt archive
for this operating system and architecture is downloaded from the GR
distribution server and unpacked into the package's install tree.

Examples:
  grinstall install                          Install into ./gr unless already present
  grinstall install --install-dir build/lib  Install next to the built bindings
  grinstall detect                           Show the platform and download URL
  grinstall check                            Verify the runtime can be found
  grinstall manifest --json                  List files bundled with the package"#)]
#[command(version)]
pub struct Cli {
    /// Configuration file (default: ./grinstall.toml, then the user config dir)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// All available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Download and unpack the runtime unless it is already present
    #[command(long_about = r#"Download and unpack the GR runtime unless it is already present.

The archive name is built from the runtime version, the detected operating
system and the CPU architecture:

  <base-url>/gr-<version>-<os>-<arch>.tar.gz

Shared libraries are placed in gr/, plugins in gr/lib/. On macOS GKSTerm.app
is moved to gr/GKSTerm.app. The command fails if the runtime still cannot be
found afterwards.

Examples:
  grinstall install --force                  Reinstall even if a runtime is found
  grinstall install --os Ubuntu --arch x86_64 --dry-run
  grinstall install --sha256 sha256-<base64> Pin the archive digest"#)]
    Install(InstallCommand),

    /// Show the detected platform and the archive URL
    Detect(DetectCommand),

    /// Check that the runtime library can be found
    Check(CheckCommand),

    /// List the installed files bundled with the gr package
    Manifest(ManifestCommand),
}

/// CLI command dispatcher
pub struct CliDispatcher;

impl CliDispatcher {
    /// Execute a CLI command
    pub async fn execute(cli: Cli) -> Result<()> {
        let config = InstallerConfig::load(cli.config.as_deref())?;

        match cli.command {
            Commands::Install(cmd) => cmd.run(config).await,
            Commands::Detect(cmd) => cmd.run(config),
            Commands::Check(cmd) => cmd.run(config),
            Commands::Manifest(cmd) => cmd.run(config),
        }
    }
}
