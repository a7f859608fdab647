// grinstall - GR runtime installer
// Main CLI entry point

use clap::Parser;
use grinstall::cli::{Cli, CliDispatcher};
use grinstall::utils::error::UserError;
use grinstall::utils::logging;
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = logging::init(cli.verbose) {
        eprintln!("warning: {err}");
    }

    let result = CliDispatcher::execute(cli).await;

    if let Err(err) = result {
        let user_error = UserError::from_install_error(&err);
        user_error.print();
        process::exit(user_error.exit_code);
    }
}
