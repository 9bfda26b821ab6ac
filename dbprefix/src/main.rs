//! List and export the prefixed tables of a WordPress database.
//!
//! # Security Guarantees
//! - The password never appears in logs, errors or the mysqldump command line
//! - mysqldump is started from an argument vector, never through a shell
//! - Discovery is read-only

use clap::Parser;
use dbprefix::{cli::Cli, commands};
use dbprefix_core::{error::EXIT_FAILURE, init_logging};
use std::error::Error;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.global.verbose, cli.global.quiet) {
        eprintln!("Error: {}", e);
        return ExitCode::from(EXIT_FAILURE);
    }

    match commands::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("  Caused by: {}", cause);
                source = cause.source();
            }
            ExitCode::from(e.exit_code())
        }
    }
}
