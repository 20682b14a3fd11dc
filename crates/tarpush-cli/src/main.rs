//! tarpush - tar the current directory and push it to a local service.

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    logging::init();

    let result = match &cli.command {
        cli::Commands::Push(args) => commands::push::execute(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
