//! Terminal host: argument parsing, configuration, effect execution and
//! rendering around the pure `archive_core` state machine.
mod app;
mod cli;
mod config;
mod effects;
mod logging;
mod render;

use std::process::ExitCode;

use clap::Parser;

pub fn run() -> ExitCode {
    let cli = cli::Cli::parse();
    match app::run_app(cli) {
        Ok(status) => status.into(),
        Err(err) => {
            eprintln!("error: {err:#}");
            app::Status::Error.into()
        }
    }
}
