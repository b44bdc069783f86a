//! Logger setup for the terminal host.
//!
//! Warnings and errors go to stderr so stdout stays clean for listings.
//! `--verbose` raises the level to debug; a `log_file` in the config also
//! mirrors everything to that file.

use std::path::Path;

use archive_logging::LogDestination;
use log::LevelFilter;

pub fn init(verbose: bool, log_file: Option<&Path>) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    archive_logging::initialize(destination(log_file), level);
}

fn destination(log_file: Option<&Path>) -> LogDestination {
    match log_file {
        Some(path) => LogDestination::Both(path.to_path_buf()),
        None => LogDestination::Terminal,
    }
}
