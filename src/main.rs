//! pdl-bridge: render PDL templates for another process over stdin/stdout.
//!
//! This is the main entry point for the `pdl-bridge` CLI. It parses arguments,
//! installs stderr logging, dispatches to the command handler, and turns the
//! outcome into the process exit code.

mod bridge;
mod cli;
mod commands;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod exit_codes;
mod logging;
pub mod protocol;

use cli::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    logging::init(cli.options.verbose);

    match commands::dispatch(cli) {
        Ok(code) => ExitCode::from(code as u8),
        Err(err) => {
            // stdout is gone; stderr is the only channel left
            eprintln!("Error: {}", err);
            ExitCode::from(err.exit_code() as u8)
        }
    }
}
