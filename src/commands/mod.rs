//! Command implementations for pdl-bridge.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations. Each command writes exactly the responses it owes to
//! stdout and returns the process exit code. An `Err` means stdout itself
//! failed and no response could be delivered.

mod render;
mod serve;
mod templates;

use crate::bridge::Bridge;
use crate::cli::{Cli, Command, GlobalOptions};
use crate::config::BridgeConfig;
use crate::error::{BridgeError, Result};
use crate::protocol::BridgeResponse;
use std::io::{self, Write};

pub use render::cmd_render;
pub use serve::cmd_serve;
pub use templates::cmd_templates;

/// Dispatch a command to its implementation.
pub fn dispatch(cli: Cli) -> Result<i32> {
    let stdin = io::stdin();
    let stdout = io::stdout();

    match cli.command.unwrap_or(Command::Render) {
        Command::Render => cmd_render(&cli.options, stdin.lock(), stdout.lock()),
        Command::Serve => cmd_serve(&cli.options, stdin.lock(), stdout.lock()),
        Command::Templates(args) => cmd_templates(&cli.options, &args, stdout.lock()),
    }
}

/// Load the config named by the options and build a bridge from it.
fn load_bridge(options: &GlobalOptions) -> Result<Bridge> {
    let config = BridgeConfig::resolve(options.config.as_deref(), options.overrides())?;
    Bridge::from_config(&config)
}

/// Write one response line, mapping stdout failures to an internal error.
fn emit<W: Write>(out: &mut W, response: &BridgeResponse) -> Result<()> {
    response
        .write_line(out)
        .map_err(|e| BridgeError::Internal(format!("failed to write response to stdout: {}", e)))
}
