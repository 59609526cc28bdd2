//! CLI argument parsing for pdl-bridge.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use crate::config::{EngineKind, Overrides};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// pdl-bridge: render PDL templates for another process over stdin/stdout.
///
/// Reads a JSON request `{pdl_file?, template, variables?}` from stdin and
/// writes one JSON response line to stdout. Exits 0 on success, 1 on any
/// failure; the response's `error_type` says which.
#[derive(Parser, Debug)]
#[command(name = "pdl-bridge")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub options: GlobalOptions,

    /// Defaults to `render` when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Bridge configuration file (YAML).
    #[arg(long, global = true, env = "PDL_BRIDGE_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory that relative `pdl_file` paths resolve against.
    #[arg(
        long,
        global = true,
        env = "PDL_BRIDGE_PROJECT_ROOT",
        value_name = "DIR"
    )]
    pub project_root: Option<PathBuf>,

    /// Template document used when a request has no `pdl_file`.
    #[arg(long, global = true, value_name = "PATH")]
    pub default_pdl_file: Option<PathBuf>,

    /// Template engine to execute definitions with.
    #[arg(long, global = true, value_enum)]
    pub engine: Option<EngineKind>,

    /// Command line for the command engine (implies `--engine command`).
    #[arg(long, global = true, value_name = "COMMAND")]
    pub engine_command: Option<String>,

    /// Seconds before the engine command is killed.
    #[arg(long, global = true, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl GlobalOptions {
    /// Values that override the config file.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            project_root: self.project_root.clone(),
            default_pdl_file: self.default_pdl_file.clone(),
            engine: self.engine,
            engine_command: self.engine_command.clone(),
            timeout_seconds: self.timeout,
        }
    }
}

/// Available commands for pdl-bridge.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Render one request read from stdin.
    ///
    /// Reads stdin to EOF, writes one response line, exits 0 or 1.
    Render,

    /// Render newline-delimited requests until stdin closes.
    ///
    /// Each input line is one request and produces one response line,
    /// in order. Blank lines are skipped. Exits 0 at end of input.
    Serve,

    /// List the templates defined in a document.
    Templates(TemplatesArgs),
}

/// Arguments for the `templates` command.
#[derive(Args, Debug, Clone)]
pub struct TemplatesArgs {
    /// Template document; the configured default when omitted.
    pub pdl_file: Option<PathBuf>,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
