//! Template execution engines.
//!
//! The bridge never interprets PDL itself. It hands the selected template
//! definition and the caller's variables to a [`TemplateEngine`] and reports
//! whatever text comes back.
//!
//! - **Command**: spawns an external interpreter per request (the real PDL
//!   runtime, or any tool speaking the same stdin/stdout contract)
//! - **Builtin**: renders literal text blocks with `${ name }` interpolation,
//!   for documents that need no model calls and for offline use
//!
//! # Engine contract
//!
//! An engine receives an [`Invocation`] and returns the rendered text.
//! Structured results are the engine's business; the bridge only sees text.

mod builtin;
mod command;
mod interpolate;

pub use builtin::BuiltinEngine;
pub use command::CommandEngine;
pub use interpolate::InterpolateError;

use crate::config::{EngineKind, EngineSettings};
use serde_json::{Map, Value};
use std::path::Path;
use thiserror::Error;

/// Everything an engine needs to execute one template.
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    /// Name of the template under `defs`.
    pub template: &'a str,
    /// Resolved path of the document the template came from.
    pub pdl_file: &'a Path,
    /// The template definition, as written in the document.
    pub definition: &'a serde_yaml::Value,
    /// Caller-supplied variables, in request order.
    pub variables: &'a Map<String, Value>,
}

/// Executes template definitions.
pub trait TemplateEngine {
    /// Short name used in log output.
    fn name(&self) -> &'static str;

    /// Render one template with the given variables.
    fn execute(&self, invocation: &Invocation<'_>) -> Result<String, EngineError>;
}

/// Failures inside a template engine. All of them surface as `ai_error`.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Template(#[from] InterpolateError),

    #[error("unsupported block '{0}'; use the command engine to run full PDL programs")]
    Unsupported(String),

    #[error("{0}")]
    InvalidCommand(String),

    #[error("failed to execute engine command '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("engine command failed with {}{}", describe_exit(.code), describe_stderr(.stderr))]
    Failed { code: Option<i32>, stderr: String },

    #[error("engine command timed out after {seconds}s")]
    TimedOut { seconds: u64 },

    #[error("engine output is not valid UTF-8")]
    InvalidOutput,

    #[error("{0}")]
    Io(String),
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

fn describe_stderr(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {}", stderr)
    }
}

/// Build the engine selected by the configuration.
///
/// The command engine runs in `project_root`, so relative paths inside the
/// engine command resolve the same way request paths do.
pub fn build_engine(settings: &EngineSettings, project_root: &Path) -> Box<dyn TemplateEngine> {
    match settings.kind {
        EngineKind::Builtin => Box::new(BuiltinEngine),
        EngineKind::Command => Box::new(CommandEngine::new(settings, project_root)),
    }
}
