//! Configuration types and defaults for pdl-bridge.
//!
//! This module defines enums, constants, and default value functions
//! used by the BridgeConfig struct.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Template document used when a request carries no `pdl_file`.
pub const DEFAULT_PDL_FILE: &str = "./prompts/story-prompts.pdl";

/// Default timeout for the command engine in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 300;

/// Which engine executes template definitions.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    /// Render literal text blocks in-process.
    #[default]
    Builtin,
    /// Spawn the configured engine command per request.
    Command,
}

pub(crate) fn default_pdl_file() -> PathBuf {
    PathBuf::from(DEFAULT_PDL_FILE)
}

pub(crate) fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}
