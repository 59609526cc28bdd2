//! Configuration model for pdl-bridge.
//!
//! This module defines the BridgeConfig struct loaded from the optional
//! `--config` YAML file. It supports forward-compatible YAML parsing (unknown
//! fields are ignored), defaults for every field, command-line overrides,
//! and validation of the merged result.

mod model;
mod operations;
pub mod types;


// Re-export public API
pub use model::{BridgeConfig, EngineSettings, Overrides};
pub use types::EngineKind;
