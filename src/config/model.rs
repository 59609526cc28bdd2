//! Config struct definitions and default implementations.

use super::types::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Configuration for the bridge.
///
/// This struct represents the optional YAML file passed with `--config`.
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Directory that relative `pdl_file` paths are resolved against.
    /// Relative values are taken from the current working directory;
    /// unset means the current working directory itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_root: Option<PathBuf>,

    /// Template document used when a request has no `pdl_file`.
    #[serde(default = "default_pdl_file")]
    pub default_pdl_file: PathBuf,

    /// Template engine settings.
    #[serde(default)]
    pub engine: EngineSettings,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            project_root: None,
            default_pdl_file: default_pdl_file(),
            engine: EngineSettings::default(),
        }
    }
}

/// Settings for the template engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Engine implementation to use.
    #[serde(default)]
    pub kind: EngineKind,

    /// Command line for the command engine.
    ///
    /// Placeholders substituted per request:
    /// - `{template}` - Template name
    /// - `{pdl_file}` - Resolved template document path
    /// - `{project_root}` - Project root directory
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub command: String,

    /// Seconds before the engine command is killed.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Extra environment variables for the engine command.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub environment: BTreeMap<String, String>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            kind: EngineKind::default(),
            command: String::new(),
            timeout_seconds: default_timeout_seconds(),
            environment: BTreeMap::new(),
        }
    }
}

/// Values given on the command line (or their environment variables).
///
/// Each `Some` replaces the corresponding file or default value.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub project_root: Option<PathBuf>,
    pub default_pdl_file: Option<PathBuf>,
    pub engine: Option<EngineKind>,
    pub engine_command: Option<String>,
    pub timeout_seconds: Option<u64>,
}
