//! Config loading, override merging, and validation.

use super::model::{BridgeConfig, Overrides};
use super::types::EngineKind;
use crate::error::{BridgeError, Result};
use std::path::{Path, PathBuf};

impl BridgeConfig {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            BridgeError::Config(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: BridgeConfig = serde_yaml::from_str(yaml)
            .map_err(|e| BridgeError::Config(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Build the effective config: file (if any), then overrides, then validation.
    pub fn resolve(path: Option<&Path>, overrides: Overrides) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply(overrides);
        config.validate()?;
        Ok(config)
    }

    /// Apply command-line overrides on top of the loaded values.
    ///
    /// An engine command without an explicit engine kind selects the
    /// command engine.
    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(root) = overrides.project_root {
            self.project_root = Some(root);
        }
        if let Some(pdl_file) = overrides.default_pdl_file {
            self.default_pdl_file = pdl_file;
        }
        if let Some(command) = overrides.engine_command {
            self.engine.command = command;
            if overrides.engine.is_none() {
                self.engine.kind = EngineKind::Command;
            }
        }
        if let Some(kind) = overrides.engine {
            self.engine.kind = kind;
        }
        if let Some(timeout) = overrides.timeout_seconds {
            self.engine.timeout_seconds = timeout;
        }
    }

    /// Validate config values.
    ///
    /// Validation rules:
    /// - `default_pdl_file` must not be empty
    /// - the command engine needs a non-empty `engine.command`
    /// - `engine.timeout_seconds` must be positive
    pub fn validate(&self) -> Result<()> {
        if self.default_pdl_file.as_os_str().is_empty() {
            return Err(BridgeError::Config(
                "config validation failed: default_pdl_file must not be empty".to_string(),
            ));
        }

        if self.engine.kind == EngineKind::Command && self.engine.command.trim().is_empty() {
            return Err(BridgeError::Config(
                "config validation failed: engine.command is required when engine.kind is 'command'"
                    .to_string(),
            ));
        }

        if self.engine.timeout_seconds == 0 {
            return Err(BridgeError::Config(
                "config validation failed: engine.timeout_seconds must be greater than 0"
                    .to_string(),
            ));
        }

        Ok(())
    }

    /// Absolute project root that relative template paths resolve against.
    pub fn effective_project_root(&self) -> Result<PathBuf> {
        match &self.project_root {
            Some(root) if root.is_absolute() => Ok(root.clone()),
            other => {
                let cwd = std::env::current_dir().map_err(|e| {
                    BridgeError::Config(format!(
                        "failed to get current working directory: {}",
                        e
                    ))
                })?;
                Ok(match other {
                    Some(relative) => cwd.join(relative),
                    None => cwd,
                })
            }
        }
    }
}
