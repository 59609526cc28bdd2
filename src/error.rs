//! Error types for the pdl-bridge CLI.
//!
//! Uses thiserror for derive macros. Every variant maps to exactly one
//! [`ErrorKind`], which is what the caller sees as `error_type`.

use crate::engine::EngineError;
use crate::exit_codes;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Closed set of failure kinds reported in the `error_type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    FileNotFound,
    YamlError,
    MissingField,
    TemplateNotFound,
    InvalidRequest,
    AiError,
    ConfigError,
    InternalError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::FileNotFound => "file_not_found",
            ErrorKind::YamlError => "yaml_error",
            ErrorKind::MissingField => "missing_field",
            ErrorKind::TemplateNotFound => "template_not_found",
            ErrorKind::InvalidRequest => "invalid_request",
            ErrorKind::AiError => "ai_error",
            ErrorKind::ConfigError => "config_error",
            ErrorKind::InternalError => "internal_error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main error type for bridge operations.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// The template document does not exist.
    #[error("PDL file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// The template document is not valid YAML or has the wrong shape.
    #[error("YAML parsing error: {0}")]
    Yaml(String),

    /// A required request field is absent.
    #[error("Missing required field: '{0}'")]
    MissingField(String),

    /// The requested template is not defined under `defs`.
    #[error("Template '{0}' not found in PDL configuration")]
    TemplateNotFound(String),

    /// The request could not be decoded.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The template engine failed to produce text.
    #[error("AI generation error: {0}")]
    Engine(#[from] EngineError),

    /// The bridge configuration file could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Anything not covered above (I/O failures, serialization).
    #[error("{0}")]
    Internal(String),
}

impl BridgeError {
    /// Returns the `error_type` reported for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            BridgeError::FileNotFound { .. } => ErrorKind::FileNotFound,
            BridgeError::Yaml(_) => ErrorKind::YamlError,
            BridgeError::MissingField(_) => ErrorKind::MissingField,
            BridgeError::TemplateNotFound(_) => ErrorKind::TemplateNotFound,
            BridgeError::InvalidRequest(_) => ErrorKind::InvalidRequest,
            BridgeError::Engine(_) => ErrorKind::AiError,
            BridgeError::Config(_) => ErrorKind::ConfigError,
            BridgeError::Internal(_) => ErrorKind::InternalError,
        }
    }

    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        exit_codes::FAILURE
    }
}

/// Result type alias for bridge operations.
pub type Result<T> = std::result::Result<T, BridgeError>;
