//! Request and response types exchanged with the calling process.
//!
//! A request is one JSON object:
//!
//! ```json
//! {"pdl_file": "prompts/story.pdl", "template": "intro", "variables": {"hero": "Ada"}}
//! ```
//!
//! Every request produces exactly one response object, written as a single
//! line. Success and failure are told apart by the `success` field.

use crate::error::{BridgeError, ErrorKind, Result};
use crate::exit_codes;
use serde::Serialize;
use serde_json::{Map, Value};
use std::io::{self, Write};
use std::path::PathBuf;

/// A decoded render request.
#[derive(Debug, Clone, PartialEq)]
pub struct BridgeRequest {
    /// Template document; the configured default when absent.
    pub pdl_file: Option<PathBuf>,
    /// Name of the template under `defs`.
    pub template: String,
    /// Variables in the order the caller wrote them.
    pub variables: Map<String, Value>,
}

impl BridgeRequest {
    /// Decode a request from JSON text.
    ///
    /// Unknown fields are ignored. `null` is treated like an absent field.
    pub fn from_json(input: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(input)
            .map_err(|e| BridgeError::InvalidRequest(format!("request is not valid JSON: {}", e)))?;

        let Value::Object(mut fields) = value else {
            return Err(BridgeError::InvalidRequest(
                "request must be a JSON object".to_string(),
            ));
        };

        let template = match fields.remove("template") {
            Some(Value::String(name)) => name,
            _ => return Err(BridgeError::MissingField("template".to_string())),
        };

        let pdl_file = match fields.remove("pdl_file") {
            None | Some(Value::Null) => None,
            Some(Value::String(path)) => Some(PathBuf::from(path)),
            Some(_) => {
                return Err(BridgeError::InvalidRequest(
                    "field 'pdl_file' must be a string".to_string(),
                ));
            }
        };

        let variables = match fields.remove("variables") {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(variables)) => variables,
            Some(_) => {
                return Err(BridgeError::InvalidRequest(
                    "field 'variables' must be a JSON object".to_string(),
                ));
            }
        };

        Ok(Self {
            pdl_file,
            template,
            variables,
        })
    }

    /// Names of the supplied variables, in request order.
    pub fn variable_names(&self) -> Vec<String> {
        self.variables.keys().cloned().collect()
    }
}

/// Successful render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rendered {
    success: bool,
    pub content: String,
    pub template: String,
    pub variables_used: Vec<String>,
}

/// Successful template listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateListing {
    success: bool,
    pub pdl_file: String,
    pub templates: Vec<String>,
}

/// Failure report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Failure {
    success: bool,
    pub error: String,
    pub error_type: ErrorKind,
}

/// One response line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BridgeResponse {
    Rendered(Rendered),
    Listing(TemplateListing),
    Failure(Failure),
}

impl BridgeResponse {
    pub fn rendered(content: String, template: String, variables_used: Vec<String>) -> Self {
        BridgeResponse::Rendered(Rendered {
            success: true,
            content,
            template,
            variables_used,
        })
    }

    pub fn listing(pdl_file: String, templates: Vec<String>) -> Self {
        BridgeResponse::Listing(TemplateListing {
            success: true,
            pdl_file,
            templates,
        })
    }

    pub fn failure(err: &BridgeError) -> Self {
        BridgeResponse::Failure(Failure {
            success: false,
            error: err.to_string(),
            error_type: err.kind(),
        })
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, BridgeResponse::Failure(_))
    }

    /// Process exit code matching this response.
    pub fn exit_code(&self) -> i32 {
        if self.is_success() {
            exit_codes::SUCCESS
        } else {
            exit_codes::FAILURE
        }
    }

    /// Write the response as one JSON line and flush.
    pub fn write_line<W: Write>(&self, out: &mut W) -> io::Result<()> {
        serde_json::to_writer(&mut *out, self)?;
        out.write_all(b"\n")?;
        out.flush()
    }
}
