//! `render`: one request per process.

use super::{emit, load_bridge};
use crate::cli::GlobalOptions;
use crate::error::{BridgeError, Result};
use crate::protocol::BridgeResponse;
use std::io::{Read, Write};

/// Read one request to EOF, write one response, return the exit code.
pub fn cmd_render<R: Read, W: Write>(
    options: &GlobalOptions,
    mut input: R,
    mut out: W,
) -> Result<i32> {
    let response = match load_bridge(options) {
        Ok(bridge) => {
            let mut request = String::new();
            match input.read_to_string(&mut request) {
                Ok(_) => bridge.handle(&request),
                Err(e) => BridgeResponse::failure(&BridgeError::InvalidRequest(format!(
                    "failed to read request from stdin: {}",
                    e
                ))),
            }
        }
        Err(err) => BridgeResponse::failure(&err),
    };

    emit(&mut out, &response)?;
    Ok(response.exit_code())
}
