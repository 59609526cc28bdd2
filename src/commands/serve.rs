//! `serve`: newline-delimited requests over one long-lived process.
//!
//! Each line of stdin is one request; each produces one line on stdout, in
//! order. Requests share nothing but the loaded configuration.

use super::{emit, load_bridge};
use crate::cli::GlobalOptions;
use crate::error::{BridgeError, Result};
use crate::exit_codes;
use crate::protocol::BridgeResponse;
use std::io::{BufRead, Write};
use tracing::info;

pub fn cmd_serve<R: BufRead, W: Write>(
    options: &GlobalOptions,
    mut input: R,
    mut out: W,
) -> Result<i32> {
    let bridge = match load_bridge(options) {
        Ok(bridge) => bridge,
        Err(err) => {
            let response = BridgeResponse::failure(&err);
            emit(&mut out, &response)?;
            return Ok(response.exit_code());
        }
    };

    info!(project_root = %bridge.project_root().display(), "serving requests from stdin");

    let mut handled = 0usize;
    let mut line = Vec::new();
    loop {
        line.clear();
        let read = input.read_until(b'\n', &mut line).map_err(|e| {
            BridgeError::Internal(format!("failed to read request from stdin: {}", e))
        })?;
        if read == 0 {
            break;
        }

        let response = match std::str::from_utf8(&line) {
            Ok(text) if text.trim().is_empty() => continue,
            Ok(text) => bridge.handle(text),
            Err(e) => BridgeResponse::failure(&BridgeError::InvalidRequest(format!(
                "request is not valid UTF-8: {}",
                e
            ))),
        };

        emit(&mut out, &response)?;
        handled += 1;
    }

    info!(handled, "stdin closed, stopping");
    Ok(exit_codes::SUCCESS)
}
