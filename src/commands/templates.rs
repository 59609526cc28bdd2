//! `templates`: list the names defined in a document.

use super::{emit, load_bridge};
use crate::cli::{GlobalOptions, TemplatesArgs};
use crate::error::Result;
use crate::protocol::BridgeResponse;
use std::io::Write;

pub fn cmd_templates<W: Write>(
    options: &GlobalOptions,
    args: &TemplatesArgs,
    mut out: W,
) -> Result<i32> {
    let response = load_bridge(options)
        .and_then(|bridge| bridge.list_templates(args.pdl_file.as_deref()))
        .unwrap_or_else(|err| BridgeResponse::failure(&err));

    emit(&mut out, &response)?;
    Ok(response.exit_code())
}
