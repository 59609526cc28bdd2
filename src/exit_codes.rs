//! Exit code constants for the pdl-bridge CLI.
//!
//! The caller only distinguishes success from failure; the failure detail
//! travels in the JSON response on stdout.
//! - 0: Success
//! - 1: Any reported failure (the response carries `error_type`)
//!
//! Usage errors detected by clap keep clap's own exit code (2).

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// Any failure: bad request, missing file, invalid YAML, engine error.
pub const FAILURE: i32 = 1;
