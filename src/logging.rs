//! Diagnostic logging.
//!
//! stdout belongs to the response protocol, so all logs go to stderr.
//! `RUST_LOG` controls the filter; `--verbose` forces debug output for
//! this crate.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "warn";
const VERBOSE_FILTER: &str = "pdl_bridge=debug,warn";

/// Install the global subscriber. Safe to call more than once.
pub fn init(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
