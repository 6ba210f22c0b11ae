//! Diagnostic logging setup
//!
//! Failures in the relay never reach the player; they end up here.

use crate::error::{Error, Result};
use std::env;

/// Environment variable that turns on debug output
pub const DEBUG_ENV_VAR: &str = "SAGE_RELAY_DEBUG";

/// Install the global `tracing` subscriber
///
/// `RUST_LOG` wins when set; otherwise the level is `debug` when `debug`
/// is true or `SAGE_RELAY_DEBUG` is `1`/`true`, and `info` otherwise.
///
/// # Errors
/// Returns an error if a global subscriber is already installed.
pub fn init_logging(debug: bool) -> Result<()> {
    let debug = debug
        || env::var(DEBUG_ENV_VAR).is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"));
    let level = if debug { "debug" } else { "info" };

    let env_filter = env::var("RUST_LOG").unwrap_or_else(|_| level.to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(env_filter))
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .try_init()
        .map_err(|e| Error::Other(format!("Failed to install logger: {}", e)))
}
