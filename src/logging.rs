//! Logging setup for the chordtab binary.
//!
//! Diagnostics go to stderr so that rendered output on stdout stays clean.
//!
//! ## Environment Variables
//!
//! 1. **`CHORDTAB_LOG`** (highest priority) - a bare level such as `debug`
//!    applies to chordtab only; anything with `=` or `,` is used as a full
//!    filter
//! 2. **`RUST_LOG`** - standard tracing filter
//! 3. **Default** - `warn` globally, `info` for chordtab

use std::env;

use tracing_subscriber::{fmt, EnvFilter};

pub const LOG_ENV: &str = "CHORDTAB_LOG";

/// Install the stderr subscriber. A `verbose` flag raises the default level
/// to `debug` when no environment variable is set.
pub fn init(verbose: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = create_filter(verbose)?;
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
}

/// Initialize logging for tests. Safe to call more than once.
pub fn test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("chordtab=trace"))
        .with_test_writer()
        .try_init();
}

fn create_filter(verbose: bool) -> Result<EnvFilter, Box<dyn std::error::Error + Send + Sync>> {
    if let Ok(level) = env::var(LOG_ENV) {
        return Ok(EnvFilter::try_new(expand_level(&level))?);
    }
    if let Ok(rust_log) = env::var("RUST_LOG") {
        return Ok(EnvFilter::try_new(rust_log)?);
    }
    let level = if verbose { "debug" } else { "info" };
    Ok(EnvFilter::new(format!("warn,chordtab={}", level)))
}

/// `debug` becomes `warn,chordtab=debug`; full filter strings pass through.
fn expand_level(value: &str) -> String {
    if value.contains('=') || value.contains(',') {
        return value.to_string();
    }
    format!("warn,chordtab={}", value)
}
