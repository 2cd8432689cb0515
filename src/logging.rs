// SPDX-License-Identifier: MPL-2.0
//! Tracing subscriber setup for the binary.
//!
//! Logs go to stderr so that command output on stdout stays parseable.

use crate::error::{Error, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Filter used when neither `--log-level` nor `RUST_LOG` is given.
pub const DEFAULT_FILTER: &str = "warn";

/// Builds the filter: `level` if given, else `RUST_LOG`, else [`DEFAULT_FILTER`].
///
/// # Errors
///
/// Returns [`Error::Usage`] if `level` is not a valid filter directive.
pub fn build_filter(level: Option<&str>) -> Result<EnvFilter> {
    match level {
        Some(level) => EnvFilter::try_new(level)
            .map_err(|e| Error::Usage(format!("invalid log level '{level}': {e}"))),
        None => Ok(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))),
    }
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Returns an error for an invalid `level` or if a subscriber is already set.
pub fn init(level: Option<&str>) -> Result<()> {
    let filter = build_filter(level)?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .try_init()
        .map_err(|e| Error::Config(format!("failed to initialize logger: {e}")))
}
