// crates/nmpolicy-cli/src/logging.rs
// ============================================================================
// Module: CLI Logging
// Description: Tracing subscriber setup for the nmpolicy binary.
// Purpose: Route engine events to stderr at the configured verbosity.
// Dependencies: nmpolicy-config, tracing, tracing-subscriber
// ============================================================================

//! ## Overview
//! Events go to stderr so stdout carries only the generated document.

use nmpolicy_config::LogLevel;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::prelude::*;

/// Maps a configured log level onto a tracing filter.
pub(crate) const fn level_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Trace => LevelFilter::TRACE,
    }
}

/// Installs the global stderr subscriber.
///
/// # Errors
///
/// Returns the subscriber error text when a global subscriber is already set.
pub(crate) fn init_tracing(level: LogLevel) -> Result<(), String> {
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_filter(level_filter(level));
    tracing_subscriber::registry().with(layer).try_init().map_err(|err| err.to_string())
}
