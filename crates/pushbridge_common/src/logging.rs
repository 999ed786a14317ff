//! Logging utilities for the Pushbridge SDK.
//!
//! The SDK never installs a global subscriber on behalf of the host
//! application; these helpers exist for tests, demos, and hosts that have no
//! tracing setup of their own.

use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber with the default log level (INFO).
pub fn init() {
    init_with_level(Level::INFO);
}

/// Initialize the tracing subscriber with a specific log level.
///
/// Respects `RUST_LOG` style directives from the environment on top of the
/// `pushbridge` default. Safe to call more than once; later calls are no-ops
/// when a global subscriber is already installed.
pub fn init_with_level(level: Level) {
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("pushbridge={}", level).parse().expect("static directive parses"));

    let result = tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {}", level);
    }
}
