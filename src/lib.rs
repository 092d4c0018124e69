pub mod api_key;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod graph;
pub mod logging;
pub mod output;
pub mod plugin;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing/logging
///
/// Logs go to stderr; stdout carries the agent protocol. The level comes
/// from `RUST_LOG` and defaults to `warn`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}
