//! Subscriber setup shared by the binaries.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn filter_or(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Human-readable logs on stderr, leaving stdout for program output.
pub fn init_cli(default_level: &str) {
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter_or(default_level))
        .init();
}

/// One JSON object per line; the Lambda log stream adds its own timestamps.
pub fn init_lambda(default_level: &str) {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter_or(default_level))
        .with_target(false)
        .with_current_span(false)
        .without_time()
        .init();
}
