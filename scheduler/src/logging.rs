//! Tracing subscriber setup.
//!
//! Environment variables:
//! - `RUST_LOG`: filter directives (default: `warn`)
//! - `TICK_SCHEDULER_LOG_JSON`: `1` or `true` for JSON lines

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const JSON_ENV: &str = "TICK_SCHEDULER_LOG_JSON";

/// Installs the global subscriber. Output goes to stderr so it never mixes
/// with the console view on stdout.
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let use_json = std::env::var(JSON_ENV)
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    // A second init (tests, embedding) keeps the first subscriber.
    let result = if use_json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_current_span(true),
            )
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .compact(),
            )
            .try_init()
    };

    if result.is_ok() {
        tracing::debug!(json = use_json, "tracing initialized");
    }
}
