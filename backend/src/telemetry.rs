//! Telemetry initialization: stdout tracing subscriber filtered by RUST_LOG.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise the crate and tower-http log at
/// `log_level`.
pub fn init_tracing(log_level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directives(log_level).into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn default_directives(log_level: &str) -> String {
    format!(
        "zaitun_backend={level},tower_http={level},sqlx::query=warn",
        level = log_level
    )
}
