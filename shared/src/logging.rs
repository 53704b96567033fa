//! Shared logging utilities for consistent tracing across the system

use chrono::{DateTime, Utc};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the stdout tracing subscriber
///
/// `RUST_LOG` wins when set; otherwise the generator and shared crates log
/// at `default_level` and the HTTP client stays at warn.
pub fn init_tracing(default_level: &str) {
    let fallback = format!("generator={default_level},shared={default_level},reqwest=warn");
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&fallback));

    fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

/// Get formatted timestamp for consistent logging
pub fn format_timestamp() -> String {
    let now: DateTime<Utc> = Utc::now();
    now.format("%H:%M:%S%.3f").to_string()
}

/// Contextual logging helper for startup messages
pub fn log_startup(details: &str) {
    info!(timestamp = %format_timestamp(), "🚀 Starting {}", details);
}

/// Contextual logging helper for error conditions
pub fn log_error(context: &str, error: &dyn std::fmt::Display) {
    error!(
        timestamp = %format_timestamp(),
        "❌ {} failed: {}",
        context,
        error
    );
}
