//! Tracing subscriber configuration.

use tracing_subscriber::EnvFilter;

/// Install the process-wide subscriber: JSON lines to stdout, level
/// controlled via `RUST_LOG` (default `info`).
///
/// Repeated calls are no-ops, so tests and embedding binaries can call
/// this without coordinating.
pub fn init() {
    init_with_default("info");
}

/// Like [`init`], with an explicit fallback filter for when `RUST_LOG`
/// is unset.
pub fn init_with_default(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}
