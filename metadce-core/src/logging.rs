//! Structured logging using **tracing**.
//!
//! Pipeline stages log at `debug`, run summaries at `info`, and lenient-mode
//! anomalies (duplicate names, doubly-claimed symbols) at `warn`. Output goes
//! to stderr so stdout stays free for the report.

use tracing_subscriber::EnvFilter;

/// Initializes the global tracing subscriber with JSON output on stderr.
///
/// Call once at startup. `RUST_LOG` takes precedence; otherwise
/// `default_level` is used (e.g. `"info"`, `"debug"`).
pub fn init_structured_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // A second init (e.g. from tests) is harmless, so the error is dropped.
    let _ = tracing_subscriber::fmt()
        .json()
        .with_ansi(false)
        .with_level(true)
        .with_target(true)
        .with_current_span(true)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
