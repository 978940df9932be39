//! File logging
//!
//! The terminal belongs to the UI, so tracing output goes to a daily rolling
//! file under the configured log directory. `RUST_LOG` overrides the default
//! directives.

use std::fmt::Display;
use std::path::Path;

use anyhow::Context;
use tracing::Span;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

const LOG_FILE_PREFIX: &str = "bookworm-den";
const LOG_FILE_SUFFIX: &str = "log";

/// Client code at debug, the HTTP stack at info, everything else at warn.
const DEFAULT_DIRECTIVES: &str = "bookworm_den=debug,reqwest=info,warn";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Install the global subscriber writing to `log_dir`.
///
/// The returned guard flushes pending lines when dropped; keep it alive
/// until shutdown.
pub fn init_logging(log_dir: &Path) -> anyhow::Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("cannot create log directory {}", log_dir.display()))?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix(LOG_FILE_SUFFIX)
        .build(log_dir)
        .context("cannot open log file")?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    // Closed api spans carry the round-trip time
    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(file_layer)
        .try_init()?;

    tracing::info!(dir = %log_dir.display(), "Logging initialized");
    Ok(guard)
}

/// Span around one server round-trip.
pub fn api_span(operation: &'static str) -> Span {
    tracing::debug_span!("api", operation)
}

pub fn log_api_outcome<T, E: Display>(operation: &'static str, result: &Result<T, E>) {
    match result {
        Ok(_) => tracing::debug!(operation, "API request succeeded"),
        Err(e) => tracing::warn!(operation, error = %e, "API request failed"),
    }
}
