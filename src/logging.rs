//! Logging backend with console output and a size-rotated intrusion log.
//!
//! Domain code logs through the `log` facade; `tracing-subscriber`'s
//! `init()` installs the `log` bridge, so those records reach both layers.
//! Set `SENTRY_DEBUG=1` to enable debug output for this crate.

use std::path::Path;

use rolling_file::{BasicRollingFileAppender, RollingConditionBasic};
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Default log file, relative to the working directory.
pub const DEFAULT_LOG_FILE: &str = "intrusion_log.log";
/// Rotate once the file reaches this size.
pub const MAX_LOG_BYTES: u64 = 1024 * 1024;
/// Rotated files kept alongside the live one.
pub const LOG_BACKUPS: usize = 5;

const DEBUG_ENV: &str = "SENTRY_DEBUG";

fn filter(debug_logging: bool) -> EnvFilter {
    if debug_logging {
        EnvFilter::new("info,sentry=debug")
    } else {
        EnvFilter::new("info")
    }
}

/// Initialize dual-output logging.
///
/// Returns a `WorkerGuard` that must be held until exit so buffered file
/// lines are flushed.  If the log file cannot be opened, falls back to
/// stdout only and returns `None`.
pub fn init(log_path: &Path) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let debug_logging = std::env::var(DEBUG_ENV).is_ok_and(|v| v == "1");

    let file_appender = match BasicRollingFileAppender::new(
        log_path,
        RollingConditionBasic::new().max_size(MAX_LOG_BYTES),
        LOG_BACKUPS,
    ) {
        Ok(appender) => appender,
        Err(e) => {
            eprintln!("Failed to open log file {}: {e}", log_path.display());
            init_stdout_only(debug_logging);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(false)
        .with_span_events(FmtSpan::NONE);

    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(false)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stdout_layer)
        .with(filter(debug_logging))
        .init();

    tracing::info!(log_file = %log_path.display(), debug_logging, "logging initialized");
    Some(guard)
}

fn init_stdout_only(debug_logging: bool) {
    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(false)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(filter(debug_logging))
        .init();

    tracing::info!(debug_logging, "logging initialized (stdout only)");
}
