use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer,
};

use crate::constants::{LOGS_DIR, LOG_FILE_PREFIX};

/// Logs to stdout and to a daily rolling file. Keep the guard alive until
/// exit or buffered file output is lost.
pub fn init_default_logger() -> WorkerGuard {
    let file_appender = tracing_appender::rolling::daily(LOGS_DIR, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_filter(LevelFilter::DEBUG);

    let console_layer = fmt::layer()
        .with_target(false)
        .with_filter(LevelFilter::INFO);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .init();

    guard
}
