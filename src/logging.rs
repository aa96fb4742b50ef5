use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;

/// Install the global subscriber.
///
/// Logs go to stderr so stdout stays free for the step trace or JSON lines.
/// With `dir` set, a daily-rotated `quorum.log` is written there as well; keep
/// the returned guard alive until exit or buffered lines are lost.
pub fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let (file_layer, guard) = match config.dir.as_deref().map(open_log_dir) {
        Some(Some((writer, guard))) => (
            Some(
                fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false) // No color codes in file
                    .with_target(true),
            ),
            Some(guard),
        ),
        _ => (None, None),
    };

    let json_layer = config
        .json
        .then(|| fmt::layer().json().with_writer(std::io::stderr));
    let console_layer = (!config.json).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
    });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(console_layer)
        .with(file_layer)
        .try_init();

    guard
}

/// Minimal logging for one-shot commands
pub fn init_logging_simple() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_writer(std::io::stderr)
        .try_init();
}

fn open_log_dir(dir: &str) -> Option<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    // rolling::daily panics if it cannot create the file, so check writability first
    if let Err(e) = std::fs::create_dir_all(dir) {
        eprintln!("Warning: Could not create log directory {} ({}), file logging disabled", dir, e);
        return None;
    }
    let probe = Path::new(dir).join(".quorum_write_test");
    if let Err(e) = std::fs::OpenOptions::new().create(true).append(true).open(&probe) {
        eprintln!("Warning: Could not write to log directory {} ({}), file logging disabled", dir, e);
        return None;
    }
    let _ = std::fs::remove_file(&probe);

    let appender = tracing_appender::rolling::daily(dir, "quorum.log");
    Some(tracing_appender::non_blocking(appender))
}
