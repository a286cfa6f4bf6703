//! Tracing setup: console output always, a daily-rolling file
//! appender when a log directory is given.

use std::path::Path;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Keeps the file writer flushing until the process exits.
#[allow(dead_code)]
pub struct LoggerGuard(Option<WorkerGuard>);

pub fn init_logging(level: &str, log_dir: Option<&Path>) -> LoggerGuard {
    let level = match level {
        "trace" | "debug" | "info" | "warn" | "error" => level,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to 'info'", level);
            "info"
        }
    };

    let builder = EnvFilter::builder().with_default_directive(level.parse().expect("valid level"));
    let env = std::env::var("RUST_LOG").unwrap_or_default();
    let console_filter = builder.clone().parse_lossy(&env);

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_filter(console_filter);

    // An optional layer keeps one subscriber stack whether or not a
    // log directory was given.
    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("doxaudit")
                .filename_suffix("log")
                .build(dir)
                .expect("Failed to create file appender");
            let (non_blocking, guard) = NonBlocking::new(file_appender);

            let file_filter = builder.parse_lossy(&env);
            let file_layer = fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(file_filter);
            (Some(file_layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .init();
    LoggerGuard(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_with_file_layer() {
        let dir = std::env::temp_dir().join(format!("doxaudit-log-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let _guard = init_logging("debug", Some(dir.as_path()));
        tracing::info!("file and console layers composed");
        let logged = std::fs::read_dir(&dir).unwrap().next().is_some();
        assert!(logged, "expected a rolling log file in {}", dir.display());
        std::fs::remove_dir_all(&dir).ok();
    }
}
