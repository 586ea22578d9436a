//! Tracing subscriber setup.
//!
//! Logs go to stderr, or to a daily-rotated file when `logging.file` is set.
//! `RUST_LOG` overrides the configured level.

use crate::config::LoggingConfig;
use anyhow::Result;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Build the filter: `RUST_LOG` if set, else the configured level (or `debug`).
pub fn env_filter(config: &LoggingConfig, debug: bool) -> EnvFilter {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            let level = if debug { "debug" } else { config.level.as_str() };
            EnvFilter::new(format!("debate_coach={level},tower_http={level},warn"))
        }
    }
}

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop; hold it for the life
/// of the process.
pub fn init(config: &LoggingConfig, debug: bool) -> Result<Option<WorkerGuard>> {
    let filter = env_filter(config, debug);

    let Some(path) = config.file.as_deref() else {
        let layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
        if config.json {
            tracing_subscriber::registry()
                .with(filter)
                .with(layer.json())
                .try_init()?;
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()?;
        }
        return Ok(None);
    };

    let (dir, file_name) = split_log_path(path);
    std::fs::create_dir_all(dir)?;
    let appender = tracing_appender::rolling::daily(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false);

    if config.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.json())
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer)
            .try_init()?;
    }

    Ok(Some(guard))
}

fn split_log_path(path: &Path) -> (&Path, &std::ffi::OsStr) {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .unwrap_or_else(|| std::ffi::OsStr::new("debate-coach.log"));
    (dir, file_name)
}
