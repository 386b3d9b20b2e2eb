//! Logging Setup
//!
//! Console logging via tracing-subscriber with an env-filter, plus an
//! optional non-blocking daily-rolling file appender in debug mode.

use std::path::PathBuf;

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    debug_mode: bool,
    log_dir: PathBuf,
}

impl LogConfig {
    pub fn new() -> Self {
        Self {
            debug_mode: false,
            log_dir: PathBuf::from("logs"),
        }
    }

    pub fn with_debug_mode(mut self, debug: bool) -> Self {
        self.debug_mode = debug;
        self
    }

    pub fn with_log_dir(mut self, dir: PathBuf) -> Self {
        self.log_dir = dir;
        self
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Initialize the global tracing subscriber.
///
/// Returns the appender worker guard when file logging is enabled; the guard
/// must be kept alive for the duration of the process or buffered log lines
/// are lost.
pub fn init_logging(config: LogConfig) -> Result<Option<WorkerGuard>> {
    let default_directive = if config.debug_mode { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    if config.debug_mode {
        std::fs::create_dir_all(&config.log_dir)?;
        let appender = tracing_appender::rolling::daily(&config.log_dir, "pomodorino.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .with(fmt::layer().with_writer(writer).with_ansi(false))
            .try_init()?;

        tracing::debug!("File logging enabled in {}", config.log_dir.display());
        Ok(Some(guard))
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .try_init()?;
        Ok(None)
    }
}
