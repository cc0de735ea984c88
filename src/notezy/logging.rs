//! File logging for the binary.
//!
//! Output goes to `<home>/logs/notezy.log.<date>` as JSON lines, never to the
//! terminal. `NOTEZY_LOG` takes an `EnvFilter` directive and overrides the
//! configured `log-level`.

use crate::error::{NotezyError, Result};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "NOTEZY_LOG";
const LOG_FILE_PREFIX: &str = "notezy.log";

static LOG_GUARD: OnceCell<WorkerGuard> = OnceCell::new();

pub fn log_dir(home: &Path) -> PathBuf {
    home.join("logs")
}

/// Build the filter from `NOTEZY_LOG`, falling back to `default_directive`.
pub fn env_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(default_directive))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. Only the first call in a process has an
/// effect; later calls report an error the caller may ignore.
pub fn init_tracing(home: &Path, default_directive: &str) -> Result<()> {
    let dir = log_dir(home);
    std::fs::create_dir_all(&dir)?;
    let file_appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let _ = LOG_GUARD.set(guard);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_directive))
        .json()
        .with_writer(non_blocking)
        .try_init()
        .map_err(|e| NotezyError::Config(format!("Failed to initialize logging: {}", e)))
}
