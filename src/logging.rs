//! Tracing setup for the service binary.
//!
//! Output always goes to stdout. Unless disabled, a second compact layer appends to a log file
//! through a non-blocking writer whose [`WorkerGuard`] is handed back to the caller; dropping the
//! guard flushes and stops the writer.

use std::env;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, util::TryInitError};

const DEFAULT_FILTER: &str = "info";
const DEFAULT_LOG_PATH: &str = "logs/flowkit.log";
/// Value of `FLOWKIT_LOG_FILE` that turns file logging off.
const DISABLED: &str = "off";

/// Errors raised while installing the subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The directory holding the log file could not be created.
    #[error("Failed to create log directory {path}: {source}")]
    CreateDir {
        /// Directory that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The log path does not name a file.
    #[error("Log path {0} does not name a file")]
    InvalidPath(PathBuf),
    /// A global subscriber was already installed.
    #[error("Failed to install tracing subscriber: {0}")]
    Install(#[from] TryInitError),
}

/// Filter directive and log file destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// `EnvFilter` directive such as `info` or `flowkit=debug`.
    pub filter: String,
    /// Log file; `None` logs to stdout only.
    pub file: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
            file: Some(PathBuf::from(DEFAULT_LOG_PATH)),
        }
    }
}

impl LogSettings {
    /// Read `RUST_LOG` and `FLOWKIT_LOG_FILE`. Load `.env` before calling this.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let filter = lookup("RUST_LOG")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or(defaults.filter);
        let file = match lookup("FLOWKIT_LOG_FILE").map(|value| value.trim().to_string()) {
            Some(value) if value.eq_ignore_ascii_case(DISABLED) => None,
            Some(value) if !value.is_empty() => Some(PathBuf::from(value)),
            _ => defaults.file,
        };
        Self { filter, file }
    }
}

/// Install the global subscriber described by `settings`.
///
/// Keep the returned guard alive for as long as the process should write to the log file.
/// An unparsable filter falls back to `info`.
pub fn init_tracing(settings: &LogSettings) -> Result<Option<WorkerGuard>, LoggingError> {
    let filter = EnvFilter::try_new(&settings.filter).unwrap_or_else(|err| {
        eprintln!("Ignoring invalid log filter {:?}: {err}", settings.filter);
        EnvFilter::new(DEFAULT_FILTER)
    });

    let (file_layer, guard) = match settings.file.as_deref() {
        Some(path) => {
            let (writer, guard) = file_writer(path)?;
            let layer = fmt::layer()
                .with_writer(writer)
                .with_target(true)
                .with_ansi(false)
                .compact();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .with(file_layer)
        .try_init()?;
    Ok(guard)
}

fn file_writer(path: &Path) -> Result<(NonBlocking, WorkerGuard), LoggingError> {
    let (directory, file_name) = split_log_path(path)?;
    std::fs::create_dir_all(directory).map_err(|source| LoggingError::CreateDir {
        path: directory.to_path_buf(),
        source,
    })?;
    let appender = tracing_appender::rolling::never(directory, file_name);
    Ok(tracing_appender::non_blocking(appender))
}

fn split_log_path(path: &Path) -> Result<(&Path, &Path), LoggingError> {
    let file_name = path
        .file_name()
        .map(Path::new)
        .ok_or_else(|| LoggingError::InvalidPath(path.to_path_buf()))?;
    let directory = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    Ok((directory, file_name))
}
