//! Core error types for uptimeguard-core.
//!
//! Each component owns an error enum; `CoreError` gathers them for callers
//! that only need to report and exit.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for uptimeguard-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Startup preconditions not met
    #[error("Precondition failed: {0}")]
    Precondition(#[from] PreconditionError),

    /// Boot time could not be determined
    #[error("Uptime unavailable: {0}")]
    Uptime(#[from] UptimeError),

    /// Deferral counter could not be persisted
    #[error("Defer store error: {0}")]
    Store(#[from] StoreError),

    /// Presenter invocation failed
    #[error("Notifier error: {0}")]
    Notifier(#[from] NotifierError),

    /// Restart command failed
    #[error("Restart failed: {0}")]
    Restart(#[from] RestartError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Conditions checked once before any user-facing action.
#[derive(Error, Debug)]
pub enum PreconditionError {
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("Presenter not found at {0}")]
    PresenterMissing(PathBuf),

    #[error("Presenter at {0} is not executable")]
    PresenterNotExecutable(PathBuf),

    #[error("State directory {path} is not writable: {message}")]
    StateDirUnwritable { path: PathBuf, message: String },
}

/// Boot-time query errors.
#[derive(Error, Debug)]
pub enum UptimeError {
    /// The OS query itself could not be run
    #[error("Boot time query failed: {0}")]
    Unavailable(String),

    /// The query ran but did not yield a numeric boot time
    #[error("Boot time value is missing or non-numeric: {0:?}")]
    Malformed(String),
}

/// Deferral counter persistence errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read/write defer counter at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to access data directory: {0}")]
    StateDir(String),
}

/// Presenter invocation errors.
#[derive(Error, Debug)]
pub enum NotifierError {
    #[error("Failed to launch presenter {path}: {source}")]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed waiting for presenter: {0}")]
    Wait(#[source] std::io::Error),
}

/// OS restart errors.
#[derive(Error, Debug)]
pub enum RestartError {
    #[error("Failed to launch restart command: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("Restart command exited with {status}: {stderr}")]
    CommandFailed { status: String, stderr: String },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
