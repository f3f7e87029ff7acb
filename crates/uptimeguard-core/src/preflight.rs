//! Startup precondition checks.
//!
//! Run once, before the uptime query and before any dialog. Any failure here
//! aborts the run with a non-zero exit.

use std::path::Path;

use crate::config::Config;
use crate::defer_store::FileDeferStore;
use crate::error::PreconditionError;

pub const SUPPORTED_PLATFORMS: [&str; 2] = ["macos", "linux"];

pub fn check_platform(os: &str) -> Result<(), PreconditionError> {
    if SUPPORTED_PLATFORMS.contains(&os) {
        Ok(())
    } else {
        Err(PreconditionError::UnsupportedPlatform(os.to_string()))
    }
}

/// The presenter must exist and be executable.
pub fn check_presenter(path: &Path) -> Result<(), PreconditionError> {
    let meta = std::fs::metadata(path)
        .map_err(|_| PreconditionError::PresenterMissing(path.to_path_buf()))?;
    if !meta.is_file() || !is_executable(&meta) {
        return Err(PreconditionError::PresenterNotExecutable(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(unix)]
fn is_executable(meta: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_meta: &std::fs::Metadata) -> bool {
    true
}

pub fn check_state_dir(store: &FileDeferStore) -> Result<(), PreconditionError> {
    store
        .ensure_writable()
        .map_err(|e| PreconditionError::StateDirUnwritable {
            path: store
                .path()
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .to_path_buf(),
            message: e.to_string(),
        })
}

/// Platform, then presenter, then state directory.
pub fn preflight(config: &Config, store: &FileDeferStore) -> Result<(), PreconditionError> {
    check_platform(std::env::consts::OS)?;
    check_presenter(&config.presenter_path)?;
    check_state_dir(store)?;
    tracing::debug!(
        presenter = %config.presenter_path.display(),
        counter = %store.path().display(),
        "Preflight passed"
    );
    Ok(())
}
