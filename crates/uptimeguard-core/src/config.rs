//! Immutable run configuration.
//!
//! Built once at startup and handed to every component by reference.
//! There is no configuration file: thresholds are constants, and paths
//! depend only on the [`Environment`].
//!
//! - **production**: well-known system paths (log under the system log
//!   directory, counter under a system state directory).
//! - **dev** (`UPTIMEGUARD_ENV=dev`): everything under
//!   `~/.config/uptimeguard-dev/`, with presenter and icon overridable from
//!   the environment.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::error::StoreError;

/// Uptime in whole days above which a restart is requested.
pub const MAX_UPTIME_DAYS: u64 = 7;
/// Number of explicit deferrals allowed before the forced countdown.
pub const DEFER_LIMIT: u32 = 3;
/// Timeout of the choice dialog and total length of the forced countdown.
pub const PROMPT_TIMEOUT_SECS: u64 = 180;
/// Redraw interval of the forced countdown dialog.
pub const COUNTDOWN_INTERVAL_SECS: u64 = 10;
/// Grace window before the restart is issued.
pub const SAVE_GRACE_SECS: u64 = 180;

const ENV_VAR: &str = "UPTIMEGUARD_ENV";
const PRESENTER_OVERRIDE_VAR: &str = "UPTIMEGUARD_PRESENTER";
const ICON_OVERRIDE_VAR: &str = "UPTIMEGUARD_ICON";

#[cfg(target_os = "macos")]
mod paths {
    pub const LOG_FILE: &str = "/Library/Logs/uptimeguard.log";
    pub const STATE_DIR: &str = "/Library/Application Support/uptimeguard";
    pub const PRESENTER: &str =
        "/Library/Application Support/JAMF/bin/jamfHelper.app/Contents/MacOS/jamfHelper";
    pub const ICON: &str = "/Library/Application Support/uptimeguard/icon.png";
    pub const FALLBACK_ICON: &str =
        "/System/Library/CoreServices/CoreTypes.bundle/Contents/Resources/AlertCautionIcon.icns";
}

#[cfg(not(target_os = "macos"))]
mod paths {
    pub const LOG_FILE: &str = "/var/log/uptimeguard.log";
    pub const STATE_DIR: &str = "/var/lib/uptimeguard";
    pub const PRESENTER: &str = "/usr/local/libexec/uptimeguard-presenter";
    pub const ICON: &str = "/usr/local/share/uptimeguard/icon.png";
    pub const FALLBACK_ICON: &str = "/usr/share/icons/hicolor/48x48/status/dialog-warning.png";
}

/// Where the tool keeps its files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Production,
    Dev,
}

impl Environment {
    /// Read `UPTIMEGUARD_ENV`; anything other than `dev` is production.
    pub fn from_env() -> Self {
        match std::env::var(ENV_VAR).as_deref() {
            Ok("dev") => Environment::Dev,
            _ => Environment::Production,
        }
    }
}

/// Returns `~/.config/uptimeguard-dev/`, creating it if needed.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StoreError> {
    let dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("uptimeguard-dev");

    std::fs::create_dir_all(&dir).map_err(|e| StoreError::StateDir(e.to_string()))?;
    Ok(dir)
}

/// Run configuration.
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    pub environment: Environment,
    pub debug: bool,
    pub max_uptime_days: u64,
    pub defer_limit: u32,
    pub prompt_timeout_secs: u64,
    pub countdown_interval_secs: u64,
    pub save_grace_secs: u64,
    pub log_path: PathBuf,
    pub counter_path: PathBuf,
    pub presenter_path: PathBuf,
    pub icon_path: PathBuf,
    pub fallback_icon_path: PathBuf,
    /// Title bar text of every dialog.
    pub title: String,
    /// Who to contact when the restart cannot be performed.
    pub support_contact: String,
}

impl Config {
    /// Build the configuration for `environment`.
    ///
    /// # Errors
    /// Returns an error if the dev data directory cannot be created.
    pub fn for_environment(environment: Environment, debug: bool) -> Result<Self, StoreError> {
        let mut cfg = Self::production(debug);
        cfg.environment = environment;

        if environment == Environment::Dev {
            let dir = data_dir()?;
            cfg.log_path = dir.join("uptimeguard.log");
            cfg.counter_path = dir.join("defer_count");
            if let Some(presenter) = std::env::var_os(PRESENTER_OVERRIDE_VAR) {
                cfg.presenter_path = PathBuf::from(presenter);
            }
            if let Some(icon) = std::env::var_os(ICON_OVERRIDE_VAR) {
                cfg.icon_path = PathBuf::from(icon);
            }
        }
        Ok(cfg)
    }

    /// Production defaults; touches nothing on disk.
    pub fn production(debug: bool) -> Self {
        Self {
            environment: Environment::Production,
            debug,
            max_uptime_days: MAX_UPTIME_DAYS,
            defer_limit: DEFER_LIMIT,
            prompt_timeout_secs: PROMPT_TIMEOUT_SECS,
            countdown_interval_secs: COUNTDOWN_INTERVAL_SECS,
            save_grace_secs: SAVE_GRACE_SECS,
            log_path: PathBuf::from(paths::LOG_FILE),
            counter_path: Path::new(paths::STATE_DIR).join("defer_count"),
            presenter_path: PathBuf::from(paths::PRESENTER),
            icon_path: PathBuf::from(paths::ICON),
            fallback_icon_path: PathBuf::from(paths::FALLBACK_ICON),
            title: "IT Maintenance".to_string(),
            support_contact: "the IT help desk".to_string(),
        }
    }

    /// Directory holding the persisted counter.
    pub fn state_dir(&self) -> &Path {
        self.counter_path.parent().unwrap_or_else(|| Path::new("."))
    }

    /// The primary icon when present on disk, otherwise the fallback.
    pub fn effective_icon(&self) -> PathBuf {
        if self.icon_path.exists() {
            self.icon_path.clone()
        } else {
            self.fallback_icon_path.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn production_defaults() {
        let cfg = Config::production(false);
        assert_eq!(cfg.max_uptime_days, 7);
        assert_eq!(cfg.defer_limit, 3);
        assert_eq!(cfg.prompt_timeout_secs, 180);
        assert_eq!(cfg.countdown_interval_secs, 10);
        assert_eq!(cfg.save_grace_secs, 180);
        assert!(!cfg.debug);
        assert_eq!(cfg.environment, Environment::Production);
    }

    #[test]
    fn state_dir_is_counter_parent() {
        let cfg = Config::production(false);
        assert_eq!(cfg.state_dir(), Path::new(paths::STATE_DIR));
    }

    #[test]
    fn effective_icon_falls_back_when_missing() {
        let mut cfg = Config::production(false);
        cfg.icon_path = PathBuf::from("/nonexistent/uptimeguard/icon.png");
        assert_eq!(cfg.effective_icon(), cfg.fallback_icon_path);
    }

    #[test]
    fn effective_icon_prefers_existing_primary() {
        let dir = tempfile::tempdir().unwrap();
        let icon = dir.path().join("icon.png");
        std::fs::write(&icon, b"png").unwrap();

        let mut cfg = Config::production(true);
        cfg.icon_path = icon.clone();
        assert_eq!(cfg.effective_icon(), icon);
    }

    #[test]
    fn serializes_environment_lowercase() {
        let json = serde_json::to_value(Config::production(false)).unwrap();
        assert_eq!(json["environment"], "production");
        assert_eq!(json["defer_limit"], 3);
    }
}
