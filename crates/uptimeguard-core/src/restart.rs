//! Restart execution.
//!
//! In simulated (debug) mode the OS is never touched; the deferral counter
//! is still reset so repeated test runs behave like real restarts.

use serde::Serialize;
use std::process::Command;

use crate::defer_store::DeferStore;
use crate::error::RestartError;

const SHUTDOWN_BIN: &str = "/sbin/shutdown";

/// The privileged reboot primitive.
pub trait PowerControl {
    fn reboot(&self) -> Result<(), RestartError>;
}

/// Reboots the host with `shutdown -r now`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemPower;

impl PowerControl for SystemPower {
    fn reboot(&self) -> Result<(), RestartError> {
        let output = Command::new(SHUTDOWN_BIN)
            .args(["-r", "now"])
            .output()
            .map_err(RestartError::Spawn)?;
        if output.status.success() {
            Ok(())
        } else {
            Err(RestartError::CommandFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RestartOutcome {
    Issued,
    Simulated,
}

/// Issues (or simulates) the restart and resets the deferral counter on success.
pub struct RestartExecutor<'a> {
    power: &'a dyn PowerControl,
    /// Whether to skip the real reboot
    simulate: bool,
}

impl<'a> RestartExecutor<'a> {
    pub fn new(power: &'a dyn PowerControl) -> Self {
        Self {
            power,
            simulate: false,
        }
    }

    /// An executor that never calls `power`.
    pub fn simulated(power: &'a dyn PowerControl) -> Self {
        Self {
            power,
            simulate: true,
        }
    }

    pub fn is_simulated(&self) -> bool {
        self.simulate
    }

    /// Restart the host. On failure the counter is left untouched.
    pub fn restart(&self, store: &dyn DeferStore) -> Result<RestartOutcome, RestartError> {
        let outcome = if self.simulate {
            tracing::info!("Debug mode: simulated restart, OS not touched");
            RestartOutcome::Simulated
        } else {
            tracing::info!("Issuing system restart");
            self.power.reboot()?;
            RestartOutcome::Issued
        };

        if let Err(e) = store.reset() {
            tracing::warn!(error = %e, "Failed to reset defer counter after restart");
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defer_store::MemoryDeferStore;
    use std::cell::Cell;

    struct CountingPower {
        calls: Cell<u32>,
        fail: bool,
    }

    impl PowerControl for CountingPower {
        fn reboot(&self) -> Result<(), RestartError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                Err(RestartError::CommandFailed {
                    status: "exit status: 1".into(),
                    stderr: "must be root".into(),
                })
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn simulated_never_reboots_but_resets() {
        let power = CountingPower { calls: Cell::new(0), fail: false };
        let store = MemoryDeferStore::new(3);
        let executor = RestartExecutor::simulated(&power);

        assert_eq!(executor.restart(&store).unwrap(), RestartOutcome::Simulated);
        assert_eq!(power.calls.get(), 0);
        assert_eq!(store.get(), 0);
    }

    #[test]
    fn real_restart_resets_counter() {
        let power = CountingPower { calls: Cell::new(0), fail: false };
        let store = MemoryDeferStore::new(2);

        assert_eq!(
            RestartExecutor::new(&power).restart(&store).unwrap(),
            RestartOutcome::Issued
        );
        assert_eq!(power.calls.get(), 1);
        assert_eq!(store.get(), 0);
    }

    #[test]
    fn failed_restart_keeps_counter() {
        let power = CountingPower { calls: Cell::new(0), fail: true };
        let store = MemoryDeferStore::new(3);

        let err = RestartExecutor::new(&power).restart(&store).unwrap_err();
        assert!(matches!(err, RestartError::CommandFailed { .. }));
        assert_eq!(store.get(), 3);
    }
}
