//! Uptime collection.
//!
//! The boot time comes from the OS (`sysctl kern.boottime` on macOS,
//! `btime` in `/proc/stat` on Linux); uptime is reported in whole days.

use chrono::{DateTime, TimeZone, Utc};

use crate::clock::Clock;
use crate::error::UptimeError;

const SECS_PER_DAY: i64 = 86_400;

/// Source of the last boot instant.
pub trait BootClock {
    fn boot_time(&self) -> Result<DateTime<Utc>, UptimeError>;
}

/// Queries the running OS.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsBootClock;

impl BootClock for OsBootClock {
    #[cfg(target_os = "macos")]
    fn boot_time(&self) -> Result<DateTime<Utc>, UptimeError> {
        let output = std::process::Command::new("/usr/sbin/sysctl")
            .args(["-n", "kern.boottime"])
            .output()
            .map_err(|e| UptimeError::Unavailable(e.to_string()))?;
        if !output.status.success() {
            return Err(UptimeError::Unavailable(format!(
                "sysctl exited with {}",
                output.status
            )));
        }
        let raw = String::from_utf8_lossy(&output.stdout);
        epoch_to_datetime(parse_sysctl_boottime(&raw)?)
    }

    #[cfg(target_os = "linux")]
    fn boot_time(&self) -> Result<DateTime<Utc>, UptimeError> {
        let raw = std::fs::read_to_string("/proc/stat")
            .map_err(|e| UptimeError::Unavailable(e.to_string()))?;
        epoch_to_datetime(parse_proc_stat_btime(&raw)?)
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux")))]
    fn boot_time(&self) -> Result<DateTime<Utc>, UptimeError> {
        Err(UptimeError::Unavailable(format!(
            "no boot time query for {}",
            std::env::consts::OS
        )))
    }
}

/// Parse `{ sec = 1700000000, usec = 0 } Tue Nov 14 ...`.
pub fn parse_sysctl_boottime(raw: &str) -> Result<i64, UptimeError> {
    let after = raw
        .split_once("sec =")
        .map(|(_, rest)| rest)
        .ok_or_else(|| UptimeError::Malformed(raw.trim().to_string()))?;
    let digits: String = after
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits
        .parse()
        .map_err(|_| UptimeError::Malformed(raw.trim().to_string()))
}

/// Find the `btime <secs>` line of `/proc/stat`.
pub fn parse_proc_stat_btime(raw: &str) -> Result<i64, UptimeError> {
    let line = raw
        .lines()
        .find_map(|l| l.strip_prefix("btime "))
        .ok_or_else(|| UptimeError::Malformed("no btime line".to_string()))?;
    line.trim()
        .parse()
        .map_err(|_| UptimeError::Malformed(line.trim().to_string()))
}

fn epoch_to_datetime(secs: i64) -> Result<DateTime<Utc>, UptimeError> {
    Utc.timestamp_opt(secs, 0)
        .single()
        .ok_or_else(|| UptimeError::Malformed(secs.to_string()))
}

/// Whole days between `boot` and `now`; a boot time in the future counts as 0.
pub fn uptime_days(boot: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    let secs = (now - boot).num_seconds().max(0);
    (secs / SECS_PER_DAY) as u64
}

/// Combines a boot clock with the wall clock.
pub struct UptimeReader<'a> {
    boot: &'a dyn BootClock,
    clock: &'a dyn Clock,
}

impl<'a> UptimeReader<'a> {
    pub fn new(boot: &'a dyn BootClock, clock: &'a dyn Clock) -> Self {
        Self { boot, clock }
    }

    /// Current uptime in whole days.
    pub fn read_days(&self) -> Result<u64, UptimeError> {
        let boot = self.boot.boot_time()?;
        let days = uptime_days(boot, self.clock.now());
        tracing::debug!(boot_time = %boot, uptime_days = days, "Read uptime");
        Ok(days)
    }
}
