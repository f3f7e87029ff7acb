//! Integration tests for uptime reading.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use uptimeguard_core::uptime::uptime_days;
use uptimeguard_core::{BootClock, Clock, UptimeError, UptimeReader};

struct FixedBoot(Result<i64, &'static str>);

impl BootClock for FixedBoot {
    fn boot_time(&self) -> Result<DateTime<Utc>, UptimeError> {
        match self.0 {
            Ok(secs) => Ok(Utc.timestamp_opt(secs, 0).unwrap()),
            Err(raw) => Err(UptimeError::Malformed(raw.to_string())),
        }
    }
}

struct FixedNow(DateTime<Utc>);

impl Clock for FixedNow {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }

    fn sleep(&self, _duration: std::time::Duration) {}
}

#[test]
fn reader_combines_boot_and_now() {
    let boot = 1_700_000_000;
    let now = FixedNow(Utc.timestamp_opt(boot, 0).unwrap() + Duration::days(10) + Duration::hours(5));
    let boot_clock = FixedBoot(Ok(boot));
    let reader = UptimeReader::new(&boot_clock, &now);
    assert_eq!(reader.read_days().unwrap(), 10);
}

#[test]
fn reader_propagates_malformed_boot_time() {
    let now = FixedNow(Utc::now());
    let boot_clock = FixedBoot(Err("sec = ?"));
    let reader = UptimeReader::new(&boot_clock, &now);
    assert!(matches!(reader.read_days(), Err(UptimeError::Malformed(_))));
}

proptest! {
    #[test]
    fn uptime_days_is_floor_of_elapsed(boot in 0i64..2_000_000_000, elapsed in 0i64..100_000_000) {
        let boot_at = Utc.timestamp_opt(boot, 0).unwrap();
        let now = boot_at + Duration::seconds(elapsed);
        prop_assert_eq!(uptime_days(boot_at, now), (elapsed / 86_400) as u64);
    }
}
