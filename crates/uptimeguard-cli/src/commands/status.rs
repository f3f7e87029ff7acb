use serde::Serialize;
use uptimeguard_core::{
    Config, CoreError, DeferStore, Environment, FileDeferStore, OsBootClock, SystemClock,
    UptimeReader,
};

#[derive(Debug, Serialize)]
struct Status {
    environment: Environment,
    debug: bool,
    uptime_days: u64,
    max_uptime_days: u64,
    defer_count: u32,
    defer_limit: u32,
    deferrals_remaining: u32,
    /// What a run would do right now.
    next_action: &'static str,
}

pub fn run(config: &Config, json: bool) -> Result<(), CoreError> {
    let uptime_days = UptimeReader::new(&OsBootClock, &SystemClock).read_days()?;
    let defer_count = FileDeferStore::new(&config.counter_path).get();

    let next_action = if uptime_days <= config.max_uptime_days {
        "none"
    } else if defer_count >= config.defer_limit {
        "force_countdown"
    } else {
        "offer_choice"
    };

    let status = Status {
        environment: config.environment,
        debug: config.debug,
        uptime_days,
        max_uptime_days: config.max_uptime_days,
        defer_count,
        defer_limit: config.defer_limit,
        deferrals_remaining: config.defer_limit.saturating_sub(defer_count),
        next_action,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("uptime:     {} days (limit {})", status.uptime_days, status.max_uptime_days);
        println!("deferrals:  {}/{}", status.defer_count, status.defer_limit);
        println!("next run:   {}", status.next_action);
    }
    Ok(())
}
