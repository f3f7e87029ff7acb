use uptimeguard_core::preflight::preflight;
use uptimeguard_core::prompts;
use uptimeguard_core::{
    BootClock, Clock, Config, CoreError, DeferStore, FileDeferStore, Notifier, OsBootClock,
    PowerControl, PresenterNotifier, RestartExecutor, RestartOutcome, RestartWorkflow,
    SystemClock, SystemPower, UptimeReader, WorkflowOutcome, WorkflowReport,
};

pub fn run(config: &Config, json: bool) -> Result<(), CoreError> {
    tracing::info!(debug = config.debug, environment = ?config.environment, "uptimeguard starting");

    let store = FileDeferStore::new(&config.counter_path);
    preflight(config, &store)?;

    let notifier = PresenterNotifier::new(&config.presenter_path);
    let report = execute(config, &store, &notifier, &OsBootClock, &SystemClock, &SystemPower)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", describe(&report.outcome));
    }
    Ok(())
}

/// Uptime check and workflow, with collaborators already built.
fn execute(
    config: &Config,
    store: &dyn DeferStore,
    notifier: &dyn Notifier,
    boot: &dyn BootClock,
    clock: &dyn Clock,
    power: &dyn PowerControl,
) -> Result<WorkflowReport, CoreError> {
    let uptime_days = match UptimeReader::new(boot, clock).read_days() {
        Ok(days) => days,
        Err(e) => {
            tracing::error!(error = %e, "Could not determine uptime");
            let dialog = prompts::uptime_unavailable(config, &config.effective_icon());
            if let Err(show_err) = notifier.show(&dialog) {
                tracing::warn!(error = %show_err, "Could not show uptime error dialog");
            }
            return Err(e.into());
        }
    };

    let executor = if config.debug {
        RestartExecutor::simulated(power)
    } else {
        RestartExecutor::new(power)
    };

    let report = RestartWorkflow::new(config, notifier, store, executor, clock).run(uptime_days);
    tracing::info!(outcome = ?report.outcome, "Workflow finished");
    Ok(report)
}

fn describe(outcome: &WorkflowOutcome) -> String {
    match outcome {
        WorkflowOutcome::NoActionNeeded { uptime_days } => {
            format!("uptime {uptime_days} days, no restart needed")
        }
        WorkflowOutcome::Deferred {
            defer_count,
            remaining,
        } => format!("restart deferred ({defer_count} used, {remaining} remaining)"),
        WorkflowOutcome::Dismissed => "restart prompt dismissed".to_string(),
        WorkflowOutcome::Restarted { restart, forced } => {
            let how = if *forced { "countdown elapsed" } else { "user confirmed" };
            match restart {
                RestartOutcome::Issued => format!("restart issued ({how})"),
                RestartOutcome::Simulated => format!("restart simulated ({how})"),
            }
        }
        WorkflowOutcome::RestartFailed { reason } => format!("restart failed: {reason}"),
    }
}
