//! Restart workflow.
//!
//! One run of the state machine per invocation; an external scheduler
//! re-invokes the tool, so nothing loops across runs and the deferral count
//! is read fresh every time.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Evaluate -> NoActionNeeded -> Done
//!                  -> OfferChoice -> (Done | SavePrompt)
//!                  -> ForceCountdown -> SavePrompt
//! SavePrompt -> Restarting -> Done
//! ```
//!
//! Every dialog blocks until a button is pressed or its own timeout fires,
//! so each run is bounded. The restart is always the last action.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::clock::Clock;
use crate::config::Config;
use crate::defer_store::DeferStore;
use crate::events::Event;
use crate::notifier::{Choice, Dialog, Notifier};
use crate::prompts;
use crate::restart::{RestartExecutor, RestartOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    Idle,
    Evaluate,
    NoActionNeeded,
    OfferChoice,
    ForceCountdown,
    SavePrompt,
    Restarting,
    Done,
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum WorkflowOutcome {
    NoActionNeeded {
        uptime_days: u64,
    },
    /// User chose to defer; no restart this run.
    Deferred {
        defer_count: u32,
        remaining: u32,
    },
    /// Choice dialog timed out; nothing recorded.
    Dismissed,
    Restarted {
        restart: RestartOutcome,
        /// True when the countdown ran out rather than the user pressing a button.
        forced: bool,
    },
    RestartFailed {
        reason: String,
    },
}

/// Everything a run produced.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowReport {
    pub uptime_days: u64,
    pub outcome: WorkflowOutcome,
    /// States visited, in order.
    pub path: Vec<WorkflowState>,
    pub events: Vec<Event>,
}

enum Offer {
    RestartNow,
    Deferred { defer_count: u32, remaining: u32 },
    Dismissed,
}

pub struct RestartWorkflow<'a> {
    config: &'a Config,
    notifier: &'a dyn Notifier,
    store: &'a dyn DeferStore,
    executor: RestartExecutor<'a>,
    clock: &'a dyn Clock,
    icon: PathBuf,
    state: WorkflowState,
    path: Vec<WorkflowState>,
    events: Vec<Event>,
}

impl<'a> RestartWorkflow<'a> {
    pub fn new(
        config: &'a Config,
        notifier: &'a dyn Notifier,
        store: &'a dyn DeferStore,
        executor: RestartExecutor<'a>,
        clock: &'a dyn Clock,
    ) -> Self {
        Self {
            config,
            notifier,
            store,
            executor,
            clock,
            icon: config.effective_icon(),
            state: WorkflowState::Idle,
            path: vec![WorkflowState::Idle],
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    /// Drive the state machine to `Done` for a host that has been up `uptime_days`.
    pub fn run(mut self, uptime_days: u64) -> WorkflowReport {
        self.transition(WorkflowState::Evaluate);
        let at = self.clock.now();
        self.events.push(Event::UptimeEvaluated {
            uptime_days,
            max_days: self.config.max_uptime_days,
            at,
        });

        if uptime_days <= self.config.max_uptime_days {
            self.transition(WorkflowState::NoActionNeeded);
            tracing::info!(
                uptime_days,
                max_days = self.config.max_uptime_days,
                "Uptime within limit, no restart needed"
            );
            let at = self.clock.now();
            self.events.push(Event::NoActionNeeded { uptime_days, at });
            return self.finish(uptime_days, WorkflowOutcome::NoActionNeeded { uptime_days });
        }

        let defer_count = self.store.get();
        tracing::info!(
            uptime_days,
            defer_count,
            defer_limit = self.config.defer_limit,
            "Uptime over limit"
        );

        let forced = if defer_count >= self.config.defer_limit {
            self.transition(WorkflowState::ForceCountdown);
            self.force_countdown(uptime_days, defer_count)
        } else {
            self.transition(WorkflowState::OfferChoice);
            match self.offer_choice(uptime_days, defer_count) {
                Offer::RestartNow => false,
                Offer::Deferred {
                    defer_count,
                    remaining,
                } => {
                    return self.finish(
                        uptime_days,
                        WorkflowOutcome::Deferred {
                            defer_count,
                            remaining,
                        },
                    )
                }
                Offer::Dismissed => return self.finish(uptime_days, WorkflowOutcome::Dismissed),
            }
        };

        self.transition(WorkflowState::SavePrompt);
        self.save_prompt();

        self.transition(WorkflowState::Restarting);
        let outcome = self.restart(forced);
        self.finish(uptime_days, outcome)
    }

    // ── States ───────────────────────────────────────────────────────

    fn offer_choice(&mut self, uptime_days: u64, defer_count: u32) -> Offer {
        let remaining = self.config.defer_limit.saturating_sub(defer_count);
        let at = self.clock.now();
        self.events.push(Event::ChoiceOffered {
            defer_count,
            remaining,
            at,
        });

        let dialog = prompts::offer_choice(self.config, &self.icon, uptime_days, remaining);
        match self.show(&dialog) {
            Choice::Button(1) => {
                tracing::info!("User chose to restart now");
                Offer::RestartNow
            }
            Choice::Button(2) => self.defer(defer_count),
            other => {
                tracing::info!(choice = ?other, "Restart prompt dismissed without a choice");
                let at = self.clock.now();
                self.events.push(Event::ChoiceDismissed { at });
                Offer::Dismissed
            }
        }
    }

    /// The increment is committed as soon as Defer is chosen, even if the
    /// confirmation dialog later fails or times out.
    fn defer(&mut self, previous: u32) -> Offer {
        let defer_count = previous.saturating_add(1);
        let persisted = match self.store.increment() {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(error = %e, defer_count, "Failed to persist deferral, continuing");
                false
            }
        };
        let remaining = self.config.defer_limit.saturating_sub(defer_count);
        tracing::info!(defer_count, remaining, "Restart deferred");

        let at = self.clock.now();
        self.events.push(Event::Deferred {
            defer_count,
            remaining,
            persisted,
            at,
        });

        let dialog = prompts::defer_confirmation(self.config, &self.icon, remaining);
        self.show(&dialog);
        Offer::Deferred {
            defer_count,
            remaining,
        }
    }

    /// Returns true when the countdown ran out.
    fn force_countdown(&mut self, uptime_days: u64, defer_count: u32) -> bool {
        let total = self.config.prompt_timeout_secs;
        let interval = self.config.countdown_interval_secs.max(1);
        tracing::info!(defer_count, total_secs = total, "Deferrals exhausted, starting countdown");
        let at = self.clock.now();
        self.events.push(Event::CountdownStarted {
            defer_count,
            total_secs: total,
            at,
        });

        let mut elapsed = 0;
        let mut tick = 0;
        while elapsed < total {
            let remaining = total - elapsed;
            let tick_timeout = interval.min(remaining);
            let dialog =
                prompts::countdown(self.config, &self.icon, uptime_days, remaining, tick_timeout);

            let started = self.clock.now();
            let choice = self.show(&dialog);
            tick += 1;

            if let Choice::Button(_) = choice {
                tracing::info!(tick, remaining_secs = remaining, "User chose to restart now");
                let at = self.clock.now();
                self.events.push(Event::CountdownFinished { forced: false, at });
                return false;
            }

            // Keep wall-clock pace when the presenter returns early.
            let waited = (self.clock.now() - started).to_std().unwrap_or_default();
            let target = Duration::from_secs(tick_timeout);
            if waited < target {
                self.clock.sleep(target - waited);
            }

            elapsed += tick_timeout;
            tracing::debug!(tick, elapsed_secs = elapsed, remaining_secs = total - elapsed, "Countdown tick");
            let at = self.clock.now();
            self.events.push(Event::CountdownTick {
                tick,
                elapsed_secs: elapsed,
                remaining_secs: total - elapsed,
                at,
            });
        }

        tracing::info!(ticks = tick, "Countdown elapsed, forcing restart");
        let at = self.clock.now();
        self.events.push(Event::CountdownFinished { forced: true, at });
        true
    }

    /// Grace window. Ends when the user dismisses it or the full grace period
    /// has passed; a presenter that fails or returns early does neither.
    fn save_prompt(&mut self) {
        let started = self.clock.now();
        self.events.push(Event::SavePromptShown {
            grace_secs: self.config.save_grace_secs,
            at: started,
        });
        let dialog = prompts::save_prompt(self.config, &self.icon);
        let choice = self.show(&dialog);

        if !matches!(choice, Choice::Button(_)) {
            let waited = (self.clock.now() - started).to_std().unwrap_or_default();
            let grace = Duration::from_secs(self.config.save_grace_secs);
            if waited < grace {
                tracing::debug!(
                    waited_secs = waited.as_secs(),
                    "Presenter returned early, holding the grace window"
                );
                self.clock.sleep(grace - waited);
            }
        }
        tracing::info!(choice = ?choice, "Save grace window closed");
    }

    fn restart(&mut self, forced: bool) -> WorkflowOutcome {
        match self.executor.restart(self.store) {
            Ok(restart) => {
                let at = self.clock.now();
                self.events.push(match restart {
                    RestartOutcome::Simulated => Event::RestartSimulated { at },
                    RestartOutcome::Issued => Event::RestartIssued { at },
                });
                WorkflowOutcome::Restarted { restart, forced }
            }
            Err(e) => {
                tracing::error!(error = %e, "Restart failed");
                let reason = e.to_string();
                let at = self.clock.now();
                self.events.push(Event::RestartFailed {
                    reason: reason.clone(),
                    at,
                });
                let dialog = prompts::restart_failed(self.config, &self.icon);
                self.show(&dialog);
                WorkflowOutcome::RestartFailed { reason }
            }
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// A presenter failure mid-run counts as a timeout.
    fn show(&self, dialog: &Dialog) -> Choice {
        match self.notifier.show(dialog) {
            Ok(choice) => choice,
            Err(e) => {
                tracing::warn!(error = %e, heading = %dialog.heading, "Dialog failed, treating as timeout");
                Choice::TimedOut
            }
        }
    }

    fn transition(&mut self, next: WorkflowState) {
        tracing::debug!(from = ?self.state, to = ?next, "Workflow transition");
        self.state = next;
        self.path.push(next);
    }

    fn finish(mut self, uptime_days: u64, outcome: WorkflowOutcome) -> WorkflowReport {
        self.transition(WorkflowState::Done);
        WorkflowReport {
            uptime_days,
            outcome,
            path: self.path,
            events: self.events,
        }
    }
}
