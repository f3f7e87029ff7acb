//! Timestamped record of a workflow run.
//!
//! Events are serialized with a `type` tag and collected into
//! [`WorkflowReport`](crate::workflow::WorkflowReport).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every workflow transition produces an Event.
/// The CLI prints them with `--json`; tests assert on them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    UptimeEvaluated {
        uptime_days: u64,
        max_days: u64,
        at: DateTime<Utc>,
    },
    NoActionNeeded {
        uptime_days: u64,
        at: DateTime<Utc>,
    },
    /// Two-button dialog shown.
    ChoiceOffered {
        defer_count: u32,
        remaining: u32,
        at: DateTime<Utc>,
    },
    Deferred {
        defer_count: u32,
        remaining: u32,
        /// False when the new count could not be written.
        persisted: bool,
        at: DateTime<Utc>,
    },
    /// Choice dialog timed out or was cancelled.
    ChoiceDismissed {
        at: DateTime<Utc>,
    },
    CountdownStarted {
        defer_count: u32,
        total_secs: u64,
        at: DateTime<Utc>,
    },
    /// One countdown dialog closed; `remaining_secs` is what is left after it.
    CountdownTick {
        tick: u32,
        elapsed_secs: u64,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// `forced` is true when the countdown ran out without a button press.
    CountdownFinished {
        forced: bool,
        at: DateTime<Utc>,
    },
    SavePromptShown {
        grace_secs: u64,
        at: DateTime<Utc>,
    },
    RestartSimulated {
        at: DateTime<Utc>,
    },
    RestartIssued {
        at: DateTime<Utc>,
    },
    RestartFailed {
        reason: String,
        at: DateTime<Utc>,
    },
}
