//! # uptimeguard Core Library
//!
//! Keeps long-running machines from going unrestarted. When uptime exceeds a
//! threshold the user is asked to restart, may defer a limited number of
//! times, and is finally walked through a countdown that ends in a restart.
//!
//! ## Architecture
//!
//! - **Uptime**: boot-time query and whole-day arithmetic
//! - **Defer store**: tolerant, file-backed deferral counter
//! - **Notifier**: modal dialogs through an external presenter executable
//! - **Restart**: real or simulated reboot
//! - **Workflow**: the state machine tying them together
//!
//! Every collaborator sits behind a trait so the workflow can be driven by
//! fakes in tests.

pub mod clock;
pub mod config;
pub mod defer_store;
pub mod error;
pub mod events;
pub mod notifier;
pub mod preflight;
pub mod prompts;
pub mod restart;
pub mod uptime;
pub mod workflow;

pub use clock::{Clock, SystemClock};
pub use config::{Config, Environment};
pub use defer_store::{DeferStore, FileDeferStore, MemoryDeferStore};
pub use error::{
    CoreError, NotifierError, PreconditionError, RestartError, StoreError, UptimeError,
};
pub use events::Event;
pub use notifier::{Choice, Dialog, Notifier, PresenterNotifier, WindowStyle};
pub use restart::{PowerControl, RestartExecutor, RestartOutcome, SystemPower};
pub use uptime::{BootClock, OsBootClock, UptimeReader};
pub use workflow::{RestartWorkflow, WorkflowOutcome, WorkflowReport, WorkflowState};
