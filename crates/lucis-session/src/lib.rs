/// LUCIS Session: the controller that drives selection, runs and export.
///
/// This crate holds the session state machine only; rendering belongs to
/// whichever frontend embeds it. Business logic lives in `lucis-core`.
pub mod notify;
pub mod runner;
pub mod state;

pub use notify::{Notification, Severity};
pub use runner::{ModelRunner, RunError, SimulatedModelRunner};
pub use state::{Collaborators, Dispatch, SessionController, SessionOutcome, SessionPhase};
