/// Session state management.
///
/// Centralises the state machine that turns user commands into acquisition,
/// validation, persistence, model runs and exports:
///
/// ```text
/// select_root: Idle → AwaitingSelection → {Validated | Rejected} → Idle
/// run_model:   Idle → Running → {Completed | Failed} → Idle
/// ```
///
/// Work that can block (the native chooser, directory enumeration, the model
/// engine) runs on a background thread that reports one message over a
/// channel. The controller applies the result in `process_messages()` on its
/// own thread, so the `ConfigStore` only ever has a single writer. While an
/// operation is in flight, new selections and runs are refused.
use crate::notify::Notification;
use crate::runner::{ModelRunner, RunError};
use chrono::Utc;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError};
use lucis_core::acquire::{Acquisition, AcquisitionError, DirectoryAcquirer};
use lucis_core::export::{
    ExportDocument, ExportError, ExportSink, EXPORT_FILENAME, EXPORT_MIME_TYPE,
};
use lucis_core::model::{LayoutRules, PersistedConfig, ValidationResult};
use lucis_core::store::ConfigStore;
use lucis_core::validate::validate;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Generic message shown when acquisition fails unexpectedly.
pub const SELECTION_ERROR_MESSAGE: &str = "Error selecting directory. Please try again.";

/// Message shown when a run is requested before any directory was validated.
pub const NO_DIRECTORY_MESSAGE: &str = "Please select a base directory first.";

/// What the controller is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Ready for a new command.
    Idle,
    /// Waiting for the user to pick a folder (and for it to be read).
    AwaitingSelection,
    /// The model engine is running.
    Running,
}

/// How the most recent selection or run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    Validated,
    Rejected,
    Completed,
    Failed,
}

/// Result of asking the controller to start an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The operation was started in the background.
    Started,
    /// Another selection or run is in flight; nothing changed.
    Busy,
    /// The operation's precondition failed; an error notification was queued.
    Refused,
}

/// The external collaborators a session talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub acquirer: Arc<dyn DirectoryAcquirer>,
    pub runner: Arc<dyn ModelRunner>,
    pub export_sink: Arc<dyn ExportSink>,
}

/// Message sent from a background task back to the controller.
#[derive(Debug)]
enum TaskMessage {
    Acquired(Result<Acquisition, AcquisitionError>),
    RunFinished(Result<(), RunError>),
}

/// All session state.
pub struct SessionController {
    pub phase: SessionPhase,
    /// `None` until a selection or run has settled.
    pub last_outcome: Option<SessionOutcome>,
    store: ConfigStore,
    rules: LayoutRules,
    collaborators: Collaborators,
    /// Receiver for the in-flight task, if any.
    pending: Option<Receiver<TaskMessage>>,
    notifications: Vec<Notification>,
}

impl SessionController {
    /// Create a controller around an already-loaded store.
    ///
    /// Queues an informational notification when a previous selection was
    /// restored from the persistence backend.
    pub fn new(store: ConfigStore, collaborators: Collaborators, rules: LayoutRules) -> Self {
        let mut notifications = Vec::new();
        if let Some(dir) = &store.config().base_directory {
            info!("Restored base directory {dir}");
            notifications.push(Notification::info(format!(
                "Loaded saved configuration for {dir}."
            )));
        }
        Self {
            phase: SessionPhase::Idle,
            last_outcome: None,
            store,
            rules,
            collaborators,
            pending: None,
            notifications,
        }
    }

    pub fn config(&self) -> &PersistedConfig {
        self.store.config()
    }

    /// `true` while a selection or run is in flight.
    pub fn is_busy(&self) -> bool {
        self.phase != SessionPhase::Idle
    }

    /// Notifications queued since the last call, oldest first.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Start acquiring a new root folder.
    pub fn select_root(&mut self) -> Dispatch {
        if self.is_busy() {
            debug!("select_root ignored while {:?}", self.phase);
            return Dispatch::Busy;
        }

        let acquirer = self.collaborators.acquirer.clone();
        match self.spawn_task("lucis-acquire", move |tx| {
            let _ = tx.send(TaskMessage::Acquired(acquirer.acquire()));
        }) {
            Ok(()) => {
                self.phase = SessionPhase::AwaitingSelection;
                Dispatch::Started
            }
            Err(e) => {
                warn!("Could not start directory selection: {e}");
                self.last_outcome = Some(SessionOutcome::Rejected);
                self.notifications
                    .push(Notification::error(SELECTION_ERROR_MESSAGE));
                Dispatch::Refused
            }
        }
    }

    /// Start a model run over the current configuration.
    ///
    /// Refused with an error notification until a directory has been validated.
    pub fn run_model(&mut self) -> Dispatch {
        if self.is_busy() {
            debug!("run_model ignored while {:?}", self.phase);
            return Dispatch::Busy;
        }
        if !self.store.config().has_base_directory() {
            self.notifications.push(Notification::error(NO_DIRECTORY_MESSAGE));
            return Dispatch::Refused;
        }

        let runner = self.collaborators.runner.clone();
        let snapshot = self.store.config().clone();
        match self.spawn_task("lucis-model-run", move |tx| {
            let _ = tx.send(TaskMessage::RunFinished(runner.run(&snapshot)));
        }) {
            Ok(()) => {
                info!("Model run started");
                self.phase = SessionPhase::Running;
                Dispatch::Started
            }
            Err(e) => {
                self.finish_run(Err(RunError::Failed(e.to_string())));
                Dispatch::Refused
            }
        }
    }

    /// Export the current configuration through the download collaborator.
    ///
    /// Always available. Failures are reported as a notification and
    /// returned for callers that want to react to them.
    pub fn export_config(&mut self) -> Result<(), ExportError> {
        let doc = ExportDocument::new(self.store.config(), Utc::now());
        let result = doc.to_bytes().and_then(|bytes| {
            self.collaborators
                .export_sink
                .deliver(&bytes, EXPORT_FILENAME, EXPORT_MIME_TYPE)
        });
        match &result {
            Ok(()) => self
                .notifications
                .push(Notification::success("Configuration exported.")),
            Err(e) => {
                warn!("Config export failed: {e}");
                self.notifications
                    .push(Notification::error(format!("Export failed: {e}")));
            }
        }
        result
    }

    /// Apply the result of the in-flight task, if it has arrived.
    ///
    /// Non-blocking. Returns `true` if state changed.
    pub fn process_messages(&mut self) -> bool {
        let Some(rx) = &self.pending else {
            return false;
        };
        let msg = match rx.try_recv() {
            Ok(msg) => Some(msg),
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => None,
        };
        self.pending = None;
        self.apply(msg);
        true
    }

    /// Block until the in-flight task settles or `timeout` elapses.
    ///
    /// Returns `true` if the controller is idle afterwards.
    pub fn wait_until_settled(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while let Some(rx) = &self.pending {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let msg = match rx.recv_timeout(remaining) {
                Ok(msg) => Some(msg),
                Err(RecvTimeoutError::Timeout) => return false,
                Err(RecvTimeoutError::Disconnected) => None,
            };
            self.pending = None;
            self.apply(msg);
        }
        !self.is_busy()
    }

    fn spawn_task<F>(&mut self, name: &str, task: F) -> std::io::Result<()>
    where
        F: FnOnce(Sender<TaskMessage>) + Send + 'static,
    {
        let (tx, rx) = crossbeam_channel::bounded(1);
        thread::Builder::new()
            .name(name.into())
            .spawn(move || task(tx))?;
        self.pending = Some(rx);
        Ok(())
    }

    /// Route a task result; `None` means the task died without reporting.
    fn apply(&mut self, msg: Option<TaskMessage>) {
        match (self.phase, msg) {
            (_, Some(TaskMessage::Acquired(result))) => self.finish_selection(result),
            (_, Some(TaskMessage::RunFinished(result))) => self.finish_run(result),
            (SessionPhase::Running, None) => self.finish_run(Err(RunError::Interrupted)),
            (_, None) => self.finish_selection(Err(AcquisitionError::Chooser(
                "selection task ended without a result".into(),
            ))),
        }
    }

    fn finish_selection(&mut self, result: Result<Acquisition, AcquisitionError>) {
        self.phase = SessionPhase::Idle;
        let model = match result {
            Ok(Acquisition::Selected(model)) => model,
            Ok(Acquisition::Cancelled) => {
                debug!("Directory selection cancelled");
                return;
            }
            Err(e) => {
                warn!("Directory selection failed: {e}");
                self.last_outcome = Some(SessionOutcome::Rejected);
                self.notifications
                    .push(Notification::error(SELECTION_ERROR_MESSAGE));
                return;
            }
        };

        let validation = validate(&model, &self.rules);
        match &validation {
            ValidationResult::Valid { study_areas } => {
                self.store.apply_validated(&model, &validation);
                self.last_outcome = Some(SessionOutcome::Validated);
                self.notifications.push(Notification::success(format!(
                    "Directory structure validated: {} study area(s) found.",
                    study_areas.len()
                )));
            }
            ValidationResult::Invalid { reason } => {
                info!("Rejected {}: {reason}", model.root_name());
                self.last_outcome = Some(SessionOutcome::Rejected);
                self.notifications.push(Notification::error(reason.clone()));
            }
        }
    }

    fn finish_run(&mut self, result: Result<(), RunError>) {
        self.phase = SessionPhase::Idle;
        match result {
            Ok(()) => {
                self.store.record_run(Utc::now());
                self.last_outcome = Some(SessionOutcome::Completed);
                self.notifications
                    .push(Notification::success("Model run completed successfully."));
            }
            Err(e) => {
                warn!("Model run failed: {e}");
                self.last_outcome = Some(SessionOutcome::Failed);
                self.notifications
                    .push(Notification::error(format!("Error running model: {e}")));
            }
        }
    }
}
