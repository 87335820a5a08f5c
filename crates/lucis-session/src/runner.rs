/// Model-execution seam.
///
/// The real engine is an external collaborator invoked with the persisted
/// config; this module only defines its interface and a fixed-delay stand-in.
use lucis_core::model::PersistedConfig;
use std::thread;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// Delay used by [`SimulatedModelRunner::default`].
pub const DEFAULT_SIMULATED_RUN: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RunError {
    #[error("model run failed: {0}")]
    Failed(String),

    /// The run thread ended without reporting a result (e.g. it panicked).
    #[error("model run ended without a result")]
    Interrupted,
}

/// The external model-execution engine.
///
/// `run` blocks until the engine finishes; the controller calls it from a
/// background thread. No timeout is applied.
pub trait ModelRunner: Send + Sync {
    fn run(&self, config: &PersistedConfig) -> Result<(), RunError>;
}

/// Stand-in engine that waits a fixed delay and then succeeds.
pub struct SimulatedModelRunner {
    delay: Duration,
}

impl SimulatedModelRunner {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SimulatedModelRunner {
    fn default() -> Self {
        Self::new(DEFAULT_SIMULATED_RUN)
    }
}

impl ModelRunner for SimulatedModelRunner {
    fn run(&self, config: &PersistedConfig) -> Result<(), RunError> {
        info!(
            "Simulating model run over {} study area(s) in {}",
            config.study_areas.len(),
            config.base_directory.as_deref().unwrap_or("<none>")
        );
        thread::sleep(self.delay);
        Ok(())
    }
}
