/// Config store: owns the session's [`PersistedConfig`].
///
/// The in-memory config is authoritative for the session. The key-value
/// backend is a best-effort mirror: read and write failures are logged and
/// never reach the caller.
///
/// # Load semantics
///
/// The stored record is shallow-merged over the defaults field by field.
/// Fields with the wrong type are skipped, unknown fields are ignored, and a
/// record that is not a JSON object falls back to the defaults entirely.
/// Study areas stored without a base directory are dropped.
pub mod backend;

pub use backend::{FileBackend, KeyValueBackend, MemoryBackend, PersistenceError};

use crate::model::{PersistedConfig, StructuralModel, ValidationResult};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Backend key the config is stored under.
pub const CONFIG_STORAGE_KEY: &str = "lucis-config";

/// Exclusive owner of the session's persisted configuration.
///
/// Assumes a single writer; the session controller is the only mutator.
pub struct ConfigStore {
    backend: Arc<dyn KeyValueBackend>,
    config: PersistedConfig,
}

impl ConfigStore {
    /// Create a store holding the default config, without reading the backend.
    pub fn new(backend: Arc<dyn KeyValueBackend>) -> Self {
        Self {
            backend,
            config: PersistedConfig::default(),
        }
    }

    /// Create a store and immediately [`load`](Self::load) it.
    pub fn open(backend: Arc<dyn KeyValueBackend>) -> Self {
        let mut store = Self::new(backend);
        store.load();
        store
    }

    /// The current in-memory config.
    pub fn config(&self) -> &PersistedConfig {
        &self.config
    }

    /// Reload from the backend, merging stored fields over the defaults.
    ///
    /// Never fails: a missing or unreadable record yields the defaults.
    pub fn load(&mut self) -> &PersistedConfig {
        self.config = match self.backend.get(CONFIG_STORAGE_KEY) {
            Ok(Some(text)) => merge_stored(&text),
            Ok(None) => {
                debug!("No stored config under {CONFIG_STORAGE_KEY:?} -- using defaults");
                PersistedConfig::default()
            }
            Err(e) => {
                warn!("Could not read stored config: {e} -- using defaults");
                PersistedConfig::default()
            }
        };
        &self.config
    }

    /// Write the current config to the backend, reporting failure.
    pub fn try_save(&self) -> Result<(), PersistenceError> {
        let text = serde_json::to_string(&self.config)?;
        self.backend.set(CONFIG_STORAGE_KEY, &text)
    }

    /// Write the current config to the backend; failures are logged only.
    pub fn save(&self) {
        if let Err(e) = self.try_save() {
            warn!("Could not persist config: {e} -- keeping in-memory state");
        }
    }

    /// Apply a successful validation: set the base directory and study areas.
    ///
    /// `last_run` is left untouched. An invalid result changes nothing.
    pub fn apply_validated(
        &mut self,
        model: &StructuralModel,
        result: &ValidationResult,
    ) -> &PersistedConfig {
        let ValidationResult::Valid { study_areas } = result else {
            debug!("Ignoring invalid validation result for {}", model.root_name());
            return &self.config;
        };
        self.config.base_directory = Some(model.root_name().to_string());
        self.config.study_areas = study_areas.clone();
        info!(
            "Base directory set to {} with {} study area(s)",
            model.root_name(),
            study_areas.len()
        );
        self.save();
        &self.config
    }

    /// Record a completed model run.
    pub fn record_run(&mut self, timestamp: DateTime<Utc>) {
        self.config.last_run = Some(timestamp);
        info!("Recorded model run at {}", timestamp.to_rfc3339());
        self.save();
    }
}

/// Shallow-merge a stored JSON record over the default config.
fn merge_stored(text: &str) -> PersistedConfig {
    let mut config = PersistedConfig::default();

    let object = match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            warn!("Stored config is not a JSON object -- using defaults");
            return config;
        }
        Err(e) => {
            warn!("Stored config is not valid JSON: {e} -- using defaults");
            return config;
        }
    };

    match object.get("baseDirectory") {
        Some(Value::String(dir)) => config.base_directory = Some(dir.clone()),
        Some(Value::Null) | None => {}
        Some(other) => warn!("Ignoring stored baseDirectory of unexpected type: {other}"),
    }

    match object.get("studyAreas") {
        Some(Value::Array(items)) => {
            config.study_areas = items
                .iter()
                .filter_map(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
        Some(Value::Null) | None => {}
        Some(other) => warn!("Ignoring stored studyAreas of unexpected type: {other}"),
    }

    match object.get("lastRun") {
        Some(Value::String(ts)) => match DateTime::parse_from_rfc3339(ts) {
            Ok(parsed) => config.last_run = Some(parsed.with_timezone(&Utc)),
            Err(e) => warn!("Ignoring unparseable stored lastRun {ts:?}: {e}"),
        },
        Some(Value::Null) | None => {}
        Some(other) => warn!("Ignoring stored lastRun of unexpected type: {other}"),
    }

    if !config.is_consistent() {
        warn!("Stored study areas have no base directory -- clearing them");
        config.study_areas.clear();
    }

    config
}
