/// Config export: the downloadable JSON document and the download seam.
///
/// The document wraps the persisted config in a `lucis_config` envelope with
/// snake_case field names, an export timestamp and a schema version:
///
/// ```text
/// { "lucis_config": { "base_directory": ..., "study_areas": [...],
///                     "last_run": ..., "export_date": ..., "version": "1.0.0" } }
/// ```
use crate::model::PersistedConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

/// Schema version stamped into every export.
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Suggested filename for the exported document.
pub const EXPORT_FILENAME: &str = "lucis_config.json";

/// MIME type of the exported document.
pub const EXPORT_MIME_TYPE: &str = "application/json";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to serialise export document: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to deliver {filename}: {source}")]
    Delivery {
        filename: String,
        #[source]
        source: io::Error,
    },
}

/// Top-level export document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub lucis_config: ExportedConfig,
}

/// The exported config plus its metadata envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedConfig {
    pub base_directory: Option<String>,
    pub study_areas: Vec<String>,
    pub last_run: Option<DateTime<Utc>>,
    pub export_date: DateTime<Utc>,
    pub version: String,
}

impl ExportDocument {
    /// Snapshot `config` as an export taken at `export_date`.
    pub fn new(config: &PersistedConfig, export_date: DateTime<Utc>) -> Self {
        Self {
            lucis_config: ExportedConfig {
                base_directory: config.base_directory.clone(),
                study_areas: config.study_areas.clone(),
                last_run: config.last_run,
                export_date,
                version: EXPORT_SCHEMA_VERSION.to_string(),
            },
        }
    }

    /// Pretty-printed JSON bytes, ready to hand to an [`ExportSink`].
    pub fn to_bytes(&self) -> Result<Vec<u8>, ExportError> {
        Ok(serde_json::to_vec_pretty(self)?)
    }
}

/// The host's download collaborator.
pub trait ExportSink: Send + Sync {
    /// Offer `payload` to the user as a file named `filename`.
    fn deliver(&self, payload: &[u8], filename: &str, mime_type: &str) -> Result<(), ExportError>;
}

/// Writes exports into a fixed directory, standing in for a browser download.
pub struct DirectoryExportSink {
    dir: PathBuf,
}

impl DirectoryExportSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ExportSink for DirectoryExportSink {
    fn deliver(&self, payload: &[u8], filename: &str, mime_type: &str) -> Result<(), ExportError> {
        let target = self.dir.join(filename);
        fs::create_dir_all(&self.dir)
            .and_then(|_| fs::write(&target, payload))
            .map_err(|source| ExportError::Delivery {
                filename: filename.to_string(),
                source,
            })?;
        info!(
            "Exported {} bytes ({mime_type}) to {}",
            payload.len(),
            target.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::Value;
    use tempfile::TempDir;

    fn validated_config() -> PersistedConfig {
        PersistedConfig {
            base_directory: Some("/Project".into()),
            last_run: None,
            study_areas: vec!["AreaA".into(), "AreaB".into()],
        }
    }

    #[test]
    fn document_shape_matches_export_schema() {
        let when = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
        let doc = ExportDocument::new(&validated_config(), when);
        let value: Value = serde_json::from_slice(&doc.to_bytes().unwrap()).unwrap();

        let inner = &value["lucis_config"];
        assert_eq!(inner["base_directory"], "/Project");
        assert_eq!(inner["study_areas"], serde_json::json!(["AreaA", "AreaB"]));
        assert_eq!(inner["last_run"], Value::Null);
        assert_eq!(inner["export_date"], "2024-06-01T08:00:00Z");
        assert_eq!(inner["version"], "1.0.0");
        assert_eq!(value.as_object().unwrap().len(), 1);
    }

    #[test]
    fn unvalidated_config_exports_nulls() {
        let doc = ExportDocument::new(&PersistedConfig::default(), Utc::now());
        assert_eq!(doc.lucis_config.base_directory, None);
        assert!(doc.lucis_config.study_areas.is_empty());
    }

    #[test]
    fn directory_sink_writes_file() {
        let tmp = TempDir::new().unwrap();
        let sink = DirectoryExportSink::new(tmp.path().join("downloads"));
        sink.deliver(b"{}", EXPORT_FILENAME, EXPORT_MIME_TYPE).unwrap();
        let written = fs::read(tmp.path().join("downloads").join(EXPORT_FILENAME)).unwrap();
        assert_eq!(written, b"{}");
    }
}
