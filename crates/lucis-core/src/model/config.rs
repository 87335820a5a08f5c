/// Session configuration persisted across reloads.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The process-wide configuration owned by the `ConfigStore`.
///
/// Serialised with camelCase field names (`baseDirectory`, `lastRun`,
/// `studyAreas`). `last_run` is written as an RFC 3339 / ISO-8601 string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedConfig {
    pub base_directory: Option<String>,
    pub last_run: Option<DateTime<Utc>>,
    pub study_areas: Vec<String>,
}

impl PersistedConfig {
    /// `true` when a base directory has been validated and applied.
    pub fn has_base_directory(&self) -> bool {
        self.base_directory.is_some()
    }

    /// Study areas only exist under a base directory.
    ///
    /// A base directory with no study areas is consistent: it is what a
    /// permissive `LayoutRules` (no study area required) persists.
    pub fn is_consistent(&self) -> bool {
        self.base_directory.is_some() || self.study_areas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn default_is_empty_and_consistent() {
        let config = PersistedConfig::default();
        assert_eq!(config.base_directory, None);
        assert_eq!(config.last_run, None);
        assert!(config.study_areas.is_empty());
        assert!(config.is_consistent());
    }

    #[test]
    fn serialises_with_camel_case_fields() {
        let config = PersistedConfig {
            base_directory: Some("/Project".into()),
            last_run: Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()),
            study_areas: vec!["AreaA".into()],
        };
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["baseDirectory"], "/Project");
        assert_eq!(value["lastRun"], "2024-05-01T12:00:00Z");
        assert_eq!(value["studyAreas"][0], "AreaA");
    }

    #[test]
    fn areas_without_directory_are_inconsistent() {
        let config = PersistedConfig {
            study_areas: vec!["AreaA".into()],
            ..Default::default()
        };
        assert!(!config.is_consistent());
    }

    #[test]
    fn directory_without_areas_is_consistent() {
        let config = PersistedConfig {
            base_directory: Some("/Project".into()),
            ..Default::default()
        };
        assert!(config.is_consistent());
    }
}
