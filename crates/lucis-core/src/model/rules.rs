//! Required-layout rules for a LUCIS root folder.

/// Name of the required raw-data subfolder.
pub const DATA_FOLDER_NAME: &str = "Data";

/// Name of the required ranked-raster subfolder.
pub const RANKED_FOLDER_NAME: &str = "Ranked Tifs";

/// Describes which immediate subfolders a root must contain to be accepted.
///
/// The defaults match the folder names the model engine expects. Every
/// component that classifies folder names (both acquirers and the validator)
/// takes the same `LayoutRules`, so a renamed layout is applied uniformly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutRules {
    pub data_folder: String,
    pub ranked_folder: String,
    /// Reject roots that have both required folders but no study area.
    pub require_study_area: bool,
}

impl Default for LayoutRules {
    fn default() -> Self {
        Self {
            data_folder: DATA_FOLDER_NAME.to_string(),
            ranked_folder: RANKED_FOLDER_NAME.to_string(),
            require_study_area: true,
        }
    }
}

impl LayoutRules {
    /// `true` if `name` is one of the two required folder names.
    pub fn is_required(&self, name: &str) -> bool {
        name == self.data_folder || name == self.ranked_folder
    }

    /// Human-readable rejection reason shown when the layout check fails.
    pub fn rejection_reason(&self) -> String {
        format!(
            "Invalid directory structure: requires {}, {}, and at least one study-area folder.",
            self.data_folder, self.ranked_folder
        )
    }
}
