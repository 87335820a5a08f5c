/// Acquisition-independent description of a selected root folder.
///
/// Both acquisition variants normalise into a `StructuralModel`, so the
/// validator never needs to know how the folder was obtained.
use crate::model::LayoutRules;

/// The immediate contents of a selected root folder.
///
/// `child_folder_names` holds candidate study areas only: the two required
/// folders are tracked through their presence flags and never appear in it.
/// Names are deduplicated and kept in discovery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralModel {
    root_name: String,
    child_folder_names: Vec<String>,
    has_data_folder: bool,
    has_ranked_folder: bool,
}

impl StructuralModel {
    /// Create an empty model for a root with the given display name/path.
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            root_name: root_name.into(),
            child_folder_names: Vec::new(),
            has_data_folder: false,
            has_ranked_folder: false,
        }
    }

    /// Record an immediate subfolder as a candidate study area.
    ///
    /// Empty names, required folder names and names already recorded are
    /// ignored. Returns `true` if the name was added.
    pub fn record_folder(&mut self, name: &str, rules: &LayoutRules) -> bool {
        if name.is_empty() || rules.is_required(name) {
            return false;
        }
        if self.child_folder_names.iter().any(|n| n == name) {
            return false;
        }
        self.child_folder_names.push(name.to_string());
        true
    }

    /// Set the presence flags for the two required subfolders.
    pub fn set_required_flags(&mut self, has_data_folder: bool, has_ranked_folder: bool) {
        self.has_data_folder = has_data_folder;
        self.has_ranked_folder = has_ranked_folder;
    }

    pub fn root_name(&self) -> &str {
        &self.root_name
    }

    pub fn child_folder_names(&self) -> &[String] {
        &self.child_folder_names
    }

    pub fn has_required_data_folder(&self) -> bool {
        self.has_data_folder
    }

    pub fn has_required_ranked_folder(&self) -> bool {
        self.has_ranked_folder
    }
}

/// Outcome of checking a [`StructuralModel`] against the layout rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Both required folders exist. `study_areas` is exactly the model's
    /// child folder names, in discovery order.
    Valid { study_areas: Vec<String> },
    /// The layout check failed; `reason` is shown to the user.
    Invalid { reason: String },
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid { .. })
    }

    /// Study areas of a valid result; empty for an invalid one.
    pub fn study_areas(&self) -> &[String] {
        match self {
            ValidationResult::Valid { study_areas } => study_areas,
            ValidationResult::Invalid { .. } => &[],
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            ValidationResult::Valid { .. } => None,
            ValidationResult::Invalid { reason } => Some(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_folder_skips_required_and_duplicates() {
        let rules = LayoutRules::default();
        let mut model = StructuralModel::new("/Project");

        assert!(model.record_folder("AreaA", &rules));
        assert!(!model.record_folder("Data", &rules));
        assert!(!model.record_folder("Ranked Tifs", &rules));
        assert!(!model.record_folder("AreaA", &rules));
        assert!(!model.record_folder("", &rules));
        assert!(model.record_folder("AreaB", &rules));

        assert_eq!(model.child_folder_names(), ["AreaA", "AreaB"]);
        assert!(!model.has_required_data_folder());
        assert!(!model.has_required_ranked_folder());
    }

    #[test]
    fn required_flags_are_independent_of_children() {
        let mut model = StructuralModel::new("/Project");
        model.set_required_flags(true, false);
        assert!(model.has_required_data_folder());
        assert!(!model.has_required_ranked_folder());
        assert!(model.child_folder_names().is_empty());
    }

    #[test]
    fn invalid_result_has_no_study_areas() {
        let result = ValidationResult::Invalid {
            reason: "nope".into(),
        };
        assert!(!result.is_valid());
        assert!(result.study_areas().is_empty());
        assert_eq!(result.reason(), Some("nope"));
    }
}
