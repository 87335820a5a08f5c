/// Structure validation: the required-layout rule.
///
/// Validation is a pure, total function of the [`StructuralModel`]: it never
/// touches the filesystem and never fails. It does not branch on how the
/// model was acquired.
use crate::model::{LayoutRules, StructuralModel, ValidationResult};
use tracing::debug;

/// Check `model` against `rules`.
///
/// The root is valid when both required subfolders are present (and, if
/// `rules.require_study_area` is set, at least one study area exists).
/// Study areas are the model's child folder names in discovery order.
pub fn validate(model: &StructuralModel, rules: &LayoutRules) -> ValidationResult {
    let has_required = model.has_required_data_folder() && model.has_required_ranked_folder();
    let has_areas = !model.child_folder_names().is_empty();

    if has_required && (has_areas || !rules.require_study_area) {
        debug!(
            "{} accepted with {} study area(s)",
            model.root_name(),
            model.child_folder_names().len()
        );
        ValidationResult::Valid {
            study_areas: model.child_folder_names().to_vec(),
        }
    } else {
        debug!(
            "{} rejected (data: {}, ranked: {}, areas: {})",
            model.root_name(),
            model.has_required_data_folder(),
            model.has_required_ranked_folder(),
            model.child_folder_names().len()
        );
        ValidationResult::Invalid {
            reason: rules.rejection_reason(),
        }
    }
}
