/// File-list acquisition: the fallback for hosts without directory handles.
///
/// A directory-mode multi-file chooser returns every file below the picked
/// folder as a relative path `root/sub/.../file`. The folder structure is
/// reconstructed from those paths alone:
///
/// - the root name is the first segment of the first path;
/// - a required folder is present if any path has it as a directory segment
///   below the root (i.e. contains `/Data/`);
/// - study areas are the distinct second segments of paths that continue
///   below them, so loose files in the root are not mistaken for folders.
///
/// Folders that contain no files at any depth are invisible to this variant.
use crate::acquire::{
    root_display_path, Acquisition, AcquisitionError, AcquisitionVariant, DirectoryAcquirer,
};
use crate::model::{LayoutRules, StructuralModel};
use std::sync::Arc;
use tracing::debug;

/// The host's directory-mode multi-file chooser.
pub trait FileListPicker: Send + Sync {
    /// Let the user pick a folder tree. An empty list means the chooser was
    /// dismissed.
    fn pick(&self) -> Result<Vec<String>, AcquisitionError>;
}

/// Acquirer for hosts that only offer the flat file-list chooser.
pub struct FileListAcquirer {
    picker: Arc<dyn FileListPicker>,
    rules: LayoutRules,
}

impl FileListAcquirer {
    pub fn new(picker: Arc<dyn FileListPicker>, rules: LayoutRules) -> Self {
        Self { picker, rules }
    }
}

impl DirectoryAcquirer for FileListAcquirer {
    fn acquire(&self) -> Result<Acquisition, AcquisitionError> {
        let paths = self.picker.pick()?;
        match model_from_relative_paths(&paths, &self.rules)? {
            Some(model) => Ok(Acquisition::Selected(model)),
            None => {
                debug!("File chooser returned no files");
                Ok(Acquisition::Cancelled)
            }
        }
    }

    fn variant(&self) -> AcquisitionVariant {
        AcquisitionVariant::FileListBased
    }
}

/// Reconstruct the structural model from relative file paths.
///
/// Returns `Ok(None)` for an empty list (nothing was selected).
pub fn model_from_relative_paths(
    paths: &[String],
    rules: &LayoutRules,
) -> Result<Option<StructuralModel>, AcquisitionError> {
    let Some(first) = paths.first() else {
        return Ok(None);
    };
    let root_name = first.split('/').next().unwrap_or_default();
    if root_name.is_empty() {
        return Err(AcquisitionError::InvalidSelection(format!(
            "relative path {first:?} has no root folder"
        )));
    }

    let mut model = StructuralModel::new(root_display_path(root_name));
    let mut has_data = false;
    let mut has_ranked = false;

    for path in paths {
        let segments: Vec<&str> = path.split('/').collect();
        // Directory segments below the root: everything between the root
        // and the file name.
        let dirs = match segments.len() {
            0..=2 => &[][..],
            n => &segments[1..n - 1],
        };
        has_data |= dirs.iter().any(|s| *s == rules.data_folder);
        has_ranked |= dirs.iter().any(|s| *s == rules.ranked_folder);
        if let Some(area) = dirs.first() {
            model.record_folder(area, rules);
        }
    }

    model.set_required_flags(has_data, has_ranked);
    debug!(
        "File-list acquisition of {}: {} files, {} study area candidates",
        model.root_name(),
        paths.len(),
        model.child_folder_names().len()
    );
    Ok(Some(model))
}
