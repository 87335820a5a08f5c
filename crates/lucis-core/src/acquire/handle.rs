/// Handle-based acquisition over a live, navigable directory handle.
use crate::acquire::{
    root_display_path, Acquisition, AcquisitionError, AcquisitionVariant, DirectoryAcquirer,
};
use crate::model::{LayoutRules, StructuralModel};
use std::io;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Access requested when opening a directory handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    Read,
    ReadWrite,
}

/// Kind of an entry listed by a [`DirectoryHandle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
}

/// One immediate entry of a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryInfo {
    pub name: String,
    pub kind: EntryKind,
}

impl DirEntryInfo {
    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Directory,
        }
    }

    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File,
        }
    }
}

/// Errors from navigating a directory handle.
#[derive(Debug, Error)]
pub enum HandleError {
    #[error("no subfolder named {0:?}")]
    NotFound(String),

    #[error("{0:?} is not a directory")]
    NotADirectory(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// A live directory opened through the host's directory chooser.
pub trait DirectoryHandle: Send {
    /// The folder's own name (not its full path).
    fn name(&self) -> String;

    /// Open the immediate subfolder called `name`.
    fn get_child(&self, name: &str) -> Result<Box<dyn DirectoryHandle>, HandleError>;

    /// List the immediate entries of this folder.
    fn list_entries(&self) -> Result<Vec<DirEntryInfo>, HandleError>;
}

/// The host's native directory chooser.
pub trait DirectoryPicker: Send + Sync {
    /// Let the user pick a folder. `Ok(None)` means the chooser was dismissed.
    fn open(
        &self,
        mode: AccessMode,
    ) -> Result<Option<Box<dyn DirectoryHandle>>, AcquisitionError>;
}

/// Acquirer for hosts that expose navigable directory handles.
pub struct HandleAcquirer {
    picker: Arc<dyn DirectoryPicker>,
    rules: LayoutRules,
}

impl HandleAcquirer {
    pub fn new(picker: Arc<dyn DirectoryPicker>, rules: LayoutRules) -> Self {
        Self { picker, rules }
    }

    /// Build the structural model of an already-opened root handle.
    pub fn model_from_handle(
        &self,
        root: &dyn DirectoryHandle,
    ) -> Result<StructuralModel, AcquisitionError> {
        let root_name = root.name();
        let mut model = StructuralModel::new(root_display_path(&root_name));

        let entries = root
            .list_entries()
            .map_err(|e| handle_failure(&root_name, e))?;
        for entry in entries.iter().filter(|e| e.kind == EntryKind::Directory) {
            model.record_folder(&entry.name, &self.rules);
        }

        let has_data = open_required(root, &self.rules.data_folder);
        let has_ranked = open_required(root, &self.rules.ranked_folder);
        model.set_required_flags(has_data, has_ranked);

        debug!(
            "Handle acquisition of {}: {} entries, {} study area candidates",
            model.root_name(),
            entries.len(),
            model.child_folder_names().len()
        );
        Ok(model)
    }
}

impl DirectoryAcquirer for HandleAcquirer {
    fn acquire(&self) -> Result<Acquisition, AcquisitionError> {
        let Some(root) = self.picker.open(AccessMode::ReadWrite)? else {
            debug!("Directory chooser dismissed");
            return Ok(Acquisition::Cancelled);
        };
        self.model_from_handle(root.as_ref()).map(Acquisition::Selected)
    }

    fn variant(&self) -> AcquisitionVariant {
        AcquisitionVariant::HandleBased
    }
}

/// Try to open a required subfolder.
///
/// Any failure to open it, including an I/O error such as a denied
/// permission, means the structure is absent. Only failures to list the
/// root itself are acquisition errors.
fn open_required(root: &dyn DirectoryHandle, name: &str) -> bool {
    match root.get_child(name) {
        Ok(_) => true,
        Err(HandleError::Io(e)) => {
            warn!("Could not open required folder {name:?} under {}: {e}", root.name());
            false
        }
        Err(e) => {
            debug!("Required folder missing under {}: {e}", root.name());
            false
        }
    }
}

fn handle_failure(path: &str, err: HandleError) -> AcquisitionError {
    match err {
        HandleError::Io(e) => AcquisitionError::from_io(path, e),
        other => AcquisitionError::InvalidSelection(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// In-memory directory handle with one level of entries.
    #[derive(Clone)]
    struct FakeHandle {
        name: String,
        entries: Vec<DirEntryInfo>,
        denied: Option<String>,
        unlistable: bool,
    }

    impl DirectoryHandle for FakeHandle {
        fn name(&self) -> String {
            self.name.clone()
        }

        fn get_child(&self, name: &str) -> Result<Box<dyn DirectoryHandle>, HandleError> {
            if self.denied.as_deref() == Some(name) {
                return Err(HandleError::Io(io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    "denied",
                )));
            }
            match self.entries.iter().find(|e| e.name == name) {
                Some(e) if e.kind == EntryKind::Directory => Ok(Box::new(FakeHandle {
                    name: name.to_string(),
                    entries: Vec::new(),
                    denied: None,
                    unlistable: false,
                })),
                Some(_) => Err(HandleError::NotADirectory(name.to_string())),
                None => Err(HandleError::NotFound(name.to_string())),
            }
        }

        fn list_entries(&self) -> Result<Vec<DirEntryInfo>, HandleError> {
            if self.unlistable {
                return Err(HandleError::Io(io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    "denied",
                )));
            }
            Ok(self.entries.clone())
        }
    }

    struct FakePicker(Option<FakeHandle>);

    impl DirectoryPicker for FakePicker {
        fn open(
            &self,
            mode: AccessMode,
        ) -> Result<Option<Box<dyn DirectoryHandle>>, AcquisitionError> {
            assert_eq!(mode, AccessMode::ReadWrite);
            Ok(self.0.clone().map(|h| Box::new(h) as Box<dyn DirectoryHandle>))
        }
    }

    fn acquirer(root: Option<FakeHandle>) -> HandleAcquirer {
        HandleAcquirer::new(Arc::new(FakePicker(root)), LayoutRules::default())
    }

    fn project(entries: Vec<DirEntryInfo>) -> FakeHandle {
        FakeHandle {
            name: "Project".into(),
            entries,
            denied: None,
            unlistable: false,
        }
    }

    #[test]
    fn full_layout_sets_flags_and_areas() {
        let root = project(vec![
            DirEntryInfo::directory("Data"),
            DirEntryInfo::directory("AreaA"),
            DirEntryInfo::directory("Ranked Tifs"),
            DirEntryInfo::file("notes.txt"),
            DirEntryInfo::directory("AreaB"),
        ]);
        let Acquisition::Selected(model) = acquirer(Some(root)).acquire().unwrap() else {
            panic!("expected a selection");
        };
        assert_eq!(model.root_name(), "/Project");
        assert!(model.has_required_data_folder());
        assert!(model.has_required_ranked_folder());
        assert_eq!(model.child_folder_names(), ["AreaA", "AreaB"]);
    }

    #[test]
    fn missing_required_folder_is_structure_absent() {
        let root = project(vec![
            DirEntryInfo::directory("Data"),
            DirEntryInfo::directory("AreaA"),
        ]);
        let Acquisition::Selected(model) = acquirer(Some(root)).acquire().unwrap() else {
            panic!("expected a selection");
        };
        assert!(model.has_required_data_folder());
        assert!(!model.has_required_ranked_folder());
    }

    #[test]
    fn required_name_as_file_is_not_a_folder() {
        let root = project(vec![
            DirEntryInfo::file("Data"),
            DirEntryInfo::directory("Ranked Tifs"),
        ]);
        let Acquisition::Selected(model) = acquirer(Some(root)).acquire().unwrap() else {
            panic!("expected a selection");
        };
        assert!(!model.has_required_data_folder());
        assert!(model.child_folder_names().is_empty());
    }

    #[test]
    fn dismissed_chooser_is_cancelled() {
        assert_eq!(acquirer(None).acquire().unwrap(), Acquisition::Cancelled);
    }

    #[test]
    fn unreadable_required_folder_is_structure_absent() {
        let mut root = project(vec![
            DirEntryInfo::directory("Data"),
            DirEntryInfo::directory("Ranked Tifs"),
            DirEntryInfo::directory("AreaA"),
        ]);
        root.denied = Some("Data".into());
        let Acquisition::Selected(model) = acquirer(Some(root)).acquire().unwrap() else {
            panic!("expected a selection");
        };
        assert!(!model.has_required_data_folder());
        assert!(model.has_required_ranked_folder());
        assert_eq!(model.child_folder_names(), ["AreaA"]);
    }

    #[test]
    fn unlistable_root_is_acquisition_error() {
        let mut root = project(Vec::new());
        root.unlistable = true;
        let err = acquirer(Some(root)).acquire().unwrap_err();
        assert!(matches!(err, AcquisitionError::PermissionDenied(_)));
    }

    #[test]
    fn duplicate_entries_are_deduplicated() {
        let entries = vec![
            DirEntryInfo::directory("AreaA"),
            DirEntryInfo::directory("Data"),
            DirEntryInfo::directory("Ranked Tifs"),
            DirEntryInfo::directory("AreaA"),
        ];
        let Acquisition::Selected(model) = acquirer(Some(project(entries))).acquire().unwrap()
        else {
            panic!("expected a selection");
        };
        assert_eq!(model.child_folder_names(), ["AreaA"]);
    }
}
