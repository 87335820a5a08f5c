/// Acquisition module: obtains a [`StructuralModel`] from the host.
///
/// Provides two capability variants behind one [`DirectoryAcquirer`] trait:
/// - **HandleBased:** a live, navigable directory handle (preferred).
/// - **FileListBased:** a flat list of `root/sub/.../file` relative paths
///   from a directory-mode multi-file chooser (fallback).
///
/// [`HostCapabilities::acquirer`] probes which choosers the host offers and
/// picks the variant, the same way the scanner picks between its tiers.
/// Both variants normalise into the same model so validation never branches
/// on the acquisition method.
pub mod file_list;
pub mod handle;
pub mod native;

use crate::model::{LayoutRules, StructuralModel};
use std::io;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

pub use file_list::{model_from_relative_paths, FileListAcquirer, FileListPicker};
pub use handle::{
    AccessMode, DirEntryInfo, DirectoryHandle, DirectoryPicker, EntryKind, HandleAcquirer,
    HandleError,
};
pub use native::{FsDirectoryHandle, PresetDirectoryPicker, WalkedFileListPicker};

/// Failures while obtaining folder information from the host.
///
/// A missing required subfolder is *not* an acquisition error: it yields a
/// model with the corresponding flag unset, which the validator rejects.
#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error("permission denied for {0}")]
    PermissionDenied(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    #[error("directory chooser failed: {0}")]
    Chooser(String),
}

impl AcquisitionError {
    /// Classify an I/O error raised while reading `path`.
    pub fn from_io(path: impl Into<String>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::PermissionDenied {
            AcquisitionError::PermissionDenied(path)
        } else {
            AcquisitionError::Io { path, source }
        }
    }
}

/// Result of a successful acquisition call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Acquisition {
    /// The user picked a folder; this is its normalised structure.
    Selected(StructuralModel),
    /// The user dismissed the chooser without picking anything.
    Cancelled,
}

/// Which host capability an acquirer uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquisitionVariant {
    HandleBased,
    FileListBased,
}

/// Produces a [`StructuralModel`] from whichever host capability it wraps.
///
/// `acquire` may block while the user interacts with a native chooser, so
/// callers run it off their own thread.
pub trait DirectoryAcquirer: Send + Sync {
    fn acquire(&self) -> Result<Acquisition, AcquisitionError>;

    fn variant(&self) -> AcquisitionVariant;
}

/// Display path for a root folder name, e.g. `"Project"` → `"/Project"`.
pub fn root_display_path(folder_name: &str) -> String {
    format!("/{}", folder_name.trim_start_matches('/'))
}

/// The choosers offered by the host environment.
///
/// A directory-mode multi-file chooser is always available; the
/// handle-based chooser is optional.
#[derive(Clone)]
pub struct HostCapabilities {
    pub directory_picker: Option<Arc<dyn DirectoryPicker>>,
    pub file_list_picker: Arc<dyn FileListPicker>,
}

impl HostCapabilities {
    /// Pick the acquisition variant for this host.
    ///
    /// Uses the handle-based chooser when present and falls back to the
    /// file-list chooser otherwise.
    pub fn acquirer(&self, rules: LayoutRules) -> Arc<dyn DirectoryAcquirer> {
        match &self.directory_picker {
            Some(picker) => {
                info!("Using directory-handle acquisition");
                Arc::new(HandleAcquirer::new(picker.clone(), rules))
            }
            None => {
                info!("Directory handles unavailable -- falling back to file-list acquisition");
                Arc::new(FileListAcquirer::new(self.file_list_picker.clone(), rules))
            }
        }
    }
}
