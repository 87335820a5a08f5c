/// Native filesystem capabilities for both acquisition variants.
///
/// These stand in for the browser choosers when the core runs as a desktop
/// or command-line program: the "chooser" is given its answer up front.
use crate::acquire::{
    AccessMode, AcquisitionError, DirEntryInfo, DirectoryHandle, DirectoryPicker, EntryKind,
    FileListPicker, HandleError,
};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A directory handle backed by `std::fs`.
pub struct FsDirectoryHandle {
    path: PathBuf,
}

impl FsDirectoryHandle {
    /// Open `path` as a directory handle with the requested access.
    ///
    /// The path is canonicalised first, so `.` or `..` resolve to a real
    /// folder name. `ReadWrite` fails with `PermissionDenied` on a read-only
    /// directory.
    pub fn open(path: impl Into<PathBuf>, mode: AccessMode) -> Result<Self, AcquisitionError> {
        let path = canonical(&path.into())?;
        let meta =
            fs::metadata(&path).map_err(|e| AcquisitionError::from_io(path_text(&path), e))?;
        if !meta.is_dir() {
            return Err(AcquisitionError::InvalidSelection(format!(
                "{} is not a directory",
                path.display()
            )));
        }
        if mode == AccessMode::ReadWrite && meta.permissions().readonly() {
            return Err(AcquisitionError::PermissionDenied(path_text(&path)));
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DirectoryHandle for FsDirectoryHandle {
    fn name(&self) -> String {
        folder_name(&self.path)
    }

    fn get_child(&self, name: &str) -> Result<Box<dyn DirectoryHandle>, HandleError> {
        // Symlinks are not followed, matching `list_entries` and the walk.
        let child = self.path.join(name);
        match fs::symlink_metadata(&child) {
            Ok(meta) if meta.is_dir() => Ok(Box::new(FsDirectoryHandle { path: child })),
            Ok(_) => Err(HandleError::NotADirectory(name.to_string())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(HandleError::NotFound(name.to_string()))
            }
            Err(e) => Err(HandleError::Io(e)),
        }
    }

    fn list_entries(&self) -> Result<Vec<DirEntryInfo>, HandleError> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.path)? {
            let entry = entry?;
            let kind = if entry.file_type()?.is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::File
            };
            entries.push(DirEntryInfo {
                name: entry.file_name().to_string_lossy().into_owned(),
                kind,
            });
        }
        Ok(entries)
    }
}

/// A directory chooser whose answer is fixed when it is built.
///
/// `None` behaves like a user dismissing the chooser.
pub struct PresetDirectoryPicker {
    path: Option<PathBuf>,
}

impl PresetDirectoryPicker {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

impl DirectoryPicker for PresetDirectoryPicker {
    fn open(
        &self,
        mode: AccessMode,
    ) -> Result<Option<Box<dyn DirectoryHandle>>, AcquisitionError> {
        match &self.path {
            Some(path) => {
                let handle = FsDirectoryHandle::open(path.clone(), mode)?;
                Ok(Some(Box::new(handle)))
            }
            None => Ok(None),
        }
    }
}

/// A directory-mode multi-file chooser emulated by walking the tree.
///
/// Produces one `root/sub/.../file` path per file, the same shape a browser
/// returns for a directory upload.
pub struct WalkedFileListPicker {
    root: Option<PathBuf>,
}

impl WalkedFileListPicker {
    pub fn new(root: Option<PathBuf>) -> Self {
        Self { root }
    }
}

impl FileListPicker for WalkedFileListPicker {
    fn pick(&self) -> Result<Vec<String>, AcquisitionError> {
        let Some(root) = &self.root else {
            return Ok(Vec::new());
        };
        let root = &canonical(root)?;
        // Surface an unreadable or missing root as an error; deeper failures
        // are skipped like unreadable files in a browser upload.
        fs::read_dir(root).map_err(|e| AcquisitionError::from_io(path_text(root), e))?;

        let root_name = folder_name(root);
        let walker = jwalk::WalkDir::new(root)
            .skip_hidden(false)
            .follow_links(false)
            .sort(true)
            .parallelism(jwalk::Parallelism::RayonNewPool(num_cpus::get()));

        let mut paths = Vec::new();
        for entry_result in walker {
            let entry = match entry_result {
                Ok(e) => e,
                Err(err) => {
                    warn!("Skipping unreadable entry during file-list walk: {err}");
                    continue;
                }
            };
            if entry.file_type().is_dir() {
                continue;
            }
            let full = entry.path();
            let Ok(relative) = full.strip_prefix(root) else {
                continue;
            };
            let mut rel = root_name.clone();
            for component in relative.components() {
                rel.push('/');
                rel.push_str(&component.as_os_str().to_string_lossy());
            }
            paths.push(rel);
        }

        debug!("Walked {} files below {}", paths.len(), root.display());
        Ok(paths)
    }
}

/// Final path component, or the whole path for roots like `/`.
fn folder_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

fn canonical(path: &Path) -> Result<PathBuf, AcquisitionError> {
    fs::canonicalize(path).map_err(|e| AcquisitionError::from_io(path_text(path), e))
}

fn path_text(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
