/// End-to-end acquisition tests against a real temporary filesystem.
///
/// Both native capability variants (directory handle and walked file list)
/// are run over the same trees, and their models must validate identically.
/// The results are then pushed through the config store and export document
/// to cover the full select → validate → persist → export path.
use lucis_core::acquire::{
    Acquisition, DirectoryAcquirer, FileListAcquirer, HandleAcquirer, HostCapabilities,
    PresetDirectoryPicker, WalkedFileListPicker,
};
use lucis_core::export::ExportDocument;
use lucis_core::model::{LayoutRules, StructuralModel, ValidationResult};
use lucis_core::store::{ConfigStore, FileBackend};
use lucis_core::validate::validate;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Create `root/<folder>/sample.txt` for each folder so the tree is visible
/// to the file-list variant as well.
fn build_project(parent: &Path, folders: &[&str]) -> PathBuf {
    let root = parent.join("Project");
    fs::create_dir_all(&root).unwrap();
    for folder in folders {
        let dir = root.join(folder);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("sample.txt"), b"lucis").unwrap();
    }
    root
}

fn handle_acquirer(root: &Path) -> HandleAcquirer {
    HandleAcquirer::new(
        Arc::new(PresetDirectoryPicker::new(Some(root.to_path_buf()))),
        LayoutRules::default(),
    )
}

fn file_list_acquirer(root: &Path) -> FileListAcquirer {
    FileListAcquirer::new(
        Arc::new(WalkedFileListPicker::new(Some(root.to_path_buf()))),
        LayoutRules::default(),
    )
}

fn selected(acquirer: &dyn DirectoryAcquirer) -> StructuralModel {
    match acquirer.acquire().expect("acquisition must succeed") {
        Acquisition::Selected(model) => model,
        Acquisition::Cancelled => panic!("acquisition was unexpectedly cancelled"),
    }
}

fn sorted(mut names: Vec<String>) -> Vec<String> {
    names.sort();
    names
}

// ── Tests ─────────────────────────────────────────────────────────────────────

/// A complete layout is accepted by both variants with the same study areas.
#[test]
fn both_variants_accept_full_layout() {
    let tmp = TempDir::new().unwrap();
    let root = build_project(tmp.path(), &["Data", "Ranked Tifs", "AreaA", "AreaB"]);
    let rules = LayoutRules::default();

    let by_handle = validate(&selected(&handle_acquirer(&root)), &rules);
    let by_list = validate(&selected(&file_list_acquirer(&root)), &rules);

    assert!(by_handle.is_valid());
    assert!(by_list.is_valid());
    assert_eq!(
        sorted(by_handle.study_areas().to_vec()),
        vec!["AreaA".to_string(), "AreaB".to_string()]
    );
    assert_eq!(
        sorted(by_handle.study_areas().to_vec()),
        sorted(by_list.study_areas().to_vec())
    );
}

/// Missing `Ranked Tifs` is rejected by both variants with the same reason.
#[test]
fn both_variants_reject_missing_ranked_folder() {
    let tmp = TempDir::new().unwrap();
    let root = build_project(tmp.path(), &["Data", "AreaA"]);
    let rules = LayoutRules::default();

    let by_handle = validate(&selected(&handle_acquirer(&root)), &rules);
    let by_list = validate(&selected(&file_list_acquirer(&root)), &rules);

    assert!(!by_handle.is_valid());
    assert_eq!(by_handle, by_list);
    assert!(by_handle
        .reason()
        .unwrap()
        .contains("Invalid directory structure"));
}

/// Both variants report the same root display path.
#[test]
fn both_variants_agree_on_root_name() {
    let tmp = TempDir::new().unwrap();
    let root = build_project(tmp.path(), &["Data", "Ranked Tifs", "AreaA"]);

    let by_handle = selected(&handle_acquirer(&root));
    let by_list = selected(&file_list_acquirer(&root));

    assert_eq!(by_handle.root_name(), "/Project");
    assert_eq!(by_list.root_name(), "/Project");
    assert_eq!(
        by_handle.has_required_data_folder(),
        by_list.has_required_data_folder()
    );
    assert_eq!(
        by_handle.has_required_ranked_folder(),
        by_list.has_required_ranked_folder()
    );
}

/// Capability probing without a directory chooser still acquires the tree.
#[test]
fn probed_fallback_acquires_tree() {
    let tmp = TempDir::new().unwrap();
    let root = build_project(tmp.path(), &["Data", "Ranked Tifs", "AreaA"]);
    let caps = HostCapabilities {
        directory_picker: None,
        file_list_picker: Arc::new(WalkedFileListPicker::new(Some(root))),
    };
    let acquirer = caps.acquirer(LayoutRules::default());
    let result = validate(&selected(acquirer.as_ref()), &LayoutRules::default());
    assert_eq!(
        result,
        ValidationResult::Valid {
            study_areas: vec!["AreaA".into()]
        }
    );
}

/// A validated selection survives a store reload and exports as expected.
#[test]
fn validated_selection_persists_and_exports() {
    let tmp = TempDir::new().unwrap();
    let root = build_project(tmp.path(), &["Data", "Ranked Tifs", "AreaA", "AreaB"]);
    let config_dir = tmp.path().join("config");
    let rules = LayoutRules::default();

    let model = selected(&handle_acquirer(&root));
    let result = validate(&model, &rules);

    let mut store = ConfigStore::open(Arc::new(FileBackend::new(&config_dir)));
    store.apply_validated(&model, &result);

    let reloaded = ConfigStore::open(Arc::new(FileBackend::new(&config_dir)));
    assert_eq!(reloaded.config().base_directory.as_deref(), Some("/Project"));
    assert_eq!(
        sorted(reloaded.config().study_areas.clone()),
        vec!["AreaA".to_string(), "AreaB".to_string()]
    );

    let doc = ExportDocument::new(reloaded.config(), chrono::Utc::now());
    assert_eq!(doc.lucis_config.base_directory.as_deref(), Some("/Project"));
    assert_eq!(doc.lucis_config.last_run, None);
    assert_eq!(doc.lucis_config.version, "1.0.0");
}

/// An empty folder (nothing to upload) reads as a dismissed file chooser.
#[test]
fn empty_tree_is_cancelled_for_file_list() {
    let tmp = TempDir::new().unwrap();
    let root = build_project(tmp.path(), &[]);
    let outcome = file_list_acquirer(&root).acquire().unwrap();
    assert_eq!(outcome, Acquisition::Cancelled);
}
