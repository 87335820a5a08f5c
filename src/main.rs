//! LUCIS: working-directory selection and session configuration.
//!
//! Thin binary entry point. All logic lives in the `lucis-core` and
//! `lucis-session` crates. The "choosers" are answered from the command line:
//!
//! ```text
//! lucis [ROOT] [--file-list] [--run] [--export DIR]
//! ```
//!
//! Without `ROOT` the selection behaves like a dismissed chooser.

use anyhow::{bail, Context};
use lucis_core::acquire::{
    DirectoryPicker, HostCapabilities, PresetDirectoryPicker, WalkedFileListPicker,
};
use lucis_core::export::DirectoryExportSink;
use lucis_core::model::LayoutRules;
use lucis_core::store::{ConfigStore, FileBackend};
use lucis_session::{Collaborators, Dispatch, Severity, SessionController, SimulatedModelRunner};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Longest a single selection or run may take before the binary gives up.
const SETTLE_TIMEOUT: Duration = Duration::from_secs(600);

#[derive(Debug, Default)]
struct Args {
    root: Option<PathBuf>,
    file_list_only: bool,
    run: bool,
    export_dir: Option<PathBuf>,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--file-list" => args.file_list_only = true,
            "--run" => args.run = true,
            "--export" => {
                let dir = iter.next().context("--export needs a directory")?;
                args.export_dir = Some(PathBuf::from(dir));
            }
            flag if flag.starts_with("--") => bail!("unknown option {flag}"),
            path => {
                if args.root.is_some() {
                    bail!("only one root folder may be given");
                }
                args.root = Some(PathBuf::from(path));
            }
        }
    }
    Ok(args)
}

/// `LUCIS_CONFIG_DIR`, else the platform-local config directory.
fn config_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os("LUCIS_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    directories::ProjectDirs::from("", "", "Lucis")
        .map(|dirs| dirs.config_local_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".lucis"))
}

fn report(session: &mut SessionController) {
    for note in session.take_notifications() {
        match note.severity {
            Severity::Error => tracing::error!("{}", note.message),
            Severity::Info | Severity::Success => tracing::info!("{}", note.message),
        }
    }
}

fn main() -> anyhow::Result<()> {
    // Initialise structured logging.
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    tracing::info!("LUCIS starting");

    let args = parse_args()?;
    let rules = LayoutRules::default();

    let directory_picker: Option<Arc<dyn DirectoryPicker>> = if args.file_list_only {
        None
    } else {
        Some(Arc::new(PresetDirectoryPicker::new(args.root.clone())))
    };
    let caps = HostCapabilities {
        directory_picker,
        file_list_picker: Arc::new(WalkedFileListPicker::new(args.root.clone())),
    };

    let config_dir = config_dir();
    tracing::info!("Using config directory {}", config_dir.display());
    let store = ConfigStore::open(Arc::new(FileBackend::new(&config_dir)));

    let export_dir = args
        .export_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));
    let collaborators = Collaborators {
        acquirer: caps.acquirer(rules.clone()),
        runner: Arc::new(SimulatedModelRunner::default()),
        export_sink: Arc::new(DirectoryExportSink::new(export_dir)),
    };
    let mut session = SessionController::new(store, collaborators, rules);
    report(&mut session);

    if session.select_root() == Dispatch::Started && !session.wait_until_settled(SETTLE_TIMEOUT) {
        bail!("directory selection did not finish");
    }
    report(&mut session);

    if args.run {
        if session.run_model() == Dispatch::Started && !session.wait_until_settled(SETTLE_TIMEOUT)
        {
            bail!("model run did not finish");
        }
        report(&mut session);
    }

    if args.export_dir.is_some() {
        // Failure is already reported as a notification.
        let _ = session.export_config();
        report(&mut session);
    }

    Ok(())
}
