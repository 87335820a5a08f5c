/// Data model shared by acquisition, validation and the config store.
pub mod config;
pub mod rules;
pub mod structure;

pub use config::PersistedConfig;
pub use rules::{LayoutRules, DATA_FOLDER_NAME, RANKED_FOLDER_NAME};
pub use structure::{StructuralModel, ValidationResult};
