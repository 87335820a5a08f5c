/// LUCIS Core: directory acquisition, structure validation and persisted
/// configuration.
///
/// This crate contains all business logic with zero UI dependencies.
/// It is designed to be driven by any frontend (browser shell, desktop, CLI).
///
/// # Modules
///
/// - [`model`]: Structural model, validation result, persisted config and layout rules.
/// - [`acquire`]: Handle-based and file-list-based directory acquisition.
/// - [`validate`]: The required-layout check.
/// - [`store`]: `ConfigStore` and its key-value persistence backends.
/// - [`export`]: Config export document and the download seam.
pub mod acquire;
pub mod export;
pub mod model;
pub mod store;
pub mod validate;
