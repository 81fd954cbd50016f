//! Utility functions shared across CLI commands.

mod catalogue;
mod discovery;
pub mod ui;

pub use catalogue::{LoadedCatalogue, malformed_diagnostic};
pub use discovery::{CatalogueFiles, read_config, resolve_catalogues, ts_files_in};
