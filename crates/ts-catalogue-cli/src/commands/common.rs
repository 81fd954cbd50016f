use crate::core::CliError;
use crate::utils::{CatalogueFiles, resolve_catalogues};
use clap::Args;
use std::path::PathBuf;

/// Which catalogues a command works on.
#[derive(Debug, Clone, Args)]
pub struct CatalogueArgs {
    /// Catalogue files or directories. Defaults to every catalogue in the
    /// assets directory named by i18n.toml.
    pub files: Vec<PathBuf>,

    /// Directory containing i18n.toml.
    #[arg(long, default_value = ".")]
    pub config_dir: PathBuf,
}

impl CatalogueArgs {
    pub fn resolve(&self) -> Result<CatalogueFiles, CliError> {
        resolve_catalogues(&self.files, &self.config_dir)
    }
}
