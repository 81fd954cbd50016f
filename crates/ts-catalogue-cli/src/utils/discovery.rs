use crate::core::{
    AssetsNotFoundError, CliError, ConfigInvalidError, ConfigNotFoundError, ConfigParseError,
};
use anyhow::Context as _;
use fs_err as fs;
use miette::{NamedSource, SourceSpan};
use std::path::{Path, PathBuf};
use ts_catalogue_core::LoadOptions;
use ts_catalogue_toml::{CONFIG_FILE_NAME, I18nConfig, I18nConfigError};
use walkdir::WalkDir;

/// The catalogue files a command operates on, with the load policy to use.
#[derive(Debug, Clone)]
pub struct CatalogueFiles {
    pub files: Vec<PathBuf>,
    pub options: LoadOptions,
}

/// Reads `i18n.toml` in `config_dir`, if there is one.
pub fn read_config(config_dir: &Path) -> Result<Option<I18nConfig>, CliError> {
    let path = config_dir.join(CONFIG_FILE_NAME);
    if !path.is_file() {
        return Ok(None);
    }

    match I18nConfig::read_from_path(&path) {
        Ok(config) => Ok(Some(config)),
        Err(I18nConfigError::ParseError(err)) => {
            let content = fs::read_to_string(&path)?;
            Err(ConfigParseError {
                src: NamedSource::new(path.display().to_string(), content),
                span: err
                    .span()
                    .map(|range| SourceSpan::new(range.start.into(), range.len())),
                help: err.message().to_string(),
            }
            .into())
        },
        Err(err) => Err(ConfigInvalidError {
            path,
            help: err.to_string(),
        }
        .into()),
    }
}

/// Expands `paths` into catalogue files.
///
/// Directories are searched recursively for `.ts` files. With no paths, every
/// catalogue under the assets directory of `config_dir/i18n.toml` is used.
pub fn resolve_catalogues(paths: &[PathBuf], config_dir: &Path) -> Result<CatalogueFiles, CliError> {
    let config = read_config(config_dir)?;
    let options = config
        .as_ref()
        .map(I18nConfig::load_options)
        .unwrap_or_default();

    let files = if paths.is_empty() {
        let config = config.ok_or_else(|| ConfigNotFoundError {
            expected_path: config_dir.to_path_buf(),
        })?;
        configured_catalogues(&config, config_dir)?
    } else {
        let mut files = Vec::new();
        for path in paths {
            if path.is_dir() {
                files.extend(ts_files_in(path)?);
            } else {
                files.push(path.clone());
            }
        }
        files
    };

    if files.is_empty() {
        return Err(CliError::NoCatalogues);
    }

    tracing::debug!("Resolved {} catalogue file(s)", files.len());
    Ok(CatalogueFiles { files, options })
}

fn configured_catalogues(config: &I18nConfig, config_dir: &Path) -> Result<Vec<PathBuf>, CliError> {
    let assets_dir = config
        .assets_dir_from_base(Some(config_dir))
        .map_err(|err| CliError::Other(err.to_string()))?;
    if !assets_dir.is_dir() {
        return Err(AssetsNotFoundError { path: assets_dir }.into());
    }

    let languages = config
        .available_languages_from_base(Some(config_dir))
        .map_err(|err| ConfigInvalidError {
            path: config_dir.join(CONFIG_FILE_NAME),
            help: err.to_string(),
        })?;

    languages
        .iter()
        .map(|lang| {
            config
                .catalogue_path(Some(config_dir), lang)
                .map_err(|err| CliError::Other(err.to_string()))
        })
        .collect()
}

/// Every `.ts` file below `dir`, sorted by path.
pub fn ts_files_in(dir: &Path) -> Result<Vec<PathBuf>, CliError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk {}", dir.display()))?;
        if entry.file_type().is_file()
            && entry.path().extension().is_some_and(|ext| ext == "ts")
        {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}
