//! Where catalogue documents come from.

use crate::localization::LocalizationError;
use fs_err as fs;
use rust_embed::RustEmbed;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use ts_catalogue_toml::{I18nConfig, catalogue_file_name, discover_language};
use unic_langid::LanguageIdentifier;

/// A provider of raw `.ts` documents, keyed by language.
pub trait CatalogueSource: Send + Sync {
    /// Used in logs.
    fn name(&self) -> String;

    /// The document for `lang`, or `None` when this source has none.
    fn read(&self, lang: &LanguageIdentifier) -> Result<Option<String>, LocalizationError>;

    fn available_languages(&self) -> Result<Vec<LanguageIdentifier>, LocalizationError>;
}

/// Reads `{dir}/{domain}_{lang}.ts` from disk on every selection.
#[derive(Clone, Debug)]
pub struct DirectorySource {
    dir: PathBuf,
    domain: String,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>, domain: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            domain: domain.into(),
        }
    }

    /// The assets directory of `config`, resolved against `base_dir` or
    /// `CARGO_MANIFEST_DIR` when none is given.
    pub fn from_config(
        config: &I18nConfig,
        base_dir: Option<&Path>,
    ) -> Result<Self, LocalizationError> {
        Ok(Self::new(
            config.assets_dir_from_base(base_dir)?,
            config.domain.clone(),
        ))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl CatalogueSource for DirectorySource {
    fn name(&self) -> String {
        self.dir.display().to_string()
    }

    fn read(&self, lang: &LanguageIdentifier) -> Result<Option<String>, LocalizationError> {
        let path = self.dir.join(catalogue_file_name(&self.domain, lang));
        if !path.is_file() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&path)?))
    }

    fn available_languages(&self) -> Result<Vec<LanguageIdentifier>, LocalizationError> {
        let mut languages = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if let Ok(file_name) = entry.file_name().into_string()
                && let Some(lang) = discover_language(&self.domain, &file_name)
            {
                languages.push(lang);
            }
        }
        languages.sort_by_key(|lang| lang.to_string());
        Ok(languages)
    }
}

/// Serves catalogues compiled into the binary with `rust-embed`, using the
/// same `{domain}_{lang}.ts` naming as [`DirectorySource`].
pub struct EmbeddedSource<T: RustEmbed> {
    domain: String,
    _assets: PhantomData<fn() -> T>,
}

impl<T: RustEmbed> EmbeddedSource<T> {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            _assets: PhantomData,
        }
    }
}

impl<T: RustEmbed> std::fmt::Debug for EmbeddedSource<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddedSource")
            .field("domain", &self.domain)
            .finish()
    }
}

impl<T: RustEmbed> CatalogueSource for EmbeddedSource<T> {
    fn name(&self) -> String {
        format!("embedded:{}", self.domain)
    }

    fn read(&self, lang: &LanguageIdentifier) -> Result<Option<String>, LocalizationError> {
        let file_name = catalogue_file_name(&self.domain, lang);
        let Some(file) = T::get(&file_name) else {
            return Ok(None);
        };
        let content = String::from_utf8(file.data.into_owned())
            .map_err(|_| LocalizationError::InvalidUtf8 { file: file_name })?;
        Ok(Some(content))
    }

    fn available_languages(&self) -> Result<Vec<LanguageIdentifier>, LocalizationError> {
        let mut languages = Vec::new();
        for file_name in T::iter() {
            if let Some(lang) = discover_language(&self.domain, &file_name) {
                languages.push(lang);
            }
        }
        languages.sort_by_key(|lang| lang.to_string());
        Ok(languages)
    }
}
