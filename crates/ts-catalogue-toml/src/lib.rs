#![doc = include_str!("../README.md")]

use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use ts_catalogue_core::LoadOptions;
use unic_langid::{LanguageIdentifier, LanguageIdentifierError};

pub const CONFIG_FILE_NAME: &str = "i18n.toml";

#[derive(Debug, Error)]
pub enum I18nConfigError {
    /// Configuration file not found.
    #[error("i18n.toml configuration file not found")]
    NotFound,
    /// Failed to read configuration file or assets directory.
    #[error("Failed to read configuration: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse configuration file.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),
    /// A catalogue file name carries an invalid language identifier.
    #[error("Invalid language identifier '{name}' in catalogue file name")]
    InvalidLanguageIdentifier {
        name: String,
        #[source]
        source: LanguageIdentifierError,
    },
    #[error("Language identifier '{name}' is not supported: {reason}")]
    UnsupportedLanguageIdentifier { name: String, reason: String },
    #[error("Invalid fallback language identifier '{name}'")]
    InvalidFallbackLanguageIdentifier {
        name: String,
        #[source]
        source: LanguageIdentifierError,
    },
    /// The domain is used as a file name prefix.
    #[error("Invalid domain '{domain}': must be non-empty and contain no path separators")]
    InvalidDomain { domain: String },
}

/// The configuration for `ts-catalogue`.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct I18nConfig {
    /// The language used when nothing better is available (e.g. "en").
    pub fallback_language: String,
    /// Directory holding the catalogues, relative to the manifest directory.
    /// Expected structure: {assets_dir}/{domain}_{language}.ts
    pub assets_dir: PathBuf,
    /// File name prefix shared by every catalogue.
    #[serde(default = "default_domain")]
    pub domain: String,
    /// Whether `type="unfinished"` translations are shown.
    #[serde(default = "default_include_unfinished")]
    pub include_unfinished: bool,
    #[serde(default)]
    pub allow_missing_source: bool,
}

fn default_domain() -> String {
    "app".to_string()
}

fn default_include_unfinished() -> bool {
    true
}

impl I18nConfig {
    pub fn new(fallback_language: impl Into<String>, assets_dir: impl Into<PathBuf>) -> Self {
        Self {
            fallback_language: fallback_language.into(),
            assets_dir: assets_dir.into(),
            domain: default_domain(),
            include_unfinished: default_include_unfinished(),
            allow_missing_source: false,
        }
    }

    /// Reads and validates the configuration from a path.
    pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self, I18nConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(I18nConfigError::NotFound);
        }

        let content = fs::read_to_string(path)?;
        let config: I18nConfig = toml::from_str(&content)?;
        config.validate()?;

        Ok(config)
    }

    /// Reads the configuration from `CARGO_MANIFEST_DIR`.
    pub fn read_from_manifest_dir() -> Result<Self, I18nConfigError> {
        Self::from_manifest_dir(&manifest_dir()?)
    }

    /// Reads `i18n.toml` inside `manifest_dir`.
    pub fn from_manifest_dir(manifest_dir: &Path) -> Result<Self, I18nConfigError> {
        Self::read_from_path(manifest_dir.join(CONFIG_FILE_NAME))
    }

    pub fn validate(&self) -> Result<(), I18nConfigError> {
        if self.domain.is_empty() || self.domain.contains(['/', '\\']) {
            return Err(I18nConfigError::InvalidDomain {
                domain: self.domain.clone(),
            });
        }
        self.fallback_language_identifier()?;
        Ok(())
    }

    /// Returns the assets directory joined onto a base directory.
    /// If `base_dir` is `None`, uses the `CARGO_MANIFEST_DIR` environment variable.
    pub fn assets_dir_from_base(
        &self,
        base_dir: Option<&Path>,
    ) -> Result<PathBuf, I18nConfigError> {
        let base = match base_dir {
            Some(dir) => dir.to_path_buf(),
            None => manifest_dir()?,
        };

        Ok(base.join(&self.assets_dir))
    }

    /// Parses the fallback language. Qt-style underscores are accepted.
    pub fn fallback_language_identifier(&self) -> Result<LanguageIdentifier, I18nConfigError> {
        let lang = self
            .fallback_language
            .parse::<LanguageIdentifier>()
            .map_err(
                |source| I18nConfigError::InvalidFallbackLanguageIdentifier {
                    name: self.fallback_language.clone(),
                    source,
                },
            )?;

        ensure_supported_language_identifier(&lang, &self.fallback_language)?;

        Ok(lang)
    }

    /// The file name of the catalogue for `lang`, e.g. `input_hr_HR.ts`.
    pub fn catalogue_file_name(&self, lang: &LanguageIdentifier) -> String {
        catalogue_file_name(&self.domain, lang)
    }

    /// The path of the catalogue for `lang` under the assets directory.
    pub fn catalogue_path(
        &self,
        base_dir: Option<&Path>,
        lang: &LanguageIdentifier,
    ) -> Result<PathBuf, I18nConfigError> {
        Ok(self
            .assets_dir_from_base(base_dir)?
            .join(self.catalogue_file_name(lang)))
    }

    /// Extracts the language from a catalogue file name of this domain.
    pub fn language_of_file_name(
        &self,
        file_name: &str,
    ) -> Result<Option<LanguageIdentifier>, I18nConfigError> {
        language_of_file_name(&self.domain, file_name)
    }

    /// Returns the languages that have a catalogue under the assets directory,
    /// sorted by their BCP-47 form.
    /// If `base_dir` is `None`, uses the `CARGO_MANIFEST_DIR` environment variable.
    pub fn available_languages_from_base(
        &self,
        base_dir: Option<&Path>,
    ) -> Result<Vec<LanguageIdentifier>, I18nConfigError> {
        let assets_path = self.assets_dir_from_base(base_dir)?;
        let mut languages = Vec::new();

        for entry in fs::read_dir(&assets_path)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let Ok(file_name) = entry.file_name().into_string() else {
                continue;
            };
            if let Some(lang) = discover_language(&self.domain, &file_name) {
                languages.push((lang.to_string(), lang));
            }
        }

        languages.sort_by(|a, b| a.0.cmp(&b.0));
        languages.dedup_by(|a, b| a.0 == b.0);

        Ok(languages.into_iter().map(|(_, lang)| lang).collect())
    }

    /// The load policy this configuration asks for.
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            include_unfinished: self.include_unfinished,
            allow_missing_source: self.allow_missing_source,
        }
    }
}

/// `{domain}_{lang}.ts`, with the language subtags joined by underscores.
pub fn catalogue_file_name(domain: &str, lang: &LanguageIdentifier) -> String {
    format!("{}_{}.ts", domain, lang.to_string().replace('-', "_"))
}

/// Extracts the language from a `{domain}_{lang}.ts` file name.
///
/// Returns `Ok(None)` for files that belong to another domain or are not
/// `.ts` files.
pub fn language_of_file_name(
    domain: &str,
    file_name: &str,
) -> Result<Option<LanguageIdentifier>, I18nConfigError> {
    let Some(name) = file_name
        .strip_suffix(".ts")
        .and_then(|stem| stem.strip_prefix(domain))
        .and_then(|rest| rest.strip_prefix('_'))
    else {
        return Ok(None);
    };

    let lang = name.parse::<LanguageIdentifier>().map_err(|source| {
        I18nConfigError::InvalidLanguageIdentifier {
            name: name.to_string(),
            source,
        }
    })?;
    ensure_supported_language_identifier(&lang, name)?;

    Ok(Some(lang))
}

/// Like [`language_of_file_name`], for directory scans: a file of the domain
/// whose name does not carry a usable language is skipped, not an error.
pub fn discover_language(domain: &str, file_name: &str) -> Option<LanguageIdentifier> {
    match language_of_file_name(domain, file_name) {
        Ok(lang) => lang,
        Err(err) => {
            tracing::debug!("Skipping '{}': {}", file_name, err);
            None
        },
    }
}

fn manifest_dir() -> Result<PathBuf, I18nConfigError> {
    env::var("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)
        .map_err(|_| I18nConfigError::NotFound)
}

fn ensure_supported_language_identifier(
    lang: &LanguageIdentifier,
    original: &str,
) -> Result<(), I18nConfigError> {
    if lang.variants().next().is_some() {
        return Err(I18nConfigError::UnsupportedLanguageIdentifier {
            name: original.to_string(),
            reason: "variants are not supported".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;
    use unic_langid::langid;

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join(CONFIG_FILE_NAME);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_read_from_path_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(
            temp_dir.path(),
            r#"
fallback_language = "en"
assets_dir = "i18n"
"#,
        );

        let config = I18nConfig::read_from_path(&path).unwrap();
        assert_eq!(config, I18nConfig::new("en", "i18n"));
        assert_eq!(config.domain, "app");
        assert!(config.include_unfinished);
        assert!(!config.allow_missing_source);
    }

    #[test]
    fn test_read_from_path_all_fields() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(
            temp_dir.path(),
            r#"
fallback_language = "en_GB"
assets_dir = "app/i18n"
domain = "input"
include_unfinished = false
allow_missing_source = true
"#,
        );

        let config = I18nConfig::read_from_path(&path).unwrap();
        assert_eq!(config.domain, "input");
        assert_eq!(config.assets_dir, PathBuf::from("app/i18n"));
        assert_eq!(
            config.load_options(),
            LoadOptions {
                include_unfinished: false,
                allow_missing_source: true,
            }
        );
        assert_eq!(
            config.fallback_language_identifier().unwrap(),
            langid!("en-GB")
        );
    }

    #[test]
    fn test_read_from_path_file_not_found() {
        let result = I18nConfig::read_from_path("/non/existent/path/i18n.toml");
        assert!(matches!(result, Err(I18nConfigError::NotFound)));
    }

    #[test]
    fn test_read_from_path_missing_field() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(temp_dir.path(), "fallback_language = \"en\"\n");

        let result = I18nConfig::read_from_path(&path);
        assert!(matches!(result, Err(I18nConfigError::ParseError(_))));
    }

    #[test]
    fn test_read_from_path_rejects_bad_fallback() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(
            temp_dir.path(),
            "fallback_language = \"invalid-lang!\"\nassets_dir = \"i18n\"\n",
        );

        assert!(matches!(
            I18nConfig::read_from_path(&path),
            Err(I18nConfigError::InvalidFallbackLanguageIdentifier { name, .. })
                if name == "invalid-lang!"
        ));
    }

    #[rstest]
    #[case("")]
    #[case("nested/app")]
    fn test_invalid_domain(#[case] domain: &str) {
        let config = I18nConfig {
            domain: domain.to_string(),
            ..I18nConfig::new("en", "i18n")
        };
        assert!(matches!(
            config.validate(),
            Err(I18nConfigError::InvalidDomain { .. })
        ));
    }

    #[test]
    #[serial]
    fn test_read_from_manifest_dir() {
        let temp_dir = TempDir::new().unwrap();
        write_config(
            temp_dir.path(),
            "fallback_language = \"hr\"\nassets_dir = \"i18n\"\n",
        );

        let config = temp_env::with_var("CARGO_MANIFEST_DIR", Some(temp_dir.path()), || {
            I18nConfig::read_from_manifest_dir()
        })
        .unwrap();
        assert_eq!(config.fallback_language, "hr");

        let assets = temp_env::with_var("CARGO_MANIFEST_DIR", Some(temp_dir.path()), || {
            config.assets_dir_from_base(None)
        })
        .unwrap();
        assert_eq!(assets, temp_dir.path().join("i18n"));
    }

    #[test]
    #[serial]
    fn test_manifest_dir_unset() {
        let result = temp_env::with_var_unset("CARGO_MANIFEST_DIR", I18nConfig::read_from_manifest_dir);
        assert!(matches!(result, Err(I18nConfigError::NotFound)));
    }

    #[rstest]
    #[case(langid!("hr-HR"), "input_hr_HR.ts")]
    #[case(langid!("en"), "input_en.ts")]
    #[case(langid!("zh-Hans-CN"), "input_zh_Hans_CN.ts")]
    fn test_catalogue_file_name(#[case] lang: LanguageIdentifier, #[case] expected: &str) {
        let config = I18nConfig {
            domain: "input".to_string(),
            ..I18nConfig::new("en", "i18n")
        };
        assert_eq!(config.catalogue_file_name(&lang), expected);
        assert_eq!(config.language_of_file_name(expected).unwrap(), Some(lang));
    }

    #[rstest]
    #[case("other_hr_HR.ts")]
    #[case("input_hr_HR.qm")]
    #[case("inputhr.ts")]
    #[case("README.txt")]
    fn test_foreign_file_names_are_skipped(#[case] file_name: &str) {
        let config = I18nConfig {
            domain: "input".to_string(),
            ..I18nConfig::new("en", "i18n")
        };
        assert_eq!(config.language_of_file_name(file_name).unwrap(), None);
    }

    #[test]
    fn test_available_languages_collects_catalogues() {
        let temp_dir = TempDir::new().unwrap();
        let assets = temp_dir.path().join("i18n");
        fs::create_dir(&assets).unwrap();
        for name in ["input_hr_HR.ts", "input_en.ts", "input_de.ts", "input_hr_HR.qm"] {
            fs::write(assets.join(name), "<TS/>").unwrap();
        }
        fs::write(assets.join("other_fr.ts"), "<TS/>").unwrap();
        fs::create_dir(assets.join("input_it.ts")).unwrap();

        let config = I18nConfig {
            domain: "input".to_string(),
            ..I18nConfig::new("en", "i18n")
        };
        let codes: Vec<String> = config
            .available_languages_from_base(Some(temp_dir.path()))
            .unwrap()
            .into_iter()
            .map(|lang| lang.to_string())
            .collect();

        assert_eq!(codes, vec!["de", "en", "hr-HR"]);
    }

    #[test]
    fn test_available_languages_skips_bad_names() {
        let temp_dir = TempDir::new().unwrap();
        let assets = temp_dir.path().join("i18n");
        fs::create_dir(&assets).unwrap();
        for name in ["app_hr_HR.ts", "app_hr_HR_old.ts", "app_not-a-language!.ts"] {
            fs::write(assets.join(name), "<TS/>").unwrap();
        }

        let languages = I18nConfig::new("en", "i18n")
            .available_languages_from_base(Some(temp_dir.path()))
            .unwrap();
        assert_eq!(languages, vec![langid!("hr-HR")]);
    }

    #[test]
    fn test_bad_name_is_an_error_for_single_files() {
        assert!(matches!(
            language_of_file_name("app", "app_hr_HR_old.ts"),
            Err(I18nConfigError::InvalidLanguageIdentifier { name, .. }) if name == "hr_HR_old"
        ));
        assert_eq!(discover_language("app", "app_hr_HR_old.ts"), None);
    }

    #[test]
    fn test_catalogue_path() {
        let config = I18nConfig::new("en", "i18n");
        let path = config
            .catalogue_path(Some(Path::new("/project")), &langid!("hr-HR"))
            .unwrap();
        assert_eq!(path, PathBuf::from("/project/i18n/app_hr_HR.ts"));
    }
}
