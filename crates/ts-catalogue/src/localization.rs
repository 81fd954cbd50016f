use crate::active::ActiveCatalogue;
use crate::source::{CatalogueSource, DirectorySource};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use ts_catalogue_core::fallback::fallback_chain;
use ts_catalogue_core::{Catalogue, LoadOptions, MalformedCatalogue};
use ts_catalogue_toml::{I18nConfig, I18nConfigError};
use unic_langid::LanguageIdentifier;

#[derive(Debug, Error)]
pub enum LocalizationError {
    #[error("Language '{0}' is not supported by any catalogue source")]
    LanguageNotSupported(LanguageIdentifier),
    #[error("Failed to read catalogue: {0}")]
    Source(#[from] std::io::Error),
    #[error("Catalogue file '{file}' is not valid UTF-8")]
    InvalidUtf8 { file: String },
    #[error("Catalogue for '{language}' is malformed: {source}")]
    Malformed {
        language: LanguageIdentifier,
        #[source]
        source: MalformedCatalogue,
    },
    #[error(transparent)]
    Config(#[from] I18nConfigError),
}

/// Picks a catalogue for a language and publishes it to an [`ActiveCatalogue`].
#[derive(bon::Builder)]
pub struct CatalogueManager {
    /// Asked in order; the first one holding a language wins.
    #[builder(field)]
    sources: Vec<Box<dyn CatalogueSource>>,
    #[builder(default)]
    active: ActiveCatalogue,
    /// Tried after the requested language and its primary subtag.
    fallback_language: Option<LanguageIdentifier>,
    #[builder(default)]
    options: LoadOptions,
    /// Held while a new catalogue is published, so it always names the
    /// language of the active catalogue.
    #[builder(skip)]
    selected: Mutex<Option<LanguageIdentifier>>,
}

impl<S: catalogue_manager_builder::State> CatalogueManagerBuilder<S> {
    pub fn source(mut self, source: impl CatalogueSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }
}

impl CatalogueManager {
    /// A manager reading from the assets directory named in `config`.
    pub fn from_config(
        config: &I18nConfig,
        base_dir: Option<&Path>,
    ) -> Result<Self, LocalizationError> {
        Ok(Self::builder()
            .source(DirectorySource::from_config(config, base_dir)?)
            .fallback_language(config.fallback_language_identifier()?)
            .options(config.load_options())
            .build())
    }

    pub fn active(&self) -> &ActiveCatalogue {
        &self.active
    }

    /// The language whose catalogue was last activated.
    pub fn selected_language(&self) -> Option<LanguageIdentifier> {
        self.lock_selected().clone()
    }

    fn lock_selected(&self) -> MutexGuard<'_, Option<LanguageIdentifier>> {
        self.selected.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Every language some source can serve, without duplicates.
    pub fn available_languages(&self) -> Result<Vec<LanguageIdentifier>, LocalizationError> {
        let mut languages = Vec::new();
        for source in &self.sources {
            for lang in source.available_languages()? {
                if !languages.contains(&lang) {
                    languages.push(lang);
                }
            }
        }
        Ok(languages)
    }

    /// Loads the best catalogue for `lang` and makes it active.
    ///
    /// Candidates are tried in fallback order: `lang`, its primary language,
    /// then the configured fallback language. Returns the language actually
    /// activated. When no source has any candidate, or when the chosen file
    /// fails to load, the active catalogue is left unchanged.
    pub fn select_language(
        &self,
        lang: &LanguageIdentifier,
    ) -> Result<LanguageIdentifier, LocalizationError> {
        for candidate in fallback_chain(lang, self.fallback_language.as_ref()) {
            for source in &self.sources {
                let Some(xml) = source.read(&candidate)? else {
                    continue;
                };

                let catalogue = Catalogue::parse_with(&xml, self.options).map_err(|err| {
                    LocalizationError::Malformed {
                        language: candidate.clone(),
                        source: err,
                    }
                })?;

                if &candidate != lang {
                    tracing::debug!("Using '{}' from {} for '{}'", candidate, source.name(), lang);
                }
                let mut selected = self.lock_selected();
                self.active.swap(catalogue);
                *selected = Some(candidate.clone());
                return Ok(candidate);
            }
        }

        tracing::warn!("No catalogue found for '{}'", lang);
        Err(LocalizationError::LanguageNotSupported(lang.clone()))
    }
}

impl std::fmt::Debug for CatalogueManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogueManager")
            .field(
                "sources",
                &self.sources.iter().map(|source| source.name()).collect::<Vec<_>>(),
            )
            .field("fallback_language", &self.fallback_language)
            .field("options", &self.options)
            .field("selected", &self.selected_language())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;
    use tempfile::TempDir;
    use ts_catalogue_core::{Lookup, Translator};
    use unic_langid::langid;

    fn catalogue_xml(language: &str, cancel: &str) -> String {
        format!(
            "<TS version=\"2.1\" language=\"{}\"><context><name>PanelHeader</name>\
             <message><source>Cancel</source><translation>{}</translation></message>\
             </context></TS>",
            language, cancel
        )
    }

    fn assets(files: &[(&str, String)]) -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        for (name, content) in files {
            fs::write(temp_dir.path().join(name), content).unwrap();
        }
        temp_dir
    }

    fn manager(dir: &Path) -> CatalogueManager {
        CatalogueManager::builder()
            .source(DirectorySource::new(dir, "input"))
            .fallback_language(langid!("en"))
            .build()
    }

    fn cancel(manager: &CatalogueManager) -> String {
        manager
            .active()
            .translate(&Lookup::new("PanelHeader", "Cancel"), &[])
    }

    #[rstest]
    #[case::exact("hr-HR", &["hr_HR", "hr"], "hr-HR")]
    #[case::primary_language("hr-BA", &["hr"], "hr")]
    #[case::configured_fallback("fr-FR", &["hr", "en"], "en")]
    fn follows_fallback_chain(
        #[case] requested: &str,
        #[case] available: &[&str],
        #[case] expected: &str,
    ) {
        let dir = TempDir::new().unwrap();
        for lang in available {
            let xml = catalogue_xml(lang, &format!("Odustani ({})", lang));
            fs::write(dir.path().join(format!("input_{}.ts", lang)), xml).unwrap();
        }
        let manager = manager(dir.path());
        let expected: LanguageIdentifier = expected.parse().unwrap();

        let selected = manager.select_language(&requested.parse().unwrap()).unwrap();
        assert_eq!(
            cancel(&manager),
            format!("Odustani ({})", manager.active().load().language().unwrap())
        );
        assert_eq!(manager.selected_language().as_ref(), Some(&selected));
        assert_eq!(selected, expected);
    }

    #[test]
    fn unsupported_language_keeps_active_catalogue() {
        let dir = assets(&[("input_hr.ts", catalogue_xml("hr", "Odustani"))]);
        let manager = CatalogueManager::builder()
            .source(DirectorySource::new(dir.path(), "input"))
            .build();
        manager.select_language(&langid!("hr")).unwrap();

        let err = manager.select_language(&langid!("de")).unwrap_err();
        assert!(matches!(err, LocalizationError::LanguageNotSupported(lang) if lang == langid!("de")));
        assert_eq!(cancel(&manager), "Odustani");
        assert_eq!(manager.selected_language(), Some(langid!("hr")));
    }

    #[test]
    fn malformed_catalogue_keeps_active_catalogue() {
        let dir = assets(&[
            ("input_hr.ts", catalogue_xml("hr", "Odustani")),
            ("input_de.ts", "<TS><context></TS>".to_string()),
        ]);
        let manager = manager(dir.path());
        manager.select_language(&langid!("hr")).unwrap();

        let err = manager.select_language(&langid!("de")).unwrap_err();
        assert!(matches!(err, LocalizationError::Malformed { language, .. } if language == langid!("de")));
        assert_eq!(cancel(&manager), "Odustani");
    }

    #[test]
    fn concurrent_switches_agree_on_the_language() {
        let dir = assets(&[
            ("input_hr.ts", catalogue_xml("hr", "Odustani")),
            ("input_de.ts", catalogue_xml("de", "Abbrechen")),
        ]);
        let manager = manager(dir.path());

        std::thread::scope(|scope| {
            for lang in [langid!("hr"), langid!("de")] {
                let manager = &manager;
                scope.spawn(move || {
                    for _ in 0..50 {
                        manager.select_language(&lang).unwrap();
                    }
                });
            }
        });

        let expected = match manager.selected_language() {
            Some(lang) if lang == langid!("hr") => "Odustani",
            Some(lang) if lang == langid!("de") => "Abbrechen",
            other => panic!("unexpected selection {:?}", other),
        };
        assert_eq!(cancel(&manager), expected);
    }

    #[test]
    fn earlier_sources_win() {
        let first = assets(&[("input_hr.ts", catalogue_xml("hr", "Prvi"))]);
        let second = assets(&[
            ("input_hr.ts", catalogue_xml("hr", "Drugi")),
            ("input_de.ts", catalogue_xml("de", "Abbrechen")),
        ]);
        let manager = CatalogueManager::builder()
            .source(DirectorySource::new(first.path(), "input"))
            .source(DirectorySource::new(second.path(), "input"))
            .build();

        manager.select_language(&langid!("hr")).unwrap();
        assert_eq!(cancel(&manager), "Prvi");
        manager.select_language(&langid!("de")).unwrap();
        assert_eq!(cancel(&manager), "Abbrechen");
        assert_eq!(
            manager.available_languages().unwrap(),
            vec![langid!("hr"), langid!("de")]
        );
    }

    #[test]
    fn from_config_applies_load_options() {
        let dir = assets(&[(
            "app_hr.ts",
            "<TS language=\"hr\"><context><name>PanelHeader</name><message><source>Cancel</source>\
             <translation type=\"unfinished\">Odustani</translation></message></context></TS>"
                .to_string(),
        )]);
        fs::write(
            dir.path().join("i18n.toml"),
            "fallback_language = \"hr\"\nassets_dir = \".\"\ninclude_unfinished = false\n",
        )
        .unwrap();

        let config = I18nConfig::from_manifest_dir(dir.path()).unwrap();
        let manager = CatalogueManager::from_config(&config, Some(dir.path())).unwrap();
        manager.select_language(&langid!("hr-HR")).unwrap();
        assert_eq!(cancel(&manager), "Cancel");
    }
}
