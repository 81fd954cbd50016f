use crate::error::{MalformedCatalogue, SerializeError};
use crate::model::{Attribute, Context, Extra, TranslationBody};
use crate::plural::PluralRule;
use crate::{parse, write};
use rustc_hash::FxHashMap;
use std::str::FromStr;
use unic_langid::LanguageIdentifier;

/// Knobs applied while loading a catalogue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadOptions {
    /// Whether non-empty `type="unfinished"` translations are shown.
    pub include_unfinished: bool,
    /// Accept `<message>` elements without `<source>`, reading them as an
    /// empty source text.
    pub allow_missing_source: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            include_unfinished: true,
            allow_missing_source: false,
        }
    }
}

/// An immutable, indexed set of contexts for one locale.
#[derive(Clone, Debug)]
pub struct Catalogue {
    version: Option<String>,
    source_language: Option<String>,
    language: Option<String>,
    attributes: Vec<Attribute>,
    locale: LanguageIdentifier,
    plural_rule: PluralRule,
    contexts: Vec<Context>,
    extra: Vec<Extra>,
    options: LoadOptions,
    index: CatalogueIndex,
    /// XML comments seen while parsing; they are not part of the model.
    pub(crate) comments: usize,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct CatalogueIndex {
    pub(crate) contexts: FxHashMap<String, ContextIndex>,
}

#[derive(Clone, Debug)]
pub(crate) struct ContextIndex {
    pub(crate) position: usize,
    /// Source text to the positions of active messages, in document order.
    pub(crate) entries: FxHashMap<String, Vec<usize>>,
}

#[bon::bon]
impl Catalogue {
    /// Validates and indexes a set of contexts.
    #[builder]
    pub fn new(
        #[builder(into)] language: Option<String>,
        #[builder(into)] version: Option<String>,
        #[builder(into)] source_language: Option<String>,
        // Further attributes of `<TS>`.
        #[builder(default)] attributes: Vec<Attribute>,
        #[builder(default)] contexts: Vec<Context>,
        #[builder(default)] extra: Vec<Extra>,
        #[builder(default)] options: LoadOptions,
    ) -> Result<Self, MalformedCatalogue> {
        let locale = match language.as_deref().map(str::trim) {
            None | Some("") => LanguageIdentifier::default(),
            Some(value) => value.parse::<LanguageIdentifier>().map_err(|source| {
                MalformedCatalogue::InvalidLanguage {
                    value: value.to_string(),
                    source,
                }
            })?,
        };
        let plural_rule = PluralRule::for_language(&locale);
        let index = build_index(&contexts, plural_rule, &locale)?;

        Ok(Self {
            version,
            source_language,
            language,
            attributes,
            locale,
            plural_rule,
            contexts,
            extra,
            options,
            index,
            comments: 0,
        })
    }
}

impl Catalogue {
    /// Parses a `.ts` document.
    pub fn parse_with(xml: &str, options: LoadOptions) -> Result<Self, MalformedCatalogue> {
        parse::parse(xml, options)
    }

    /// Writes the catalogue back out as a `.ts` document.
    pub fn to_xml(&self) -> Result<String, SerializeError> {
        Ok(write::write(self)?)
    }

    /// The raw `language` attribute, e.g. `hr_HR`.
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn locale(&self) -> &LanguageIdentifier {
        &self.locale
    }

    pub fn plural_rule(&self) -> PluralRule {
        self.plural_rule
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn source_language(&self) -> Option<&str> {
        self.source_language.as_deref()
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Number of XML comments in the parsed document. [`Catalogue::to_xml`]
    /// does not write them back.
    pub fn discarded_comments(&self) -> usize {
        self.comments
    }

    pub fn contexts(&self) -> &[Context] {
        &self.contexts
    }

    pub fn context(&self, name: &str) -> Option<&Context> {
        self.index
            .contexts
            .get(name)
            .map(|entry| &self.contexts[entry.position])
    }

    pub fn extra(&self) -> &[Extra] {
        &self.extra
    }

    pub fn options(&self) -> LoadOptions {
        self.options
    }

    pub fn message_count(&self) -> usize {
        self.contexts.iter().map(|context| context.messages.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.iter().all(|context| context.messages.is_empty())
    }

    pub(crate) fn index(&self) -> &CatalogueIndex {
        &self.index
    }
}

impl Default for Catalogue {
    /// A catalogue with no contexts: every lookup falls back to source text.
    fn default() -> Self {
        Self {
            version: None,
            source_language: None,
            language: None,
            attributes: Vec::new(),
            locale: LanguageIdentifier::default(),
            plural_rule: PluralRule::default(),
            contexts: Vec::new(),
            extra: Vec::new(),
            options: LoadOptions::default(),
            index: CatalogueIndex::default(),
            comments: 0,
        }
    }
}

impl PartialEq for Catalogue {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version
            && self.source_language == other.source_language
            && self.language == other.language
            && self.attributes == other.attributes
            && self.contexts == other.contexts
            && self.extra == other.extra
    }
}

impl Eq for Catalogue {}

impl FromStr for Catalogue {
    type Err = MalformedCatalogue;

    fn from_str(xml: &str) -> Result<Self, Self::Err> {
        Self::parse_with(xml, LoadOptions::default())
    }
}

fn build_index(
    contexts: &[Context],
    rule: PluralRule,
    locale: &LanguageIdentifier,
) -> Result<CatalogueIndex, MalformedCatalogue> {
    let mut index = CatalogueIndex::default();

    for (position, context) in contexts.iter().enumerate() {
        let mut entries: FxHashMap<String, Vec<usize>> = FxHashMap::default();
        for (slot, message) in context.messages.iter().enumerate() {
            if message.is_active() {
                entries.entry(message.source.clone()).or_default().push(slot);
            }
        }

        check_plural_groups(context, &entries, rule, locale)?;

        let previous = index
            .contexts
            .insert(context.name.clone(), ContextIndex { position, entries });
        if previous.is_some() {
            return Err(MalformedCatalogue::DuplicateContext {
                name: context.name.clone(),
            });
        }
    }

    Ok(index)
}

/// Messages sharing a key are positional plural variants, so there can be no
/// more of them than the locale has categories.
fn check_plural_groups(
    context: &Context,
    entries: &FxHashMap<String, Vec<usize>>,
    rule: PluralRule,
    locale: &LanguageIdentifier,
) -> Result<(), MalformedCatalogue> {
    let categories = rule.form_count();
    let ambiguous = |source: &str, found: usize| MalformedCatalogue::AmbiguousPluralForms {
        context: context.name.clone(),
        source_text: source.to_string(),
        found,
        categories,
        locale: locale.to_string(),
    };

    for (slot, message) in context.messages.iter().enumerate() {
        let Some(slots) = entries.get(&message.source) else {
            continue;
        };
        let group: Vec<usize> = slots
            .iter()
            .copied()
            .filter(|other| context.messages[*other].disambiguation == message.disambiguation)
            .collect();
        if group.first() != Some(&slot) {
            continue;
        }

        if let [single] = group.as_slice() {
            let forms = context.messages[*single].translation.forms().len();
            if forms > categories {
                return Err(ambiguous(&message.source, forms));
            }
            continue;
        }

        let has_numerus = group.iter().any(|other| {
            matches!(
                context.messages[*other].translation.body,
                TranslationBody::Numerus(_)
            )
        });
        if has_numerus {
            return Err(MalformedCatalogue::MixedPluralForms {
                context: context.name.clone(),
                source_text: message.source.clone(),
            });
        }
        if group.len() > categories {
            return Err(ambiguous(&message.source, group.len()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Message, TranslationState};

    fn panel_header() -> Context {
        Context::new("PanelHeader").with_message(Message::new("Cancel", "Odustani"))
    }

    #[test]
    fn builds_with_parsed_locale() {
        let catalogue = Catalogue::builder()
            .language("hr_HR")
            .version("2.1")
            .contexts(vec![panel_header()])
            .build()
            .unwrap();

        assert_eq!(catalogue.language(), Some("hr_HR"));
        assert_eq!(catalogue.locale().to_string(), "hr-HR");
        assert_eq!(catalogue.plural_rule(), PluralRule::CroatianSerbian);
        assert_eq!(catalogue.message_count(), 1);
        assert!(catalogue.context("PanelHeader").is_some());
        assert!(catalogue.context("Missing").is_none());
    }

    #[test]
    fn missing_language_is_undetermined() {
        let catalogue = Catalogue::builder().build().unwrap();
        assert_eq!(catalogue.locale(), &LanguageIdentifier::default());
        assert!(catalogue.is_empty());
    }

    #[test]
    fn rejects_invalid_language() {
        let err = Catalogue::builder().language("not a language").build().unwrap_err();
        assert!(matches!(err, MalformedCatalogue::InvalidLanguage { .. }));
    }

    #[test]
    fn rejects_duplicate_context() {
        let err = Catalogue::builder()
            .contexts(vec![panel_header(), panel_header()])
            .build()
            .unwrap_err();
        assert!(matches!(err, MalformedCatalogue::DuplicateContext { name } if name == "PanelHeader"));
    }

    #[test]
    fn allows_duplicates_up_to_category_count() {
        let context = Context::new("InputUtils")
            .with_message(Message::new("%1 day ago", "prije %1 dan"))
            .with_message(Message::new("%1 day ago", "prije %1 dana"))
            .with_message(Message::new("%1 day ago", "prije %1 dana"));
        assert!(
            Catalogue::builder()
                .language("hr_HR")
                .contexts(vec![context])
                .build()
                .is_ok()
        );
    }

    #[test]
    fn rejects_more_duplicates_than_categories() {
        let context = Context::new("InputUtils")
            .with_message(Message::new("%1 day ago", "a"))
            .with_message(Message::new("%1 day ago", "b"))
            .with_message(Message::new("%1 day ago", "c"));
        let err = Catalogue::builder()
            .language("en")
            .contexts(vec![context])
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            MalformedCatalogue::AmbiguousPluralForms {
                found: 3,
                categories: 2,
                ..
            }
        ));
    }

    #[test]
    fn disambiguation_separates_groups() {
        let context = Context::new("Ctx")
            .with_message(Message::new("Open", "Otvori"))
            .with_message(Message::new("Open", "Otvoreno").with_disambiguation("state"));
        let catalogue = Catalogue::builder()
            .language("ja")
            .contexts(vec![context])
            .build();
        assert!(catalogue.is_ok());
    }

    #[test]
    fn obsolete_duplicates_do_not_count() {
        let context = Context::new("Ctx")
            .with_message(Message::new("Open", "Otvori"))
            .with_message(Message::new("Open", "Staro").with_state(TranslationState::Obsolete));
        assert!(
            Catalogue::builder()
                .language("ja")
                .contexts(vec![context])
                .build()
                .is_ok()
        );
    }

    #[test]
    fn rejects_numerus_duplicates() {
        let context = Context::new("Ctx")
            .with_message(Message::numerus("%n files", ["%n datoteka"]))
            .with_message(Message::new("%n files", "%n datoteke"));
        let err = Catalogue::builder()
            .language("hr")
            .contexts(vec![context])
            .build()
            .unwrap_err();
        assert!(matches!(err, MalformedCatalogue::MixedPluralForms { .. }));
    }

    #[test]
    fn rejects_too_many_numerus_forms() {
        let context =
            Context::new("Ctx").with_message(Message::numerus("%n files", ["a", "b", "c"]));
        let err = Catalogue::builder()
            .language("de")
            .contexts(vec![context])
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            MalformedCatalogue::AmbiguousPluralForms { found: 3, .. }
        ));
    }

    #[test]
    fn equality_ignores_options() {
        let strict = Catalogue::builder()
            .contexts(vec![panel_header()])
            .options(LoadOptions {
                include_unfinished: false,
                ..Default::default()
            })
            .build()
            .unwrap();
        let lenient = Catalogue::builder()
            .contexts(vec![panel_header()])
            .build()
            .unwrap();
        assert_eq!(strict, lenient);
    }
}
