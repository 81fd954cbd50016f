//! Contexts, messages and their translations.

use std::fmt;
use std::str::FromStr;

/// A named group of messages, one per UI component.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Context {
    pub name: String,
    pub comment: Option<String>,
    pub messages: Vec<Message>,
    pub attributes: Vec<Attribute>,
}

impl Context {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }
}

/// A single translatable unit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Message {
    pub id: Option<String>,
    /// Set by `numerus="yes"`; the translation then carries one form per
    /// plural category.
    pub numerus: bool,
    pub locations: Vec<Location>,
    pub source: String,
    pub old_source: Option<String>,
    /// Serialized as `<comment>`.
    pub disambiguation: Option<String>,
    pub old_disambiguation: Option<String>,
    pub extra_comment: Option<String>,
    pub translator_comment: Option<String>,
    pub translation: Translation,
    pub extra: Vec<Extra>,
    /// Attributes other than `id` and `numerus`, such as `utf8`.
    pub attributes: Vec<Attribute>,
}

impl Message {
    /// A finished translation of `source`.
    pub fn new(source: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            translation: Translation::text(translation),
            ..Default::default()
        }
    }

    /// A plural message with one translated form per category.
    pub fn numerus<I, S>(source: impl Into<String>, forms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            numerus: true,
            source: source.into(),
            translation: Translation {
                state: TranslationState::Finished,
                body: TranslationBody::Numerus(forms.into_iter().map(Into::into).collect()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn with_disambiguation(mut self, disambiguation: impl Into<String>) -> Self {
        self.disambiguation = Some(disambiguation.into());
        self
    }

    pub fn with_state(mut self, state: TranslationState) -> Self {
        self.translation.state = state;
        self
    }

    pub fn with_location(mut self, filename: impl Into<String>, line: u32) -> Self {
        self.locations.push(Location {
            filename: Some(filename.into()),
            line: Some(line.to_string()),
            ..Default::default()
        });
        self
    }

    /// Vanished and obsolete messages are kept for round-tripping only.
    pub fn is_active(&self) -> bool {
        self.translation.state.is_active()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Translation {
    pub state: TranslationState,
    pub body: TranslationBody,
    pub attributes: Vec<Attribute>,
}

impl Translation {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            state: TranslationState::Finished,
            body: TranslationBody::Text(text.into()),
            ..Default::default()
        }
    }

    /// Every translated form, in order. A plain translation has one.
    ///
    /// A form with length variants holds all of them, separated by
    /// [`LENGTH_VARIANT_SEPARATOR`].
    pub fn forms(&self) -> &[String] {
        match &self.body {
            TranslationBody::Text(text) => std::slice::from_ref(text),
            TranslationBody::Numerus(forms) => forms,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.forms().iter().all(String::is_empty)
    }
}

/// Joins the `<lengthvariant>` alternatives of one form, longest first.
pub const LENGTH_VARIANT_SEPARATOR: char = '\u{9c}';

/// The first length variant of `form`, or the whole form when it has none.
pub fn primary_variant(form: &str) -> &str {
    form.split(LENGTH_VARIANT_SEPARATOR)
        .next()
        .unwrap_or(form)
}

/// The alternatives of `form`, when it has more than one.
pub fn length_variants(form: &str) -> Option<std::str::Split<'_, char>> {
    form.contains(LENGTH_VARIANT_SEPARATOR)
        .then(|| form.split(LENGTH_VARIANT_SEPARATOR))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TranslationBody {
    Text(String),
    Numerus(Vec<String>),
}

impl Default for TranslationBody {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

/// The `type` attribute of `<translation>`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TranslationState {
    /// No `type` attribute.
    #[default]
    Finished,
    Unfinished,
    Vanished,
    Obsolete,
}

impl TranslationState {
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Finished | Self::Unfinished)
    }

    /// The attribute value, `None` for finished translations.
    pub const fn attribute(self) -> Option<&'static str> {
        match self {
            Self::Finished => None,
            Self::Unfinished => Some("unfinished"),
            Self::Vanished => Some("vanished"),
            Self::Obsolete => Some("obsolete"),
        }
    }
}

impl fmt::Display for TranslationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.attribute().unwrap_or("finished"))
    }
}

impl FromStr for TranslationState {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unfinished" => Ok(Self::Unfinished),
            "vanished" => Ok(Self::Vanished),
            "obsolete" => Ok(Self::Obsolete),
            _ => Err(()),
        }
    }
}

/// Where a message came from. Values are kept verbatim and never interpreted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Location {
    pub filename: Option<String>,
    pub line: Option<String>,
    pub attributes: Vec<Attribute>,
}

/// An attribute the model has no field for, written back unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// An `extra-*` element, preserved verbatim.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Extra {
    pub name: String,
    pub content: String,
}
