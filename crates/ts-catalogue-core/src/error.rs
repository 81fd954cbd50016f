use thiserror::Error;
use unic_langid::LanguageIdentifierError;

/// A `.ts` document that cannot be turned into a catalogue.
#[derive(Debug, Error)]
pub enum MalformedCatalogue {
    #[error("invalid XML at byte {position}: {message}")]
    Xml { position: u64, message: String },

    #[error("the document has no <TS> root element")]
    MissingRoot,

    #[error("unexpected element <{element}> inside <{parent}> at byte {position}")]
    UnexpectedElement {
        element: String,
        parent: String,
        position: u64,
    },

    #[error("unexpected text inside <{parent}> at byte {position}")]
    UnexpectedText { parent: String, position: u64 },

    #[error("document ended inside <{parent}>")]
    UnexpectedEof { parent: String },

    #[error("<context> without a <name> at byte {position}")]
    MissingContextName { position: u64 },

    #[error("<message> without a <source> in context '{context}' at byte {position}")]
    MissingSource { context: String, position: u64 },

    #[error("invalid value '{value}' for attribute '{attribute}' of <{element}> at byte {position}")]
    InvalidAttribute {
        element: String,
        attribute: String,
        value: String,
        position: u64,
    },

    #[error("unexpected attribute '{attribute}' on <{element}> at byte {position}")]
    UnexpectedAttribute {
        element: String,
        attribute: String,
        position: u64,
    },

    #[error("invalid language identifier '{value}'")]
    InvalidLanguage {
        value: String,
        #[source]
        source: LanguageIdentifierError,
    },

    #[error("context '{name}' is defined more than once")]
    DuplicateContext { name: String },

    #[error(
        "ambiguous plural variants for '{source_text}' in context '{context}': \
         {found} variants but locale '{locale}' has {categories} plural categories"
    )]
    AmbiguousPluralForms {
        context: String,
        source_text: String,
        found: usize,
        categories: usize,
        locale: String,
    },

    #[error(
        "'{source_text}' in context '{context}' mixes numerus and plain messages under one key"
    )]
    MixedPluralForms {
        context: String,
        source_text: String,
    },
}

impl MalformedCatalogue {
    /// Byte offset into the document, when the error is tied to one.
    pub fn position(&self) -> Option<u64> {
        match self {
            Self::Xml { position, .. }
            | Self::UnexpectedElement { position, .. }
            | Self::UnexpectedText { position, .. }
            | Self::MissingContextName { position }
            | Self::MissingSource { position, .. }
            | Self::InvalidAttribute { position, .. }
            | Self::UnexpectedAttribute { position, .. } => Some(*position),
            Self::MissingRoot
            | Self::UnexpectedEof { .. }
            | Self::InvalidLanguage { .. }
            | Self::DuplicateContext { .. }
            | Self::AmbiguousPluralForms { .. }
            | Self::MixedPluralForms { .. } => None,
        }
    }
}

/// Why a lookup found nothing. Never fatal: callers render the source text.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("context '{context}' not found")]
    ContextNotFound { context: String },

    #[error("message '{source_text}' not found in context '{context}'")]
    MessageNotFound {
        context: String,
        source_text: String,
    },
}

#[derive(Debug, Error)]
#[error("failed to serialize catalogue: {0}")]
pub struct SerializeError(#[from] pub quick_xml::Error);
