#![doc = include_str!("../README.md")]

mod catalogue;
mod coverage;
mod error;
pub mod fallback;
mod lookup;
pub mod model;
mod parse;
pub mod placeholder;
pub mod plural;
mod validate;
mod write;

pub use catalogue::{Catalogue, LoadOptions};
pub use coverage::{ContextCoverage, Coverage};
pub use error::{LookupError, MalformedCatalogue, SerializeError};
pub use lookup::{Lookup, Translator};
pub use model::{Attribute, Context, Extra, Location, Message, Translation, TranslationBody, TranslationState};
pub use placeholder::{PlaceholderMismatch, Rendered, render};
pub use plural::{PluralCategory, PluralRule};
pub use validate::{LocatedIssue, PlaceholderIssue, check_placeholders};

#[doc(hidden)]
pub use unic_langid;
