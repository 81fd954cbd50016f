#![doc = include_str!("../README.md")]

mod active;
mod localization;
mod source;

pub use active::ActiveCatalogue;
pub use localization::{CatalogueManager, LocalizationError};
pub use source::{CatalogueSource, DirectorySource, EmbeddedSource};

pub use ts_catalogue_core::{
    Catalogue, LoadOptions, Lookup, LookupError, MalformedCatalogue, PluralCategory, PluralRule,
    Translator,
};
pub use ts_catalogue_toml::{I18nConfig, I18nConfigError};

pub use unic_langid::LanguageIdentifier;

use std::fmt::Display;
use std::sync::OnceLock;
use ts_catalogue_core::placeholder;

static CONTEXT: OnceLock<ActiveCatalogue> = OnceLock::new();

/// Installs the process-wide catalogue used by [`translate`] and [`tr!`].
///
/// Can only be set once; later locale switches go through the handle itself
/// (see [`ActiveCatalogue::swap`] and [`CatalogueManager::select_language`]).
/// Returns the rejected handle when a context is already set.
pub fn set_context(active: ActiveCatalogue) -> Result<(), ActiveCatalogue> {
    CONTEXT.set(active)
}

/// The process-wide catalogue, if one was installed.
pub fn context() -> Option<&'static ActiveCatalogue> {
    CONTEXT.get()
}

/// Translates through the process-wide catalogue.
///
/// Without a context, a warning is logged and the source text is rendered
/// with `args`.
pub fn translate(
    context: &str,
    source: &str,
    disambiguation: Option<&str>,
    count: Option<i64>,
    args: &[&dyn Display],
) -> String {
    let query = Lookup {
        context,
        source,
        disambiguation,
        count,
    };

    match CONTEXT.get() {
        Some(active) => active.translate(&query, args),
        None => {
            tracing::warn!(
                "Translation for '{}' requested before a context was set",
                source
            );
            placeholder::render_logged(source, args, count)
        },
    }
}

/// Translates a message through the process-wide catalogue.
///
/// ```ignore
/// let title = tr!("PanelHeader", "Cancel");
/// let usage = tr!("AccountPage", "Using %1 / %2", used, total);
/// let when = tr!("InputUtils", "%1 day ago", count = days, days);
/// let label = tr!("Toolbar", "Open", disambiguation = "verb");
/// ```
#[macro_export]
macro_rules! tr {
    ($context:expr, $source:expr, disambiguation = $disambiguation:expr, count = $count:expr $(, $arg:expr)* $(,)?) => {
        $crate::translate(
            $context,
            $source,
            ::core::option::Option::Some($disambiguation),
            ::core::option::Option::Some($count as i64),
            &[$(&$arg as &dyn ::core::fmt::Display),*],
        )
    };
    ($context:expr, $source:expr, disambiguation = $disambiguation:expr $(, $arg:expr)* $(,)?) => {
        $crate::translate(
            $context,
            $source,
            ::core::option::Option::Some($disambiguation),
            ::core::option::Option::None,
            &[$(&$arg as &dyn ::core::fmt::Display),*],
        )
    };
    ($context:expr, $source:expr, count = $count:expr $(, $arg:expr)* $(,)?) => {
        $crate::translate(
            $context,
            $source,
            ::core::option::Option::None,
            ::core::option::Option::Some($count as i64),
            &[$(&$arg as &dyn ::core::fmt::Display),*],
        )
    };
    ($context:expr, $source:expr $(, $arg:expr)* $(,)?) => {
        $crate::translate(
            $context,
            $source,
            ::core::option::Option::None,
            ::core::option::Option::None,
            &[$(&$arg as &dyn ::core::fmt::Display),*],
        )
    };
}
