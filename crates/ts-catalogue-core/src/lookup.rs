use crate::catalogue::Catalogue;
use crate::error::LookupError;
use crate::model::{Message, TranslationState, primary_variant};
use crate::placeholder;
use std::fmt::Display;

/// What to look up: a source text inside a context, optionally narrowed by a
/// disambiguation comment and a plural count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Lookup<'a> {
    pub context: &'a str,
    pub source: &'a str,
    pub disambiguation: Option<&'a str>,
    pub count: Option<i64>,
}

impl<'a> Lookup<'a> {
    pub const fn new(context: &'a str, source: &'a str) -> Self {
        Self {
            context,
            source,
            disambiguation: None,
            count: None,
        }
    }

    pub const fn with_disambiguation(self, disambiguation: &'a str) -> Self {
        Self {
            disambiguation: Some(disambiguation),
            ..self
        }
    }

    pub const fn with_count(self, count: i64) -> Self {
        Self {
            count: Some(count),
            ..self
        }
    }
}

/// Anything that turns a [`Lookup`] into display text.
///
/// Implementations never fail: an unknown message renders its source text.
pub trait Translator: Send + Sync {
    fn translate(&self, query: &Lookup<'_>, args: &[&dyn Display]) -> String;
}

impl Catalogue {
    /// Resolves the template for `query` without rendering it.
    ///
    /// A message that exists but has no usable translation resolves to its
    /// source text. Only a missing context or message is an error.
    pub fn lookup(&self, query: &Lookup<'_>) -> Result<&str, LookupError> {
        let entry = self.index().contexts.get(query.context).ok_or_else(|| {
            LookupError::ContextNotFound {
                context: query.context.to_string(),
            }
        })?;
        let context = &self.contexts()[entry.position];

        let candidates: Vec<&Message> = entry
            .entries
            .get(query.source)
            .into_iter()
            .flatten()
            .map(|slot| &context.messages[*slot])
            .filter(|message| message.disambiguation.as_deref() == query.disambiguation)
            .collect();

        let (message, form) = match candidates.as_slice() {
            [] => {
                return Err(LookupError::MessageNotFound {
                    context: query.context.to_string(),
                    source_text: query.source.to_string(),
                });
            },
            [message] => {
                let forms = message.translation.forms();
                (*message, forms.get(self.variant(query.count, forms.len())))
            },
            variants => {
                let message = variants[self.variant(query.count, variants.len())];
                (message, message.translation.forms().first())
            },
        };

        let withheld = message.translation.state == TranslationState::Unfinished
            && !self.options().include_unfinished;
        match form.map(|text| primary_variant(text)) {
            Some(text) if !text.is_empty() && !withheld => Ok(text),
            _ => Ok(&message.source),
        }
    }

    /// Looks up and renders `query`, falling back to its source text.
    pub fn translate(&self, query: &Lookup<'_>, args: &[&dyn Display]) -> String {
        let template = match self.lookup(query) {
            Ok(template) => template,
            Err(err) => {
                tracing::warn!("{}, using source text", err);
                query.source
            },
        };
        placeholder::render_logged(template, args, query.count)
    }

    fn variant(&self, count: Option<i64>, available: usize) -> usize {
        match count {
            Some(n) if available > 1 => self
                .plural_rule()
                .form_index(n.unsigned_abs())
                .min(available - 1),
            _ => 0,
        }
    }
}

impl Translator for Catalogue {
    fn translate(&self, query: &Lookup<'_>, args: &[&dyn Display]) -> String {
        Catalogue::translate(self, query, args)
    }
}
