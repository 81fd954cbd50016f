use crate::catalogue::Catalogue;
use crate::model::{Context, Message, TranslationState};

/// Translation progress of one context.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ContextCoverage {
    pub name: String,
    pub finished: usize,
    pub unfinished: usize,
    pub untranslated: usize,
    /// Vanished and obsolete messages.
    pub inactive: usize,
}

impl ContextCoverage {
    fn of(context: &Context) -> Self {
        let mut coverage = Self {
            name: context.name.clone(),
            ..Default::default()
        };
        for message in &context.messages {
            coverage.count(message);
        }
        coverage
    }

    fn count(&mut self, message: &Message) {
        if !message.is_active() {
            self.inactive += 1;
        } else if message.translation.is_empty() {
            self.untranslated += 1;
        } else if message.translation.state == TranslationState::Unfinished {
            self.unfinished += 1;
        } else {
            self.finished += 1;
        }
    }

    pub fn active(&self) -> usize {
        self.finished + self.unfinished + self.untranslated
    }

    pub fn is_complete(&self) -> bool {
        self.unfinished == 0 && self.untranslated == 0
    }

    /// Share of active messages that are finished, from 0 to 100.
    pub fn percent_finished(&self) -> f64 {
        match self.active() {
            0 => 100.0,
            active => self.finished as f64 * 100.0 / active as f64,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Coverage {
    pub language: Option<String>,
    pub contexts: Vec<ContextCoverage>,
}

impl Coverage {
    /// All contexts summed into one entry with an empty name.
    pub fn total(&self) -> ContextCoverage {
        self.contexts
            .iter()
            .fold(ContextCoverage::default(), |mut total, context| {
                total.finished += context.finished;
                total.unfinished += context.unfinished;
                total.untranslated += context.untranslated;
                total.inactive += context.inactive;
                total
            })
    }

    pub fn incomplete(&self) -> impl Iterator<Item = &ContextCoverage> {
        self.contexts.iter().filter(|context| !context.is_complete())
    }
}

impl Catalogue {
    pub fn coverage(&self) -> Coverage {
        Coverage {
            language: self.language().map(str::to_string),
            contexts: self.contexts().iter().map(ContextCoverage::of).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_each_state() {
        let context = Context::new("PanelHeader")
            .with_message(Message::new("Cancel", "Odustani"))
            .with_message(Message::new("Save", "Spremi").with_state(TranslationState::Unfinished))
            .with_message(Message::new("Close", "").with_state(TranslationState::Unfinished))
            .with_message(Message::new("Old", "Staro").with_state(TranslationState::Vanished));
        let catalogue = Catalogue::builder()
            .language("hr_HR")
            .contexts(vec![context, Context::new("Empty")])
            .build()
            .unwrap();

        let coverage = catalogue.coverage();
        assert_eq!(
            coverage.contexts[0],
            ContextCoverage {
                name: "PanelHeader".to_string(),
                finished: 1,
                unfinished: 1,
                untranslated: 1,
                inactive: 1,
            }
        );
        assert!(coverage.contexts[1].is_complete());
        assert_eq!(coverage.incomplete().count(), 1);

        let total = coverage.total();
        assert_eq!(total.active(), 3);
        assert!((total.percent_finished() - 100.0 / 3.0).abs() < f64::EPSILON * 100.0);
    }

    #[test]
    fn empty_catalogue_is_complete() {
        let total = Catalogue::default().coverage().total();
        assert!(total.is_complete());
        assert_eq!(total.percent_finished(), 100.0);
    }
}
