use arc_swap::ArcSwap;
use std::fmt::Display;
use std::sync::Arc;
use ts_catalogue_core::{Catalogue, Lookup, Translator};

/// A shared handle to the catalogue currently in use.
///
/// Clones share the same slot. Readers never block; [`ActiveCatalogue::swap`]
/// publishes a new catalogue in one step, so a reader sees either the old or
/// the new catalogue and never a mix of both.
#[derive(Clone, Debug, Default)]
pub struct ActiveCatalogue {
    inner: Arc<ArcSwap<Catalogue>>,
}

impl ActiveCatalogue {
    pub fn new(catalogue: Catalogue) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(catalogue)),
        }
    }

    /// A snapshot of the current catalogue. It stays valid across swaps.
    pub fn load(&self) -> Arc<Catalogue> {
        self.inner.load_full()
    }

    /// Replaces the catalogue, returning the previous one.
    pub fn swap(&self, catalogue: Catalogue) -> Arc<Catalogue> {
        self.swap_shared(Arc::new(catalogue))
    }

    pub fn swap_shared(&self, catalogue: Arc<Catalogue>) -> Arc<Catalogue> {
        tracing::info!(
            "Activating catalogue for '{}' ({} messages)",
            catalogue.locale(),
            catalogue.message_count()
        );
        self.inner.swap(catalogue)
    }
}

impl Translator for ActiveCatalogue {
    fn translate(&self, query: &Lookup<'_>, args: &[&dyn Display]) -> String {
        self.inner.load().translate(query, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use ts_catalogue_core::{Context, Message};

    fn catalogue(translation: &str) -> Catalogue {
        Catalogue::builder()
            .language("hr_HR")
            .contexts(vec![
                Context::new("PanelHeader").with_message(Message::new("Cancel", translation)),
            ])
            .build()
            .unwrap()
    }

    #[test]
    fn starts_empty_and_falls_back() {
        let active = ActiveCatalogue::default();
        assert!(active.load().is_empty());
        assert_eq!(
            active.translate(&Lookup::new("PanelHeader", "Cancel"), &[]),
            "Cancel"
        );
    }

    #[test]
    fn swap_is_visible_to_clones() {
        let active = ActiveCatalogue::new(catalogue("Odustani"));
        let reader = active.clone();
        let query = Lookup::new("PanelHeader", "Cancel");

        assert_eq!(reader.translate(&query, &[]), "Odustani");
        let previous = active.swap(catalogue("Prekini"));
        assert_eq!(reader.translate(&query, &[]), "Prekini");
        assert_eq!(previous.translate(&query, &[]), "Odustani");
    }

    #[test]
    fn snapshot_survives_swap() {
        let active = ActiveCatalogue::new(catalogue("Odustani"));
        let snapshot = active.load();
        active.swap(Catalogue::default());

        let query = Lookup::new("PanelHeader", "Cancel");
        assert_eq!(snapshot.translate(&query, &[]), "Odustani");
        assert_eq!(active.translate(&query, &[]), "Cancel");
    }

    #[test]
    fn readers_see_whole_catalogues_while_swapping() {
        let active = ActiveCatalogue::new(catalogue("Odustani"));
        let query = Lookup::new("PanelHeader", "Cancel");

        thread::scope(|scope| {
            for _ in 0..4 {
                let reader = active.clone();
                scope.spawn(move || {
                    for _ in 0..1_000 {
                        let text = reader.translate(&query, &[]);
                        assert!(text == "Odustani" || text == "Prekini", "saw {}", text);
                    }
                });
            }
            for round in 0..100 {
                let translation = if round % 2 == 0 { "Prekini" } else { "Odustani" };
                active.swap(catalogue(translation));
            }
        });
    }
}
