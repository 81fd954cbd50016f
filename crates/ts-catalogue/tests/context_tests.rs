use rust_embed::RustEmbed;
use serial_test::serial;
use std::sync::OnceLock;
use ts_catalogue::{CatalogueManager, EmbeddedSource, Lookup, Translator, tr};
use unic_langid::langid;

#[derive(RustEmbed)]
#[folder = "tests/fixtures/i18n"]
struct Fixtures;

fn manager() -> &'static CatalogueManager {
    static MANAGER: OnceLock<CatalogueManager> = OnceLock::new();
    MANAGER.get_or_init(|| {
        let manager = CatalogueManager::builder()
            .source(EmbeddedSource::<Fixtures>::new("input"))
            .fallback_language(langid!("hr-HR"))
            .build();
        manager.select_language(&langid!("hr-HR")).unwrap();
        let _ = ts_catalogue::set_context(manager.active().clone());
        manager
    })
}

#[test]
#[serial]
fn tr_translates_through_context() {
    manager();
    assert_eq!(tr!("PanelHeader", "Cancel"), "Odustani");
    assert_eq!(tr!("AccountPage", "Using %1 / %2", 3, 10), "Iskorišteno 3/10");
}

#[test]
#[serial]
fn tr_degrades_to_source() {
    manager();
    assert_eq!(tr!("PanelHeader", "Not translated"), "Not translated");
    assert_eq!(
        tr!("Nowhere", "%1 of %2", disambiguation = "progress", "1", "2"),
        "1 of 2"
    );
    assert_eq!(tr!("Nowhere", "%n items", count = 4), "4 items");
}

#[test]
#[serial]
fn context_follows_language_switch() {
    let manager = manager();
    assert!(ts_catalogue::set_context(manager.active().clone()).is_err());

    manager.select_language(&langid!("de-DE")).unwrap();
    assert_eq!(manager.selected_language(), Some(langid!("hr-HR")));
    assert_eq!(
        ts_catalogue::context()
            .unwrap()
            .translate(&Lookup::new("PanelHeader", "Cancel"), &[]),
        "Odustani"
    );
}
