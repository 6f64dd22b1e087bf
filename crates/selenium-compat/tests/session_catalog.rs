//! End-to-end browser, window and frame flows against the mock engine.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use selenium_compat::mock::{MockElement, MockEngine};
use selenium_compat::prelude::*;

fn library() -> (Arc<MockEngine>, SeleniumCompat) {
    let engine = Arc::new(MockEngine::new());
    let lib = SeleniumCompat::new(engine.clone(), CompatConfig::default());
    (engine, lib)
}

// ============================================================================
// Browsers
// ============================================================================

#[test]
fn browser_ids_are_sequential_and_never_reused() {
    let (engine, mut lib) = library();
    assert_eq!(lib.open_browser(Some("https://a.test/"), "chrome", None).unwrap(), 0);
    assert_eq!(lib.open_browser(Some("https://b.test/"), "firefox", Some("ff")).unwrap(), 1);
    lib.close_browser().unwrap();
    assert_eq!(lib.get_browser_ids(), vec![0]);
    assert_eq!(lib.open_browser(None, "chrome", None).unwrap(), 2);
    assert_eq!(lib.get_browser_ids(), vec![0, 2]);
    assert_eq!(engine.context_count(), 2);
}

#[test]
fn aliases_switch_and_report_previous_index() {
    let (_, mut lib) = library();
    lib.open_browser(Some("https://a.test/"), "chrome", Some("admin")).unwrap();
    lib.open_browser(Some("https://b.test/"), "chrome", Some("user")).unwrap();
    assert_eq!(lib.get_location().unwrap(), "https://b.test/");

    assert_eq!(lib.switch_browser("admin").unwrap(), Some(1));
    assert_eq!(lib.get_location().unwrap(), "https://a.test/");
    assert_eq!(lib.switch_browser("1").unwrap(), Some(0));
    assert_eq!(lib.get_location().unwrap(), "https://b.test/");

    let aliases = lib.get_browser_aliases();
    assert_eq!(aliases.get("admin"), Some(&0));
    assert_eq!(aliases.get("user"), Some(&1));
}

#[test]
fn duplicate_alias_is_rejected_before_opening() {
    let (engine, mut lib) = library();
    lib.open_browser(None, "chrome", Some("main")).unwrap();
    let err = lib.open_browser(None, "chrome", Some("main")).unwrap_err();
    assert!(matches!(err, CompatError::DuplicateAlias { .. }));
    assert_eq!(engine.context_count(), 1);
}

#[test]
fn zero_padded_numeric_alias_is_reachable() {
    let (_, mut lib) = library();
    lib.open_browser(Some("https://a.test/"), "chrome", None).unwrap();
    lib.open_browser(Some("https://b.test/"), "chrome", Some("007")).unwrap();
    lib.switch_browser("0").unwrap();
    assert_eq!(lib.switch_browser("007").unwrap(), Some(0));
    assert_eq!(lib.get_location().unwrap(), "https://b.test/");
    assert_eq!(lib.get_window_handles("007").unwrap().len(), 1);
}

#[test]
fn reserved_words_cannot_become_aliases() {
    let (engine, mut lib) = library();
    for alias in ["all", "CURRENT"] {
        let err = lib.open_browser(None, "chrome", Some(alias)).unwrap_err();
        assert!(matches!(err, CompatError::InvalidArgument { .. }));
    }
    assert!(lib.get_browser_ids().is_empty());
    assert_eq!(engine.context_count(), 0);
}

#[test]
fn configured_launch_args_reach_the_engine() {
    let engine = Arc::new(MockEngine::new());
    let config = CompatConfig::default().with_browser_args(["--lang=de", "--mute-audio"]);
    let mut lib = SeleniumCompat::new(engine.clone(), config);
    lib.open_browser(None, "firefox", None).unwrap();
    assert!(engine.was_called("new_context:firefox:--lang=de --mute-audio"));

    let (engine, mut lib) = library();
    lib.open_browser(None, "chrome", None).unwrap();
    assert_eq!(engine.history().first().map(String::as_str), Some("new_context:chromium"));
}

#[test]
fn unknown_browser_reference_fails() {
    let (_, mut lib) = library();
    lib.open_browser(None, "chrome", None).unwrap();
    let err = lib.switch_browser("nope").unwrap_err();
    assert_eq!(err.to_string(), "Browser 'nope' not found");
    assert!(lib.get_window_handles("7").is_err());
}

#[test]
fn closing_last_browser_shuts_engine_down() {
    let (engine, mut lib) = library();
    lib.open_browser(None, "chrome", None).unwrap();
    lib.open_browser(None, "chrome", None).unwrap();
    lib.close_all_browsers().unwrap();
    assert!(lib.get_browser_ids().is_empty());
    assert_eq!(engine.shutdown_count(), 1);

    lib.open_browser(None, "chrome", None).unwrap();
    lib.close_browser().unwrap();
    assert_eq!(engine.shutdown_count(), 2);
}

// ============================================================================
// Windows
// ============================================================================

#[test]
fn window_handles_follow_engine_pages() {
    let (engine, mut lib) = library();
    lib.open_browser(Some("https://main.test/"), "chrome", None).unwrap();
    let main = lib.get_window_handles("CURRENT").unwrap();
    assert_eq!(main.len(), 1);

    let popup = engine.spawn_page("https://popup.test/", "Popup").unwrap();
    let handles = lib.get_window_handles("CURRENT").unwrap();
    assert_eq!(handles, vec![main[0].clone(), popup.clone()]);

    engine.remove_page(&popup).unwrap();
    assert_eq!(lib.get_window_handles("CURRENT").unwrap(), main);
}

#[test]
fn all_handles_span_every_browser() {
    let (engine, mut lib) = library();
    lib.open_browser(Some("https://a.test/"), "chrome", None).unwrap();
    engine.spawn_page("https://a2.test/", "A2").unwrap();
    lib.open_browser(Some("https://b.test/"), "chrome", None).unwrap();
    assert_eq!(lib.get_window_handles("ALL").unwrap().len(), 3);
    assert_eq!(lib.get_window_handles("0").unwrap().len(), 2);
    assert_eq!(lib.get_locations("CURRENT").unwrap(), vec!["https://b.test/"]);
}

#[test]
fn switch_window_by_title_and_back_to_main() {
    let (engine, mut lib) = library();
    lib.open_browser(Some("https://main.test/"), "chrome", None).unwrap();
    engine.set_title("Main").unwrap();
    engine.spawn_page("https://help.test/", "Help").unwrap();

    let previous = lib
        .switch_window(&WindowLocator::from("title:Help"), None, "CURRENT")
        .unwrap();
    assert_eq!(lib.get_title().unwrap(), "Help");

    lib.switch_window(&WindowLocator::default(), None, "CURRENT")
        .unwrap();
    assert_eq!(lib.get_title().unwrap(), "Main");
    assert_eq!(lib.engine().active_page().unwrap(), previous);
}

#[test]
fn switch_window_without_match_restores_current() {
    let (engine, mut lib) = library();
    lib.open_browser(Some("https://main.test/"), "chrome", None).unwrap();
    engine.spawn_page("https://other.test/", "Other").unwrap();
    let before = lib.engine().active_page().unwrap();

    let err = lib
        .switch_window(&WindowLocator::from("url:https://none.test/"), None, "CURRENT")
        .unwrap_err();
    assert!(matches!(err, CompatError::NoMatchingWindow { .. }));
    assert_eq!(lib.engine().active_page().unwrap(), before);
}

#[test]
fn switch_window_waits_for_popup() {
    let (engine, mut lib) = library();
    lib.open_browser(Some("https://main.test/"), "chrome", None).unwrap();
    let spawner = {
        let engine = Arc::clone(&engine);
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(50));
            engine.spawn_page("https://late.test/", "Late").unwrap();
        })
    };
    lib.switch_window(
        &WindowLocator::from("title:Late"),
        Some(Duration::from_secs(2)),
        "CURRENT",
    )
    .unwrap();
    spawner.join().unwrap();
    assert_eq!(lib.get_location().unwrap(), "https://late.test/");
}

#[test]
fn switch_window_new_and_excluding() {
    let (engine, mut lib) = library();
    lib.open_browser(Some("https://main.test/"), "chrome", None).unwrap();
    let main = lib.engine().active_page().unwrap();
    let popup = engine.spawn_page("https://new.test/", "New").unwrap();

    lib.switch_window(&WindowLocator::from("NEW"), None, "CURRENT")
        .unwrap();
    assert_eq!(lib.engine().active_page().unwrap(), popup);

    lib.switch_window(&WindowLocator::from(vec![popup]), None, "CURRENT")
        .unwrap();
    assert_eq!(lib.engine().active_page().unwrap(), main);
}

#[test]
fn window_names_default_to_undefined() {
    let (engine, mut lib) = library();
    lib.open_browser(None, "chrome", None).unwrap();
    engine.spawn_page("https://x.test/", "X").unwrap();
    engine.set_window_name("primary").unwrap();
    assert_eq!(
        lib.get_window_names("CURRENT").unwrap(),
        vec!["primary", "undefined"]
    );
}

#[test]
fn window_identifiers_cover_every_page_and_restore_current() {
    let (engine, mut lib) = library();
    lib.open_browser(None, "chrome", None).unwrap();
    engine.set_window_id("checkout").unwrap();
    let first = lib.engine().active_page().unwrap();
    engine.spawn_page("https://x.test/", "X").unwrap();
    assert_eq!(
        lib.get_window_identifiers("CURRENT").unwrap(),
        vec!["checkout", "undefined"]
    );
    assert_eq!(lib.engine().active_page().unwrap(), first);
    assert!(lib.get_window_identifiers("9").is_err());
}

// ============================================================================
// Frames
// ============================================================================

#[test]
fn select_frame_scopes_locators() {
    let (engine, mut lib) = library();
    lib.open_browser(None, "chrome", None).unwrap();
    engine
        .add_element("id=editor", MockElement::new("iframe"))
        .unwrap();
    engine
        .add_element("id=editor >>> id=body", MockElement::new("div").with_text("draft"))
        .unwrap();

    lib.select_frame("id=editor").unwrap();
    assert_eq!(lib.get_text("id=body").unwrap(), "draft");
    lib.unselect_frame().unwrap();
    assert!(lib.get_text("id=body").unwrap_err().is_not_found());
}

#[test]
fn select_frame_rejects_non_frames() {
    let (engine, mut lib) = library();
    lib.open_browser(None, "chrome", None).unwrap();
    engine.add_element("id=box", MockElement::new("div")).unwrap();
    assert!(lib.select_frame("id=box").unwrap_err().is_not_found());
    assert!(engine.selector_prefix().is_none());
}

#[test]
fn select_frame_passes_engine_failures_through() {
    let (_, lib) = library();
    let err = lib.select_frame("id=editor").unwrap_err();
    assert!(matches!(err, CompatError::Engine { .. }));
    assert!(!err.is_not_found());
}

#[test]
fn select_frame_on_missing_element_is_not_found() {
    let (engine, mut lib) = library();
    lib.open_browser(None, "chrome", None).unwrap();
    let err = lib.select_frame("id=ghost").unwrap_err();
    assert_eq!(err.to_string(), "Element with locator 'id=ghost' not found.");
    assert!(engine.selector_prefix().is_none());
}
