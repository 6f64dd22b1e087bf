//! Locator translation and role fallback through the public API.

#![allow(clippy::unwrap_used)]

use selenium_compat::prelude::*;
use selenium_compat::role::xpath_literal;

#[test]
fn chained_locators_translate_per_segment() {
    let spec = LocatorTranslator::new()
        .translate("id=form >> name:q >> //input")
        .unwrap();
    assert_eq!(spec.native(), "id=form >> css=[name=q] >> xpath=//input");
    assert_eq!(spec.original(), "id=form >> name:q >> //input");
    assert!(spec.is_chained());
}

#[test]
fn denied_strategy_lists_valid_ones() {
    let err = LocatorTranslator::new().translate("jquery=#x").unwrap_err();
    match err {
        CompatError::InvalidLocatorStrategy { strategy, valid } => {
            assert_eq!(strategy, "jquery");
            assert!(valid.iter().any(|s| s == "css"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn custom_strategy_runs_after_builtins() {
    let mut translator = LocatorTranslator::new();
    translator
        .add_strategy(StrategyRule::new("qa", |v| format!("css=[data-qa={v}]")))
        .unwrap();
    assert_eq!(
        translator.translate("qa=save").unwrap().native(),
        "css=[data-qa=save]"
    );
    assert_eq!(translator.strategy_names().last().map(String::as_str), Some("qa"));
    assert!(translator
        .add_strategy(StrategyRule::new("css", |v| v.to_string()))
        .is_err());
    assert!(translator
        .add_strategy(StrategyRule::new("sizzle", |v| v.to_string()))
        .is_err());
}

#[test]
fn role_fallback_only_touches_bare_values() {
    let translator = LocatorTranslator::new();
    let resolver = RoleLocatorResolver::new();

    let bare = resolver.for_role(&translator.translate("Submit").unwrap(), Role::Button);
    assert!(bare.native().starts_with("xpath="));
    assert!(bare.native().contains("\"Submit\""));
    assert_eq!(bare.original(), "Submit");

    let explicit = resolver.for_role(&translator.translate("css=.go").unwrap(), Role::Button);
    assert_eq!(explicit.native(), "css=.go");
}

#[test]
fn xpath_literal_handles_both_quote_kinds() {
    assert_eq!(xpath_literal("plain"), "\"plain\"");
    assert_eq!(xpath_literal("say \"hi\""), "'say \"hi\"'");
    assert_eq!(
        xpath_literal("it's \"x\""),
        "concat(\"it's \", '\"', \"x\", '\"', \"\")"
    );
}
