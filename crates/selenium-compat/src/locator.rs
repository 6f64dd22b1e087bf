//! Legacy locator translation.
//!
//! Turns a prefix-tagged SeleniumLibrary locator (`id=foo`, `css:.btn`,
//! `link=Home`, `//div[@x]`, ...) into the selector syntax understood by the
//! automation engine.
//!
//! # Design
//!
//! - **Ordered table**: strategies are tried in declaration order, the first
//!   case-insensitive `name [:=] ` prefix wins
//! - **Deny first**: removed strategies (`dom`, `sizzle`, `jquery`) fail before
//!   the table is consulted
//! - **Reversible fallback**: an untagged locator becomes an id-or-name selector
//!   built from one template, so [`is_default_locator`] can recover the value
//! - **Chains**: segments joined by [`CHAIN_SEPARATOR`] are translated one by one

use regex::Regex;
use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::result::{CompatError, CompatResult};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Separator between chained locator segments
pub const CHAIN_SEPARATOR: &str = " >> ";

/// Strategies the legacy library accepted but which have no engine counterpart
pub const ILLEGAL_STRATEGIES: &[&str] = &["dom", "sizzle", "jquery"];

// =============================================================================
// LOCATOR SPEC
// =============================================================================

/// One resolved locator: what the caller wrote and what the engine receives.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocatorSpec {
    original: String,
    native: String,
}

impl LocatorSpec {
    pub(crate) fn new(original: impl Into<String>, native: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            native: native.into(),
        }
    }

    /// Same caller input, different engine selector
    #[must_use]
    pub(crate) fn with_native(&self, native: impl Into<String>) -> Self {
        Self {
            original: self.original.clone(),
            native: native.into(),
        }
    }

    /// The locator exactly as the caller supplied it
    #[must_use]
    pub fn original(&self) -> &str {
        &self.original
    }

    /// The selector handed to the automation engine
    #[must_use]
    pub fn native(&self) -> &str {
        &self.native
    }

    /// Original chain segments, in order
    #[must_use]
    pub fn segments(&self) -> Vec<&str> {
        self.original.split(CHAIN_SEPARATOR).collect()
    }

    /// Whether the caller supplied a chained locator
    #[must_use]
    pub fn is_chained(&self) -> bool {
        self.original.contains(CHAIN_SEPARATOR)
    }

    /// Value of the id-or-name fallback, if this is one
    #[must_use]
    pub fn default_value(&self) -> Option<&str> {
        is_default_locator(&self.native)
    }
}

impl fmt::Display for LocatorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

// =============================================================================
// STRATEGY RULES
// =============================================================================

type Builder = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// A named locator strategy and the function that builds its native selector.
#[derive(Clone)]
pub struct StrategyRule {
    name: String,
    build: Builder,
}

impl StrategyRule {
    /// Create a rule from a prefix tag and a builder
    pub fn new(
        name: impl Into<String>,
        build: impl Fn(&str) -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            build: Arc::new(build),
        }
    }

    /// The prefix tag
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Build the native selector for a remainder
    #[must_use]
    pub fn build(&self, remainder: &str) -> String {
        (self.build)(remainder)
    }

    fn strip<'a>(&self, raw: &'a str) -> Option<&'a str> {
        strip_strategy_prefix(raw, &self.name)
    }
}

impl fmt::Debug for StrategyRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyRule")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Match `name ?[:=] ?` at the start of `raw`, ignoring ASCII case.
fn strip_strategy_prefix<'a>(raw: &'a str, name: &str) -> Option<&'a str> {
    let head = raw.get(..name.len())?;
    if !head.eq_ignore_ascii_case(name) {
        return None;
    }
    let rest = &raw[name.len()..];
    let rest = rest.strip_prefix(' ').unwrap_or(rest);
    let rest = rest.strip_prefix([':', '='])?;
    Some(rest.strip_prefix(' ').unwrap_or(rest))
}

fn data_selector(remainder: &str) -> String {
    match remainder.split_once(':') {
        Some((name, value)) => format!("css=[data-{name}=\"{value}\"]"),
        None => format!("css=[data-{remainder}]"),
    }
}

fn default_rules() -> Vec<StrategyRule> {
    vec![
        StrategyRule::new("id", |v| format!("id={v}")),
        StrategyRule::new("name", |v| format!("css=[name={v}]")),
        StrategyRule::new("identifier", |v| format!("css=[id={v}], [name={v}]")),
        StrategyRule::new("class", |v| format!("css=.{v}")),
        StrategyRule::new("tag", |v| format!("css={v}")),
        StrategyRule::new("xpath", |v| format!("xpath={v}")),
        StrategyRule::new("css", |v| format!("css={v}")),
        StrategyRule::new("link", |v| format!("css=a >> text=\"{v}\"")),
        StrategyRule::new("partial link", |v| format!("css=a >> text={v}")),
        StrategyRule::new("data", data_selector),
        StrategyRule::new("default", default_locator),
        StrategyRule::new("text", |v| format!("text={v}")),
        StrategyRule::new("element", |v| format!("element={v}")),
    ]
}

// =============================================================================
// DEFAULT (ID-OR-NAME) LOCATOR
// =============================================================================

/// Build the id-or-name fallback selector for a bare value.
#[must_use]
pub fn default_locator(value: &str) -> String {
    format!("[id='{value}'], [name='{value}']")
}

fn default_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?s)^\[id='(.*)'\], \[name='(.*)'\]$").expect("default locator pattern")
    })
}

/// Recover the value from a selector produced by [`default_locator`].
///
/// Returns `None` for any other selector, including look-alikes whose id and
/// name values differ.
#[must_use]
pub fn is_default_locator(native: &str) -> Option<&str> {
    let caps = default_pattern().captures(native)?;
    let id = caps.get(1)?.as_str();
    let name = caps.get(2)?.as_str();
    (id == name).then_some(id)
}

// =============================================================================
// TRANSLATOR
// =============================================================================

/// Translates legacy locator strings into [`LocatorSpec`]s.
#[derive(Debug, Clone)]
pub struct LocatorTranslator {
    rules: Vec<StrategyRule>,
}

impl Default for LocatorTranslator {
    fn default() -> Self {
        Self::new()
    }
}

impl LocatorTranslator {
    /// Translator with the built-in strategy table
    #[must_use]
    pub fn new() -> Self {
        Self {
            rules: default_rules(),
        }
    }

    /// Register a caller-defined strategy after the built-in ones.
    ///
    /// # Errors
    ///
    /// Returns [`CompatError::InvalidArgument`] if the name is empty, already
    /// registered, or on the illegal-strategy list.
    pub fn add_strategy(&mut self, rule: StrategyRule) -> CompatResult<()> {
        let taken = rule.name().is_empty()
            || ILLEGAL_STRATEGIES
                .iter()
                .any(|s| s.eq_ignore_ascii_case(rule.name()))
            || self
                .rules
                .iter()
                .any(|r| r.name().eq_ignore_ascii_case(rule.name()));
        if taken {
            return Err(CompatError::InvalidArgument {
                message: format!("Locator strategy '{}' cannot be registered", rule.name()),
            });
        }
        tracing::debug!(strategy = rule.name(), "registered locator strategy");
        self.rules.push(rule);
        Ok(())
    }

    /// Strategy names in the order they are tried
    #[must_use]
    pub fn strategy_names(&self) -> Vec<String> {
        self.rules.iter().map(|r| r.name().to_string()).collect()
    }

    /// Translate a raw locator.
    ///
    /// # Errors
    ///
    /// Returns [`CompatError::InvalidLocatorStrategy`] for a denied strategy and
    /// [`CompatError::InvalidArgument`] for an empty locator or chain segment.
    pub fn translate(&self, raw: &str) -> CompatResult<LocatorSpec> {
        if raw.is_empty() {
            return Err(CompatError::InvalidArgument {
                message: "Locator must not be empty".into(),
            });
        }
        let native = if raw.contains(CHAIN_SEPARATOR) {
            raw.split(CHAIN_SEPARATOR)
                .map(|segment| self.translate_segment(segment))
                .collect::<CompatResult<Vec<_>>>()?
                .join(CHAIN_SEPARATOR)
        } else {
            self.translate_segment(raw)?
        };
        Ok(LocatorSpec::new(raw, native))
    }

    fn translate_segment(&self, segment: &str) -> CompatResult<String> {
        if segment.is_empty() {
            return Err(CompatError::InvalidArgument {
                message: "Locator chain contains an empty segment".into(),
            });
        }
        if let Some(illegal) = ILLEGAL_STRATEGIES
            .iter()
            .find(|s| strip_strategy_prefix(segment, s).is_some())
        {
            return Err(CompatError::InvalidLocatorStrategy {
                strategy: (*illegal).to_string(),
                valid: self.strategy_names(),
            });
        }
        if let Some((rule, rest)) = self
            .rules
            .iter()
            .find_map(|rule| rule.strip(segment).map(|rest| (rule, rest)))
        {
            return Ok(rule.build(rest));
        }
        if segment.starts_with('/') || segment.starts_with('(') {
            return Ok(format!("xpath={segment}"));
        }
        Ok(default_locator(segment))
    }
}

// =============================================================================
// TESTS
// =============================================================================
