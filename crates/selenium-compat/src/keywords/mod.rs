//! Legacy keyword surface.
//!
//! [`SeleniumCompat`] speaks the legacy vocabulary (browser indexes, prefixed
//! locators, `wait_until_*` keywords) and forwards to an injected
//! [`AutomationEngine`] through the translator, the role resolver, the session
//! catalog and the polling waiter.
//!
//! - [`browser`]: browsers, windows, frames, navigation
//! - [`element`]: element actions and checks
//! - [`waiting`]: `wait_*` keywords

pub mod browser;
pub mod element;
pub mod waiting;

pub use browser::WindowLocator;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::catalog::SessionCatalog;
use crate::config::CompatConfig;
use crate::engine::{AutomationEngine, ElementState};
use crate::locator::{LocatorSpec, LocatorTranslator, StrategyRule};
use crate::result::{CompatError, CompatResult};
use crate::role::{Role, RoleLocatorResolver};
use crate::wait::{PollingWaiter, WaitSpec};

/// Legacy keyword library over a selector-based engine
pub struct SeleniumCompat {
    engine: Arc<dyn AutomationEngine>,
    catalog: SessionCatalog,
    translator: LocatorTranslator,
    roles: RoleLocatorResolver,
    waiter: PollingWaiter,
    config: CompatConfig,
}

impl fmt::Debug for SeleniumCompat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeleniumCompat")
            .field("catalog", &self.catalog)
            .field("translator", &self.translator)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SeleniumCompat {
    /// Create the library over an engine
    #[must_use]
    pub fn new(engine: Arc<dyn AutomationEngine>, config: CompatConfig) -> Self {
        Self {
            catalog: SessionCatalog::new(Arc::clone(&engine)),
            engine,
            translator: LocatorTranslator::new(),
            roles: RoleLocatorResolver::new(),
            waiter: PollingWaiter::new().with_poll_interval(config.poll_interval()),
            config,
        }
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &CompatConfig {
        &self.config
    }

    /// Session catalog
    #[must_use]
    pub const fn catalog(&self) -> &SessionCatalog {
        &self.catalog
    }

    /// Injected engine
    #[must_use]
    pub fn engine(&self) -> &dyn AutomationEngine {
        self.engine.as_ref()
    }

    /// Translate a raw locator
    ///
    /// # Errors
    ///
    /// See [`LocatorTranslator::translate`].
    pub fn locator(&self, raw: &str) -> CompatResult<LocatorSpec> {
        self.translator.translate(raw)
    }

    /// Translate a raw locator and apply the role fallback
    ///
    /// # Errors
    ///
    /// See [`LocatorTranslator::translate`].
    pub fn role_locator(&self, raw: &str, role: Role) -> CompatResult<LocatorSpec> {
        Ok(self.roles.for_role(&self.translator.translate(raw)?, role))
    }

    /// Register a custom locator strategy
    ///
    /// # Errors
    ///
    /// See [`LocatorTranslator::add_strategy`].
    pub fn add_location_strategy(&mut self, rule: StrategyRule) -> CompatResult<()> {
        self.translator.add_strategy(rule)
    }

    /// Change the default wait timeout, returning the previous one
    pub fn set_selenium_timeout(&mut self, timeout: Duration) -> Duration {
        let previous = self.config.timeout();
        self.config = self.config.clone().with_timeout(timeout);
        previous
    }

    /// Toggle strict single-match mode on the engine
    ///
    /// # Errors
    ///
    /// Any engine error.
    pub fn set_strict_mode(&mut self, strict: bool) -> CompatResult<()> {
        self.engine.set_strict_mode(strict)?;
        self.config.strict_mode = strict;
        Ok(())
    }

    // -------------------------------------------------------------------------

    fn timeout_or_default(&self, timeout: Option<Duration>) -> Duration {
        timeout.unwrap_or_else(|| self.config.timeout())
    }

    /// Run a wait keyword's predicate through the polling waiter
    fn wait_until<F>(
        &self,
        mut predicate: F,
        template: String,
        timeout: Option<Duration>,
        error: Option<&str>,
    ) -> CompatResult<()>
    where
        F: FnMut() -> CompatResult<bool>,
    {
        let spec = WaitSpec::new(self.timeout_or_default(timeout), template)
            .with_custom_error(error.map(str::to_string));
        self.waiter
            .wait_until(|| predicate().map_err(|err| err.detail()), &spec)
            .map(|_| ())
    }

    /// Fail with `ElementNotFound` unless the locator matches an attached element
    fn require_attached(&self, spec: &LocatorSpec) -> CompatResult<()> {
        let states = self.engine.element_states(spec.native())?;
        if states.contains(ElementState::Attached) {
            Ok(())
        } else {
            Err(CompatError::ElementNotFound {
                locator: spec.original().to_string(),
            })
        }
    }
}

/// Render an engine value the way keyword results expect it
pub(crate) fn value_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::mock::{MockElement, MockEngine};

    fn library() -> (Arc<MockEngine>, SeleniumCompat) {
        let engine = Arc::new(MockEngine::new());
        let lib = SeleniumCompat::new(engine.clone(), CompatConfig::default());
        (engine, lib)
    }

    #[test]
    fn test_locator_helpers() {
        let (_, lib) = library();
        assert_eq!(lib.locator("id=a").unwrap().native(), "id=a");
        let role = lib.role_locator("Save", Role::Button).unwrap();
        assert!(role.native().starts_with("xpath=//button"));
        assert_eq!(role.original(), "Save");
    }

    #[test]
    fn test_custom_strategy_reaches_engine() {
        let (engine, mut lib) = library();
        lib.open_browser(None, "chrome", None).unwrap();
        lib.add_location_strategy(StrategyRule::new("testid", |v| format!("css=[data-testid={v}]")))
            .unwrap();
        engine
            .add_element("css=[data-testid=go]", MockElement::new("button"))
            .unwrap();
        lib.click_element("testid=go").unwrap();
        assert!(engine.was_called("click:css=[data-testid=go]"));
    }

    #[test]
    fn test_set_selenium_timeout_returns_previous() {
        let (_, mut lib) = library();
        let previous = lib.set_selenium_timeout(Duration::from_secs(1));
        assert_eq!(previous, Duration::from_secs(5));
        assert_eq!(lib.config().timeout(), Duration::from_secs(1));
    }

    #[test]
    fn test_require_attached() {
        let (engine, mut lib) = library();
        lib.open_browser(None, "chrome", None).unwrap();
        engine.add_element("id=here", MockElement::new("div")).unwrap();
        assert!(lib.require_attached(&lib.locator("id=here").unwrap()).is_ok());
        let err = lib
            .require_attached(&lib.locator("missing").unwrap())
            .unwrap_err();
        assert_eq!(err.to_string(), "Element with locator 'missing' not found.");
    }

    #[test]
    fn test_value_to_string() {
        assert_eq!(value_to_string(&serde_json::json!("x")), "x");
        assert_eq!(value_to_string(&serde_json::json!(3)), "3");
        assert_eq!(value_to_string(&serde_json::json!(true)), "true");
    }
}
