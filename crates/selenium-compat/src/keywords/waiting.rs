//! `wait_*` keywords.
//!
//! Each keyword builds a predicate over the engine and a legacy failure
//! template, then hands both to the polling waiter. `timeout` falls back to
//! the configured default; `error` replaces the template verbatim.

use std::time::Duration;

use super::SeleniumCompat;
use crate::engine::ElementState;
use crate::result::{CompatError, CompatResult};

impl SeleniumCompat {
    /// Wait until a JavaScript condition evaluates to `true`
    ///
    /// The condition is a function body and must contain `return`.
    ///
    /// # Errors
    ///
    /// [`CompatError::MissingReturn`] without `return`,
    /// [`CompatError::WaitTimeout`] when it never holds.
    pub fn wait_for_condition(
        &self,
        condition: &str,
        timeout: Option<Duration>,
        error: Option<&str>,
    ) -> CompatResult<()> {
        if !condition.contains("return") {
            return Err(CompatError::MissingReturn {
                condition: condition.to_string(),
            });
        }
        self.wait_until(
            || Ok(self.execute_javascript(condition)? == serde_json::Value::Bool(true)),
            format!("Condition '{condition}' did not become true in <TIMEOUT>."),
            timeout,
            error,
        )
    }

    // =========================================================================
    // ELEMENT TEXT
    // =========================================================================

    /// Wait until the element text contains `text`
    ///
    /// # Errors
    ///
    /// [`CompatError::WaitTimeout`] when it never does.
    pub fn wait_until_element_contains(
        &self,
        locator: &str,
        text: &str,
        timeout: Option<Duration>,
        error: Option<&str>,
    ) -> CompatResult<()> {
        let spec = self.locator(locator)?;
        self.wait_until(
            || Ok(self.engine.text(spec.native())?.contains(text)),
            format!("Element '{spec}' did not get text '{text}' in <TIMEOUT>."),
            timeout,
            error,
        )
    }

    /// Wait until the element text no longer contains `text`
    ///
    /// # Errors
    ///
    /// [`CompatError::WaitTimeout`] when it still does.
    pub fn wait_until_element_does_not_contain(
        &self,
        locator: &str,
        text: &str,
        timeout: Option<Duration>,
        error: Option<&str>,
    ) -> CompatResult<()> {
        let spec = self.locator(locator)?;
        self.wait_until(
            || Ok(!self.engine.text(spec.native())?.contains(text)),
            format!("Element '{spec}' still had text '{text}' after <TIMEOUT>."),
            timeout,
            error,
        )
    }

    // =========================================================================
    // ELEMENT STATE
    // =========================================================================

    /// Wait until an attached element becomes enabled and editable
    ///
    /// # Errors
    ///
    /// [`CompatError::ElementNotFound`] when nothing matches up front,
    /// [`CompatError::WaitTimeout`] when it stays disabled.
    pub fn wait_until_element_is_enabled(
        &self,
        locator: &str,
        timeout: Option<Duration>,
        error: Option<&str>,
    ) -> CompatResult<()> {
        let spec = self.locator(locator)?;
        self.require_attached(&spec)?;
        self.wait_until(
            || Ok(self.engine.element_states(spec.native())?.is_enabled()),
            format!("Element '{spec}' was not enabled in <TIMEOUT>."),
            timeout,
            error,
        )
    }

    /// Wait until the element is visible
    ///
    /// # Errors
    ///
    /// [`CompatError::WaitTimeout`] when it never shows.
    pub fn wait_until_element_is_visible(
        &self,
        locator: &str,
        timeout: Option<Duration>,
        error: Option<&str>,
    ) -> CompatResult<()> {
        let spec = self.locator(locator)?;
        self.wait_until(
            || Ok(self.engine.element_states(spec.native())?.is_visible()),
            format!("Element '{spec}' not visible after <TIMEOUT>."),
            timeout,
            error,
        )
    }

    /// Wait until the element is hidden or detached
    ///
    /// # Errors
    ///
    /// [`CompatError::WaitTimeout`] when it stays visible.
    pub fn wait_until_element_is_not_visible(
        &self,
        locator: &str,
        timeout: Option<Duration>,
        error: Option<&str>,
    ) -> CompatResult<()> {
        let spec = self.locator(locator)?;
        self.wait_until(
            || {
                let states = self.engine.element_states(spec.native())?;
                Ok(!states.contains(ElementState::Visible))
            },
            format!("Element '{spec}' still visible after <TIMEOUT>."),
            timeout,
            error,
        )
    }

    // =========================================================================
    // LOCATION
    // =========================================================================

    /// Wait until the URL contains `expected`
    ///
    /// # Errors
    ///
    /// [`CompatError::WaitTimeout`] when it never does.
    pub fn wait_until_location_contains(
        &self,
        expected: &str,
        timeout: Option<Duration>,
        error: Option<&str>,
    ) -> CompatResult<()> {
        self.wait_until(
            || Ok(self.engine.url()?.contains(expected)),
            format!("Location did not contain '{expected}' in <TIMEOUT>."),
            timeout,
            error,
        )
    }

    /// Wait until the URL stops containing `location`
    ///
    /// # Errors
    ///
    /// [`CompatError::WaitTimeout`] when it still does.
    pub fn wait_until_location_does_not_contain(
        &self,
        location: &str,
        timeout: Option<Duration>,
        error: Option<&str>,
    ) -> CompatResult<()> {
        self.wait_until(
            || Ok(!self.engine.url()?.contains(location)),
            format!("Location did contain '{location}' in <TIMEOUT>."),
            timeout,
            error,
        )
    }

    /// Wait until the URL equals `expected`
    ///
    /// # Errors
    ///
    /// [`CompatError::WaitTimeout`] when it never does.
    pub fn wait_until_location_is(
        &self,
        expected: &str,
        timeout: Option<Duration>,
        error: Option<&str>,
    ) -> CompatResult<()> {
        self.wait_until(
            || Ok(self.engine.url()? == expected),
            format!("Location did not become '{expected}' in <TIMEOUT>."),
            timeout,
            error,
        )
    }

    /// Wait until the URL differs from `location`
    ///
    /// # Errors
    ///
    /// [`CompatError::WaitTimeout`] when it stays.
    pub fn wait_until_location_is_not(
        &self,
        location: &str,
        timeout: Option<Duration>,
        error: Option<&str>,
    ) -> CompatResult<()> {
        self.wait_until(
            || Ok(self.engine.url()? != location),
            format!("Location is '{location}' in <TIMEOUT>."),
            timeout,
            error,
        )
    }

    // =========================================================================
    // PAGE CONTENT
    // =========================================================================

    /// Wait until `text` appears on the page or in a frame
    ///
    /// # Errors
    ///
    /// [`CompatError::WaitTimeout`] when it never appears.
    pub fn wait_until_page_contains(
        &self,
        text: &str,
        timeout: Option<Duration>,
        error: Option<&str>,
    ) -> CompatResult<()> {
        let locator = format!("text={text}");
        self.wait_until(
            || self.page_contains(&locator),
            format!("Text '{text}' did not appear in <TIMEOUT>."),
            timeout,
            error,
        )
    }

    /// Wait until `text` is gone from the page and its frames
    ///
    /// # Errors
    ///
    /// [`CompatError::WaitTimeout`] when it stays.
    pub fn wait_until_page_does_not_contain(
        &self,
        text: &str,
        timeout: Option<Duration>,
        error: Option<&str>,
    ) -> CompatResult<()> {
        let locator = format!("text={text}");
        self.wait_until(
            || Ok(!self.page_contains(&locator)?),
            format!("Text '{text}' did not disappear in <TIMEOUT>."),
            timeout,
            error,
        )
    }

    /// Wait for a match, or for exactly `limit` matches
    ///
    /// # Errors
    ///
    /// [`CompatError::WaitTimeout`] when the count never fits.
    pub fn wait_until_page_contains_element(
        &self,
        locator: &str,
        timeout: Option<Duration>,
        error: Option<&str>,
        limit: Option<usize>,
    ) -> CompatResult<()> {
        let spec = self.locator(locator)?;
        let template = match limit {
            Some(limit) => format!(
                "Page should have contained \"{limit}\" {spec} element(s) within <TIMEOUT>."
            ),
            None => format!("Element '{spec}' did not appear in <TIMEOUT>."),
        };
        self.wait_until(
            || {
                let count = self.engine.element_count(spec.native())?;
                Ok(limit.map_or(count > 0, |limit| count == limit))
            },
            template,
            timeout,
            error,
        )
    }

    /// Wait for no match, or for any count other than `limit`
    ///
    /// # Errors
    ///
    /// [`CompatError::WaitTimeout`] when the count never fits.
    pub fn wait_until_page_does_not_contain_element(
        &self,
        locator: &str,
        timeout: Option<Duration>,
        error: Option<&str>,
        limit: Option<usize>,
    ) -> CompatResult<()> {
        let spec = self.locator(locator)?;
        let template = match limit {
            Some(limit) => format!(
                "Page should have not contained \"{limit}\" {spec} element(s) within <TIMEOUT>."
            ),
            None => format!("Element '{spec}' did not disappear in <TIMEOUT>."),
        };
        self.wait_until(
            || {
                let count = self.engine.element_count(spec.native())?;
                Ok(limit.map_or(count == 0, |limit| count != limit))
            },
            template,
            timeout,
            error,
        )
    }
}
