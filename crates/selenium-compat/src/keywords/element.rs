//! Element keywords.
//!
//! Every keyword translates its locator once, passes the native selector to
//! the engine, and names the caller's original locator in errors.

use super::{value_to_string, SeleniumCompat};
use crate::engine::{ElementState, ElementStates, MouseButton};
use crate::locator::LocatorSpec;
use crate::result::{CompatError, CompatResult};
use crate::role::Role;

/// Selector matching any frame element of the page
const FRAME_SELECTOR: &str = "iframe, frame";

impl SeleniumCompat {
    // =========================================================================
    // CLICKS
    // =========================================================================

    /// Click an element
    ///
    /// # Errors
    ///
    /// [`CompatError::ElementNotFound`] when nothing matches.
    pub fn click_element(&self, locator: &str) -> CompatResult<()> {
        let spec = self.locator(locator)?;
        self.click_spec(&spec, MouseButton::Left)
    }

    /// Click a button; bare values search id, name, value and text
    ///
    /// # Errors
    ///
    /// [`CompatError::ElementNotFound`] when nothing matches.
    pub fn click_button(&self, locator: &str) -> CompatResult<()> {
        let spec = self.role_locator(locator, Role::Button)?;
        self.click_spec(&spec, MouseButton::Left)
    }

    /// Click a link; bare values search id, name, href and link text
    ///
    /// # Errors
    ///
    /// [`CompatError::ElementNotFound`] when nothing matches.
    pub fn click_link(&self, locator: &str) -> CompatResult<()> {
        let spec = self.role_locator(locator, Role::Link)?;
        self.click_spec(&spec, MouseButton::Left)
    }

    /// Click an image, falling back to image-type inputs
    ///
    /// # Errors
    ///
    /// [`CompatError::ElementNotFound`] when neither matches.
    pub fn click_image(&self, locator: &str) -> CompatResult<()> {
        for role in [Role::Image, Role::Input] {
            let spec = self.role_locator(locator, role)?;
            if self.engine.element_count(spec.native())? > 0 {
                return self.click_spec(&spec, MouseButton::Left);
            }
        }
        Err(CompatError::ElementNotFound {
            locator: locator.to_string(),
        })
    }

    /// Right-click an element
    ///
    /// # Errors
    ///
    /// [`CompatError::ElementNotFound`] when nothing matches.
    pub fn open_context_menu(&self, locator: &str) -> CompatResult<()> {
        let spec = self.locator(locator)?;
        self.click_spec(&spec, MouseButton::Right)
    }

    /// Hover an element
    ///
    /// # Errors
    ///
    /// [`CompatError::ElementNotFound`] when nothing matches.
    pub fn mouse_over(&self, locator: &str) -> CompatResult<()> {
        let spec = self.locator(locator)?;
        self.require_attached(&spec)?;
        self.engine.hover(spec.native())
    }

    /// Drag one element onto another
    ///
    /// # Errors
    ///
    /// [`CompatError::ElementNotFound`] when either side is missing.
    pub fn drag_and_drop(&self, source: &str, target: &str) -> CompatResult<()> {
        let source = self.locator(source)?;
        let target = self.locator(target)?;
        self.require_attached(&source)?;
        self.require_attached(&target)?;
        self.engine.drag_and_drop(source.native(), target.native())
    }

    fn click_spec(&self, spec: &LocatorSpec, button: MouseButton) -> CompatResult<()> {
        self.require_attached(spec)?;
        tracing::debug!(locator = %spec, "clicking element");
        self.engine.click(spec.native(), button)
    }

    // =========================================================================
    // INPUT
    // =========================================================================

    /// Type text into an input, replacing its value when `clear` is set
    ///
    /// # Errors
    ///
    /// [`CompatError::ElementNotFound`] when nothing matches.
    pub fn input_text(&self, locator: &str, text: &str, clear: bool) -> CompatResult<()> {
        let spec = self.locator(locator)?;
        self.require_attached(&spec)?;
        self.engine.press_keys(spec.native(), &["End"])?;
        if clear {
            return self.engine.fill(spec.native(), text);
        }
        let current = match self.engine.property(spec.native(), "value")? {
            serde_json::Value::Null => String::new(),
            value => value_to_string(&value),
        };
        self.engine.fill(spec.native(), &format!("{current}{text}"))
    }

    /// Clear an input
    ///
    /// # Errors
    ///
    /// [`CompatError::ElementNotFound`] when nothing matches.
    pub fn clear_element_text(&self, locator: &str) -> CompatResult<()> {
        let spec = self.locator(locator)?;
        self.require_attached(&spec)?;
        self.engine.clear(spec.native())
    }

    /// Check a checkbox
    ///
    /// # Errors
    ///
    /// [`CompatError::CheckboxNotFound`] when the locator is not a checkbox.
    pub fn select_checkbox(&self, locator: &str) -> CompatResult<()> {
        let spec = self.checkbox(locator)?;
        self.engine.check(spec.native())
    }

    /// Uncheck a checkbox
    ///
    /// # Errors
    ///
    /// [`CompatError::CheckboxNotFound`] when the locator is not a checkbox.
    pub fn unselect_checkbox(&self, locator: &str) -> CompatResult<()> {
        let spec = self.checkbox(locator)?;
        self.engine.uncheck(spec.native())
    }

    /// Fail unless the checkbox is checked
    ///
    /// # Errors
    ///
    /// [`CompatError::CheckboxNotFound`] when the locator is not a checkbox,
    /// [`CompatError::AssertionFailed`] when it is unchecked.
    pub fn checkbox_should_be_selected(&self, locator: &str) -> CompatResult<()> {
        let spec = self.checkbox(locator)?;
        if self.is_checked(&spec)? {
            return Ok(());
        }
        Err(CompatError::assertion(format!(
            "Checkbox '{spec}' should have been selected but was not."
        )))
    }

    /// Fail if the checkbox is checked
    ///
    /// # Errors
    ///
    /// [`CompatError::CheckboxNotFound`] when the locator is not a checkbox,
    /// [`CompatError::AssertionFailed`] when it is checked.
    pub fn checkbox_should_not_be_selected(&self, locator: &str) -> CompatResult<()> {
        let spec = self.checkbox(locator)?;
        if self.is_checked(&spec)? {
            return Err(CompatError::assertion(format!(
                "Checkbox '{spec}' should not have been selected."
            )));
        }
        Ok(())
    }

    fn is_checked(&self, spec: &LocatorSpec) -> CompatResult<bool> {
        Ok(self
            .engine
            .element_states(spec.native())?
            .contains(ElementState::Checked))
    }

    fn checkbox(&self, locator: &str) -> CompatResult<LocatorSpec> {
        let spec = self.locator(locator)?;
        let not_found = || CompatError::CheckboxNotFound {
            locator: spec.original().to_string(),
        };
        if !self
            .engine
            .element_states(spec.native())?
            .contains(ElementState::Attached)
        {
            return Err(not_found());
        }
        let kind = self
            .engine
            .attribute(spec.native(), "type")?
            .unwrap_or_default();
        let node = value_to_string(&self.engine.property(spec.native(), "nodeName")?);
        if kind.eq_ignore_ascii_case("checkbox") && node == "INPUT" {
            Ok(spec)
        } else {
            Err(not_found())
        }
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Text of an element
    ///
    /// # Errors
    ///
    /// [`CompatError::ElementNotFound`] when nothing matches.
    pub fn get_text(&self, locator: &str) -> CompatResult<String> {
        let spec = self.locator(locator)?;
        self.require_attached(&spec)?;
        self.engine.text(spec.native())
    }

    /// Number of matches
    ///
    /// # Errors
    ///
    /// Locator syntax or engine errors.
    pub fn get_element_count(&self, locator: &str) -> CompatResult<usize> {
        let spec = self.locator(locator)?;
        self.engine.element_count(spec.native())
    }

    /// DOM property, falling back to the HTML attribute
    ///
    /// # Errors
    ///
    /// [`CompatError::ElementNotFound`] when nothing matches.
    pub fn get_element_attribute(&self, locator: &str, name: &str) -> CompatResult<Option<String>> {
        let spec = self.locator(locator)?;
        self.require_attached(&spec)?;
        match self.engine.property(spec.native(), name)? {
            serde_json::Value::Null => self.engine.attribute(spec.native(), name),
            value => Ok(Some(value_to_string(&value))),
        }
    }

    /// `(width, height)` of an element
    ///
    /// # Errors
    ///
    /// [`CompatError::ElementNotFound`] when nothing matches.
    pub fn get_element_size(&self, locator: &str) -> CompatResult<(f64, f64)> {
        let spec = self.locator(locator)?;
        self.require_attached(&spec)?;
        let bounding_box = self.engine.bounding_box(spec.native())?;
        Ok((bounding_box.width, bounding_box.height))
    }

    /// Labels of a `<select>`
    ///
    /// # Errors
    ///
    /// [`CompatError::ElementNotFound`] when nothing matches.
    pub fn get_list_items(&self, locator: &str) -> CompatResult<Vec<String>> {
        let spec = self.locator(locator)?;
        self.require_attached(&spec)?;
        Ok(self
            .engine
            .select_options(spec.native())?
            .into_iter()
            .map(|option| option.label)
            .collect())
    }

    /// Whether the page, or any frame of it, has a match.
    ///
    /// Clears any frame selection first.
    ///
    /// # Errors
    ///
    /// Locator syntax or engine errors.
    pub fn page_contains(&self, locator: &str) -> CompatResult<bool> {
        let spec = self.locator(locator)?;
        self.engine.set_selector_prefix(None)?;
        if self.engine.element_count(spec.native())? > 0 {
            return Ok(true);
        }
        let frames = self.engine.element_count(FRAME_SELECTOR)?;
        for index in 0..frames {
            let in_frame = format!("{FRAME_SELECTOR} >> nth={index} >>> {}", spec.native());
            if self.engine.element_count(&in_frame)? > 0 {
                return Ok(true);
            }
        }
        Ok(false)
    }

    // =========================================================================
    // CHECKS
    // =========================================================================

    /// Fail unless the element is visible
    ///
    /// # Errors
    ///
    /// [`CompatError::AssertionFailed`] when hidden or detached.
    pub fn element_should_be_visible(&self, locator: &str, message: Option<&str>) -> CompatResult<()> {
        let spec = self.locator(locator)?;
        let states = self.engine.element_states(spec.native())?;
        if states.contains(ElementState::Visible) {
            return Ok(());
        }
        Err(CompatError::assertion(message.map_or_else(
            || format!("The element '{spec}' should be visible, but it is not."),
            str::to_string,
        )))
    }

    /// Fail if the element is visible; a missing element passes
    ///
    /// # Errors
    ///
    /// [`CompatError::AssertionFailed`] when visible.
    pub fn element_should_not_be_visible(
        &self,
        locator: &str,
        message: Option<&str>,
    ) -> CompatResult<()> {
        let spec = self.locator(locator)?;
        let states = self.engine.element_states(spec.native())?;
        if !states.contains(ElementState::Visible) {
            return Ok(());
        }
        Err(CompatError::assertion(message.map_or_else(
            || format!("The element '{spec}' should not be visible, but it is."),
            str::to_string,
        )))
    }

    /// Fail if the element is disabled or read-only
    ///
    /// # Errors
    ///
    /// [`CompatError::ElementNotFound`] when nothing matches,
    /// [`CompatError::AssertionFailed`] when disabled.
    pub fn element_should_be_enabled(&self, locator: &str) -> CompatResult<()> {
        let spec = self.locator(locator)?;
        if self.attached_states(&spec)?.is_enabled() {
            return Ok(());
        }
        Err(CompatError::assertion(format!("Element '{spec}' is disabled.")))
    }

    /// Fail unless the element is disabled or read-only
    ///
    /// # Errors
    ///
    /// [`CompatError::ElementNotFound`] when nothing matches,
    /// [`CompatError::AssertionFailed`] when enabled.
    pub fn element_should_be_disabled(&self, locator: &str) -> CompatResult<()> {
        let spec = self.locator(locator)?;
        if self.attached_states(&spec)?.is_enabled() {
            return Err(CompatError::assertion(format!("Element '{spec}' is enabled.")));
        }
        Ok(())
    }

    /// Fail unless the element has keyboard focus
    ///
    /// # Errors
    ///
    /// [`CompatError::ElementNotFound`] when nothing matches,
    /// [`CompatError::AssertionFailed`] without focus.
    pub fn element_should_be_focused(&self, locator: &str) -> CompatResult<()> {
        let spec = self.locator(locator)?;
        if self.attached_states(&spec)?.contains(ElementState::Focused) {
            return Ok(());
        }
        Err(CompatError::assertion(format!(
            "Element '{spec}' does not have focus."
        )))
    }

    /// Fail unless the element text equals `expected`
    ///
    /// # Errors
    ///
    /// [`CompatError::AssertionFailed`] on mismatch.
    pub fn element_text_should_be(
        &self,
        locator: &str,
        expected: &str,
        message: Option<&str>,
        ignore_case: bool,
    ) -> CompatResult<()> {
        let spec = self.locator(locator)?;
        let actual = self.text_or_not_found(&spec)?;
        if text_eq(&actual, expected, ignore_case) {
            return Ok(());
        }
        Err(CompatError::assertion(message.map_or_else(
            || {
                format!(
                    "The text of element '{spec}' should have been '{expected}' but it was '{actual}'."
                )
            },
            str::to_string,
        )))
    }

    /// Fail unless the element text contains `expected`
    ///
    /// # Errors
    ///
    /// [`CompatError::ElementNotFound`] when nothing matches,
    /// [`CompatError::AssertionFailed`] on mismatch.
    pub fn element_should_contain(
        &self,
        locator: &str,
        expected: &str,
        message: Option<&str>,
        ignore_case: bool,
    ) -> CompatResult<()> {
        let spec = self.locator(locator)?;
        let actual = self.text_or_not_found(&spec)?;
        let found = if ignore_case {
            actual.to_lowercase().contains(&expected.to_lowercase())
        } else {
            actual.contains(expected)
        };
        if found {
            return Ok(());
        }
        Err(CompatError::assertion(message.map_or_else(
            || {
                format!(
                    "Element '{spec}' should have contained text '{expected}' but its text was '{actual}'."
                )
            },
            str::to_string,
        )))
    }

    /// Fail unless the page has a match, or exactly `limit` matches
    ///
    /// # Errors
    ///
    /// [`CompatError::AssertionFailed`] on mismatch.
    pub fn page_should_contain_element(
        &self,
        locator: &str,
        message: Option<&str>,
        limit: Option<usize>,
    ) -> CompatResult<()> {
        let spec = self.locator(locator)?;
        let count = self.engine.element_count(spec.native()).unwrap_or(0);
        let default_message = match limit {
            Some(limit) if count == limit => return Ok(()),
            Some(limit) => format!(
                "Page should have contained \"{limit}\" element(s), but it did contain \"{count}\" element(s)."
            ),
            None if count > 0 => return Ok(()),
            None => format!("Page should have contained element '{spec}' but did not."),
        };
        Err(CompatError::assertion(
            message.map_or(default_message, str::to_string),
        ))
    }

    /// Fail if the page has any match
    ///
    /// # Errors
    ///
    /// [`CompatError::AssertionFailed`] when something matches.
    pub fn page_should_not_contain_element(
        &self,
        locator: &str,
        message: Option<&str>,
    ) -> CompatResult<()> {
        let spec = self.locator(locator)?;
        if self.engine.element_count(spec.native())? == 0 {
            return Ok(());
        }
        Err(CompatError::assertion(message.map_or_else(
            || format!("Page should not have contained element '{spec}'."),
            str::to_string,
        )))
    }

    fn attached_states(&self, spec: &LocatorSpec) -> CompatResult<ElementStates> {
        self.require_attached(spec)?;
        self.engine.element_states(spec.native())
    }

    fn text_or_not_found(&self, spec: &LocatorSpec) -> CompatResult<String> {
        self.engine
            .text(spec.native())
            .map_err(|_| CompatError::ElementNotFound {
                locator: spec.original().to_string(),
            })
    }
}

fn text_eq(actual: &str, expected: &str, ignore_case: bool) -> bool {
    if ignore_case {
        actual.to_lowercase() == expected.to_lowercase()
    } else {
        actual == expected
    }
}
