//! Automation Engine contract.
//!
//! The compatibility layer never drives a browser itself. Everything it needs
//! from a Playwright-style selector engine is expressed by [`AutomationEngine`],
//! which is injected at construction time.
//!
//! ```text
//! ┌──────────────────┐     ┌─────────────────────┐     ┌────────────────────┐
//! │ legacy keywords  │────►│ translator/catalog/ │────►│ AutomationEngine   │
//! │ (SeleniumCompat) │     │ waiter              │     │ (Playwright-style) │
//! └──────────────────┘     └─────────────────────┘     └────────────────────┘
//! ```
//!
//! Selectors passed to the engine are always [`LocatorSpec::native`] strings.
//!
//! [`LocatorSpec::native`]: crate::locator::LocatorSpec::native

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::result::CompatResult;

/// Script evaluated to read `window.name` of the active page
pub const WINDOW_NAME_SCRIPT: &str = "() => String(window.name)";

/// Script evaluated to read `window.id` of the active page
pub const WINDOW_ID_SCRIPT: &str = "() => String(window.id)";

// =============================================================================
// SESSION TYPES
// =============================================================================

/// Browser family the engine should launch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BrowserKind {
    /// Chromium / Chrome / Edge
    #[default]
    Chromium,
    /// Firefox
    Firefox,
    /// WebKit / Safari
    Webkit,
}

impl BrowserKind {
    /// Map a legacy browser name to a browser kind and headless flag.
    ///
    /// Unknown names fall back to headed Chromium.
    #[must_use]
    pub fn from_legacy_name(name: &str) -> (Self, bool) {
        match name.to_ascii_lowercase().replace(' ', "").as_str() {
            "firefox" | "ff" => (Self::Firefox, false),
            "headlessfirefox" => (Self::Firefox, true),
            "headlesschrome" => (Self::Chromium, true),
            "webkit" | "safari" => (Self::Webkit, false),
            _ => (Self::Chromium, false),
        }
    }

    /// Engine-facing name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Chromium => "chromium",
            Self::Firefox => "firefox",
            Self::Webkit => "webkit",
        }
    }
}

impl fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for opening a new context with one page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContextOptions {
    /// URL to open in the first page
    pub url: Option<String>,
    /// Browser family
    pub browser: BrowserKind,
    /// Run without a visible window
    pub headless: bool,
    /// Extra launch arguments
    pub args: Vec<String>,
}

impl ContextOptions {
    /// Create default options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open this URL in the first page
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Use this browser family
    #[must_use]
    pub const fn with_browser(mut self, browser: BrowserKind) -> Self {
        self.browser = browser;
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Pass extra launch arguments to the browser
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }
}

/// Native ids of a freshly opened context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenedContext {
    /// Native context id
    pub context_id: String,
    /// Native id of the first page
    pub page_id: String,
}

/// One page as reported by the engine catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSnapshot {
    /// Native page id
    pub id: String,
    /// Current URL
    pub url: String,
    /// Document title
    pub title: String,
}

/// One context and its pages as reported by the engine catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextSnapshot {
    /// Native context id
    pub id: String,
    /// Pages in engine order
    pub pages: Vec<PageSnapshot>,
}

// =============================================================================
// ELEMENT TYPES
// =============================================================================

/// Named boolean element flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementState {
    /// Present in the DOM
    Attached,
    /// Rendered with a non-empty box
    Visible,
    /// Not disabled
    Enabled,
    /// Accepts text input
    Editable,
    /// Has keyboard focus
    Focused,
    /// Checkbox/radio checked
    Checked,
    /// Option selected
    Selected,
}

/// Set of flags an element currently has
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementStates(BTreeSet<ElementState>);

impl ElementStates {
    /// Empty set (a detached element)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a flag
    #[must_use]
    pub fn with(mut self, state: ElementState) -> Self {
        self.0.insert(state);
        self
    }

    /// Remove a flag
    #[must_use]
    pub fn without(mut self, state: ElementState) -> Self {
        self.0.remove(&state);
        self
    }

    /// Check a flag
    #[must_use]
    pub fn contains(&self, state: ElementState) -> bool {
        self.0.contains(&state)
    }

    /// Attached and visible
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.contains(ElementState::Attached) && self.contains(ElementState::Visible)
    }

    /// Enabled and editable
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.contains(ElementState::Enabled) && self.contains(ElementState::Editable)
    }
}

impl FromIterator<ElementState> for ElementStates {
    fn from_iter<I: IntoIterator<Item = ElementState>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Element bounding box in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    /// X position
    pub x: f64,
    /// Y position
    pub y: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl BoundingBox {
    /// Create a new bounding box
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// One `<option>` of a `<select>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Visible label
    pub label: String,
    /// Value attribute
    pub value: String,
    /// Whether it is selected
    pub selected: bool,
}

/// Mouse button for clicks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MouseButton {
    /// Primary button
    #[default]
    Left,
    /// Middle button
    Middle,
    /// Context-menu button
    Right,
}

// =============================================================================
// ENGINE TRAIT
// =============================================================================

/// Primitive operations consumed from a selector-based automation engine.
///
/// Methods take `&self`; implementations own whatever interior mutability
/// their connection needs. One engine instance serves one test execution.
///
/// # Implementations
///
/// - [`MockEngine`](crate::mock::MockEngine) - in-memory engine for tests
pub trait AutomationEngine: Send + Sync {
    // --- sessions -----------------------------------------------------------

    /// Open a new context with one page and make it active
    fn new_context(&self, options: &ContextOptions) -> CompatResult<OpenedContext>;

    /// Native id of the active context
    fn active_context(&self) -> CompatResult<String>;

    /// Activate a context, returning the previously active one
    fn switch_context(&self, context_id: &str) -> CompatResult<String>;

    /// Close one context and all of its pages
    fn close_context(&self, context_id: &str) -> CompatResult<()>;

    /// Close every context
    fn close_all_contexts(&self) -> CompatResult<()>;

    /// Tear down the browser process
    fn shutdown(&self) -> CompatResult<()>;

    /// Every context with its pages
    fn catalog(&self) -> CompatResult<Vec<ContextSnapshot>>;

    // --- pages --------------------------------------------------------------

    /// Page ids of the active context, in engine order
    fn page_ids(&self) -> CompatResult<Vec<String>>;

    /// Native id of the active page
    fn active_page(&self) -> CompatResult<String>;

    /// Activate a page in any context, returning the previously active page
    fn switch_page(&self, page_id: &str) -> CompatResult<String>;

    /// Activate the most recently opened page not yet activated
    fn switch_to_new_page(&self) -> CompatResult<String>;

    /// Close the active page
    fn close_page(&self) -> CompatResult<()>;

    // --- element queries ----------------------------------------------------

    /// Number of elements matching a selector
    fn element_count(&self, selector: &str) -> CompatResult<usize>;

    /// Text content of the first match
    fn text(&self, selector: &str) -> CompatResult<String>;

    /// Attribute of the first match
    fn attribute(&self, selector: &str, name: &str) -> CompatResult<Option<String>>;

    /// DOM property of the first match
    fn property(&self, selector: &str, name: &str) -> CompatResult<serde_json::Value>;

    /// State flags of the first match (empty when detached)
    fn element_states(&self, selector: &str) -> CompatResult<ElementStates>;

    /// Bounding box of the first match
    fn bounding_box(&self, selector: &str) -> CompatResult<BoundingBox>;

    /// Options of a `<select>`
    fn select_options(&self, selector: &str) -> CompatResult<Vec<SelectOption>>;

    // --- actions ------------------------------------------------------------

    /// Click the first match
    fn click(&self, selector: &str, button: MouseButton) -> CompatResult<()>;

    /// Replace the value of an input
    fn fill(&self, selector: &str, text: &str) -> CompatResult<()>;

    /// Clear an input
    fn clear(&self, selector: &str) -> CompatResult<()>;

    /// Move the mouse over the first match
    fn hover(&self, selector: &str) -> CompatResult<()>;

    /// Check a checkbox/radio
    fn check(&self, selector: &str) -> CompatResult<()>;

    /// Uncheck a checkbox
    fn uncheck(&self, selector: &str) -> CompatResult<()>;

    /// Press keys with focus on the first match
    fn press_keys(&self, selector: &str, keys: &[&str]) -> CompatResult<()>;

    /// Drag one element onto another
    fn drag_and_drop(&self, source: &str, target: &str) -> CompatResult<()>;

    /// Navigate the active page
    fn go_to(&self, url: &str) -> CompatResult<()>;

    /// History back
    fn go_back(&self) -> CompatResult<()>;

    /// Reload the active page
    fn reload(&self) -> CompatResult<()>;

    /// Resize the viewport
    fn set_viewport_size(&self, width: u32, height: u32) -> CompatResult<()>;

    // --- page facts ---------------------------------------------------------

    /// URL of the active page
    fn url(&self) -> CompatResult<String>;

    /// Title of the active page
    fn title(&self) -> CompatResult<String>;

    /// Evaluate a script, optionally against the first match of a selector
    fn evaluate(&self, selector: Option<&str>, script: &str) -> CompatResult<serde_json::Value>;

    // --- modes --------------------------------------------------------------

    /// Prefix prepended to every selector (frame drill-down); `None` clears it
    fn set_selector_prefix(&self, prefix: Option<&str>) -> CompatResult<()>;

    /// Toggle strict single-match mode
    fn set_strict_mode(&self, strict: bool) -> CompatResult<()>;
}
