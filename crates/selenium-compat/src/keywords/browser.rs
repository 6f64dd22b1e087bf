//! Browser, window, frame and navigation keywords.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use super::{value_to_string, SeleniumCompat};
use crate::catalog::SessionRef;
use crate::engine::{
    AutomationEngine, BrowserKind, ContextOptions, WINDOW_ID_SCRIPT, WINDOW_NAME_SCRIPT,
};
use crate::result::{CompatError, CompatResult};

// =============================================================================
// WINDOW LOCATOR
// =============================================================================

/// Target of `switch_window`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowLocator {
    /// `CURRENT`, `NEW`, `MAIN`, a handle, or `name:`/`title:`/`url:`/`default:` text
    Named(String),
    /// First window whose handle is not in the list
    Excluding(Vec<String>),
}

impl Default for WindowLocator {
    fn default() -> Self {
        Self::Named("MAIN".to_string())
    }
}

impl From<&str> for WindowLocator {
    fn from(locator: &str) -> Self {
        Self::Named(locator.to_string())
    }
}

impl From<Vec<String>> for WindowLocator {
    fn from(excluded: Vec<String>) -> Self {
        Self::Excluding(excluded)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WindowStrategy {
    Default,
    Name,
    Title,
    Url,
}

fn window_strategy_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?s)^(?P<strategy>name|title|url|default)[:=](?P<locator>.*)$")
            .expect("window strategy pattern")
    })
}

fn split_window_strategy(locator: &str) -> (WindowStrategy, &str) {
    let Some(caps) = window_strategy_pattern().captures(locator) else {
        return (WindowStrategy::Default, locator);
    };
    let strategy = match caps.name("strategy").map(|m| m.as_str()) {
        Some("name") => WindowStrategy::Name,
        Some("title") => WindowStrategy::Title,
        Some("url") => WindowStrategy::Url,
        _ => WindowStrategy::Default,
    };
    let value = caps.name("locator").map_or("", |m| m.as_str());
    (strategy, value)
}

struct WindowInfo {
    handle: String,
    name: String,
    title: String,
    url: String,
}

impl WindowInfo {
    fn matches(&self, strategy: WindowStrategy, locator: &str, index: usize) -> bool {
        use WindowStrategy::{Default, Name, Title, Url};
        (strategy == Default && self.handle == locator)
            || (matches!(strategy, Default | Name) && self.name == locator)
            || (matches!(strategy, Default | Title) && self.title == locator)
            || (matches!(strategy, Default | Url) && self.url == locator)
            || (strategy == Default && index == 0 && locator.eq_ignore_ascii_case("MAIN"))
    }
}

fn read_window_info(engine: &dyn AutomationEngine, handle: &str) -> CompatResult<WindowInfo> {
    engine.switch_page(handle)?;
    Ok(WindowInfo {
        handle: handle.to_string(),
        name: value_to_string(&engine.evaluate(None, WINDOW_NAME_SCRIPT)?),
        title: engine.title()?,
        url: engine.url()?,
    })
}

// =============================================================================
// BROWSERS
// =============================================================================

impl SeleniumCompat {
    /// Open a browser and return its index.
    ///
    /// Legacy browser names map onto engine browser kinds; unknown names open
    /// Chromium.
    ///
    /// # Errors
    ///
    /// [`CompatError::DuplicateAlias`] or any engine error.
    pub fn open_browser(
        &mut self,
        url: Option<&str>,
        browser: &str,
        alias: Option<&str>,
    ) -> CompatResult<u64> {
        let name = if browser.is_empty() {
            self.config.default_browser.as_str()
        } else {
            browser
        };
        let (kind, headless) = BrowserKind::from_legacy_name(name);
        let mut options = ContextOptions::new()
            .with_browser(kind)
            .headless(headless)
            .with_args(self.config.browser_args.iter().cloned());
        options.url = url.map(str::to_string);

        let index = self.catalog.open(alias, &options)?;
        self.engine.set_strict_mode(self.config.strict_mode)?;
        tracing::info!(index, browser = %kind, "opened browser");
        Ok(index)
    }

    /// Close the current browser
    ///
    /// # Errors
    ///
    /// [`CompatError::WindowNotFound`] when the active context is untracked.
    pub fn close_browser(&mut self) -> CompatResult<()> {
        self.catalog.close(&SessionRef::Current).map(|_| ())
    }

    /// Close every browser
    ///
    /// # Errors
    ///
    /// Any engine error.
    pub fn close_all_browsers(&mut self) -> CompatResult<()> {
        self.catalog.close_all()
    }

    /// Activate a browser by index or alias, returning the previous index
    ///
    /// # Errors
    ///
    /// [`CompatError::WindowNotFound`] when nothing matches.
    pub fn switch_browser(&mut self, index_or_alias: &str) -> CompatResult<Option<u64>> {
        self.catalog.switch(&SessionRef::parse(index_or_alias))
    }

    /// Open browser indexes
    #[must_use]
    pub fn get_browser_ids(&self) -> Vec<u64> {
        self.catalog.ids()
    }

    /// Alias to index map
    #[must_use]
    pub fn get_browser_aliases(&self) -> BTreeMap<String, u64> {
        self.catalog.aliases()
    }

    // =========================================================================
    // WINDOWS
    // =========================================================================

    /// Page handles of a browser (`CURRENT`, `ALL`, index or alias)
    ///
    /// # Errors
    ///
    /// [`CompatError::WindowNotFound`] for an unknown browser.
    pub fn get_window_handles(&mut self, browser: &str) -> CompatResult<Vec<String>> {
        self.catalog.pages_for(&SessionRef::parse(browser))
    }

    /// Titles of every page of a browser
    ///
    /// # Errors
    ///
    /// [`CompatError::WindowNotFound`] for an unknown browser.
    pub fn get_window_titles(&mut self, browser: &str) -> CompatResult<Vec<String>> {
        self.per_window(browser, |engine| engine.title())
    }

    /// URLs of every page of a browser
    ///
    /// # Errors
    ///
    /// [`CompatError::WindowNotFound`] for an unknown browser.
    pub fn get_locations(&mut self, browser: &str) -> CompatResult<Vec<String>> {
        self.per_window(browser, |engine| engine.url())
    }

    /// `window.name` of every page of a browser, `undefined` when unset
    ///
    /// # Errors
    ///
    /// [`CompatError::WindowNotFound`] for an unknown browser.
    pub fn get_window_names(&mut self, browser: &str) -> CompatResult<Vec<String>> {
        self.per_window(browser, |engine| {
            let name = value_to_string(&engine.evaluate(None, WINDOW_NAME_SCRIPT)?);
            Ok(if name.is_empty() {
                "undefined".to_string()
            } else {
                name
            })
        })
    }

    /// `window.id` of every page of a browser, `"undefined"` when unset
    ///
    /// # Errors
    ///
    /// [`CompatError::WindowNotFound`] for an unknown browser.
    pub fn get_window_identifiers(&mut self, browser: &str) -> CompatResult<Vec<String>> {
        self.per_window(browser, |engine| {
            let id = value_to_string(&engine.evaluate(None, WINDOW_ID_SCRIPT)?);
            Ok(if id.is_empty() {
                "undefined".to_string()
            } else {
                id
            })
        })
    }

    /// Close the active page
    ///
    /// # Errors
    ///
    /// Any engine error.
    pub fn close_window(&self) -> CompatResult<()> {
        self.engine.close_page()
    }

    /// Switch to a window, retrying until `timeout`; returns the handle that
    /// was active before the call.
    ///
    /// Candidates are checked in catalog order and the first match wins.
    /// Without a timeout a single attempt is made.
    ///
    /// # Errors
    ///
    /// [`CompatError::NoMatchingWindow`] once the timeout has passed.
    pub fn switch_window(
        &mut self,
        locator: &WindowLocator,
        timeout: Option<Duration>,
        browser: &str,
    ) -> CompatResult<String> {
        let started = Instant::now();
        let timeout = timeout.unwrap_or(Duration::ZERO);
        let current = self.engine.active_page()?;
        loop {
            match self.try_switch_window(locator, browser, &current) {
                Ok(()) => return Ok(current),
                Err(err @ CompatError::NoMatchingWindow { .. }) => {
                    if started.elapsed() >= timeout {
                        return Err(err);
                    }
                    std::thread::sleep(self.config.window_poll_interval());
                }
                Err(other) => return Err(other),
            }
        }
    }

    fn try_switch_window(
        &mut self,
        locator: &WindowLocator,
        browser: &str,
        current: &str,
    ) -> CompatResult<()> {
        let target = SessionRef::parse(browser);
        match locator {
            WindowLocator::Named(raw) if raw.eq_ignore_ascii_case("CURRENT") => Ok(()),
            WindowLocator::Named(raw) if raw.eq_ignore_ascii_case("NEW") => {
                let context = self.catalog.resolve(&target)?;
                if self.engine.active_context()? != context {
                    self.engine.switch_context(&context)?;
                }
                self.engine.switch_to_new_page()?;
                Ok(())
            }
            WindowLocator::Named(raw) => {
                let (strategy, value) = split_window_strategy(raw);
                let handles = self.catalog.pages_for(&target)?;
                for (index, handle) in handles.iter().enumerate() {
                    let info = read_window_info(self.engine.as_ref(), handle)?;
                    if info.matches(strategy, value, index) {
                        tracing::debug!(handle = %info.handle, "switched window");
                        return Ok(());
                    }
                }
                self.engine.switch_page(current)?;
                Err(CompatError::NoMatchingWindow {
                    locator: value.to_string(),
                })
            }
            WindowLocator::Excluding(excluded) => {
                let handles = self.catalog.pages_for(&target)?;
                if let Some(handle) = handles.iter().find(|h| !excluded.contains(h)) {
                    self.engine.switch_page(handle)?;
                    return Ok(());
                }
                Err(CompatError::NoMatchingWindow {
                    locator: format!("{excluded:?}"),
                })
            }
        }
    }

    /// Visit every page of a browser, read one fact, and restore the active page
    fn per_window<T>(
        &mut self,
        browser: &str,
        read: impl Fn(&dyn AutomationEngine) -> CompatResult<T>,
    ) -> CompatResult<Vec<T>> {
        let current = self.engine.active_page()?;
        let handles = self.catalog.pages_for(&SessionRef::parse(browser))?;
        let engine = self.engine.as_ref();
        let collected = handles
            .iter()
            .map(|handle| {
                engine.switch_page(handle)?;
                read(engine)
            })
            .collect::<CompatResult<Vec<T>>>();
        engine.switch_page(&current)?;
        collected
    }

    /// Resize the viewport
    ///
    /// # Errors
    ///
    /// Any engine error.
    pub fn set_window_size(&self, width: u32, height: u32) -> CompatResult<()> {
        self.engine.set_viewport_size(width, height)
    }

    // =========================================================================
    // FRAMES
    // =========================================================================

    /// Scope every following locator into a frame
    ///
    /// # Errors
    ///
    /// [`CompatError::ElementNotFound`] when the locator is not a frame;
    /// engine failures are returned as they are.
    pub fn select_frame(&self, locator: &str) -> CompatResult<()> {
        let spec = self.locator(locator)?;
        self.require_attached(&spec)?;
        let node = value_to_string(&self.engine.property(spec.native(), "nodeName")?);
        if node != "IFRAME" && node != "FRAME" {
            return Err(CompatError::ElementNotFound {
                locator: spec.original().to_string(),
            });
        }
        self.engine
            .set_selector_prefix(Some(&format!("{} >>>", spec.native())))
    }

    /// Leave any selected frame
    ///
    /// # Errors
    ///
    /// Any engine error.
    pub fn unselect_frame(&self) -> CompatResult<()> {
        self.engine.set_selector_prefix(None)
    }

    // =========================================================================
    // NAVIGATION
    // =========================================================================

    /// Navigate the active page
    ///
    /// # Errors
    ///
    /// Any engine error.
    pub fn go_to(&self, url: &str) -> CompatResult<()> {
        self.engine.go_to(url)
    }

    /// History back
    ///
    /// # Errors
    ///
    /// Any engine error.
    pub fn go_back(&self) -> CompatResult<()> {
        self.engine.go_back()
    }

    /// Reload the active page
    ///
    /// # Errors
    ///
    /// Any engine error.
    pub fn reload_page(&self) -> CompatResult<()> {
        self.engine.reload()
    }

    /// URL of the active page
    ///
    /// # Errors
    ///
    /// Any engine error.
    pub fn get_location(&self) -> CompatResult<String> {
        self.engine.url()
    }

    /// Title of the active page
    ///
    /// # Errors
    ///
    /// Any engine error.
    pub fn get_title(&self) -> CompatResult<String> {
        self.engine.title()
    }

    /// Fail unless the URL equals `url`
    ///
    /// # Errors
    ///
    /// [`CompatError::AssertionFailed`] on mismatch.
    pub fn location_should_be(&self, url: &str, message: Option<&str>) -> CompatResult<()> {
        let actual = self.engine.url()?;
        if actual == url {
            return Ok(());
        }
        Err(CompatError::assertion(message.map_or_else(
            || format!("Location should have been '{url}' but was '{actual}'."),
            str::to_string,
        )))
    }

    /// Fail unless the URL contains `expected`
    ///
    /// # Errors
    ///
    /// [`CompatError::AssertionFailed`] on mismatch.
    pub fn location_should_contain(&self, expected: &str, message: Option<&str>) -> CompatResult<()> {
        let actual = self.engine.url()?;
        if actual.contains(expected) {
            return Ok(());
        }
        Err(CompatError::assertion(message.map_or_else(
            || format!("Location should have contained '{expected}' but it was '{actual}'."),
            str::to_string,
        )))
    }

    /// Fail unless the title equals `title`
    ///
    /// # Errors
    ///
    /// [`CompatError::AssertionFailed`] on mismatch.
    pub fn title_should_be(&self, title: &str, message: Option<&str>) -> CompatResult<()> {
        let actual = self.engine.title()?;
        if actual == title {
            return Ok(());
        }
        Err(CompatError::assertion(message.map_or_else(
            || format!("Title should have been '{title}' but was '{actual}'."),
            str::to_string,
        )))
    }

    /// Run JavaScript in the page; `arguments` is in scope
    ///
    /// # Errors
    ///
    /// Any engine error.
    pub fn execute_javascript(&self, code: &str) -> CompatResult<serde_json::Value> {
        self.engine.evaluate(None, &format!("(arguments) => {{{code}}}"))
    }
}
