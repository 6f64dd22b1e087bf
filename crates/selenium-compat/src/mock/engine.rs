use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::element::MockElement;
use crate::engine::{
    AutomationEngine, BoundingBox, ContextOptions, ContextSnapshot, ElementState, ElementStates,
    MouseButton, OpenedContext, PageSnapshot, SelectOption, WINDOW_ID_SCRIPT, WINDOW_NAME_SCRIPT,
};
use crate::result::{CompatError, CompatResult};

const BLANK_URL: &str = "about:blank";

// =============================================================================
// STATE
// =============================================================================

#[derive(Debug, Clone)]
struct MockPage {
    id: String,
    url: String,
    title: String,
    name: String,
    window_id: String,
    history: Vec<String>,
    elements: HashMap<String, Vec<MockElement>>,
}

impl MockPage {
    fn new(url: &str, title: &str) -> Self {
        Self {
            id: format!("page_{}", uuid::Uuid::new_v4()),
            url: url.to_string(),
            title: title.to_string(),
            name: String::new(),
            window_id: String::new(),
            history: Vec::new(),
            elements: HashMap::new(),
        }
    }

    fn snapshot(&self) -> PageSnapshot {
        PageSnapshot {
            id: self.id.clone(),
            url: self.url.clone(),
            title: self.title.clone(),
        }
    }
}

#[derive(Debug, Clone)]
struct MockContext {
    id: String,
    pages: Vec<MockPage>,
    current_page: Option<String>,
}

#[derive(Debug, Default)]
struct MockState {
    counter: u64,
    contexts: Vec<MockContext>,
    active_context: Option<String>,
    unvisited: Vec<String>,
    selector_prefix: Option<String>,
    strict: bool,
    scripts: Vec<(String, Value)>,
    viewport: Option<(u32, u32)>,
    shutdowns: usize,
    call_history: Vec<String>,
}

impl MockState {
    fn context(&self) -> CompatResult<&MockContext> {
        let id = self
            .active_context
            .as_deref()
            .ok_or_else(|| CompatError::engine("no active context"))?;
        self.contexts
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| CompatError::engine(format!("context '{id}' is closed")))
    }

    fn context_mut(&mut self) -> CompatResult<&mut MockContext> {
        let id = self
            .active_context
            .clone()
            .ok_or_else(|| CompatError::engine("no active context"))?;
        self.contexts
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| CompatError::engine(format!("context '{id}' is closed")))
    }

    fn page(&self) -> CompatResult<&MockPage> {
        let context = self.context()?;
        let id = context
            .current_page
            .as_deref()
            .ok_or_else(|| CompatError::engine("no active page"))?;
        context
            .pages
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| CompatError::engine(format!("page '{id}' is closed")))
    }

    fn page_mut(&mut self) -> CompatResult<&mut MockPage> {
        let context = self.context_mut()?;
        let id = context
            .current_page
            .clone()
            .ok_or_else(|| CompatError::engine("no active page"))?;
        context
            .pages
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| CompatError::engine(format!("page '{id}' is closed")))
    }

    fn active_page_id(&self) -> Option<String> {
        self.context().ok().and_then(|c| c.current_page.clone())
    }

    fn scoped(&self, selector: &str) -> String {
        match &self.selector_prefix {
            Some(prefix) => format!("{prefix} {selector}"),
            None => selector.to_string(),
        }
    }

    fn matches(&self, selector: &str) -> CompatResult<&[MockElement]> {
        let key = self.scoped(selector);
        Ok(self
            .page()?
            .elements
            .get(&key)
            .map_or(&[][..], Vec::as_slice))
    }

    fn first(&self, selector: &str) -> CompatResult<&MockElement> {
        let found = self.matches(selector)?;
        if self.strict && found.len() > 1 {
            return Err(CompatError::engine(format!(
                "strict mode violation: '{selector}' resolved to {} elements",
                found.len()
            )));
        }
        found
            .first()
            .ok_or_else(|| CompatError::engine(format!("no element matches '{selector}'")))
    }

    fn first_mut(&mut self, selector: &str) -> CompatResult<&mut MockElement> {
        let key = self.scoped(selector);
        self.page_mut()?
            .elements
            .get_mut(&key)
            .and_then(|found| found.first_mut())
            .ok_or_else(|| CompatError::engine(format!("no element matches '{selector}'")))
    }

    fn record(&mut self, call: String) {
        self.call_history.push(call);
    }
}

// =============================================================================
// MOCK ENGINE
// =============================================================================

/// Mutex-backed [`AutomationEngine`] for tests
#[derive(Debug, Default)]
pub struct MockEngine {
    state: Mutex<MockState>,
}

impl MockEngine {
    /// Engine with no contexts
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> CompatResult<MutexGuard<'_, MockState>> {
        self.state
            .lock()
            .map_err(|_| CompatError::engine("mock engine state poisoned"))
    }

    // --- fixtures -----------------------------------------------------------

    /// Register one more match for `selector` on the active page
    ///
    /// # Errors
    ///
    /// Fails when no page is active.
    pub fn add_element(&self, selector: &str, element: MockElement) -> CompatResult<()> {
        let mut state = self.lock()?;
        state
            .page_mut()?
            .elements
            .entry(selector.to_string())
            .or_default()
            .push(element);
        Ok(())
    }

    /// Replace every match for `selector` on the active page
    ///
    /// # Errors
    ///
    /// Fails when no page is active.
    pub fn set_elements(&self, selector: &str, elements: Vec<MockElement>) -> CompatResult<()> {
        let mut state = self.lock()?;
        let page = state.page_mut()?;
        if elements.is_empty() {
            page.elements.remove(selector);
        } else {
            page.elements.insert(selector.to_string(), elements);
        }
        Ok(())
    }

    /// Open a page in the active context without activating it
    ///
    /// # Errors
    ///
    /// Fails when no context is active.
    pub fn spawn_page(&self, url: &str, title: &str) -> CompatResult<String> {
        let mut state = self.lock()?;
        let page = MockPage::new(url, title);
        let id = page.id.clone();
        state.context_mut()?.pages.push(page);
        state.unvisited.push(id.clone());
        Ok(id)
    }

    /// Close a page from the engine side (popup closing itself)
    ///
    /// # Errors
    ///
    /// Fails when no context holds the page.
    pub fn remove_page(&self, page_id: &str) -> CompatResult<()> {
        let mut state = self.lock()?;
        let context = state
            .contexts
            .iter_mut()
            .find(|c| c.pages.iter().any(|p| p.id == page_id))
            .ok_or_else(|| CompatError::engine(format!("page '{page_id}' is closed")))?;
        context.pages.retain(|p| p.id != page_id);
        if context.current_page.as_deref() == Some(page_id) {
            context.current_page = context.pages.last().map(|p| p.id.clone());
        }
        state.unvisited.retain(|id| id != page_id);
        Ok(())
    }

    /// Set `window.name` of the active page
    ///
    /// # Errors
    ///
    /// Fails when no page is active.
    pub fn set_window_name(&self, name: &str) -> CompatResult<()> {
        self.lock()?.page_mut()?.name = name.to_string();
        Ok(())
    }

    /// Set `window.id` of the active page
    ///
    /// # Errors
    ///
    /// Fails when no page is active.
    pub fn set_window_id(&self, id: &str) -> CompatResult<()> {
        self.lock()?.page_mut()?.window_id = id.to_string();
        Ok(())
    }

    /// Set the title of the active page
    ///
    /// # Errors
    ///
    /// Fails when no page is active.
    pub fn set_title(&self, title: &str) -> CompatResult<()> {
        self.lock()?.page_mut()?.title = title.to_string();
        Ok(())
    }

    /// Set the URL of the active page without recording history
    ///
    /// # Errors
    ///
    /// Fails when no page is active.
    pub fn set_url(&self, url: &str) -> CompatResult<()> {
        self.lock()?.page_mut()?.url = url.to_string();
        Ok(())
    }

    /// Answer any evaluated script containing `fragment` with `result`.
    /// The most recent registration wins.
    pub fn set_script_result(&self, fragment: &str, result: impl Into<Value>) {
        if let Ok(mut state) = self.lock() {
            state.scripts.push((fragment.to_string(), result.into()));
        }
    }

    // --- inspection ---------------------------------------------------------

    /// Recorded calls, `method:args`
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.lock().map(|s| s.call_history.clone()).unwrap_or_default()
    }

    /// Whether a recorded call starts with `call`
    #[must_use]
    pub fn was_called(&self, call: &str) -> bool {
        self.lock()
            .map(|s| s.call_history.iter().any(|c| c.starts_with(call)))
            .unwrap_or(false)
    }

    /// Number of open contexts
    #[must_use]
    pub fn context_count(&self) -> usize {
        self.lock().map(|s| s.contexts.len()).unwrap_or(0)
    }

    /// How often `shutdown` was called
    #[must_use]
    pub fn shutdown_count(&self) -> usize {
        self.lock().map(|s| s.shutdowns).unwrap_or(0)
    }

    /// Current selector prefix
    #[must_use]
    pub fn selector_prefix(&self) -> Option<String> {
        self.lock().ok().and_then(|s| s.selector_prefix.clone())
    }

    /// Whether strict mode is on
    #[must_use]
    pub fn is_strict(&self) -> bool {
        self.lock().map(|s| s.strict).unwrap_or(false)
    }

    /// Last viewport size set
    #[must_use]
    pub fn viewport(&self) -> Option<(u32, u32)> {
        self.lock().ok().and_then(|s| s.viewport)
    }
}

// =============================================================================
// ENGINE CONTRACT
// =============================================================================

impl AutomationEngine for MockEngine {
    fn new_context(&self, options: &ContextOptions) -> CompatResult<OpenedContext> {
        let mut state = self.lock()?;
        state.counter += 1;
        let context_id = format!("ctx_{}", state.counter);
        let page = MockPage::new(options.url.as_deref().unwrap_or(BLANK_URL), "");
        let page_id = page.id.clone();
        state.contexts.push(MockContext {
            id: context_id.clone(),
            pages: vec![page],
            current_page: Some(page_id.clone()),
        });
        state.active_context = Some(context_id.clone());
        if options.args.is_empty() {
            state.record(format!("new_context:{}", options.browser));
        } else {
            state.record(format!(
                "new_context:{}:{}",
                options.browser,
                options.args.join(" ")
            ));
        }
        Ok(OpenedContext {
            context_id,
            page_id,
        })
    }

    fn active_context(&self) -> CompatResult<String> {
        self.lock()?
            .active_context
            .clone()
            .ok_or_else(|| CompatError::engine("no active context"))
    }

    fn switch_context(&self, context_id: &str) -> CompatResult<String> {
        let mut state = self.lock()?;
        if !state.contexts.iter().any(|c| c.id == context_id) {
            return Err(CompatError::engine(format!("no context '{context_id}'")));
        }
        let previous = state.active_context.replace(context_id.to_string());
        state.record(format!("switch_context:{context_id}"));
        Ok(previous.unwrap_or_default())
    }

    fn close_context(&self, context_id: &str) -> CompatResult<()> {
        let mut state = self.lock()?;
        let Some(index) = state.contexts.iter().position(|c| c.id == context_id) else {
            return Err(CompatError::engine(format!("no context '{context_id}'")));
        };
        let closed = state.contexts.remove(index);
        state
            .unvisited
            .retain(|id| !closed.pages.iter().any(|p| &p.id == id));
        if state.active_context.as_deref() == Some(context_id) {
            state.active_context = state.contexts.last().map(|c| c.id.clone());
        }
        state.record(format!("close_context:{context_id}"));
        Ok(())
    }

    fn close_all_contexts(&self) -> CompatResult<()> {
        let mut state = self.lock()?;
        state.contexts.clear();
        state.unvisited.clear();
        state.active_context = None;
        state.record("close_all_contexts".to_string());
        Ok(())
    }

    fn shutdown(&self) -> CompatResult<()> {
        let mut state = self.lock()?;
        state.contexts.clear();
        state.unvisited.clear();
        state.active_context = None;
        state.shutdowns += 1;
        state.record("shutdown".to_string());
        Ok(())
    }

    fn catalog(&self) -> CompatResult<Vec<ContextSnapshot>> {
        let state = self.lock()?;
        Ok(state
            .contexts
            .iter()
            .map(|c| ContextSnapshot {
                id: c.id.clone(),
                pages: c.pages.iter().map(MockPage::snapshot).collect(),
            })
            .collect())
    }

    fn page_ids(&self) -> CompatResult<Vec<String>> {
        let state = self.lock()?;
        Ok(state.context()?.pages.iter().map(|p| p.id.clone()).collect())
    }

    fn active_page(&self) -> CompatResult<String> {
        let state = self.lock()?;
        Ok(state.page()?.id.clone())
    }

    fn switch_page(&self, page_id: &str) -> CompatResult<String> {
        let mut state = self.lock()?;
        let previous = state.active_page_id().unwrap_or_default();
        let context = state
            .contexts
            .iter_mut()
            .find(|c| c.pages.iter().any(|p| p.id == page_id))
            .ok_or_else(|| CompatError::engine(format!("no page '{page_id}'")))?;
        context.current_page = Some(page_id.to_string());
        let context_id = context.id.clone();
        state.active_context = Some(context_id);
        state.unvisited.retain(|id| id != page_id);
        state.record(format!("switch_page:{page_id}"));
        Ok(previous)
    }

    fn switch_to_new_page(&self) -> CompatResult<String> {
        let newest = self
            .lock()?
            .unvisited
            .last()
            .cloned()
            .ok_or_else(|| CompatError::engine("no new page to switch to"))?;
        self.switch_page(&newest)?;
        Ok(newest)
    }

    fn close_page(&self) -> CompatResult<()> {
        let mut state = self.lock()?;
        let context = state.context_mut()?;
        let closing = context
            .current_page
            .take()
            .ok_or_else(|| CompatError::engine("no active page"))?;
        context.pages.retain(|p| p.id != closing);
        context.current_page = context.pages.last().map(|p| p.id.clone());
        state.unvisited.retain(|id| id != &closing);
        state.record(format!("close_page:{closing}"));
        Ok(())
    }

    fn element_count(&self, selector: &str) -> CompatResult<usize> {
        Ok(self.lock()?.matches(selector)?.len())
    }

    fn text(&self, selector: &str) -> CompatResult<String> {
        Ok(self.lock()?.first(selector)?.text.clone())
    }

    fn attribute(&self, selector: &str, name: &str) -> CompatResult<Option<String>> {
        Ok(self.lock()?.first(selector)?.attributes.get(name).cloned())
    }

    fn property(&self, selector: &str, name: &str) -> CompatResult<Value> {
        Ok(self.lock()?.first(selector)?.property(name))
    }

    fn element_states(&self, selector: &str) -> CompatResult<ElementStates> {
        let state = self.lock()?;
        Ok(state
            .matches(selector)?
            .first()
            .map(|el| el.states.clone())
            .unwrap_or_default())
    }

    fn bounding_box(&self, selector: &str) -> CompatResult<BoundingBox> {
        Ok(self.lock()?.first(selector)?.bounding_box)
    }

    fn select_options(&self, selector: &str) -> CompatResult<Vec<SelectOption>> {
        Ok(self.lock()?.first(selector)?.options.clone())
    }

    fn click(&self, selector: &str, button: MouseButton) -> CompatResult<()> {
        let mut state = self.lock()?;
        state.first(selector)?;
        let call = match button {
            MouseButton::Left => format!("click:{selector}"),
            other => format!("click:{selector}:{other:?}"),
        };
        state.record(call);
        Ok(())
    }

    fn fill(&self, selector: &str, text: &str) -> CompatResult<()> {
        let mut state = self.lock()?;
        let element = state.first_mut(selector)?;
        if !element.states.is_enabled() {
            return Err(CompatError::engine(format!("element '{selector}' is not editable")));
        }
        element
            .properties
            .insert("value".to_string(), Value::String(text.to_string()));
        state.record(format!("fill:{selector}:{text}"));
        Ok(())
    }

    fn clear(&self, selector: &str) -> CompatResult<()> {
        self.fill(selector, "")
    }

    fn hover(&self, selector: &str) -> CompatResult<()> {
        let mut state = self.lock()?;
        state.first(selector)?;
        state.record(format!("hover:{selector}"));
        Ok(())
    }

    fn check(&self, selector: &str) -> CompatResult<()> {
        let mut state = self.lock()?;
        let element = state.first_mut(selector)?;
        element.states = element.states.clone().with(ElementState::Checked);
        state.record(format!("check:{selector}"));
        Ok(())
    }

    fn uncheck(&self, selector: &str) -> CompatResult<()> {
        let mut state = self.lock()?;
        let element = state.first_mut(selector)?;
        element.states = element.states.clone().without(ElementState::Checked);
        state.record(format!("uncheck:{selector}"));
        Ok(())
    }

    fn press_keys(&self, selector: &str, keys: &[&str]) -> CompatResult<()> {
        let mut state = self.lock()?;
        state.first(selector)?;
        state.record(format!("press_keys:{selector}:{}", keys.join("+")));
        Ok(())
    }

    fn drag_and_drop(&self, source: &str, target: &str) -> CompatResult<()> {
        let mut state = self.lock()?;
        state.first(source)?;
        state.first(target)?;
        state.record(format!("drag_and_drop:{source}:{target}"));
        Ok(())
    }

    fn go_to(&self, url: &str) -> CompatResult<()> {
        let mut state = self.lock()?;
        let page = state.page_mut()?;
        let previous = std::mem::replace(&mut page.url, url.to_string());
        page.history.push(previous);
        state.record(format!("go_to:{url}"));
        Ok(())
    }

    fn go_back(&self) -> CompatResult<()> {
        let mut state = self.lock()?;
        let page = state.page_mut()?;
        if let Some(previous) = page.history.pop() {
            page.url = previous;
        }
        state.record("go_back".to_string());
        Ok(())
    }

    fn reload(&self) -> CompatResult<()> {
        let mut state = self.lock()?;
        state.page()?;
        state.record("reload".to_string());
        Ok(())
    }

    fn set_viewport_size(&self, width: u32, height: u32) -> CompatResult<()> {
        let mut state = self.lock()?;
        state.viewport = Some((width, height));
        state.record(format!("set_viewport_size:{width}x{height}"));
        Ok(())
    }

    fn url(&self) -> CompatResult<String> {
        Ok(self.lock()?.page()?.url.clone())
    }

    fn title(&self) -> CompatResult<String> {
        Ok(self.lock()?.page()?.title.clone())
    }

    fn evaluate(&self, selector: Option<&str>, script: &str) -> CompatResult<Value> {
        let mut state = self.lock()?;
        if let Some(selector) = selector {
            state.first(selector)?;
        }
        state.record(format!("evaluate:{script}"));
        if script == WINDOW_NAME_SCRIPT {
            return Ok(Value::String(state.page()?.name.clone()));
        }
        if script == WINDOW_ID_SCRIPT {
            return Ok(Value::String(state.page()?.window_id.clone()));
        }
        state
            .scripts
            .iter()
            .rev()
            .find(|(fragment, _)| script.contains(fragment.as_str()))
            .map(|(_, result)| result.clone())
            .ok_or_else(|| CompatError::engine(format!("no scripted result for '{script}'")))
    }

    fn set_selector_prefix(&self, prefix: Option<&str>) -> CompatResult<()> {
        let mut state = self.lock()?;
        state.selector_prefix = prefix.filter(|p| !p.is_empty()).map(str::to_string);
        state.record(format!("set_selector_prefix:{}", prefix.unwrap_or_default()));
        Ok(())
    }

    fn set_strict_mode(&self, strict: bool) -> CompatResult<()> {
        let mut state = self.lock()?;
        state.strict = strict;
        state.record(format!("set_strict_mode:{strict}"));
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn engine_with_page() -> MockEngine {
        let engine = MockEngine::new();
        engine
            .new_context(&ContextOptions::new().with_url("https://start.test/"))
            .unwrap();
        engine
    }

    mod session_tests {
        use super::*;

        #[test]
        fn test_new_context_activates_it() {
            let engine = MockEngine::new();
            let first = engine.new_context(&ContextOptions::new()).unwrap();
            let second = engine.new_context(&ContextOptions::new()).unwrap();
            assert_ne!(first.context_id, second.context_id);
            assert_eq!(engine.active_context().unwrap(), second.context_id);
            assert_eq!(engine.active_page().unwrap(), second.page_id);
            assert_eq!(engine.url().unwrap(), BLANK_URL);
        }

        #[test]
        fn test_switch_context_returns_previous() {
            let engine = MockEngine::new();
            let a = engine.new_context(&ContextOptions::new()).unwrap();
            let b = engine.new_context(&ContextOptions::new()).unwrap();
            assert_eq!(engine.switch_context(&a.context_id).unwrap(), b.context_id);
            assert_eq!(engine.active_page().unwrap(), a.page_id);
            assert!(engine.switch_context("ctx_99").is_err());
        }

        #[test]
        fn test_close_active_context_falls_back_to_last() {
            let engine = MockEngine::new();
            let a = engine.new_context(&ContextOptions::new()).unwrap();
            let b = engine.new_context(&ContextOptions::new()).unwrap();
            engine.close_context(&b.context_id).unwrap();
            assert_eq!(engine.active_context().unwrap(), a.context_id);
            engine.close_context(&a.context_id).unwrap();
            assert!(engine.active_context().is_err());
        }

        #[test]
        fn test_catalog_lists_pages() {
            let engine = engine_with_page();
            engine.spawn_page("https://popup.test/", "Popup").unwrap();
            let catalog = engine.catalog().unwrap();
            assert_eq!(catalog.len(), 1);
            assert_eq!(catalog[0].pages.len(), 2);
            assert_eq!(catalog[0].pages[1].title, "Popup");
        }
    }

    mod page_tests {
        use super::*;

        #[test]
        fn test_switch_to_new_page_takes_newest_unvisited() {
            let engine = engine_with_page();
            let original = engine.active_page().unwrap();
            let a = engine.spawn_page("https://a.test/", "A").unwrap();
            let b = engine.spawn_page("https://b.test/", "B").unwrap();
            assert_eq!(engine.switch_to_new_page().unwrap(), b);
            assert_eq!(engine.title().unwrap(), "B");
            engine.switch_page(&original).unwrap();
            assert_eq!(engine.switch_to_new_page().unwrap(), a);
            assert_eq!(engine.title().unwrap(), "A");
            assert!(engine.switch_to_new_page().is_err());
        }

        #[test]
        fn test_close_page_activates_remaining() {
            let engine = engine_with_page();
            let first = engine.active_page().unwrap();
            let popup = engine.spawn_page("https://p.test/", "P").unwrap();
            engine.switch_page(&popup).unwrap();
            engine.close_page().unwrap();
            assert_eq!(engine.active_page().unwrap(), first);
            assert_eq!(engine.page_ids().unwrap(), vec![first]);
        }

        #[test]
        fn test_navigation_history() {
            let engine = engine_with_page();
            engine.go_to("https://next.test/").unwrap();
            assert_eq!(engine.url().unwrap(), "https://next.test/");
            engine.go_back().unwrap();
            assert_eq!(engine.url().unwrap(), "https://start.test/");
        }
    }

    mod element_tests {
        use super::*;

        #[test]
        fn test_missing_element_is_detached() {
            let engine = engine_with_page();
            assert_eq!(engine.element_count("id=x").unwrap(), 0);
            assert_eq!(engine.element_states("id=x").unwrap(), ElementStates::new());
            assert!(engine.text("id=x").is_err());
        }

        #[test]
        fn test_selector_prefix_scopes_lookups() {
            let engine = engine_with_page();
            engine
                .add_element("id=frame >>> id=x", MockElement::new("div").with_text("inner"))
                .unwrap();
            assert_eq!(engine.element_count("id=x").unwrap(), 0);
            engine.set_selector_prefix(Some("id=frame >>>")).unwrap();
            assert_eq!(engine.text("id=x").unwrap(), "inner");
            engine.set_selector_prefix(None).unwrap();
            assert!(engine.selector_prefix().is_none());
        }

        #[test]
        fn test_strict_mode_rejects_multiple_matches() {
            let engine = engine_with_page();
            engine
                .set_elements("css=li", vec![MockElement::new("li"), MockElement::new("li")])
                .unwrap();
            assert!(engine.text("css=li").is_ok());
            engine.set_strict_mode(true).unwrap();
            assert!(engine.text("css=li").is_err());
            assert_eq!(engine.element_count("css=li").unwrap(), 2);
        }

        #[test]
        fn test_fill_and_check() {
            let engine = engine_with_page();
            engine.add_element("id=q", MockElement::new("input")).unwrap();
            engine.fill("id=q", "rust").unwrap();
            assert_eq!(engine.property("id=q", "value").unwrap(), Value::from("rust"));
            engine.check("id=q").unwrap();
            assert!(engine
                .element_states("id=q")
                .unwrap()
                .contains(ElementState::Checked));
            assert!(engine.was_called("fill:id=q:rust"));
        }

        #[test]
        fn test_fill_disabled_fails() {
            let engine = engine_with_page();
            engine
                .add_element("id=q", MockElement::new("input").disabled())
                .unwrap();
            assert!(engine.fill("id=q", "x").is_err());
        }
    }

    mod evaluate_tests {
        use super::*;

        #[test]
        fn test_window_name_script() {
            let engine = engine_with_page();
            engine.set_window_name("main").unwrap();
            assert_eq!(
                engine.evaluate(None, WINDOW_NAME_SCRIPT).unwrap(),
                Value::from("main")
            );
        }

        #[test]
        fn test_fragment_match_latest_wins() {
            let engine = engine_with_page();
            engine.set_script_result("document.readyState", false);
            engine.set_script_result("document.readyState", true);
            let result = engine
                .evaluate(None, "(arguments) => {return document.readyState == 'complete'}")
                .unwrap();
            assert_eq!(result, Value::Bool(true));
            assert!(engine.evaluate(None, "unknown()").is_err());
        }
    }
}
