//! selenium-compat: legacy keyword surface over a selector-based engine
//!
//! Runs SeleniumLibrary-style keyword suites (prefixed locators, integer
//! browser ids, `wait_until_*` keywords, `<TIMEOUT>` failure messages) on top
//! of any engine that speaks Playwright-style selectors, browser contexts and
//! pages.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                     selenium-compat                               │
//! ├──────────────────────────────────────────────────────────────────┤
//! │  keyword call ──► LocatorTranslator ──► RoleLocatorResolver        │
//! │       │                                        │                  │
//! │       ├──► SessionCatalog (ids, aliases, pages)│                  │
//! │       ├──► PollingWaiter (<TIMEOUT> messages)  ▼                  │
//! │       └────────────────────────────► dyn AutomationEngine         │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use selenium_compat::mock::{MockElement, MockEngine};
//! use selenium_compat::prelude::*;
//!
//! let engine = Arc::new(MockEngine::new());
//! let mut lib = SeleniumCompat::new(engine.clone(), CompatConfig::default());
//! let index = lib.open_browser(Some("https://shop.test/"), "chrome", Some("shop")).unwrap();
//! assert_eq!(index, 0);
//!
//! engine
//!     .add_element("id=cart", MockElement::new("span").with_text("3 items"))
//!     .unwrap();
//! lib.wait_until_element_contains("id=cart", "3 items", Some(Duration::from_millis(100)), None)
//!     .unwrap();
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

/// Session catalog: synthetic browser ids, aliases and page lists
pub mod catalog;
/// Library configuration
pub mod config;
/// Engine contract and its value types
#[allow(clippy::missing_errors_doc)]
pub mod engine;
/// Keyword surface
#[allow(clippy::too_many_lines)]
pub mod keywords;
/// Legacy locator translation
pub mod locator;
/// Tracing subscriber setup
pub mod logging;
/// In-memory engine for tests and examples
pub mod mock;
/// Error types
pub mod result;
/// Role-based locator fallback
pub mod role;
/// Polling waits and timeout messages
pub mod wait;

pub use catalog::{reconcile, Reconciliation, SessionCatalog, SessionHandle, SessionRef};
pub use config::CompatConfig;
pub use engine::{
    AutomationEngine, BoundingBox, BrowserKind, ContextOptions, ContextSnapshot, ElementState,
    ElementStates, MouseButton, OpenedContext, PageSnapshot, SelectOption,
};
pub use keywords::{SeleniumCompat, WindowLocator};
pub use locator::{LocatorSpec, LocatorTranslator, StrategyRule};
pub use result::{CompatError, CompatResult};
pub use role::{Role, RoleLocatorResolver};
pub use wait::{format_timeout, PollingWaiter, WaitOutcome, WaitSpec};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::catalog::{SessionCatalog, SessionRef};
    pub use super::config::CompatConfig;
    pub use super::engine::{
        AutomationEngine, BrowserKind, ContextOptions, ElementState, ElementStates, MouseButton,
    };
    pub use super::keywords::{SeleniumCompat, WindowLocator};
    pub use super::locator::{LocatorSpec, LocatorTranslator, StrategyRule};
    pub use super::logging::init_tracing;
    pub use super::result::{CompatError, CompatResult};
    pub use super::role::{Role, RoleLocatorResolver};
    pub use super::wait::{PollingWaiter, WaitSpec};
}
