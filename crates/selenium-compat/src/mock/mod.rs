//! In-memory automation engine.
//!
//! [`MockEngine`] keeps contexts, pages and elements in a `Mutex` and records
//! every call, so keyword code can be exercised without a browser:
//!
//! ```
//! use std::sync::Arc;
//! use selenium_compat::mock::{MockElement, MockEngine};
//! use selenium_compat::prelude::*;
//!
//! let engine = Arc::new(MockEngine::new());
//! let mut lib = SeleniumCompat::new(engine.clone(), CompatConfig::default());
//! lib.open_browser(Some("https://example.test"), "chrome", None).unwrap();
//! engine.add_element("id=save", MockElement::new("button")).unwrap();
//! lib.click_element("id=save").unwrap();
//! assert!(engine.was_called("click:id=save"));
//! ```
//!
//! Elements are registered against the exact native selector the keyword
//! layer produces, after the selector prefix is applied.

mod element;
mod engine;

pub use element::MockElement;
pub use engine::MockEngine;
