//! Result and error types for the compatibility layer.

use thiserror::Error;

/// Result type for compatibility-layer operations
pub type CompatResult<T> = Result<T, CompatError>;

/// Errors raised by the compatibility layer
#[derive(Debug, Error)]
pub enum CompatError {
    /// Locator uses a strategy that is illegal or was removed
    #[error(
        "Invalid locator strategy '{strategy}'.\nPlease use a supported locator strategy instead.\n{valid:?}"
    )]
    InvalidLocatorStrategy {
        /// Offending strategy name
        strategy: String,
        /// Strategies the translator accepts
        valid: Vec<String>,
    },

    /// The engine reported zero matches where one was required
    #[error("Element with locator '{locator}' not found.")]
    ElementNotFound {
        /// Locator exactly as the caller wrote it
        locator: String,
    },

    /// The locator matched nothing that is a checkbox input
    #[error("Checkbox with locator '{locator}' not found.")]
    CheckboxNotFound {
        /// Locator exactly as the caller wrote it
        locator: String,
    },

    /// A browser/session identifier did not resolve
    #[error("Browser '{identifier}' not found")]
    WindowNotFound {
        /// Identifier that failed to resolve
        identifier: String,
    },

    /// No page matched a window locator
    #[error("No window matching handle, name, title or URL '{locator}' found.")]
    NoMatchingWindow {
        /// Window locator that matched nothing
        locator: String,
    },

    /// Alias already bound to an open session
    #[error("Alias '{alias}' is already in use by an open browser")]
    DuplicateAlias {
        /// The alias
        alias: String,
    },

    /// A polling wait ran out of time
    #[error("{message}")]
    WaitTimeout {
        /// Final failure message
        message: String,
    },

    /// A `*_should_*` style check failed
    #[error("{message}")]
    AssertionFailed {
        /// Error message
        message: String,
    },

    /// Argument rejected before reaching the engine
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Error message
        message: String,
    },

    /// A JavaScript wait condition is not a function body
    #[error("Condition '{condition}' did not have mandatory 'return'.")]
    MissingReturn {
        /// The condition as given
        condition: String,
    },

    /// Failure reported by the automation engine
    #[error("Engine error: {message}")]
    Engine {
        /// Error message
        message: String,
    },

    /// Configuration could not be parsed
    #[error("Configuration error: {0}")]
    Config(#[from] serde_yaml_ng::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CompatError {
    /// Build an engine error from any message
    pub fn engine(message: impl Into<String>) -> Self {
        Self::Engine {
            message: message.into(),
        }
    }

    /// Build an assertion failure
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::AssertionFailed {
            message: message.into(),
        }
    }

    /// Message without the category prefix: the engine's own text for
    /// [`CompatError::Engine`], the full display otherwise
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::Engine { message } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Whether this error means "something was missing" rather than "wrong value"
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ElementNotFound { .. }
                | Self::CheckboxNotFound { .. }
                | Self::WindowNotFound { .. }
                | Self::NoMatchingWindow { .. }
        )
    }
}
