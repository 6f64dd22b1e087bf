//! Configuration for the compatibility layer.
//!
//! Loadable from YAML; every field has a default, so a partial file only
//! overrides what it names:
//!
//! ```yaml
//! timeout_ms: 10000
//! strict_mode: true
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::result::CompatResult;
use crate::wait::DEFAULT_POLL_INTERVAL_MS;

/// Default wait timeout (5 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

/// Default `switch_window` retry interval
pub const DEFAULT_WINDOW_POLL_INTERVAL_MS: u64 = 100;

/// Timeouts, polling and engine modes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompatConfig {
    /// Wait timeout used when a keyword gets none
    pub timeout_ms: u64,
    /// Implicit element wait
    pub implicit_wait_ms: u64,
    /// Polling interval of wait keywords
    pub poll_interval_ms: u64,
    /// Retry interval of `switch_window`
    pub window_poll_interval_ms: u64,
    /// Require locators to match a single element
    pub strict_mode: bool,
    /// Browser opened when none is named
    pub default_browser: String,
    /// Extra arguments passed to every browser launch
    pub browser_args: Vec<String>,
}

impl Default for CompatConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            implicit_wait_ms: 0,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            window_poll_interval_ms: DEFAULT_WINDOW_POLL_INTERVAL_MS,
            strict_mode: false,
            default_browser: "chrome".to_string(),
            browser_args: Vec::new(),
        }
    }
}

impl CompatConfig {
    /// Set the default wait timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = duration_ms(timeout);
        self
    }

    /// Set the wait polling interval
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval_ms = duration_ms(interval);
        self
    }

    /// Set the `switch_window` retry interval
    #[must_use]
    pub fn with_window_poll_interval(mut self, interval: Duration) -> Self {
        self.window_poll_interval_ms = duration_ms(interval);
        self
    }

    /// Set the launch arguments used by `open_browser`
    #[must_use]
    pub fn with_browser_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.browser_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Toggle strict mode
    #[must_use]
    pub const fn with_strict_mode(mut self, strict: bool) -> Self {
        self.strict_mode = strict;
        self
    }

    /// Default wait timeout
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Wait polling interval
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// `switch_window` retry interval
    #[must_use]
    pub const fn window_poll_interval(&self) -> Duration {
        Duration::from_millis(self.window_poll_interval_ms)
    }

    /// Parse from YAML
    ///
    /// # Errors
    /// Returns error if YAML parsing fails
    pub fn from_yaml_str(yaml: &str) -> CompatResult<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Read and parse a YAML file
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed
    pub fn from_file(path: impl AsRef<Path>) -> CompatResult<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Serialize to YAML
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn to_yaml(&self) -> CompatResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
