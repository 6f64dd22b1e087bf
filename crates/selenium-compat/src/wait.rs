//! Polling waits.
//!
//! Every `wait_until_*` keyword funnels through [`PollingWaiter::wait_until`]:
//! poll a predicate until it returns `Ok(true)` or the deadline passes.
//!
//! ## Failure message priority
//!
//! 1. The error returned by the *final* poll, if it returned one
//! 2. The caller's custom error, verbatim
//! 3. The default template with `<TIMEOUT>` replaced by [`format_timeout`]

use std::fmt::Display;
use std::time::{Duration, Instant};

use crate::result::{CompatError, CompatResult};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default polling interval (200ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 200;

/// Placeholder replaced by the rendered timeout in error templates
pub const TIMEOUT_PLACEHOLDER: &str = "<TIMEOUT>";

// =============================================================================
// TIMEOUT RENDERING
// =============================================================================

const UNITS: [(u128, &str); 5] = [
    (86_400_000, "day"),
    (3_600_000, "hour"),
    (60_000, "minute"),
    (1_000, "second"),
    (1, "millisecond"),
];

/// Render a duration the way legacy error messages spell it.
///
/// `200ms` → `200 milliseconds`, `90s` → `1 minute 30 seconds`,
/// zero → `0 seconds`. Sub-millisecond precision is rounded away.
#[must_use]
pub fn format_timeout(timeout: Duration) -> String {
    let mut remaining = (timeout.as_micros() + 500) / 1000;
    if remaining == 0 {
        return "0 seconds".to_string();
    }
    let mut parts = Vec::new();
    for (unit_ms, name) in UNITS {
        let count = remaining / unit_ms;
        remaining %= unit_ms;
        match count {
            0 => {}
            1 => parts.push(format!("1 {name}")),
            n => parts.push(format!("{n} {name}s")),
        }
    }
    parts.join(" ")
}

// =============================================================================
// WAIT SPEC
// =============================================================================

/// Per-call wait descriptor: timeout plus failure wording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitSpec {
    timeout: Duration,
    error_template: String,
    custom_error: Option<String>,
}

impl WaitSpec {
    /// Create a spec with a default error template containing `<TIMEOUT>`
    #[must_use]
    pub fn new(timeout: Duration, error_template: impl Into<String>) -> Self {
        Self {
            timeout,
            error_template: error_template.into(),
            custom_error: None,
        }
    }

    /// Replace the template with a caller-supplied message
    #[must_use]
    pub fn with_custom_error(mut self, custom_error: Option<String>) -> Self {
        self.custom_error = custom_error;
        self
    }

    /// Total time allowed
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Message raised when the final poll returned `Ok(false)`
    #[must_use]
    pub fn failure_message(&self) -> String {
        match &self.custom_error {
            Some(custom) => custom.clone(),
            None => self
                .error_template
                .replace(TIMEOUT_PLACEHOLDER, &format_timeout(self.timeout)),
        }
    }
}

/// Statistics of a successful wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOutcome {
    /// Number of predicate evaluations, including the successful one
    pub attempts: usize,
    /// Time spent waiting
    pub elapsed: Duration,
}

// =============================================================================
// WAITER
// =============================================================================

/// Blocking poll-until-true loop with a wall-clock deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingWaiter {
    poll_interval: Duration,
}

impl Default for PollingWaiter {
    fn default() -> Self {
        Self::new()
    }
}

impl PollingWaiter {
    /// Waiter polling every 200ms
    #[must_use]
    pub const fn new() -> Self {
        Self {
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }

    /// Set the polling interval
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Polling interval
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Poll `predicate` until it returns `Ok(true)`.
    ///
    /// An `Err` from the predicate means "not yet": the loop keeps polling and
    /// remembers the error text. An `Ok(false)` forgets any remembered error.
    ///
    /// # Errors
    ///
    /// Returns [`CompatError::WaitTimeout`] once the deadline passes, worded by
    /// the priority described in the module docs.
    pub fn wait_until<F, E>(&self, mut predicate: F, spec: &WaitSpec) -> CompatResult<WaitOutcome>
    where
        F: FnMut() -> Result<bool, E>,
        E: Display,
    {
        let start = Instant::now();
        let deadline = start.checked_add(spec.timeout);
        let mut attempts = 0;
        let mut last_failure: Option<String> = None;

        while deadline.map_or(true, |d| Instant::now() < d) {
            attempts += 1;
            match predicate() {
                Ok(true) => {
                    let elapsed = start.elapsed();
                    tracing::trace!(attempts, ?elapsed, "wait condition met");
                    return Ok(WaitOutcome { attempts, elapsed });
                }
                Ok(false) => last_failure = None,
                // the condition is still pending; keep the reason for the final message
                Err(err) => last_failure = Some(err.to_string()),
            }
            std::thread::sleep(self.poll_interval);
        }

        tracing::debug!(attempts, timeout = ?spec.timeout, "wait timed out");
        Err(CompatError::WaitTimeout {
            message: last_failure.unwrap_or_else(|| spec.failure_message()),
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn message(err: CompatError) -> String {
        match err {
            CompatError::WaitTimeout { message } => message,
            other => panic!("expected WaitTimeout, got {other:?}"),
        }
    }

    mod format_timeout_tests {
        use super::*;

        #[test]
        fn test_milliseconds() {
            assert_eq!(format_timeout(Duration::from_millis(200)), "200 milliseconds");
            assert_eq!(format_timeout(Duration::from_millis(1)), "1 millisecond");
        }

        #[test]
        fn test_seconds_and_compound() {
            assert_eq!(format_timeout(Duration::from_secs(1)), "1 second");
            assert_eq!(format_timeout(Duration::from_secs(5)), "5 seconds");
            assert_eq!(format_timeout(Duration::from_secs(90)), "1 minute 30 seconds");
            assert_eq!(
                format_timeout(Duration::from_millis(3_723_500)),
                "1 hour 2 minutes 3 seconds 500 milliseconds"
            );
            assert_eq!(format_timeout(Duration::from_secs(2 * 86_400)), "2 days");
        }

        #[test]
        fn test_zero_and_rounding() {
            assert_eq!(format_timeout(Duration::ZERO), "0 seconds");
            assert_eq!(format_timeout(Duration::from_micros(400)), "0 seconds");
            assert_eq!(format_timeout(Duration::from_micros(1_600)), "2 milliseconds");
        }
    }

    mod wait_spec_tests {
        use super::*;

        #[test]
        fn test_template_substitution() {
            let spec = WaitSpec::new(Duration::from_secs(5), "Gone in <TIMEOUT>.");
            assert_eq!(spec.failure_message(), "Gone in 5 seconds.");
        }

        #[test]
        fn test_custom_error_verbatim() {
            let spec = WaitSpec::new(Duration::from_secs(5), "Gone in <TIMEOUT>.")
                .with_custom_error(Some("Mine after <TIMEOUT>".into()));
            assert_eq!(spec.failure_message(), "Mine after <TIMEOUT>");
        }
    }

    mod waiter_tests {
        use super::*;

        #[test]
        fn test_success_returns_without_sleeping_full_timeout() {
            let spec = WaitSpec::new(Duration::from_secs(1), "never");
            let start = Instant::now();
            let outcome = PollingWaiter::new()
                .wait_until(|| Ok::<_, String>(true), &spec)
                .unwrap();
            assert_eq!(outcome.attempts, 1);
            assert!(start.elapsed() < Duration::from_millis(DEFAULT_POLL_INTERVAL_MS));
        }

        #[test]
        fn test_timeout_literal_message() {
            let spec = WaitSpec::new(Duration::from_millis(200), "X did not happen in <TIMEOUT>.");
            let start = Instant::now();
            let err = PollingWaiter::new()
                .wait_until(|| Ok::<_, String>(false), &spec)
                .unwrap_err();
            assert!(start.elapsed() >= Duration::from_millis(200));
            assert_eq!(message(err), "X did not happen in 200 milliseconds.");
        }

        #[test]
        fn test_errors_count_as_pending() {
            let calls = Cell::new(0);
            let spec = WaitSpec::new(Duration::from_secs(5), "never ready");
            let outcome = PollingWaiter::new()
                .with_poll_interval(Duration::from_millis(10))
                .wait_until(
                    || {
                        calls.set(calls.get() + 1);
                        if calls.get() < 5 {
                            Err("not ready")
                        } else {
                            Ok(true)
                        }
                    },
                    &spec,
                )
                .unwrap();
            assert_eq!(outcome.attempts, 5);
            assert_eq!(calls.get(), 5);
        }

        #[test]
        fn test_final_error_beats_custom_error() {
            let spec = WaitSpec::new(Duration::from_millis(50), "template <TIMEOUT>")
                .with_custom_error(Some("custom".into()));
            let err = PollingWaiter::new()
                .with_poll_interval(Duration::from_millis(5))
                .wait_until(|| Err::<bool, _>("element detached"), &spec)
                .unwrap_err();
            assert_eq!(message(err), "element detached");
        }

        #[test]
        fn test_false_after_error_uses_custom_error() {
            let calls = Cell::new(0);
            let spec = WaitSpec::new(Duration::from_millis(60), "template <TIMEOUT>")
                .with_custom_error(Some("custom after <TIMEOUT>".into()));
            let err = PollingWaiter::new()
                .with_poll_interval(Duration::from_millis(5))
                .wait_until(
                    || {
                        calls.set(calls.get() + 1);
                        if calls.get() == 1 {
                            Err("transient")
                        } else {
                            Ok(false)
                        }
                    },
                    &spec,
                )
                .unwrap_err();
            assert_eq!(message(err), "custom after <TIMEOUT>");
        }

        #[test]
        fn test_false_without_custom_uses_template() {
            let spec = WaitSpec::new(Duration::from_millis(30), "Text 'a' did not appear in <TIMEOUT>.");
            let err = PollingWaiter::new()
                .with_poll_interval(Duration::from_millis(5))
                .wait_until(|| Ok::<_, String>(false), &spec)
                .unwrap_err();
            assert_eq!(message(err), "Text 'a' did not appear in 30 milliseconds.");
        }

        #[test]
        fn test_zero_timeout_never_polls() {
            let calls = Cell::new(0);
            let spec = WaitSpec::new(Duration::ZERO, "none in <TIMEOUT>");
            let err = PollingWaiter::new()
                .wait_until(
                    || {
                        calls.set(calls.get() + 1);
                        Ok::<_, String>(true)
                    },
                    &spec,
                )
                .unwrap_err();
            assert_eq!(calls.get(), 0);
            assert_eq!(message(err), "none in 0 seconds");
        }
    }
}
