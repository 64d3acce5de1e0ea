//! Bounded-wait primitive and page diagnostics.
//!
//! Every "did the expected state appear" query in the harness is a short,
//! bounded, silently-degrading poll: the wait returns `None` (or `false`)
//! when the budget elapses instead of raising. Driver backends build their
//! selector waits on top of [`poll_until`]; page objects convert the
//! resulting timeout into a sentinel.

use std::time::{Duration, Instant};

/// Default timeout for wait operations (30 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 30_000;

/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

// =============================================================================
// WAIT OPTIONS
// =============================================================================

/// Options for wait operations
#[derive(Debug, Clone)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

// =============================================================================
// POLLING
// =============================================================================

/// Poll `check` until it yields a value or the timeout elapses.
///
/// The check runs immediately, so an already-true condition returns without
/// sleeping, and a zero timeout still gets exactly one check. Between
/// attempts the caller's thread sleeps for the poll interval (clamped to the
/// remaining budget).
pub fn poll_until<T, F>(options: &WaitOptions, mut check: F) -> Option<T>
where
    F: FnMut() -> Option<T>,
{
    let start = Instant::now();
    let deadline = start + options.timeout();
    loop {
        if let Some(value) = check() {
            return Some(value);
        }
        let now = Instant::now();
        if now >= deadline {
            return None;
        }
        let remaining = deadline.saturating_duration_since(now);
        std::thread::sleep(remaining.min(options.poll_interval()));
    }
}

/// Boolean form of [`poll_until`] for predicate-style conditions
pub fn poll_flag<F>(options: &WaitOptions, mut predicate: F) -> bool
where
    F: FnMut() -> bool,
{
    poll_until(options, || predicate().then_some(())).is_some()
}

// =============================================================================
// PAGE DIAGNOSTICS
// =============================================================================

/// Passive page diagnostics forwarded by the session observers.
///
/// These never alter control flow; they are logged and retained for
/// inspection until drained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    /// A console message of error severity
    ConsoleError {
        /// Message text as reported by the page
        text: String,
    },
    /// A network request that did not complete
    RequestFailed {
        /// Request URL
        url: String,
        /// Failure reason reported by the driver
        reason: String,
    },
}

impl PageEvent {
    /// Get the event name string
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ConsoleError { .. } => "console",
            Self::RequestFailed { .. } => "requestfailed",
        }
    }

    /// Forward this event to the tracing log
    pub fn log(&self) {
        match self {
            Self::ConsoleError { text } => {
                tracing::error!(target: "ingreso::page", "Browser console error: {text}");
            }
            Self::RequestFailed { url, reason } => {
                tracing::error!(target: "ingreso::page", "Request failed: {url} ({reason})");
            }
        }
    }
}

impl std::fmt::Display for PageEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConsoleError { text } => write!(f, "console error: {text}"),
            Self::RequestFailed { url, reason } => {
                write!(f, "request failed: {url} ({reason})")
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod wait_options_tests {
        use super::*;

        #[test]
        fn test_default_values() {
            let options = WaitOptions::default();
            assert_eq!(options.timeout_ms, DEFAULT_WAIT_TIMEOUT_MS);
            assert_eq!(options.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
        }

        #[test]
        fn test_builder_chain() {
            let options = WaitOptions::new().with_timeout(3000).with_poll_interval(25);
            assert_eq!(options.timeout(), Duration::from_millis(3000));
            assert_eq!(options.poll_interval(), Duration::from_millis(25));
        }
    }

    mod poll_tests {
        use super::*;

        #[test]
        fn test_immediate_success_returns_without_sleeping() {
            let options = WaitOptions::new().with_timeout(5000);
            let start = Instant::now();
            let result = poll_until(&options, || Some(42));
            assert_eq!(result, Some(42));
            assert!(start.elapsed() < Duration::from_millis(DEFAULT_POLL_INTERVAL_MS));
        }

        #[test]
        fn test_eventual_success() {
            let options = WaitOptions::new().with_timeout(1000).with_poll_interval(5);
            let mut attempts = 0;
            let result = poll_until(&options, || {
                attempts += 1;
                (attempts >= 3).then_some(attempts)
            });
            assert_eq!(result, Some(3));
        }

        #[test]
        fn test_timeout_returns_none_after_budget() {
            let options = WaitOptions::new().with_timeout(30).with_poll_interval(5);
            let start = Instant::now();
            let result: Option<()> = poll_until(&options, || None);
            assert_eq!(result, None);
            assert!(start.elapsed() >= Duration::from_millis(30));
        }

        #[test]
        fn test_zero_timeout_still_checks_once() {
            let options = WaitOptions::new().with_timeout(0);
            let mut attempts = 0;
            let result: Option<()> = poll_until(&options, || {
                attempts += 1;
                None
            });
            assert_eq!(result, None);
            assert_eq!(attempts, 1);
        }

        #[test]
        fn test_poll_flag_true() {
            let options = WaitOptions::new().with_timeout(100).with_poll_interval(5);
            assert!(poll_flag(&options, || true));
        }

        #[test]
        fn test_poll_flag_false_on_timeout() {
            let options = WaitOptions::new().with_timeout(20).with_poll_interval(5);
            assert!(!poll_flag(&options, || false));
        }
    }

    mod page_event_tests {
        use super::*;

        #[test]
        fn test_event_names() {
            let console = PageEvent::ConsoleError {
                text: "boom".to_string(),
            };
            let request = PageEvent::RequestFailed {
                url: "https://www.saucedemo.com/style.css".to_string(),
                reason: "net::ERR_FAILED".to_string(),
            };
            assert_eq!(console.as_str(), "console");
            assert_eq!(request.as_str(), "requestfailed");
        }

        #[test]
        fn test_display_carries_payload() {
            let event = PageEvent::RequestFailed {
                url: "https://www.saucedemo.com/api".to_string(),
                reason: "aborted".to_string(),
            };
            let text = event.to_string();
            assert!(text.contains("https://www.saucedemo.com/api"));
            assert!(text.contains("aborted"));
        }
    }
}
