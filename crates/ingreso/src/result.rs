//! Error taxonomy for the harness.
//!
//! Driver-level timeouts are a distinct variant because the page-object
//! layer converts them into sentinel returns instead of surfacing them to
//! test code. Everything else propagates and fails the test case.

use thiserror::Error;

/// Result type used throughout the harness
pub type IngresoResult<T> = Result<T, IngresoError>;

/// Errors produced by the harness and its driver backends
#[derive(Debug, Error)]
pub enum IngresoError {
    /// Browser could not be launched. Fatal for the whole run.
    #[error("Browser launch failed: {message}")]
    BrowserLaunch {
        /// Launch failure detail
        message: String,
    },

    /// Page-level failure (creation, or an operation on a closed page)
    #[error("Page error: {message}")]
    Page {
        /// Failure detail
        message: String,
    },

    /// Navigation did not settle
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// Target URL
        url: String,
        /// Failure detail
        message: String,
    },

    /// A bounded wait elapsed without the condition holding
    #[error("Timed out waiting after {ms}ms")]
    Timeout {
        /// Wait budget that elapsed
        ms: u64,
    },

    /// No element matched the selector
    #[error("No element matches selector: {selector}")]
    ElementNotFound {
        /// The selector that failed to match
        selector: String,
    },

    /// Input dispatch (typing, clicking) failed
    #[error("Input error: {message}")]
    Input {
        /// Failure detail
        message: String,
    },

    /// Screenshot capture failed
    #[error("Screenshot failed: {message}")]
    Screenshot {
        /// Failure detail
        message: String,
    },

    /// A session transition was attempted from the wrong state
    #[error("Invalid session state: {message}")]
    InvalidState {
        /// What was attempted and why it was rejected
        message: String,
    },

    /// Expected vs actual mismatch, terminal for one test case
    #[error("Assertion failed: {message}")]
    Assertion {
        /// Mismatch description
        message: String,
    },

    /// Artifact write or directory provisioning failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Report or fixture (de)serialization failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl IngresoError {
    /// True when this error is the bounded-wait expiry that page objects
    /// convert to a sentinel
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod display_tests {
        use super::*;

        #[test]
        fn test_navigation_error_includes_url() {
            let err = IngresoError::Navigation {
                url: "https://www.saucedemo.com/".to_string(),
                message: "connection refused".to_string(),
            };
            let text = err.to_string();
            assert!(text.contains("https://www.saucedemo.com/"));
            assert!(text.contains("connection refused"));
        }

        #[test]
        fn test_timeout_error_includes_budget() {
            let err = IngresoError::Timeout { ms: 3000 };
            assert_eq!(err.to_string(), "Timed out waiting after 3000ms");
        }

        #[test]
        fn test_element_not_found_includes_selector() {
            let err = IngresoError::ElementNotFound {
                selector: "input#user-name".to_string(),
            };
            assert!(err.to_string().contains("input#user-name"));
        }

        #[test]
        fn test_invalid_state_message() {
            let err = IngresoError::InvalidState {
                message: "open_page before start".to_string(),
            };
            assert!(err.to_string().contains("open_page before start"));
        }
    }

    mod conversion_tests {
        use super::*;

        #[test]
        fn test_io_error_converts() {
            let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
            let err: IngresoError = io.into();
            assert!(matches!(err, IngresoError::Io(_)));
        }

        #[test]
        fn test_json_error_converts() {
            let json = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
            let err: IngresoError = json.into();
            assert!(matches!(err, IngresoError::Json(_)));
        }
    }

    mod classification_tests {
        use super::*;

        #[test]
        fn test_is_timeout_true_for_timeout() {
            assert!(IngresoError::Timeout { ms: 10 }.is_timeout());
        }

        #[test]
        fn test_is_timeout_false_for_others() {
            let err = IngresoError::Assertion {
                message: "nope".to_string(),
            };
            assert!(!err.is_timeout());
        }
    }
}
