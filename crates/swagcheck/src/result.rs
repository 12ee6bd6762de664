//! Result and error types for swagcheck.

use thiserror::Error;

/// Result type for page object operations
pub type PageResult<T> = Result<T, PageError>;

/// Errors that can occur while driving a page
#[derive(Debug, Error)]
pub enum PageError {
    /// Element name not present in the page's registry
    #[error("Unknown element '{name}' on page '{page}'")]
    UnknownElement {
        /// Page the lookup ran against
        page: String,
        /// Requested element name
        name: String,
    },

    /// Name registered twice
    #[error("Duplicate {kind} name '{name}'")]
    DuplicateName {
        /// What was being registered (element, command, page)
        kind: &'static str,
        /// Offending name
        name: String,
    },

    /// Selector query was empty at registration
    #[error("Selector for element '{name}' is empty")]
    EmptySelector {
        /// Element name
        name: String,
    },

    /// The driver could not locate the element
    #[error("Element not found: {selector}")]
    ElementNotFound {
        /// Selector that matched nothing
        selector: String,
    },

    /// Index past the end of a located collection
    #[error("Index {index} out of range for '{selector}' ({count} matched)")]
    IndexOutOfRange {
        /// Collection selector
        selector: String,
        /// Requested index
        index: usize,
        /// Number of matched elements
        count: usize,
    },

    /// A live value diverged from the expected one
    #[error("Assertion failed on {subject}: expected {expected:?}, got {actual:?}")]
    AssertionMismatch {
        /// What was compared (element name, "url", ...)
        subject: String,
        /// Expected value
        expected: String,
        /// Actual value
        actual: String,
    },

    /// Element command issued before the session navigated anywhere
    #[error("Session has not navigated to a page yet")]
    NotNavigated,

    /// Command issued after the session ended
    #[error("Session {id} is closed")]
    SessionClosed {
        /// Session identifier
        id: String,
    },

    /// Unknown page name in the page registry
    #[error("Unknown page '{name}'")]
    UnknownPage {
        /// Requested page name
        name: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Driver-level failure (connection, protocol)
    #[error("Driver error: {message}")]
    Driver {
        /// Error message
        message: String,
    },

    /// Fixture loading error
    #[error("Fixture error: {message}")]
    Fixture {
        /// Error message
        message: String,
    },

    /// HTTP client error
    #[cfg(feature = "api")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Header expectation with an invalid pattern
    #[cfg(feature = "api")]
    #[error("Invalid regex pattern '{pattern}': {message}")]
    InvalidPattern {
        /// Pattern as given
        pattern: String,
        /// Parser message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PageError {
    /// Create a driver error
    #[must_use]
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver {
            message: message.into(),
        }
    }

    /// Create an assertion mismatch
    #[must_use]
    pub fn mismatch(
        subject: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::AssertionMismatch {
            subject: subject.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Whether this error is a test outcome rather than a fault
    #[must_use]
    pub const fn is_assertion(&self) -> bool {
        matches!(self, Self::AssertionMismatch { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatch_display_carries_both_values() {
        let err = PageError::mismatch("cartNumber", "6", "5");
        let text = err.to_string();
        assert!(text.contains("cartNumber"));
        assert!(text.contains("\"6\""));
        assert!(text.contains("\"5\""));
        assert!(err.is_assertion());
    }

    #[test]
    fn test_faults_are_not_assertions() {
        assert!(!PageError::NotNavigated.is_assertion());
        assert!(!PageError::driver("boom").is_assertion());
    }

    #[test]
    fn test_index_out_of_range_display() {
        let err = PageError::IndexOutOfRange {
            selector: "div.inventory_list > div".to_string(),
            index: 7,
            count: 6,
        };
        assert_eq!(
            err.to_string(),
            "Index 7 out of range for 'div.inventory_list > div' (6 matched)"
        );
    }
}
