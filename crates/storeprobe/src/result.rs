//! Result and error types for storeprobe.

use thiserror::Error;

/// Result type for storeprobe operations
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Errors that can occur while driving the storefront
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Page-level CDP or driver error
    #[error("Page error: {message}")]
    Page {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// A wait or case exceeded its time budget
    #[error("Timed out after {ms}ms waiting for {waiting_for}")]
    Timeout {
        /// Timeout in milliseconds
        ms: u64,
        /// Condition that never became true
        waiting_for: String,
    },

    /// Every locator candidate was exhausted
    #[error("Element not found: {locator} (tried: {tried})")]
    ElementNotFound {
        /// Logical locator name
        locator: String,
        /// Candidate selectors that were tried, in order
        tried: String,
    },

    /// Element handle no longer attached to the document
    #[error("Stale element: {id}")]
    StaleElement {
        /// Handle id
        id: String,
    },

    /// Another element would receive the click
    #[error("Click on {id} intercepted by {obscured_by}")]
    ClickIntercepted {
        /// Handle id of the intended target
        id: String,
        /// Description of the element on top
        obscured_by: String,
    },

    /// Element exists but cannot be interacted with
    #[error("Element {id} is not interactable")]
    NotInteractable {
        /// Handle id
        id: String,
    },

    /// Selector rejected by the document
    #[error("Invalid selector {selector}: {message}")]
    InvalidSelector {
        /// Selector source
        selector: String,
        /// Error message
        message: String,
    },

    /// JavaScript evaluation error
    #[error("Script evaluation failed: {message}")]
    Script {
        /// Error message
        message: String,
    },

    /// No JavaScript dialog is open
    #[error("No alert is open")]
    NoAlert,

    /// Assertion failed
    #[error("Assertion failed: {message}")]
    AssertionFailed {
        /// Expected-vs-actual description
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl ProbeError {
    /// Create an assertion failure
    #[must_use]
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::AssertionFailed {
            message: message.into(),
        }
    }

    /// Create a page error
    #[must_use]
    pub fn page(message: impl Into<String>) -> Self {
        Self::Page {
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether this error is an observed divergence rather than a broken check
    #[must_use]
    pub const fn is_assertion(&self) -> bool {
        matches!(self, Self::AssertionFailed { .. })
    }

    /// Whether a native click was blocked and a script click may still work
    #[must_use]
    pub const fn is_click_blocked(&self) -> bool {
        matches!(
            self,
            Self::ClickIntercepted { .. } | Self::NotInteractable { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assertion_error_display() {
        let err = ProbeError::assertion("expected \"a\", got \"b\"");
        assert!(err.to_string().starts_with("Assertion failed"));
        assert!(err.is_assertion());
        assert!(!err.is_click_blocked());
    }

    #[test]
    fn test_not_found_lists_candidates() {
        let err = ProbeError::ElementNotFound {
            locator: "login email".to_string(),
            tried: "css:#a, xpath://b".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("login email"));
        assert!(text.contains("xpath://b"));
    }

    #[test]
    fn test_click_blocked_variants() {
        let intercepted = ProbeError::ClickIntercepted {
            id: "7".to_string(),
            obscured_by: "div#ad".to_string(),
        };
        let inert = ProbeError::NotInteractable {
            id: "7".to_string(),
        };
        assert!(intercepted.is_click_blocked());
        assert!(inert.is_click_blocked());
        assert!(!ProbeError::NoAlert.is_click_blocked());
    }

    #[test]
    fn test_timeout_display() {
        let err = ProbeError::Timeout {
            ms: 250,
            waiting_for: "url containing /login".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Timed out after 250ms waiting for url containing /login"
        );
    }
}
