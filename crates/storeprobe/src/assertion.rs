//! Assertions for page state.
//!
//! Each helper produces an [`AssertionResult`]; `check()` turns a failure into
//! [`ProbeError::AssertionFailed`] so case bodies can use `?`.

use crate::result::{ProbeError, ProbeResult};
use std::fmt::Debug;

/// Result of an assertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionResult {
    /// Whether the assertion passed
    pub passed: bool,
    /// Human-readable message
    pub message: String,
}

impl AssertionResult {
    /// Create a passing assertion result
    #[must_use]
    pub const fn pass() -> Self {
        Self {
            passed: true,
            message: String::new(),
        }
    }

    /// Create a failing assertion result
    #[must_use]
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
        }
    }

    /// Prefix a failure message with what was being checked
    #[must_use]
    pub fn context(mut self, what: &str) -> Self {
        if !self.passed {
            self.message = format!("{what}: {}", self.message);
        }
        self
    }

    /// Convert into a result for `?`
    pub fn check(self) -> ProbeResult<()> {
        if self.passed {
            Ok(())
        } else {
            Err(ProbeError::assertion(self.message))
        }
    }
}

/// Assertion helpers for testing
#[derive(Debug)]
pub struct Assertion;

impl Assertion {
    /// Assert two values are equal
    #[must_use]
    pub fn equals<T: PartialEq + Debug>(expected: &T, actual: &T) -> AssertionResult {
        if expected == actual {
            AssertionResult::pass()
        } else {
            AssertionResult::fail(format!("expected {expected:?}, got {actual:?}"))
        }
    }

    /// Assert a string contains a substring
    #[must_use]
    pub fn contains(haystack: &str, needle: &str) -> AssertionResult {
        if haystack.contains(needle) {
            AssertionResult::pass()
        } else {
            AssertionResult::fail(format!("expected '{haystack}' to contain '{needle}'"))
        }
    }

    /// Case-insensitive substring check
    #[must_use]
    pub fn contains_ignore_case(haystack: &str, needle: &str) -> AssertionResult {
        if haystack.to_lowercase().contains(&needle.to_lowercase()) {
            AssertionResult::pass()
        } else {
            AssertionResult::fail(format!(
                "expected '{haystack}' to contain '{needle}' (ignoring case)"
            ))
        }
    }

    /// Assert a URL contains a path fragment
    #[must_use]
    pub fn url_contains(url: &str, fragment: &str) -> AssertionResult {
        if url.contains(fragment) {
            AssertionResult::pass()
        } else {
            AssertionResult::fail(format!("expected URL containing '{fragment}', got '{url}'"))
        }
    }

    /// Assert a condition is true
    #[must_use]
    pub fn is_true(condition: bool, message: &str) -> AssertionResult {
        if condition {
            AssertionResult::pass()
        } else {
            AssertionResult::fail(message)
        }
    }

    /// Assert a condition is false
    #[must_use]
    pub fn is_false(condition: bool, message: &str) -> AssertionResult {
        if condition {
            AssertionResult::fail(message)
        } else {
            AssertionResult::pass()
        }
    }

    /// Assert an Option is Some
    #[must_use]
    pub fn is_some<T>(opt: &Option<T>, what: &str) -> AssertionResult {
        if opt.is_some() {
            AssertionResult::pass()
        } else {
            AssertionResult::fail(format!("expected {what}, found none"))
        }
    }

    /// Assert a count reaches a minimum
    #[must_use]
    pub fn at_least(actual: usize, minimum: usize, what: &str) -> AssertionResult {
        if actual >= minimum {
            AssertionResult::pass()
        } else {
            AssertionResult::fail(format!("expected at least {minimum} {what}, got {actual}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equals() {
        assert!(Assertion::equals(&1, &1).passed);
        let failed = Assertion::equals(&"Cart", &"Home");
        assert!(!failed.passed);
        assert_eq!(failed.message, "expected \"Cart\", got \"Home\"");
    }

    #[test]
    fn test_contains() {
        assert!(Assertion::contains("ACCOUNT CREATED!", "CREATED").passed);
        assert!(!Assertion::contains("abc", "xyz").passed);
        assert!(Assertion::contains_ignore_case("All Products", "ALL PRODUCTS").passed);
    }

    #[test]
    fn test_url_contains_message() {
        let r = Assertion::url_contains("https://shop.test/", "/login");
        assert_eq!(r.message, "expected URL containing '/login', got 'https://shop.test/'");
    }

    #[test]
    fn test_bools_and_options() {
        assert!(Assertion::is_true(true, "x").passed);
        assert!(!Assertion::is_false(true, "x").passed);
        assert!(Assertion::is_some(&Some(1), "a row").passed);
        assert_eq!(
            Assertion::is_some::<u8>(&None, "a cart row").message,
            "expected a cart row, found none"
        );
    }

    #[test]
    fn test_at_least() {
        assert!(Assertion::at_least(34, 1, "products").passed);
        assert_eq!(
            Assertion::at_least(0, 1, "products").message,
            "expected at least 1 products, got 0"
        );
    }

    #[test]
    fn test_check_and_context() {
        assert!(AssertionResult::pass().check().is_ok());
        let err = Assertion::equals(&2, &3).context("cart quantity").check().unwrap_err();
        assert!(err.is_assertion());
        assert_eq!(err.to_string(), "Assertion failed: cart quantity: expected 2, got 3");
    }
}
