//! Error types for the page-object layer.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use pagewright::{Result, PageElement};
//!
//! async fn example(submit: &PageElement) -> Result<()> {
//!     submit.click().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Element | [`Error::NotFound`], [`Error::StaleElement`] |
//! | Waiting | [`Error::WaitTimeout`], [`Error::Cancelled`] |
//! | Dispatch | [`Error::PlatformImplementationMissing`] |
//! | Transport | [`Error::Automation`] |
//!
//! Staleness is the only condition eligible for automatic local recovery
//! (bounded at one retry, see [`crate::element::PageElement::perform`]).
//! Every other error propagates to the calling step unmodified in kind.

// ============================================================================
// Imports
// ============================================================================

use std::result::Result as StdResult;

use thiserror::Error;

use crate::session::Platform;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Each variant includes relevant context for debugging: element errors
/// always carry the locator description of the element involved.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Element Errors
    // ========================================================================
    /// Locator matched nothing within the configured timeout.
    ///
    /// Recoverable by the caller; typically fails the test step.
    #[error("Element not found: locator={locator}, scope={scope}")]
    NotFound {
        /// Locator description.
        locator: String,
        /// Scope the lookup was rooted at.
        scope: String,
    },

    /// Element handle was invalidated and the single permitted
    /// re-resolution also failed or also went stale.
    ///
    /// Surfaced, never retried further.
    #[error("Stale element: {locator}")]
    StaleElement {
        /// Locator description of the stale element.
        locator: String,
    },

    // ========================================================================
    // Wait Errors
    // ========================================================================
    /// Wait deadline exceeded before the condition was satisfied.
    ///
    /// Distinct from [`Error::NotFound`] so callers can tell "never
    /// appeared" from "appeared but condition never satisfied".
    #[error("Timeout after {timeout_ms}ms: {operation}")]
    WaitTimeout {
        /// Description of the condition that timed out.
        operation: String,
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    /// External cancellation signal observed mid-wait.
    ///
    /// Returned instead of completing the remaining polls.
    #[error("Cancelled: {operation}")]
    Cancelled {
        /// Description of the wait that was cancelled.
        operation: String,
    },

    // ========================================================================
    // Dispatch Errors
    // ========================================================================
    /// No concrete page implementation registered for the platform.
    ///
    /// A fatal configuration error, never retried.
    #[error("No {platform} implementation registered for page '{page}'")]
    PlatformImplementationMissing {
        /// Abstract page identifier.
        page: String,
        /// Platform the active session reported.
        platform: Platform,
    },

    // ========================================================================
    // Transport Errors
    // ========================================================================
    /// Opaque remote-automation transport failure.
    ///
    /// Wrapped and propagated, never silently swallowed and never retried.
    #[error("Automation error: {message}")]
    Automation {
        /// Description from the transport.
        message: String,
    },
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates an element-not-found error.
    #[inline]
    pub fn not_found(locator: impl Into<String>, scope: impl Into<String>) -> Self {
        Self::NotFound {
            locator: locator.into(),
            scope: scope.into(),
        }
    }

    /// Creates a stale element error.
    #[inline]
    pub fn stale_element(locator: impl Into<String>) -> Self {
        Self::StaleElement {
            locator: locator.into(),
        }
    }

    /// Creates a wait timeout error.
    #[inline]
    pub fn wait_timeout(operation: impl Into<String>, timeout_ms: u64) -> Self {
        Self::WaitTimeout {
            operation: operation.into(),
            timeout_ms,
        }
    }

    /// Creates a cancellation error.
    #[inline]
    pub fn cancelled(operation: impl Into<String>) -> Self {
        Self::Cancelled {
            operation: operation.into(),
        }
    }

    /// Creates a missing platform implementation error.
    #[inline]
    pub fn platform_missing(page: impl Into<String>, platform: Platform) -> Self {
        Self::PlatformImplementationMissing {
            page: page.into(),
            platform,
        }
    }

    /// Creates an automation transport error.
    #[inline]
    pub fn automation(message: impl Into<String>) -> Self {
        Self::Automation {
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a wait timeout.
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::WaitTimeout { .. })
    }

    /// Returns `true` if this is an element error.
    #[inline]
    #[must_use]
    pub fn is_element_error(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::StaleElement { .. })
    }

    /// Returns `true` if this error counts as "not yet satisfied" inside
    /// a polling wait.
    ///
    /// Not-found and staleness are transient against a mutating remote UI;
    /// everything else aborts the wait immediately.
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::StaleElement { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = Error::not_found("css:#login", "document root");
        assert_eq!(
            err.to_string(),
            "Element not found: locator=css:#login, scope=document root"
        );
    }

    #[test]
    fn test_wait_timeout_display() {
        let err = Error::wait_timeout("visible(css:#spinner)", 2000);
        assert_eq!(
            err.to_string(),
            "Timeout after 2000ms: visible(css:#spinner)"
        );
    }

    #[test]
    fn test_platform_missing_display() {
        let err = Error::platform_missing("login", Platform::Ios);
        assert_eq!(
            err.to_string(),
            "No ios implementation registered for page 'login'"
        );
    }

    #[test]
    fn test_is_timeout() {
        assert!(Error::wait_timeout("op", 100).is_timeout());
        assert!(!Error::stale_element("css:#a").is_timeout());
    }

    #[test]
    fn test_is_recoverable() {
        assert!(Error::not_found("css:#a", "document root").is_recoverable());
        assert!(Error::stale_element("css:#a").is_recoverable());
        assert!(!Error::wait_timeout("op", 100).is_recoverable());
        assert!(!Error::automation("socket closed").is_recoverable());
        assert!(!Error::cancelled("op").is_recoverable());
    }

    #[test]
    fn test_is_element_error() {
        assert!(Error::not_found("css:#a", "document root").is_element_error());
        assert!(Error::stale_element("css:#a").is_element_error());
        assert!(!Error::automation("boom").is_element_error());
    }
}
