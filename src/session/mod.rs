//! Driver session interface: the boundary to the remote-automation transport.
//!
//! The transport itself (WebDriver/Appium-style client) lives outside this
//! crate; [`DriverSession`] is the seam it plugs into. Page elements and
//! page objects hold a non-owning `Arc<dyn DriverSession>` and never touch
//! the wire protocol directly.
//!
//! # Ownership
//!
//! One logical test thread owns exactly one active session and its whole
//! page-object graph. When a session ends, every [`ElementHandle`] obtained
//! through it becomes permanently invalid and must not be reused, even if a
//! numerically-matching handle appears in a new session.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::locator::Locator;

#[cfg(test)]
pub(crate) mod fake;

// ============================================================================
// ElementHandle
// ============================================================================

/// Opaque identifier of a single remote UI node.
///
/// A handle may become invalid ("stale") at any time due to remote DOM or
/// view mutation. Treat it as invalid the instant any operation against it
/// signals staleness; [`crate::element::PageElement`] does this for you.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementHandle(String);

impl ElementHandle {
    /// Creates a handle from a transport-assigned id.
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the raw id string.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Platform
// ============================================================================

/// Category of the connected automation target.
///
/// Used by [`crate::page::PageRegistry`] to select the concrete page
/// implementation at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Desktop or mobile web browser.
    Web,
    /// Native iOS application.
    Ios,
    /// Native Android application.
    Android,
}

impl Platform {
    /// Returns the platform name.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::Ios => "ios",
            Self::Android => "android",
        }
    }

    /// Returns `true` for native mobile targets.
    #[inline]
    #[must_use]
    pub fn is_mobile(&self) -> bool {
        matches!(self, Self::Ios | Self::Android)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Scope
// ============================================================================

/// Root node under which a locator is evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scope {
    /// The document (or view hierarchy) root.
    Root,
    /// A previously resolved parent node.
    Node(ElementHandle),
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => f.write_str("document root"),
            Self::Node(handle) => write!(f, "node {handle}"),
        }
    }
}

// ============================================================================
// Op
// ============================================================================

/// A named interaction dispatched against a resolved handle.
///
/// Each op knows whether it is idempotent; only idempotent ops are
/// automatically retried after a staleness signal (see
/// [`crate::element::PageElement::perform`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "arg", rename_all = "snake_case")]
pub enum Op {
    /// Click the node.
    Click,
    /// Read the node's visible text.
    GetText,
    /// Read the node's value (input elements).
    GetValue,
    /// Read an attribute by name.
    GetAttribute(String),
    /// Read a property by name.
    GetProperty(String),
    /// Type a text string into the node.
    TypeText(String),
    /// Clear the node's value.
    Clear,
    /// Whether the node is rendered and visible.
    IsDisplayed,
    /// Whether the node accepts interaction.
    IsEnabled,
    /// Whether the node is selected/checked.
    IsSelected,
    /// Select a dropdown option by visible text.
    SelectByText(String),
    /// Select a dropdown option by value attribute.
    SelectByValue(String),
    /// Scroll the node into the viewport.
    ScrollIntoView,
}

impl Op {
    /// Returns the op name for logs and events.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::GetText => "get_text",
            Self::GetValue => "get_value",
            Self::GetAttribute(_) => "get_attribute",
            Self::GetProperty(_) => "get_property",
            Self::TypeText(_) => "type_text",
            Self::Clear => "clear",
            Self::IsDisplayed => "is_displayed",
            Self::IsEnabled => "is_enabled",
            Self::IsSelected => "is_selected",
            Self::SelectByText(_) => "select_by_text",
            Self::SelectByValue(_) => "select_by_value",
            Self::ScrollIntoView => "scroll_into_view",
        }
    }

    /// Returns `true` if repeating this op cannot double-apply a side
    /// effect on the remote application.
    ///
    /// Scrolling is repeat-safe even though it moves the viewport.
    #[must_use]
    pub fn is_idempotent(&self) -> bool {
        match self {
            Self::GetText
            | Self::GetValue
            | Self::GetAttribute(_)
            | Self::GetProperty(_)
            | Self::IsDisplayed
            | Self::IsEnabled
            | Self::IsSelected
            | Self::ScrollIntoView => true,
            Self::Click
            | Self::TypeText(_)
            | Self::Clear
            | Self::SelectByText(_)
            | Self::SelectByValue(_) => false,
        }
    }
}

// ============================================================================
// DriverSession
// ============================================================================

/// Handle to the remote-automation transport, supplied by the
/// driver-management subsystem.
///
/// Implementations signal failures through the crate error taxonomy:
///
/// - a lookup matching nothing returns [`crate::Error::NotFound`];
/// - an op against a detached node returns [`crate::Error::StaleElement`];
/// - any other transport failure returns [`crate::Error::Automation`].
///
/// Instances are shared as `Arc<dyn DriverSession>` across the page-object
/// graph of one test execution context.
#[async_trait]
pub trait DriverSession: Send + Sync {
    /// Finds exactly one node matching `locator` under `scope`.
    async fn find_one(&self, locator: &Locator, scope: &Scope) -> Result<ElementHandle>;

    /// Finds all nodes matching `locator` under `scope`, in document order.
    ///
    /// Zero matches is a successful empty result, not an error.
    async fn find_all(&self, locator: &Locator, scope: &Scope) -> Result<Vec<ElementHandle>>;

    /// Executes `op` against a resolved handle.
    async fn perform(&self, handle: &ElementHandle, op: &Op) -> Result<Value>;

    /// Returns the platform identity of the connected target.
    fn platform(&self) -> Platform;
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_as_str() {
        assert_eq!(Platform::Web.as_str(), "web");
        assert_eq!(Platform::Ios.as_str(), "ios");
        assert_eq!(Platform::Android.as_str(), "android");
    }

    #[test]
    fn test_platform_is_mobile() {
        assert!(!Platform::Web.is_mobile());
        assert!(Platform::Ios.is_mobile());
        assert!(Platform::Android.is_mobile());
    }

    #[test]
    fn test_scope_display() {
        assert_eq!(Scope::Root.to_string(), "document root");
        assert_eq!(
            Scope::Node(ElementHandle::new("e7")).to_string(),
            "node e7"
        );
    }

    #[test]
    fn test_op_idempotence_partition() {
        assert!(Op::GetText.is_idempotent());
        assert!(Op::IsDisplayed.is_idempotent());
        assert!(Op::ScrollIntoView.is_idempotent());
        assert!(!Op::Click.is_idempotent());
        assert!(!Op::TypeText("hi".into()).is_idempotent());
        assert!(!Op::Clear.is_idempotent());
        assert!(!Op::SelectByText("US".into()).is_idempotent());
    }

    #[test]
    fn test_op_names() {
        assert_eq!(Op::Click.name(), "click");
        assert_eq!(Op::GetAttribute("href".into()).name(), "get_attribute");
    }

    #[test]
    fn test_element_handle_display() {
        let handle = ElementHandle::new("abc-123");
        assert_eq!(handle.to_string(), "abc-123");
        assert_eq!(handle.as_str(), "abc-123");
    }
}
