//! Element locator strategies.
//!
//! A [`By`] pairs a lookup strategy with a selector string; a [`Locator`]
//! adds an optional human-readable description used in logs and errors.
//! Both are immutable once constructed and compare by value — changing
//! "what to find" means constructing a new locator.
//!
//! # Example
//!
//! ```
//! use pagewright::{By, Locator};
//!
//! // CSS selector (default)
//! let submit = Locator::new(By::css("#submit"));
//!
//! // Accessibility id with a description for reports
//! let login = Locator::new(By::accessibility_id("login_button"))
//!     .described("Login button");
//!
//! assert_eq!(login.to_string(), "Login button");
//! assert_eq!(submit.to_string(), "css:#submit");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// By Enum
// ============================================================================

/// Element locator strategy (like Selenium's `By`).
///
/// Supports the strategies common to browser and mobile automation
/// back-ends. Mobile-only strategies (accessibility id) are still valid to
/// declare on a web page object; the session rejects them at lookup time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "strategy", content = "value")]
pub enum By {
    /// CSS selector (most common).
    ///
    /// # Example
    /// ```
    /// # use pagewright::By;
    /// By::css("#login-button");
    /// By::css("button.primary");
    /// ```
    #[serde(rename = "css")]
    Css(String),

    /// XPath expression.
    ///
    /// # Example
    /// ```
    /// # use pagewright::By;
    /// By::xpath("//button[@type='submit']");
    /// ```
    #[serde(rename = "xpath")]
    XPath(String),

    /// Element ID attribute.
    #[serde(rename = "id")]
    Id(String),

    /// Name attribute.
    #[serde(rename = "name")]
    Name(String),

    /// Tag name.
    #[serde(rename = "tag")]
    Tag(String),

    /// Class name (single class).
    #[serde(rename = "class")]
    Class(String),

    /// Accessibility id (mobile back-ends).
    ///
    /// Maps to `accessibility-id` on iOS/Android sessions.
    #[serde(rename = "accessibilityId")]
    AccessibilityId(String),

    /// Link text (for anchor elements).
    #[serde(rename = "linkText")]
    LinkText(String),
}

impl By {
    /// Creates a CSS selector.
    #[inline]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Creates an XPath selector.
    #[inline]
    pub fn xpath(expr: impl Into<String>) -> Self {
        Self::XPath(expr.into())
    }

    /// Creates an ID selector.
    #[inline]
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    /// Creates a name attribute selector.
    #[inline]
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    /// Creates a tag name selector.
    #[inline]
    pub fn tag(tag: impl Into<String>) -> Self {
        Self::Tag(tag.into())
    }

    /// Creates a class name selector.
    #[inline]
    pub fn class(class: impl Into<String>) -> Self {
        Self::Class(class.into())
    }

    /// Creates an accessibility id selector.
    #[inline]
    pub fn accessibility_id(id: impl Into<String>) -> Self {
        Self::AccessibilityId(id.into())
    }

    /// Creates a link text selector.
    #[inline]
    pub fn link_text(text: impl Into<String>) -> Self {
        Self::LinkText(text.into())
    }

    /// Returns the strategy name.
    #[must_use]
    pub fn strategy(&self) -> &'static str {
        match self {
            Self::Css(_) => "css",
            Self::XPath(_) => "xpath",
            Self::Id(_) => "id",
            Self::Name(_) => "name",
            Self::Tag(_) => "tag",
            Self::Class(_) => "class",
            Self::AccessibilityId(_) => "accessibility-id",
            Self::LinkText(_) => "link-text",
        }
    }

    /// Returns the selector value.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Css(v)
            | Self::XPath(v)
            | Self::Id(v)
            | Self::Name(v)
            | Self::Tag(v)
            | Self::Class(v)
            | Self::AccessibilityId(v)
            | Self::LinkText(v) => v,
        }
    }
}

impl fmt::Display for By {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.strategy(), self.value())
    }
}

// ============================================================================
// From implementations for ergonomics
// ============================================================================

impl From<&str> for By {
    /// Converts a string to CSS selector (default).
    fn from(s: &str) -> Self {
        Self::Css(s.to_string())
    }
}

impl From<String> for By {
    /// Converts a string to CSS selector (default).
    fn from(s: String) -> Self {
        Self::Css(s)
    }
}

// ============================================================================
// Locator
// ============================================================================

/// Immutable element descriptor: strategy + selector + optional description.
///
/// The description, when present, is what logs, events and errors show
/// instead of the raw selector.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    /// Lookup strategy and selector.
    by: By,

    /// Human-readable name for reports and diagnostics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl Locator {
    /// Creates a locator without a description.
    #[inline]
    pub fn new(by: impl Into<By>) -> Self {
        Self {
            by: by.into(),
            description: None,
        }
    }

    /// Attaches a human-readable description.
    #[inline]
    #[must_use]
    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns the strategy + selector pair.
    #[inline]
    #[must_use]
    pub fn by(&self) -> &By {
        &self.by
    }

    /// Returns the description, if any.
    #[inline]
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl fmt::Display for Locator {
    /// Prefers the human description over the raw selector.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.description {
            Some(desc) => f.write_str(desc),
            None => write!(f, "{}", self.by),
        }
    }
}

impl From<By> for Locator {
    fn from(by: By) -> Self {
        Self::new(by)
    }
}

impl From<&str> for Locator {
    /// Converts a string to a CSS locator (default).
    fn from(s: &str) -> Self {
        Self::new(By::from(s))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_css() {
        let by = By::css("#login");
        assert_eq!(by.strategy(), "css");
        assert_eq!(by.value(), "#login");
    }

    #[test]
    fn test_by_accessibility_id() {
        let by = By::accessibility_id("login_button");
        assert_eq!(by.strategy(), "accessibility-id");
        assert_eq!(by.value(), "login_button");
    }

    #[test]
    fn test_by_display() {
        assert_eq!(By::xpath("//button").to_string(), "xpath://button");
    }

    #[test]
    fn test_from_str_defaults_to_css() {
        let by: By = "#login".into();
        assert!(matches!(by, By::Css(_)));
    }

    #[test]
    fn test_locator_display_prefers_description() {
        let plain = Locator::new(By::id("user"));
        let named = Locator::new(By::id("user")).described("Username field");
        assert_eq!(plain.to_string(), "id:user");
        assert_eq!(named.to_string(), "Username field");
    }

    #[test]
    fn test_locator_value_equality() {
        let a = Locator::new(By::css("#a")).described("A");
        let b = Locator::new(By::css("#a")).described("A");
        let c = Locator::new(By::css("#a"));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_by_serde_roundtrip() {
        let by = By::xpath("//a[text()='Login']");
        let json = serde_json::to_string(&by).unwrap();
        assert_eq!(json, r#"{"strategy":"xpath","value":"//a[text()='Login']"}"#);
        let back: By = serde_json::from_str(&json).unwrap();
        assert_eq!(back, by);
    }
}
