//! Typed element wrappers.
//!
//! Thin newtypes over [`PageElement`] that narrow the surface to one
//! capability set each, composed instead of inherited: a [`Button`] can
//! be clicked and read, an [`InputText`] typed into, a [`Checkbox`]
//! toggled. Every wrapper exposes the underlying element through
//! `element()` for the occasional escape hatch.
//!
//! # Example
//!
//! ```ignore
//! use pagewright::{By, Locator};
//! use pagewright::element::kinds::{Button, InputText};
//!
//! let user = InputText::new(session.clone(), Locator::new(By::id("user")));
//! let submit = Button::new(session, Locator::new(By::id("submit")));
//!
//! user.set_text("alice").await?;
//! submit.click().await?;
//! ```

use std::sync::Arc;

use crate::error::Result;
use crate::locator::Locator;
use crate::session::{DriverSession, Op};

use super::PageElement;

/// Declares a newtype wrapper over [`PageElement`] with the shared
/// constructors and accessors.
macro_rules! element_kind {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            element: PageElement,
        }

        impl $name {
            /// Creates a root-scoped instance.
            pub fn new(session: Arc<dyn DriverSession>, locator: impl Into<Locator>) -> Self {
                Self {
                    element: PageElement::new(session, locator),
                }
            }

            /// Returns the underlying element.
            #[inline]
            #[must_use]
            pub fn element(&self) -> &PageElement {
                &self.element
            }
        }

        impl From<PageElement> for $name {
            fn from(element: PageElement) -> Self {
                Self { element }
            }
        }
    };
}

// ============================================================================
// Button
// ============================================================================

element_kind! {
    /// Clickable element with a visible caption.
    Button
}

impl Button {
    /// Clicks the button after the interactable wait.
    pub async fn click(&self) -> Result<()> {
        self.element.click().await
    }

    /// Reads the button caption.
    pub async fn text(&self) -> Result<String> {
        self.element.text().await
    }
}

// ============================================================================
// InputText
// ============================================================================

element_kind! {
    /// Text input field.
    InputText
}

impl InputText {
    /// Types `text` into the field after the interactable wait.
    pub async fn set_text(&self, text: &str) -> Result<()> {
        self.element.type_text(text).await
    }

    /// Reads the current value.
    pub async fn text(&self) -> Result<String> {
        self.element.value().await
    }

    /// Clears the field.
    pub async fn clear(&self) -> Result<()> {
        self.element.clear().await
    }
}

// ============================================================================
// Checkbox
// ============================================================================

element_kind! {
    /// Checkbox or radio-style toggle.
    Checkbox
}

impl Checkbox {
    /// Whether the box is currently checked.
    pub async fn is_checked(&self) -> Result<bool> {
        self.element.is_selected().await
    }

    /// Checks the box; no-op if already checked.
    pub async fn check(&self) -> Result<()> {
        if !self.is_checked().await? {
            self.element.click().await?;
        }
        Ok(())
    }

    /// Unchecks the box; no-op if already unchecked.
    pub async fn uncheck(&self) -> Result<()> {
        if self.is_checked().await? {
            self.element.click().await?;
        }
        Ok(())
    }

    /// Toggles the current state.
    pub async fn toggle(&self) -> Result<()> {
        self.element.click().await
    }
}

// ============================================================================
// InputRadio
// ============================================================================

element_kind! {
    /// Radio button.
    ///
    /// Unlike a [`Checkbox`], a radio cannot be unchecked directly; it is
    /// only deselected by selecting another member of its group.
    InputRadio
}

impl InputRadio {
    /// Whether this radio is currently selected.
    pub async fn is_selected(&self) -> Result<bool> {
        self.element.is_selected().await
    }

    /// Selects this radio; no-op if already selected.
    pub async fn select(&self) -> Result<()> {
        if !self.is_selected().await? {
            self.element.click().await?;
        }
        Ok(())
    }

    /// Reads the radio's value attribute; `None` when absent.
    pub async fn value(&self) -> Result<Option<String>> {
        self.element.attribute("value").await
    }
}

// ============================================================================
// Select
// ============================================================================

element_kind! {
    /// Dropdown selection element.
    Select
}

impl Select {
    /// Selects an option by its visible text.
    pub async fn select_by_text(&self, text: &str) -> Result<()> {
        self.element
            .perform(&Op::SelectByText(text.to_string()))
            .await?;
        Ok(())
    }

    /// Selects an option by its value attribute.
    pub async fn select_by_value(&self, value: &str) -> Result<()> {
        self.element
            .perform(&Op::SelectByValue(value.to_string()))
            .await?;
        Ok(())
    }

    /// Reads the currently selected value.
    pub async fn selected_value(&self) -> Result<String> {
        self.element.value().await
    }

    /// Reads the visible text of the current selection.
    pub async fn selected_text(&self) -> Result<String> {
        self.element.text().await
    }
}

// ============================================================================
// Link
// ============================================================================

element_kind! {
    /// Anchor element.
    Link
}

impl Link {
    /// Follows the link after the interactable wait.
    pub async fn click(&self) -> Result<()> {
        self.element.click().await
    }

    /// Reads the link text.
    pub async fn text(&self) -> Result<String> {
        self.element.text().await
    }

    /// Reads the link target; `None` when the attribute is absent.
    pub async fn href(&self) -> Result<Option<String>> {
        self.element.attribute("href").await
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    use crate::locator::By;
    use crate::session::Platform;
    use crate::session::fake::{FakeSession, FindScript, PerformScript};

    #[tokio::test(start_paused = true)]
    async fn test_checkbox_check_skips_click_when_checked() {
        let session = FakeSession::new(Platform::Web);
        session.script_find(FindScript::Found(vec!["e1"]));
        session.script_perform(PerformScript::Ok(json!(true)));
        let checkbox = Checkbox::new(
            session.clone() as Arc<dyn DriverSession>,
            Locator::new(By::id("opt-in")),
        );

        checkbox.check().await.unwrap();

        assert_eq!(session.performed(), vec!["is_selected"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_checkbox_check_clicks_when_unchecked() {
        let session = FakeSession::new(Platform::Web);
        session.script_find(FindScript::Found(vec!["e1"]));
        session
            .script_perform(PerformScript::Ok(json!(false))) // is_checked
            .script_perform(PerformScript::Ok(json!(true))) // is_displayed
            .script_perform(PerformScript::Ok(json!(true))) // is_enabled
            .script_perform(PerformScript::Ok(json!(null))); // click
        let checkbox = Checkbox::new(
            session.clone() as Arc<dyn DriverSession>,
            Locator::new(By::id("opt-in")),
        );

        checkbox.check().await.unwrap();

        assert_eq!(
            session.performed(),
            vec!["is_selected", "is_displayed", "is_enabled", "click"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_radio_select_skips_click_when_selected() {
        let session = FakeSession::new(Platform::Web);
        session.script_find(FindScript::Found(vec!["e1"]));
        session.script_perform(PerformScript::Ok(json!(true)));
        let radio = InputRadio::new(
            session.clone() as Arc<dyn DriverSession>,
            Locator::new(By::id("plan-basic")),
        );

        radio.select().await.unwrap();

        assert_eq!(session.performed(), vec!["is_selected"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_radio_select_clicks_when_unselected() {
        let session = FakeSession::new(Platform::Web);
        session.script_find(FindScript::Found(vec!["e1"]));
        session
            .script_perform(PerformScript::Ok(json!(false))) // is_selected
            .script_perform(PerformScript::Ok(json!(true))) // is_displayed
            .script_perform(PerformScript::Ok(json!(true))) // is_enabled
            .script_perform(PerformScript::Ok(json!(null))); // click
        let radio = InputRadio::new(
            session.clone() as Arc<dyn DriverSession>,
            Locator::new(By::id("plan-basic")),
        );

        radio.select().await.unwrap();

        assert_eq!(
            session.performed(),
            vec!["is_selected", "is_displayed", "is_enabled", "click"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_link_href() {
        let session = FakeSession::new(Platform::Web);
        session.script_find(FindScript::Found(vec!["e1"]));
        session.script_perform(PerformScript::Ok(json!("/home")));
        let link = Link::new(
            session.clone() as Arc<dyn DriverSession>,
            Locator::new(By::link_text("Home")),
        );

        assert_eq!(link.href().await.unwrap(), Some("/home".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_by_text() {
        let session = FakeSession::new(Platform::Web);
        session.script_find(FindScript::Found(vec!["e1"]));
        let select = Select::new(
            session.clone() as Arc<dyn DriverSession>,
            Locator::new(By::id("country")),
        );

        select.select_by_text("Spain").await.unwrap();

        assert_eq!(session.performed(), vec!["select_by_text"]);
    }
}
