//! Page objects: structural groupings of named elements for one screen.
//!
//! A page object declares its elements through a [`PageScope`] at
//! construction time; declaring performs no remote calls — every member
//! starts unresolved and resolves on first access. Sub-page scopes nest:
//! a nested scope roots its lookups at the parent's matched node, not the
//! document root.
//!
//! Concrete platform implementations are selected through
//! [`PageRegistry`](registry::PageRegistry) at construction time; step
//! code never picks web/iOS/Android explicitly.
//!
//! # Example
//!
//! ```ignore
//! use pagewright::{By, Locator, PageObject, PageScope};
//!
//! struct LoginPage {
//!     scope: PageScope,
//!     username: PageElement,
//!     submit: PageElement,
//! }
//!
//! impl LoginPage {
//!     fn new(session: Arc<dyn DriverSession>) -> Self {
//!         let scope = PageScope::new(session);
//!         Self {
//!             username: scope.element(Locator::new(By::id("user"))),
//!             submit: scope.element(Locator::new(By::id("submit"))),
//!             scope,
//!         }
//!     }
//! }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::WaitSettings;
use crate::element::{PageElement, SearchScope};
use crate::error::Result;
use crate::group::PageElementGroup;
use crate::locator::Locator;
use crate::session::DriverSession;
use crate::wait::CancelToken;

pub mod registry;

// ============================================================================
// PageObject
// ============================================================================

/// One logical screen of the application under test.
///
/// Implementors typically hold a [`PageScope`] plus the elements declared
/// through it. The default readiness check waits for the designated
/// anchor element; override [`wait_until_loaded`](Self::wait_until_loaded)
/// for composite conditions.
#[async_trait]
pub trait PageObject: Send + Sync {
    /// Stable page identifier, also used for registry dispatch.
    fn name(&self) -> &str;

    /// The session this page resolves against.
    fn session(&self) -> &Arc<dyn DriverSession>;

    /// Designated readiness element, if any.
    fn anchor(&self) -> Option<&PageElement> {
        None
    }

    /// Waits until the page is ready for interaction.
    ///
    /// Default: the anchor becomes present within `timeout` (or the
    /// anchor's explicit wait when `None`). Pages without an anchor are
    /// considered immediately loaded.
    async fn wait_until_loaded(&self, timeout: Option<Duration>) -> Result<()> {
        match self.anchor() {
            Some(anchor) => anchor.wait_until_present(timeout).await,
            None => Ok(()),
        }
    }
}

// ============================================================================
// PageScope
// ============================================================================

/// Element factory for one page (or nested sub-page).
///
/// Carries the session, wait settings and cancellation token that every
/// declared member inherits, plus the root the members' lookups are
/// evaluated under. Constructing elements through a scope performs no
/// remote calls.
#[derive(Clone)]
pub struct PageScope {
    session: Arc<dyn DriverSession>,
    settings: WaitSettings,
    cancel: Option<CancelToken>,
    /// `None` roots lookups at the document; `Some` at a parent node.
    root: Option<PageElement>,
}

impl PageScope {
    /// Creates a document-rooted scope with default settings.
    pub fn new(session: Arc<dyn DriverSession>) -> Self {
        Self {
            session,
            settings: WaitSettings::default(),
            cancel: None,
            root: None,
        }
    }

    /// Replaces the wait settings for members declared afterwards.
    #[must_use]
    pub fn with_settings(mut self, settings: WaitSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Attaches a cancellation token inherited by declared members.
    #[must_use]
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Returns the session.
    #[inline]
    #[must_use]
    pub fn session(&self) -> &Arc<dyn DriverSession> {
        &self.session
    }

    /// Returns the wait settings members inherit.
    #[inline]
    #[must_use]
    pub fn settings(&self) -> &WaitSettings {
        &self.settings
    }

    fn search_scope(&self) -> SearchScope {
        match &self.root {
            Some(root) => SearchScope::Within(root.clone()),
            None => SearchScope::Root,
        }
    }

    /// Declares a named element under this scope's root.
    #[must_use]
    pub fn element(&self, locator: impl Into<Locator>) -> PageElement {
        let element = match &self.root {
            Some(root) => root.child(locator),
            None => PageElement::new(Arc::clone(&self.session), locator),
        };
        let element = element.with_settings(self.settings.clone());
        match &self.cancel {
            Some(token) => element.with_cancel(token.clone()),
            None => element,
        }
    }

    /// Declares an element group under this scope's root.
    #[must_use]
    pub fn group(&self, locator: impl Into<Locator>) -> PageElementGroup {
        PageElementGroup::from_parts(
            Arc::clone(&self.session),
            locator.into(),
            self.search_scope(),
            self.settings.clone(),
            self.cancel.clone(),
        )
    }

    /// Creates a sub-scope rooted at the node `locator` matches.
    ///
    /// Members declared through the sub-scope resolve relative to that
    /// node. Sub-scopes nest arbitrarily deep.
    #[must_use]
    pub fn nested(&self, locator: impl Into<Locator>) -> PageScope {
        Self {
            session: Arc::clone(&self.session),
            settings: self.settings.clone(),
            cancel: self.cancel.clone(),
            root: Some(self.element(locator)),
        }
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

    struct InboxPage {
        session: Arc<dyn DriverSession>,
        heading: PageElement,
        rows: PageElementGroup,
    }

    impl InboxPage {
        fn new(session: Arc<dyn DriverSession>) -> Self {
            let scope = PageScope::new(Arc::clone(&session)).with_settings(
                WaitSettings::new()
                    .with_explicit_wait(Duration::from_secs(2))
                    .with_poll_interval(Duration::from_millis(500)),
            );
            Self {
                heading: scope.element(Locator::new(By::css("h1")).described("Inbox heading")),
                rows: scope.group(Locator::new(By::css(".mail-row"))),
                session,
            }
        }
    }

    #[async_trait]
    impl PageObject for InboxPage {
        fn name(&self) -> &str {
            "inbox"
        }

        fn session(&self) -> &Arc<dyn DriverSession> {
            &self.session
        }

        fn anchor(&self) -> Option<&PageElement> {
            Some(&self.heading)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_construction_makes_no_remote_calls() {
        let session = FakeSession::new(Platform::Web);
        let _page = InboxPage::new(session.clone() as Arc<dyn DriverSession>);

        assert_eq!(session.find_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_until_loaded_waits_for_anchor() {
        let session = FakeSession::new(Platform::Web);
        session
            .script_find(FindScript::Missing)
            .script_find(FindScript::Found(vec!["h1"]));
        let page = InboxPage::new(session.clone() as Arc<dyn DriverSession>);

        page.wait_until_loaded(None).await.unwrap();

        assert_eq!(session.find_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_nested_scope_roots_lookups_at_parent_node() {
        let session = FakeSession::new(Platform::Web);
        session
            .script_find(FindScript::Found(vec!["panel-1"]))
            .script_find(FindScript::Found(vec!["btn-1"]));
        let scope = PageScope::new(session.clone() as Arc<dyn DriverSession>);
        let panel = scope.nested(Locator::new(By::css("#sidebar")));
        let button = panel.element(Locator::new(By::css("button")));

        button.resolve_default().await.unwrap();

        let finds = session.finds();
        assert_eq!(finds[0].1, "document root");
        assert_eq!(finds[1].1, "node panel-1");
    }

    #[tokio::test(start_paused = true)]
    async fn test_scope_group_member_reads() {
        let session = FakeSession::new(Platform::Web);
        session.script_find(FindScript::Found(vec!["r1", "r2"]));
        session.script_perform(PerformScript::Ok(json!("Subject")));
        let page = InboxPage::new(session.clone() as Arc<dyn DriverSession>);

        assert_eq!(page.rows.size().await.unwrap(), 2);
        assert_eq!(page.rows.at(0).text().await.unwrap(), "Subject");
    }
}
