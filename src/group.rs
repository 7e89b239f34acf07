//! Ordered collections of elements under one locator.
//!
//! A [`PageElementGroup`] resolves zero or more handles for a single
//! locator and hands out per-index [`PageElement`] views. The group size
//! is never assumed stable across UI mutation: [`refresh`] re-evaluates
//! the match set, and indexed views re-resolve through the whole group
//! (n-th match) when their handle goes stale.
//!
//! [`refresh`]: PageElementGroup::refresh
//!
//! # Example
//!
//! ```ignore
//! use pagewright::{By, Locator, PageElementGroup};
//!
//! let rows = PageElementGroup::new(session, Locator::new(By::css("table tr")));
//! for row in rows.elements().await? {
//!     println!("{}", row.text().await?);
//! }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::debug;

use crate::config::WaitSettings;
use crate::element::{PageElement, SearchScope};
use crate::error::{Error, Result};
use crate::locator::Locator;
use crate::session::{DriverSession, ElementHandle, Scope};
use crate::wait::{CancelToken, Wait};

// ============================================================================
// PageElementGroup
// ============================================================================

/// Internal shared state for an element group.
struct GroupInner {
    locator: Locator,
    scope: SearchScope,
    session: Arc<dyn DriverSession>,
    settings: WaitSettings,
    cancel: Option<CancelToken>,
    /// Handles from the last resolution, in document order.
    handles: Mutex<Option<Vec<ElementHandle>>>,
}

/// Lazily-resolving ordered collection variant of [`PageElement`].
#[derive(Clone)]
pub struct PageElementGroup {
    inner: Arc<GroupInner>,
}

impl fmt::Debug for PageElementGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageElementGroup")
            .field("locator", &self.inner.locator.to_string())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for PageElementGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[*]", self.inner.locator)
    }
}

// ============================================================================
// PageElementGroup - Constructors
// ============================================================================

impl PageElementGroup {
    pub(crate) fn from_parts(
        session: Arc<dyn DriverSession>,
        locator: Locator,
        scope: SearchScope,
        settings: WaitSettings,
        cancel: Option<CancelToken>,
    ) -> Self {
        Self {
            inner: Arc::new(GroupInner {
                locator,
                scope,
                session,
                settings,
                cancel,
                handles: Mutex::new(None),
            }),
        }
    }

    /// Creates a root-scoped group with default wait settings.
    pub fn new(session: Arc<dyn DriverSession>, locator: impl Into<Locator>) -> Self {
        Self::from_parts(
            session,
            locator.into(),
            SearchScope::Root,
            WaitSettings::default(),
            None,
        )
    }

    /// Replaces the wait settings. Resets any cached handles.
    #[must_use]
    pub fn with_settings(self, settings: WaitSettings) -> Self {
        Self::from_parts(
            Arc::clone(&self.inner.session),
            self.inner.locator.clone(),
            self.inner.scope.clone(),
            settings,
            self.inner.cancel.clone(),
        )
    }

    /// Attaches a cancellation token. Resets any cached handles.
    #[must_use]
    pub fn with_cancel(self, token: CancelToken) -> Self {
        Self::from_parts(
            Arc::clone(&self.inner.session),
            self.inner.locator.clone(),
            self.inner.scope.clone(),
            self.inner.settings.clone(),
            Some(token),
        )
    }
}

// ============================================================================
// PageElementGroup - Accessors
// ============================================================================

impl PageElementGroup {
    /// Returns the declared locator.
    #[inline]
    #[must_use]
    pub fn locator(&self) -> &Locator {
        &self.inner.locator
    }

    fn describe(&self) -> String {
        format!("{self}")
    }

    fn cached(&self) -> Option<Vec<ElementHandle>> {
        self.inner.handles.lock().clone()
    }

    fn store(&self, handles: Vec<ElementHandle>) {
        *self.inner.handles.lock() = Some(handles);
    }

    /// Discards the cached match set.
    pub fn invalidate(&self) {
        *self.inner.handles.lock() = None;
    }
}

// ============================================================================
// PageElementGroup - Resolution
// ============================================================================

impl PageElementGroup {
    /// One non-polling `find_all` attempt; `Ok(None)` while the parent
    /// scope is not there yet.
    async fn try_find_all(&self) -> Result<Option<Vec<ElementHandle>>> {
        let scope = match &self.inner.scope {
            SearchScope::Root => Scope::Root,
            SearchScope::Within(parent) => match parent.try_current().await? {
                Some(handle) => Scope::Node(handle),
                None => return Ok(None),
            },
        };
        match self
            .inner
            .session
            .find_all(&self.inner.locator, &scope)
            .await
        {
            Ok(handles) => Ok(Some(handles)),
            Err(err) if err.is_recoverable() => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Resolves all current matches, in document order.
    ///
    /// An empty sequence is a successful result. The wait only covers an
    /// unresolved parent scope; timeout surfaces [`Error::NotFound`] for
    /// the parent chain.
    pub async fn resolve_all(&self, timeout: Duration) -> Result<Vec<ElementHandle>> {
        if let Some(handles) = self.cached() {
            return Ok(handles);
        }

        let me = self.clone();
        let outcome = self
            .wait_with(timeout)
            .until(&format!("resolve_all({})", self.describe()), move || {
                let me = me.clone();
                async move { me.try_find_all().await }
            })
            .await;

        match outcome {
            Ok(handles) => {
                debug!(
                    locator = %self.describe(),
                    count = handles.len(),
                    "element_resolved"
                );
                self.store(handles.clone());
                Ok(handles)
            }
            Err(Error::WaitTimeout { .. }) => {
                Err(Error::not_found(self.describe(), self.describe_scope()))
            }
            Err(err) => Err(err),
        }
    }

    /// Resolves and requires at least `min` matches within `timeout`.
    ///
    /// Keeps polling while fewer than `min` nodes match; expiry surfaces
    /// [`Error::NotFound`].
    pub async fn resolve_at_least(
        &self,
        min: usize,
        timeout: Duration,
    ) -> Result<Vec<ElementHandle>> {
        let me = self.clone();
        let outcome = self
            .wait_with(timeout)
            .until(
                &format!("at_least({min}, {})", self.describe()),
                move || {
                    let me = me.clone();
                    async move {
                        me.invalidate();
                        match me.try_find_all().await? {
                            Some(handles) if handles.len() >= min => Ok(Some(handles)),
                            _ => Ok(None),
                        }
                    }
                },
            )
            .await;

        match outcome {
            Ok(handles) => {
                self.store(handles.clone());
                Ok(handles)
            }
            Err(Error::WaitTimeout { .. }) => {
                Err(Error::not_found(self.describe(), self.describe_scope()))
            }
            Err(err) => Err(err),
        }
    }

    /// Number of matches, resolving first if no cached set exists.
    pub async fn size(&self) -> Result<usize> {
        let handles = self
            .resolve_all(self.inner.settings.explicit_wait())
            .await?;
        Ok(handles.len())
    }

    /// Forces re-resolution against the current remote state.
    pub async fn refresh(&self) -> Result<Vec<ElementHandle>> {
        self.invalidate();
        self.resolve_all(self.inner.settings.explicit_wait()).await
    }

    fn describe_scope(&self) -> String {
        match &self.inner.scope {
            SearchScope::Root => "document root".to_string(),
            SearchScope::Within(parent) => parent.describe(),
        }
    }

    fn wait_with(&self, timeout: Duration) -> Wait {
        let wait = Wait::new(timeout, self.inner.settings.poll_interval_duration());
        match &self.inner.cancel {
            Some(token) => wait.with_cancel(token.clone()),
            None => wait,
        }
    }
}

// ============================================================================
// PageElementGroup - Indexed Views
// ============================================================================

impl PageElementGroup {
    /// Returns a view bound to the `index`-th match.
    ///
    /// The view re-resolves through the whole group (`find_all`, n-th)
    /// whenever its handle is stale or absent, so it stays valid across
    /// remote mutation as long as enough nodes match. When a cached match
    /// set covers `index`, the view is pre-bound to the current handle.
    #[must_use]
    pub fn at(&self, index: usize) -> PageElement {
        let view = PageElement::nth_of(
            Arc::clone(&self.inner.session),
            self.inner.locator.clone(),
            self.inner.scope.clone(),
            index,
            self.inner.settings.clone(),
            self.inner.cancel.clone(),
        );
        if let Some(handles) = self.cached()
            && let Some(handle) = handles.get(index)
        {
            view.seed(handle.clone());
        }
        view
    }

    /// Materializes one indexed view per current match.
    pub async fn elements(&self) -> Result<Vec<PageElement>> {
        let count = self.size().await?;
        Ok((0..count).map(|index| self.at(index)).collect())
    }
}

// ============================================================================
// Tests
// ============================================================================
