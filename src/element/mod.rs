//! Lazily-resolving, auto-retrying element wrappers.
//!
//! A [`PageElement`] owns a locator and a search scope but no resolved
//! handle: the remote node is looked up on first access and re-resolved
//! when the remote UI invalidates it. The cached handle lives in an
//! explicit three-state machine (unresolved / resolved / stale) whose
//! transitions are driven only by resolve and perform outcomes.
//!
//! # Staleness policy
//!
//! Remote UI trees mutate asynchronously (navigation, animation,
//! re-render); a naive one-shot lookup is flaky. When an op signals a
//! stale handle, the element re-resolves and retries the op **exactly
//! once**; a second staleness surfaces [`crate::Error::StaleElement`].
//! Only idempotent ops are retried automatically — a mutating op whose
//! first attempt may have partially applied (e.g. typed text) is never
//! re-dispatched unless the caller opts in via
//! [`PageElement::perform_with_retry`].
//!
//! # Example
//!
//! ```ignore
//! use pagewright::{By, Locator, PageElement};
//!
//! let submit = PageElement::new(session, Locator::new(By::css("#submit")));
//! submit.click().await?;           // waits interactable, resolves lazily
//! let label = submit.text().await?;
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::Value;
use tokio::time::Instant;
use tracing::debug;

use crate::config::WaitSettings;
use crate::error::{Error, Result};
use crate::locator::Locator;
use crate::session::{DriverSession, ElementHandle, Op, Scope};
use crate::wait::{CancelToken, Wait};

pub mod kinds;

// ============================================================================
// Handle State
// ============================================================================

/// Lifecycle of the cached remote handle.
///
/// Transitions: `Unresolved → Resolved` on a successful lookup,
/// `Resolved → Stale` on a staleness signal, `Stale → Resolved` on
/// re-resolution. The cache is invalidated, never destroyed — the
/// [`PageElement`] itself is reused for the lifetime of its page.
#[derive(Debug, Clone)]
enum HandleState {
    /// No lookup has happened yet.
    Unresolved,
    /// A live handle from the last successful lookup.
    Resolved(ElementHandle),
    /// The last handle was invalidated by remote mutation.
    Stale,
}

// ============================================================================
// Search Scope
// ============================================================================

/// Where a locator is evaluated: the document root or inside a parent
/// element that itself resolves lazily.
#[derive(Clone)]
pub(crate) enum SearchScope {
    /// Document (or view hierarchy) root.
    Root,
    /// Inside the parent's matched node.
    Within(PageElement),
}

// ============================================================================
// Stale Retry Policy
// ============================================================================

/// Two-state retry policy making the bound-of-one-retry explicit.
///
/// `attempt` consumes the single permitted retry; once exhausted (or when
/// retrying was never enabled for this op) it keeps returning `false`.
#[derive(Debug)]
struct StaleRetry {
    enabled: bool,
    attempted: bool,
}

impl StaleRetry {
    fn new(enabled: bool) -> Self {
        Self {
            enabled,
            attempted: false,
        }
    }

    fn attempt(&mut self) -> bool {
        if self.enabled && !self.attempted {
            self.attempted = true;
            true
        } else {
            false
        }
    }

    /// Whether the single permitted retry has been consumed.
    fn consumed(&self) -> bool {
        self.attempted
    }
}

// ============================================================================
// PageElement
// ============================================================================

/// Internal shared state for a page element.
struct PageElementInner {
    /// What to find. Immutable; a different target means a new element.
    locator: Locator,

    /// Root of the lookup.
    scope: SearchScope,

    /// When set, resolve via `find_all` and take the n-th match.
    /// Used by [`crate::group::PageElementGroup`] indexed views.
    nth: Option<usize>,

    /// Non-owning reference to the active driver session.
    session: Arc<dyn DriverSession>,

    /// Wait timings.
    settings: WaitSettings,

    /// External cancellation signal, checked at poll boundaries.
    cancel: Option<CancelToken>,

    /// Cached handle state machine.
    state: Mutex<HandleState>,
}

/// The lazily-resolving element wrapper exposed to page objects.
///
/// Clones share the same cached handle state; cloning is how an element
/// is handed to sub-scopes and wait conditions.
#[derive(Clone)]
pub struct PageElement {
    inner: Arc<PageElementInner>,
}

impl fmt::Debug for PageElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageElement")
            .field("locator", &self.inner.locator.to_string())
            .field("nth", &self.inner.nth)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for PageElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

// ============================================================================
// PageElement - Constructors
// ============================================================================

impl PageElement {
    fn from_parts(
        session: Arc<dyn DriverSession>,
        locator: Locator,
        scope: SearchScope,
        nth: Option<usize>,
        settings: WaitSettings,
        cancel: Option<CancelToken>,
    ) -> Self {
        Self {
            inner: Arc::new(PageElementInner {
                locator,
                scope,
                nth,
                session,
                settings,
                cancel,
                state: Mutex::new(HandleState::Unresolved),
            }),
        }
    }

    /// Creates a root-scoped element with default wait settings.
    ///
    /// No remote call happens here; the first access resolves the node.
    pub fn new(session: Arc<dyn DriverSession>, locator: impl Into<Locator>) -> Self {
        Self::from_parts(
            session,
            locator.into(),
            SearchScope::Root,
            None,
            WaitSettings::default(),
            None,
        )
    }

    /// Replaces the wait settings. Resets any cached handle.
    #[must_use]
    pub fn with_settings(self, settings: WaitSettings) -> Self {
        Self::from_parts(
            Arc::clone(&self.inner.session),
            self.inner.locator.clone(),
            self.inner.scope.clone(),
            self.inner.nth,
            settings,
            self.inner.cancel.clone(),
        )
    }

    /// Attaches a cancellation token to every wait this element performs.
    /// Resets any cached handle.
    #[must_use]
    pub fn with_cancel(self, token: CancelToken) -> Self {
        Self::from_parts(
            Arc::clone(&self.inner.session),
            self.inner.locator.clone(),
            self.inner.scope.clone(),
            self.inner.nth,
            self.inner.settings.clone(),
            Some(token),
        )
    }

    /// Declares a child element whose lookup is rooted at this element's
    /// matched node. Settings and cancellation are inherited.
    pub fn child(&self, locator: impl Into<Locator>) -> PageElement {
        Self::from_parts(
            Arc::clone(&self.inner.session),
            locator.into(),
            SearchScope::Within(self.clone()),
            None,
            self.inner.settings.clone(),
            self.inner.cancel.clone(),
        )
    }

    /// Creates an indexed view resolving to the n-th match of `locator`.
    pub(crate) fn nth_of(
        session: Arc<dyn DriverSession>,
        locator: Locator,
        scope: SearchScope,
        index: usize,
        settings: WaitSettings,
        cancel: Option<CancelToken>,
    ) -> Self {
        Self::from_parts(session, locator, scope, Some(index), settings, cancel)
    }
}

// ============================================================================
// PageElement - Accessors
// ============================================================================

impl PageElement {
    /// Returns the declared locator.
    #[inline]
    #[must_use]
    pub fn locator(&self) -> &Locator {
        &self.inner.locator
    }

    /// Returns the session this element resolves against.
    #[inline]
    #[must_use]
    pub fn session(&self) -> &Arc<dyn DriverSession> {
        &self.inner.session
    }

    /// Returns the wait settings in effect.
    #[inline]
    #[must_use]
    pub fn settings(&self) -> &WaitSettings {
        &self.inner.settings
    }

    /// Locator description, including the match index for indexed views.
    pub(crate) fn describe(&self) -> String {
        match self.inner.nth {
            Some(index) => format!("{}[{}]", self.inner.locator, index),
            None => self.inner.locator.to_string(),
        }
    }

    fn describe_scope(&self) -> String {
        match &self.inner.scope {
            SearchScope::Root => "document root".to_string(),
            SearchScope::Within(parent) => parent.describe(),
        }
    }
}

// ============================================================================
// PageElement - Handle State
// ============================================================================

impl PageElement {
    /// Marks the cached handle stale, forcing re-resolution on next use.
    pub fn invalidate(&self) {
        *self.inner.state.lock() = HandleState::Stale;
    }

    /// Discards all cached state, as if never resolved.
    pub fn reset(&self) {
        *self.inner.state.lock() = HandleState::Unresolved;
    }

    /// Returns the cached handle if present and not known-stale.
    fn cached(&self) -> Option<ElementHandle> {
        match &*self.inner.state.lock() {
            HandleState::Resolved(handle) => Some(handle.clone()),
            _ => None,
        }
    }

    fn store(&self, handle: ElementHandle) {
        *self.inner.state.lock() = HandleState::Resolved(handle);
    }

    /// Pre-binds the cache to a known handle (group views).
    pub(crate) fn seed(&self, handle: ElementHandle) {
        self.store(handle);
    }
}

// ============================================================================
// PageElement - Resolution
// ============================================================================

impl PageElement {
    /// Single non-polling lookup attempt.
    ///
    /// `Ok(None)` means "not there yet" (including an unresolved parent);
    /// recoverable transport outcomes are folded into it. Fatal errors
    /// propagate.
    async fn try_find(&self) -> Result<Option<ElementHandle>> {
        let scope = match &self.inner.scope {
            SearchScope::Root => Scope::Root,
            SearchScope::Within(parent) => match parent.try_handle_dyn().await? {
                Some(handle) => Scope::Node(handle),
                None => return Ok(None),
            },
        };

        match self.inner.nth {
            None => match self
                .inner
                .session
                .find_one(&self.inner.locator, &scope)
                .await
            {
                Ok(handle) => Ok(Some(handle)),
                Err(err) if err.is_recoverable() => Ok(None),
                Err(err) => Err(err),
            },
            Some(index) => match self
                .inner
                .session
                .find_all(&self.inner.locator, &scope)
                .await
            {
                Ok(handles) => Ok(handles.into_iter().nth(index)),
                Err(err) if err.is_recoverable() => Ok(None),
                Err(err) => Err(err),
            },
        }
    }

    /// Boxed form of [`try_handle`](Self::try_handle).
    ///
    /// Scope chains recurse (child → parent → grandparent); the trait
    /// object breaks the otherwise infinitely-sized future type.
    fn try_handle_dyn(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Option<ElementHandle>>> + Send + '_>> {
        Box::pin(self.try_handle())
    }

    /// Cached handle, or a single lookup attempt. Used by groups to root
    /// their lookups at a possibly-unresolved parent.
    pub(crate) async fn try_current(&self) -> Result<Option<ElementHandle>> {
        self.try_handle().await
    }

    /// Cached handle, or a single lookup attempt that caches on success.
    async fn try_handle(&self) -> Result<Option<ElementHandle>> {
        if let Some(handle) = self.cached() {
            return Ok(Some(handle));
        }
        match self.try_find().await? {
            Some(handle) => {
                self.store(handle.clone());
                Ok(Some(handle))
            }
            None => Ok(None),
        }
    }

    /// Resolves the remote handle, polling until found or `timeout`.
    ///
    /// Returns the cached handle when present and not known-stale.
    /// Fails with [`Error::NotFound`] when the locator matches nothing
    /// within the timeout.
    pub async fn resolve(&self, timeout: Duration) -> Result<ElementHandle> {
        if let Some(handle) = self.cached() {
            return Ok(handle);
        }

        let started = Instant::now();
        let wait = self.wait_with(Some(timeout));
        let me = self.clone();
        let outcome = wait
            .until(&format!("resolve({})", self.describe()), move || {
                let me = me.clone();
                async move { me.try_find().await }
            })
            .await;

        match outcome {
            Ok(handle) => {
                self.store(handle.clone());
                debug!(
                    locator = %self.describe(),
                    handle = %handle,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "element_resolved"
                );
                Ok(handle)
            }
            Err(Error::WaitTimeout { .. }) => {
                Err(Error::not_found(self.describe(), self.describe_scope()))
            }
            Err(err) => Err(err),
        }
    }

    /// Resolves with the configured explicit wait timeout.
    pub async fn resolve_default(&self) -> Result<ElementHandle> {
        self.resolve(self.inner.settings.explicit_wait()).await
    }

    fn wait_with(&self, timeout: Option<Duration>) -> Wait {
        let timeout = timeout.unwrap_or_else(|| self.inner.settings.explicit_wait());
        let wait = Wait::new(timeout, self.inner.settings.poll_interval_duration());
        match &self.inner.cancel {
            Some(token) => wait.with_cancel(token.clone()),
            None => wait,
        }
    }
}

// ============================================================================
// PageElement - Operations
// ============================================================================

impl PageElement {
    /// Executes `op` against the resolved handle.
    ///
    /// On a staleness signal the element re-resolves and retries once —
    /// but only when the op is idempotent. A second staleness (or a stale
    /// mutating op) surfaces [`Error::StaleElement`]. Any other transport
    /// error propagates without retry.
    pub async fn perform(&self, op: &Op) -> Result<Value> {
        self.dispatch(op, op.is_idempotent()).await
    }

    /// Like [`perform`](Self::perform), but opts a mutating op into the
    /// single staleness retry.
    ///
    /// Only use this when re-applying the op's side effect is safe for
    /// the application under test.
    pub async fn perform_with_retry(&self, op: &Op) -> Result<Value> {
        self.dispatch(op, true).await
    }

    async fn dispatch(&self, op: &Op, retry_on_stale: bool) -> Result<Value> {
        let mut retry = StaleRetry::new(retry_on_stale);
        loop {
            let handle = match self.resolve_default().await {
                Ok(handle) => handle,
                // The node vanished after a staleness signal: the single
                // permitted re-resolution also failed, which is the
                // staleness outcome, not a plain lookup miss.
                Err(Error::NotFound { .. }) if retry.consumed() => {
                    return Err(Error::stale_element(self.describe()));
                }
                Err(err) => return Err(err),
            };
            match self.inner.session.perform(&handle, op).await {
                Ok(value) => return Ok(value),
                Err(Error::StaleElement { .. }) => {
                    self.invalidate();
                    if retry.attempt() {
                        debug!(
                            locator = %self.describe(),
                            op = op.name(),
                            "element_stale_retry"
                        );
                        continue;
                    }
                    return Err(Error::stale_element(self.describe()));
                }
                Err(err) => return Err(err),
            }
        }
    }
}

// ============================================================================
// PageElement - Interaction Shortcuts
// ============================================================================

impl PageElement {
    /// Clicks the element after waiting for it to become interactable
    /// (visible and enabled) within the interactable timeout.
    pub async fn click(&self) -> Result<()> {
        self.wait_until_clickable(None).await?;
        self.perform(&Op::Click).await?;
        Ok(())
    }

    /// Types `text` into the element after the interactable wait.
    pub async fn type_text(&self, text: &str) -> Result<()> {
        self.wait_until_clickable(None).await?;
        self.perform(&Op::TypeText(text.to_string())).await?;
        Ok(())
    }

    /// Clears the element's value.
    pub async fn clear(&self) -> Result<()> {
        self.perform(&Op::Clear).await?;
        Ok(())
    }

    /// Reads the element's visible text.
    pub async fn text(&self) -> Result<String> {
        let value = self.perform(&Op::GetText).await?;
        Ok(value.as_str().unwrap_or("").to_string())
    }

    /// Reads the element's value (input elements).
    pub async fn value(&self) -> Result<String> {
        let value = self.perform(&Op::GetValue).await?;
        Ok(value.as_str().unwrap_or("").to_string())
    }

    /// Reads an attribute; `None` if absent.
    pub async fn attribute(&self, name: &str) -> Result<Option<String>> {
        let value = self.perform(&Op::GetAttribute(name.to_string())).await?;
        Ok(value.as_str().map(|s| s.to_string()))
    }

    /// Reads a property as a raw JSON value.
    pub async fn property(&self, name: &str) -> Result<Value> {
        self.perform(&Op::GetProperty(name.to_string())).await
    }

    /// Whether the element is rendered and visible.
    pub async fn is_displayed(&self) -> Result<bool> {
        let value = self.perform(&Op::IsDisplayed).await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    /// Whether the element accepts interaction.
    pub async fn is_enabled(&self) -> Result<bool> {
        let value = self.perform(&Op::IsEnabled).await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    /// Whether the element is selected/checked.
    pub async fn is_selected(&self) -> Result<bool> {
        let value = self.perform(&Op::IsSelected).await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    /// Scrolls the element into the viewport.
    pub async fn scroll_into_view(&self) -> Result<()> {
        self.perform(&Op::ScrollIntoView).await?;
        Ok(())
    }
}

// ============================================================================
// PageElement - Presence & Waits
// ============================================================================

impl PageElement {
    /// Whether the locator currently matches, via one fresh lookup.
    ///
    /// Discards the cache first so the answer reflects the remote state
    /// now, not a previously resolved handle.
    pub async fn is_present(&self) -> Result<bool> {
        self.reset();
        Ok(self.try_handle().await?.is_some())
    }

    /// Whether the element is present and displayed.
    pub async fn is_visible(&self) -> Result<bool> {
        if !self.is_present().await? {
            return Ok(false);
        }
        self.is_displayed().await
    }

    /// Waits until the locator matches. Defaults to the explicit wait.
    pub async fn wait_until_present(&self, timeout: Option<Duration>) -> Result<()> {
        let me = self.clone();
        self.wait_with(timeout)
            .until(&format!("present({})", self.describe()), move || {
                let me = me.clone();
                async move { Ok(me.try_handle().await?.map(|_| ())) }
            })
            .await
    }

    /// Waits until the element is present and displayed.
    pub async fn wait_until_visible(&self, timeout: Option<Duration>) -> Result<()> {
        let me = self.clone();
        self.wait_with(timeout)
            .until(&format!("visible({})", self.describe()), move || {
                let me = me.clone();
                async move {
                    match me.try_handle().await? {
                        None => Ok(None),
                        Some(_) => Ok(me.is_displayed().await?.then_some(())),
                    }
                }
            })
            .await
    }

    /// Waits until the element is absent or no longer displayed.
    pub async fn wait_until_not_visible(&self, timeout: Option<Duration>) -> Result<()> {
        let me = self.clone();
        self.wait_with(timeout)
            .until(&format!("not_visible({})", self.describe()), move || {
                let me = me.clone();
                async move {
                    // Fresh lookup each poll: a cached handle would keep
                    // reporting the node that already left the tree.
                    me.reset();
                    match me.try_handle().await? {
                        None => Ok(Some(())),
                        Some(_) => Ok((!me.is_displayed().await?).then_some(())),
                    }
                }
            })
            .await
    }

    /// Waits until the element is displayed and enabled.
    ///
    /// Defaults to the interactable timeout, which is typically shorter
    /// than the presence wait: an element that is present but never
    /// becomes actionable should fail fast.
    pub async fn wait_until_clickable(&self, timeout: Option<Duration>) -> Result<()> {
        let timeout = timeout.unwrap_or_else(|| self.inner.settings.interactable_wait());
        let me = self.clone();
        self.wait_with(Some(timeout))
            .until(&format!("interactable({})", self.describe()), move || {
                let me = me.clone();
                async move {
                    match me.try_handle().await? {
                        None => Ok(None),
                        Some(_) => {
                            let ready = me.is_displayed().await? && me.is_enabled().await?;
                            Ok(ready.then_some(()))
                        }
                    }
                }
            })
            .await
    }
}

// ============================================================================
// Tests
// ============================================================================
