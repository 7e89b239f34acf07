//! Platform dispatch for page objects.
//!
//! Test suites register one page factory per `(page id, platform)` pair,
//! optionally with a platform-independent default, and construct pages by
//! id alone — the registry picks the implementation matching the
//! session's platform. Lookup is explicit table dispatch; there is no
//! naming convention to satisfy, and a missing registration is a
//! distinct, diagnosable error.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::{Error, Result};
use crate::session::{DriverSession, Platform};

use super::PageObject;

/// Constructs one page implementation against a session.
pub type PageFactory = Box<dyn Fn(Arc<dyn DriverSession>) -> Box<dyn PageObject> + Send + Sync>;

// ============================================================================
// PageRegistry
// ============================================================================

/// Maps `(page id, platform)` pairs to page factories.
///
/// Resolution order for [`construct`](Self::construct):
///
/// 1. exact `(id, session platform)` registration
/// 2. platform-independent default for `id`
/// 3. [`Error::PlatformImplementationMissing`]
///
/// # Example
///
/// ```ignore
/// let mut registry = PageRegistry::new();
/// registry.register("login", Platform::Web, |s| Box::new(WebLoginPage::new(s)));
/// registry.register("login", Platform::Ios, |s| Box::new(IosLoginPage::new(s)));
///
/// // Picks the iOS implementation when the session drives an iOS device.
/// let page = registry.construct("login", session)?;
/// ```
#[derive(Default)]
pub struct PageRegistry {
    factories: FxHashMap<(String, Platform), PageFactory>,
    defaults: FxHashMap<String, PageFactory>,
}

impl PageRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory for one `(id, platform)` pair.
    ///
    /// A later registration for the same pair replaces the earlier one.
    pub fn register<F>(&mut self, id: impl Into<String>, platform: Platform, factory: F)
    where
        F: Fn(Arc<dyn DriverSession>) -> Box<dyn PageObject> + Send + Sync + 'static,
    {
        self.factories
            .insert((id.into(), platform), Box::new(factory));
    }

    /// Registers a platform-independent fallback for `id`.
    ///
    /// Used when no exact platform registration exists, typically for
    /// pages whose markup is identical across platforms.
    pub fn register_default<F>(&mut self, id: impl Into<String>, factory: F)
    where
        F: Fn(Arc<dyn DriverSession>) -> Box<dyn PageObject> + Send + Sync + 'static,
    {
        self.defaults.insert(id.into(), Box::new(factory));
    }

    /// Whether any registration (exact or default) exists for `id`.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.defaults.contains_key(id)
            || self.factories.keys().any(|(page, _)| page == id)
    }

    /// Constructs the `id` page for the session's platform.
    pub fn construct(&self, id: &str, session: Arc<dyn DriverSession>) -> Result<Box<dyn PageObject>> {
        let platform = session.platform();
        let key = (id.to_string(), platform);
        if let Some(factory) = self.factories.get(&key) {
            debug!(page = id, platform = %platform, "page_constructed");
            return Ok(factory(session));
        }
        if let Some(factory) = self.defaults.get(id) {
            debug!(page = id, platform = %platform, "page_constructed_default");
            return Ok(factory(session));
        }
        Err(Error::platform_missing(id, platform))
    }
}

impl std::fmt::Debug for PageRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageRegistry")
            .field("registrations", &self.factories.len())
            .field("defaults", &self.defaults.len())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use crate::session::fake::FakeSession;

    struct StubPage {
        session: Arc<dyn DriverSession>,
        name: &'static str,
    }

    impl PageObject for StubPage {
        fn name(&self) -> &str {
            self.name
        }

        fn session(&self) -> &Arc<dyn DriverSession> {
            &self.session
        }
    }

    fn stub(name: &'static str) -> impl Fn(Arc<dyn DriverSession>) -> Box<dyn PageObject> {
        move |session| Box::new(StubPage { session, name })
    }

    #[test]
    fn test_dispatch_follows_session_platform() {
        let mut registry = PageRegistry::new();
        registry.register("login", Platform::Web, stub("login-web"));
        registry.register("login", Platform::Ios, stub("login-ios"));
        registry.register("login", Platform::Android, stub("login-android"));

        let ios = FakeSession::new(Platform::Ios);
        let page = registry.construct("login", ios).unwrap();
        assert_eq!(page.name(), "login-ios");

        let android = FakeSession::new(Platform::Android);
        let page = registry.construct("login", android).unwrap();
        assert_eq!(page.name(), "login-android");

        let web = FakeSession::new(Platform::Web);
        let page = registry.construct("login", web).unwrap();
        assert_eq!(page.name(), "login-web");
    }

    #[test]
    fn test_default_used_when_platform_unregistered() {
        let mut registry = PageRegistry::new();
        registry.register("settings", Platform::Web, stub("settings-web"));
        registry.register_default("settings", stub("settings-any"));

        let ios = FakeSession::new(Platform::Ios);
        let page = registry.construct("settings", ios).unwrap();
        assert_eq!(page.name(), "settings-any");
    }

    #[test]
    fn test_exact_registration_wins_over_default() {
        let mut registry = PageRegistry::new();
        registry.register("settings", Platform::Web, stub("settings-web"));
        registry.register_default("settings", stub("settings-any"));

        let web = FakeSession::new(Platform::Web);
        let page = registry.construct("settings", web).unwrap();
        assert_eq!(page.name(), "settings-web");
    }

    #[test]
    fn test_missing_registration_is_a_distinct_error() {
        let registry = PageRegistry::new();

        let err = registry
            .construct("checkout", FakeSession::new(Platform::Android))
            .map(|_| ())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::PlatformImplementationMissing { ref page, platform }
                if page == "checkout" && platform == Platform::Android
        ));
    }

    #[test]
    fn test_reregistration_replaces() {
        let mut registry = PageRegistry::new();
        registry.register("login", Platform::Web, stub("v1"));
        registry.register("login", Platform::Web, stub("v2"));

        let page = registry
            .construct("login", FakeSession::new(Platform::Web))
            .unwrap();
        assert_eq!(page.name(), "v2");
        assert!(registry.contains("login"));
        assert!(!registry.contains("logout"));
    }
}
