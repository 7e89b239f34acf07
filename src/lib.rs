//! Pagewright - Resilient page-object layer for browser and mobile test automation.
//!
//! This library provides the element and page abstractions a BDD test
//! suite builds on: elements that locate themselves lazily and survive
//! DOM churn, polling waits with cancellation, and page objects
//! dispatched per platform.
//!
//! # Architecture
//!
//! The layer sits between step definitions and the automation transport:
//!
//! - **Above**: page objects declare named [`PageElement`]s; steps call them
//! - **Below**: a [`DriverSession`] implementation talks to the real driver
//!
//! Key design principles:
//!
//! - Elements are lazy: constructing one performs no remote calls
//! - A stale handle triggers exactly one transparent re-resolve and retry
//! - Waiting is explicit polling with a hard deadline and cooperative cancel
//! - Platform variants are table-dispatched, never name-mangled
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use pagewright::{By, DriverSession, Locator, PageElement, Result};
//!
//! async fn log_in(session: Arc<dyn DriverSession>) -> Result<()> {
//!     let username = PageElement::new(Arc::clone(&session), Locator::new(By::id("user")));
//!     let submit = PageElement::new(session, Locator::new(By::id("submit")));
//!
//!     // Each call resolves (or re-resolves) the element as needed.
//!     username.type_text("alice").await?;
//!     submit.click().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Wait timing settings ([`WaitSettings`]) |
//! | [`element`] | Lazy self-healing elements: [`PageElement`], typed kinds |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`group`] | Multi-match collections: [`PageElementGroup`] |
//! | [`locator`] | Lookup strategies: [`By`], [`Locator`] |
//! | [`page`] | Page objects, scopes and platform dispatch |
//! | [`session`] | Transport boundary: [`DriverSession`] trait |
//! | [`wait`] | Polling waits: [`Wait`], [`CancelToken`] |

// ============================================================================
// Modules
// ============================================================================

/// Wait timing settings.
///
/// [`WaitSettings`] carries the explicit, poll and interactable
/// intervals every element inherits.
pub mod config;

/// Lazy self-healing elements.
///
/// - [`PageElement`] - single element, resolved on demand
/// - [`element::kinds`] - typed wrappers ([`Button`], [`InputText`], ...)
pub mod element;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Multi-match element collections.
pub mod group;

/// Lookup strategies and locator values.
pub mod locator;

/// Page objects, scopes and platform dispatch.
///
/// - [`PageObject`] - one logical screen
/// - [`PageScope`] - element factory for a page
/// - [`PageRegistry`] - per-platform implementation dispatch
pub mod page;

/// Transport boundary.
///
/// [`DriverSession`] is the only seam to the real automation driver;
/// everything above it is transport-agnostic.
pub mod session;

/// Polling waits with deadline and cancellation.
pub mod wait;

// ============================================================================
// Re-exports
// ============================================================================

// Configuration
pub use config::WaitSettings;

// Element types
pub use element::PageElement;
pub use element::kinds::{Button, Checkbox, InputRadio, InputText, Link, Select};

// Error types
pub use error::{Error, Result};

// Group types
pub use group::PageElementGroup;

// Locator types
pub use locator::{By, Locator};

// Page types
pub use page::registry::{PageFactory, PageRegistry};
pub use page::{PageObject, PageScope};

// Session boundary
pub use session::{DriverSession, ElementHandle, Op, Platform, Scope};

// Waiting
pub use wait::{CancelToken, Wait};
