//! Explicit-wait polling engine.
//!
//! [`Wait`] re-evaluates an async condition at a fixed cadence until it is
//! satisfied or a deadline elapses. Between polls the calling task sleeps;
//! no background work is spawned, because test steps are inherently
//! sequential against a remote UI.
//!
//! Guarantees:
//!
//! - the final evaluation happens at or after the deadline boundary, never
//!   before (no premature timeout);
//! - recoverable condition errors (not-found, staleness) count as "not yet
//!   satisfied" and are retried; any other error aborts the wait at once;
//! - a supplied [`CancelToken`] is checked at every poll boundary and wins
//!   over both satisfaction and timeout.
//!
//! # Example
//!
//! ```ignore
//! let wait = Wait::new(Duration::from_secs(2), Duration::from_millis(500));
//! let title = wait
//!     .until("title present", || async { probe_title().await })
//!     .await?;
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::time::{Instant, sleep};
use tracing::{debug, warn};

use crate::config::WaitSettings;
use crate::error::{Error, Result};

// ============================================================================
// CancelToken
// ============================================================================

/// Cheap clonable cancellation flag.
///
/// A test-level timeout (external to this crate) cancels the token; any
/// wait holding a clone observes it at its next poll boundary and fails
/// with [`Error::Cancelled`] instead of completing the remaining polls.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a token in the not-cancelled state.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Signals cancellation to every clone of this token.
    #[inline]
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called.
    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

// ============================================================================
// Wait
// ============================================================================

/// Bounded polling loop with timeout, cadence and optional cancellation.
#[derive(Debug, Clone)]
pub struct Wait {
    timeout: Duration,
    poll_interval: Duration,
    cancel: Option<CancelToken>,
}

impl Wait {
    /// Creates a wait with the given deadline and poll cadence.
    #[inline]
    #[must_use]
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
            cancel: None,
        }
    }

    /// Creates a wait from configured settings, using the explicit wait
    /// timeout.
    #[inline]
    #[must_use]
    pub fn from_settings(settings: &WaitSettings) -> Self {
        Self::new(settings.explicit_wait(), settings.poll_interval_duration())
    }

    /// Overrides the deadline.
    #[inline]
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Attaches a cancellation token, checked at each poll boundary.
    #[inline]
    #[must_use]
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Returns the configured deadline.
    #[inline]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

// ============================================================================
// Wait - Polling
// ============================================================================

impl Wait {
    /// Polls `condition` until it yields a value or the deadline elapses.
    ///
    /// The condition reports three outcomes:
    ///
    /// - `Ok(Some(value))` — satisfied, the wait returns `value`;
    /// - `Ok(None)` — not yet, re-evaluated after one poll interval;
    /// - `Err(e)` — retried if [`Error::is_recoverable`], aborted otherwise.
    ///
    /// `operation` names the condition in timeout errors and events.
    pub async fn until<T, F, Fut>(&self, operation: &str, mut condition: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Option<T>>>,
    {
        let started = Instant::now();
        debug!(
            operation = operation,
            timeout_ms = self.timeout.as_millis() as u64,
            poll_ms = self.poll_interval.as_millis() as u64,
            "Polling until condition holds"
        );

        loop {
            if let Some(token) = &self.cancel
                && token.is_cancelled()
            {
                debug!(operation = operation, "Wait cancelled");
                return Err(Error::cancelled(operation));
            }

            match condition().await {
                Ok(Some(value)) => {
                    debug!(
                        operation = operation,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Condition satisfied"
                    );
                    return Ok(value);
                }
                Ok(None) => {}
                Err(err) if err.is_recoverable() => {
                    debug!(operation = operation, error = %err, "Condition not yet satisfied");
                }
                Err(err) => return Err(err),
            }

            let elapsed = started.elapsed();
            if elapsed >= self.timeout {
                warn!(
                    operation = operation,
                    timeout_ms = self.timeout.as_millis() as u64,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "wait_timed_out"
                );
                return Err(Error::wait_timeout(
                    operation,
                    self.timeout.as_millis() as u64,
                ));
            }

            // Never sleep past the deadline: the last poll lands on it.
            let remaining = self.timeout - elapsed;
            sleep(self.poll_interval.min(remaining)).await;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
