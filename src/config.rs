//! Wait timing configuration.
//!
//! The settings loader (out of scope here) deserializes these options from
//! the project configuration; field names follow the configuration keys:
//!
//! ```toml
//! explicit_wait_timeout = 10.0
//! poll_interval = 0.5
//! interactable_wait_timeout = 5.0
//! ```
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use pagewright::WaitSettings;
//!
//! let settings = WaitSettings::new()
//!     .with_explicit_wait(Duration::from_secs(20))
//!     .with_poll_interval(Duration::from_millis(250));
//!
//! assert_eq!(settings.explicit_wait(), Duration::from_secs(20));
//! ```

use std::time::Duration;

use serde::Deserialize;

// ============================================================================
// Defaults
// ============================================================================

/// Default presence/condition wait (seconds).
const DEFAULT_EXPLICIT_WAIT_SECS: f64 = 10.0;

/// Default poll cadence (seconds).
const DEFAULT_POLL_INTERVAL_SECS: f64 = 0.5;

/// Default interactable precondition wait (seconds).
///
/// Shorter than the presence wait: an element that is present but never
/// becomes clickable should fail fast.
const DEFAULT_INTERACTABLE_WAIT_SECS: f64 = 5.0;

// ============================================================================
// WaitSettings
// ============================================================================

/// Timeouts and poll cadence for element resolution and waits.
///
/// Values are stored as fractional seconds to mirror the configuration
/// file; accessors expose [`Duration`]s.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WaitSettings {
    /// Presence/condition wait, in seconds.
    pub explicit_wait_timeout: f64,

    /// Poll cadence, in seconds.
    pub poll_interval: f64,

    /// Interactable (visible and enabled) precondition wait, in seconds.
    pub interactable_wait_timeout: f64,
}

impl Default for WaitSettings {
    fn default() -> Self {
        Self {
            explicit_wait_timeout: DEFAULT_EXPLICIT_WAIT_SECS,
            poll_interval: DEFAULT_POLL_INTERVAL_SECS,
            interactable_wait_timeout: DEFAULT_INTERACTABLE_WAIT_SECS,
        }
    }
}

// ============================================================================
// Constructors & Builder Methods
// ============================================================================

impl WaitSettings {
    /// Creates settings with default timings.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the explicit wait timeout.
    #[inline]
    #[must_use]
    pub fn with_explicit_wait(mut self, timeout: Duration) -> Self {
        self.explicit_wait_timeout = timeout.as_secs_f64();
        self
    }

    /// Sets the poll interval.
    #[inline]
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval.as_secs_f64();
        self
    }

    /// Sets the interactable precondition timeout.
    #[inline]
    #[must_use]
    pub fn with_interactable_wait(mut self, timeout: Duration) -> Self {
        self.interactable_wait_timeout = timeout.as_secs_f64();
        self
    }
}

// ============================================================================
// Accessors
// ============================================================================

impl WaitSettings {
    /// Presence/condition wait timeout.
    #[inline]
    #[must_use]
    pub fn explicit_wait(&self) -> Duration {
        Duration::from_secs_f64(self.explicit_wait_timeout)
    }

    /// Poll cadence.
    #[inline]
    #[must_use]
    pub fn poll_interval_duration(&self) -> Duration {
        Duration::from_secs_f64(self.poll_interval)
    }

    /// Interactable precondition wait timeout.
    #[inline]
    #[must_use]
    pub fn interactable_wait(&self) -> Duration {
        Duration::from_secs_f64(self.interactable_wait_timeout)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = WaitSettings::default();
        assert_eq!(settings.explicit_wait(), Duration::from_secs(10));
        assert_eq!(settings.poll_interval_duration(), Duration::from_millis(500));
        assert_eq!(settings.interactable_wait(), Duration::from_secs(5));
    }

    #[test]
    fn test_builder() {
        let settings = WaitSettings::new()
            .with_explicit_wait(Duration::from_secs(30))
            .with_poll_interval(Duration::from_millis(100))
            .with_interactable_wait(Duration::from_secs(2));
        assert_eq!(settings.explicit_wait(), Duration::from_secs(30));
        assert_eq!(settings.poll_interval_duration(), Duration::from_millis(100));
        assert_eq!(settings.interactable_wait(), Duration::from_secs(2));
    }

    #[test]
    fn test_deserialize_partial() {
        let settings: WaitSettings =
            serde_json::from_str(r#"{"explicit_wait_timeout": 3.5}"#).unwrap();
        assert_eq!(settings.explicit_wait(), Duration::from_millis(3500));
        // Unspecified keys fall back to defaults.
        assert_eq!(settings.poll_interval_duration(), Duration::from_millis(500));
    }
}
