//! Quota value type: how many attempts are allowed per time window.

use std::time::Duration;

/// An immutable rate limit definition: `max_attempts` per `window`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quota {
    max_attempts: u64,
    window: Duration,
}

impl Quota {
    /// Create a quota over an arbitrary window.
    pub fn per_duration(max_attempts: u64, window: Duration) -> Self {
        debug_assert!(max_attempts > 0, "quota must allow at least one attempt");
        debug_assert!(!window.is_zero(), "quota window must be non-zero");
        Self {
            max_attempts,
            window,
        }
    }

    /// `max_attempts` per second.
    pub fn per_second(max_attempts: u64) -> Self {
        Self::per_duration(max_attempts, Duration::from_secs(1))
    }

    /// `max_attempts` per minute.
    pub fn per_minute(max_attempts: u64) -> Self {
        Self::per_duration(max_attempts, Duration::from_secs(60))
    }

    /// `max_attempts` per hour.
    pub fn per_hour(max_attempts: u64) -> Self {
        Self::per_duration(max_attempts, Duration::from_secs(60 * 60))
    }

    /// `max_attempts` per day.
    pub fn per_day(max_attempts: u64) -> Self {
        Self::per_duration(max_attempts, Duration::from_secs(24 * 60 * 60))
    }

    /// Maximum attempts allowed within one window.
    pub fn max_attempts(&self) -> u64 {
        self.max_attempts
    }

    /// Length of the accounting window.
    pub fn window(&self) -> Duration {
        self.window
    }
}
