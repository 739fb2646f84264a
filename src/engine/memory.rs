//! In-memory fixed-window rate limiter.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Instant, SystemTime};

use crate::engine::{Decision, EngineError, RateLimiter};
use crate::quota::Quota;

/// Per-identifier counter for the current window.
struct Window {
    attempts: u64,
    expires: Instant,
}

/// A process-local rate limiter backed by fixed-window counters.
///
/// Suitable for single-process deployments and tests; multi-instance
/// deployments need a shared backend implementing [`RateLimiter`].
pub struct InMemoryRateLimiter {
    windows: Mutex<HashMap<String, Window>>,
}

impl InMemoryRateLimiter {
    pub fn new() -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
        }
    }

    fn record(&self, identifier: &str, quota: Quota) -> Decision {
        let now = Instant::now();
        let mut windows = self.windows.lock().expect("rate limiter mutex poisoned");

        let window = windows
            .entry(identifier.to_string())
            .or_insert_with(|| Window {
                attempts: 0,
                expires: now + quota.window(),
            });

        // Lazy reset: a fresh window starts on first attempt after expiry.
        if now >= window.expires {
            window.attempts = 0;
            window.expires = now + quota.window();
        }

        window.attempts += 1;

        let limit = quota.max_attempts();
        let reset_at = SystemTime::now() + window.expires.duration_since(now);

        Decision {
            limit,
            remaining_attempts: limit.saturating_sub(window.attempts),
            reset_at,
            exceeded: window.attempts > limit,
        }
    }
}

impl Default for InMemoryRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn record_attempt(&self, identifier: &str, quota: Quota) -> Result<Decision, EngineError> {
        Ok(self.record(identifier, quota))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_counts_down_remaining_attempts() {
        let limiter = InMemoryRateLimiter::new();
        let quota = Quota::per_minute(3);

        let first = limiter.record("api:client", quota);
        let second = limiter.record("api:client", quota);
        let third = limiter.record("api:client", quota);

        assert_eq!(first.remaining_attempts, 2);
        assert_eq!(second.remaining_attempts, 1);
        assert_eq!(third.remaining_attempts, 0);
        assert!(!third.exceeded);
    }

    #[test]
    fn test_exceeded_after_limit_with_zero_remaining() {
        let limiter = InMemoryRateLimiter::new();
        let quota = Quota::per_minute(2);

        limiter.record("api:client", quota);
        limiter.record("api:client", quota);
        let denied = limiter.record("api:client", quota);

        assert!(denied.exceeded);
        assert_eq!(denied.remaining_attempts, 0);
        assert_eq!(denied.limit, 2);
    }

    #[test]
    fn test_identifiers_are_counted_independently() {
        let limiter = InMemoryRateLimiter::new();
        let quota = Quota::per_minute(1);

        let a = limiter.record("api:a", quota);
        let b = limiter.record("api:b", quota);

        assert!(!a.exceeded);
        assert!(!b.exceeded);
    }

    #[test]
    fn test_window_resets_after_expiry() {
        let limiter = InMemoryRateLimiter::new();
        let quota = Quota::per_duration(1, Duration::from_millis(50));

        let first = limiter.record("api:client", quota);
        let denied = limiter.record("api:client", quota);
        std::thread::sleep(Duration::from_millis(80));
        let after_reset = limiter.record("api:client", quota);

        assert!(!first.exceeded);
        assert!(denied.exceeded);
        assert!(!after_reset.exceeded);
        assert_eq!(after_reset.remaining_attempts, 0);
    }

    #[test]
    fn test_reset_at_lies_within_the_window() {
        let limiter = InMemoryRateLimiter::new();
        let quota = Quota::per_minute(3);

        let decision = limiter.record("api:client", quota);
        let until_reset = decision
            .reset_at
            .duration_since(SystemTime::now())
            .unwrap_or_default();

        assert!(until_reset <= Duration::from_secs(60));
        assert!(until_reset > Duration::from_secs(58));
    }
}
