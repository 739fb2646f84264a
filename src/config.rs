//! Configuration schema for the middleware.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::engine::InMemoryRateLimiter;
use crate::middleware::RateLimitState;
use crate::quota::Quota;

/// Rate limiting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Maximum attempts per window.
    pub max_attempts: u64,

    /// Window length in seconds.
    pub window_secs: u64,

    /// Scope label prefixed to every identifier (e.g. endpoint name).
    /// Empty means identifiers carry the caller identity alone.
    pub scope: String,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_attempts: 60,
            window_secs: 60,
            scope: String::new(),
        }
    }
}

impl RateLimitConfig {
    /// The quota this configuration describes.
    pub fn quota(&self) -> Quota {
        Quota::per_duration(self.max_attempts, Duration::from_secs(self.window_secs))
    }

    /// Build a middleware state with the default collaborators: IP-based
    /// identity, this fixed quota, and an in-memory engine.
    pub fn into_state(self) -> RateLimitState {
        let quota = self.quota();
        RateLimitState::fixed(Arc::new(InMemoryRateLimiter::new()), quota, self.scope)
    }
}
