//! Rate limiting engine interface.
//!
//! # Data Flow
//! ```text
//! middleware.rs
//!     → RateLimiter::record_attempt(identifier, quota)
//!     → Decision { exceeded, remaining, reset }
//!     → middleware branches and decorates headers
//! ```
//!
//! # Design Decisions
//! - Exhaustion is data, not an error: a denied attempt still yields a
//!   `Decision`. Errors are reserved for backend failure (e.g. storage
//!   unavailable).
//! - One call records exactly one attempt; the call is never safe to
//!   repeat for the same logical request.
//! - Accounting must be atomic per identifier; two concurrent requests
//!   must not both observe "allowed" on the last remaining attempt.

use async_trait::async_trait;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

use crate::quota::Quota;

pub mod memory;

pub use memory::InMemoryRateLimiter;

/// Outcome of recording one attempt against a quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    /// Maximum attempts allowed in the current window.
    pub limit: u64,

    /// Attempts still available in the current window. Zero at
    /// exhaustion, never negative.
    pub remaining_attempts: u64,

    /// When the current window ends and the counter resets.
    pub reset_at: SystemTime,

    /// True iff this call's attempt pushed usage past the limit.
    pub exceeded: bool,
}

impl Decision {
    /// Reset time as integer epoch seconds, the wire encoding used by
    /// the `X-RateLimit-Reset` header.
    pub fn reset_epoch_secs(&self) -> u64 {
        self.reset_at
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

/// Unexpected engine failure. Quota exhaustion is never an error.
#[derive(Debug, Error)]
#[error("rate limiter backend failed: {0}")]
pub struct EngineError(#[from] Box<dyn std::error::Error + Send + Sync>);

impl EngineError {
    pub fn backend(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self(source.into())
    }
}

impl IntoResponse for EngineError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

/// Trait for rate limiting backends.
///
/// `record_attempt` atomically records one attempt for `identifier` and
/// reports the resulting bookkeeping. It has a side effect on every
/// call, including denied ones.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    async fn record_attempt(&self, identifier: &str, quota: Quota) -> Result<Decision, EngineError>;
}
