//! Per-caller HTTP rate limiting middleware for axum.
//!
//! Enforces a quota per logical caller and endpoint, attaches
//! `X-RateLimit-*` telemetry headers to every limited response, and
//! short-circuits to an overflow handler with status 429 once the
//! caller's quota is spent.

pub mod config;
pub mod engine;
pub mod identity;
pub mod middleware;
pub mod observability;
pub mod quota;
pub mod selector;

pub use config::RateLimitConfig;
pub use engine::{Decision, EngineError, InMemoryRateLimiter, RateLimiter};
pub use identity::{IdentityResolver, IpIdentityResolver};
pub use middleware::{
    rate_limit_middleware, JsonOverflowHandler, OverflowHandler, RateLimitState,
    X_RATELIMIT_LIMIT, X_RATELIMIT_REMAINING, X_RATELIMIT_RESET,
};
pub use quota::Quota;
pub use selector::{FixedQuotaSelector, RateSelector};
