//! Rate limiting middleware.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → selector.rs (no quota? pass straight through)
//!     → identity.rs (resolve caller, build scoped identifier)
//!     → engine (record one attempt, get Decision)
//!     → allowed: downstream handler / denied: overflow handler + 429
//!     → decorate X-RateLimit-* headers
//!     → Send to client
//! ```
//!
//! # Design Decisions
//! - The middleware holds no mutable state; one `Arc<RateLimitState>` is
//!   shared across concurrent requests without synchronization
//! - Atomic accounting is the engine's contract, not enforced here
//! - The engine is called exactly once per limited request
//! - No local error handling: engine failure surfaces as-is to the client

use async_trait::async_trait;
use axum::{
    body::Body,
    extract::State,
    http::{HeaderName, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;

use crate::engine::{Decision, EngineError, RateLimiter};
use crate::identity::{IdentityResolver, IpIdentityResolver};
use crate::observability;
use crate::quota::Quota;
use crate::selector::{FixedQuotaSelector, RateSelector};

/// Maximum attempts allowed in the current window.
pub const X_RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");

/// Attempts left in the current window.
pub const X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");

/// End of the current window, integer epoch seconds.
pub const X_RATELIMIT_RESET: HeaderName = HeaderName::from_static("x-ratelimit-reset");

/// Trait for producing the response body of a denied request.
///
/// Whatever status the handler sets is overridden with 429.
#[async_trait]
pub trait OverflowHandler: Send + Sync {
    async fn handle(&self, req: Request<Body>) -> Response;
}

/// Default overflow handler: a JSON error body.
#[derive(Debug, Clone, Default)]
pub struct JsonOverflowHandler;

#[async_trait]
impl OverflowHandler for JsonOverflowHandler {
    async fn handle(&self, _req: Request<Body>) -> Response {
        Json(json!({ "error": "Too many requests" })).into_response()
    }
}

/// Shared configuration for the rate limiting middleware.
///
/// Immutable after construction; safe to share across requests.
pub struct RateLimitState {
    limiter: Arc<dyn RateLimiter>,
    scope: String,
    selector: Box<dyn RateSelector>,
    resolver: Box<dyn IdentityResolver>,
    overflow: Box<dyn OverflowHandler>,
}

impl RateLimitState {
    /// Create a state with explicit collaborators.
    ///
    /// `scope` labels the endpoint or operation the limit applies to and
    /// prefixes every identifier; an empty scope leaves identifiers bare.
    pub fn new(
        limiter: Arc<dyn RateLimiter>,
        scope: impl Into<String>,
        selector: impl RateSelector + 'static,
        resolver: impl IdentityResolver + 'static,
        overflow: impl OverflowHandler + 'static,
    ) -> Self {
        Self {
            limiter,
            scope: scope.into(),
            selector: Box::new(selector),
            resolver: Box::new(resolver),
            overflow: Box::new(overflow),
        }
    }

    /// Create a state that applies `quota` to every request, keyed by
    /// caller IP, with the default JSON overflow body.
    pub fn fixed(limiter: Arc<dyn RateLimiter>, quota: Quota, scope: impl Into<String>) -> Self {
        Self::new(
            limiter,
            scope,
            FixedQuotaSelector::new(quota),
            IpIdentityResolver::new(),
            JsonOverflowHandler,
        )
    }

    fn identifier(&self, req: &Request<Body>) -> String {
        let identity = self.resolver.resolve(req);
        if self.scope.is_empty() {
            identity
        } else {
            format!("{}:{}", self.scope, identity)
        }
    }
}

/// Middleware function enforcing the configured rate limit.
///
/// Wire up with `axum::middleware::from_fn_with_state`:
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use axum::{middleware, routing::get, Router};
/// use rate_limit_middleware::{rate_limit_middleware, InMemoryRateLimiter, Quota, RateLimitState};
///
/// let state = Arc::new(RateLimitState::fixed(
///     Arc::new(InMemoryRateLimiter::new()),
///     Quota::per_minute(60),
///     "api",
/// ));
/// let app: Router = Router::new()
///     .route("/", get(|| async { "ok" }))
///     .layer(middleware::from_fn_with_state(state, rate_limit_middleware));
/// ```
pub async fn rate_limit_middleware(
    State(state): State<Arc<RateLimitState>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, EngineError> {
    // No quota means no limiting: pass through untouched, engine not called.
    let Some(quota) = state.selector.select(&request) else {
        return Ok(next.run(request).await);
    };

    let identifier = state.identifier(&request);

    let decision = state.limiter.record_attempt(&identifier, quota).await?;

    let response = if decision.exceeded {
        tracing::warn!(client = %identifier, "Rate limit exceeded");
        observability::record_rate_limited(&state.scope);
        let response = state.overflow.handle(request).await;
        with_status(response, StatusCode::TOO_MANY_REQUESTS)
    } else {
        next.run(request).await
    };

    Ok(set_rate_limit_headers(response, &decision))
}

/// Replace the status code of a response, leaving everything else intact.
fn with_status(response: Response, status: StatusCode) -> Response {
    let (mut parts, body) = response.into_parts();
    parts.status = status;
    Response::from_parts(parts, body)
}

/// Attach all three telemetry headers in one step.
fn set_rate_limit_headers(mut response: Response, decision: &Decision) -> Response {
    let headers = response.headers_mut();
    headers.insert(X_RATELIMIT_LIMIT, HeaderValue::from(decision.limit));
    headers.insert(
        X_RATELIMIT_REMAINING,
        HeaderValue::from(decision.remaining_attempts),
    );
    headers.insert(
        X_RATELIMIT_RESET,
        HeaderValue::from(decision.reset_epoch_secs()),
    );
    response
}
