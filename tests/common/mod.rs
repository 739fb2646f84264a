//! Shared fixtures for integration testing the middleware.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::Request,
    middleware,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rate_limit_middleware::{
    rate_limit_middleware, Decision, EngineError, InMemoryRateLimiter, Quota, RateLimitState,
    RateLimiter, RateSelector,
};

/// Opt-in log output for test runs (`RUST_LOG=debug`).
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Engine wrapper that counts how often it is invoked.
pub struct SpyLimiter {
    inner: InMemoryRateLimiter,
    calls: AtomicUsize,
}

impl SpyLimiter {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: InMemoryRateLimiter::new(),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RateLimiter for SpyLimiter {
    async fn record_attempt(&self, identifier: &str, quota: Quota) -> Result<Decision, EngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.record_attempt(identifier, quota).await
    }
}

/// Engine that always fails, for exercising backend failure.
#[allow(dead_code)]
pub struct BrokenLimiter;

#[async_trait]
impl RateLimiter for BrokenLimiter {
    async fn record_attempt(&self, _identifier: &str, _quota: Quota) -> Result<Decision, EngineError> {
        Err(EngineError::backend("storage unavailable"))
    }
}

/// Selector that exempts every request from limiting.
#[allow(dead_code)]
pub struct NoQuotaSelector;

impl RateSelector for NoQuotaSelector {
    fn select(&self, _req: &Request<Body>) -> Option<Quota> {
        None
    }
}

/// Downstream handler used by all test routers.
async fn success_handler() -> Response {
    Json(json!({ "success": true })).into_response()
}

/// Router with the middleware wired in front of a success handler.
pub fn app(state: RateLimitState) -> Router {
    Router::new()
        .route("/api/posts", post(success_handler))
        .layer(middleware::from_fn_with_state(
            Arc::new(state),
            rate_limit_middleware,
        ))
}

/// A POST request from the given client IP.
pub fn post_request(client_ip: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/posts")
        .header("client-ip", client_ip)
        .body(Body::empty())
        .unwrap()
}

/// Collect a response body as a string.
pub async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
