//! Request-time quota selection.
//!
//! Quota resolution is a request-time decision rather than a
//! construction-time constant: requests reaching the same middleware
//! instance may warrant different quotas (per-route overrides). A
//! selector returning `None` exempts the request from limiting entirely.

use axum::body::Body;
use axum::http::Request;

use crate::quota::Quota;

/// Trait for choosing the quota that applies to a request.
pub trait RateSelector: Send + Sync {
    /// Returns the quota for this request, or `None` when it is not
    /// rate limited at all.
    fn select(&self, req: &Request<Body>) -> Option<Quota>;
}

/// Selector that applies the same quota to every request.
#[derive(Debug, Clone, Copy)]
pub struct FixedQuotaSelector {
    quota: Quota,
}

impl FixedQuotaSelector {
    pub fn new(quota: Quota) -> Self {
        Self { quota }
    }
}

impl RateSelector for FixedQuotaSelector {
    fn select(&self, _req: &Request<Body>) -> Option<Quota> {
        Some(self.quota)
    }
}
