//! Metrics for rate limiting decisions.
//!
//! Exposition (Prometheus endpoint, exporter wiring) belongs to the host
//! application; this module only records.

use metrics::counter;

/// Record one rejected request for the given scope.
pub fn record_rate_limited(scope: &str) {
    counter!("rate_limit_rejections_total", "scope" => scope.to_string()).increment(1);
}
