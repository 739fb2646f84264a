//! Caller identity resolution.
//!
//! # Responsibilities
//! - Derive a stable string identity for the caller of a request
//! - Apply a fixed source precedence (client-declared IP first)
//! - Always produce a non-empty identity (total function)
//!
//! # Design Decisions
//! - First matching non-empty source wins; later sources are not consulted
//! - `x-forwarded-for` uses the left-most entry (original client in a
//!   conventional proxy chain)
//! - No trusted-proxy allowlist: both headers are client-controlled and
//!   spoofable. Known caveat, not addressed here.

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::Request;
use std::net::SocketAddr;

/// Identity used when no header or peer address is available.
pub const FALLBACK_IDENTITY: &str = "127.0.0.1";

/// Trait for resolving the caller identity of a request.
///
/// Implementations must be total: every request resolves to a non-empty
/// identity, never an error.
pub trait IdentityResolver: Send + Sync {
    /// Returns the identity under which this request's attempts are counted.
    fn resolve(&self, req: &Request<Body>) -> String;
}

/// Resolves the caller's IP address as its identity.
///
/// Precedence: `client-ip` header, then the first `x-forwarded-for`
/// entry, then the transport peer address, then [`FALLBACK_IDENTITY`].
#[derive(Debug, Clone, Default)]
pub struct IpIdentityResolver;

impl IpIdentityResolver {
    pub fn new() -> Self {
        Self
    }
}

impl IdentityResolver for IpIdentityResolver {
    fn resolve(&self, req: &Request<Body>) -> String {
        if let Some(ip) = header_value(req, "client-ip") {
            return ip;
        }

        // Left-most entry is the original client in a proxy chain.
        if let Some(forwarded) = header_value(req, "x-forwarded-for") {
            let first = forwarded
                .split(',')
                .next()
                .map(str::trim)
                .unwrap_or_default();
            if !first.is_empty() {
                return first.to_string();
            }
        }

        if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
            return addr.ip().to_string();
        }

        FALLBACK_IDENTITY.to_string()
    }
}

/// Read a header as a trimmed, non-empty string.
fn header_value(req: &Request<Body>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
