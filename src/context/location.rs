//! Location descriptor derived from the inbound request.
//!
//! # Responsibilities
//! - Extract exactly url, protocol, query, path and hostname
//! - Honour `x-forwarded-proto` set by the fronting proxy
//!
//! # Design Decisions
//! - Consumers get this descriptor, never the raw request
//! - Hostname carries no port; the full authority stays on the headers

use std::collections::HashMap;

use axum::http::request::Parts;
use url::form_urlencoded;

use crate::routing::QueryParams;

/// Request-scoped location: what the browser's address bar held when
/// the request was made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Path plus query string (e.g. `/profile/7?tab=posts`).
    pub url: String,
    /// `http` or `https`.
    pub protocol: String,
    /// Decoded query parameters.
    pub query: QueryParams,
    /// Path without the query string.
    pub path: String,
    /// Hostname without a port.
    pub hostname: String,
}

impl Location {
    /// Build a location from the request head.
    pub fn from_parts(parts: &Parts) -> Self {
        let path = parts.uri.path().to_string();
        let url = match parts.uri.query() {
            Some(q) => format!("{path}?{q}"),
            None => path.clone(),
        };

        let protocol = parts
            .headers
            .get("x-forwarded-proto")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .or_else(|| parts.uri.scheme_str().map(str::to_string))
            .unwrap_or_else(|| "http".to_string());

        let query = parts
            .uri
            .query()
            .map(|q| {
                form_urlencoded::parse(q.as_bytes())
                    .into_owned()
                    .collect::<HashMap<_, _>>()
            })
            .unwrap_or_default();

        let hostname = host_of(parts)
            .map(strip_port)
            .unwrap_or_default()
            .to_string();

        Self { url, protocol, query, path, hostname }
    }
}

/// Authority of the inbound request: the `Host` header, falling back to
/// the URI authority (HTTP/2 requests carry `:authority` instead).
pub(crate) fn host_of(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(axum::http::header::HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| parts.uri.authority().map(|a| a.as_str()))
}

fn strip_port(host: &str) -> &str {
    if let Some(end) = host.strip_prefix('[').and_then(|h| h.find(']')) {
        // Bracketed IPv6 literal.
        return &host[..end + 2];
    }
    host.split(':').next().unwrap_or(host)
}
