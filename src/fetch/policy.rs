//! Header/cookie propagation policy.
//!
//! # Responsibilities
//! - Qualify relative outbound URLs against the inbound origin
//! - Forward inbound headers onto outbound fetches, minus the denylist
//!
//! # Design Decisions
//! - Pure functions; this layer never fails. The worst outcome of a
//!   missing host is a still-relative URL that fails at send time.
//! - `Cookie` is deliberately not on the denylist: forwarding it raw is
//!   what makes a server-side fetch look like the browser's own call.
//! - `host` must not be forwarded (it would corrupt virtual hosting on
//!   the downstream call) and `accept-encoding` must not claim a
//!   compression scheme our client does not decode.

use axum::http::HeaderMap;

/// Inbound headers that are never forwarded to outbound fetches.
/// Transport negotiation belongs to each hop, not to the page.
pub const FORWARD_DENYLIST: [&str; 4] = ["accept", "accept-encoding", "host", "connection"];

/// True when `url` is already fully qualified (`scheme://…`).
pub(crate) fn is_absolute(url: &str) -> bool {
    match url.split_once("://") {
        Some((scheme, _)) => {
            !scheme.is_empty()
                && scheme.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

/// Qualify `url` against `base` (the inbound request's origin) unless
/// it is already absolute.
pub fn rewrite_url(url: &str, base: &str) -> String {
    if is_absolute(url) {
        url.to_string()
    } else {
        format!("{base}{url}")
    }
}

/// Copy inbound headers onto `outbound`, skipping the denylist and any
/// header the caller already set. Multi-valued headers are forwarded
/// with all their values.
pub fn forward_headers(inbound: &HeaderMap, outbound: &mut HeaderMap) {
    for name in inbound.keys() {
        if FORWARD_DENYLIST.contains(&name.as_str()) || outbound.contains_key(name) {
            continue;
        }
        for value in inbound.get_all(name) {
            outbound.append(name.clone(), value.clone());
        }
    }
}
