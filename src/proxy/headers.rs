//! Header filtering for the forwarding hop.

/// Connection-scoped headers (RFC 9110 §7.6.1) plus the framing headers
/// each side recomputes itself.
const SKIPPED: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
    "content-length",
];

/// Whether `name` must not be copied across the proxy.
pub fn is_skipped(name: &str) -> bool {
    SKIPPED.iter().any(|h| h.eq_ignore_ascii_case(name))
}

/// Append `addr` to an existing `X-Forwarded-For` chain.
pub fn forwarded_for(existing: Option<&str>, addr: &str) -> String {
    match existing.map(str::trim).filter(|s| !s.is_empty()) {
        Some(chain) => format!("{chain}, {addr}"),
        None => addr.to_string(),
    }
}
