use axum::http::HeaderMap;
use std::time::{SystemTime, UNIX_EPOCH};

/// Key used to group rate and reputation state when neither forwarded-address
/// header is present. All such clients share one quota and one reputation
/// entry; that coarseness is preserved on purpose.
pub const UNKNOWN_ORIGIN: &str = "unknown";

/// Derive the origin identifier for a request.
///
/// Prefers the first hop of `X-Forwarded-For` (comma-separated list), then
/// `X-Real-IP`, then the shared literal `"unknown"`. The value is whatever
/// the client's edge put there; it is not verified.
pub fn client_origin(headers: &HeaderMap) -> String {
    if let Some(xff) = headers.get("x-forwarded-for") {
        if let Ok(xff_str) = xff.to_str() {
            if let Some(first_hop) = xff_str.split(',').next() {
                let first_hop = first_hop.trim();
                if !first_hop.is_empty() && first_hop != UNKNOWN_ORIGIN {
                    return first_hop.to_string();
                }
            }
        }
    }

    if let Some(real_ip) = headers.get("x-real-ip") {
        if let Ok(val) = real_ip.to_str() {
            let val = val.trim();
            if !val.is_empty() && val != UNKNOWN_ORIGIN {
                return val.to_string();
            }
        }
    }

    UNKNOWN_ORIGIN.to_string()
}

/// Declared client identity, empty string when the header is missing or not
/// valid UTF-8. The empty string is itself an automation signal downstream.
pub fn user_agent(headers: &HeaderMap) -> &str {
    headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

pub fn is_hop_by_hop_http_header(name: &str) -> bool {
    matches!(
        name.to_lowercase().as_str(),
        "connection"
            | "host"
            | "keep-alive"
            | "proxy-connection"
            | "proxy-authenticate"
            | "proxy-authorization"
            | "te"
            | "trailers"
            | "transfer-encoding"
            | "upgrade"
    )
}

/// Static asset paths keep their cacheability; everything else gets no-store
/// directives stamped by the gateway.
pub fn is_static_asset(path: &str) -> bool {
    const ASSET_EXTENSIONS: &[&str] = &[
        ".css", ".js", ".mjs", ".png", ".jpg", ".jpeg", ".gif", ".svg", ".ico", ".webp", ".avif",
        ".woff", ".woff2", ".ttf",
    ];
    let lower = path.to_lowercase();
    ASSET_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

pub fn current_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
