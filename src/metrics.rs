use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::AppState;

/// Gateway counters. Plain relaxed atomics; nothing here coordinates with
/// anything else.
#[derive(Debug, Default)]
pub struct GateMetrics {
    pub requests_total: AtomicU64,
    pub allowed_total: AtomicU64,
    pub blocked_sourcemap: AtomicU64,
    pub blocked_probe: AtomicU64,
    pub blocked_signature: AtomicU64,
    pub blocked_absent: AtomicU64,
    pub blocked_reputation: AtomicU64,
    pub rate_limited: AtomicU64,
    pub honeypot_hits: AtomicU64,
}

impl GateMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn blocked_total(&self) -> u64 {
        self.blocked_sourcemap.load(Ordering::Relaxed)
            + self.blocked_probe.load(Ordering::Relaxed)
            + self.blocked_signature.load(Ordering::Relaxed)
            + self.blocked_absent.load(Ordering::Relaxed)
            + self.blocked_reputation.load(Ordering::Relaxed)
            + self.rate_limited.load(Ordering::Relaxed)
    }
}

/// Prometheus text exposition of the gateway counters.
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let m = &state.metrics;
    let mut body = String::new();

    let counters: &[(&str, &str, u64)] = &[
        (
            "garita_requests_total",
            "Requests evaluated by the gateway",
            m.requests_total.load(Ordering::Relaxed),
        ),
        (
            "garita_allowed_total",
            "Requests forwarded upstream",
            m.allowed_total.load(Ordering::Relaxed),
        ),
        (
            "garita_blocked_sourcemap_total",
            "Source-map paths rejected",
            m.blocked_sourcemap.load(Ordering::Relaxed),
        ),
        (
            "garita_blocked_probe_total",
            "Raw-source probes rejected",
            m.blocked_probe.load(Ordering::Relaxed),
        ),
        (
            "garita_blocked_signature_total",
            "Automated signatures rejected",
            m.blocked_signature.load(Ordering::Relaxed),
        ),
        (
            "garita_blocked_absent_total",
            "Missing client identities rejected",
            m.blocked_absent.load(Ordering::Relaxed),
        ),
        (
            "garita_blocked_reputation_total",
            "Known-hostile origins rejected",
            m.blocked_reputation.load(Ordering::Relaxed),
        ),
        (
            "garita_rate_limited_total",
            "Requests over the rate budget",
            m.rate_limited.load(Ordering::Relaxed),
        ),
        (
            "garita_honeypot_hits_total",
            "Honeypot endpoint hits",
            m.honeypot_hits.load(Ordering::Relaxed),
        ),
    ];

    for (name, help, value) in counters {
        let _ = writeln!(body, "# HELP {name} {help}");
        let _ = writeln!(body, "# TYPE {name} counter");
        let _ = writeln!(body, "{name} {value}");
    }

    (StatusCode::OK, body)
}
