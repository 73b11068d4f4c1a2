use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::{debug, info};

use crate::events::{Decision as EventDecision, GateEvent};
use crate::helpers::{client_origin, current_ts, is_static_asset, user_agent};
use crate::metrics::GateMetrics;
use crate::rate::Decision;
use crate::signature::{classify, Classification};
use crate::AppState;

const ACCESS_DENIED: &str = "Access Denied";
const TOO_MANY_REQUESTS: &str = "Too Many Requests";

/// The request-inspection pipeline, applied to every request that reaches
/// the application surface. Checks run in a fixed order and short-circuit on
/// the first terminal decision; all of them are synchronous in-memory work.
pub async fn gate(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    let origin = client_origin(req.headers());
    GateMetrics::inc(&state.metrics.requests_total);

    // 1. Build-internal source maps are never servable.
    if path.ends_with(".map") {
        GateMetrics::inc(&state.metrics.blocked_sourcemap);
        record(&state, &origin, EventDecision::BlockedSourcemap, &path, None);
        return StatusCode::NOT_FOUND.into_response();
    }

    // 2. Raw-source probes via the view-source scheme.
    if path.trim_start_matches('/').starts_with("view-source:") {
        GateMetrics::inc(&state.metrics.blocked_probe);
        record(&state, &origin, EventDecision::BlockedProbe, &path, None);
        return StatusCode::FORBIDDEN.into_response();
    }

    let ua = user_agent(req.headers());

    // 3 & 4. Signature classification. The API namespace is exempt from the
    // signature rejection (documented clients live there; the rate limiter
    // remains in force), and only the health path tolerates a missing UA.
    match classify(ua, &state.signatures) {
        Classification::AutomatedSignature(sig)
            if !path.starts_with(&state.config.gateway.api_prefix) =>
        {
            info!(origin = %origin, label = %sig.label, path = %path, "blocked automated signature");
            GateMetrics::inc(&state.metrics.blocked_signature);
            record(
                &state,
                &origin,
                EventDecision::BlockedSignature,
                &path,
                Some(sig.label.clone()),
            );
            return (StatusCode::FORBIDDEN, ACCESS_DENIED).into_response();
        }
        Classification::AutomatedAbsent if path != state.config.gateway.health_path => {
            info!(origin = %origin, path = %path, "blocked missing client identity");
            GateMetrics::inc(&state.metrics.blocked_absent);
            record(&state, &origin, EventDecision::BlockedAbsent, &path, None);
            return (StatusCode::FORBIDDEN, ACCESS_DENIED).into_response();
        }
        _ => {}
    }

    // 5. Known-hostile origins, before they consume any rate budget.
    if state.config.reputation.enforce && state.reputation.is_member(&origin) {
        info!(origin = %origin, path = %path, "blocked hostile origin");
        GateMetrics::inc(&state.metrics.blocked_reputation);
        record(&state, &origin, EventDecision::BlockedReputation, &path, None);
        return (StatusCode::FORBIDDEN, ACCESS_DENIED).into_response();
    }

    // 6. Rate budget. Rejected attempts still counted against the window.
    if state.limiter.admit(&origin) == Decision::Rejected {
        info!(origin = %origin, path = %path, "rate budget exceeded");
        GateMetrics::inc(&state.metrics.rate_limited);
        record(&state, &origin, EventDecision::RateLimited, &path, None);
        return too_many_requests(state.limiter.window_seconds());
    }

    // 7. Allow. Non-static responses must not be cached.
    debug!(origin = %origin, path = %path, "allowed");
    GateMetrics::inc(&state.metrics.allowed_total);
    let mut response = next.run(req).await;
    if !is_static_asset(&path) {
        response.headers_mut().insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store, no-cache, must-revalidate"),
        );
    }
    response
}

fn too_many_requests(window_seconds: u64) -> Response {
    Response::builder()
        .status(StatusCode::TOO_MANY_REQUESTS)
        .header(header::RETRY_AFTER, window_seconds.to_string())
        .body(Body::from(TOO_MANY_REQUESTS))
        .unwrap_or_else(|_| StatusCode::TOO_MANY_REQUESTS.into_response())
}

fn record(
    state: &AppState,
    origin: &str,
    decision: EventDecision,
    path: &str,
    detail: Option<String>,
) {
    state.events.record(GateEvent {
        ts: current_ts(),
        origin: origin.to_string(),
        decision,
        path: path.to_string(),
        detail,
    });
}
