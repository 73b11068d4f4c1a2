use std::sync::atomic::Ordering;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use super::api_types::{ConfigSnapshot, MetricsResp, ReputationResp, StatusResp};
use super::auth;
use crate::events::GateEvent;
use crate::AppState;

const ADMIN_URL_PREFIX: &str = "/admin";

pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/status", get(status))
        .route("/api/metrics", get(metrics))
        .route("/api/recent", get(recent))
        .route("/api/reputation", get(reputation))
        .route("/api/config", get(config))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth::require_admin,
        ));

    Router::new()
        .nest(ADMIN_URL_PREFIX, protected)
        .with_state(state)
}

async fn status(State(state): State<AppState>) -> Json<StatusResp> {
    Json(StatusResp {
        uptime_seconds: state.started_at.elapsed().as_secs(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn metrics(State(state): State<AppState>) -> Json<MetricsResp> {
    let m = &state.metrics;

    let total = m.requests_total.load(Ordering::Relaxed);
    let allowed = m.allowed_total.load(Ordering::Relaxed);
    let blocked = m.blocked_total();

    let allowed_pct = if total == 0 {
        100
    } else {
        ((allowed * 100) / total) as u32
    };

    Json(MetricsResp {
        total,
        allowed,
        blocked,
        allowed_pct,
        rate_limited: m.rate_limited.load(Ordering::Relaxed),
        honeypot_hits: m.honeypot_hits.load(Ordering::Relaxed),
        tracked_origins: state.limiter.tracked_origins(),
        reputation_size: state.reputation.len(),
    })
}

async fn recent(State(state): State<AppState>) -> Json<Vec<GateEvent>> {
    Json(state.events.recent())
}

async fn reputation(State(state): State<AppState>) -> Json<ReputationResp> {
    let origins = state.reputation.snapshot();
    Json(ReputationResp {
        count: origins.len(),
        origins,
    })
}

async fn config(State(state): State<AppState>) -> Json<ConfigSnapshot> {
    let cfg = &state.config;
    Json(ConfigSnapshot {
        window_seconds: cfg.rate.window_seconds,
        max_requests: cfg.rate.max_requests,
        api_prefix: cfg.gateway.api_prefix.clone(),
        health_path: cfg.gateway.health_path.clone(),
        enforce_reputation: cfg.reputation.enforce,
        trap_paths: cfg.traps.paths.clone(),
        signature_count: state.signatures.len(),
    })
}
