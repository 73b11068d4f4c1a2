pub mod admin;
pub mod config;
pub mod events;
pub mod gateway;
pub mod health;
pub mod helpers;
pub mod honeypot;
pub mod metrics;
pub mod proxy;
pub mod rate;
pub mod reputation;
pub mod signature;

use std::sync::Arc;
use std::time::Instant;

use axum::routing::get;
use axum::Router;

use crate::config::Config;
use crate::events::EventLog;
use crate::metrics::GateMetrics;
use crate::rate::RateLimiter;
use crate::reputation::ReputationStore;
use crate::signature::SignaturePattern;

/// Everything the gateway shares across concurrent request evaluations.
/// Constructed once per process (or per test); no ambient globals.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub signatures: Arc<Vec<SignaturePattern>>,
    pub reputation: Arc<ReputationStore>,
    pub limiter: Arc<RateLimiter>,
    pub metrics: Arc<GateMetrics>,
    pub events: Arc<EventLog>,
    pub http: reqwest::Client,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let signatures = signature::signature_table(&config.signatures.extra);
        let limiter = RateLimiter::new(&config.rate);
        Self {
            config: Arc::new(config),
            signatures: Arc::new(signatures),
            reputation: Arc::new(ReputationStore::new()),
            limiter: Arc::new(limiter),
            metrics: Arc::new(GateMetrics::new()),
            events: Arc::new(EventLog::new()),
            http: reqwest::Client::new(),
            started_at: Instant::now(),
        }
    }
}

/// Assemble the full application router.
///
/// Trap paths, `/metrics` and the admin API sit outside the gateway layer:
/// a honeypot hit must be served whatever the origin's signature, reputation
/// or rate state, and the admin surface carries its own auth. The health
/// path and the proxied fallback are gated.
pub fn build_app(state: AppState) -> Router {
    let gated = Router::new()
        .route(state.config.gateway.health_path.as_str(), get(health::health))
        .fallback(proxy::forward)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            gateway::gate,
        ))
        .with_state(state.clone());

    let observability = Router::new()
        .route("/metrics", get(metrics::metrics))
        .with_state(state.clone());

    Router::new()
        .merge(honeypot::build_router(state.clone()))
        .merge(observability)
        .merge(admin::build_router(state))
        .merge(gated)
}
