use axum::extract::{Request, State};
use axum::response::{Html, IntoResponse};
use axum::routing::any;
use axum::Router;
use tracing::warn;

use crate::events::{Decision, GateEvent};
use crate::helpers::{client_origin, current_ts, user_agent};
use crate::metrics::GateMetrics;
use crate::AppState;

/// Deliberately boring. A crawler that followed a hidden link must see a
/// normal page, not a hint that it was caught.
const DECOY_HTML: &str = r#"<!DOCTYPE html>
<html>
<head><title>Archive</title></head>
<body>
<h1>Archive</h1>
<p>This section is being reorganized. Please check back later.</p>
</body>
</html>
"#;

/// Routes for the configured trap paths. Mounted outside the gateway layer:
/// a hit must be served no matter what the signature, reputation or rate
/// state says about the origin.
pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new();
    for path in &state.config.traps.paths {
        router = router.route(path, any(trap));
    }
    router.with_state(state)
}

/// Invisible anchors for pages to embed. Unreachable by a human using the
/// page as intended: hidden from rendering, assistive navigation, tab order
/// and indexing alike.
pub fn decoy_links_html(paths: &[String]) -> String {
    paths
        .iter()
        .enumerate()
        .map(|(i, path)| {
            format!(
                r#"<a href="{path}?tag=d{i}" style="display:none" aria-hidden="true" tabindex="-1" rel="nofollow">.</a>"#
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Reaching a trap path is proof of automation: the link is unreachable via
/// the visible page. Record the origin as hostile and serve the decoy.
async fn trap(State(state): State<AppState>, req: Request) -> impl IntoResponse {
    let origin = client_origin(req.headers());
    let ua = user_agent(req.headers()).to_string();
    let path = req.uri().path().to_string();
    let tag = req
        .uri()
        .query()
        .and_then(|q| q.split('&').find_map(|kv| kv.strip_prefix("tag=")))
        .map(str::to_string);

    let newly_caught = state.reputation.insert(&origin);
    GateMetrics::inc(&state.metrics.honeypot_hits);
    state.events.record(GateEvent {
        ts: current_ts(),
        origin: origin.clone(),
        decision: Decision::HoneypotHit,
        path: path.clone(),
        detail: tag.clone(),
    });
    warn!(
        origin = %origin,
        ua = %ua,
        path = %path,
        tag = tag.as_deref().unwrap_or("-"),
        newly_caught,
        "honeypot triggered"
    );

    Html(DECOY_HTML)
}
