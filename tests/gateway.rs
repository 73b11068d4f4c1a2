use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::routing::get;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use garita::config::Config;
use garita::events::Decision as EventDecision;
use garita::{gateway, health, honeypot, AppState};

const HUMAN_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                        (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// The production topology with a stub in place of the upstream proxy.
fn test_app(state: AppState) -> Router {
    let gated = Router::new()
        .route(state.config.gateway.health_path.as_str(), get(health::health))
        .fallback(|| async { "upstream ok" })
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            gateway::gate,
        ))
        .with_state(state.clone());

    Router::new()
        .merge(honeypot::build_router(state.clone()))
        .merge(gated)
}

fn state_with(config: Config) -> AppState {
    AppState::new(config)
}

fn request(path: &str, origin: Option<&str>, ua: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(path);
    if let Some(origin) = origin {
        builder = builder.header("x-forwarded-for", origin);
    }
    if let Some(ua) = ua {
        builder = builder.header("user-agent", ua);
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_string(body: Body) -> String {
    let bytes = body.collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn missing_ua_outside_health_is_forbidden_without_rate_mutation() {
    let state = state_with(Config::default());
    let app = test_app(state.clone());

    let resp = app
        .oneshot(request("/some/page", Some("1.2.3.4"), None))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_string(resp.into_body()).await, "Access Denied");
    // Rejected before the rate check: no window entry was created.
    assert_eq!(state.limiter.usage("1.2.3.4"), 0);
}

#[tokio::test]
async fn missing_ua_on_health_path_passes() {
    let state = state_with(Config::default());
    let app = test_app(state);

    let resp = app
        .oneshot(request("/health", Some("1.2.3.4"), None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn automated_signature_outside_api_is_forbidden() {
    let state = state_with(Config::default());
    let app = test_app(state);

    let resp = app
        .oneshot(request("/some/page", Some("5.6.7.8"), Some("curl/8.0")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_string(resp.into_body()).await, "Access Denied");
}

#[tokio::test]
async fn automated_signature_in_api_namespace_passes_but_counts_against_budget() {
    let state = state_with(Config::default());
    let app = test_app(state.clone());

    let resp = app
        .oneshot(request("/api/data", Some("5.6.7.8"), Some("curl/8.0")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(state.limiter.usage("5.6.7.8"), 1);
}

#[tokio::test]
async fn rate_budget_exhaustion_returns_429_with_retry_after() {
    let state = state_with(Config::default());
    let app = test_app(state);

    for i in 0..120 {
        let resp = app
            .clone()
            .oneshot(request("/some/page", Some("9.9.9.9"), Some(HUMAN_UA)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK, "request {} was rejected", i + 1);
    }

    let resp = app
        .oneshot(request("/some/page", Some("9.9.9.9"), Some(HUMAN_UA)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        resp.headers().get(header::RETRY_AFTER).unwrap(),
        &"60".parse::<axum::http::HeaderValue>().unwrap()
    );
    assert_eq!(body_string(resp.into_body()).await, "Too Many Requests");
}

#[tokio::test]
async fn source_map_paths_are_never_servable() {
    let state = state_with(Config::default());
    let app = test_app(state);

    // 404 regardless of client identity.
    for ua in [Some(HUMAN_UA), Some("curl/8.0"), None] {
        let resp = app
            .clone()
            .oneshot(request("/static/app.js.map", Some("1.2.3.4"), ua))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(body_string(resp.into_body()).await.is_empty());
    }
}

#[tokio::test]
async fn source_map_rejection_records_an_event() {
    let state = state_with(Config::default());
    let app = test_app(state.clone());

    let resp = app
        .oneshot(request("/static/app.js.map", Some("1.2.3.4"), Some(HUMAN_UA)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let recent = state.events.recent();
    assert!(recent
        .iter()
        .any(|e| e.decision == EventDecision::BlockedSourcemap && e.origin == "1.2.3.4"));
}

#[tokio::test]
async fn view_source_probe_is_forbidden() {
    let state = state_with(Config::default());
    let app = test_app(state);

    let resp = app
        .oneshot(request(
            "/view-source:/src/main.rs",
            Some("1.2.3.4"),
            Some(HUMAN_UA),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert!(body_string(resp.into_body()).await.is_empty());
}

#[tokio::test]
async fn honeypot_hit_inserts_origin_and_serves_decoy() {
    let state = state_with(Config::default());
    let app = test_app(state.clone());

    let resp = app
        .oneshot(request(
            "/backdoor?tag=d0",
            Some("6.6.6.6"),
            Some("python-requests/2.31"),
        ))
        .await
        .unwrap();

    // Looks like a normal boring page, never an error.
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_string(resp.into_body()).await;
    assert!(body.contains("<html>"));

    assert!(state.reputation.is_member("6.6.6.6"));
}

#[tokio::test]
async fn honeypot_responds_even_to_rate_limited_origins() {
    let mut cfg = Config::default();
    cfg.rate.max_requests = 1;
    let state = state_with(cfg);
    let app = test_app(state.clone());

    // Exhaust the budget.
    for _ in 0..3 {
        let _ = app
            .clone()
            .oneshot(request("/some/page", Some("7.7.7.7"), Some(HUMAN_UA)))
            .await
            .unwrap();
    }

    let resp = app
        .oneshot(request("/backdoor", Some("7.7.7.7"), Some(HUMAN_UA)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(state.reputation.is_member("7.7.7.7"));
}

#[tokio::test]
async fn trapped_origin_is_rejected_before_consuming_budget() {
    let state = state_with(Config::default());
    let app = test_app(state.clone());

    let _ = app
        .clone()
        .oneshot(request("/backdoor", Some("8.8.8.8"), Some(HUMAN_UA)))
        .await
        .unwrap();

    let resp = app
        .oneshot(request("/some/page", Some("8.8.8.8"), Some(HUMAN_UA)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(state.limiter.usage("8.8.8.8"), 0);
}

#[tokio::test]
async fn reputation_enforcement_can_be_disabled() {
    let mut cfg = Config::default();
    cfg.reputation.enforce = false;
    let state = state_with(cfg);
    let app = test_app(state.clone());

    let _ = app
        .clone()
        .oneshot(request("/backdoor", Some("8.8.4.4"), Some(HUMAN_UA)))
        .await
        .unwrap();
    assert!(state.reputation.is_member("8.8.4.4"));

    // Write side still connected; enforcement point switched off.
    let resp = app
        .oneshot(request("/some/page", Some("8.8.4.4"), Some(HUMAN_UA)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn allowed_non_static_responses_disable_caching() {
    let state = state_with(Config::default());
    let app = test_app(state);

    let resp = app
        .clone()
        .oneshot(request("/some/page", Some("1.1.1.1"), Some(HUMAN_UA)))
        .await
        .unwrap();
    assert_eq!(
        resp.headers().get(header::CACHE_CONTROL).unwrap(),
        &"no-store, no-cache, must-revalidate"
            .parse::<axum::http::HeaderValue>()
            .unwrap()
    );

    let resp = app
        .oneshot(request("/assets/app.css", Some("1.1.1.1"), Some(HUMAN_UA)))
        .await
        .unwrap();
    assert!(resp.headers().get(header::CACHE_CONTROL).is_none());
}

#[tokio::test]
async fn unknown_origins_share_one_quota() {
    let mut cfg = Config::default();
    cfg.rate.max_requests = 2;
    let state = state_with(cfg);
    let app = test_app(state);

    // Two clients, neither with a forwarded-address header.
    for _ in 0..2 {
        let resp = app
            .clone()
            .oneshot(request("/some/page", None, Some(HUMAN_UA)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
    let resp = app
        .oneshot(request("/some/page", None, Some(HUMAN_UA)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
}
