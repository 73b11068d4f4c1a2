use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

use crate::helpers::is_hop_by_hop_http_header;
use crate::AppState;

/// Forward an admitted request to the upstream application and relay its
/// response. The gateway never rewrites upstream bodies; it only strips
/// hop-by-hop headers on the way out.
pub async fn forward(State(state): State<AppState>, request: Request) -> Response {
    let (parts, body) = request.into_parts();

    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(_) => return (StatusCode::BAD_REQUEST, "Failed to read request body").into_response(),
    };

    let target_url = format!(
        "{}{}",
        state.config.target.origin.trim_end_matches('/'),
        parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/")
    );

    let mut req_builder = state.http.request(parts.method, &target_url);
    for (name, value) in &parts.headers {
        if is_hop_by_hop_http_header(name.as_str()) {
            continue;
        }
        req_builder = req_builder.header(name, value);
    }

    if !body_bytes.is_empty() {
        req_builder = req_builder.body(body_bytes);
    }

    let response = match req_builder.send().await {
        Ok(resp) => resp,
        Err(e) => {
            error!(error = %e, url = %target_url, "upstream request failed");
            return (StatusCode::BAD_GATEWAY, "Failed to proxy request").into_response();
        }
    };

    let status = response.status();
    match response.bytes().await {
        Ok(bytes) => (status, bytes).into_response(),
        Err(_) => (StatusCode::BAD_GATEWAY, "Failed to read response").into_response(),
    }
}
