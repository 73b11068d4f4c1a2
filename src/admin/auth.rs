use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use subtle::ConstantTimeEq;
use tracing::warn;

use crate::AppState;

/// Require `Authorization: Bearer <admin_token>` on every admin API call.
/// An empty configured token disables the surface entirely rather than
/// leaving it open.
pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let configured = state.config.server.admin_token.as_bytes();
    if configured.is_empty() {
        return (StatusCode::UNAUTHORIZED, "Admin API disabled").into_response();
    }

    let presented = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match presented {
        Some(token) if bool::from(token.as_bytes().ct_eq(configured)) => next.run(req).await,
        _ => {
            warn!(path = %req.uri().path(), "rejected admin request");
            (StatusCode::UNAUTHORIZED, "Invalid or missing admin token").into_response()
        }
    }
}
