use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

#[derive(Serialize)]
struct Health {
    status: &'static str,
}

pub async fn health() -> impl IntoResponse {
    let h = Health { status: "ok" };
    (StatusCode::OK, Json(h))
}
