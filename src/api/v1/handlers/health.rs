/*
 * Responsibility
 * - GET /health (liveness)
 * - Outside the auth chain; touches neither the identity service nor the profile store
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({"status": "ok", "version": env!("CARGO_PKG_VERSION")})),
    )
}
