use axum::{response::IntoResponse, Json};
use serde_json::json;

/// Axum handler: GET /
pub async fn handler() -> impl IntoResponse {
    Json(json!({ "message": "Academic Portfolio API is running" }))
}
