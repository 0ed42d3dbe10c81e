//! Health check handler

use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
}

/// Liveness only; the generation backend is not consulted.
pub async fn check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
