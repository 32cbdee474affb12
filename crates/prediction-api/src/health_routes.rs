use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use flight_ml_client::MLHealthStatus;
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub ml_service: MLHealthStatus,
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/api/health", get(health))
}

/// 200 while the ML service answers its probe, 503 (`DEGRADED`) otherwise.
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let ml_service = state.service.ml_service_health().await;
    let (code, status) = if ml_service.is_up() {
        (StatusCode::OK, "UP")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "DEGRADED")
    };

    (
        code,
        Json(HealthResponse {
            status,
            service: "Flight Delay Prediction API",
            ml_service,
        }),
    )
}
