use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use delay_prediction::FlightPredictionResponse;
use flight_ml_client::FlightPredictionRequest;

use crate::{AppError, AppState};

pub fn prediction_routes() -> Router<AppState> {
    Router::new().route("/api/predictions", post(predict))
}

async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<FlightPredictionRequest>, JsonRejection>,
) -> Result<Json<FlightPredictionResponse>, AppError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::warn!(error = %rejection.body_text(), "Rejected prediction payload");
        AppError::invalid_payload(rejection.body_text())
    })?;

    let request = request.normalized();
    if let Err(violations) = request.validate() {
        tracing::warn!(flight_number = %request.flight_number, ?violations, "Validation error");
        return Err(AppError::validation(violations));
    }

    let response = state.service.predict_delay(&request).await?;
    Ok(Json(response))
}
