//! HTTP front for flight delay predictions.
//!
//! Composition root: builds the ML client and prediction service from the
//! environment and serves them over axum.

pub mod health_routes;
pub mod prediction_routes;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    Json, Router,
};
use delay_prediction::{PredictionError, PredictionService};
use flight_ml_client::{FieldViolation, MLConfig, MLServiceClient, MLServiceError};
use serde_json::json;
use tower_http::trace::TraceLayer;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
}

impl ApiConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let raw = std::env::var("PREDICTION_API_BIND")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw
            .parse::<SocketAddr>()
            .map_err(|e| anyhow::anyhow!("PREDICTION_API_BIND '{raw}': {e}"))?;
        Ok(Self { bind_addr })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PredictionService>,
}

impl AppState {
    pub fn new(service: PredictionService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

/// Error returned by handlers, rendered as `{error, message, details}`.
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    error: &'static str,
    message: String,
    details: Option<serde_json::Value>,
}

impl AppError {
    pub fn with_status(status: StatusCode, error: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            error,
            message: message.into(),
            details: None,
        }
    }

    pub fn invalid_payload(message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::BAD_REQUEST, "Invalid data", message)
    }

    pub fn validation(violations: Vec<FieldViolation>) -> Self {
        Self {
            details: serde_json::to_value(violations).ok(),
            ..Self::invalid_payload("request failed validation")
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<PredictionError> for AppError {
    fn from(err: PredictionError) -> Self {
        let status = match &err {
            PredictionError::Upstream(MLServiceError::Timeout) => StatusCode::GATEWAY_TIMEOUT,
            PredictionError::Upstream(_) | PredictionError::InvalidProbability(_) => {
                StatusCode::BAD_GATEWAY
            }
        };
        Self::with_status(status, "ML service error", err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, "{}: {}", self.error, self.message);
        }
        let mut body = json!({
            "error": self.error,
            "message": self.message,
        });
        if let Some(details) = self.details {
            body["details"] = details;
        }
        (self.status, Json(body)).into_response()
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(prediction_routes::prediction_routes())
        .merge(health_routes::health_routes())
        .with_state(state)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<axum::body::Body>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
}

pub async fn run_server() -> anyhow::Result<()> {
    let api_config = ApiConfig::from_env()?;
    let ml_config = MLConfig::from_env()?;

    let client = MLServiceClient::new(ml_config)?;
    let service = PredictionService::new(Arc::new(client));
    let app = build_router(AppState::new(service));

    let listener = tokio::net::TcpListener::bind(api_config.bind_addr).await?;
    tracing::info!("Prediction API listening on {}", api_config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Prediction API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
}
