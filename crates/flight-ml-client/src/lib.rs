//! Client for the external flight-delay ML service.
//!
//! Wraps the model's `/predict` and `/health` endpoints behind a typed
//! request/response contract and a [`PredictionProvider`] seam.

pub mod client;
pub mod error;
pub mod provider;
pub mod types;

pub use client::MLServiceClient;
pub use error::{MLResult, MLServiceError};
pub use provider::PredictionProvider;
pub use types::{
    FieldViolation, FlightPrediction, FlightPredictionRequest, HealthState, MLHealthStatus,
    MLServiceResponse,
};

use reqwest::Url;
use std::time::Duration;

pub const DEFAULT_SERVICE_URL: &str = "http://localhost:5000/predict";
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Configuration for the ML service client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MLConfig {
    pub service_url: String,
    /// Applied to both connect and total request time.
    pub timeout: Duration,
}

impl Default for MLConfig {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_SERVICE_URL.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl MLConfig {
    pub fn new(service_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            service_url: service_url.into(),
            timeout,
        }
    }

    /// Read `ML_SERVICE_URL` and `ML_SERVICE_TIMEOUT_MS`, falling back to defaults.
    pub fn from_env() -> MLResult<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> MLResult<Self> {
        let service_url = lookup("ML_SERVICE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SERVICE_URL.to_string());

        parse_service_url(&service_url)?;

        let timeout_ms = match lookup("ML_SERVICE_TIMEOUT_MS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                MLServiceError::Config(format!("ML_SERVICE_TIMEOUT_MS '{raw}': {e}"))
            })?,
            None => DEFAULT_TIMEOUT_MS,
        };
        if timeout_ms == 0 {
            return Err(MLServiceError::Config(
                "ML_SERVICE_TIMEOUT_MS must be greater than 0".into(),
            ));
        }

        Ok(Self {
            service_url,
            timeout: Duration::from_millis(timeout_ms),
        })
    }
}

/// Parse the prediction URL, accepting only absolute http(s) URLs.
pub(crate) fn parse_service_url(raw: &str) -> MLResult<Url> {
    let url = Url::parse(raw)
        .map_err(|e| MLServiceError::Config(format!("invalid ML service URL '{raw}': {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(MLServiceError::Config(format!(
            "unsupported URL scheme '{}'",
            url.scheme()
        )));
    }
    Ok(url)
}
