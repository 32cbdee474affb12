use reqwest::Url;
use tracing::{debug, error, info, warn};

use crate::error::{MLResult, MLServiceError};
use crate::types::{FlightPredictionRequest, MLHealthStatus, MLServiceResponse};
use crate::{parse_service_url, MLConfig};

/// HTTP client for the external flight-delay model.
///
/// Cloning is cheap and shares the underlying connection pool.
#[derive(Clone)]
pub struct MLServiceClient {
    client: reqwest::Client,
    predict_url: Url,
    health_url: Url,
}

impl MLServiceClient {
    pub fn new(config: MLConfig) -> MLResult<Self> {
        let predict_url = parse_service_url(&config.service_url)?;
        let health_url = derive_health_url(&predict_url);

        let client = reqwest::Client::builder()
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(|e| MLServiceError::Config(format!("failed to build HTTP client: {e}")))?;

        info!(url = %predict_url, timeout = ?config.timeout, "MLServiceClient initialized");

        Ok(Self {
            client,
            predict_url,
            health_url,
        })
    }

    pub fn predict_url(&self) -> &Url {
        &self.predict_url
    }

    pub fn health_url(&self) -> &Url {
        &self.health_url
    }

    /// Send one prediction request. Never retried.
    pub async fn predict(&self, request: &FlightPredictionRequest) -> MLResult<MLServiceResponse> {
        info!(flight_number = %request.flight_number, "Sending prediction request to ML service");
        debug!(url = %self.predict_url, "Calling ML service");

        let result = self.send_predict(request).await;
        match &result {
            Ok(response) => info!(
                flight_number = %request.flight_number,
                prediction = %response.prediction,
                probability = response.confidence,
                "Received prediction from ML service"
            ),
            Err(e) => error!(
                flight_number = %request.flight_number,
                error = %e,
                "Error communicating with ML service"
            ),
        }
        result
    }

    async fn send_predict(&self, request: &FlightPredictionRequest) -> MLResult<MLServiceResponse> {
        let response = self
            .client
            .post(self.predict_url.clone())
            .json(request)
            .send()
            .await
            .map_err(MLServiceError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .text()
                .await
                .ok()
                .map(|body| body.trim().to_string())
                .filter(|body| !body.is_empty());
            return Err(MLServiceError::UpstreamStatus {
                status: status.as_u16(),
                detail,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(MLServiceError::from_transport)?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(MLServiceError::EmptyResponse);
        }

        // A literal `null` body is an empty answer, not a parse failure.
        serde_json::from_slice::<Option<MLServiceResponse>>(&body)
            .map_err(|e| MLServiceError::InvalidResponse(e.to_string()))?
            .ok_or(MLServiceError::EmptyResponse)
    }

    /// Probe the health endpoint. Failures are reported as `Down`, never raised.
    pub async fn health_status(&self) -> MLHealthStatus {
        debug!(url = %self.health_url, "Checking ML service health");

        let status = match self.client.get(self.health_url.clone()).send().await {
            Ok(response) if response.status().is_success() => MLHealthStatus::up(),
            Ok(response) => MLHealthStatus::down(format!("Status: {}", response.status())),
            Err(e) => {
                warn!(error = %e, "ML service health check failed");
                MLHealthStatus::down(e.to_string())
            }
        };

        info!(
            "ML service health check result: {}",
            if status.is_up() { "UP" } else { "DOWN" }
        );
        status
    }

    pub async fn is_available(&self) -> bool {
        self.health_status().await.is_up()
    }
}

/// Swap a trailing `predict` path segment for `health` on the same host.
fn derive_health_url(predict_url: &Url) -> Url {
    let mut url = predict_url.clone();
    let path = predict_url.path().trim_end_matches('/');
    let health_path = match path.strip_suffix("/predict") {
        Some(prefix) => format!("{prefix}/health"),
        None => "/health".to_string(),
    };
    url.set_path(&health_path);
    url.set_query(None);
    url.set_fragment(None);
    url
}
