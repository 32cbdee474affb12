use std::sync::Arc;

use flight_ml_client::{FlightPrediction, FlightPredictionRequest, MLHealthStatus, PredictionProvider};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::confidence::ConfidenceLevel;
use crate::error::{PredictionError, PredictionResult};

/// Prediction handed back to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightPredictionResponse {
    pub prediction: FlightPrediction,
    pub probability: f64,
    pub confidence: ConfidenceLevel,
}

pub struct PredictionService {
    provider: Arc<dyn PredictionProvider>,
}

impl PredictionService {
    pub fn new(provider: Arc<dyn PredictionProvider>) -> Self {
        Self { provider }
    }

    /// Ask the model for a delay prediction and attach a confidence level.
    ///
    /// Upstream failures are returned as errors; no fallback prediction is
    /// ever produced.
    pub async fn predict_delay(
        &self,
        request: &FlightPredictionRequest,
    ) -> PredictionResult<FlightPredictionResponse> {
        info!(flight_number = %request.flight_number, "Processing prediction");

        let ml_response = self.provider.predict(request).await.map_err(|e| {
            error!(flight_number = %request.flight_number, error = %e, "ML service error");
            PredictionError::Upstream(e)
        })?;

        let probability = ml_response.confidence;
        // NaN fails the range check too.
        if !(0.0..=1.0).contains(&probability) {
            error!(
                flight_number = %request.flight_number,
                probability,
                "ML service returned out-of-range probability"
            );
            return Err(PredictionError::InvalidProbability(probability));
        }

        let confidence = ConfidenceLevel::from_probability(probability);
        info!(
            flight_number = %request.flight_number,
            prediction = %ml_response.prediction,
            probability,
            confidence = %confidence,
            "Prediction result from ML service"
        );

        Ok(FlightPredictionResponse {
            prediction: ml_response.prediction,
            probability,
            confidence,
        })
    }

    pub async fn is_ml_service_available(&self) -> bool {
        self.provider.is_available().await
    }

    pub async fn ml_service_health(&self) -> MLHealthStatus {
        self.provider.health_status().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use flight_ml_client::{MLResult, MLServiceError, MLServiceResponse};
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum Outcome {
        Respond(MLServiceResponse),
        Timeout,
        Empty,
    }

    struct StubProvider {
        outcome: Outcome,
        calls: AtomicUsize,
    }

    impl StubProvider {
        fn new(outcome: Outcome) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl PredictionProvider for StubProvider {
        async fn predict(&self, _request: &FlightPredictionRequest) -> MLResult<MLServiceResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.outcome {
                Outcome::Respond(response) => Ok(response.clone()),
                Outcome::Timeout => Err(MLServiceError::Timeout),
                Outcome::Empty => Err(MLServiceError::EmptyResponse),
            }
        }

        async fn health_status(&self) -> MLHealthStatus {
            MLHealthStatus::down("stub")
        }
    }

    fn request() -> FlightPredictionRequest {
        serde_json::from_value(serde_json::json!({
            "flightNumber": "AB123",
            "companyName": "AB",
            "flightOrigin": "GRU",
            "flightDestination": "GIG",
            "flightDepartureDate": "2025-12-20T14:30:00",
            "flightDistance": 350
        }))
        .unwrap()
    }

    fn responding(prediction: FlightPrediction, confidence: f64) -> Arc<StubProvider> {
        StubProvider::new(Outcome::Respond(MLServiceResponse {
            prediction,
            confidence,
        }))
    }

    #[tokio::test]
    async fn test_predict_delay_end_to_end() {
        let stub = responding(FlightPrediction::Delayed, 0.82);
        let service = PredictionService::new(stub.clone());

        let response = service.predict_delay(&request()).await.unwrap();
        assert_eq!(
            response,
            FlightPredictionResponse {
                prediction: FlightPrediction::Delayed,
                probability: 0.82,
                confidence: ConfidenceLevel::High,
            }
        );
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_response_shape() {
        let service = PredictionService::new(responding(FlightPrediction::OnTime, 0.92));
        let response = service.predict_delay(&request()).await.unwrap();
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            serde_json::json!({
                "prediction": "ON_TIME",
                "probability": 0.92,
                "confidence": "VERY_HIGH"
            })
        );
    }

    #[tokio::test]
    async fn test_upstream_failure_is_wrapped() {
        let stub = StubProvider::new(Outcome::Timeout);
        let service = PredictionService::new(stub.clone());

        let err = service.predict_delay(&request()).await.unwrap_err();
        assert!(matches!(
            err,
            PredictionError::Upstream(MLServiceError::Timeout)
        ));
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);

        let service = PredictionService::new(StubProvider::new(Outcome::Empty));
        let err = service.predict_delay(&request()).await.unwrap_err();
        assert!(matches!(
            err,
            PredictionError::Upstream(MLServiceError::EmptyResponse)
        ));
    }

    #[tokio::test]
    async fn test_out_of_range_probability_is_rejected() {
        for bad in [1.2, -0.1, f64::NAN] {
            let service = PredictionService::new(responding(FlightPrediction::Delayed, bad));
            let err = service.predict_delay(&request()).await.unwrap_err();
            assert!(matches!(err, PredictionError::InvalidProbability(_)), "value {bad}");
        }
    }

    #[tokio::test]
    async fn test_availability_delegates_to_provider() {
        let service = PredictionService::new(responding(FlightPrediction::OnTime, 0.5));
        assert!(!service.is_ml_service_available().await);
        assert_eq!(service.ml_service_health().await.detail, "stub");
    }
}
