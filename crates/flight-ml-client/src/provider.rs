use async_trait::async_trait;

use crate::error::MLResult;
use crate::types::{FlightPredictionRequest, MLHealthStatus, MLServiceResponse};
use crate::MLServiceClient;

/// Backend-agnostic interface for delay inference.
///
/// The service layer only sees this trait, so tests and alternative
/// backends can stand in for the HTTP client.
#[async_trait]
pub trait PredictionProvider: Send + Sync {
    async fn predict(&self, request: &FlightPredictionRequest) -> MLResult<MLServiceResponse>;

    async fn health_status(&self) -> MLHealthStatus;

    async fn is_available(&self) -> bool {
        self.health_status().await.is_up()
    }
}

#[async_trait]
impl PredictionProvider for MLServiceClient {
    async fn predict(&self, request: &FlightPredictionRequest) -> MLResult<MLServiceResponse> {
        MLServiceClient::predict(self, request).await
    }

    async fn health_status(&self) -> MLHealthStatus {
        MLServiceClient::health_status(self).await
    }
}
