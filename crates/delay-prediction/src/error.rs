use flight_ml_client::MLServiceError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PredictionError {
    #[error("Failed to get prediction from ML service: {0}")]
    Upstream(#[from] MLServiceError),

    #[error("ML service returned probability {0} outside [0, 1]")]
    InvalidProbability(f64),
}

pub type PredictionResult<T> = Result<T, PredictionError>;
