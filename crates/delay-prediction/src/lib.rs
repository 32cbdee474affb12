//! Flight Delay Prediction
//!
//! Turns raw model output into a caller-facing prediction with a discrete
//! confidence level.

pub mod confidence;
pub mod error;
pub mod service;

pub use confidence::{classify, ConfidenceLevel};
pub use error::{PredictionError, PredictionResult};
pub use service::{FlightPredictionResponse, PredictionService};
