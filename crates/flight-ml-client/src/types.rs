use chrono::NaiveDateTime;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Flight features forwarded to the ML service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightPredictionRequest {
    pub flight_number: String,
    pub company_name: String,
    pub flight_origin: String,
    pub flight_destination: String,
    pub flight_departure_date: NaiveDateTime,
    pub flight_distance: i64,
}

/// A single rejected field from [`FlightPredictionRequest::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

impl FieldViolation {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl FlightPredictionRequest {
    /// Copy of the request with carrier and airport codes upper-cased.
    pub fn normalized(&self) -> Self {
        Self {
            company_name: self.company_name.trim().to_uppercase(),
            flight_origin: self.flight_origin.trim().to_uppercase(),
            flight_destination: self.flight_destination.trim().to_uppercase(),
            ..self.clone()
        }
    }

    /// Check field lengths and distance before anything is sent upstream.
    pub fn validate(&self) -> Result<(), Vec<FieldViolation>> {
        let mut violations = Vec::new();

        check_len(&mut violations, "flightNumber", &self.flight_number, 2, 10);
        check_len(&mut violations, "companyName", &self.company_name, 2, 3);
        check_len(&mut violations, "flightOrigin", &self.flight_origin, 3, 3);
        check_len(&mut violations, "flightDestination", &self.flight_destination, 3, 3);

        if self.flight_distance <= 0 {
            violations.push(FieldViolation::new(
                "flightDistance",
                "must be greater than 0",
            ));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

fn check_len(
    violations: &mut Vec<FieldViolation>,
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) {
    let len = value.chars().count();
    if len < min || len > max {
        let message = if min == max {
            format!("must be exactly {min} characters")
        } else {
            format!("must be between {min} and {max} characters")
        };
        violations.push(FieldViolation::new(field, message));
    }
}

/// Outcome label produced by the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlightPrediction {
    OnTime,
    Delayed,
}

impl FlightPrediction {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlightPrediction::OnTime => "ON_TIME",
            FlightPrediction::Delayed => "DELAYED",
        }
    }
}

impl fmt::Display for FlightPrediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlightPrediction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace(['-', ' '], "_").as_str() {
            "ON_TIME" => Ok(FlightPrediction::OnTime),
            "DELAYED" => Ok(FlightPrediction::Delayed),
            other => Err(format!("unknown prediction label '{other}'")),
        }
    }
}

// The ML wrapper encodes the label as 0/1, the model itself as a string.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawPrediction {
    Code(u8),
    Label(String),
}

impl<'de> Deserialize<'de> for FlightPrediction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RawPrediction::deserialize(deserializer)? {
            RawPrediction::Code(0) => Ok(FlightPrediction::OnTime),
            RawPrediction::Code(1) => Ok(FlightPrediction::Delayed),
            RawPrediction::Code(code) => {
                Err(D::Error::custom(format!("unknown prediction code {code}")))
            }
            RawPrediction::Label(label) => label.parse().map_err(D::Error::custom),
        }
    }
}

/// Raw body returned by the ML service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MLServiceResponse {
    pub prediction: FlightPrediction,
    #[serde(alias = "probability")]
    pub confidence: f64,
}

/// Liveness of the ML service as seen from this client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthState {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MLHealthStatus {
    pub status: HealthState,
    pub detail: String,
}

impl MLHealthStatus {
    pub fn up() -> Self {
        Self {
            status: HealthState::Up,
            detail: "OK".to_string(),
        }
    }

    pub fn down(detail: impl Into<String>) -> Self {
        Self {
            status: HealthState::Down,
            detail: detail.into(),
        }
    }

    pub fn is_up(&self) -> bool {
        self.status == HealthState::Up
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_request() -> FlightPredictionRequest {
        serde_json::from_value(json!({
            "flightNumber": "AA1234",
            "companyName": "aa",
            "flightOrigin": "jfk",
            "flightDestination": "lax",
            "flightDepartureDate": "2025-12-20T14:30:00",
            "flightDistance": 3974
        }))
        .unwrap()
    }

    #[test]
    fn test_request_wire_format() {
        let value = serde_json::to_value(sample_request()).unwrap();
        assert_eq!(value["flightNumber"], "AA1234");
        assert_eq!(value["flightDepartureDate"], "2025-12-20T14:30:00");
        assert_eq!(value["flightDistance"], 3974);
    }

    #[test]
    fn test_normalized_uppercases_codes() {
        let request = sample_request().normalized();
        assert_eq!(request.company_name, "AA");
        assert_eq!(request.flight_origin, "JFK");
        assert_eq!(request.flight_destination, "LAX");
        assert_eq!(request.flight_number, "AA1234");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_short_flight_number() {
        let mut request = sample_request();
        request.flight_number = "A".into();
        let violations = request.validate().unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "flightNumber");
    }

    #[test]
    fn test_validate_rejects_bad_codes_and_distance() {
        let mut request = sample_request();
        request.flight_origin = "JFKX".into();
        request.company_name = "A".into();
        request.flight_distance = -100;
        let fields: Vec<_> = request
            .validate()
            .unwrap_err()
            .into_iter()
            .map(|v| v.field)
            .collect();
        assert_eq!(fields, vec!["companyName", "flightOrigin", "flightDistance"]);
    }

    #[test]
    fn test_response_accepts_string_label() {
        let response: MLServiceResponse =
            serde_json::from_value(json!({"prediction": "DELAYED", "confidence": 0.82})).unwrap();
        assert_eq!(response.prediction, FlightPrediction::Delayed);
        assert_eq!(response.confidence, 0.82);
    }

    #[test]
    fn test_response_accepts_wrapper_encoding() {
        let response: MLServiceResponse =
            serde_json::from_value(json!({"prediction": 0, "probability": 0.92})).unwrap();
        assert_eq!(response.prediction, FlightPrediction::OnTime);
        assert_eq!(response.confidence, 0.92);
    }

    #[test]
    fn test_response_rejects_unknown_label_and_missing_probability() {
        assert!(serde_json::from_value::<MLServiceResponse>(
            json!({"prediction": "CANCELLED", "confidence": 0.5})
        )
        .is_err());
        assert!(serde_json::from_value::<MLServiceResponse>(json!({"prediction": 2, "confidence": 0.5}))
            .is_err());
        assert!(serde_json::from_value::<MLServiceResponse>(json!({"prediction": "DELAYED"})).is_err());
    }

    #[test]
    fn test_label_parsing_is_lenient_on_case() {
        assert_eq!("on-time".parse::<FlightPrediction>(), Ok(FlightPrediction::OnTime));
        assert_eq!(FlightPrediction::Delayed.to_string(), "DELAYED");
    }
}
