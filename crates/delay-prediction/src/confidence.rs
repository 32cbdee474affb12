use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete confidence bucket for a delay probability.
///
/// Variants are declared in ascending order so `Ord` follows confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfidenceLevel {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl ConfidenceLevel {
    /// Lower bounds are inclusive; anything below 0.45 is `VeryLow`.
    pub fn from_probability(probability: f64) -> Self {
        match probability {
            p if p >= 0.90 => ConfidenceLevel::VeryHigh,
            p if p >= 0.75 => ConfidenceLevel::High,
            p if p >= 0.60 => ConfidenceLevel::Medium,
            p if p >= 0.45 => ConfidenceLevel::Low,
            _ => ConfidenceLevel::VeryLow,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLevel::VeryLow => "VERY_LOW",
            ConfidenceLevel::Low => "LOW",
            ConfidenceLevel::Medium => "MEDIUM",
            ConfidenceLevel::High => "HIGH",
            ConfidenceLevel::VeryHigh => "VERY_HIGH",
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn classify(probability: f64) -> ConfidenceLevel {
    ConfidenceLevel::from_probability(probability)
}
