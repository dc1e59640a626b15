use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Rating category predicted for a movie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RatingCategory {
    Poor,
    Average,
    Good,
    Excellent,
}

impl RatingCategory {
    /// Canonical label order, used when an artifact does not list its classes.
    pub const ALL: [RatingCategory; 4] = [
        RatingCategory::Poor,
        RatingCategory::Average,
        RatingCategory::Good,
        RatingCategory::Excellent,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RatingCategory::Poor => "Poor",
            RatingCategory::Average => "Average",
            RatingCategory::Good => "Good",
            RatingCategory::Excellent => "Excellent",
        }
    }
}

impl fmt::Display for RatingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RatingCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("Unknown rating category: {}", s))
    }
}

/// Prediction for one input record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub rating_category: RatingCategory,
    /// Probability mass of `rating_category`, in [0, 1]
    pub confidence: f64,
}

/// Body returned by `POST /predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub predictions: Vec<PredictionResult>,
    pub model_name: String,
    pub model_metrics: Map<String, Value>,
}
