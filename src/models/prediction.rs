//! Prediction model

use serde::{Deserialize, Serialize};

/// Output of the upstream fraud model for a single transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionDetails {
    pub transaction_amount: f64,
    pub transaction_amount_deviation: f64,
    pub time_anomaly: f64,
    /// Kilometers from the cardholder's usual location
    pub location_distance: f64,
    pub merchant_novelty: f64,
    pub transaction_frequency: f64,
    pub is_fraud: bool,
    /// Fraction in [0, 1]
    pub risk_score: f64,
}

impl PredictionDetails {
    /// Status label used in prompts
    pub fn status(&self) -> &'static str {
        if self.is_fraud {
            "fraudulent"
        } else {
            "legitimate"
        }
    }
}
