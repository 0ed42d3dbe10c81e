//! Explanation model

use serde::{Deserialize, Serialize};

/// Prefix of the explanation returned when generation fails
pub const FALLBACK_PREFIX: &str = "Could not generate explanation: ";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplanationResponse {
    pub explanation: String,
}

/// Result of a single explanation attempt
#[derive(Debug, Clone, PartialEq)]
pub enum ExplanationOutcome {
    /// Text generated by the model, prompt removed and trimmed
    Generated(String),
    /// Generation failed; carries the failure description
    Failed(String),
}

impl From<ExplanationOutcome> for ExplanationResponse {
    fn from(outcome: ExplanationOutcome) -> Self {
        let explanation = match outcome {
            ExplanationOutcome::Generated(text) => text,
            ExplanationOutcome::Failed(reason) => format!("{}{}", FALLBACK_PREFIX, reason),
        };

        Self { explanation }
    }
}
