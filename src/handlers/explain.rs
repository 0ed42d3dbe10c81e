//! Explanation handler

use axum::{extract::State, Json};

use crate::extract::ApiJson;
use crate::models::{ExplanationOutcome, ExplanationResponse, PredictionDetails};
use crate::AppState;

/// Generate a human-readable explanation for a fraud prediction.
///
/// Always answers 200 once the body is accepted; generation failures are
/// reported inside the explanation text.
pub async fn explain(
    State(state): State<AppState>,
    ApiJson(details): ApiJson<PredictionDetails>,
) -> Json<ExplanationResponse> {
    let outcome = state.explainer.explain(&details).await;

    match &outcome {
        ExplanationOutcome::Generated(text) => {
            tracing::debug!(
                is_fraud = details.is_fraud,
                chars = text.chars().count(),
                "Explanation generated"
            );
        }
        ExplanationOutcome::Failed(reason) => {
            tracing::warn!("Explanation generation failed: {}", reason);
        }
    }

    Json(outcome.into())
}
