//! Few-shot prompt construction for the explanation model.

use crate::models::PredictionDetails;

const PREAMBLE: &str = "You are a fraud analyst. Your task is to provide a brief, professional explanation for a transaction's fraud status based on the provided data.";

/// Static examples steering the model toward the expected explanation style.
const FEW_SHOT_EXAMPLES: &str = "
**Example 1 (Fraudulent):**
- **Data:** High amount, high location distance, new merchant.
- **Explanation:** This transaction is considered high-risk because it involves a large amount at a location far from the user's typical area and with a merchant they have not used before.

**Example 2 (Legitimate):**
- **Data:** Normal amount, low location distance, frequent merchant.
- **Explanation:** This transaction appears to be safe. The amount is consistent with the user's spending habits, it occurred at a familiar location, and it's with a frequently used merchant.
";

/// Build the prompt for a prediction.
///
/// The result ends with an open `- **Explanation:**` marker so the model
/// continues the text from there. Numbers are rounded from their exact
/// binary value: `1.234` renders as `1.23`, `0.87` as `87%`.
pub fn build_prompt(details: &PredictionDetails) -> String {
    format!(
        "{}\n\n{}\n\n{}",
        PREAMBLE,
        FEW_SHOT_EXAMPLES,
        current_transaction(details)
    )
}

fn current_transaction(details: &PredictionDetails) -> String {
    format!(
        "
**Current Transaction:**
- **Status:** {status}
- **Risk Score:** {risk:.0}%
- **Key Factors:** Amount deviation is {deviation:.2}, time anomaly is {time:.2}, location distance is {distance:.1}km, merchant novelty is {novelty:.2}, and transaction frequency is {frequency:.1}.
- **Explanation:**",
        status = details.status(),
        risk = details.risk_score * 100.0,
        deviation = details.transaction_amount_deviation,
        time = details.time_anomaly,
        distance = details.location_distance,
        novelty = details.merchant_novelty,
        frequency = details.transaction_frequency,
    )
}
