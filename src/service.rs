//! Explanation service
//!
//! Turns a prediction into an explanation: build the prompt, run one
//! generation call, strip the echoed prompt from the output. Failures come
//! back as [`ExplanationOutcome::Failed`] instead of errors.

use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::generator::{GenerationError, GenerationOptions, TextGenerator};
use crate::models::{ExplanationOutcome, PredictionDetails};
use crate::prompt::build_prompt;

#[derive(Clone)]
pub struct ExplanationService {
    generator: Arc<dyn TextGenerator>,
    options: GenerationOptions,
    /// Bounds concurrent calls into the generator
    permits: Arc<Semaphore>,
}

impl ExplanationService {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        options: GenerationOptions,
        max_concurrent_generations: usize,
    ) -> Self {
        Self {
            generator,
            options,
            permits: Arc::new(Semaphore::new(max_concurrent_generations.max(1))),
        }
    }

    /// Explain a single prediction. Never fails; see [`ExplanationOutcome`].
    pub async fn explain(&self, details: &PredictionDetails) -> ExplanationOutcome {
        let prompt = build_prompt(details);

        match self.generate(prompt).await {
            Ok(text) => ExplanationOutcome::Generated(text),
            Err(e) => ExplanationOutcome::Failed(e.to_string()),
        }
    }

    async fn generate(&self, prompt: String) -> Result<String, GenerationError> {
        let permit = self.permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| GenerationError::Aborted(e.to_string()))?;

        let generator = self.generator.clone();
        let options = self.options.clone();

        // Run on its own task so a panicking generator surfaces as a JoinError
        let task = tokio::spawn(async move {
            let _permit = permit;
            let sequences = generator.generate(&prompt, &options).await?;
            let first = sequences
                .into_iter()
                .next()
                .ok_or(GenerationError::EmptyResult)?;

            Ok::<_, GenerationError>(strip_echoed_prompt(&first.generated_text, &prompt).to_string())
        });

        task.await
            .map_err(|e| GenerationError::Aborted(e.to_string()))?
    }
}

/// Remove the prompt echoed at the start of `generated`, then trim.
///
/// Text that does not start with the prompt verbatim is only trimmed.
pub fn strip_echoed_prompt<'a>(generated: &'a str, prompt: &str) -> &'a str {
    generated
        .strip_prefix(prompt)
        .unwrap_or(generated)
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::testing::{Reply, StubGenerator};
    use crate::generator::PadToken;
    use std::time::Duration;

    fn details() -> PredictionDetails {
        PredictionDetails {
            transaction_amount: 500.0,
            transaction_amount_deviation: 2.50,
            time_anomaly: 0.10,
            location_distance: 340.5,
            merchant_novelty: 0.95,
            transaction_frequency: 0.2,
            is_fraud: true,
            risk_score: 0.92,
        }
    }

    fn service(stub: Arc<StubGenerator>) -> ExplanationService {
        ExplanationService::new(stub, GenerationOptions::default(), 4)
    }

    #[test]
    fn test_strip_echoed_prompt() {
        assert_eq!(strip_echoed_prompt("PROMPT  Risky.\n", "PROMPT"), "Risky.");
        assert_eq!(strip_echoed_prompt("PROMPT", "PROMPT"), "");
        assert_eq!(strip_echoed_prompt("  Only new text ", "PROMPT"), "Only new text");
        // Only a leading echo is removed
        assert_eq!(strip_echoed_prompt("x PROMPT y", "PROMPT"), "x PROMPT y");
    }

    #[tokio::test]
    async fn test_explain_strips_prompt_and_trims() {
        let stub = Arc::new(StubGenerator::new(Reply::Continue(
            "  This transaction is high-risk.\n".into(),
        )));
        let outcome = service(stub.clone()).explain(&details()).await;

        assert_eq!(outcome, ExplanationOutcome::Generated("This transaction is high-risk.".into()));
        assert_eq!(stub.prompts(), vec![build_prompt(&details())]);
    }

    #[tokio::test]
    async fn test_explain_passes_generation_options() {
        let stub = Arc::new(StubGenerator::new(Reply::Continue(" ok".into())));
        service(stub.clone()).explain(&details()).await;

        assert_eq!(
            stub.options(),
            vec![GenerationOptions {
                max_length: 100,
                num_return_sequences: 1,
                pad_token: PadToken::Eos,
            }]
        );
    }

    #[tokio::test]
    async fn test_echo_without_continuation_is_empty() {
        let stub = Arc::new(StubGenerator::new(Reply::Continue(String::new())));
        let outcome = service(stub).explain(&details()).await;
        assert_eq!(outcome, ExplanationOutcome::Generated(String::new()));
    }

    #[tokio::test]
    async fn test_generator_error_is_failure() {
        let stub = Arc::new(StubGenerator::new(Reply::Fail("CUDA out of memory".into())));
        let outcome = service(stub).explain(&details()).await;
        assert_eq!(
            outcome,
            ExplanationOutcome::Failed("inference backend error: CUDA out of memory".into())
        );
    }

    #[tokio::test]
    async fn test_no_sequences_is_failure() {
        let stub = Arc::new(StubGenerator::new(Reply::Empty));
        let outcome = service(stub).explain(&details()).await;
        assert_eq!(outcome, ExplanationOutcome::Failed("inference returned no sequences".into()));
    }

    #[tokio::test]
    async fn test_generator_panic_is_failure() {
        let stub = Arc::new(StubGenerator::new(Reply::Panic));
        let outcome = service(stub).explain(&details()).await;

        match outcome {
            ExplanationOutcome::Failed(reason) => assert!(reason.starts_with("generation aborted")),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    struct SlowGenerator {
        active: std::sync::atomic::AtomicUsize,
        peak: std::sync::atomic::AtomicUsize,
    }

    #[axum::async_trait]
    impl TextGenerator for SlowGenerator {
        async fn generate(
            &self,
            prompt: &str,
            _options: &GenerationOptions,
        ) -> Result<Vec<crate::generator::GeneratedSequence>, GenerationError> {
            use std::sync::atomic::Ordering;

            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.active.fetch_sub(1, Ordering::SeqCst);

            Ok(vec![crate::generator::GeneratedSequence {
                generated_text: format!("{} done", prompt),
            }])
        }
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let generator = Arc::new(SlowGenerator {
            active: Default::default(),
            peak: Default::default(),
        });
        let service = ExplanationService::new(generator.clone(), GenerationOptions::default(), 2);

        let mut handles = Vec::new();
        for _ in 0..8 {
            let service = service.clone();
            handles.push(tokio::spawn(async move { service.explain(&details()).await }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap(), ExplanationOutcome::Generated("done".into()));
        }

        assert!(generator.peak.load(std::sync::atomic::Ordering::SeqCst) <= 2);
    }
}
