//! Text-generation collaborator
//!
//! The explanation model is reached through [`TextGenerator`]. Production
//! uses [`HttpTextGenerator`], which talks to a Hugging Face style
//! text-generation inference endpoint.

pub mod http;

#[cfg(test)]
pub mod testing;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use http::HttpTextGenerator;

/// Padding token sent with a generation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadToken {
    /// Reuse the model's end-of-sequence token
    Eos,
    Id(u32),
}

/// Parameters for a single generation call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOptions {
    /// Maximum total length in tokens, prompt included
    pub max_length: usize,
    pub num_return_sequences: usize,
    pub pad_token: PadToken,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            max_length: 100,
            num_return_sequences: 1,
            pad_token: PadToken::Eos,
        }
    }
}

/// One returned sequence. `generated_text` normally starts with the prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedSequence {
    pub generated_text: String,
}

/// Generation failure
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("network error: {0}")]
    Network(String),

    #[error("inference request timed out after {0}s")]
    Timeout(u64),

    #[error("inference server returned status {status}: {message}")]
    Server { status: u16, message: String },

    #[error("inference backend error: {0}")]
    Backend(String),

    #[error("could not decode inference response: {0}")]
    Parse(String),

    #[error("inference returned no sequences")]
    EmptyResult,

    #[error("generation aborted: {0}")]
    Aborted(String),
}

/// A text-generation model shared by all requests
#[axum::async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<Vec<GeneratedSequence>, GenerationError>;
}
