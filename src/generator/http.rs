//! Inference API Client
//!
//! HTTP client for a Hugging Face style text-generation endpoint.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{GeneratedSequence, GenerationError, GenerationOptions, PadToken, TextGenerator};
use crate::config::Config;

/// Inference endpoint configuration
#[derive(Debug, Clone)]
pub struct InferenceConfig {
    pub url: String,
    pub token: Option<String>,
    pub timeout_seconds: u64,
    pub eos_token_id: u32,
    pub return_full_text: bool,
}

impl From<&Config> for InferenceConfig {
    fn from(config: &Config) -> Self {
        Self {
            url: config.inference_url.clone(),
            token: config.inference_token.clone(),
            timeout_seconds: config.inference_timeout_secs,
            eos_token_id: config.eos_token_id,
            return_full_text: config.return_full_text,
        }
    }
}

/// Text generator backed by a remote inference endpoint
pub struct HttpTextGenerator {
    config: InferenceConfig,
    http_client: reqwest::Client,
}

// Request/Response types

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    inputs: &'a str,
    parameters: GenerateParameters,
    options: RequestOptions,
}

#[derive(Debug, Serialize)]
struct GenerateParameters {
    max_length: usize,
    num_return_sequences: usize,
    pad_token_id: u32,
    return_full_text: bool,
}

#[derive(Debug, Serialize)]
struct RequestOptions {
    wait_for_model: bool,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GenerateResponse {
    Sequences(Vec<GeneratedSequence>),
    Single(GeneratedSequence),
    Error(ErrorResponse),
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: serde_json::Value,
}

impl ErrorResponse {
    fn message(&self) -> String {
        match &self.error {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl HttpTextGenerator {
    /// Create new inference client
    pub fn new(config: InferenceConfig) -> Result<Self, GenerationError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| GenerationError::Network(e.to_string()))?;

        Ok(Self { config, http_client })
    }

    /// Endpoint this client posts to
    pub fn url(&self) -> &str {
        &self.config.url
    }

    fn request_body<'a>(&self, prompt: &'a str, options: &GenerationOptions) -> GenerateRequest<'a> {
        let pad_token_id = match options.pad_token {
            PadToken::Eos => self.config.eos_token_id,
            PadToken::Id(id) => id,
        };

        GenerateRequest {
            inputs: prompt,
            parameters: GenerateParameters {
                max_length: options.max_length,
                num_return_sequences: options.num_return_sequences,
                pad_token_id,
                return_full_text: self.config.return_full_text,
            },
            options: RequestOptions { wait_for_model: true },
        }
    }

    fn transport_error(&self, err: reqwest::Error) -> GenerationError {
        if err.is_timeout() {
            GenerationError::Timeout(self.config.timeout_seconds)
        } else {
            GenerationError::Network(err.to_string())
        }
    }
}

#[axum::async_trait]
impl TextGenerator for HttpTextGenerator {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<Vec<GeneratedSequence>, GenerationError> {
        let mut request = self.http_client
            .post(&self.config.url)
            .json(&self.request_body(prompt, options));

        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;

        decode_response(status, &body)
    }
}

fn decode_response(status: u16, body: &[u8]) -> Result<Vec<GeneratedSequence>, GenerationError> {
    if !(200..300).contains(&status) {
        let message = match serde_json::from_slice::<ErrorResponse>(body) {
            Ok(err) => err.message(),
            Err(_) => String::from_utf8_lossy(body).trim().to_string(),
        };
        return Err(GenerationError::Server { status, message });
    }

    match serde_json::from_slice::<GenerateResponse>(body) {
        Ok(GenerateResponse::Sequences(sequences)) => Ok(sequences),
        Ok(GenerateResponse::Single(sequence)) => Ok(vec![sequence]),
        Ok(GenerateResponse::Error(err)) => Err(GenerationError::Backend(err.message())),
        Err(e) => Err(GenerationError::Parse(e.to_string())),
    }
}
