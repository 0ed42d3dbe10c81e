//! Configuration module

use std::env;
use std::str::FromStr;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Text-generation inference endpoint
    pub inference_url: String,

    /// Bearer token for the inference endpoint
    pub inference_token: Option<String>,

    /// Inference request timeout in seconds
    pub inference_timeout_secs: u64,

    /// End-of-sequence token id, used as padding token
    pub eos_token_id: u32,

    /// Ask the backend to echo the prompt ahead of the continuation
    pub return_full_text: bool,

    /// Maximum total output length in tokens
    pub max_length: usize,

    /// Sequences requested per generation
    pub num_return_sequences: usize,

    /// Generation calls allowed to run at once
    pub max_concurrent_generations: usize,

    /// Log output format ("pretty" or "json")
    pub log_format: String,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),

            port: parse_var("PORT").unwrap_or(8081),

            inference_url: env::var("INFERENCE_URL").unwrap_or_else(|_| {
                "https://api-inference.huggingface.co/models/distilgpt2".to_string()
            }),

            inference_token: env::var("INFERENCE_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty()),

            inference_timeout_secs: parse_var("INFERENCE_TIMEOUT_SECS").unwrap_or(120),

            eos_token_id: parse_var("INFERENCE_EOS_TOKEN_ID").unwrap_or(50256),

            return_full_text: parse_var("INFERENCE_RETURN_FULL_TEXT").unwrap_or(true),

            max_length: parse_var("GENERATION_MAX_LENGTH").unwrap_or(100),

            num_return_sequences: parse_var("GENERATION_NUM_SEQUENCES").unwrap_or(1),

            max_concurrent_generations: parse_var("MAX_CONCURRENT_GENERATIONS")
                .unwrap_or(4usize)
                .max(1),

            log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()),

            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Check if logs should be emitted as JSON lines
    pub fn json_logs(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }
}

fn parse_var<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
