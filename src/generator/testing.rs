//! Scripted generator for tests

use std::sync::Mutex;

use super::{GeneratedSequence, GenerationError, GenerationOptions, TextGenerator};

/// What the stub does when called
#[derive(Debug, Clone)]
pub enum Reply {
    /// Echo the prompt followed by this continuation
    Continue(String),
    /// Return this text verbatim
    Text(String),
    /// Return no sequences
    Empty,
    /// Fail with a backend error carrying this message
    Fail(String),
    Panic,
}

/// Records every prompt and answers according to `reply`
pub struct StubGenerator {
    reply: Reply,
    calls: Mutex<Vec<(String, GenerationOptions)>>,
}

impl StubGenerator {
    pub fn new(reply: Reply) -> Self {
        Self {
            reply,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(p, _)| p.clone()).collect()
    }

    pub fn options(&self) -> Vec<GenerationOptions> {
        self.calls.lock().unwrap().iter().map(|(_, o)| o.clone()).collect()
    }
}

#[axum::async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<Vec<GeneratedSequence>, GenerationError> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), options.clone()));

        let text = match &self.reply {
            Reply::Continue(rest) => format!("{}{}", prompt, rest),
            Reply::Text(text) => text.clone(),
            Reply::Empty => return Ok(vec![]),
            Reply::Fail(msg) => return Err(GenerationError::Backend(msg.clone())),
            Reply::Panic => panic!("model crashed"),
        };

        Ok(vec![GeneratedSequence { generated_text: text }])
    }
}
