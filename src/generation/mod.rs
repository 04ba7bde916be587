//! Generation service seam.
//!
//! Every stage turns a prompt into text through [`GenerationService`]. The
//! production implementation is [`ChatClient`], an OpenAI-compatible
//! chat-completions client. Services may signal failure either by returning
//! `Err` or in-band, with a payload that starts with [`ERROR_MARKER`]; callers
//! must check both.

mod client;

pub use client::ChatClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::GenerationError;

/// Prefix that marks a generation payload as an error report.
pub const ERROR_MARKER: &str = "Error";

pub const DEFAULT_API_URL: &str = "https://api.perplexity.ai/chat/completions";
pub const DEFAULT_MODEL: &str = "sonar-pro";
pub const DEFAULT_MAX_TOKENS: u32 = 2000;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Returns true when a payload reports a failure in-band.
pub fn is_error_payload(payload: &str) -> bool {
    payload.starts_with(ERROR_MARKER)
}

/// Turns a prompt into generated text.
#[async_trait]
pub trait GenerationService: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Connection and sampling settings for a chat-completions endpoint.
///
/// Passed explicitly into [`ChatClient`]; nothing reads credentials from
/// process-wide state after configuration is resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSettings {
    pub api_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            api_key: None,
        }
    }
}

impl GenerationSettings {
    /// Same endpoint and credentials with different sampling limits.
    pub fn with_sampling(&self, max_tokens: u32, temperature: f32) -> Self {
        Self {
            max_tokens,
            temperature,
            ..self.clone()
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted in-memory generation services for unit tests.

    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Replays queued responses in order and records every prompt.
    /// When the queue runs dry it echoes a fixed reply.
    #[derive(Default)]
    pub struct ScriptedGenerator {
        responses: Mutex<VecDeque<Result<String, GenerationError>>>,
        prompts: Mutex<Vec<String>>,
        calls: AtomicUsize,
    }

    impl ScriptedGenerator {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_responses<I, S>(responses: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            let generator = Self::new();
            for response in responses {
                generator.push_ok(response);
            }
            generator
        }

        pub fn push_ok(&self, response: impl Into<String>) {
            self.responses.lock().unwrap().push_back(Ok(response.into()));
        }

        pub fn push_err(&self, err: GenerationError) {
            self.responses.lock().unwrap().push_back(Err(err));
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }

        pub fn last_prompt(&self) -> Option<String> {
            self.prompts.lock().unwrap().last().cloned()
        }
    }

    #[async_trait]
    impl GenerationService for ScriptedGenerator {
        async fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok("generated".to_string()))
        }
    }
}
