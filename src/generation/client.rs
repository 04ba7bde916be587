//! OpenAI-compatible chat-completions client.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{GenerationService, GenerationSettings};
use crate::errors::GenerationError;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// Single-turn chat client. Each `complete` call sends one user message.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: Client,
    settings: GenerationSettings,
}

impl ChatClient {
    pub fn new(settings: GenerationSettings) -> Self {
        if settings.api_key.is_none() {
            tracing::warn!("Generation client created without an API key");
        }
        Self {
            http: Client::new(),
            settings,
        }
    }

    /// A client with different settings sharing this client's connection pool.
    pub fn with_settings(&self, settings: GenerationSettings) -> Self {
        Self {
            http: self.http.clone(),
            settings,
        }
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }
}

#[async_trait]
impl GenerationService for ChatClient {
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .ok_or(GenerationError::MissingApiKey)?;

        let request = ChatRequest {
            model: &self.settings.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        };

        tracing::debug!(
            model = %self.settings.model,
            max_tokens = self.settings.max_tokens,
            prompt_chars = prompt.len(),
            "sending chat completion"
        );

        let response = self
            .http
            .post(&self.settings.api_url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(GenerationError::Request)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await.map_err(GenerationError::Request)?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(GenerationError::EmptyResponse)?;

        tracing::debug!(bytes = content.len(), "chat completion received");
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_api_key_fails_before_request() {
        let client = ChatClient::new(GenerationSettings::default());
        let err = client.complete("hello").await.unwrap_err();
        assert!(matches!(err, GenerationError::MissingApiKey));
    }

    #[test]
    fn test_with_settings_replaces_sampling() {
        let client = ChatClient::new(GenerationSettings {
            api_key: Some("key".into()),
            ..GenerationSettings::default()
        });
        let persona = client.with_settings(client.settings().with_sampling(300, 0.8));
        assert_eq!(persona.settings().max_tokens, 300);
        assert_eq!(client.settings().max_tokens, 2000);
    }

    #[test]
    fn test_response_parsing_tolerates_missing_choices() {
        let parsed: ChatResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.choices.is_empty());

        let parsed: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"role":"assistant","content":"hi"}}]}"#)
                .unwrap();
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("hi"));
    }
}
