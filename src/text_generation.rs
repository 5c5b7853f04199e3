//! # Text Generation Client
//!
//! Client for an OpenAI-compatible chat-completions endpoint. The extractor
//! depends on the [`TextGenerator`] trait so tests can substitute canned
//! responses for the real HTTP service.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

use crate::analysis_config::TextServiceConfig;
use crate::analysis_errors::{AnalysisError, Result};

/// A service that completes a system instruction plus user content into text
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Return the text content of the first completion choice
    async fn complete(&self, system_prompt: &str, user_content: &str) -> Result<String>;
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: &str) -> Self {
        Self {
            role: "system".to_string(),
            content: content.to_string(),
        }
    }

    pub fn user(content: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: content.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatChoice {
    pub message: ChatMessage,
}

impl ChatCompletionResponse {
    /// Text of the first choice
    pub fn first_content(self) -> Result<String> {
        self.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AnalysisError::MalformedResponse("completion has no choices".to_string()))
    }
}

/// OpenAI chat-completions client
pub struct OpenAiClient {
    http_client: Client,
    config: TextServiceConfig,
}

impl OpenAiClient {
    /// Create a client whose requests time out after `config.timeout_secs`
    pub fn new(config: TextServiceConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AnalysisError::TextServiceFailure(e.to_string()))?;

        Ok(Self {
            http_client,
            config,
        })
    }

    /// Build the request body sent for one recipe
    pub fn build_request(&self, system_prompt: &str, user_content: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage::system(system_prompt), ChatMessage::user(user_content)],
            temperature: self.config.temperature,
            top_p: self.config.top_p,
            max_tokens: self.config.max_tokens,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
        }
    }
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    async fn complete(&self, system_prompt: &str, user_content: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let request = self.build_request(system_prompt, user_content);

        debug!(model = %request.model, content_length = user_content.len(), "Sending chat completion request");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Chat completion request failed");
                AnalysisError::TextServiceFailure(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            error!(status = %status, body = %error_body, "Chat completion returned an error status");
            return Err(AnalysisError::TextServiceFailure(format!("HTTP {status}: {error_body}")));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::MalformedResponse(format!("chat completion body: {e}")))?;

        completion.first_content()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let client = OpenAiClient::new(TextServiceConfig::default()).unwrap();
        let request = client.build_request("instructions", "2 eggs");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "gpt-3.5-turbo");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], "instructions");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "2 eggs");
        assert_eq!(json["max_tokens"], 1000);
        assert_eq!(json["temperature"], 0.5);
    }

    #[test]
    fn test_first_content() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"NO_INGREDIENTS"}}]}"#;
        let response: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.first_content().unwrap(), "NO_INGREDIENTS");
    }

    #[test]
    fn test_missing_choices_is_malformed() {
        let response: ChatCompletionResponse = serde_json::from_str("{}").unwrap();
        assert!(matches!(
            response.first_content(),
            Err(AnalysisError::MalformedResponse(_))
        ));
    }
}
