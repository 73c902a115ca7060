//! OpenAI-compatible chat-completions provider.
//!
//! Both model families shipped by default speak the same wire protocol
//! against an OpenAI-compatible endpoint; they differ only in model id,
//! sampling parameters, and API key. This module implements that one shape
//! over `reqwest` with a hard request timeout.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::LlmProvider;

/// Default request timeout for provider calls.
pub const PROVIDER_TIMEOUT: Duration = Duration::from_secs(120);

/// Configuration for an OpenAI-compatible provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: String,
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://integrate.api.nvidia.com/v1".to_string(),
            model: String::new(),
            api_key: String::new(),
            temperature: 0.7,
            top_p: 0.95,
            max_tokens: 1024,
            timeout: PROVIDER_TIMEOUT,
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// Provider speaking the OpenAI chat-completions protocol.
pub struct OpenAiCompatProvider {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl OpenAiCompatProvider {
    /// Build a provider with a dedicated HTTP client honoring the configured timeout.
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatProvider {
    fn model(&self) -> &str {
        &self.config.model
    }

    async fn generate_response(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.config.temperature,
            top_p: self.config.top_p,
            max_tokens: self.config.max_tokens,
        };

        let url = format!("{}/chat/completions", self.config.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::ProviderTimeout
                } else {
                    Error::Http(e)
                }
            })?
            .error_for_status()?;

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| Error::Provider("response contained no choices".to_string()))?;

        debug!("[{}] response: {}", self.config.model, content);
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_request_serializes_to_expected_shape() {
        let request = ChatRequest {
            model: "deepseek-ai/deepseek-r1-distill-qwen-32b",
            messages: vec![ChatMessage {
                role: "user",
                content: "hello",
            }],
            temperature: 0.6,
            top_p: 0.7,
            max_tokens: 1024,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "deepseek-ai/deepseek-r1-distill-qwen-32b");
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["content"], "hello");
    }

    #[test]
    fn chat_response_deserializes_first_choice() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"e2e4 looks fine"}}]}"#;
        let response: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.choices[0].message.content, "e2e4 looks fine");
    }
}
