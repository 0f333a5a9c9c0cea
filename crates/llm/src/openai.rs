//! OpenAI-Compatible Provider
//!
//! Implementation of the LlmProvider trait for the OpenAI chat-completions
//! wire format. Local inference servers (LM Studio, llama.cpp server, Ollama's
//! `/v1` API, vLLM) all speak it, so this one provider covers them.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::provider::{parse_http_error, LlmProvider};
use super::types::{
    LlmError, LlmResponse, LlmResult, Message, ProviderConfig, StopReason, UsageStats,
};
use crate::http_client::build_http_client;

/// Default endpoint: LM Studio's local server
pub const DEFAULT_CHAT_COMPLETIONS_URL: &str = "http://localhost:1234/v1/chat/completions";

const CHAT_COMPLETIONS_SUFFIX: &str = "/chat/completions";

/// OpenAI-compatible chat-completions provider
pub struct OpenAIProvider {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl OpenAIProvider {
    /// Create a new provider with the given configuration
    pub fn new(config: ProviderConfig) -> LlmResult<Self> {
        let timeout = config.request_timeout_secs.map(Duration::from_secs);
        let client = build_http_client(timeout)?;
        Ok(Self { config, client })
    }

    /// Get the chat-completions URL
    fn base_url(&self) -> &str {
        self.config
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_CHAT_COMPLETIONS_URL)
    }

    /// Model listing URL: the chat-completions URL with its
    /// `/chat/completions` suffix replaced by `/models`.
    fn models_url(&self) -> String {
        let base = self.base_url().trim_end_matches('/');
        let root = base.strip_suffix(CHAT_COMPLETIONS_SUFFIX).unwrap_or(base);
        format!("{}/models", root)
    }

    /// Build the request body for the API
    fn build_request_body(&self, messages: &[Message], system: Option<&str>) -> serde_json::Value {
        let mut openai_messages: Vec<serde_json::Value> = Vec::with_capacity(messages.len() + 1);

        if let Some(sys) = system {
            openai_messages.push(serde_json::json!({
                "role": "system",
                "content": sys
            }));
        }

        for msg in messages {
            openai_messages.push(serde_json::json!({
                "role": msg.role.as_str(),
                "content": msg.content
            }));
        }

        serde_json::json!({
            "model": self.config.model,
            "messages": openai_messages,
            "temperature": self.config.temperature,
            "max_tokens": self.config.max_tokens,
            "stream": false,
        })
    }

    /// Parse a response from the API
    fn parse_response(&self, response: OpenAIResponse) -> LlmResult<LlmResponse> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::ParseError {
                message: "response contained no choices".to_string(),
            })?;

        let content = choice.message.and_then(|m| m.content);

        let stop_reason = choice
            .finish_reason
            .as_deref()
            .map(StopReason::from)
            .unwrap_or(StopReason::EndTurn);

        let usage = response
            .usage
            .map(|u| UsageStats {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        Ok(LlmResponse {
            content,
            stop_reason,
            usage,
            model: response.model.unwrap_or_else(|| self.config.model.clone()),
        })
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.api_key {
            Some(key) => request.header("Authorization", format!("Bearer {}", key)),
            None => request,
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAIProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn send_message(
        &self,
        messages: Vec<Message>,
        system: Option<String>,
    ) -> LlmResult<LlmResponse> {
        let body = self.build_request_body(&messages, system.as_deref());

        let response = self
            .authorize(self.client.post(self.base_url()))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::NetworkError {
                message: e.to_string(),
            })?;

        let status = response.status().as_u16();
        let body_text = response.text().await.map_err(|e| LlmError::NetworkError {
            message: e.to_string(),
        })?;

        if !(200..300).contains(&status) {
            return Err(parse_http_error(status, &body_text, self.name()));
        }

        let openai_response: OpenAIResponse =
            serde_json::from_str(&body_text).map_err(|e| LlmError::ParseError {
                message: format!("Failed to parse response: {}", e),
            })?;

        self.parse_response(openai_response)
    }

    async fn health_check(&self) -> LlmResult<()> {
        let response = self
            .authorize(self.client.get(self.models_url()))
            .send()
            .await
            .map_err(|e| LlmError::ProviderUnavailable {
                message: format!("{} is not reachable: {}", self.base_url(), e),
            })?;

        let status = response.status().as_u16();
        if (200..300).contains(&status) {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(parse_http_error(status, &body, self.name()))
        }
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }

    async fn list_models(&self) -> LlmResult<Option<Vec<String>>> {
        let response = self
            .authorize(self.client.get(self.models_url()))
            .send()
            .await
            .map_err(|e| LlmError::NetworkError {
                message: e.to_string(),
            })?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            let body = response.text().await.unwrap_or_default();
            return Err(parse_http_error(status, &body, self.name()));
        }

        let body: serde_json::Value = response.json().await.map_err(|e| LlmError::ParseError {
            message: e.to_string(),
        })?;

        let models = body["data"]
            .as_array()
            .map(|arr| {
                arr.iter()
                    .filter_map(|m| m["id"].as_str().map(|s| s.to_string()))
                    .collect()
            })
            .unwrap_or_default();

        Ok(Some(models))
    }
}

/// Chat-completions response format
#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    model: Option<String>,
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<ResponseUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}
