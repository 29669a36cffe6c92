//! OpenRouter Completion Provider
//!
//! Chat-completions client for OpenRouter's OpenAI-compatible endpoint.
//! One attempt per call, bounded by the configured timeout.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;

use shopnest::{
    ChatMessage, CompletionOptions, CompletionProvider, CompletionResponse, DomainError,
    TokenUsage,
};

use crate::config::ProviderConfig;

/// HTTP implementation of CompletionProvider
pub struct OpenRouterProvider {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
}

impl OpenRouterProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| DomainError::provider(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
        })
    }
}

// ============================================
// Request Types
// ============================================

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[async_trait]
impl CompletionProvider for OpenRouterProvider {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<CompletionResponse, DomainError> {
        let request = CompletionRequest {
            model: &self.model,
            messages,
            max_tokens: options.max_tokens,
            temperature: options.temperature,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    DomainError::provider(format!("Request timed out: {err}"))
                } else {
                    DomainError::provider(format!("Request failed: {err}"))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(map_http_error(status, body));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|err| DomainError::provider(format!("Parse error: {err}")))?;

        let content = extract_answer(&payload).ok_or_else(|| {
            DomainError::provider(format!("Response has no answer content: {payload}"))
        })?;

        Ok(CompletionResponse {
            content,
            model: payload
                .get("model")
                .and_then(|m| m.as_str())
                .unwrap_or(&self.model)
                .to_string(),
            usage: extract_usage(&payload),
            finish_reason: payload
                .pointer("/choices/0/finish_reason")
                .and_then(|r| r.as_str())
                .map(str::to_string),
        })
    }

    fn provider_name(&self) -> &str {
        "openrouter"
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

// ============================================
// Helper Functions
// ============================================

fn extract_answer(root: &Value) -> Option<String> {
    root.pointer("/choices/0/message/content")
        .and_then(|c| c.as_str())
        .map(str::to_string)
}

fn extract_usage(root: &Value) -> TokenUsage {
    let field = |name: &str| {
        root.get("usage")
            .and_then(|u| u.get(name))
            .and_then(|v| v.as_u64())
            .map(|v| u32::try_from(v).unwrap_or(u32::MAX))
            .unwrap_or(0)
    };

    TokenUsage {
        prompt_tokens: field("prompt_tokens"),
        completion_tokens: field("completion_tokens"),
        total_tokens: field("total_tokens"),
    }
}

fn map_http_error(status: StatusCode, body: String) -> DomainError {
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|json| {
            json.get("error")
                .and_then(|err| err.get("message"))
                .and_then(|msg| msg.as_str())
                .map(|msg| msg.to_string())
        })
        .unwrap_or(body);

    DomainError::provider_status(status.as_u16(), message)
}
