// src/provider/openai.rs - OpenAI Chat Completions provider

use std::time::Duration;

use async_trait::async_trait;

use super::{ChatRequest, ChatResponse, CompletionProvider};
use crate::infra::config::ProviderConfig;
use crate::infra::errors::ChatError;

pub struct OpenAIProvider {
    api_key: String,
    client: reqwest::Client,
    base_url: String,
}

impl OpenAIProvider {
    pub fn from_config(api_key: String, config: &ProviderConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Falling back to default HTTP client: {}", e);
                reqwest::Client::new()
            });
        Self {
            api_key,
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }
}

/// Build the JSON body for `/chat/completions`.
pub fn request_body(request: &ChatRequest) -> serde_json::Value {
    serde_json::json!({
        "model": request.model,
        "messages": request.messages,
        "max_tokens": request.max_tokens,
        "temperature": request.temperature,
    })
}

/// Map a non-success HTTP status to the error taxonomy.
pub fn error_for_status(status: reqwest::StatusCode, body: &str) -> ChatError {
    let message = format!("HTTP {}: {}", status, body);
    match status {
        reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
            ChatError::AuthenticationFailure { message }
        }
        reqwest::StatusCode::TOO_MANY_REQUESTS => ChatError::RateLimited { message },
        _ => ChatError::TransientApi { message },
    }
}

/// Pull the reply text and model echo out of a response body.
pub fn parse_response(
    resp: &serde_json::Value,
    requested_model: &str,
) -> Result<ChatResponse, ChatError> {
    let content = resp["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| ChatError::other("response contained no message content"))?
        .to_string();
    let model = resp["model"]
        .as_str()
        .unwrap_or(requested_model)
        .to_string();
    Ok(ChatResponse { content, model })
}

#[async_trait]
impl CompletionProvider for OpenAIProvider {
    fn id(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, ChatError> {
        let body = request_body(&request);
        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() || e.is_connect() {
                    ChatError::TransientApi {
                        message: e.to_string(),
                    }
                } else {
                    ChatError::other(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(error_for_status(status, &error_body));
        }

        let resp: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ChatError::other(format!("Failed to parse response: {}", e)))?;

        parse_response(&resp, &request.model)
    }
}
