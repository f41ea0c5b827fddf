// ABOUTME: The TextProvider trait and the OpenAI-compatible chat-completions adapter.
// ABOUTME: Both Groq and OpenRouter speak this wire format; the gateway treats them uniformly.

use async_trait::async_trait;
use serde_json::{Value, json};
use thiserror::Error;

use crate::config::ProviderConfig;

/// A single provider invocation: optional system instructions, the user
/// prompt, and sampling bounds. Built by the prompt registry, never ad hoc.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: Option<String>,
    pub user: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl CompletionRequest {
    pub fn new(user: impl Into<String>, max_tokens: u32, temperature: f32) -> Self {
        Self {
            system: None,
            user: user.into(),
            max_tokens,
            temperature,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}

/// Failures a single provider attempt can produce. The gateway decides
/// whether to retry, fall back, or surface them.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request timed out")]
    Timeout,

    #[error("rate limited")]
    RateLimited,

    #[error("transport failure: {0}")]
    Transport(String),
}

/// Trait all text-generation providers implement. One method, one attempt;
/// retry and fallback policy live in the gateway, not here.
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Issue one completion attempt and return the raw output text.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError>;

    /// Provider name for logging and result attribution (e.g. "groq").
    fn name(&self) -> &str;
}

/// Adapter for OpenAI-compatible `/chat/completions` endpoints.
pub struct ChatCompletionsProvider {
    client: reqwest::Client,
    name: String,
    endpoint: String,
    api_key: String,
    model: String,
    extra_headers: Vec<(String, String)>,
}

impl ChatCompletionsProvider {
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            name: config.name.clone(),
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            extra_headers: config.extra_headers.clone(),
        }
    }

    /// Build the JSON request body for the chat-completions API.
    pub fn build_request_body(&self, request: &CompletionRequest) -> Value {
        let mut messages = Vec::new();
        if let Some(system) = &request.system {
            messages.push(json!({"role": "system", "content": system}));
        }
        messages.push(json!({"role": "user", "content": request.user}));

        json!({
            "model": self.model,
            "messages": messages,
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
        })
    }

    /// Pull the assistant text out of a chat-completions response body.
    pub fn parse_response(body: &Value) -> Result<String, ProviderError> {
        let text = body
            .get("choices")
            .and_then(|c| c.as_array())
            .and_then(|c| c.first())
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|t| t.as_str())
            .map(str::trim)
            .unwrap_or_default();

        if text.is_empty() {
            return Err(ProviderError::Transport("empty completion".to_string()));
        }
        Ok(text.to_string())
    }
}

#[async_trait]
impl TextProvider for ChatCompletionsProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        let body = self.build_request_body(request);

        let mut http_request = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json");
        for (name, value) in &self.extra_headers {
            http_request = http_request.header(name, value);
        }

        let response = http_request.json(&body).send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout
            } else {
                ProviderError::Transport(format!("HTTP request failed: {e}"))
            }
        })?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited);
        }

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Transport(format!(
                "API error {status}: {error_body}"
            )));
        }

        let response_body: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::Transport(format!("failed to parse JSON: {e}")))?;

        Self::parse_response(&response_body)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
