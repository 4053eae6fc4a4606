// src/services/ai.rs

use std::{fmt, sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::Client;

use crate::config::Config;

/// Failure talking to the upstream model. Never surfaces to an end user:
/// callers convert it to a fixed fallback value.
#[derive(Debug)]
pub struct UpstreamError(pub String);

impl fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "upstream error: {}", self.0)
    }
}

impl std::error::Error for UpstreamError {}

/// One chat-completion exchange.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
}

/// Transport seam for the upstream LLM. Object-safe so the app state can
/// hold a stub in tests.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Returns the assistant message content of a single completion.
    /// One call, no retry.
    async fn complete(&self, req: ChatRequest) -> Result<String, UpstreamError>;
}

pub type DynChatModel = Arc<dyn ChatModel>;

/// Chat-completion client for the Groq OpenAI-compatible endpoint.
#[derive(Clone)]
pub struct GroqClient {
    client: Client,
    api_key: String,
    api_url: String,
    model: String,
}

impl GroqClient {
    pub fn new(config: &Config) -> Result<Self, UpstreamError> {
        // A slow upstream must stall only this call, never the whole request
        // forever.
        let client = Client::builder()
            .timeout(Duration::from_secs(config.upstream_timeout_secs))
            .build()
            .map_err(|e| UpstreamError(e.to_string()))?;

        Ok(Self {
            client,
            api_key: config.groq_api_key.clone(),
            api_url: config.groq_api_url.clone(),
            model: config.groq_model.clone(),
        })
    }
}

#[async_trait]
impl ChatModel for GroqClient {
    async fn complete(&self, req: ChatRequest) -> Result<String, UpstreamError> {
        let mut payload = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": req.system},
                {"role": "user", "content": req.user}
            ],
            "temperature": req.temperature,
        });
        if let Some(max_tokens) = req.max_tokens {
            payload["max_tokens"] = max_tokens.into();
        }

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| UpstreamError(e.to_string()))?
            .error_for_status()
            .map_err(|e| UpstreamError(e.to_string()))?;

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| UpstreamError(e.to_string()))?;

        let content = body
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .ok_or_else(|| UpstreamError("no completion content in response".to_string()))?;

        Ok(content.trim().to_string())
    }
}
