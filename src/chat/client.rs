use super::messages::{ChatRequest, ChatResponse, TagsResponse};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ChatError {
    /// Nothing listening, DNS failure, refused connection
    #[error("chat engine unreachable at {base_url}: {reason}")]
    Unreachable { base_url: String, reason: String },

    #[error("chat engine timed out after {0:?}")]
    Timeout(Duration),

    #[error("chat engine returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid chat engine response: {0}")]
    Decode(String),

    /// Connection established but the exchange broke off
    #[error("chat engine request failed: {0}")]
    Transport(String),
}

/// Chat-completion engine contract
#[async_trait]
pub trait ChatEngine: Send + Sync {
    /// Base URL, for diagnostics
    fn base_url(&self) -> &str;

    /// Single non-streaming completion
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ChatError>;

    /// Names of the models the engine has available
    async fn list_models(&self) -> Result<Vec<String>, ChatError>;
}

/// Ollama HTTP client (`/api/chat`, `/api/tags`)
#[derive(Clone)]
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    chat_timeout: Duration,
    discovery_timeout: Duration,
}

impl OllamaClient {
    pub fn new(base_url: &str, chat_timeout: Duration, discovery_timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("Failed to build Ollama HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            chat_timeout,
            discovery_timeout,
        })
    }

    fn classify(&self, err: reqwest::Error, timeout: Duration) -> ChatError {
        if err.is_timeout() {
            ChatError::Timeout(timeout)
        } else if err.is_connect() || err.is_builder() {
            ChatError::Unreachable {
                base_url: self.base_url.clone(),
                reason: err.to_string(),
            }
        } else if err.is_decode() {
            ChatError::Decode(err.to_string())
        } else {
            ChatError::Transport(err.to_string())
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ChatError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ChatError::Status {
            status: status.as_u16(),
            body: body.trim().to_string(),
        })
    }
}

#[async_trait]
impl ChatEngine for OllamaClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ChatError> {
        let url = format!("{}/api/chat", self.base_url);
        debug!("POST {} (model={})", url, request.model);

        let response = self
            .client
            .post(&url)
            .timeout(self.chat_timeout)
            .json(request)
            .send()
            .await
            .map_err(|e| self.classify(e, self.chat_timeout))?;

        let response = Self::check_status(response).await?;
        response
            .json::<ChatResponse>()
            .await
            .map_err(|e| self.classify(e, self.chat_timeout))
    }

    async fn list_models(&self) -> Result<Vec<String>, ChatError> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self
            .client
            .get(&url)
            .timeout(self.discovery_timeout)
            .send()
            .await
            .map_err(|e| self.classify(e, self.discovery_timeout))?;

        let response = Self::check_status(response).await.map_err(|e| {
            warn!("Ollama model listing failed: {}", e);
            e
        })?;

        let tags = response
            .json::<TagsResponse>()
            .await
            .map_err(|e| self.classify(e, self.discovery_timeout))?;
        Ok(tags.names())
    }
}
