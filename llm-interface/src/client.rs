//! Wire contract and HTTP transport for the external chat endpoint.

use async_trait::async_trait;
use listenboard_core::{ChatConfig, ChatError, CoreError};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub user_prompt: String,
    pub user_task: String,
    /// Always sent as `null`; the endpoint does not receive dashboard filters.
    pub filters: Option<Value>,
}

impl ChatRequest {
    pub fn new(prompt: &str, task_label: &str) -> Self {
        Self {
            user_prompt: prompt.to_string(),
            user_task: task_label.to_string(),
            filters: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatReply {
    /// `response`, falling back to `content`. Empty strings count as missing.
    pub fn text(&self) -> Option<&str> {
        self.response
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.content.as_deref().filter(|s| !s.is_empty()))
    }
}

#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, CoreError>;
}

#[derive(Debug, Clone)]
pub struct HttpChatTransport {
    http_client: Client,
    endpoint: String,
}

impl HttpChatTransport {
    pub fn new(config: &ChatConfig) -> Result<Self, CoreError> {
        let http_client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            http_client,
            endpoint: config.chat_endpoint(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ChatTransport for HttpChatTransport {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, CoreError> {
        info!("Posting chat request to {}", self.endpoint);

        let response = self
            .http_client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!("Network error for POST {}: {}", self.endpoint, e);
                if e.is_timeout() {
                    CoreError::Chat(ChatError::RequestTimeout)
                } else if e.is_connect() {
                    CoreError::Chat(ChatError::EndpointUnavailable {
                        endpoint: self.endpoint.clone(),
                    })
                } else {
                    CoreError::Network(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            error!("Chat request failed with status: {}", status);
            return Err(ChatError::ServerError {
                status_code: status.as_u16(),
            }
            .into());
        }

        let reply: ChatReply = response.json().await.map_err(|e| {
            error!("Failed to parse chat reply: {}", e);
            CoreError::Chat(ChatError::InvalidResponseFormat {
                details: e.to_string(),
            })
        })?;

        debug!(
            "Chat reply received ({} chars)",
            reply.text().map_or(0, str::len)
        );
        Ok(reply)
    }
}
