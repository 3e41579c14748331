//! The view's side of the HTTP contract.

use crate::api::{ChatRequest, ChatResponse, CHAT_PATH};
use reqwest::Client;
use std::time::Duration;

/// How long the view waits for a reply before the turn fails.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Why a chat turn failed, as shown to the user.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request never produced a response.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// The endpoint answered with something that is not a chat response.
    #[error("Invalid response: {0}")]
    Decode(String),
}

/// Sends one message and yields the complete reply.
#[async_trait::async_trait]
pub trait ChatClient: Send + Sync + 'static {
    async fn send(&self, message: &str) -> Result<String, ClientError>;
}

/// [`ChatClient`] posting to a running chat endpoint.
#[derive(Debug, Clone)]
pub struct HttpChatClient {
    client: Client,
    url: String,
}

impl HttpChatClient {
    /// `base_url` is the server origin, e.g. `http://127.0.0.1:3000`.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: format!("{}{}", base_url.trim_end_matches('/'), CHAT_PATH),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait::async_trait]
impl ChatClient for HttpChatClient {
    async fn send(&self, message: &str) -> Result<String, ClientError> {
        let response = self
            .client
            .post(&self.url)
            .json(&ChatRequest::new(message))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let decoded = serde_json::from_str::<ChatResponse>(&body);

        match (status.is_success(), decoded) {
            (true, Ok(ChatResponse::Reply { response })) => Ok(response),
            (true, Ok(ChatResponse::Failure { error })) => Err(ClientError::Status {
                status: status.as_u16(),
                message: error,
            }),
            (true, Err(e)) => Err(ClientError::Decode(e.to_string())),
            (false, Ok(ChatResponse::Failure { error })) => Err(ClientError::Status {
                status: status.as_u16(),
                message: error,
            }),
            (false, _) => Err(ClientError::Status {
                status: status.as_u16(),
                message: format!("HTTP {status}"),
            }),
        }
    }
}
