//! Wire types shared by the chat endpoint and its clients.

use serde::{Deserialize, Serialize};

/// Path of the chat endpoint.
pub const CHAT_PATH: &str = "/api/chat";

/// Error payload for blank or malformed input.
pub const INVALID_QUERY_MESSAGE: &str = "Please enter a valid query";

/// Error payload for any generation failure. Deliberately generic.
pub const GENERATION_FAILED_MESSAGE: &str = "Something went wrong. Please try again.";

/// `POST /api/chat` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The message with surrounding whitespace removed, or `None` when
    /// nothing is left.
    pub fn prompt(&self) -> Option<&str> {
        let trimmed = self.message.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

/// `POST /api/chat` response body: exactly one of `response` or `error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatResponse {
    Reply { response: String },
    Failure { error: String },
}

impl ChatResponse {
    pub fn reply(text: impl Into<String>) -> Self {
        ChatResponse::Reply {
            response: text.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        ChatResponse::Failure {
            error: message.into(),
        }
    }
}
