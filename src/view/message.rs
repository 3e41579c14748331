use serde::{Deserialize, Serialize};

/// Prefix of assistant messages that report a failed turn.
pub const ERROR_MARKER: &str = "❌ Error: ";

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One entry of the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }

    /// An assistant message reporting a failed turn.
    pub fn error(detail: impl std::fmt::Display) -> Self {
        Self::assistant(format!("{ERROR_MARKER}{detail}"))
    }

    pub fn is_error(&self) -> bool {
        self.role == Role::Assistant && self.text.starts_with(ERROR_MARKER)
    }
}

/// The session's conversation, oldest first.
///
/// Messages are only ever appended. The one exception is the last
/// message's text, which grows while a reply is being revealed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationLog {
    messages: Vec<ChatMessage>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message and return its index.
    pub fn push(&mut self, message: ChatMessage) -> usize {
        self.messages.push(message);
        self.messages.len() - 1
    }

    /// Grow the text of the last message. No-op on an empty log.
    pub(crate) fn extend_last(&mut self, text: &str) {
        if let Some(last) = self.messages.last_mut() {
            last.text.push_str(text);
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
