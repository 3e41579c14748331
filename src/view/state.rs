//! The chat view state machine.

use super::client::ClientError;
use super::input::{InputAction, KeyPress};
use super::message::{ChatMessage, ConversationLog};
use super::reveal::Reveal;
use crate::api::ChatRequest;

/// Where the session is in a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// Waiting for the user.
    Idle,
    /// A request is in flight; submission is disabled.
    Sending,
    /// The last assistant message is being revealed.
    Revealing,
}

/// Conversation log, input box and turn state of one chat session.
///
/// The view performs no I/O. [`ChatView::submit`] hands back the request
/// to send and [`ChatView::receive`] takes its outcome, so the caller
/// decides how requests and ticks are scheduled.
#[derive(Debug, Clone)]
pub struct ChatView {
    log: ConversationLog,
    input: String,
    state: ViewState,
    reveal: Option<Reveal>,
    scroll_request: Option<usize>,
}

impl Default for ChatView {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatView {
    pub fn new() -> Self {
        Self {
            log: ConversationLog::new(),
            input: String::new(),
            state: ViewState::Idle,
            reveal: None,
            scroll_request: None,
        }
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        self.state != ViewState::Sending && !self.input.trim().is_empty()
    }

    /// Apply a key press to the input box. Returns the request to send when
    /// the press submitted.
    pub fn handle_key(&mut self, press: KeyPress) -> Option<ChatRequest> {
        match InputAction::from(press) {
            InputAction::Submit => self.submit(),
            InputAction::Insert(c) => {
                self.input.push(c);
                None
            }
            InputAction::DeleteBack => {
                self.input.pop();
                None
            }
        }
    }

    /// Submit the current input.
    ///
    /// No-op while a request is in flight or the input is blank. Submitting
    /// during a reveal shows the rest of that reply at once, keeping a
    /// single message in progress.
    pub fn submit(&mut self) -> Option<ChatRequest> {
        if !self.can_submit() {
            return None;
        }
        if self.state == ViewState::Revealing {
            self.finish_reveal();
        }

        let message = self.input.trim().to_string();
        self.input.clear();
        self.push(ChatMessage::user(message.clone()));
        self.state = ViewState::Sending;

        tracing::debug!(chars = message.chars().count(), "submitting message");
        Some(ChatRequest::new(message))
    }

    /// Take the outcome of the request returned by [`ChatView::submit`].
    pub fn receive(&mut self, outcome: Result<String, ClientError>) {
        if self.state != ViewState::Sending {
            tracing::warn!(state = ?self.state, "ignoring reply without a request in flight");
            return;
        }

        match outcome {
            Ok(text) => {
                self.push(ChatMessage::assistant(""));
                let reveal = Reveal::new(text);
                if reveal.is_complete() {
                    self.state = ViewState::Idle;
                } else {
                    self.reveal = Some(reveal);
                    self.state = ViewState::Revealing;
                }
            }
            Err(error) => {
                tracing::warn!(%error, "chat turn failed");
                self.push(ChatMessage::error(&error));
                self.state = ViewState::Idle;
            }
        }
    }

    /// Reveal one more character. Returns whether the reveal continues.
    pub fn tick(&mut self) -> bool {
        let Some(reveal) = self.reveal.as_mut() else {
            return false;
        };

        if let Some(c) = reveal.advance() {
            let mut buf = [0u8; 4];
            self.log.extend_last(c.encode_utf8(&mut buf));
            self.scroll_request = Some(self.log.len() - 1);
        }

        if reveal.is_complete() {
            self.reveal = None;
            self.state = ViewState::Idle;
            return false;
        }
        true
    }

    /// Show the rest of the reply being revealed, if any.
    pub fn finish_reveal(&mut self) {
        if let Some(mut reveal) = self.reveal.take() {
            let rest = reveal.finish();
            if !rest.is_empty() {
                self.log.extend_last(rest);
                self.scroll_request = Some(self.log.len() - 1);
            }
            self.state = ViewState::Idle;
        }
    }

    /// The index to scroll into view, if the log changed since the last call.
    pub fn take_scroll_request(&mut self) -> Option<usize> {
        self.scroll_request.take()
    }

    fn push(&mut self, message: ChatMessage) {
        let index = self.log.push(message);
        self.scroll_request = Some(index);
    }
}
