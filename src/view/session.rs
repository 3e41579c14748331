//! Event loop glue between a [`ChatView`], a [`ChatClient`] and the reveal timer.

use super::client::{ChatClient, ClientError};
use super::input::KeyPress;
use super::state::{ChatView, ViewState};
use super::timer::RevealTimer;
use crate::api::ChatRequest;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Inputs to a chat session.
#[derive(Debug)]
pub enum ChatEvent {
    /// A key pressed in the input box.
    Key(KeyPress),
    /// Replace the input with a whole line and submit it.
    Submit(String),
    /// The outcome of the in-flight request.
    Reply(Result<String, ClientError>),
    /// The reveal timer fired for the given reveal.
    Tick(u64),
}

/// A single-owner chat session.
///
/// Requests and timer ticks run as tokio tasks and report back through one
/// channel, so every state change happens in [`ChatSession::handle`].
pub struct ChatSession {
    view: ChatView,
    client: Arc<dyn ChatClient>,
    timer: RevealTimer,
    tick_period: Duration,
    // Bumped on every reveal start so ticks queued by an older timer are dropped
    reveal_id: u64,
    tx: mpsc::UnboundedSender<ChatEvent>,
    rx: mpsc::UnboundedReceiver<ChatEvent>,
}

impl ChatSession {
    pub fn new(client: Arc<dyn ChatClient>, tick_period: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            view: ChatView::new(),
            client,
            timer: RevealTimer::new(),
            tick_period,
            reveal_id: 0,
            tx,
            rx,
        }
    }

    pub fn view(&self) -> &ChatView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ChatView {
        &mut self.view
    }

    /// Sender for feeding events from outside the session.
    pub fn sender(&self) -> mpsc::UnboundedSender<ChatEvent> {
        self.tx.clone()
    }

    /// Wait for the next event. The session keeps a sender alive, so this
    /// only returns `None` if the channel is closed explicitly.
    pub async fn next_event(&mut self) -> Option<ChatEvent> {
        self.rx.recv().await
    }

    pub fn handle(&mut self, event: ChatEvent) {
        match event {
            ChatEvent::Key(press) => {
                if let Some(request) = self.view.handle_key(press) {
                    self.dispatch(request);
                }
            }
            ChatEvent::Submit(line) => {
                self.view.set_input(line);
                if let Some(request) = self.view.submit() {
                    self.dispatch(request);
                }
            }
            ChatEvent::Reply(outcome) => {
                self.view.receive(outcome);
                if self.view.state() == ViewState::Revealing {
                    self.start_reveal();
                }
            }
            ChatEvent::Tick(id) => {
                if id != self.reveal_id {
                    return;
                }
                if !self.view.tick() {
                    self.timer.cancel();
                }
            }
        }
    }

    /// Handle events until the view is idle again.
    pub async fn settle(&mut self) {
        while self.view.state() != ViewState::Idle {
            match self.next_event().await {
                Some(event) => self.handle(event),
                None => break,
            }
        }
    }

    fn dispatch(&mut self, request: ChatRequest) {
        // Any reveal still running was flushed by the submit
        self.timer.cancel();
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = client.send(&request.message).await;
            // The session may be gone by now; nothing to deliver to then
            let _ = tx.send(ChatEvent::Reply(outcome));
        });
    }

    fn start_reveal(&mut self) {
        if self.tick_period.is_zero() {
            self.view.finish_reveal();
            return;
        }
        self.reveal_id += 1;
        let id = self.reveal_id;
        let tx = self.tx.clone();
        self.timer.start(self.tick_period, move || {
            if tx.send(ChatEvent::Tick(id)).is_ok() {
                ControlFlow::Continue(())
            } else {
                ControlFlow::Break(())
            }
        });
    }
}
