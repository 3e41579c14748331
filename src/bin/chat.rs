//! Terminal front end for the chat endpoint.
//!
//! Each line typed on stdin is one message; replies are typed out one
//! character at a time.

use anyhow::Result;
use gemini_chat::view::{
    ChatEvent, ChatSession, ChatView, HttpChatClient, Role, ViewState, DEFAULT_REQUEST_TIMEOUT,
    DEFAULT_TICK,
};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Prints assistant messages incrementally as the view reveals them.
#[derive(Default)]
struct Printer {
    // Index of the message being printed and how many chars of it are out
    message: usize,
    printed_chars: usize,
    prefix_printed: bool,
}

impl Printer {
    fn render(&mut self, view: &ChatView, out: &mut impl Write) -> std::io::Result<()> {
        let messages = view.log().messages();
        while self.message < messages.len() {
            let message = &messages[self.message];
            let is_last = self.message + 1 == messages.len();

            if message.role == Role::Assistant {
                if !self.prefix_printed {
                    write!(out, "gemini> ")?;
                    self.prefix_printed = true;
                }
                let new: String = message.text.chars().skip(self.printed_chars).collect();
                self.printed_chars += new.chars().count();
                write!(out, "{new}")?;
            }

            // The last message may still grow while it is revealed
            let growing = is_last && view.state() == ViewState::Revealing;
            if growing {
                break;
            }
            if message.role == Role::Assistant {
                writeln!(out)?;
            }
            self.message += 1;
            self.printed_chars = 0;
            self.prefix_printed = false;
        }
        out.flush()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gemini_chat=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let base_url = std::env::var("CHAT_URL").unwrap_or_else(|_| "http://127.0.0.1:3000".to_string());
    let tick = match std::env::var("REVEAL_INTERVAL_MS") {
        Ok(ms) => Duration::from_millis(ms.parse()?),
        Err(_) => DEFAULT_TICK,
    };
    let timeout = match std::env::var("CHAT_TIMEOUT_SECS") {
        Ok(secs) => Duration::from_secs(secs.parse()?),
        Err(_) => DEFAULT_REQUEST_TIMEOUT,
    };

    let client = Arc::new(HttpChatClient::with_timeout(&base_url, timeout)?);
    let mut session = ChatSession::new(client, tick);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut printer = Printer::default();
    let mut stdout = std::io::stdout();
    let mut stdin_open = true;

    println!("Chatting with {base_url}. Type a message and press Enter; Ctrl-D to quit.");

    loop {
        tokio::select! {
            line = lines.next_line(), if stdin_open => match line? {
                Some(line) => {
                    if session.view().state() == ViewState::Sending {
                        eprintln!("(still waiting for the previous reply)");
                    }
                    session.handle(ChatEvent::Submit(line));
                }
                None => stdin_open = false,
            },
            Some(event) = session.next_event() => session.handle(event),
        }

        printer.render(session.view(), &mut stdout)?;

        // Let an in-flight reply finish before exiting on end of input
        if !stdin_open && session.view().state() == ViewState::Idle {
            break;
        }
    }

    Ok(())
}
