//! Client-side chat view: conversation log, input handling and the
//! typewriter reveal of replies.

pub mod client;
pub mod input;
pub mod message;
pub mod reveal;
pub mod session;
pub mod state;
pub mod timer;

pub use client::{ChatClient, ClientError, HttpChatClient, DEFAULT_REQUEST_TIMEOUT};
pub use input::{Key, KeyPress, Modifiers};
pub use message::{ChatMessage, ConversationLog, Role, ERROR_MARKER};
pub use reveal::Reveal;
pub use session::{ChatEvent, ChatSession};
pub use state::{ChatView, ViewState};
pub use timer::{RevealHandle, RevealTimer, DEFAULT_TICK, MIN_TICK};
