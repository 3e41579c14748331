//! A minimal chat service backed by Google Gemini.
//!
//! The [`web`] module serves `POST /api/chat`, which validates a message,
//! forwards it to a [`TextGenerator`] and returns the complete reply. The
//! [`view`] module is the client side: a conversation log that reveals each
//! reply one character at a time.

pub mod accumulator;
pub mod api;
pub mod config;
pub mod error;
pub mod factory;
pub mod generator;
pub mod providers;
pub mod sse_stream;
pub mod state;
pub mod types;
pub mod view;
pub mod web;

// Re-export core types for easy usage
pub use accumulator::{Generation, GenerationAccumulator};
pub use api::{ChatRequest, ChatResponse};
pub use config::Config;
pub use error::Error;
pub use factory::{GeneratorFactory, ProviderConfig, ProviderType};
pub use generator::TextGenerator;
pub use providers::GeminiProvider;
pub use sse_stream::SseEvent;
pub use state::AppState;
pub use types::*;
