//! Google Gemini, via the Generative Language API or Vertex AI.

pub mod client;
pub mod types;

pub use client::{GeminiProvider, VertexAuth};
