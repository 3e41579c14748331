//! HTTP surface: the chat endpoint and a health check.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;

pub use error::ChatError;
pub use server::{create_app, serve};
