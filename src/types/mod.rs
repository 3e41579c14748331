//! Core types shared by providers.

pub mod streaming;

pub use streaming::*;
