//! Google Gemini backend for the AI data tools.
//!
//! Implements [`aitools_core::ModelService`] over the Gemini REST API using a
//! blocking HTTP client.

pub mod chat;
pub mod client;
mod wire;

pub use chat::GeminiChat;
pub use client::GeminiClient;
