//! Google Gemini API client.
//!
//! Implements `GenerationClient` against the Generative Language API
//! `generateContent` method.

mod api;
mod client;
mod config;

pub use client::GeminiClient;
pub use config::GeminiConfig;
