//! Conversation engine for gemchat.
//!
//! Provides:
//! - the `GenerationClient` seam and its Gemini implementation
//! - inline asset loading (file or data URL to base64 payload)
//! - API key storage with an optional durable mirror
//! - `Session`, the append-only conversation log with a single
//!   in-flight request guard

pub mod assets;
pub mod credentials;
pub mod gemini;
pub mod session;

use async_trait::async_trait;
use serde::Serialize;

pub use credentials::{Credentials, FileKeyStore, KeyStore, MemoryKeyStore};
pub use gemchat_common::{InlineAsset, Message, Part, Role};
pub use gemini::{GeminiClient, GeminiConfig};
pub use session::{compose_user_turn, Session};

/// Reply text used when the model answers without any text part.
pub const NO_CONTENT_PLACEHOLDER: &str = "[No content]";

/// A remote generation endpoint.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(
        &self,
        api_key: &str,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, ChatError>;
}

/// Model identifier plus the full message history.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub model: String,
    pub contents: Vec<Message>,
}

#[derive(Debug, Clone, Default)]
pub struct GenerateResponse {
    /// `None` when the candidate carried no text.
    pub text: Option<String>,
    pub usage: TokenUsage,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

/// Every failure is terminal for the current attempt only.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChatError {
    /// Nothing to send.
    #[error("{0}")]
    Validation(String),
    /// Missing, rejected, or unpersistable API key.
    #[error("{0}")]
    Credential(String),
    /// Network or endpoint failure, message passed through as received.
    #[error("{0}")]
    Transport(String),
    /// The attachment could not be turned into an inline payload.
    #[error("attachment error: {0}")]
    Asset(String),
    /// Another request is still in flight; nothing was changed.
    #[error("a request is already in flight")]
    Busy,
}
