//! Conversation, credential, and attachment configuration types.

use serde::{Deserialize, Serialize};

/// Conversation defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Model-role message seeded into every new log. Empty disables it.
    pub greeting: String,
    /// Prompt sent when the first input line is left empty.
    pub starter: String,
    /// Quick prompts offered by `/examples`.
    pub suggestions: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            greeting: "👋 Gemini helper here, let's chat!".into(),
            starter: "Hi! Chat with me!".into(),
            suggestions: vec![
                "Describe the attached image".into(),
                "Translate into Chinese: Hello!".into(),
                "Write a short poem".into(),
            ],
        }
    }
}

/// API key persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialConfig {
    /// Mirror the key into durable storage.
    pub remember: bool,
    /// Entry name in the key store.
    pub key_name: String,
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            remember: true,
            key_name: "gemini_api_key".into(),
        }
    }
}

/// Inline attachment limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AttachmentsConfig {
    /// Valid range: 1-20.
    pub max_file_size_mb: u32,
}

impl AttachmentsConfig {
    pub fn max_file_size_bytes(&self) -> u64 {
        u64::from(self.max_file_size_mb) * 1024 * 1024
    }
}

impl Default for AttachmentsConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 5,
        }
    }
}
