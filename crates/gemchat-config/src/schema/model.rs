//! Model and API endpoint configuration types.

use serde::{Deserialize, Serialize};

/// Which model to talk to and how it should generate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub name: String,
    pub system_instruction: Option<String>,
    /// Valid range: 0.0-2.0. Unset leaves the model's default.
    pub temperature: Option<f64>,
    pub max_output_tokens: Option<u32>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: "gemini-2.5-flash".into(),
            system_instruction: None,
            temperature: None,
            max_output_tokens: None,
        }
    }
}

/// Generative Language API endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub connect_timeout_secs: u32,
    pub request_timeout_secs: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta/models".into(),
            connect_timeout_secs: 10,
            request_timeout_secs: 120,
        }
    }
}
