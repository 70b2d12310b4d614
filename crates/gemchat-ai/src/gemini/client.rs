//! Gemini API client struct, request building, and response parsing.

use reqwest::StatusCode;

use crate::{ChatError, GenerateResponse, Message, TokenUsage};

use super::config::GeminiConfig;

/// Gemini API client.
pub struct GeminiClient {
    pub(crate) config: GeminiConfig,
    pub(crate) http: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, ChatError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ChatError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    /// `{base}/{model}:generateContent`. Accepts both `gemini-x` and
    /// `models/gemini-x` identifiers.
    pub(crate) fn api_url(&self, model: &str) -> String {
        let model = model.strip_prefix("models/").unwrap_or(model);
        format!(
            "{}/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            model
        )
    }

    /// Build the JSON request body for the Gemini API.
    pub(crate) fn build_request_body(&self, contents: &[Message]) -> serde_json::Value {
        let mut body = serde_json::json!({ "contents": contents });

        let mut generation = serde_json::Map::new();
        if let Some(t) = self.config.temperature {
            generation.insert("temperature".into(), t.into());
        }
        if let Some(n) = self.config.max_output_tokens {
            generation.insert("maxOutputTokens".into(), n.into());
        }
        if !generation.is_empty() {
            body["generationConfig"] = serde_json::Value::Object(generation);
        }

        if let Some(ref system) = self.config.system_instruction {
            body["systemInstruction"] = serde_json::json!({
                "parts": [{ "text": system }]
            });
        }

        body
    }

    /// Parse a Gemini response. The reply text is every non-thought text
    /// part of the first candidate, concatenated.
    pub(crate) fn parse_response(&self, json: &serde_json::Value) -> GenerateResponse {
        let parts = json["candidates"][0]["content"]["parts"]
            .as_array()
            .cloned()
            .unwrap_or_default();

        let mut content = String::new();
        let mut has_text = false;
        for part in &parts {
            if part["thought"].as_bool() == Some(true) {
                continue;
            }
            if let Some(text) = part["text"].as_str() {
                content.push_str(text);
                has_text = true;
            }
        }

        let usage = TokenUsage {
            input_tokens: json["usageMetadata"]["promptTokenCount"]
                .as_u64()
                .unwrap_or(0),
            output_tokens: json["usageMetadata"]["candidatesTokenCount"]
                .as_u64()
                .unwrap_or(0),
        };

        GenerateResponse {
            text: has_text.then_some(content),
            usage,
        }
    }
}

/// Map a non-success HTTP response to the error taxonomy, keeping the API's
/// own message.
pub(crate) fn error_from_status(status: StatusCode, body: &str) -> ChatError {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    let message = parsed
        .as_ref()
        .and_then(|v| v["error"]["message"].as_str())
        .map(str::to_string)
        .unwrap_or_else(|| {
            let excerpt: String = body.chars().take(200).collect();
            format!("HTTP {status}: {excerpt}")
        });
    let key_rejected = parsed.as_ref().is_some_and(|v| {
        v["error"]["details"]
            .as_array()
            .is_some_and(|d| d.iter().any(|x| x["reason"] == "API_KEY_INVALID"))
    });

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN || key_rejected {
        ChatError::Credential(message)
    } else {
        ChatError::Transport(message)
    }
}
