//! GenerationClient implementation for GeminiClient.

use async_trait::async_trait;
use tracing::debug;

use crate::{ChatError, GenerateRequest, GenerateResponse, GenerationClient};

use super::client::{error_from_status, GeminiClient};

#[async_trait]
impl GenerationClient for GeminiClient {
    async fn generate(
        &self,
        api_key: &str,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, ChatError> {
        let body = self.build_request_body(&request.contents);
        let url = self.api_url(&request.model);

        debug!(
            model = %request.model,
            turns = request.contents.len(),
            "Gemini API request"
        );

        let response = self
            .http
            .post(&url)
            .header("content-type", "application/json")
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ChatError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(error_from_status(status, &text));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ChatError::Transport(format!("malformed response: {e}")))?;

        let parsed = self.parse_response(&json);
        debug!(
            input_tokens = parsed.usage.input_tokens,
            output_tokens = parsed.usage.output_tokens,
            total_tokens = parsed.usage.total_tokens(),
            "Gemini API response"
        );
        Ok(parsed)
    }
}
