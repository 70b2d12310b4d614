//! Async exchange methods for Session.

use std::path::Path;

use gemchat_common::{Message, SessionEvent};
use tracing::{debug, warn};

use crate::{assets, ChatError, GenerateRequest, GenerationClient, NO_CONTENT_PLACEHOLDER};

use super::manager::Session;
use super::types::{compose_user_turn, BusyGuard};

impl Session {
    /// Send one composed user turn and append the model's reply.
    ///
    /// The user turn is appended before the request goes out. On failure no
    /// reply is appended and the error is returned as received. A call made
    /// while another is in flight returns `Busy` without touching anything.
    pub async fn send_turn(
        &self,
        client: &dyn GenerationClient,
        message: Message,
    ) -> Result<Message, ChatError> {
        let mut guard = BusyGuard::acquire(&self.busy, &self.events)?;

        let (api_key, model) = {
            let state = self.lock();
            if !state.credentials.is_configured() {
                drop(state);
                return Err(self.report(missing_key()));
            }
            (
                state.credentials.key().to_string(),
                state.model.clone(),
            )
        };

        guard.announce();
        self.append(message);

        let request = GenerateRequest {
            model,
            contents: self.log(),
        };
        debug!(model = %request.model, turns = request.contents.len(), "sending turn");

        match client.generate(&api_key, &request).await {
            Ok(response) => {
                let text = response
                    .text
                    .unwrap_or_else(|| NO_CONTENT_PLACEHOLDER.to_string());
                let reply = Message::model_text(text);
                self.append(reply.clone());
                Ok(reply)
            }
            Err(e) => {
                warn!(error = %e, "generation failed");
                Err(self.report(e))
            }
        }
    }

    /// Compose a turn from `text` and the pending attachment, then send it.
    ///
    /// Checks, in order: something to send, nothing in flight, an API key.
    /// The pending attachment is consumed only once those pass and the turn
    /// has been composed.
    pub async fn submit(
        &self,
        client: &dyn GenerationClient,
        text: Option<&str>,
    ) -> Result<Message, ChatError> {
        let has_text = text.is_some_and(|t| !t.trim().is_empty());
        if !has_text && self.lock().pending.is_none() {
            return Err(ChatError::Validation(
                "nothing to send: type a message or attach a file".into(),
            ));
        }
        if self.is_busy() {
            return Err(ChatError::Busy);
        }
        if !self.has_credential() {
            return Err(self.report(missing_key()));
        }

        let message = compose_user_turn(text, self.pending_attachment())?;
        if self.lock().pending.take().is_some() {
            self.events
                .publish(SessionEvent::AttachmentChanged { mime_type: None });
        }
        self.send_turn(client, message).await
    }

    /// Read a file and make it the pending attachment. On failure the
    /// previous attachment, if any, is kept.
    pub async fn attach_file(&self, path: &Path, max_bytes: u64) -> Result<(), ChatError> {
        match assets::read_file(path, max_bytes).await {
            Ok(asset) => {
                self.attach(asset);
                Ok(())
            }
            Err(e) => Err(self.report(e)),
        }
    }
}

fn missing_key() -> ChatError {
    ChatError::Credential("enter a valid Gemini API key first".into())
}
