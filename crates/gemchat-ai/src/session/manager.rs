//! Session struct and conversation state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use gemchat_common::{EventBus, InlineAsset, Message, SessionEvent};
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::credentials::Credentials;
use crate::ChatError;

pub(super) struct SessionState {
    /// Conversation log. Append-only.
    pub(super) log: Vec<Message>,
    /// Attachment waiting for the next submit.
    pub(super) pending: Option<InlineAsset>,
    pub(super) model: String,
    pub(super) credentials: Credentials,
}

/// A conversation with one remote model.
///
/// All methods take `&self`; the state lock is never held across an await.
pub struct Session {
    pub(super) state: Mutex<SessionState>,
    /// Whether a request is currently in flight.
    pub(super) busy: AtomicBool,
    pub(super) events: EventBus,
}

impl Session {
    pub fn new(model: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            state: Mutex::new(SessionState {
                log: Vec::new(),
                pending: None,
                model: model.into(),
                credentials,
            }),
            busy: AtomicBool::new(false),
            events: EventBus::default(),
        }
    }

    /// Seed the log with a model-role greeting. Empty text adds nothing.
    pub fn with_greeting(mut self, greeting: &str) -> Self {
        let greeting = greeting.trim();
        if !greeting.is_empty() {
            self.state
                .get_mut()
                .unwrap_or_else(PoisonError::into_inner)
                .log
                .push(Message::model_text(greeting));
        }
        self
    }

    pub(super) fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append to the log and notify subscribers.
    pub(super) fn append(&self, message: Message) {
        let index = {
            let mut state = self.lock();
            state.log.push(message.clone());
            state.log.len() - 1
        };
        self.events
            .publish(SessionEvent::MessageAppended { index, message });
    }

    /// Publish a failure for the presentation layer and hand it back.
    pub(super) fn report(&self, err: ChatError) -> ChatError {
        if err != ChatError::Busy {
            self.events.publish(SessionEvent::Error(err.to_string()));
        }
        err
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Snapshot of the conversation log.
    pub fn log(&self) -> Vec<Message> {
        self.lock().log.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().log.is_empty()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn model(&self) -> String {
        self.lock().model.clone()
    }

    pub fn set_model(&self, model: &str) -> Result<(), ChatError> {
        let model = model.trim();
        if model.is_empty() {
            return Err(ChatError::Validation("model name must not be empty".into()));
        }
        if model.chars().any(char::is_whitespace) {
            return Err(ChatError::Validation(format!(
                "model name '{model}' must not contain whitespace"
            )));
        }
        self.lock().model = model.to_string();
        info!(model, "model changed");
        self.events
            .publish(SessionEvent::ModelChanged(model.to_string()));
        Ok(())
    }

    /// Select the attachment for the next submit, replacing any previous one.
    pub fn attach(&self, asset: InlineAsset) {
        let mime_type = asset.mime_type.clone();
        self.lock().pending = Some(asset);
        self.events.publish(SessionEvent::AttachmentChanged {
            mime_type: Some(mime_type),
        });
    }

    pub fn clear_attachment(&self) {
        if self.lock().pending.take().is_some() {
            self.events
                .publish(SessionEvent::AttachmentChanged { mime_type: None });
        }
    }

    pub fn pending_attachment(&self) -> Option<InlineAsset> {
        self.lock().pending.clone()
    }

    pub fn has_credential(&self) -> bool {
        self.lock().credentials.is_configured()
    }

    pub fn remembers_credential(&self) -> bool {
        self.lock().credentials.remembers()
    }

    pub fn set_credential(&self, key: &str) -> Result<(), ChatError> {
        self.update_credentials(|c| c.set_key(key))
    }

    pub fn clear_credential(&self) -> Result<(), ChatError> {
        self.update_credentials(|c| c.clear())
    }

    pub fn set_remember(&self, remember: bool) -> Result<(), ChatError> {
        self.update_credentials(|c| c.set_remember(remember))
    }

    fn update_credentials(
        &self,
        f: impl FnOnce(&mut Credentials) -> Result<(), gemchat_common::PlatformError>,
    ) -> Result<(), ChatError> {
        let (result, configured, remembered) = {
            let mut state = self.lock();
            let result = f(&mut state.credentials);
            (
                result,
                state.credentials.is_configured(),
                state.credentials.remembers(),
            )
        };
        self.events.publish(SessionEvent::CredentialChanged {
            configured,
            remembered,
        });
        result.map_err(|e| {
            warn!(error = %e, "failed to update stored API key");
            self.report(ChatError::Credential(format!(
                "failed to update stored API key: {e}"
            )))
        })
    }
}
