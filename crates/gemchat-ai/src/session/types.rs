//! Turn composition and the in-flight guard.

use std::sync::atomic::{AtomicBool, Ordering};

use gemchat_common::{EventBus, InlineAsset, Message, Part, Role, SessionEvent};

use crate::ChatError;

/// Build a user turn from typed text and an optional attachment.
///
/// The text is trimmed. At least one input must be non-empty; the asset
/// part comes first and the text part second.
pub fn compose_user_turn(
    text: Option<&str>,
    asset: Option<InlineAsset>,
) -> Result<Message, ChatError> {
    let text = text.map(str::trim).filter(|t| !t.is_empty());
    let asset = asset.filter(|a| !a.data.is_empty());

    if text.is_none() && asset.is_none() {
        return Err(ChatError::Validation(
            "nothing to send: type a message or attach a file".into(),
        ));
    }

    let mut parts = Vec::with_capacity(2);
    if let Some(asset) = asset {
        parts.push(Part::inline(asset));
    }
    if let Some(text) = text {
        parts.push(Part::text(text));
    }
    Ok(Message::new(Role::User, parts))
}

/// Guard that clears the in-flight flag on drop, so it is released on
/// success, error, early return and cancellation alike.
pub(crate) struct BusyGuard<'a> {
    flag: &'a AtomicBool,
    events: &'a EventBus,
    announced: bool,
}

impl<'a> BusyGuard<'a> {
    /// Attempt to take the flag. Returns `Busy` if a request is in flight.
    pub(crate) fn acquire(flag: &'a AtomicBool, events: &'a EventBus) -> Result<Self, ChatError> {
        if flag
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            return Err(ChatError::Busy);
        }
        Ok(Self {
            flag,
            events,
            announced: false,
        })
    }

    /// Tell subscribers the request is really going out.
    pub(crate) fn announce(&mut self) {
        self.announced = true;
        self.events.publish(SessionEvent::BusyChanged(true));
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
        if self.announced {
            self.events.publish(SessionEvent::BusyChanged(false));
        }
    }
}
