use tokio::sync::broadcast;

use crate::types::Message;

/// Change notifications emitted by a conversation session. Presentation
/// layers subscribe and redraw.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A message was appended at `index` in the log.
    MessageAppended { index: usize, message: Message },
    /// The in-flight flag changed.
    BusyChanged(bool),
    /// A send attempt failed; the string is what the user should see.
    Error(String),
    AttachmentChanged { mime_type: Option<String> },
    CredentialChanged { configured: bool, remembered: bool },
    ModelChanged(String),
}

pub struct EventBus {
    sender: broadcast::Sender<SessionEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: SessionEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_receive() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(SessionEvent::BusyChanged(true));

        let event = rx.recv().await.unwrap();
        assert!(matches!(event, SessionEvent::BusyChanged(true)));
    }

    #[tokio::test]
    async fn multiple_subscribers() {
        let bus = EventBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(SessionEvent::ModelChanged("gemini-2.5-pro".into()));

        let e1 = rx1.recv().await.unwrap();
        let e2 = rx2.recv().await.unwrap();
        assert!(matches!(e1, SessionEvent::ModelChanged(ref m) if m == "gemini-2.5-pro"));
        assert!(matches!(e2, SessionEvent::ModelChanged(_)));
    }

    #[tokio::test]
    async fn message_events_keep_order() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(SessionEvent::MessageAppended {
            index: 0,
            message: Message::user_text("Hello"),
        });
        bus.publish(SessionEvent::MessageAppended {
            index: 1,
            message: Message::model_text("Hi there"),
        });

        let e1 = rx.recv().await.unwrap();
        assert!(
            matches!(e1, SessionEvent::MessageAppended { index: 0, ref message } if message.text() == "Hello")
        );
        let e2 = rx.recv().await.unwrap();
        assert!(matches!(e2, SessionEvent::MessageAppended { index: 1, .. }));
    }

    #[test]
    fn publish_returns_zero_with_no_subscribers() {
        let bus = EventBus::new(16);
        let count = bus.publish(SessionEvent::BusyChanged(false));
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn publish_returns_subscriber_count() {
        let bus = EventBus::new(16);
        let _rx1 = bus.subscribe();
        let _rx2 = bus.subscribe();

        let count = bus.publish(SessionEvent::Error("boom".into()));
        assert_eq!(count, 2);
    }
}
