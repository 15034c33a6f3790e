use super::{PageEvent, RelayMessage};
use log::debug;
use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 16;

#[derive(Debug, Clone)]
pub struct ContentScript {
    events: broadcast::Sender<PageEvent>,
}

impl Default for ContentScript {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentScript {
    #[must_use]
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self { events }
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<PageEvent> {
        self.events.subscribe()
    }

    // The command value is passed through untouched
    pub fn on_message(&self, message: RelayMessage) {
        let event = PageEvent::extension_command(message.command);
        if self.events.send(event).is_err() {
            debug!("No page listener for extensionCommand");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relay::EXTENSION_COMMAND_EVENT;

    #[test]
    fn message_is_reemitted_as_page_event() {
        let content = ContentScript::new();
        let mut listener = content.subscribe();
        content.on_message(RelayMessage {
            command: "anything-at-all".into(),
        });
        let event = listener.try_recv().unwrap();
        assert_eq!(event.name, EXTENSION_COMMAND_EVENT);
        assert_eq!(event.detail.command, "anything-at-all");
    }

    #[test]
    fn event_serializes_with_detail() {
        let event = PageEvent::extension_command("next".into());
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            serde_json::json!({"name": "extensionCommand", "detail": {"command": "next"}})
        );
    }

    #[test]
    fn no_listener_is_not_an_error() {
        ContentScript::new().on_message(RelayMessage {
            command: "next".into(),
        });
    }
}
