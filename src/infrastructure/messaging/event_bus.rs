use crate::application::ports::event_bus::{EventBus, SyncEvent};
use tokio::sync::broadcast;
use tracing::debug;

/// [`EventBus`] over a tokio broadcast channel. Every subscriber gets its
/// own receiver; events published with no subscribers are dropped.
pub struct BroadcastEventBus {
    sender: broadcast::Sender<SyncEvent>,
}

impl BroadcastEventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.sender.subscribe()
    }
}

impl Default for BroadcastEventBus {
    fn default() -> Self {
        Self::new(64)
    }
}

impl EventBus for BroadcastEventBus {
    fn trigger(&self, event: SyncEvent) {
        debug!("Publishing {} for resource {}", event.event, event.resource_id);
        // Err here only means nobody is listening right now.
        let _ = self.sender.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::constants::FORUM_AUTO_SYNCED;

    fn event(resource_id: i64) -> SyncEvent {
        SyncEvent {
            event: FORUM_AUTO_SYNCED.to_string(),
            resource_id,
            discussion_id: None,
            user_id: 2,
            warnings: vec![],
        }
    }

    #[tokio::test]
    async fn test_subscribers_receive_published_events() {
        let bus = BroadcastEventBus::default();
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        bus.trigger(event(7));

        assert_eq!(first.recv().await.unwrap().resource_id, 7);
        assert_eq!(second.recv().await.unwrap().resource_id, 7);
    }

    #[tokio::test]
    async fn test_trigger_without_subscribers_does_not_panic() {
        let bus = BroadcastEventBus::default();
        bus.trigger(event(7));
    }
}
