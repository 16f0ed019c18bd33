//! Session event stream.
//!
//! Presentation layers subscribe to learn about state changes they did not
//! initiate, most importantly selections cleared by the resolver.

use crate::resolver::ClearedSelection;
use configurator_core::ConfiguratorId;
use serde::Serialize;
use std::collections::BTreeMap;
use tokio::sync::broadcast;
use tracing::trace;

/// Something that happened in a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SessionEvent {
    /// A configurator was loaded or reloaded
    #[serde(rename_all = "camelCase")]
    CatalogLoaded {
        /// Public identifier of the configurator
        public_id: ConfiguratorId,
        /// Number of active categories
        categories: usize,
        /// Number of incompatibility constraints
        rules: usize,
    },
    /// The catalog was edited
    CatalogChanged {
        /// Action that changed it
        action: &'static str,
    },
    /// The selection changed
    SelectionChanged {
        /// Category ID to option ID after the change
        selection: BTreeMap<String, String>,
    },
    /// The resolver cleared selections
    SelectionsCleared {
        /// What was cleared and why
        cleared: Vec<ClearedSelection>,
    },
    /// Admin mode was switched
    AdminModeChanged {
        /// New admin mode
        enabled: bool,
    },
}

/// Fan-out of session events to any number of subscribers.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<SessionEvent>,
}

impl EventBus {
    /// Create a bus buffering up to `capacity` events per lagging subscriber.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribe to events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }

    /// Publish an event; returns how many subscribers received it.
    pub fn publish(&self, event: SessionEvent) -> usize {
        // No subscribers is not an error
        let delivered = self.sender.send(event).unwrap_or(0);
        trace!(delivered, "published session event");
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_without_subscribers() {
        let bus = EventBus::new(4);
        assert_eq!(bus.publish(SessionEvent::AdminModeChanged { enabled: true }), 0);
    }

    #[tokio::test]
    async fn test_subscribers_receive_events() {
        let bus = EventBus::new(4);
        let mut rx = bus.subscribe();

        bus.publish(SessionEvent::CatalogChanged {
            action: "add_category",
        });

        let event = rx.recv().await.expect("receive event");
        assert_eq!(
            event,
            SessionEvent::CatalogChanged {
                action: "add_category"
            }
        );
    }

    #[test]
    fn test_event_serialization() {
        let event = SessionEvent::CatalogLoaded {
            public_id: ConfiguratorId::new("desk").expect("valid ID"),
            categories: 2,
            rules: 1,
        };
        let value = serde_json::to_value(&event).expect("serialize event");
        assert_eq!(value["type"], "catalogLoaded");
        assert_eq!(value["publicId"], "desk");
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let bus = EventBus::new(0);
        let _rx = bus.subscribe();
        assert_eq!(bus.publish(SessionEvent::AdminModeChanged { enabled: false }), 1);
    }
}
