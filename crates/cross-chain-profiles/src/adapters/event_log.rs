//! In-Memory Event Log Adapter
//!
//! Implements `EventPublisher` with an append-only log plus a broadcast
//! channel for live subscribers.

use crate::domain::CrossChainMessage;
use crate::events::{EventFilter, RegistryEvent};
use crate::ports::outbound::EventPublisher;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;
use tracing::debug;

/// Default broadcast capacity.
pub const DEFAULT_EVENT_CAPACITY: usize = 1024;

/// Append-only audit log.
pub struct InMemoryEventLog {
    /// Every event ever published, in order.
    events: RwLock<Vec<RegistryEvent>>,
    /// Live subscribers.
    sender: broadcast::Sender<RegistryEvent>,
    /// Total events published.
    published: AtomicU64,
}

impl InMemoryEventLog {
    /// Create a log with the default channel capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }

    /// Create a log with the given channel capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            events: RwLock::new(Vec::new()),
            sender,
            published: AtomicU64::new(0),
        }
    }

    /// Subscribe to events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<RegistryEvent> {
        self.sender.subscribe()
    }

    /// Snapshot of all events.
    pub fn events(&self) -> Vec<RegistryEvent> {
        self.events.read().clone()
    }

    /// Dispatch records matching `filter`, oldest first.
    pub fn messages_sent(&self, filter: &EventFilter) -> Vec<CrossChainMessage> {
        self.events
            .read()
            .iter()
            .filter_map(RegistryEvent::as_message_sent)
            .filter(|message| filter.matches(message))
            .cloned()
            .collect()
    }
}

impl Default for InMemoryEventLog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventLog {
    async fn publish(&self, event: RegistryEvent) -> usize {
        debug!("[profiles] Publishing {}", event.topic());

        self.events.write().push(event.clone());
        self.published.fetch_add(1, Ordering::Relaxed);

        // No subscribers is not an error.
        self.sender.send(event).unwrap_or(0)
    }

    fn events_published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Address, FeeQuote, MessageId, NewProfile, ProfileId};

    fn message_sent(id: u8, destination: u64) -> RegistryEvent {
        RegistryEvent::MessageSent(CrossChainMessage::new(
            MessageId([id; 32]),
            destination,
            Address::new([1u8; 20]),
            NewProfile::new("John", "Doe", "American", 30).with_id(ProfileId([id; 32])),
            FeeQuote {
                fee_token: Address::ZERO,
                amount: 1,
            },
        ))
    }

    #[tokio::test]
    async fn test_publish_appends() {
        let log = InMemoryEventLog::new();
        log.publish(message_sent(1, 10)).await;
        log.publish(RegistryEvent::RouterUpdated {
            previous: Address::ZERO,
            current: Address::new([2u8; 20]),
        })
        .await;

        assert_eq!(log.events_published(), 2);
        assert_eq!(log.events().len(), 2);
    }

    #[tokio::test]
    async fn test_publish_without_subscribers() {
        let log = InMemoryEventLog::new();
        assert_eq!(log.publish(message_sent(1, 10)).await, 0);
    }

    #[tokio::test]
    async fn test_subscriber_receives_event() {
        let log = InMemoryEventLog::new();
        let mut rx = log.subscribe();

        assert_eq!(log.publish(message_sent(1, 10)).await, 1);
        let event = rx.recv().await.unwrap();
        assert_eq!(event, message_sent(1, 10));
    }

    #[tokio::test]
    async fn test_messages_sent_filtered() {
        let log = InMemoryEventLog::new();
        log.publish(message_sent(1, 10)).await;
        log.publish(message_sent(2, 20)).await;
        log.publish(message_sent(3, 10)).await;

        let to_ten = log.messages_sent(&EventFilter::default().destination(10));
        assert_eq!(to_ten.len(), 2);
        assert_eq!(to_ten[0].message_id, MessageId([1u8; 32]));
        assert_eq!(to_ten[1].message_id, MessageId([3u8; 32]));

        let by_id = log.messages_sent(&EventFilter::default().message_id(MessageId([2u8; 32])));
        assert_eq!(by_id.len(), 1);
        assert_eq!(by_id[0].destination_chain_selector, 20);
    }
}
