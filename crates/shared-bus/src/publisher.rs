//! # Event Publisher
//!
//! Defines the publishing side of the event bus.

use crate::events::{ChangeSetEvent, EventFilter};
use crate::subscriber::Subscription;
use crate::DEFAULT_CHANNEL_CAPACITY;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Why an event could not be published.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PublishError {
    /// Strict delivery was requested and no subscription's filter matches.
    #[error("No subscribers for event {event_type} on change set {guid}")]
    NoSubscribers { event_type: String, guid: String },

    /// The bus has been shut down.
    #[error("Event bus closed")]
    Closed,

    /// Transport-level failure in an external publisher.
    #[error("Event transport failure: {0}")]
    Transport(String),
}

/// Trait for publishing events to the bus.
///
/// Publishing is synchronous: when this returns `Ok`, the event has been
/// handed to the transport.
pub trait EventPublisher: Send + Sync {
    /// Publish an event to the bus.
    ///
    /// # Returns
    ///
    /// The number of active subscribers that received the event.
    fn publish(&self, event: ChangeSetEvent) -> Result<usize, PublishError>;

    /// Get the total number of events successfully published.
    fn events_published(&self) -> u64;
}

/// In-memory implementation of the event bus.
///
/// Uses `tokio::sync::broadcast` for multi-producer, multi-consumer fan-out.
/// Suitable for single-process deployments; a distributed deployment would
/// put a message broker behind `EventPublisher` instead.
pub struct InMemoryEventBus {
    /// Broadcast sender for events.
    sender: broadcast::Sender<ChangeSetEvent>,

    /// Filters of live subscriptions by subscription id.
    subscriptions: Arc<RwLock<HashMap<u64, EventFilter>>>,

    next_subscription_id: AtomicU64,

    /// Total events published.
    events_published: AtomicU64,

    /// Fail publishing when there is no subscriber.
    strict_delivery: bool,

    closed: AtomicBool,

    /// Channel capacity.
    capacity: usize,
}

impl InMemoryEventBus {
    /// Create a new in-memory event bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a new in-memory event bus with specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            subscriptions: Arc::new(RwLock::new(HashMap::new())),
            next_subscription_id: AtomicU64::new(0),
            events_published: AtomicU64::new(0),
            strict_delivery: false,
            closed: AtomicBool::new(false),
            capacity,
        }
    }

    /// Require at least one subscription whose filter matches the event for
    /// a publish to succeed.
    #[must_use]
    pub fn with_strict_delivery(mut self, strict: bool) -> Self {
        self.strict_delivery = strict;
        self
    }

    /// Subscribe to events matching a filter.
    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        let receiver = self.sender.subscribe();
        let id = self.next_subscription_id.fetch_add(1, Ordering::Relaxed);
        self.subscriptions.write().insert(id, filter.clone());

        debug!(
            subscription_id = id,
            event_types = ?filter.event_types,
            guid = ?filter.guid,
            "New subscription created"
        );

        Subscription::new(receiver, filter, self.subscriptions.clone(), id)
    }

    /// Number of live subscriptions whose filter accepts `event`.
    #[must_use]
    pub fn interested_subscribers(&self, event: &ChangeSetEvent) -> usize {
        self.subscriptions
            .read()
            .values()
            .filter(|filter| filter.matches(event))
            .count()
    }

    /// Stop accepting events. Later publishes fail with `PublishError::Closed`.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    /// Get the number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Get the channel capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventPublisher for InMemoryEventBus {
    fn publish(&self, event: ChangeSetEvent) -> Result<usize, PublishError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(PublishError::Closed);
        }

        let event_type = event.event_type;
        let guid = event.guid.clone();

        if self.strict_delivery && self.interested_subscribers(&event) == 0 {
            return Err(PublishError::NoSubscribers {
                event_type: event_type.as_str().to_string(),
                guid,
            });
        }

        match self.sender.send(event) {
            Ok(receiver_count) => {
                self.events_published.fetch_add(1, Ordering::Relaxed);
                debug!(
                    event_type = event_type.as_str(),
                    guid = %guid,
                    receivers = receiver_count,
                    "Event published"
                );
                Ok(receiver_count)
            }
            Err(e) => {
                // No receivers - event is dropped
                self.events_published.fetch_add(1, Ordering::Relaxed);
                warn!(
                    event_type = event_type.as_str(),
                    guid = %guid,
                    error = %e,
                    "Event dropped (no receivers)"
                );
                Ok(0)
            }
        }
    }

    fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{DefaultEventFactory, EventFactory, EventType};

    fn ready(guid: &str) -> ChangeSetEvent {
        DefaultEventFactory.create_event(EventType::ChangeSetReadyForPublish, guid, None)
    }

    #[test]
    fn test_publish_no_subscribers() {
        let bus = InMemoryEventBus::new();

        let receivers = bus.publish(ready("CS1")).unwrap();
        assert_eq!(receivers, 0);
        assert_eq!(bus.events_published(), 1);
    }

    #[test]
    fn test_strict_delivery_without_subscribers_fails() {
        let bus = InMemoryEventBus::new().with_strict_delivery(true);

        let result = bus.publish(ready("CS1"));
        assert!(matches!(result, Err(PublishError::NoSubscribers { .. })));
        assert_eq!(bus.events_published(), 0);
    }

    #[test]
    fn test_publish_with_subscriber() {
        let bus = InMemoryEventBus::new().with_strict_delivery(true);
        let _sub = bus.subscribe(EventFilter::all());

        let receivers = bus.publish(ready("CS1")).unwrap();

        assert_eq!(receivers, 1);
        assert_eq!(bus.subscriber_count(), 1);
    }

    #[test]
    fn test_strict_delivery_needs_a_matching_filter() {
        let bus = InMemoryEventBus::new().with_strict_delivery(true);
        let _other = bus.subscribe(EventFilter::change_set("CS2"));

        assert_eq!(bus.interested_subscribers(&ready("CS1")), 0);
        assert!(matches!(
            bus.publish(ready("CS1")),
            Err(PublishError::NoSubscribers { .. })
        ));

        let _mine = bus.subscribe(EventFilter::change_set("CS1"));
        assert_eq!(bus.interested_subscribers(&ready("CS1")), 1);
        assert!(bus.publish(ready("CS1")).is_ok());
        assert_eq!(bus.events_published(), 1);
    }

    #[test]
    fn test_multiple_subscribers() {
        let bus = InMemoryEventBus::new();

        let _sub1 = bus.subscribe(EventFilter::all());
        let _sub2 = bus.subscribe(EventFilter::change_set("CS1"));
        let _sub3 = bus.subscribe(EventFilter::event_types(vec![
            EventType::ChangeSetReadyForPublish,
        ]));

        let receivers = bus.publish(ready("CS1")).unwrap();

        assert_eq!(receivers, 3);
    }

    #[test]
    fn test_closed_bus_rejects_events() {
        let bus = InMemoryEventBus::new();
        bus.close();

        assert_eq!(bus.publish(ready("CS1")), Err(PublishError::Closed));
        assert_eq!(bus.events_published(), 0);
    }

    #[test]
    fn test_custom_capacity() {
        let bus = InMemoryEventBus::with_capacity(100);
        assert_eq!(bus.capacity(), 100);
    }

    #[test]
    fn test_default_bus() {
        let bus = InMemoryEventBus::default();
        assert_eq!(bus.capacity(), DEFAULT_CHANNEL_CAPACITY);
        assert_eq!(bus.subscriber_count(), 0);
        assert_eq!(bus.events_published(), 0);
    }
}
