//! # Change Set Events
//!
//! Defines the events that flow through the bus and the factory that builds
//! them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::Metadata;
use uuid::Uuid;

/// Kind of lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    /// A change set entered `READY_TO_PUBLISH` and can be deployed.
    #[serde(rename = "CHANGE_SET_READY_FOR_PUBLISH")]
    ChangeSetReadyForPublish,
}

impl EventType {
    /// Wire name of the event type.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::ChangeSetReadyForPublish => "CHANGE_SET_READY_FOR_PUBLISH",
        }
    }
}

/// An event about a single change set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeSetEvent {
    /// Unique id of this event instance.
    pub event_id: Uuid,
    pub event_type: EventType,
    /// Guid of the change set the event is about.
    pub guid: String,
    /// Optional caller-supplied payload.
    pub payload: Metadata,
    pub occurred_at: DateTime<Utc>,
}

/// Builds events for the bus.
pub trait EventFactory: Send + Sync {
    /// Create an event of `event_type` about change set `guid`.
    fn create_event(
        &self,
        event_type: EventType,
        guid: &str,
        payload: Option<&Metadata>,
    ) -> ChangeSetEvent;
}

/// Factory stamping a random event id and the current time.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultEventFactory;

impl EventFactory for DefaultEventFactory {
    fn create_event(
        &self,
        event_type: EventType,
        guid: &str,
        payload: Option<&Metadata>,
    ) -> ChangeSetEvent {
        ChangeSetEvent {
            event_id: Uuid::new_v4(),
            event_type,
            guid: guid.to_string(),
            payload: payload.cloned().unwrap_or_default(),
            occurred_at: Utc::now(),
        }
    }
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Event types to include (empty = all).
    pub event_types: Vec<EventType>,
    /// Restrict to one change set.
    pub guid: Option<String>,
}

impl EventFilter {
    /// Create a filter that matches all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific event types.
    #[must_use]
    pub fn event_types(event_types: Vec<EventType>) -> Self {
        Self {
            event_types,
            guid: None,
        }
    }

    /// Create a filter for one change set.
    #[must_use]
    pub fn change_set(guid: impl Into<String>) -> Self {
        Self {
            event_types: Vec::new(),
            guid: Some(guid.into()),
        }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &ChangeSetEvent) -> bool {
        if !self.event_types.is_empty() && !self.event_types.contains(&event.event_type) {
            return false;
        }
        match &self.guid {
            Some(guid) => guid == &event.guid,
            None => true,
        }
    }
}
