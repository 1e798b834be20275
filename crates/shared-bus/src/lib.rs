//! # Shared Bus - Change Set Event Boundary
//!
//! Carries lifecycle notifications out of the change set services.
//!
//! ## Rules
//!
//! - Only the transition into `READY_TO_PUBLISH` emits an event.
//! - Publishing is synchronous relative to the transition: a publish failure
//!   is returned to the caller and aborts the transition.
//! - No retries happen here; retry policy belongs to the caller.
//!
//! ```text
//! ┌────────────────────────┐   publish()   ┌──────────────┐  subscribe()  ┌──────────────┐
//! │ ChangeSetManagement    │ ────────────→ │  Event Bus   │ ────────────→ │ Deployment   │
//! │ (update_state)         │   Result<..>  │              │               │ consumers    │
//! └────────────────────────┘               └──────────────┘               └──────────────┘
//! ```

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{ChangeSetEvent, DefaultEventFactory, EventFactory, EventFilter, EventType};
pub use publisher::{EventPublisher, InMemoryEventBus, PublishError};
pub use subscriber::{Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before lagging.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_capacity() {
        assert_eq!(DEFAULT_CHANNEL_CAPACITY, 1000);
    }
}
