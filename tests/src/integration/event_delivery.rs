//! Lifecycle events on the bus.

use super::{engine, engine_with};
use cs_02_change_sets::{
    ChangeSet, ChangeSetError, ChangeSetLoadTuner, ChangeSetManagementApi, ChangeSetState,
};
use cs_runtime::RuntimeConfig;
use shared_bus::{EventFilter, EventPublisher, EventType, PublishError};
use shared_types::Metadata;
use std::time::Duration;
use tokio::time::timeout;

fn create(engine: &cs_runtime::ChangeSetContainer, guid: &str) {
    engine
        .management
        .add(ChangeSet::new(guid, guid).created_by("U"))
        .unwrap();
}

#[tokio::test]
async fn test_subscriber_receives_ready_event_with_payload() {
    let engine = engine();
    let mut subscription = engine.subscribe(EventFilter::event_types(vec![
        EventType::ChangeSetReadyForPublish,
    ]));
    create(&engine, "CS1");

    let payload = Metadata::from([("deployTarget".to_string(), "staging".to_string())]);
    engine
        .management
        .update_state("CS1", ChangeSetState::ReadyToPublish, Some(&payload))
        .unwrap();

    let event = timeout(Duration::from_secs(1), subscription.recv())
        .await
        .expect("event within timeout")
        .expect("bus open");
    assert_eq!(event.guid, "CS1");
    assert_eq!(event.payload.get("deployTarget").map(String::as_str), Some("staging"));
}

#[tokio::test]
async fn test_guid_filter_skips_other_change_sets() {
    let engine = engine();
    let mut only_cs2 = engine.subscribe(EventFilter::change_set("CS2"));
    create(&engine, "CS1");
    create(&engine, "CS2");

    for guid in ["CS1", "CS2"] {
        engine
            .management
            .update_state(guid, ChangeSetState::ReadyToPublish, None)
            .unwrap();
    }

    let event = timeout(Duration::from_secs(1), only_cs2.recv())
        .await
        .expect("event within timeout")
        .expect("bus open");
    assert_eq!(event.guid, "CS2");
    assert!(only_cs2.drain().is_empty());
}

#[test]
fn test_only_ready_to_publish_emits() {
    let engine = engine();
    let mut events = engine.subscribe(EventFilter::all());
    create(&engine, "CS1");

    for state in [
        ChangeSetState::Locked,
        ChangeSetState::ReadyToPublish,
        ChangeSetState::Finalized,
    ] {
        engine.management.update_state("CS1", state, None).unwrap();
    }
    assert_eq!(events.drain().len(), 1);
    assert_eq!(engine.event_bus.events_published(), 1);
}

#[test]
fn test_strict_delivery_without_subscribers_restores_state() {
    let mut config = RuntimeConfig::default();
    config.change_sets.strict_event_delivery = true;
    let engine = engine_with(config);
    create(&engine, "CS1");
    engine
        .management
        .update_state("CS1", ChangeSetState::Locked, None)
        .unwrap();

    let err = engine
        .management
        .update_state("CS1", ChangeSetState::ReadyToPublish, None)
        .unwrap_err();
    assert!(matches!(
        err,
        ChangeSetError::PublishFailed {
            source: PublishError::NoSubscribers { .. },
            ..
        }
    ));
    assert!(!err.is_recoverable());

    let stored = engine
        .management
        .get("CS1", ChangeSetLoadTuner::none())
        .unwrap()
        .unwrap();
    assert_eq!(stored.state, ChangeSetState::Locked);

    // A listener turns up; the retry goes through.
    let mut subscription = engine.subscribe(EventFilter::all());
    engine
        .management
        .update_state("CS1", ChangeSetState::ReadyToPublish, None)
        .unwrap();
    assert_eq!(subscription.drain().len(), 1);
}

#[test]
fn test_closed_bus_fails_publish() {
    let engine = engine();
    create(&engine, "CS1");
    engine.event_bus.close();

    let err = engine
        .management
        .update_state("CS1", ChangeSetState::ReadyToPublish, None)
        .unwrap_err();
    assert!(matches!(
        err,
        ChangeSetError::PublishFailed {
            source: PublishError::Closed,
            ..
        }
    ));
    assert!(engine.policy.is_change_allowed("CS1"));
}
