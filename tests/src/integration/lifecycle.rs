//! End-to-end change set lifecycle.

use super::{descriptor, engine};
use cs_01_object_resolution::CatalogLookup;
use cs_02_change_sets::{
    AddOutcome, ChangeSet, ChangeSetApi, ChangeSetError, ChangeSetLoadTuner,
    ChangeSetManagementApi, ChangeSetSearchCriteria, ChangeSetState, PolicyViolation,
};
use shared_bus::{EventFilter, EventType};
use shared_types::{object_types, ObjectKind};

#[test]
fn test_full_lifecycle_publishes_once() {
    let engine = engine();
    let mut events = engine.subscribe(EventFilter::all());

    engine
        .management
        .add(ChangeSet::new("CS1", "Spring refresh").created_by("U"))
        .unwrap();
    let p1 = engine.catalog.find_by_guid(ObjectKind::Product, "P1").unwrap();

    let added = engine
        .membership
        .add_object_to_change_set("CS1", (&p1).into(), None, None)
        .unwrap();
    assert!(added.was_added());

    let deps = engine
        .policy
        .get_dependent_objects(added.descriptor(), ObjectKind::Product);
    assert!(deps.contains(&descriptor(object_types::BRAND, "B1")));
    assert!(deps.contains(&descriptor(object_types::CATEGORY, "C1")));

    let again = engine
        .membership
        .add_object_to_change_set("CS1", (&p1).into(), None, None)
        .unwrap();
    assert_eq!(again, AddOutcome::AlreadyMember(descriptor(object_types::PRODUCT, "P1")));
    assert_eq!(engine.membership.find_members("CS1").unwrap().len(), 1);

    engine
        .management
        .update_state("CS1", ChangeSetState::Locked, None)
        .unwrap();
    assert!(events.drain().is_empty());

    engine
        .management
        .update_state("CS1", ChangeSetState::ReadyToPublish, None)
        .unwrap();
    let published = events.drain();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].guid, "CS1");
    assert_eq!(published[0].event_type, EventType::ChangeSetReadyForPublish);
    assert!(!engine.policy.is_change_allowed("CS1"));

    engine
        .management
        .update_state("CS1", ChangeSetState::Finalized, None)
        .unwrap();
    assert!(events.drain().is_empty());
    assert!(engine
        .membership
        .get_status((&p1).into())
        .unwrap()
        .owners
        .is_empty());
}

#[test]
fn test_backward_transition_rejected() {
    let engine = engine();
    engine
        .management
        .add(ChangeSet::new("CS1", "Spring").created_by("U"))
        .unwrap();
    engine
        .management
        .update_state("CS1", ChangeSetState::Locked, None)
        .unwrap();

    let err = engine
        .management
        .update_state("CS1", ChangeSetState::Open, None)
        .unwrap_err();
    assert!(matches!(
        err,
        ChangeSetError::PolicyViolation(PolicyViolation::InvalidTransition {
            from: ChangeSetState::Locked,
            to: ChangeSetState::Open,
        })
    ));
    let stored = engine
        .management
        .get("CS1", ChangeSetLoadTuner::none())
        .unwrap()
        .unwrap();
    assert_eq!(stored.state, ChangeSetState::Locked);
}

#[test]
fn test_membership_released_after_finalize() {
    let engine = engine();
    let brand = descriptor(object_types::BRAND, "B1");
    for guid in ["CS1", "CS2"] {
        engine
            .management
            .add(ChangeSet::new(guid, guid).created_by("U"))
            .unwrap();
    }

    engine
        .membership
        .add_object_to_change_set("CS1", (&brand).into(), None, None)
        .unwrap();
    assert!(matches!(
        engine
            .membership
            .add_object_to_change_set("CS2", (&brand).into(), None, None),
        Err(ChangeSetError::PolicyViolation(PolicyViolation::AlreadyClaimed { .. }))
    ));

    engine
        .management
        .update_state("CS1", ChangeSetState::Finalized, None)
        .unwrap();
    assert!(engine
        .membership
        .add_object_to_change_set("CS2", (&brand).into(), None, None)
        .unwrap()
        .was_added());
}

#[test]
fn test_remove_change_set_only_while_open() {
    let engine = engine();
    let open = engine
        .management
        .add(ChangeSet::new("CS1", "Spring").created_by("U"))
        .unwrap();
    let locked = engine
        .management
        .add(ChangeSet::new("CS2", "Summer").created_by("U"))
        .unwrap();
    engine
        .management
        .update_state(&locked.guid, ChangeSetState::Locked, None)
        .unwrap();

    engine
        .management
        .remove(open.object_group_id().unwrap())
        .unwrap();
    assert!(engine
        .management
        .get("CS1", ChangeSetLoadTuner::none())
        .unwrap()
        .is_none());
    assert!(matches!(
        engine.management.remove(locked.object_group_id().unwrap()),
        Err(ChangeSetError::PolicyViolation(PolicyViolation::NotRemovable { .. }))
    ));
}

#[test]
fn test_search_by_user_and_state() {
    let engine = engine();
    for (guid, user) in [("CS1", "U1"), ("CS2", "U1"), ("CS3", "U2")] {
        engine
            .management
            .add(ChangeSet::new(guid, format!("{guid} edits")).created_by(user))
            .unwrap();
    }
    engine
        .management
        .update_state("CS2", ChangeSetState::Locked, None)
        .unwrap();

    assert_eq!(engine.management.find_by_user("U1").unwrap().len(), 2);
    let criteria = ChangeSetSearchCriteria::new()
        .for_user("U1")
        .in_states([ChangeSetState::Open]);
    let open = engine.management.find_by_criteria(&criteria).unwrap();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].guid, "CS1");
    assert_eq!(engine.management.count_by_criteria(&criteria).unwrap(), 1);
}

#[test]
fn test_update_cannot_reopen_finalized() {
    let engine = engine();
    let mut events = engine.subscribe(EventFilter::all());
    let created = engine
        .management
        .add(ChangeSet::new("CS1", "Spring").created_by("U"))
        .unwrap();

    let mut skipped = created;
    skipped.state = ChangeSetState::ReadyToPublish;
    assert!(matches!(
        engine.management.update(skipped, ChangeSetLoadTuner::none()),
        Err(ChangeSetError::InvalidArgument(_))
    ));
    assert!(events.drain().is_empty());

    let finalized = engine
        .management
        .update_state("CS1", ChangeSetState::Finalized, None)
        .unwrap();
    let mut reopened = finalized;
    reopened.state = ChangeSetState::Open;
    assert!(matches!(
        engine.management.update(reopened, ChangeSetLoadTuner::none()),
        Err(ChangeSetError::PolicyViolation(PolicyViolation::ChangeNotAllowed { .. }))
    ));

    assert!(!engine.policy.is_change_allowed("CS1"));
    let p1 = engine.catalog.find_by_guid(ObjectKind::Product, "P1").unwrap();
    assert!(matches!(
        engine
            .membership
            .add_object_to_change_set("CS1", (&p1).into(), None, None),
        Err(ChangeSetError::PolicyViolation(PolicyViolation::ChangeNotAllowed { .. }))
    ));
}
