//! Racing claims and racing transitions.

use super::{descriptor, engine};
use cs_02_change_sets::{
    ChangeSet, ChangeSetApi, ChangeSetError, ChangeSetManagementApi, ChangeSetState,
    PolicyViolation,
};
use shared_types::object_types;
use std::sync::Barrier;
use std::thread;

const CONTENDERS: usize = 8;

#[test]
fn test_only_one_change_set_claims_an_object() {
    let engine = engine();
    let guids: Vec<String> = (0..CONTENDERS).map(|i| format!("CS{i}")).collect();
    for guid in &guids {
        engine
            .management
            .add(ChangeSet::new(guid.as_str(), guid.as_str()).created_by("U"))
            .unwrap();
    }

    let product = descriptor(object_types::PRODUCT, "P1");
    let barrier = Barrier::new(CONTENDERS);
    let results: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = guids
            .iter()
            .map(|guid| {
                let (engine, product, barrier) = (&engine, &product, &barrier);
                scope.spawn(move || {
                    barrier.wait();
                    engine
                        .membership
                        .add_object_to_change_set(guid, product.into(), None, None)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let added = results
        .iter()
        .filter(|r| matches!(r, Ok(outcome) if outcome.was_added()))
        .count();
    let claimed = results
        .iter()
        .filter(|r| {
            matches!(
                r,
                Err(ChangeSetError::PolicyViolation(PolicyViolation::AlreadyClaimed { .. }))
            )
        })
        .count();
    assert_eq!(added, 1);
    assert_eq!(claimed, CONTENDERS - 1);

    let status = engine.membership.get_status((&product).into()).unwrap();
    assert_eq!(status.owners.len(), 1);
}

#[test]
fn test_parallel_adds_of_distinct_objects() {
    let engine = engine();
    engine
        .management
        .add(ChangeSet::new("CS1", "Bulk").created_by("U"))
        .unwrap();

    let objects = [
        descriptor(object_types::PRODUCT, "P1"),
        descriptor(object_types::BRAND, "B1"),
        descriptor(object_types::CATEGORY, "C1"),
        descriptor(object_types::PRODUCT_SKU, "SKU1"),
        descriptor(object_types::PROMOTION, "PR1"),
    ];
    thread::scope(|scope| {
        for object in &objects {
            let engine = &engine;
            scope.spawn(move || {
                engine
                    .membership
                    .add_object_to_change_set("CS1", object.into(), None, None)
                    .unwrap();
            });
        }
    });

    assert_eq!(engine.membership.find_members("CS1").unwrap().len(), objects.len());
}

#[test]
fn test_racing_transitions_apply_once() {
    let engine = engine();
    engine
        .management
        .add(ChangeSet::new("CS1", "Race").created_by("U"))
        .unwrap();
    let mut events = engine.subscribe(shared_bus::EventFilter::all());

    let barrier = Barrier::new(CONTENDERS);
    let results: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..CONTENDERS)
            .map(|_| {
                let (engine, barrier) = (&engine, &barrier);
                scope.spawn(move || {
                    barrier.wait();
                    engine
                        .management
                        .update_state("CS1", ChangeSetState::ReadyToPublish, None)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results.iter().filter_map(|r| r.as_ref().err()).all(|e| matches!(
        e,
        ChangeSetError::ConcurrentModification { .. }
            | ChangeSetError::PolicyViolation(PolicyViolation::InvalidTransition { .. })
    )));
    assert_eq!(events.drain().len(), 1);
}
