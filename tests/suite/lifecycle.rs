//! Registry lifecycle scenarios, end to end.

use chrono::{DateTime, TimeZone, Utc};

use modalwatch_core::{OperatorRegistry, time_since_last_autosave};
use modalwatch_types::{OperatorName, OperatorStatus, SinceAutosave, SourceRef};

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

fn start(registry: &mut OperatorRegistry, name: &str, secs: i64) -> modalwatch_types::EntryId {
    registry.record_start(
        OperatorName::new(name).unwrap(),
        SourceRef::Unknown,
        None,
        at(secs),
    )
}

#[test]
fn sculpt_lifecycle_scenario() {
    // start Sculpt -> blocking 1 -> finish -> blocking 0, entry kept
    // finished -> remove -> empty.
    let mut registry = OperatorRegistry::new();

    let sculpt = start(&mut registry, "Sculpt", 0);
    assert_eq!(registry.blocking_count(), 1);

    registry.record_finish(sculpt, at(30));
    assert_eq!(registry.blocking_count(), 0);

    let entries = registry.list_entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id(), sculpt);
    assert_eq!(entries[0].status(), OperatorStatus::Finished);

    registry.remove(sculpt);
    assert!(registry.list_entries().is_empty());
}

#[test]
fn concurrent_operators_scenario() {
    // Sculpt and Transform running concurrently are two distinct entries;
    // removing one while the other stays active leaves one blocker.
    let mut registry = OperatorRegistry::new();

    let sculpt = start(&mut registry, "Sculpt", 0);
    let transform = start(&mut registry, "Transform", 0);
    assert_ne!(sculpt, transform);
    assert_eq!(registry.blocking_count(), 2);

    registry.remove(sculpt);
    assert_eq!(registry.blocking_count(), 1);
    assert_eq!(registry.list_entries()[0].id(), transform);
}

#[test]
fn removed_ids_never_reappear() {
    let mut registry = OperatorRegistry::new();
    let mut removed = Vec::new();

    for round in 0..5 {
        let keep = start(&mut registry, "Keep", round);
        let drop = start(&mut registry, "Drop", round);
        registry.record_finish(keep, at(round + 100));
        registry.remove(drop);
        removed.push(drop);
    }

    for id in &removed {
        assert!(
            registry.list_entries().iter().all(|entry| entry.id() != *id),
            "removed id {id} resurfaced"
        );
    }
    assert_eq!(registry.len(), 5);
}

#[test]
fn double_remove_matches_single_remove() {
    let mut once = OperatorRegistry::new();
    let mut twice = OperatorRegistry::new();

    let a = start(&mut once, "Sculpt", 0);
    start(&mut once, "Transform", 1);
    let b = start(&mut twice, "Sculpt", 0);
    start(&mut twice, "Transform", 1);

    once.remove(a);
    twice.remove(b);
    twice.remove(b);

    assert_eq!(once.len(), twice.len());
    assert_eq!(once.blocking_count(), twice.blocking_count());
}

#[test]
fn time_since_autosave_sentinel_and_duration() {
    assert_eq!(
        time_since_last_autosave(at(12_345), None),
        SinceAutosave::Never
    );

    let since = time_since_last_autosave(at(1300), Some(at(1000)));
    assert_eq!(since.seconds(), Some(300));
}
