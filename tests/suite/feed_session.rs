//! A host session replayed through the feed, plus autosave baseline
//! interplay between the feed and the filesystem probe.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};

use modalwatch_core::{AutosaveState, OperatorRegistry};
use modalwatch_host::{AutosaveProbe, FeedBridge, decode_line};
use modalwatch_types::OperatorStatus;

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

fn replay(lines: &[(&str, i64)]) -> (OperatorRegistry, AutosaveState) {
    let mut bridge = FeedBridge::new();
    let mut registry = OperatorRegistry::new();
    let mut autosave = AutosaveState::new();

    for (line, secs) in lines {
        match decode_line(line) {
            Ok(Some(event)) => bridge.apply(event, &mut registry, &mut autosave, at(*secs)),
            Ok(None) => {}
            Err(_) => {} // the binary skips malformed lines the same way
        }
    }
    (registry, autosave)
}

#[test]
fn full_session_transcript() {
    let (registry, autosave) = replay(&[
        ("{\"event\":\"autosave_completed\",\"at\":\"1970-01-01T00:00:10Z\"}", 11),
        ("", 12),
        (
            "{\"event\":\"operator_started\",\"token\":\"s1\",\"name\":\"Sculpt Stroke\",\"source_path\":\"/addons/sculpt.py\",\"module\":\"sculpt_plus\"}",
            20,
        ),
        ("{\"event\":\"operator_tick\",\"token\":\"s1\"}", 21),
        ("this line is noise, not JSON", 22),
        (
            "{\"event\":\"operator_started\",\"token\":\"t1\",\"name\":\"Transform\"}",
            25,
        ),
        ("{\"event\":\"operator_finished\",\"token\":\"s1\"}", 30),
    ]);

    assert_eq!(registry.len(), 2);
    assert_eq!(registry.blocking_count(), 1);

    let entries = registry.list_entries();
    assert_eq!(entries[0].name().as_str(), "Sculpt Stroke");
    assert_eq!(entries[0].status(), OperatorStatus::Finished);
    assert_eq!(entries[0].module(), Some("sculpt_plus"));
    assert_eq!(
        entries[0].source().path(),
        Some(Path::new("/addons/sculpt.py"))
    );
    assert_eq!(entries[1].name().as_str(), "Transform");
    assert!(entries[1].status().is_active());

    assert_eq!(autosave.last_autosave_at(), Some(at(10)));
    assert_eq!(autosave.since(at(70)).seconds(), Some(60));
}

#[test]
fn user_removal_wins_race_with_host_finish() {
    let mut bridge = FeedBridge::new();
    let mut registry = OperatorRegistry::new();
    let mut autosave = AutosaveState::new();

    let start = decode_line("{\"event\":\"operator_started\",\"token\":\"s1\",\"name\":\"Sculpt\"}")
        .unwrap()
        .unwrap();
    bridge.apply(start, &mut registry, &mut autosave, at(0));

    // The user prunes the entry while the operator is still running.
    let id = registry.list_entries()[0].id();
    registry.remove(id);

    let finish = decode_line("{\"event\":\"operator_finished\",\"token\":\"s1\"}")
        .unwrap()
        .unwrap();
    bridge.apply(finish, &mut registry, &mut autosave, at(5));

    assert!(registry.is_empty());
    assert_eq!(registry.blocking_count(), 0);
}

#[test]
fn probe_fills_baseline_until_host_reports() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scene_7777_autosave.blend");
    let mut file = File::create(&path).unwrap();
    file.write_all(b"BLENDER").unwrap();
    let probed_at = DateTime::<Utc>::from(path.metadata().unwrap().modified().unwrap());

    let probe = AutosaveProbe::with_dirs(vec![dir.path().to_path_buf()], "7777");
    let mut autosave = AutosaveState::new();

    autosave.record_probed(probe.latest_autosave().unwrap());
    assert_eq!(autosave.last_autosave_at(), Some(probed_at));

    // Once the host reports over the feed, its timestamp is ground truth.
    let mut bridge = FeedBridge::new();
    let mut registry = OperatorRegistry::new();
    let reported = decode_line("{\"event\":\"autosave_completed\",\"at\":\"2099-01-01T00:00:00Z\"}")
        .unwrap()
        .unwrap();
    bridge.apply(reported, &mut registry, &mut autosave, at(0));

    assert_eq!(
        autosave.last_autosave_at(),
        Some(Utc.with_ymd_and_hms(2099, 1, 1, 0, 0, 0).unwrap())
    );
}
