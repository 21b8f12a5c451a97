//! Display-layer behavior over real registry state.

use chrono::{Duration, TimeZone, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use modalwatch_core::{AutosaveState, OperatorRegistry};
use modalwatch_host::{FileOpener, OpenError};
use modalwatch_tui::{PanelState, autosave_line, handle_key, is_overdue};
use modalwatch_types::{OperatorName, SourceRef};

struct NullOpener;

impl FileOpener for NullOpener {
    fn open_in_editor(&self, _path: &std::path::Path) -> Result<(), OpenError> {
        Ok(())
    }

    fn reveal_in_file_manager(&self, _path: &std::path::Path) -> Result<(), OpenError> {
        Ok(())
    }
}

#[test]
fn autosave_line_tracks_session_state() {
    let mut autosave = AutosaveState::new();
    let now = Utc.timestamp_opt(1000, 0).unwrap();

    assert_eq!(
        autosave_line(autosave.since(now)),
        "No autosave during this session"
    );

    autosave.record_reported(now - Duration::seconds(185));
    assert_eq!(autosave_line(autosave.since(now)), "Autosaved 3 minutes ago");
}

#[test]
fn overdue_follows_configured_interval() {
    let mut autosave = AutosaveState::new();
    let now = Utc.timestamp_opt(1000, 0).unwrap();

    // No baseline: informational, never a warning.
    assert!(!is_overdue(autosave.since(now), 2));

    autosave.record_reported(now - Duration::seconds(90));
    assert!(!is_overdue(autosave.since(now), 2));

    autosave.record_reported(now - Duration::seconds(301));
    assert!(is_overdue(autosave.since(now), 2));
    assert!(!is_overdue(autosave.since(now), 10));
}

#[test]
fn selection_survives_removals_at_the_end_of_the_list() {
    let mut registry = OperatorRegistry::new();
    let now = Utc.timestamp_opt(0, 0).unwrap();
    for name in ["A", "B", "C"] {
        registry.record_start(OperatorName::new(name).unwrap(), SourceRef::Unknown, None, now);
    }

    let mut panel = PanelState::new();
    let down = KeyEvent::new(KeyCode::Down, KeyModifiers::NONE);
    let remove = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);

    handle_key(down, &mut registry, &mut panel, &NullOpener);
    handle_key(down, &mut registry, &mut panel, &NullOpener);
    assert_eq!(panel.selected(), 2);

    // Removing the last row pulls the cursor up with it.
    handle_key(remove, &mut registry, &mut panel, &NullOpener);
    assert_eq!(registry.len(), 2);
    assert_eq!(panel.selected(), 1);

    handle_key(remove, &mut registry, &mut panel, &NullOpener);
    handle_key(remove, &mut registry, &mut panel, &NullOpener);
    assert!(registry.is_empty());
    assert_eq!(panel.selected(), 0);
}
