//! Autosave baseline tracking.
//!
//! The host owns autosave; this module only records the last observed
//! completion time and answers "how long ago was that". Two sources feed
//! it: explicit `autosave_completed` events from the host, and the
//! filesystem probe in `modalwatch-host`. Feed timestamps are ground truth
//! and always win over probed ones.

use chrono::{DateTime, Utc};

use modalwatch_types::SinceAutosave;

/// Time since the last autosave, or `Never` when no baseline exists.
///
/// Pure computation; `now` is passed in so callers (and tests) control the
/// clock.
#[must_use]
pub fn time_since_last_autosave(
    now: DateTime<Utc>,
    last_autosave_at: Option<DateTime<Utc>>,
) -> SinceAutosave {
    match last_autosave_at {
        None => SinceAutosave::Never,
        Some(at) => SinceAutosave::Elapsed(now - at),
    }
}

/// Last observed autosave completion, by source.
#[derive(Debug, Default)]
pub struct AutosaveState {
    reported: Option<DateTime<Utc>>,
    probed: Option<DateTime<Utc>>,
}

impl AutosaveState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an autosave completion reported over the host feed.
    pub fn record_reported(&mut self, at: DateTime<Utc>) {
        tracing::debug!(%at, "autosave reported by host");
        self.reported = Some(at);
    }

    /// Record a baseline observed by the filesystem probe.
    pub fn record_probed(&mut self, at: DateTime<Utc>) {
        self.probed = Some(at);
    }

    /// The effective baseline: host-reported if any, else probed.
    #[must_use]
    pub fn last_autosave_at(&self) -> Option<DateTime<Utc>> {
        self.reported.or(self.probed)
    }

    #[must_use]
    pub fn since(&self, now: DateTime<Utc>) -> SinceAutosave {
        time_since_last_autosave(now, self.last_autosave_at())
    }
}
