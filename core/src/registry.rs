//! The operator history registry.
//!
//! Session-lifetime, insertion-ordered record of modal-operator invocations.
//! Entries are appended when the host signals a start, transitioned to
//! finished when the host signals completion, and deleted only by explicit
//! user curation. Finishing never deletes: the user keeps the full audit
//! trail until they prune it themselves.

use chrono::{DateTime, Utc};

use modalwatch_types::{EntryId, OperatorEntry, OperatorName, SourceRef};

/// Authoritative list of modal-operator invocations for the current session.
///
/// All operations are `O(n)` over a small, bounded entry count and cannot
/// fail: acting on a stale [`EntryId`] is a benign race with user removal
/// and is defined as a no-op.
#[derive(Debug, Default)]
pub struct OperatorRegistry {
    entries: Vec<OperatorEntry>,
    next_id: u64,
}

impl OperatorRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a newly started invocation and return its id.
    ///
    /// Every call creates a distinct entry, even for an operator kind that
    /// already has one: concurrent re-invocation is one entry per instance.
    pub fn record_start(
        &mut self,
        name: OperatorName,
        source: SourceRef,
        module: Option<String>,
        now: DateTime<Utc>,
    ) -> EntryId {
        let id = EntryId::new(self.next_id);
        self.next_id += 1;
        tracing::debug!(entry = %id, operator = %name, "modal operator started");
        self.entries
            .push(OperatorEntry::started(id, name, source, module, now));
        id
    }

    /// Mark an invocation finished.
    ///
    /// No-op when the entry was already removed by the user; the host's
    /// finish signal racing a removal is expected and harmless.
    pub fn record_finish(&mut self, id: EntryId, now: DateTime<Utc>) {
        match self.entries.iter_mut().find(|entry| entry.id() == id) {
            Some(entry) => entry.finish(now),
            None => tracing::debug!(entry = %id, "finish for removed entry, ignoring"),
        }
    }

    /// Remove an entry from the history, whatever its status.
    ///
    /// This curates the display only. It never cancels or unregisters the
    /// underlying operator, and removing an id twice is the same as once.
    pub fn remove(&mut self, id: EntryId) {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id() != id);
        if self.entries.len() == before {
            tracing::debug!(entry = %id, "remove for unknown entry, ignoring");
        }
    }

    /// All entries, insertion order.
    #[must_use]
    pub fn list_entries(&self) -> &[OperatorEntry] {
        &self.entries
    }

    #[must_use]
    pub fn get(&self, id: EntryId) -> Option<&OperatorEntry> {
        self.entries.iter().find(|entry| entry.id() == id)
    }

    /// Number of entries currently blocking autosave (status active).
    #[must_use]
    pub fn blocking_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.status().is_active())
            .count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
