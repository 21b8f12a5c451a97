//! Core domain types for Modalwatch.
//!
//! This crate contains pure domain types with no IO, no async, and minimal
//! dependencies. Everything here can be used from any layer of the
//! application.

mod ids;
pub use ids::EntryId;

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Operator Name
// ============================================================================

/// The display name of a modal operator, guaranteed non-empty (after
/// trimming).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OperatorName(String);

#[derive(Debug, Error)]
#[error("operator name must not be empty")]
pub struct EmptyOperatorNameError;

impl OperatorName {
    pub fn new(value: impl Into<String>) -> Result<Self, EmptyOperatorNameError> {
        let value = value.into();
        if value.trim().is_empty() {
            Err(EmptyOperatorNameError)
        } else {
            Ok(Self(value))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<String> for OperatorName {
    type Error = EmptyOperatorNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for OperatorName {
    type Error = EmptyOperatorNameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OperatorName> for String {
    fn from(value: OperatorName) -> Self {
        value.0
    }
}

impl AsRef<str> for OperatorName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for OperatorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Source Reference
// ============================================================================

/// The file reference associated with one operator invocation.
///
/// The host may fail to resolve a source file for an operator (built-in
/// operators, generated code). That case is an explicit variant rather than
/// a magic path string, so callers cannot forget to handle it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceRef {
    Known(PathBuf),
    Unknown,
}

impl SourceRef {
    /// The source path, if the host resolved one.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            SourceRef::Known(path) => Some(path),
            SourceRef::Unknown => None,
        }
    }

    #[must_use]
    pub fn is_known(&self) -> bool {
        matches!(self, SourceRef::Known(_))
    }
}

impl From<Option<PathBuf>> for SourceRef {
    fn from(value: Option<PathBuf>) -> Self {
        value.map_or(SourceRef::Unknown, SourceRef::Known)
    }
}

// ============================================================================
// Operator Status
// ============================================================================

/// Lifecycle state of one tracked invocation.
///
/// Entries are created `Active` and transition to `Finished` exactly once.
/// Removal from the history is deletion, not a third state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperatorStatus {
    Active,
    Finished,
}

impl OperatorStatus {
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, OperatorStatus::Active)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            OperatorStatus::Active => "active",
            OperatorStatus::Finished => "finished",
        }
    }
}

// ============================================================================
// Operator Entry
// ============================================================================

/// One tracked invocation record of a modal operator.
///
/// Fields are private so the `status`/`finished_at` pairing cannot be broken
/// from outside: `finished_at` is `Some` if and only if the entry is
/// `Finished`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorEntry {
    id: EntryId,
    name: OperatorName,
    source: SourceRef,
    module: Option<String>,
    status: OperatorStatus,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
}

impl OperatorEntry {
    /// Create a freshly started (active) entry.
    #[must_use]
    pub fn started(
        id: EntryId,
        name: OperatorName,
        source: SourceRef,
        module: Option<String>,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            source,
            module,
            status: OperatorStatus::Active,
            started_at,
            finished_at: None,
        }
    }

    /// Transition to `Finished`, stamping the completion time.
    ///
    /// A second finish is ignored: the first stamp wins.
    pub fn finish(&mut self, at: DateTime<Utc>) {
        if self.status.is_active() {
            self.status = OperatorStatus::Finished;
            self.finished_at = Some(at);
        }
    }

    #[must_use]
    pub fn id(&self) -> EntryId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &OperatorName {
        &self.name
    }

    #[must_use]
    pub fn source(&self) -> &SourceRef {
        &self.source
    }

    #[must_use]
    pub fn module(&self) -> Option<&str> {
        self.module.as_deref()
    }

    #[must_use]
    pub fn status(&self) -> OperatorStatus {
        self.status
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// How long the operator has run: up to `now` while active, otherwise
    /// its recorded lifetime.
    #[must_use]
    pub fn running_for(&self, now: DateTime<Utc>) -> Duration {
        self.finished_at.unwrap_or(now) - self.started_at
    }
}

// ============================================================================
// Autosave Elapsed Time
// ============================================================================

/// Time since the host's last autosave, with an explicit "never" sentinel.
///
/// "No autosave yet this session" is normal state, not an error, so it gets
/// a variant rather than an `Option` or a `Result`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinceAutosave {
    Never,
    Elapsed(Duration),
}

impl SinceAutosave {
    #[must_use]
    pub fn is_never(self) -> bool {
        matches!(self, SinceAutosave::Never)
    }

    /// Elapsed whole seconds, if an autosave has happened.
    #[must_use]
    pub fn seconds(self) -> Option<i64> {
        match self {
            SinceAutosave::Never => None,
            SinceAutosave::Elapsed(elapsed) => Some(elapsed.num_seconds()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
