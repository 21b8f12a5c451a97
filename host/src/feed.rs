//! The host notification channel.
//!
//! The host emits one JSON object per line describing modal-operator
//! lifecycle events and autosave completions. This module decodes those
//! lines and applies them to the registry through a token bridge: the host
//! identifies an invocation by an opaque `token` string, the registry by
//! [`EntryId`]; the bridge owns the mapping so stale finishes (for entries
//! the user already removed) stay harmless no-ops.

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use modalwatch_core::{AutosaveState, OperatorRegistry};
use modalwatch_types::{EntryId, OperatorName, SourceRef};

/// One event from the host, as it appears on the wire.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HostEvent {
    /// A modal operator was invoked.
    OperatorStarted {
        token: String,
        name: String,
        #[serde(default)]
        source_path: Option<PathBuf>,
        #[serde(default)]
        module: Option<String>,
    },
    /// Keep-alive for a running operator. Carries the descriptive fields
    /// optionally so a monitor that attached mid-session can late-join.
    OperatorTick {
        token: String,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        source_path: Option<PathBuf>,
        #[serde(default)]
        module: Option<String>,
    },
    /// A modal operator completed.
    OperatorFinished { token: String },
    /// The host finished writing an autosave file. A missing timestamp
    /// means "just now"; the receiver stamps receipt time.
    AutosaveCompleted {
        #[serde(default)]
        at: Option<DateTime<Utc>>,
    },
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("malformed host event: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Decode one feed line. Blank lines are not events.
pub fn decode_line(line: &str) -> Result<Option<HostEvent>, FeedError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(trimmed)?))
}

/// Maps the host's invocation tokens onto registry entry ids and applies
/// decoded events.
///
/// The host guarantees a token's start precedes its finish; the bridge only
/// learns tokens from starts (or tick late-joins), so a finish for an
/// unknown token means the event predates this monitor and is dropped.
#[derive(Debug, Default)]
pub struct FeedBridge {
    tokens: HashMap<String, EntryId>,
}

impl FeedBridge {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event to the session state.
    pub fn apply(
        &mut self,
        event: HostEvent,
        registry: &mut OperatorRegistry,
        autosave: &mut AutosaveState,
        now: DateTime<Utc>,
    ) {
        match event {
            HostEvent::OperatorStarted {
                token,
                name,
                source_path,
                module,
            } => {
                self.start(token, Some(name), source_path, module, registry, now);
            }
            HostEvent::OperatorTick {
                token,
                name,
                source_path,
                module,
            } => {
                // Known token: liveness only, nothing to update.
                if !self.tokens.contains_key(&token) {
                    self.start(token, name, source_path, module, registry, now);
                }
            }
            HostEvent::OperatorFinished { token } => match self.tokens.remove(&token) {
                Some(id) => registry.record_finish(id, now),
                None => tracing::debug!(%token, "finish for unknown token, ignoring"),
            },
            HostEvent::AutosaveCompleted { at } => {
                autosave.record_reported(at.unwrap_or(now));
            }
        }
    }

    /// Number of live token mappings.
    #[must_use]
    pub fn tracked(&self) -> usize {
        self.tokens.len()
    }

    fn start(
        &mut self,
        token: String,
        name: Option<String>,
        source_path: Option<PathBuf>,
        module: Option<String>,
        registry: &mut OperatorRegistry,
        now: DateTime<Utc>,
    ) {
        if self.tokens.contains_key(&token) {
            tracing::debug!(%token, "start for already-tracked token, ignoring");
            return;
        }

        // Fall back to the token as display name; skip only if both are blank.
        let display = name.filter(|value| !value.trim().is_empty());
        let Ok(name) = OperatorName::new(display.unwrap_or_else(|| token.clone())) else {
            tracing::warn!("operator event with blank token and name, dropping");
            return;
        };

        let id = registry.record_start(name, SourceRef::from(source_path), module, now);
        self.tokens.insert(token, id);
    }
}
