//! Core state for Modalwatch: the operator history registry and the
//! autosave baseline it is correlated against.
//!
//! Everything in this crate is synchronous, in-memory, and infallible.
//! Filesystem and host-process concerns live in `modalwatch-host`.

mod autosave;
mod registry;

pub use autosave::{AutosaveState, time_since_last_autosave};
pub use registry::OperatorRegistry;
