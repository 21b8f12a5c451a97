//! Host-boundary collaborators.
//!
//! The registry in `modalwatch-core` is pure in-memory state; everything
//! that touches the outside world lives here:
//!
//! - [`feed`]: decoding the host's notification channel (JSON lines) and
//!   bridging its invocation tokens onto registry entry ids.
//! - [`probe`]: observing autosave artifacts on disk when the host has not
//!   reported a save over the feed.
//! - [`opener`]: the capability interface for "open in editor" / "reveal
//!   in file manager" delegations.

pub mod feed;
pub mod opener;
pub mod probe;

pub use feed::{FeedBridge, FeedError, HostEvent, decode_line};
pub use opener::{FileOpener, OpenError, SystemOpener};
pub use probe::AutosaveProbe;
