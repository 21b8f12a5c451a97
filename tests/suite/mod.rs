//! Integration test suite modules.

mod display;
mod feed_session;
mod lifecycle;
