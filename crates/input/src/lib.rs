//! Terminal input.
//!
//! Maps `crossterm` key events into [`crate::types::GameAction`] and provides
//! a held-key repeat handler that also works in terminals without key-release
//! events.

pub mod handler;
pub mod map;

pub use jatc_types as types;

pub use handler::{repeat_interval_ms, InputHandler};
pub use map::{handle_key_event, should_quit};
