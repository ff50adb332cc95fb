//! Terminal input (host-facing).
//!
//! Maps `crossterm` key events onto [`InputEvent`](types::InputEvent)s for both presses and
//! releases through a configurable [`KeyMap`], and tracks which movement keys are held so that terminals without key-release
//! events still produce the matching stop events (after a timeout).
//!
//! Auto-repeat itself is not done here: the game session runs DAS from its own timers, so
//! this crate only reports when a key goes down and when it comes back up.

pub mod handler;
pub mod map;

pub use trixel_types as types;

pub use handler::InputHandler;
pub use map::{default_keys, parse_key, should_quit, KeyMap};
