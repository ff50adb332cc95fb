//! Held-key tracking for terminal environments.
//!
//! Terminals with the keyboard enhancement protocol report key releases; most others only
//! report presses (plus OS auto-repeat presses). The handler turns both into a clean
//! press/stop stream:
//!
//! - repeated presses of a key that is already held are swallowed (the session repeats moves
//!   itself)
//! - a real release emits the stop event
//! - until the first real release is seen, a held key that has not been pressed again within
//!   the release timeout is treated as released

use std::time::{Duration, Instant};

use arrayvec::ArrayVec;
use crossterm::event::KeyEvent;

use crate::map::KeyMap;
use crate::types::{Direction, InputEvent};

// Long enough to bridge the initial OS auto-repeat delay, so a held key keeps refreshing
// itself before it times out.
const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u64 = 500;

/// Tracks which movement keys are held.
#[derive(Debug, Clone)]
pub struct InputHandler {
    keys: KeyMap,
    horizontal: Option<Direction>,
    down_held: bool,
    last_key_time: Instant,
    key_release_timeout: Duration,
    release_events_seen: bool,
}

impl InputHandler {
    pub fn new(now: Instant) -> Self {
        Self {
            keys: KeyMap::default(),
            horizontal: None,
            down_held: false,
            last_key_time: now,
            key_release_timeout: Duration::from_millis(DEFAULT_KEY_RELEASE_TIMEOUT_MS),
            release_events_seen: false,
        }
    }

    /// Use custom key bindings instead of the defaults.
    pub fn with_key_map(mut self, keys: KeyMap) -> Self {
        self.keys = keys;
        self
    }

    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.key_release_timeout = Duration::from_millis(timeout_ms);
        self
    }

    pub fn key_release_timeout(&self) -> Duration {
        self.key_release_timeout
    }

    /// Handle a press (or terminal repeat) of `key`.
    pub fn handle_key_press(&mut self, key: KeyEvent, now: Instant) -> Option<InputEvent> {
        let event = self.keys.press(key)?;
        match event {
            InputEvent::MoveLeft | InputEvent::MoveRight => {
                self.last_key_time = now;
                let direction = if event == InputEvent::MoveLeft {
                    Direction::Left
                } else {
                    Direction::Right
                };
                if self.horizontal == Some(direction) {
                    return None;
                }
                self.horizontal = Some(direction);
                Some(event)
            }
            InputEvent::SoftDropStart => {
                self.last_key_time = now;
                if self.down_held {
                    return None;
                }
                self.down_held = true;
                Some(event)
            }
            _ => Some(event),
        }
    }

    /// Handle a real key release.
    pub fn handle_key_release(&mut self, key: KeyEvent) -> Option<InputEvent> {
        self.release_events_seen = true;
        match self.keys.release(key)? {
            InputEvent::MoveStop(direction) if self.horizontal == Some(direction) => {
                self.horizontal = None;
                Some(InputEvent::MoveStop(direction))
            }
            InputEvent::SoftDropStop if self.down_held => {
                self.down_held = false;
                Some(InputEvent::SoftDropStop)
            }
            _ => None,
        }
    }

    /// Stop events for keys whose release timed out.
    pub fn update(&mut self, now: Instant) -> ArrayVec<InputEvent, 2> {
        let mut events = ArrayVec::new();
        if self.release_events_seen
            || now.saturating_duration_since(self.last_key_time) <= self.key_release_timeout
        {
            return events;
        }

        if let Some(direction) = self.horizontal.take() {
            events.push(InputEvent::MoveStop(direction));
        }
        if self.down_held {
            self.down_held = false;
            events.push(InputEvent::SoftDropStop);
        }
        events
    }

    pub fn horizontal(&self) -> Option<Direction> {
        self.horizontal
    }

    pub fn is_down_held(&self) -> bool {
        self.down_held
    }

    /// Forget every held key (e.g. on pause or focus loss).
    pub fn reset(&mut self, now: Instant) -> ArrayVec<InputEvent, 2> {
        self.last_key_time = now;
        let mut events = ArrayVec::new();
        if let Some(direction) = self.horizontal.take() {
            events.push(InputEvent::MoveStop(direction));
        }
        if self.down_held {
            self.down_held = false;
            events.push(InputEvent::SoftDropStop);
        }
        events
    }
}
