//! Key mapping from terminal events to game input events.
//!
//! A [`KeyMap`] is built from the default bindings plus optional per-action overrides from
//! the config file. Key names are matched without regard to case: `"A"` and `"a"` are the
//! same key, and named keys accept both browser-style and short spellings (`"ArrowLeft"`
//! or `"Left"`, `"Escape"` or `"Esc"`, `"Space"` or `" "`).
//!
//! Quitting (`q`, Ctrl-C) is not an action and cannot be rebound; the host checks
//! [`should_quit`] before consulting the map.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::warn;

use crate::types::{InputEvent, KeyAction, KeyBindings};

/// Default key names for an action
pub fn default_keys(action: KeyAction) -> &'static [&'static str] {
    match action {
        KeyAction::Left => &["ArrowLeft", "a"],
        KeyAction::Right => &["ArrowRight", "d"],
        KeyAction::Down => &["ArrowDown", "s"],
        KeyAction::Rotate => &["ArrowUp", "w"],
        KeyAction::HardDrop => &["Space"],
        KeyAction::Hold => &["c"],
        KeyAction::ToggleGhost => &["x"],
        KeyAction::TogglePreview => &["v"],
        KeyAction::Pause => &["p", "Escape"],
        KeyAction::Restart => &["r"],
    }
}

/// Parse a configured key name into the key code it stands for.
///
/// Single characters are folded to lowercase.
pub fn parse_key(name: &str) -> Option<KeyCode> {
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(KeyCode::Char(fold_case(c)));
    }

    let lower = name.to_ascii_lowercase();
    let named = lower.strip_prefix("arrow").unwrap_or(&lower);
    match named {
        "left" => Some(KeyCode::Left),
        "right" => Some(KeyCode::Right),
        "up" => Some(KeyCode::Up),
        "down" => Some(KeyCode::Down),
        "escape" | "esc" => Some(KeyCode::Esc),
        "space" => Some(KeyCode::Char(' ')),
        "enter" => Some(KeyCode::Enter),
        "tab" => Some(KeyCode::Tab),
        _ => None,
    }
}

fn fold_case(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(fold_case(c)),
        other => other,
    }
}

/// Lookup from physical keys to the action they are bound to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMap {
    keys: HashMap<KeyCode, KeyAction>,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::from_bindings(&KeyBindings::new())
    }
}

impl KeyMap {
    /// Build the map from config overrides; actions without an override keep their defaults.
    ///
    /// An empty list unbinds the action. Unknown key names are skipped with a warning. A key
    /// claimed by two actions stays with the first one in [`KeyAction::ALL`] order.
    pub fn from_bindings(bindings: &KeyBindings) -> Self {
        let mut keys = HashMap::new();
        for action in KeyAction::ALL {
            let names: Vec<&str> = match bindings.get(&action) {
                Some(custom) => custom.iter().collect(),
                None => default_keys(action).to_vec(),
            };
            for name in names {
                let Some(code) = parse_key(name) else {
                    warn!("ignoring unknown key {:?} for {:?}", name, action);
                    continue;
                };
                if let Some(taken) = keys.get(&code) {
                    warn!("key {:?} is already bound to {:?}", name, taken);
                    continue;
                }
                keys.insert(code, action);
            }
        }
        Self { keys }
    }

    /// Action bound to a key, if any
    pub fn action(&self, key: KeyEvent) -> Option<KeyAction> {
        self.keys.get(&normalize(key.code)).copied()
    }

    /// Map a key press to an input event.
    ///
    /// Keys held with Ctrl or Alt are never game input.
    pub fn press(&self, key: KeyEvent) -> Option<InputEvent> {
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return None;
        }
        self.action(key).map(KeyAction::press_event)
    }

    /// Map a key release to the matching stop event (held keys only).
    pub fn release(&self, key: KeyEvent) -> Option<InputEvent> {
        self.action(key)?.release_event()
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
