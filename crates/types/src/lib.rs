//! Core types module - shared data structures and constants
//!
//! This crate defines the fundamental types used throughout the game: arena dimensions,
//! timing and score constants, piece kinds, input events and the runtime-tunable
//! [`Timing`] / [`Settings`] groups. Everything here is plain data, so it can be used by the
//! simulation core, the terminal front-end and the persistence layer alike.
//!
//! # Arena Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Visible rows**: 18
//! - **Hidden rows**: 4 buffer rows above the visible area, used for spawning
//! - **Total height**: 22 rows (indexed 0-21, top to bottom)
//! - **Danger row**: merging a cell into any row above `HIDDEN_ROWS + 3` ends the game
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DROP_INTERVAL_MS` | 400 | Auto-drop (gravity) interval |
//! | `LOCK_DELAY_MS` | 1000 | Grace period for a grounded piece |
//! | `INSTANT_LOCK_MS` | 100 | Grounded time after which a held soft drop locks |
//! | `DAS_DELAY_MS` | 150 | Delay before a held direction auto-repeats |
//! | `MOVE_INTERVAL_MS` | 50 | Interval between auto-repeated moves |
//! | `SOFT_DROP_INTERVAL_MS` | 50 | Interval between soft-drop steps |
//!
//! # Scoring
//!
//! | Constant | Value | Awarded |
//! |----------|-------|---------|
//! | `SCORE_DROP` | 1 | per cell descended by auto-drop or soft drop |
//! | `SCORE_HARD_DROP` | 3 | per cell descended by a hard drop |
//! | `SCORE_LANDING` | 10 | once per locked piece |
//! | `SCORE_LINE_CLEAR` | 75 | per line removed by a sweep |
//!
//! # Examples
//!
//! ```
//! use trixel_types::{InputEvent, KeyAction, PieceKind, ARENA_HEIGHT, ARENA_WIDTH};
//!
//! let piece = PieceKind::T;
//! assert_eq!(piece.color(), 1);
//! assert_eq!(PieceKind::from_color(1), Some(PieceKind::T));
//!
//! assert_eq!(KeyAction::HardDrop.press_event(), InputEvent::HardDrop);
//! assert_eq!(KeyAction::HardDrop.release_event(), None);
//!
//! assert_eq!(ARENA_WIDTH, 10);
//! assert_eq!(ARENA_HEIGHT, 22);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Arena width in cells (10 columns)
pub const ARENA_WIDTH: usize = 10;

/// Rows visible to the player
pub const VISIBLE_ROWS: usize = 18;

/// Buffer rows above the visible area
pub const HIDDEN_ROWS: usize = 4;

/// Total arena height in cells
pub const ARENA_HEIGHT: usize = VISIBLE_ROWS + HIDDEN_ROWS;

/// Merging a cell into a row strictly above this index is a game over.
pub const DANGER_ROW: usize = HIDDEN_ROWS + 3;

/// Number of upcoming pieces the preview shows
pub const PREVIEW_LEN: usize = 5;

/// Number of upcoming pieces kept in the bag queue
pub const BAG_LEN: usize = 7;

/// Auto-drop interval (one row every 400ms)
pub const DROP_INTERVAL_MS: u32 = 400;

/// Lock delay once a piece touches the ground
pub const LOCK_DELAY_MS: u32 = 1000;

/// Grounded time after which a held soft drop locks immediately
pub const INSTANT_LOCK_MS: u32 = 100;

/// DAS (delayed auto-shift) delay
pub const DAS_DELAY_MS: u32 = 150;

/// Interval between auto-repeated horizontal moves
pub const MOVE_INTERVAL_MS: u32 = 50;

/// Interval between soft-drop steps while the down key is held
pub const SOFT_DROP_INTERVAL_MS: u32 = 50;

/// Points per cell descended by auto-drop or soft drop
pub const SCORE_DROP: u32 = 1;

/// Points per cell descended by a hard drop
pub const SCORE_HARD_DROP: u32 = 3;

/// Points awarded once for every locked piece
pub const SCORE_LANDING: u32 = 10;

/// Points per line cleared by a single sweep
pub const SCORE_LINE_CLEAR: u32 = 75;

/// A cell on the arena or inside a piece matrix.
///
/// `0` is empty, `1..=7` is the color index of the piece kind that filled it.
pub type Cell = u8;

/// The empty cell value
pub const EMPTY: Cell = 0;

/// Highest valid cell value
pub const MAX_CELL: Cell = 7;

/// The seven tetromino piece kinds
///
/// Each kind has a fixed color index that is written into the arena on merge:
/// T=1, O=2, L=3, J=4, I=5, S=6, Z=7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    T,
    O,
    L,
    J,
    I,
    S,
    Z,
}

impl PieceKind {
    /// All kinds in color-index order
    pub const ALL: [PieceKind; 7] = [
        PieceKind::T,
        PieceKind::O,
        PieceKind::L,
        PieceKind::J,
        PieceKind::I,
        PieceKind::S,
        PieceKind::Z,
    ];

    /// Color index written into the arena (1-7)
    pub fn color(self) -> Cell {
        match self {
            PieceKind::T => 1,
            PieceKind::O => 2,
            PieceKind::L => 3,
            PieceKind::J => 4,
            PieceKind::I => 5,
            PieceKind::S => 6,
            PieceKind::Z => 7,
        }
    }

    /// Inverse of [`PieceKind::color`]
    ///
    /// ```
    /// use trixel_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_color(5), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_color(0), None);
    /// assert_eq!(PieceKind::from_color(8), None);
    /// ```
    pub fn from_color(color: Cell) -> Option<Self> {
        match color {
            1 => Some(PieceKind::T),
            2 => Some(PieceKind::O),
            3 => Some(PieceKind::L),
            4 => Some(PieceKind::J),
            5 => Some(PieceKind::I),
            6 => Some(PieceKind::S),
            7 => Some(PieceKind::Z),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::T => "T",
            PieceKind::O => "O",
            PieceKind::L => "L",
            PieceKind::J => "J",
            PieceKind::I => "I",
            PieceKind::S => "S",
            PieceKind::Z => "Z",
        }
    }
}

/// Horizontal direction of a move or an auto-shift
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Column offset of one step in this direction
    pub fn dx(self) -> i32 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }
}

/// Discrete input events accepted by the game session
///
/// These are decoupled from physical keys; the input layer maps key presses and releases
/// onto them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputEvent {
    /// Move one cell left and start auto-shifting left
    MoveLeft,
    /// Move one cell right and start auto-shifting right
    MoveRight,
    /// The held direction was released
    MoveStop(Direction),
    /// Step down once and keep soft-dropping while held
    SoftDropStart,
    SoftDropStop,
    /// Rotate 90° clockwise with horizontal kicks
    Rotate,
    HardDrop,
    Hold,
    ToggleGhost,
    TogglePreview,
    TogglePause,
    Restart,
}

impl InputEvent {
    /// Key releases carry no gameplay effect of their own and are accepted while paused.
    pub fn is_release(&self) -> bool {
        matches!(self, InputEvent::MoveStop(_) | InputEvent::SoftDropStop)
    }
}

/// A rebindable game action, named as in the `keys` section of the config file
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KeyAction {
    Left,
    Right,
    Down,
    Rotate,
    HardDrop,
    Hold,
    ToggleGhost,
    TogglePreview,
    Pause,
    Restart,
}

impl KeyAction {
    pub const ALL: [KeyAction; 10] = [
        KeyAction::Left,
        KeyAction::Right,
        KeyAction::Down,
        KeyAction::Rotate,
        KeyAction::HardDrop,
        KeyAction::Hold,
        KeyAction::ToggleGhost,
        KeyAction::TogglePreview,
        KeyAction::Pause,
        KeyAction::Restart,
    ];

    /// Event sent when a key bound to this action goes down
    pub fn press_event(self) -> InputEvent {
        match self {
            KeyAction::Left => InputEvent::MoveLeft,
            KeyAction::Right => InputEvent::MoveRight,
            KeyAction::Down => InputEvent::SoftDropStart,
            KeyAction::Rotate => InputEvent::Rotate,
            KeyAction::HardDrop => InputEvent::HardDrop,
            KeyAction::Hold => InputEvent::Hold,
            KeyAction::ToggleGhost => InputEvent::ToggleGhost,
            KeyAction::TogglePreview => InputEvent::TogglePreview,
            KeyAction::Pause => InputEvent::TogglePause,
            KeyAction::Restart => InputEvent::Restart,
        }
    }

    /// Event sent when the key is let go; only held actions have one
    pub fn release_event(self) -> Option<InputEvent> {
        match self {
            KeyAction::Left => Some(InputEvent::MoveStop(Direction::Left)),
            KeyAction::Right => Some(InputEvent::MoveStop(Direction::Right)),
            KeyAction::Down => Some(InputEvent::SoftDropStop),
            _ => None,
        }
    }
}

/// Key names bound to one action in the config file: a single name or a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyNames {
    One(String),
    Many(Vec<String>),
}

impl KeyNames {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let names: &[String] = match self {
            KeyNames::One(name) => std::slice::from_ref(name),
            KeyNames::Many(names) => names,
        };
        names.iter().map(String::as_str)
    }
}

/// Per-action key overrides; actions left out keep their default keys
pub type KeyBindings = BTreeMap<KeyAction, KeyNames>;

/// Runtime-tunable timing values (milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Timing {
    pub drop_interval: u32,
    pub lock_delay: u32,
    pub instant_lock: u32,
    pub das_delay: u32,
    pub move_interval: u32,
    pub soft_drop_interval: u32,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            drop_interval: DROP_INTERVAL_MS,
            lock_delay: LOCK_DELAY_MS,
            instant_lock: INSTANT_LOCK_MS,
            das_delay: DAS_DELAY_MS,
            move_interval: MOVE_INTERVAL_MS,
            soft_drop_interval: SOFT_DROP_INTERVAL_MS,
        }
    }
}

/// Player-facing toggles, persisted with the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Lock a grounded piece early while the soft-drop key is held
    pub instant_soft_drop_lock: bool,
    pub show_preview: bool,
    pub show_ghost: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            instant_soft_drop_lock: true,
            show_preview: true,
            show_ghost: true,
        }
    }
}

/// Event emitted after a piece locks.
///
/// Consumed once by the driver via `take_last_event`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockEvent {
    pub lines_cleared: u32,
    /// Landing bonus plus line-clear points for this lock
    pub score_awarded: u32,
    /// The lock ended the game (danger row or blocked spawn) and the session was reset
    pub game_over: bool,
}
