//! Terminal front-end.
//!
//! A small, game-oriented rendering layer: [`GameView`] draws the session's render accessors
//! into an off-screen [`Frame`], and [`TerminalRenderer`] flushes frames to the terminal with
//! crossterm, writing only what changed.
//!
//! - Keeps `trixel-core` free of any terminal concerns
//! - Two terminal columns per arena cell by default, to keep cells roughly square

pub mod frame;
pub mod game_view;
pub mod renderer;

pub use trixel_core as core;
pub use trixel_types as types;

pub use frame::{Frame, Glyph, Rgb, Style};
pub use game_view::{piece_color, GameView, Viewport};
pub use renderer::{encode_into, TerminalRenderer};
