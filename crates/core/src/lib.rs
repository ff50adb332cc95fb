//! Core game logic - pure, deterministic, and testable
//!
//! This crate holds every game rule and all game state. It performs **no I/O**: time comes in
//! as millisecond deltas, input as [`InputEvent`](types::InputEvent)s, and persistence goes
//! through the [`Persistence`] port the host supplies.
//!
//! # Module Structure
//!
//! - [`arena`]: 10x22 grid (18 visible + 4 hidden rows), collision, merge and sweep
//! - [`pieces`]: tetromino matrices and clockwise matrix rotation
//! - [`player`]: the falling piece, movement, ghost projection and wall kicks
//! - [`rng`]: seeded LCG used for every random choice
//! - [`bag`]: shuffled piece queue that never repeats a piece back to back
//! - [`timing`]: drop, lock, DAS and soft-drop accumulators plus [`FrameClock`]
//! - [`session`]: [`GameSession`], the state machine tying it all together
//! - [`snapshot`]: persisted session form and its validation
//! - [`persistence`]: the storage port and an in-memory implementation
//! - [`driver`]: [`GameDriver`], session + clock + persistence
//!
//! # Game Rules
//!
//! - **Spawn**: centered horizontally in the top hidden row; a blocked spawn is a game over
//! - **Rotation**: clockwise only, kicking sideways by +1, -2, +3, ... columns
//! - **Lock delay**: 1000ms on the ground, or 100ms while soft drop is held
//! - **Danger row**: locking any cell above row 7 is a game over
//! - **Hold**: once per locked piece
//! - **Game over**: the session resets in place, keeping the best score
//!
//! # Example
//!
//! ```
//! use trixel_core::GameSession;
//! use trixel_core::types::{InputEvent, Settings, Timing};
//!
//! let mut game = GameSession::new(12345, Timing::default(), Settings::default());
//!
//! game.handle_input(InputEvent::MoveRight);
//! game.handle_input(InputEvent::Rotate);
//! game.handle_input(InputEvent::HardDrop);
//!
//! // Hard drop awards points per cell plus the landing bonus
//! assert!(game.score() > 0);
//!
//! // Drive gravity with frame deltas
//! game.tick(16);
//! ```

pub mod arena;
pub mod bag;
pub mod driver;
pub mod persistence;
pub mod pieces;
pub mod player;
pub mod rng;
pub mod session;
pub mod snapshot;
pub mod timing;

pub use trixel_types as types;

// Re-export commonly used types for convenience
pub use arena::{Arena, MergeOutcome};
pub use bag::PieceBag;
pub use driver::GameDriver;
pub use persistence::{MemoryStore, Persistence};
pub use pieces::{rotate_clockwise, PieceShape};
pub use player::PlayerPiece;
pub use rng::SimpleRng;
pub use session::{GameSession, SessionState};
pub use snapshot::{PlayerSnapshot, Position, Snapshot, SnapshotError};
pub use timing::{FrameClock, TimingController};
