//! Snapshot module - the persisted form of a session
//!
//! A [`Snapshot`] is plain serde data using the camelCase field names of the save file.
//! Every field has a default, so a partial save still deserializes; what is mandatory is
//! checked afterwards by [`Snapshot::arena`] and [`Snapshot::player`], which rebuild the
//! typed core values or report a [`SnapshotError`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::arena::{Arena, Row};
use crate::pieces::{PieceShape, MAX_PIECE_SIZE};
use crate::player::PlayerPiece;
use crate::types::{Cell, PieceKind, Settings, ARENA_HEIGHT, ARENA_WIDTH, EMPTY, MAX_CELL};

/// Matrix origin of the active piece
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

/// The active piece as stored: its current (rotated) matrix and position
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSnapshot {
    pub matrix: Vec<Vec<Cell>>,
    pub pos: Position,
}

/// Full session state as written by the persistence port
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Snapshot {
    /// Arena rows, top row first
    pub arena: Vec<Vec<Cell>>,
    pub player: Option<PlayerSnapshot>,
    pub held_piece: Option<PieceKind>,
    pub hold_used: bool,
    /// Upcoming pieces, head first
    pub piece_bag: Vec<PieceKind>,
    pub last_piece: Option<PieceKind>,
    pub score: u32,
    pub is_touching_ground: bool,
    pub lock_timer: u32,
    pub settings: Settings,
}

/// Why a snapshot cannot be restored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotError {
    /// No active piece matrix
    MissingPiece,
    /// The piece matrix is not a square, single-colored tetromino matrix
    BadMatrix,
    /// The arena does not have the expected dimensions
    BadArena { rows: usize, cols: usize },
    /// A cell outside 0-7
    BadCell(Cell),
    /// The piece origin is too far outside the arena for any cell to land in it
    BadPosition { x: i32, y: i32 },
    /// The active piece overlaps the arena contents or leaves the arena
    Collides,
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::MissingPiece => write!(f, "snapshot has no active piece"),
            SnapshotError::BadMatrix => write!(f, "snapshot piece matrix is malformed"),
            SnapshotError::BadArena { rows, cols } => write!(
                f,
                "snapshot arena is {}x{}, expected {}x{}",
                cols, rows, ARENA_WIDTH, ARENA_HEIGHT
            ),
            SnapshotError::BadCell(v) => write!(f, "snapshot contains invalid cell value {}", v),
            SnapshotError::BadPosition { x, y } => {
                write!(f, "snapshot piece position ({}, {}) is out of range", x, y)
            }
            SnapshotError::Collides => write!(f, "snapshot piece collides with the arena"),
        }
    }
}

impl std::error::Error for SnapshotError {}

impl Snapshot {
    /// Rebuild the arena grid
    pub fn arena(&self) -> Result<Arena, SnapshotError> {
        let bad_dims = SnapshotError::BadArena {
            rows: self.arena.len(),
            cols: self.arena.first().map_or(0, Vec::len),
        };
        if self.arena.len() != ARENA_HEIGHT {
            return Err(bad_dims);
        }

        let mut rows = [[EMPTY; ARENA_WIDTH]; ARENA_HEIGHT];
        for (dst, src) in rows.iter_mut().zip(&self.arena) {
            let row: Row = src.as_slice().try_into().map_err(|_| bad_dims)?;
            if let Some(&bad) = row.iter().find(|&&c| c > MAX_CELL) {
                return Err(SnapshotError::BadCell(bad));
            }
            *dst = row;
        }
        Ok(Arena::from_rows(rows))
    }

    /// Rebuild the active piece.
    ///
    /// The position only has to be near the arena here; overlap is checked on restore.
    pub fn player(&self) -> Result<PlayerPiece, SnapshotError> {
        let player = self.player.as_ref().ok_or(SnapshotError::MissingPiece)?;
        if player.matrix.is_empty() {
            return Err(SnapshotError::MissingPiece);
        }
        let shape = PieceShape::from_rows(&player.matrix).ok_or(SnapshotError::BadMatrix)?;
        let Position { x, y } = player.pos;
        let reach = MAX_PIECE_SIZE as i32;
        let x_ok = (-reach..=ARENA_WIDTH as i32).contains(&x);
        let y_ok = (-reach..=ARENA_HEIGHT as i32).contains(&y);
        if !(x_ok && y_ok) {
            return Err(SnapshotError::BadPosition { x, y });
        }
        Ok(PlayerPiece::new(shape, player.pos.x, player.pos.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Snapshot {
        let t = PieceShape::new(PieceKind::T);
        Snapshot {
            arena: vec![vec![0; ARENA_WIDTH]; ARENA_HEIGHT],
            player: Some(PlayerSnapshot {
                matrix: t.to_rows(),
                pos: Position { x: 4, y: 3 },
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_snapshot_rebuilds() {
        let snap = valid();
        assert!(snap.arena().unwrap().is_empty());
        let player = snap.player().unwrap();
        assert_eq!(player.kind(), PieceKind::T);
        assert_eq!((player.x(), player.y()), (4, 3));
    }

    #[test]
    fn test_out_of_range_position_is_rejected() {
        for (x, y) in [(4, i32::MAX), (i32::MIN, 3), (4, -5), (11, 3)] {
            let mut snap = valid();
            if let Some(player) = snap.player.as_mut() {
                player.pos = Position { x, y };
            }
            assert_eq!(snap.player(), Err(SnapshotError::BadPosition { x, y }));
        }

        // Edges are still accepted; the collision check decides those.
        let mut snap = valid();
        if let Some(player) = snap.player.as_mut() {
            player.pos = Position { x: -4, y: ARENA_HEIGHT as i32 };
        }
        assert!(snap.player().is_ok());
    }

    #[test]
    fn test_non_tetromino_matrix_is_rejected() {
        let mut snap = valid();
        if let Some(player) = snap.player.as_mut() {
            player.matrix = vec![vec![5]];
        }
        assert_eq!(snap.player(), Err(SnapshotError::BadMatrix));
    }

    #[test]
    fn test_missing_player_matrix() {
        let mut snap = valid();
        snap.player = None;
        assert_eq!(snap.player(), Err(SnapshotError::MissingPiece));

        let snap: Snapshot = serde_json::from_str(r#"{"player":{"pos":{"x":1,"y":2}}}"#).unwrap();
        assert_eq!(snap.player(), Err(SnapshotError::MissingPiece));
    }

    #[test]
    fn test_bad_arena_dimensions() {
        let mut snap = valid();
        snap.arena.pop();
        assert!(matches!(snap.arena(), Err(SnapshotError::BadArena { rows: 21, .. })));

        let mut snap = valid();
        snap.arena[5].push(0);
        assert!(matches!(snap.arena(), Err(SnapshotError::BadArena { .. })));
    }

    #[test]
    fn test_bad_cell_value() {
        let mut snap = valid();
        snap.arena[20][3] = 9;
        assert_eq!(snap.arena(), Err(SnapshotError::BadCell(9)));
    }

    #[test]
    fn test_camel_case_field_names() {
        let json = serde_json::to_value(valid()).unwrap();
        assert!(json.get("pieceBag").is_some());
        assert!(json.get("isTouchingGround").is_some());
        assert!(json.get("lockTimer").is_some());
        assert!(json["settings"].get("instantSoftDropLock").is_some());
    }

    #[test]
    fn test_error_display() {
        let msg = SnapshotError::BadArena { rows: 20, cols: 10 }.to_string();
        assert_eq!(msg, "snapshot arena is 10x20, expected 10x22");
    }
}
