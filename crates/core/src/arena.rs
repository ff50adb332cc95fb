//! Arena module - the persistent grid of locked cells
//!
//! The arena is a 10x22 grid: 18 visible rows below 4 hidden buffer rows.
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..21 (top to bottom).
//! The grid is only ever mutated by [`Arena::merge`], [`Arena::sweep`] and [`Arena::reset`];
//! it is never resized.

use crate::player::PlayerPiece;
use crate::pieces::PieceShape;
use crate::types::{Cell, ARENA_HEIGHT, ARENA_WIDTH, DANGER_ROW, EMPTY};

/// A row of the arena
pub type Row = [Cell; ARENA_WIDTH];

/// Result of merging a piece into the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeOutcome {
    /// At least one merged cell landed above the danger row
    pub above_danger_line: bool,
}

/// The game arena - rows of cells, top row first
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Arena {
    rows: [Row; ARENA_HEIGHT],
}

impl Arena {
    /// Create a new empty arena
    pub fn new() -> Self {
        Self {
            rows: [[EMPTY; ARENA_WIDTH]; ARENA_HEIGHT],
        }
    }

    /// Create an arena from full row data
    pub fn from_rows(rows: [Row; ARENA_HEIGHT]) -> Self {
        Self { rows }
    }

    pub fn width(&self) -> usize {
        ARENA_WIDTH
    }

    pub fn height(&self) -> usize {
        ARENA_HEIGHT
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        if self.is_out_of_bounds(x, y) {
            return None;
        }
        Some(self.rows[y as usize][x as usize])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        if self.is_out_of_bounds(x, y) {
            return false;
        }
        self.rows[y as usize][x as usize] = cell;
        true
    }

    pub fn is_out_of_bounds(&self, x: i32, y: i32) -> bool {
        x < 0 || x >= ARENA_WIDTH as i32 || y < 0 || y >= ARENA_HEIGHT as i32
    }

    /// A cell is blocked when it is filled or outside the arena (the boundary is a wall).
    pub fn is_blocked(&self, x: i32, y: i32) -> bool {
        !matches!(self.get(x, y), Some(EMPTY))
    }

    pub fn rows(&self) -> &[Row; ARENA_HEIGHT] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|row| row.iter().all(|&c| c == EMPTY))
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        self.rows
            .get(y)
            .is_some_and(|row| row.iter().all(|&c| c != EMPTY))
    }

    /// Would `shape` with its origin at (x, y) overlap a filled cell or leave the arena?
    ///
    /// Empty matrix cells never collide.
    pub fn collides_at(&self, shape: &PieceShape, x: i32, y: i32) -> bool {
        shape
            .filled()
            .any(|(dx, dy, _)| self.is_blocked(x + dx, y + dy))
    }

    pub fn collides(&self, piece: &PlayerPiece) -> bool {
        self.collides_at(piece.shape(), piece.x(), piece.y())
    }

    /// Write every filled cell of the piece into the arena.
    ///
    /// Cells that fall outside the arena are skipped. Landing above the danger row is
    /// reported rather than treated as an error; it is the game-over trigger.
    pub fn merge(&mut self, piece: &PlayerPiece) -> MergeOutcome {
        let mut above_danger_line = false;
        for (dx, dy, value) in piece.shape().filled() {
            let x = piece.x() + dx;
            let y = piece.y() + dy;
            if self.set(x, y, value) && (y as usize) < DANGER_ROW {
                above_danger_line = true;
            }
        }
        MergeOutcome { above_danger_line }
    }

    /// Remove all full rows and return how many were removed.
    ///
    /// Scans bottom to top with a read and a write cursor: rows that are not full move down
    /// to the write cursor, keeping their relative order, and the rows left over at the top
    /// are cleared.
    pub fn sweep(&mut self) -> usize {
        let mut write_y = ARENA_HEIGHT;
        for read_y in (0..ARENA_HEIGHT).rev() {
            if self.is_row_full(read_y) {
                continue;
            }
            write_y -= 1;
            if write_y != read_y {
                self.rows[write_y] = self.rows[read_y];
            }
        }

        for row in &mut self.rows[..write_y] {
            *row = [EMPTY; ARENA_WIDTH];
        }
        write_y
    }

    /// Clear the entire arena
    pub fn reset(&mut self) {
        for row in &mut self.rows {
            *row = [EMPTY; ARENA_WIDTH];
        }
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}
