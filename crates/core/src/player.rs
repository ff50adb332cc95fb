//! Player module - the falling piece
//!
//! A [`PlayerPiece`] is a [`PieceShape`] plus the arena position of its matrix origin
//! (top-left corner). It is replaced wholesale on every spawn.

use crate::arena::Arena;
use crate::pieces::PieceShape;
use crate::types::{PieceKind, ARENA_WIDTH};

/// The active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlayerPiece {
    shape: PieceShape,
    x: i32,
    y: i32,
}

impl PlayerPiece {
    pub fn new(shape: PieceShape, x: i32, y: i32) -> Self {
        Self { shape, x, y }
    }

    /// A fresh piece centered horizontally in the top hidden row
    pub fn spawn(kind: PieceKind) -> Self {
        let shape = PieceShape::new(kind);
        let x = (ARENA_WIDTH / 2) as i32 - (shape.size() / 2) as i32;
        Self { shape, x, y: 0 }
    }

    pub fn kind(&self) -> PieceKind {
        self.shape.kind()
    }

    pub fn shape(&self) -> &PieceShape {
        &self.shape
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    /// Copy of this piece shifted by (dx, dy)
    pub fn shifted(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Move by (dx, dy) unless the target position collides
    pub fn try_shift(&mut self, arena: &Arena, dx: i32, dy: i32) -> bool {
        let next = self.shifted(dx, dy);
        if arena.collides(&next) {
            return false;
        }
        *self = next;
        true
    }

    /// Resting on the floor or on locked cells
    pub fn is_grounded(&self, arena: &Arena) -> bool {
        arena.collides(&self.shifted(0, 1))
    }

    /// Rows the piece can fall before it would collide
    pub fn drop_distance(&self, arena: &Arena) -> u32 {
        let mut distance = 0;
        while !arena.collides(&self.shifted(0, distance as i32 + 1)) {
            distance += 1;
        }
        distance
    }

    /// Where a hard drop would land, without touching the arena
    pub fn ghost(&self, arena: &Arena) -> Self {
        self.shifted(0, self.drop_distance(arena) as i32)
    }

    /// Rotate clockwise, kicking sideways if the rotated matrix collides.
    ///
    /// Kicks move the piece by +1, -2, +3, -4, ... columns from wherever the previous attempt
    /// left it, giving candidate columns x+1, x-1, x+2, x-2, ... The search stops once the
    /// next offset would exceed the matrix width; the piece is then restored unchanged and
    /// `false` is returned.
    pub fn rotate_with_kicks(&mut self, arena: &Arena) -> bool {
        let original = *self;
        self.shape = self.shape.rotated_cw();

        let limit = self.shape.size() as i32;
        let mut offset: i32 = 1;
        while arena.collides(self) {
            self.x += offset;
            offset = -(offset + offset.signum());
            if offset.abs() > limit {
                *self = original;
                return false;
            }
        }
        true
    }
}
