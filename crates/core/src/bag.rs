//! Bag module - the piece randomizer
//!
//! The bag starts as a shuffled set of all seven kinds (exactly one of each). Every draw
//! takes the head of the queue and then tops the queue back up to seven entries. Each
//! top-up piece is chosen uniformly among the kinds that differ from both the current tail
//! and the piece just drawn, so the queue never holds two equal neighbours and a draw never
//! repeats the previous one.
//!
//! Because the queue is always full after a draw, the preview look-ahead of five is always
//! available.

use arrayvec::ArrayVec;

use crate::rng::SimpleRng;
use crate::types::{PieceKind, BAG_LEN};

/// Upcoming-piece queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceBag {
    queue: ArrayVec<PieceKind, BAG_LEN>,
    last_piece: Option<PieceKind>,
    rng: SimpleRng,
}

impl PieceBag {
    /// Create a bag seeded for a reproducible sequence
    pub fn new(seed: u32) -> Self {
        let mut bag = Self {
            queue: ArrayVec::new(),
            last_piece: None,
            rng: SimpleRng::new(seed),
        };
        bag.reinitialize();
        bag
    }

    /// Rebuild a bag from persisted contents.
    ///
    /// Extra entries are dropped and a short queue is topped up, so the result always
    /// satisfies the preview look-ahead.
    pub fn from_parts(queue: &[PieceKind], last_piece: Option<PieceKind>, seed: u32) -> Self {
        let mut bag = Self {
            queue: queue.iter().copied().take(BAG_LEN).collect(),
            last_piece,
            rng: SimpleRng::new(seed),
        };
        if bag.queue.is_empty() {
            bag.reinitialize();
        } else {
            bag.top_up();
        }
        bag
    }

    /// A uniformly random permutation of all seven kinds (Fisher-Yates)
    pub fn shuffle(&mut self) -> [PieceKind; BAG_LEN] {
        let mut pieces = PieceKind::ALL;
        self.rng.shuffle(&mut pieces);
        pieces
    }

    /// Replace the queue with a fresh shuffle
    pub fn reinitialize(&mut self) {
        self.queue = ArrayVec::from(self.shuffle());
    }

    /// Draw the next piece
    pub fn next(&mut self) -> PieceKind {
        if self.queue.is_empty() {
            self.reinitialize();
        }
        let next = self.queue.remove(0);
        self.last_piece = Some(next);
        self.top_up();
        next
    }

    fn top_up(&mut self) {
        while !self.queue.is_full() {
            let tail = self.queue.last().copied();
            let last = self.last_piece;
            let candidates: ArrayVec<PieceKind, BAG_LEN> = PieceKind::ALL
                .iter()
                .copied()
                .filter(|&k| Some(k) != tail && Some(k) != last)
                .collect();
            let pick = candidates[self.rng.next_range(candidates.len() as u32) as usize];
            self.queue.push(pick);
        }
    }

    /// The next `n` pieces, head first
    pub fn preview(&self, n: usize) -> &[PieceKind] {
        &self.queue[..n.min(self.queue.len())]
    }

    /// The whole queue, head first
    pub fn contents(&self) -> &[PieceKind] {
        &self.queue
    }

    /// The most recently drawn piece
    pub fn last_piece(&self) -> Option<PieceKind> {
        self.last_piece
    }
}

impl Default for PieceBag {
    fn default() -> Self {
        Self::new(1)
    }
}
