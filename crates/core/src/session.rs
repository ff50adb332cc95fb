//! Session module - the game state machine
//!
//! [`GameSession`] owns every piece of mutable game state: the arena, the active piece, the
//! hold slot, the bag, score and timers. All mutation goes through [`GameSession::handle_input`]
//! and [`GameSession::tick`]; renderers only see the read accessors.
//!
//! # Frame order
//!
//! Each [`tick`](GameSession::tick) runs these steps in order and stops early once a piece
//! locks:
//!
//! 1. Auto-drop (gravity)
//! 2. Grounded check (enter or leave `Locking`, resetting the lock timer either way)
//! 3. Lock delay
//! 4. Horizontal auto-repeat (DAS)
//! 5. Soft drop, including the instant lock while soft-dropping on the ground
//!
//! # Lock order
//!
//! merge, then the danger-row check (game over), then sweep, score, and spawn. A spawn that
//! collides is also a game over. Game over is not a terminal state: the session resets itself
//! immediately, keeping only the best score and settings.

use log::{debug, info};

use crate::arena::Arena;
use crate::bag::PieceBag;
use crate::player::PlayerPiece;
use crate::snapshot::{PlayerSnapshot, Position, Snapshot, SnapshotError};
use crate::timing::TimingController;
use crate::types::{
    Direction, InputEvent, LockEvent, PieceKind, Settings, Timing, SCORE_DROP, SCORE_HARD_DROP,
    SCORE_LANDING, SCORE_LINE_CLEAR,
};

/// Observable phase of the active piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Airborne, driven by gravity
    Falling,
    /// Grounded with the lock timer running
    Locking,
}

/// One running game
#[derive(Debug, Clone)]
pub struct GameSession {
    arena: Arena,
    active: PlayerPiece,
    held: Option<PieceKind>,
    hold_used: bool,
    bag: PieceBag,
    score: u32,
    best_score: u32,
    touching_ground: bool,
    timers: TimingController,
    settings: Settings,
    paused: bool,
    last_event: Option<LockEvent>,
}

impl GameSession {
    /// Start a fresh game
    pub fn new(seed: u32, timing: Timing, settings: Settings) -> Self {
        let mut bag = PieceBag::new(seed);
        let active = PlayerPiece::spawn(bag.next());
        Self {
            arena: Arena::new(),
            active,
            held: None,
            hold_used: false,
            bag,
            score: 0,
            best_score: 0,
            touching_ground: false,
            timers: TimingController::new(timing),
            settings,
            paused: false,
            last_event: None,
        }
    }

    /// Resume a persisted game.
    ///
    /// `seed` only drives pieces drawn after the persisted queue; the queue itself is kept.
    pub fn restore(
        snapshot: Snapshot,
        seed: u32,
        timing: Timing,
    ) -> Result<GameSession, SnapshotError> {
        let arena = snapshot.arena()?;
        let active = snapshot.player()?;
        if arena.collides(&active) {
            return Err(SnapshotError::Collides);
        }

        let mut timers = TimingController::new(timing);
        if snapshot.is_touching_ground {
            timers.set_lock_elapsed(snapshot.lock_timer);
        }

        Ok(Self {
            arena,
            active,
            held: snapshot.held_piece,
            hold_used: snapshot.hold_used,
            bag: PieceBag::from_parts(&snapshot.piece_bag, snapshot.last_piece, seed),
            score: snapshot.score,
            best_score: snapshot.score,
            touching_ground: snapshot.is_touching_ground,
            timers,
            settings: snapshot.settings,
            paused: false,
            last_event: None,
        })
    }

    /// Capture everything needed to resume this game
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            arena: self.arena.rows().iter().map(|row| row.to_vec()).collect(),
            player: Some(PlayerSnapshot {
                matrix: self.active.shape().to_rows(),
                pos: Position {
                    x: self.active.x(),
                    y: self.active.y(),
                },
            }),
            held_piece: self.held,
            hold_used: self.hold_used,
            piece_bag: self.bag.contents().to_vec(),
            last_piece: self.bag.last_piece(),
            score: self.score,
            is_touching_ground: self.touching_ground,
            lock_timer: self.timers.lock_elapsed(),
            settings: self.settings,
        }
    }

    /// Apply one input event; returns whether the game state changed.
    ///
    /// While paused only `TogglePause` and key releases are accepted.
    pub fn handle_input(&mut self, event: InputEvent) -> bool {
        if self.paused && event != InputEvent::TogglePause && !event.is_release() {
            return false;
        }
        match event {
            InputEvent::TogglePause => {
                self.paused = !self.paused;
                info!("{}", if self.paused { "paused" } else { "resumed" });
                true
            }
            InputEvent::MoveStop(direction) => {
                self.timers.stop_shift(direction);
                false
            }
            InputEvent::SoftDropStop => {
                self.timers.stop_soft_drop();
                false
            }
            InputEvent::MoveLeft => self.start_move(Direction::Left),
            InputEvent::MoveRight => self.start_move(Direction::Right),
            InputEvent::SoftDropStart => {
                self.timers.start_soft_drop();
                self.drop_step();
                true
            }
            InputEvent::Rotate => self.rotate(),
            InputEvent::HardDrop => {
                self.hard_drop();
                true
            }
            InputEvent::Hold => self.hold(),
            InputEvent::ToggleGhost => {
                self.settings.show_ghost = !self.settings.show_ghost;
                true
            }
            InputEvent::TogglePreview => {
                self.settings.show_preview = !self.settings.show_preview;
                true
            }
            InputEvent::Restart => {
                self.restart();
                true
            }
        }
    }

    /// Advance the simulation by `dt` milliseconds
    pub fn tick(&mut self, dt: u32) {
        if self.paused {
            return;
        }

        if self.timers.advance_drop(dt) {
            self.drop_step();
        }

        let grounded = self.active.is_grounded(&self.arena);
        if grounded != self.touching_ground {
            self.touching_ground = grounded;
            self.timers.reset_lock();
        }

        if self.touching_ground && self.timers.advance_lock(dt) {
            self.lock_piece();
            return;
        }

        if let Some(direction) = self.timers.advance_shift(dt) {
            self.active.try_shift(&self.arena, direction.dx(), 0);
        }

        if self.timers.is_soft_dropping() {
            let step_due = self.timers.advance_soft_drop(dt);
            if self.settings.instant_soft_drop_lock
                && self.touching_ground
                && self.active.is_grounded(&self.arena)
                && self.timers.instant_lock_due()
            {
                self.lock_piece();
                return;
            }
            if step_due {
                self.drop_step();
            }
        }
    }

    fn start_move(&mut self, direction: Direction) -> bool {
        self.timers.start_shift(direction);
        self.active.try_shift(&self.arena, direction.dx(), 0)
    }

    /// Move down one row (gravity or soft drop), scoring only an actual descent.
    fn drop_step(&mut self) -> bool {
        let moved = self.active.try_shift(&self.arena, 0, 1);
        if moved {
            self.add_score(SCORE_DROP);
            if self.touching_ground {
                self.touching_ground = false;
                self.timers.reset_lock();
            }
        } else if !self.touching_ground {
            self.touching_ground = true;
            self.timers.reset_lock();
        }
        self.timers.reset_drop();
        moved
    }

    fn rotate(&mut self) -> bool {
        if !self.active.rotate_with_kicks(&self.arena) {
            return false;
        }
        if !self.touching_ground && self.active.is_grounded(&self.arena) {
            self.touching_ground = true;
            self.timers.reset_lock();
        }
        true
    }

    fn hard_drop(&mut self) {
        let distance = self.active.drop_distance(&self.arena);
        self.active = self.active.shifted(0, distance as i32);
        self.add_score(distance * SCORE_HARD_DROP);
        self.lock_piece();
    }

    /// Swap the active piece with the hold slot, once per lock cycle
    fn hold(&mut self) -> bool {
        if self.hold_used {
            return false;
        }
        let current = self.active.kind();
        let spawned = match self.held.replace(current) {
            Some(kind) => self.place(kind),
            None => self.spawn(),
        };
        // A game over resets the hold slot; the new game starts with hold available.
        if spawned {
            self.hold_used = true;
        }
        true
    }

    fn lock_piece(&mut self) {
        let outcome = self.arena.merge(&self.active);
        self.add_score(SCORE_LANDING);

        if outcome.above_danger_line {
            self.last_event = Some(LockEvent {
                lines_cleared: 0,
                score_awarded: SCORE_LANDING,
                game_over: true,
            });
            self.game_over();
            return;
        }

        let lines = self.arena.sweep() as u32;
        self.add_score(lines * SCORE_LINE_CLEAR);
        let spawned = self.spawn();

        let event = LockEvent {
            lines_cleared: lines,
            score_awarded: SCORE_LANDING + lines * SCORE_LINE_CLEAR,
            game_over: !spawned,
        };
        debug!("lock: {:?}", event);
        self.last_event = Some(event);
    }

    /// Draw the next piece; false if it could not be placed (the game was reset).
    fn spawn(&mut self) -> bool {
        let kind = self.bag.next();
        self.place(kind)
    }

    fn place(&mut self, kind: PieceKind) -> bool {
        self.active = PlayerPiece::spawn(kind);
        self.hold_used = false;
        self.touching_ground = false;
        self.timers.reset_counters();
        if self.arena.collides(&self.active) {
            self.game_over();
            return false;
        }
        true
    }

    fn game_over(&mut self) {
        self.update_best_score();
        info!("game over: score {}, best {}", self.score, self.best_score);
        self.reset();
    }

    fn restart(&mut self) {
        self.update_best_score();
        info!("restart: score {}, best {}", self.score, self.best_score);
        self.reset();
    }

    fn reset(&mut self) {
        self.arena.reset();
        self.score = 0;
        self.held = None;
        self.hold_used = false;
        self.touching_ground = false;
        self.timers.reset_counters();
        self.bag.reinitialize();
        // Empty arena: the spawn cannot collide.
        self.active = PlayerPiece::spawn(self.bag.next());
    }

    fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
        self.update_best_score();
    }

    fn update_best_score(&mut self) {
        self.best_score = self.best_score.max(self.score);
    }

    /// Raise the best score to a persisted value
    pub fn set_best_score(&mut self, best: u32) {
        self.best_score = self.best_score.max(best);
    }

    /// Take and clear the last lock event.
    pub fn take_last_event(&mut self) -> Option<LockEvent> {
        self.last_event.take()
    }

    pub fn state(&self) -> SessionState {
        if self.touching_ground {
            SessionState::Locking
        } else {
            SessionState::Falling
        }
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn active(&self) -> &PlayerPiece {
        &self.active
    }

    /// Where the active piece would land (pure query)
    pub fn ghost_position(&self) -> PlayerPiece {
        self.active.ghost(&self.arena)
    }

    pub fn preview(&self, n: usize) -> &[PieceKind] {
        self.bag.preview(n)
    }

    pub fn held(&self) -> Option<PieceKind> {
        self.held
    }

    pub fn hold_used(&self) -> bool {
        self.hold_used
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn timing(&self) -> &Timing {
        self.timers.timing()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Fraction of the lock delay used up, 0 while airborne
    pub fn lock_progress(&self) -> f32 {
        if !self.touching_ground {
            return 0.0;
        }
        let delay = self.timers.timing().lock_delay;
        if delay == 0 {
            return 1.0;
        }
        (self.timers.lock_elapsed() as f32 / delay as f32).min(1.0)
    }
}
