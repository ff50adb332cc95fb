//! Timing module - per-frame accumulators for gravity, lock delay, DAS and soft drop
//!
//! Every mechanic that repeats over time is an explicit millisecond accumulator advanced by
//! the frame delta the caller passes in. Nothing here reads a clock or schedules callbacks,
//! so a session driven with the same deltas always behaves the same way.
//!
//! Comparisons: auto-drop, DAS, auto-repeat, soft drop and the instant-lock threshold fire
//! when their accumulator strictly exceeds the interval. The lock delay fires once the lock
//! timer reaches the delay.

use crate::types::{Direction, Timing};

/// Per-session timers (`drop_counter`, `lock_timer`, `das_timer`, `move_timer`, `down_timer`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimingController {
    timing: Timing,
    drop_counter: u32,
    lock_timer: u32,
    das_timer: u32,
    move_timer: u32,
    down_timer: u32,
    shift: Option<Direction>,
    down_held: bool,
}

impl TimingController {
    pub fn new(timing: Timing) -> Self {
        Self {
            timing,
            drop_counter: 0,
            lock_timer: 0,
            das_timer: 0,
            move_timer: 0,
            down_timer: 0,
            shift: None,
            down_held: false,
        }
    }

    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    /// Accumulate gravity time; true when a drop step is due.
    ///
    /// The counter is cleared by [`reset_drop`](Self::reset_drop), which every drop step
    /// calls.
    pub fn advance_drop(&mut self, dt: u32) -> bool {
        self.drop_counter = self.drop_counter.saturating_add(dt);
        self.drop_counter > self.timing.drop_interval
    }

    pub fn reset_drop(&mut self) {
        self.drop_counter = 0;
    }

    /// Accumulate grounded time; true once the lock delay has been reached.
    pub fn advance_lock(&mut self, dt: u32) -> bool {
        self.lock_timer = self.lock_timer.saturating_add(dt);
        self.lock_timer >= self.timing.lock_delay
    }

    pub fn lock_elapsed(&self) -> u32 {
        self.lock_timer
    }

    /// Restore a persisted lock timer
    pub fn set_lock_elapsed(&mut self, elapsed: u32) {
        self.lock_timer = elapsed;
    }

    pub fn reset_lock(&mut self) {
        self.lock_timer = 0;
    }

    /// A horizontal key went down. Switching direction restarts both DAS and repeat timers.
    pub fn start_shift(&mut self, direction: Direction) {
        self.shift = Some(direction);
        self.das_timer = 0;
        self.move_timer = 0;
    }

    /// A horizontal key went up. Releasing a direction that is no longer the held one
    /// (the opposite key took over) is ignored.
    pub fn stop_shift(&mut self, direction: Direction) {
        if self.shift == Some(direction) {
            self.shift = None;
            self.das_timer = 0;
            self.move_timer = 0;
        }
    }

    pub fn shift_direction(&self) -> Option<Direction> {
        self.shift
    }

    /// Accumulate DAS and repeat time; returns the direction when an auto-repeat move is due.
    pub fn advance_shift(&mut self, dt: u32) -> Option<Direction> {
        let direction = self.shift?;
        self.das_timer = self.das_timer.saturating_add(dt);
        self.move_timer = self.move_timer.saturating_add(dt);
        if self.das_timer > self.timing.das_delay && self.move_timer > self.timing.move_interval
        {
            self.move_timer = 0;
            return Some(direction);
        }
        None
    }

    pub fn start_soft_drop(&mut self) {
        self.down_held = true;
        self.down_timer = 0;
    }

    pub fn stop_soft_drop(&mut self) {
        self.down_held = false;
        self.down_timer = 0;
    }

    pub fn is_soft_dropping(&self) -> bool {
        self.down_held
    }

    /// Accumulate soft-drop time; true (and the timer restarts) when a soft-drop step is due.
    pub fn advance_soft_drop(&mut self, dt: u32) -> bool {
        if !self.down_held {
            return false;
        }
        self.down_timer = self.down_timer.saturating_add(dt);
        if self.down_timer > self.timing.soft_drop_interval {
            self.down_timer = 0;
            return true;
        }
        false
    }

    /// Soft drop is held and the piece has been grounded past the instant-lock threshold
    pub fn instant_lock_due(&self) -> bool {
        self.down_held && self.lock_timer > self.timing.instant_lock
    }

    /// Clear the gravity and lock accumulators. Held keys stay held.
    pub fn reset_counters(&mut self) {
        self.drop_counter = 0;
        self.lock_timer = 0;
        self.down_timer = 0;
    }
}

impl Default for TimingController {
    fn default() -> Self {
        Self::new(Timing::default())
    }
}

/// Turns host timestamps into frame deltas.
///
/// The first frame after creation or [`pause`](Self::pause) reports a zero delta and sets
/// the baseline, so time spent paused never reaches the session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameClock {
    last: Option<u64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self { last: None }
    }

    /// Milliseconds since the previous frame
    pub fn frame(&mut self, now_ms: u64) -> u32 {
        let dt = match self.last {
            Some(last) => now_ms.saturating_sub(last).min(u32::MAX as u64) as u32,
            None => 0,
        };
        self.last = Some(now_ms);
        dt
    }

    /// Forget the baseline; the next frame starts from zero.
    pub fn pause(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_fires_strictly_after_interval() {
        let mut t = TimingController::default();
        assert!(!t.advance_drop(400));
        assert!(t.advance_drop(1));
        t.reset_drop();
        assert!(!t.advance_drop(16));
    }

    #[test]
    fn test_lock_fires_on_boundary() {
        let mut t = TimingController::default();
        assert!(!t.advance_lock(999));
        assert!(t.advance_lock(1));
        assert_eq!(t.lock_elapsed(), 1000);
        t.reset_lock();
        assert_eq!(t.lock_elapsed(), 0);
    }

    #[test]
    fn test_das_then_repeat() {
        let mut t = TimingController::default();
        t.start_shift(Direction::Left);
        // DAS not yet passed.
        assert_eq!(t.advance_shift(100), None);
        assert_eq!(t.advance_shift(50), None);
        // 160ms held: past DAS, and the repeat timer (160) is past the interval.
        assert_eq!(t.advance_shift(10), Some(Direction::Left));
        assert_eq!(t.advance_shift(50), None);
        assert_eq!(t.advance_shift(1), Some(Direction::Left));
    }

    #[test]
    fn test_opposite_press_restarts_das() {
        let mut t = TimingController::default();
        t.start_shift(Direction::Left);
        assert_eq!(t.advance_shift(200), Some(Direction::Left));
        t.start_shift(Direction::Right);
        assert_eq!(t.advance_shift(100), None);
        // Releasing the stale direction keeps the new one.
        t.stop_shift(Direction::Left);
        assert_eq!(t.shift_direction(), Some(Direction::Right));
        t.stop_shift(Direction::Right);
        assert_eq!(t.shift_direction(), None);
        assert_eq!(t.advance_shift(1000), None);
    }

    #[test]
    fn test_soft_drop_steps() {
        let mut t = TimingController::default();
        assert!(!t.advance_soft_drop(100));
        t.start_soft_drop();
        assert!(!t.advance_soft_drop(50));
        assert!(t.advance_soft_drop(1));
        assert!(!t.advance_soft_drop(1));
        t.stop_soft_drop();
        assert!(!t.is_soft_dropping());
    }

    #[test]
    fn test_instant_lock_needs_soft_drop() {
        let mut t = TimingController::default();
        t.advance_lock(150);
        assert!(!t.instant_lock_due());
        t.start_soft_drop();
        assert!(t.instant_lock_due());
        t.reset_lock();
        t.advance_lock(100);
        assert!(!t.instant_lock_due());
    }

    #[test]
    fn test_frame_clock_pause_drops_baseline() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.frame(1_000), 0);
        assert_eq!(clock.frame(1_016), 16);
        clock.pause();
        assert_eq!(clock.frame(90_000), 0);
        assert_eq!(clock.frame(90_017), 17);
        // A clock that goes backwards never yields a negative delta.
        assert_eq!(clock.frame(89_000), 0);
    }
}
