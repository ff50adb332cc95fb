//! End-to-end session tests driven only by inputs and ticks

use trixel::core::{GameSession, PieceShape, PlayerSnapshot, Position, SessionState, Snapshot};
use trixel::types::{
    InputEvent, PieceKind, Settings, Timing, ARENA_HEIGHT, ARENA_WIDTH, SCORE_HARD_DROP,
    SCORE_LANDING,
};

fn new_session(seed: u32) -> GameSession {
    GameSession::new(seed, Timing::default(), Settings::default())
}

/// Empty-arena snapshot with `kind` at `pos` in spawn orientation
fn snapshot_with(kind: PieceKind, x: i32, y: i32) -> Snapshot {
    Snapshot {
        arena: vec![vec![0; ARENA_WIDTH]; ARENA_HEIGHT],
        player: Some(PlayerSnapshot {
            matrix: PieceShape::new(kind).to_rows(),
            pos: Position { x, y },
        }),
        piece_bag: PieceKind::ALL.to_vec(),
        ..Default::default()
    }
}

#[test]
fn test_hard_drop_from_spawn_score() {
    let snapshot = snapshot_with(PieceKind::T, 4, 0);
    let mut session = GameSession::restore(snapshot, 1, Timing::default()).unwrap();

    // T occupies matrix rows 1-2: 19 rows of fall to the floor.
    session.handle_input(InputEvent::HardDrop);
    assert_eq!(session.score(), 19 * SCORE_HARD_DROP + SCORE_LANDING);
    let event = session.take_last_event().unwrap();
    assert_eq!(event.lines_cleared, 0);
    assert!(!event.game_over);
    assert!(session.take_last_event().is_none());
}

#[test]
fn test_hold_is_noop_second_time() {
    let mut session = new_session(5);
    let first = session.active().kind();
    assert!(session.handle_input(InputEvent::Hold));
    assert_eq!(session.held(), Some(first));
    assert!(session.hold_used());

    let active = *session.active();
    let preview = session.preview(5).to_vec();
    assert!(!session.handle_input(InputEvent::Hold));
    assert_eq!(*session.active(), active);
    assert_eq!(session.held(), Some(first));
    assert_eq!(session.preview(5), preview.as_slice());
}

#[test]
fn test_lock_fires_exactly_at_delay() {
    let timing = Timing::default();
    // O resting on the floor: matrix rows 1-2 at arena rows 20-21
    let snapshot = snapshot_with(PieceKind::O, 3, ARENA_HEIGHT as i32 - 3);
    let mut session = GameSession::restore(snapshot, 1, timing).unwrap();

    session.tick(0);
    assert_eq!(session.state(), SessionState::Locking);
    session.tick(timing.lock_delay - 1);
    assert_eq!(session.state(), SessionState::Locking);
    assert!(session.take_last_event().is_none());

    session.tick(1);
    assert!(session.take_last_event().is_some());
    assert_eq!(session.score(), SCORE_LANDING);
    assert_eq!(session.state(), SessionState::Falling);
}

#[test]
fn test_spawn_collision_resets_game() {
    let mut snapshot = snapshot_with(PieceKind::O, 0, ARENA_HEIGHT as i32 - 4);
    // Block the spawn area without touching the landing spot.
    for x in 3..=6 {
        snapshot.arena[1][x] = PieceKind::Z.color();
        snapshot.arena[2][x] = PieceKind::Z.color();
    }
    snapshot.held_piece = Some(PieceKind::I);
    let mut session = GameSession::restore(snapshot, 1, Timing::default()).unwrap();

    session.handle_input(InputEvent::HardDrop);
    let event = session.take_last_event().unwrap();
    assert!(event.game_over);

    assert!(session.arena().is_empty());
    assert_eq!(session.score(), 0);
    assert_eq!(session.held(), None);
    assert!(session.best_score() >= SCORE_HARD_DROP + SCORE_LANDING);
}

#[test]
fn test_gravity_and_soft_drop_play() {
    let mut session = new_session(11);
    let start_y = session.active().y();

    // 400 ms is not enough, the drop timer must exceed the interval.
    session.tick(400);
    assert_eq!(session.active().y(), start_y);
    session.tick(1);
    assert_eq!(session.active().y(), start_y + 1);

    session.handle_input(InputEvent::SoftDropStart);
    assert_eq!(session.active().y(), start_y + 2);
    session.handle_input(InputEvent::SoftDropStop);
    assert_eq!(session.score(), 2);
}

#[test]
fn test_many_hard_drops_never_panic() {
    let mut session = new_session(99);
    for i in 0..500 {
        match i % 4 {
            0 => session.handle_input(InputEvent::MoveLeft),
            1 => session.handle_input(InputEvent::Rotate),
            2 => session.handle_input(InputEvent::MoveRight),
            _ => session.handle_input(InputEvent::HardDrop),
        };
        session.tick(16);
        assert!(!session.arena().collides(session.active()));
        assert!(session.score() <= session.best_score());
    }
}

#[test]
fn test_snapshot_round_trip_through_json() {
    let mut session = new_session(3);
    session.handle_input(InputEvent::HardDrop);
    session.handle_input(InputEvent::Hold);
    session.handle_input(InputEvent::ToggleGhost);

    let json = serde_json::to_string(&session.snapshot()).unwrap();
    assert!(json.contains("\"heldPiece\""));
    assert!(json.contains("\"pieceBag\""));

    let snapshot: Snapshot = serde_json::from_str(&json).unwrap();
    let restored = GameSession::restore(snapshot, 3, Timing::default()).unwrap();
    assert_eq!(restored.arena(), session.arena());
    assert_eq!(restored.active(), session.active());
    assert_eq!(restored.held(), session.held());
    assert_eq!(restored.hold_used(), session.hold_used());
    assert_eq!(restored.score(), session.score());
    assert_eq!(restored.preview(5), session.preview(5));
    assert!(!restored.settings().show_ghost);
}

#[test]
fn test_invalid_snapshots_are_rejected() {
    assert!(GameSession::restore(Snapshot::default(), 1, Timing::default()).is_err());

    let mut short = snapshot_with(PieceKind::T, 4, 5);
    short.arena.pop();
    assert!(GameSession::restore(short, 1, Timing::default()).is_err());

    let mut bad_cell = snapshot_with(PieceKind::T, 4, 5);
    bad_cell.arena[20][0] = 9;
    assert!(GameSession::restore(bad_cell, 1, Timing::default()).is_err());

    let far_away = snapshot_with(PieceKind::T, 4, i32::MAX);
    assert!(GameSession::restore(far_away, 1, Timing::default()).is_err());

    let mut one_cell = snapshot_with(PieceKind::I, 4, 5);
    if let Some(player) = one_cell.player.as_mut() {
        player.matrix = vec![vec![PieceKind::I.color()]];
    }
    assert!(GameSession::restore(one_cell, 1, Timing::default()).is_err());
}
