//! Pieces tests - matrices, rotation and wall kicks

use proptest::prelude::*;
use trixel::core::pieces::{Matrix, MAX_PIECE_SIZE};
use trixel::core::{rotate_clockwise, Arena, PieceShape, PlayerPiece};
use trixel::types::{PieceKind, ARENA_WIDTH};

#[test]
fn test_rotate_clockwise_3x3() {
    let mut m: Matrix = [[1, 2, 3, 0], [4, 5, 6, 0], [7, 8, 9, 0], [0, 0, 0, 0]];
    rotate_clockwise(&mut m, 3);
    assert_eq!(m, [[7, 4, 1, 0], [8, 5, 2, 0], [9, 6, 3, 0], [0, 0, 0, 0]]);
}

#[test]
fn test_spawned_pieces_fit_in_empty_arena() {
    let arena = Arena::new();
    for kind in PieceKind::ALL {
        let piece = PlayerPiece::spawn(kind);
        assert!(!arena.collides(&piece), "{:?}", kind);
        assert!(piece.x() >= 0 && piece.x() < ARENA_WIDTH as i32);
    }
}

#[test]
fn test_rotation_next_to_left_wall_kicks_right() {
    let arena = Arena::new();
    // Vertical I in column 0 (matrix column 2, origin x = -2)
    let vertical = PieceShape::new(PieceKind::I).rotated_cw();
    let mut i = PlayerPiece::new(vertical, -2, 10);
    assert!(!arena.collides(&i));
    assert!(i.rotate_with_kicks(&arena));
    assert!(!arena.collides(&i));
    assert!(i.x() >= 0);
}

proptest! {
    #[test]
    fn four_rotations_are_identity(
        cells in prop::array::uniform4(prop::array::uniform4(0u8..8)),
        size in 1usize..=MAX_PIECE_SIZE,
    ) {
        let mut m: Matrix = cells;
        for row in m.iter_mut() {
            for (x, v) in row.iter_mut().enumerate() {
                if x >= size {
                    *v = 0;
                }
            }
        }
        for row in m.iter_mut().skip(size) {
            *row = [0; MAX_PIECE_SIZE];
        }
        let original = m;
        for _ in 0..4 {
            rotate_clockwise(&mut m, size);
        }
        prop_assert_eq!(m, original);
    }

    #[test]
    fn rotation_preserves_kind_and_cell_count(
        kind in prop::sample::select(PieceKind::ALL.to_vec()),
        turns in 0usize..8,
    ) {
        let mut shape = PieceShape::new(kind);
        for _ in 0..turns {
            shape = shape.rotated_cw();
        }
        prop_assert_eq!(shape.kind(), kind);
        prop_assert_eq!(shape.filled().count(), 4);
        prop_assert_eq!(PieceShape::from_rows(&shape.to_rows()), Some(shape));
    }
}
