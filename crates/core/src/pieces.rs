//! Pieces module - tetromino matrices and matrix rotation
//!
//! Every piece is a small square matrix of cell values: 3x3 for T, L, J, S and Z, 4x4 for
//! I and O. Non-zero entries carry the piece's color index. The spawn orientation of every
//! matrix leaves its top row empty.
//!
//! Rotation is the plain matrix rotation (transpose, then reverse each row), so the piece
//! kind never changes and four clockwise turns give back the original matrix.

use crate::types::{Cell, PieceKind, EMPTY, MAX_CELL};

/// Largest matrix side used by any piece
pub const MAX_PIECE_SIZE: usize = 4;

/// Backing storage for a piece matrix; only the leading `size x size` block is used.
pub type Matrix = [[Cell; MAX_PIECE_SIZE]; MAX_PIECE_SIZE];

/// A piece matrix in its current orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceShape {
    kind: PieceKind,
    size: usize,
    cells: Matrix,
}

impl PieceShape {
    /// Spawn orientation of a piece kind
    pub fn new(kind: PieceKind) -> Self {
        let c = kind.color();
        let (size, cells) = match kind {
            PieceKind::T => (3, [[0, 0, 0, 0], [c, c, c, 0], [0, c, 0, 0], [0, 0, 0, 0]]),
            PieceKind::L => (3, [[0, 0, 0, 0], [c, c, c, 0], [c, 0, 0, 0], [0, 0, 0, 0]]),
            PieceKind::J => (3, [[0, 0, 0, 0], [c, c, c, 0], [0, 0, c, 0], [0, 0, 0, 0]]),
            PieceKind::S => (3, [[0, 0, 0, 0], [0, c, c, 0], [c, c, 0, 0], [0, 0, 0, 0]]),
            PieceKind::Z => (3, [[0, 0, 0, 0], [c, c, 0, 0], [0, c, c, 0], [0, 0, 0, 0]]),
            PieceKind::I => (4, [[0, 0, 0, 0], [c, c, c, c], [0, 0, 0, 0], [0, 0, 0, 0]]),
            PieceKind::O => (4, [[0, 0, 0, 0], [0, c, c, 0], [0, c, c, 0], [0, 0, 0, 0]]),
        };
        Self { kind, size, cells }
    }

    /// Rebuild a shape from a row-major matrix (e.g. a persisted one).
    ///
    /// Returns `None` unless the matrix is one of the four orientations of the piece its
    /// color names, at that piece's matrix size.
    pub fn from_rows(rows: &[Vec<Cell>]) -> Option<Self> {
        let size = rows.len();
        if size == 0 || size > MAX_PIECE_SIZE || rows.iter().any(|r| r.len() != size) {
            return None;
        }

        let mut cells = [[EMPTY; MAX_PIECE_SIZE]; MAX_PIECE_SIZE];
        let mut color = None;
        for (y, row) in rows.iter().enumerate() {
            for (x, &v) in row.iter().enumerate() {
                if v == EMPTY {
                    continue;
                }
                if v > MAX_CELL || color.is_some_and(|c| c != v) {
                    return None;
                }
                color = Some(v);
                cells[y][x] = v;
            }
        }

        let kind = PieceKind::from_color(color?)?;
        let candidate = Self { kind, size, cells };
        std::iter::successors(Some(Self::new(kind)), |s| Some(s.rotated_cw()))
            .take(4)
            .any(|orientation| orientation == candidate)
            .then_some(candidate)
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    /// Side length of the matrix
    pub fn size(&self) -> usize {
        self.size
    }

    /// Cell at matrix coordinates, empty outside the matrix
    pub fn get(&self, x: usize, y: usize) -> Cell {
        if x >= self.size || y >= self.size {
            return EMPTY;
        }
        self.cells[y][x]
    }

    /// Filled cells as `(x, y, value)` in matrix coordinates
    pub fn filled(&self) -> impl Iterator<Item = (i32, i32, Cell)> + '_ {
        (0..self.size).flat_map(move |y| {
            (0..self.size).filter_map(move |x| {
                let v = self.cells[y][x];
                (v != EMPTY).then_some((x as i32, y as i32, v))
            })
        })
    }

    /// The matrix as row vectors (for persistence and debugging)
    pub fn to_rows(&self) -> Vec<Vec<Cell>> {
        (0..self.size)
            .map(|y| self.cells[y][..self.size].to_vec())
            .collect()
    }

    /// This shape turned 90° clockwise
    pub fn rotated_cw(&self) -> Self {
        let mut next = *self;
        rotate_clockwise(&mut next.cells, self.size);
        next
    }
}

/// Rotate the leading `size x size` block of a matrix 90° clockwise in place.
///
/// Transposes the block, then reverses each of its rows.
pub fn rotate_clockwise(matrix: &mut Matrix, size: usize) {
    let size = size.min(MAX_PIECE_SIZE);
    for y in 0..size {
        for x in 0..y {
            let tmp = matrix[y][x];
            matrix[y][x] = matrix[x][y];
            matrix[x][y] = tmp;
        }
    }
    for row in matrix.iter_mut().take(size) {
        row[..size].reverse();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_piece_has_four_cells_of_its_color() {
        for kind in PieceKind::ALL {
            let shape = PieceShape::new(kind);
            let cells: Vec<_> = shape.filled().collect();
            assert_eq!(cells.len(), 4, "{:?}", kind);
            assert!(cells.iter().all(|&(_, _, v)| v == kind.color()));
        }
    }

    #[test]
    fn spawn_orientation_leaves_top_row_empty() {
        for kind in PieceKind::ALL {
            let shape = PieceShape::new(kind);
            assert!(shape.filled().all(|(_, y, _)| y > 0), "{:?}", kind);
        }
    }

    #[test]
    fn matrix_sizes() {
        assert_eq!(PieceShape::new(PieceKind::I).size(), 4);
        assert_eq!(PieceShape::new(PieceKind::O).size(), 4);
        for kind in [PieceKind::T, PieceKind::L, PieceKind::J, PieceKind::S, PieceKind::Z] {
            assert_eq!(PieceShape::new(kind).size(), 3);
        }
    }

    #[test]
    fn rotate_t_clockwise() {
        // T pointing down becomes T pointing left.
        let t = PieceShape::new(PieceKind::T).rotated_cw();
        assert_eq!(t.to_rows(), vec![vec![0, 1, 0], vec![1, 1, 0], vec![0, 1, 0]]);
        assert_eq!(t.kind(), PieceKind::T);
    }

    #[test]
    fn rotate_i_becomes_vertical() {
        let i = PieceShape::new(PieceKind::I).rotated_cw();
        let cols: Vec<_> = i.filled().map(|(x, _, _)| x).collect();
        assert_eq!(cols, vec![2, 2, 2, 2]);
    }

    #[test]
    fn o_is_rotation_invariant() {
        let o = PieceShape::new(PieceKind::O);
        assert_eq!(o.rotated_cw(), o);
    }

    #[test]
    fn from_rows_restores_rotated_matrix() {
        let s = PieceShape::new(PieceKind::S).rotated_cw();
        assert_eq!(PieceShape::from_rows(&s.to_rows()), Some(s));
    }

    #[test]
    fn from_rows_rejects_bad_matrices() {
        assert_eq!(PieceShape::from_rows(&[]), None);
        assert_eq!(PieceShape::from_rows(&[vec![0, 0], vec![0, 0]]), None);
        assert_eq!(PieceShape::from_rows(&[vec![1, 0], vec![0]]), None);
        assert_eq!(PieceShape::from_rows(&[vec![1, 2], vec![0, 0]]), None);
        assert_eq!(PieceShape::from_rows(&[vec![9, 0], vec![0, 0]]), None);
        assert_eq!(PieceShape::from_rows(&vec![vec![1; 5]; 5]), None);
        // Single-colored but not a tetromino
        assert_eq!(PieceShape::from_rows(&[vec![5]]), None);
        assert_eq!(PieceShape::from_rows(&[vec![1, 1], vec![0, 0]]), None);
        // A T drawn in a 4x4 matrix
        let t4 = [vec![0, 0, 0, 0], vec![1, 1, 1, 0], vec![0, 1, 0, 0], vec![0, 0, 0, 0]];
        assert_eq!(PieceShape::from_rows(&t4), None);
        // I cells in the wrong color for its shape
        let wrong = [vec![0, 0, 0, 0], vec![1, 1, 1, 1], vec![0, 0, 0, 0], vec![0, 0, 0, 0]];
        assert_eq!(PieceShape::from_rows(&wrong), None);
    }

    #[test]
    fn from_rows_accepts_every_orientation() {
        for kind in PieceKind::ALL {
            let mut shape = PieceShape::new(kind);
            for _ in 0..4 {
                assert_eq!(PieceShape::from_rows(&shape.to_rows()), Some(shape), "{:?}", kind);
                shape = shape.rotated_cw();
            }
        }
    }
}
