//! Piece module - tetromino shape catalog and pose
//!
//! Every kind is defined by four 5x5 occupancy matrices, one per rotation
//! state. Each matrix row is stored as a 5-bit mask read left to right
//! (bit 4 is local column 0), so the tables below look like the shapes.
//!
//! A [`Piece`] is only a pose (kind, rotation, row, col). It never looks at
//! the grid; the board validates every pose change and rolls back rejected ones.

use crate::types::{PieceKind, Rotation, SHAPE_SIZE};

/// One rotation state: five row masks, bit 4 = local column 0
type ShapeMatrix = [u8; SHAPE_SIZE];

/// Shape table indexed by `[PieceKind::index()][Rotation::index()]`
static SHAPES: [[ShapeMatrix; 4]; 7] = [
    // I
    [
        [0b00000, 0b00100, 0b00100, 0b00100, 0b00100],
        [0b00000, 0b00000, 0b11110, 0b00000, 0b00000],
        [0b00100, 0b00100, 0b00100, 0b00100, 0b00000],
        [0b00000, 0b00000, 0b01111, 0b00000, 0b00000],
    ],
    // J
    [
        [0b00000, 0b00100, 0b00100, 0b01100, 0b00000],
        [0b00000, 0b01000, 0b01110, 0b00000, 0b00000],
        [0b00000, 0b00110, 0b00100, 0b00100, 0b00000],
        [0b00000, 0b01110, 0b00010, 0b00000, 0b00000],
    ],
    // L
    [
        [0b00000, 0b00100, 0b00100, 0b00110, 0b00000],
        [0b00000, 0b00000, 0b01110, 0b01000, 0b00000],
        [0b00000, 0b01100, 0b00100, 0b00100, 0b00000],
        [0b00000, 0b00010, 0b01110, 0b00000, 0b00000],
    ],
    // O
    [
        [0b00000, 0b01100, 0b01100, 0b00000, 0b00000],
        [0b00000, 0b01100, 0b01100, 0b00000, 0b00000],
        [0b00000, 0b01100, 0b01100, 0b00000, 0b00000],
        [0b00000, 0b01100, 0b01100, 0b00000, 0b00000],
    ],
    // S
    [
        [0b00000, 0b01000, 0b01100, 0b00100, 0b00000],
        [0b00000, 0b00110, 0b01100, 0b00000, 0b00000],
        [0b00000, 0b00100, 0b00110, 0b00010, 0b00000],
        [0b00000, 0b00000, 0b00110, 0b01100, 0b00000],
    ],
    // T
    [
        [0b00000, 0b00100, 0b01110, 0b00000, 0b00000],
        [0b00000, 0b00100, 0b00110, 0b00100, 0b00000],
        [0b00000, 0b00000, 0b01110, 0b00100, 0b00000],
        [0b00000, 0b00100, 0b01100, 0b00100, 0b00000],
    ],
    // Z
    [
        [0b00000, 0b00100, 0b01100, 0b01000, 0b00000],
        [0b00000, 0b00000, 0b01100, 0b00110, 0b00000],
        [0b00000, 0b00010, 0b00110, 0b00100, 0b00000],
        [0b00000, 0b01100, 0b00110, 0b00000, 0b00000],
    ],
];

#[inline(always)]
fn matrix(kind: PieceKind, rotation: Rotation) -> &'static ShapeMatrix {
    &SHAPES[kind.index()][rotation.index()]
}

/// Whether local cell `(row, col)` is occupied for the given kind/rotation.
///
/// Out-of-range coordinates are reported as empty.
pub fn is_occupied(kind: PieceKind, rotation: Rotation, row: usize, col: usize) -> bool {
    if row >= SHAPE_SIZE || col >= SHAPE_SIZE {
        return false;
    }
    matrix(kind, rotation)[row] & (1 << (SHAPE_SIZE - 1 - col)) != 0
}

/// Iterator over the occupied local cells of one rotation state, row-major.
#[derive(Debug, Clone)]
pub struct Cells {
    matrix: &'static ShapeMatrix,
    pos: usize,
}

impl Iterator for Cells {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos < SHAPE_SIZE * SHAPE_SIZE {
            let (row, col) = (self.pos / SHAPE_SIZE, self.pos % SHAPE_SIZE);
            self.pos += 1;
            if self.matrix[row] & (1 << (SHAPE_SIZE - 1 - col)) != 0 {
                return Some((row, col));
            }
        }
        None
    }
}

/// Occupied local cells for a kind/rotation without building a [`Piece`].
pub fn shape_cells(kind: PieceKind, rotation: Rotation) -> Cells {
    Cells {
        matrix: matrix(kind, rotation),
        pos: 0,
    }
}

/// A falling piece: shape kind plus pose in board coordinates
///
/// `row`/`col` locate the top-left corner of the 5x5 matrix in the bordered
/// grid, so they can legitimately be negative near the left wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    kind: PieceKind,
    rotation: Rotation,
    row: i32,
    col: i32,
}

impl Piece {
    /// Create a piece in its spawn pose: row 0, one column left of center.
    pub fn spawn(kind: PieceKind, center_column: i32) -> Self {
        Self {
            kind,
            rotation: Rotation::North,
            row: 0,
            col: center_column - 1,
        }
    }

    /// Create a piece at an explicit pose.
    pub fn at(kind: PieceKind, rotation: Rotation, row: i32, col: i32) -> Self {
        Self {
            kind,
            rotation,
            row,
            col,
        }
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn row(&self) -> i32 {
        self.row
    }

    pub fn col(&self) -> i32 {
        self.col
    }

    /// Shift horizontally by `d_col`. No bounds checking.
    pub fn translate(&mut self, d_col: i32) {
        self.col += d_col;
    }

    /// Move one row down.
    pub fn descend(&mut self) {
        self.row += 1;
    }

    /// Undo one [`Piece::descend`].
    pub fn ascend(&mut self) {
        self.row -= 1;
    }

    /// Step to the next (clockwise) or previous rotation state.
    pub fn rotate(&mut self, clockwise: bool) {
        self.rotation = if clockwise {
            self.rotation.rotate_cw()
        } else {
            self.rotation.rotate_ccw()
        };
    }

    /// Occupied local cells `(row, col)`, each in `0..5`.
    pub fn cells(&self) -> Cells {
        shape_cells(self.kind, self.rotation)
    }

    /// Occupied cells in board coordinates.
    pub fn absolute_cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.cells()
            .map(move |(r, c)| (self.row + r as i32, self.col + c as i32))
    }
}
