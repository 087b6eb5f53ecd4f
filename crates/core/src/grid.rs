//! Grid module - the bordered occupancy grid
//!
//! The grid stores `rows x cols` playable cells surrounded by a permanent
//! one-cell wall, using a flat row-major `Vec` for cache locality.
//! Coordinates are `(row, col)` in the bordered space: row 0 and row
//! `rows + 1` are walls, as are column 0 and column `cols + 1`. Because of the
//! wall, collision tests never need to special-case the edges.

use std::ops::Range;

use arrayvec::ArrayVec;

use crate::piece::Piece;
use crate::types::{Cell, SHAPE_SIZE};

/// Row indices completed by a single lock (at most one matrix height)
pub type CompletedRows = ArrayVec<usize, SHAPE_SIZE>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    /// Flat array of cells, row-major order (row * width + col)
    cells: Vec<Cell>,
}

impl Grid {
    /// Allocate an empty grid with its border in place.
    pub fn new(rows: usize, cols: usize) -> Self {
        let mut grid = Self {
            rows,
            cols,
            cells: vec![Cell::Empty; (rows + 2) * (cols + 2)],
        };
        grid.reset();
        grid
    }

    /// Clear the interior and restore the border.
    pub fn reset(&mut self) {
        let (height, width) = (self.height(), self.width());
        for row in 0..height {
            for col in 0..width {
                let border = row == 0 || row == height - 1 || col == 0 || col == width - 1;
                self.cells[row * width + col] = if border { Cell::Wall } else { Cell::Empty };
            }
        }
    }

    /// Playable rows (excluding border)
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Playable columns (excluding border)
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Allocated width including both border columns
    pub fn width(&self) -> usize {
        self.cols + 2
    }

    /// Allocated height including both border rows
    pub fn height(&self) -> usize {
        self.rows + 2
    }

    #[inline(always)]
    fn index(&self, row: i32, col: i32) -> Option<usize> {
        if row < 0 || col < 0 || row as usize >= self.height() || col as usize >= self.width() {
            return None;
        }
        Some(row as usize * self.width() + col as usize)
    }

    /// Get cell at `(row, col)`; `None` outside the allocated grid.
    pub fn get(&self, row: i32, col: i32) -> Option<Cell> {
        self.index(row, col).map(|idx| self.cells[idx])
    }

    /// Set an interior cell. Border and out-of-range writes are refused.
    pub fn set(&mut self, row: i32, col: i32, cell: Cell) -> bool {
        if !self.is_interior(row, col) {
            return false;
        }
        match self.index(row, col) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    pub fn is_interior(&self, row: i32, col: i32) -> bool {
        row >= 1 && col >= 1 && row as usize <= self.rows && col as usize <= self.cols
    }

    /// A position is blocked when it is non-empty or outside the grid.
    pub fn is_blocked(&self, row: i32, col: i32) -> bool {
        !matches!(self.get(row, col), Some(Cell::Empty))
    }

    /// Whether any occupied cell of `piece` overlaps a blocked position.
    pub fn collides(&self, piece: &Piece) -> bool {
        piece
            .absolute_cells()
            .any(|(row, col)| self.is_blocked(row, col))
    }

    /// Write the piece's kind into every cell under its mask.
    ///
    /// Cells that fall outside the interior are skipped so the border stays intact.
    pub fn attach(&mut self, piece: &Piece) {
        let cell = Cell::Block(piece.kind());
        for (row, col) in piece.absolute_cells() {
            self.set(row, col, cell);
        }
    }

    /// One full row, border cells included.
    pub fn row(&self, row: usize) -> &[Cell] {
        let start = row * self.width();
        &self.cells[start..start + self.width()]
    }

    /// A row is complete when it has no empty cell.
    ///
    /// Borders count as filled, so interior rows are judged by their interior only.
    pub fn is_row_complete(&self, row: usize) -> bool {
        if row >= self.height() {
            return false;
        }
        self.row(row).iter().all(|cell| !cell.is_empty())
    }

    /// Completed rows inside `window`, ascending.
    ///
    /// The window is clamped to the interior rows and to the capacity of
    /// [`CompletedRows`].
    pub fn completed_rows(&self, window: Range<usize>) -> CompletedRows {
        let start = window.start.max(1);
        let end = window.end.min(self.rows + 1);
        let mut completed = CompletedRows::new();
        for row in start..end {
            if self.is_row_complete(row) && completed.try_push(row).is_err() {
                break;
            }
        }
        completed
    }

    /// Remove `row` and shift every row above it down by one.
    ///
    /// Row 1 becomes an empty interior flanked by walls.
    pub fn clear_row(&mut self, row: usize) {
        if row == 0 || row > self.rows {
            return;
        }

        let width = self.width();
        // copy_within handles the overlapping ranges
        for dst in (2..=row).rev() {
            let src_start = (dst - 1) * width;
            self.cells.copy_within(src_start..src_start + width, dst * width);
        }

        let top = &mut self.cells[width..2 * width];
        top.fill(Cell::Empty);
        top[0] = Cell::Wall;
        top[width - 1] = Cell::Wall;
    }

    /// Whether any interior cell of row 1 is occupied.
    pub fn top_row_occupied(&self) -> bool {
        let row = self.row(1);
        row[1..=self.cols].iter().any(|cell| !cell.is_empty())
    }

    /// Write interior cell ids row-major into `out` (`rows * cols` values).
    pub fn write_interior_ids(&self, out: &mut Vec<u8>) {
        out.clear();
        out.reserve(self.rows * self.cols);
        for row in 1..=self.rows {
            out.extend(self.row(row)[1..=self.cols].iter().map(|cell| cell.id()));
        }
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PieceKind, Rotation};

    #[test]
    fn test_grid_index_calculation() {
        let grid = Grid::new(20, 10);
        assert_eq!(grid.index(0, 0), Some(0));
        assert_eq!(grid.index(0, 11), Some(11));
        assert_eq!(grid.index(1, 0), Some(12));
        assert_eq!(grid.index(21, 11), Some(21 * 12 + 11));
        assert_eq!(grid.index(-1, 0), None);
        assert_eq!(grid.index(0, 12), None);
        assert_eq!(grid.index(22, 0), None);
    }

    #[test]
    fn test_new_grid_has_walls_on_every_edge() {
        let grid = Grid::new(6, 4);
        for row in 0..grid.height() as i32 {
            for col in 0..grid.width() as i32 {
                let expected = if grid.is_interior(row, col) {
                    Cell::Empty
                } else {
                    Cell::Wall
                };
                assert_eq!(grid.get(row, col), Some(expected), "({}, {})", row, col);
            }
        }
    }

    #[test]
    fn test_set_refuses_border_writes() {
        let mut grid = Grid::new(20, 10);
        assert!(!grid.set(0, 5, Cell::Empty));
        assert!(!grid.set(5, 11, Cell::Empty));
        assert!(grid.set(5, 10, Cell::Block(PieceKind::T)));
        assert_eq!(grid.get(5, 10), Some(Cell::Block(PieceKind::T)));
    }

    #[test]
    fn test_completed_rows_window_is_clamped() {
        let mut grid = Grid::new(4, 4);
        for col in 1..=4 {
            grid.set(4, col, Cell::Block(PieceKind::I));
        }
        assert_eq!(grid.completed_rows(0..100).as_slice(), &[4]);
        assert!(grid.completed_rows(0..4).is_empty());
        // The bottom wall row is never reported.
        assert!(!grid.completed_rows(0..100).contains(&5));
    }

    #[test]
    fn test_write_interior_ids_skips_border() {
        let mut grid = Grid::new(2, 3);
        grid.set(2, 3, Cell::Block(PieceKind::Z));
        let mut out = Vec::new();
        grid.write_interior_ids(&mut out);
        assert_eq!(out, vec![0, 0, 0, 0, 0, 7]);
    }

    #[test]
    fn test_attach_skips_cells_outside_interior() {
        let mut grid = Grid::new(20, 10);
        // I piece lying on row 2 of its matrix with col -1 puts one cell on the wall.
        let piece = Piece::at(PieceKind::I, Rotation::East, 3, -1);
        grid.attach(&piece);
        assert_eq!(grid.get(5, 0), Some(Cell::Wall));
        assert_eq!(grid.get(5, 1), Some(Cell::Block(PieceKind::I)));
        assert_eq!(grid.get(5, 2), Some(Cell::Block(PieceKind::I)));
    }
}
