//! Snapshot module - read-only view of a board for renderers
//!
//! Renderers never hold a reference into the board; they read a
//! [`GameSnapshot`] refreshed once per frame with [`Board::snapshot_into`],
//! which reuses the snapshot's buffers.
//!
//! [`Board::snapshot_into`]: crate::board::Board::snapshot_into

use crate::piece::Piece;
use crate::types::{GameEvent, Phase, DEFAULT_COLS, DEFAULT_ROWS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub rows: u16,
    pub cols: u16,
    /// Interior cell ids, row-major, `rows * cols` entries
    pub board: Vec<u8>,
    pub current: Option<Piece>,
    pub next: Option<Piece>,
    pub phase: Phase,
    pub score: u32,
    pub lines: u32,
    pub speed_level: u32,
    pub elapsed_ms: u64,
    pub last_event: Option<GameEvent>,
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            board: vec![0; DEFAULT_ROWS as usize * DEFAULT_COLS as usize],
            current: None,
            next: None,
            phase: Phase::NotStarted,
            score: 0,
            lines: 0,
            speed_level: 1,
            elapsed_ms: 0,
            last_event: None,
        }
    }
}

impl GameSnapshot {
    /// Cell id at interior `(row, col)`, both 0-based. Out of range reads as 0.
    pub fn cell(&self, row: usize, col: usize) -> u8 {
        if row >= self.rows as usize || col >= self.cols as usize {
            return 0;
        }
        self.board
            .get(row * self.cols as usize + col)
            .copied()
            .unwrap_or(0)
    }

    pub fn running(&self) -> bool {
        matches!(self.phase, Phase::Running | Phase::Paused)
    }

    pub fn paused(&self) -> bool {
        self.phase == Phase::Paused
    }

    pub fn game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }
}
