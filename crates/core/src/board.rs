//! Board module - the match state machine
//!
//! Ties together the grid, the falling and preview pieces, the piece source
//! and the score/level counters. Every grid mutation goes through here:
//! [`Board::tick`] is the only path that locks a piece, clears rows, scores
//! and checks for game over, always in that order.

use arrayvec::ArrayVec;
use tracing::{debug, info, trace};

use crate::config::BoardConfig;
use crate::error::{ConfigError, GameError};
use crate::grid::{CompletedRows, Grid};
use crate::piece::Piece;
use crate::rng::{PieceSource, SimpleRng};
use crate::scoring::{self, consecutive_runs, run_bonus, Runs};
use crate::snapshot::GameSnapshot;
use crate::types::{GameEvent, Phase, SHAPE_SIZE};

/// What happened when a falling piece locked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockReport {
    /// The locked piece, in its final pose
    pub piece: Piece,
    /// Completed row indices (bordered coordinates), ascending
    pub completed_rows: CompletedRows,
    /// Lengths of the consecutive runs among `completed_rows`
    pub runs: Runs,
    /// Points awarded by this lock
    pub points: u32,
    /// New speed level when this lock advanced it
    pub level_up: Option<u32>,
    /// Whether the lock ended the match
    pub game_over: bool,
}

impl LockReport {
    pub fn rows_cleared(&self) -> u32 {
        self.completed_rows.len() as u32
    }

    /// Signals for the presentation layer, in the order they happened.
    pub fn events(&self) -> ArrayVec<GameEvent, 3> {
        let mut events = ArrayVec::new();
        if self.completed_rows.is_empty() {
            events.push(GameEvent::Crashed);
        } else {
            events.push(GameEvent::RowsCleared {
                rows: self.rows_cleared(),
                points: self.points,
            });
        }
        if let Some(level) = self.level_up {
            events.push(GameEvent::LevelUp { level });
        }
        if self.game_over {
            events.push(GameEvent::GameOver);
        }
        events
    }
}

/// Result of one gravity step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Paused or game over; nothing moved
    Idle,
    /// The piece moved down one row
    Fell,
    /// The piece could not descend and was locked
    Locked(LockReport),
}

impl TickOutcome {
    pub fn lock_report(&self) -> Option<&LockReport> {
        match self {
            TickOutcome::Locked(report) => Some(report),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct InPlay {
    current: Piece,
    next: Piece,
}

/// Complete state of one playfield
#[derive(Debug, Clone)]
pub struct Board<S = SimpleRng> {
    config: BoardConfig,
    grid: Grid,
    /// `None` until the first new game
    pieces: Option<InPlay>,
    source: S,
    phase: Phase,
    score: u32,
    lines: u32,
    speed_level: u32,
    /// Play time, excluding paused time
    elapsed_ms: u64,
    last_event: Option<GameEvent>,
}

impl<S: PieceSource> Board<S> {
    /// Create an idle board. Call [`Board::new_game`] before playing.
    pub fn new(config: BoardConfig, source: S) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            grid: Grid::new(config.rows as usize, config.cols as usize),
            pieces: None,
            source,
            phase: Phase::NotStarted,
            score: 0,
            lines: 0,
            speed_level: 1,
            elapsed_ms: 0,
            last_event: None,
        })
    }

    /// Start a fresh match at `speed_level`, from any phase.
    ///
    /// Clears the grid, resets score, lines and clock, and draws the current
    /// and preview pieces.
    pub fn new_game(&mut self, speed_level: u32) -> Result<(), GameError> {
        if speed_level == 0 {
            return Err(GameError::InvalidSpeedLevel(speed_level));
        }

        self.grid.reset();
        let center = self.config.center_column();
        let current = Piece::spawn(self.source.draw_piece_kind(), center);
        let next = Piece::spawn(self.source.draw_piece_kind(), center);
        self.pieces = Some(InPlay { current, next });

        self.phase = Phase::Running;
        self.score = 0;
        self.lines = 0;
        self.speed_level = speed_level;
        self.elapsed_ms = 0;
        self.last_event = None;

        info!(
            rows = self.config.rows,
            cols = self.config.cols,
            speed_level,
            "new game"
        );
        Ok(())
    }

    /// Whether `piece` overlaps any wall or block.
    ///
    /// This is the single check behind every move, rotation and fall.
    pub fn collides(&self, piece: &Piece) -> bool {
        self.grid.collides(piece)
    }

    /// Shift the current piece one column left (`-1`) or right (`+1`).
    ///
    /// Returns whether the piece moved; a blocked move is reverted silently.
    pub fn try_move(&mut self, direction: i32) -> Result<bool, GameError> {
        let pieces = self.pieces.as_mut().ok_or(GameError::NotStarted)?;
        let step = direction.signum();
        if step == 0 {
            return Ok(false);
        }

        pieces.current.translate(step);
        if self.grid.collides(&pieces.current) {
            pieces.current.translate(-step);
            trace!(direction = step, "move rejected");
            return Ok(false);
        }
        Ok(true)
    }

    /// Rotate the current piece in place.
    ///
    /// There are no wall kicks: a colliding rotation is undone and `false`
    /// is returned.
    pub fn try_rotate(&mut self, clockwise: bool) -> Result<bool, GameError> {
        let pieces = self.pieces.as_mut().ok_or(GameError::NotStarted)?;

        pieces.current.rotate(clockwise);
        if self.grid.collides(&pieces.current) {
            pieces.current.rotate(!clockwise);
            trace!(clockwise, "rotation rejected");
            return Ok(false);
        }

        self.last_event = Some(GameEvent::RotationAccepted);
        Ok(true)
    }

    /// Move the current piece down one row if it fits. Never locks.
    pub fn soft_drop(&mut self) -> Result<bool, GameError> {
        let pieces = self.pieces.as_mut().ok_or(GameError::NotStarted)?;

        pieces.current.descend();
        if self.grid.collides(&pieces.current) {
            pieces.current.ascend();
            return Ok(false);
        }
        Ok(true)
    }

    /// Gravity step.
    ///
    /// Moves the current piece down one row; if that collides, the piece is
    /// put back, locked, completed rows are cleared and scored, the level and
    /// game-over checks run and the preview piece takes over.
    pub fn tick(&mut self) -> Result<TickOutcome, GameError> {
        match self.phase {
            Phase::NotStarted => return Err(GameError::NotStarted),
            Phase::Paused | Phase::GameOver => return Ok(TickOutcome::Idle),
            Phase::Running => {}
        }

        let pieces = self.pieces.as_mut().ok_or(GameError::NotStarted)?;
        pieces.current.descend();
        if !self.grid.collides(&pieces.current) {
            return Ok(TickOutcome::Fell);
        }
        pieces.current.ascend();

        let piece = pieces.current;
        Ok(TickOutcome::Locked(self.lock(piece)))
    }

    fn lock(&mut self, piece: Piece) -> LockReport {
        self.grid.attach(&piece);

        // Only rows the piece's matrix spans can have been completed.
        let start = piece.row().max(1) as usize;
        let end = (piece.row() + SHAPE_SIZE as i32)
            .min(self.config.rows as i32 + 1)
            .max(0) as usize;
        let completed_rows = self.grid.completed_rows(start..end);
        let runs = consecutive_runs(&completed_rows);
        let points: u32 = runs.iter().map(|&len| run_bonus(len)).sum();

        // Ascending order: each clear only shifts rows above the next one.
        for &row in &completed_rows {
            self.grid.clear_row(row);
        }

        self.score = self.score.saturating_add(points);

        let mut level_up = None;
        if !completed_rows.is_empty() {
            self.lines = self.lines.saturating_add(completed_rows.len() as u32);
            let next_level = self.speed_level.checked_add(1);
            if let Some(next_level) =
                next_level.filter(|_| scoring::reaches_next_level(self.lines, self.speed_level))
            {
                self.speed_level = next_level;
                level_up = Some(next_level);
                debug!(level = self.speed_level, lines = self.lines, "speed level up");
            }
        }

        debug!(
            kind = piece.kind().as_str(),
            row = piece.row(),
            col = piece.col(),
            cleared = completed_rows.len(),
            points,
            "piece locked"
        );

        let game_over = self.grid.top_row_occupied();
        if game_over {
            self.phase = Phase::GameOver;
            info!(score = self.score, lines = self.lines, "game over");
        } else {
            let next = Piece::spawn(self.source.draw_piece_kind(), self.config.center_column());
            if let Some(pieces) = self.pieces.as_mut() {
                pieces.current = pieces.next;
                pieces.next = next;
            }
        }

        let report = LockReport {
            piece,
            completed_rows,
            runs,
            points,
            level_up,
            game_over,
        };
        self.last_event = report.events().last().copied();
        report
    }

    /// Flip between running and paused.
    ///
    /// Returns `None` once the match is over. Movement is not gated here;
    /// drivers check [`Board::paused`] before forwarding input.
    pub fn toggle_pause(&mut self) -> Result<Option<GameEvent>, GameError> {
        let paused = match self.phase {
            Phase::NotStarted => return Err(GameError::NotStarted),
            Phase::GameOver => return Ok(None),
            Phase::Running => true,
            Phase::Paused => false,
        };
        self.phase = if paused { Phase::Paused } else { Phase::Running };
        debug!(paused, "pause toggled");

        let event = GameEvent::PauseToggled { paused };
        self.last_event = Some(event);
        Ok(Some(event))
    }

    /// Add wall-clock time reported by the driver. Only running time counts.
    pub fn advance_clock(&mut self, elapsed_ms: u32) {
        if self.phase == Phase::Running {
            self.elapsed_ms += elapsed_ms as u64;
        }
    }
}

impl<S> Board<S> {
    pub fn config(&self) -> BoardConfig {
        self.config
    }

    pub fn rows(&self) -> usize {
        self.config.rows as usize
    }

    pub fn cols(&self) -> usize {
        self.config.cols as usize
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Direct grid access for setting up positions (puzzles, tests).
    ///
    /// Drivers must not use this during play.
    #[doc(hidden)]
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn current(&self) -> Option<Piece> {
        self.pieces.map(|p| p.current)
    }

    pub fn next(&self) -> Option<Piece> {
        self.pieces.map(|p| p.next)
    }

    /// Replace the falling piece, e.g. to stage a position.
    #[doc(hidden)]
    pub fn set_current(&mut self, piece: Piece) -> Result<(), GameError> {
        let pieces = self.pieces.as_mut().ok_or(GameError::NotStarted)?;
        pieces.current = piece;
        Ok(())
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True from `new_game` until game over, including while paused.
    pub fn running(&self) -> bool {
        matches!(self.phase, Phase::Running | Phase::Paused)
    }

    pub fn paused(&self) -> bool {
        self.phase == Phase::Paused
    }

    pub fn game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn speed_level(&self) -> u32 {
        self.speed_level
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    /// Interval between gravity ticks at the current speed level.
    pub fn tick_interval_ms(&self) -> u32 {
        scoring::tick_interval_ms(self.speed_level)
    }

    /// Most recent signal, kept for display.
    pub fn last_event(&self) -> Option<GameEvent> {
        self.last_event
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.rows = self.config.rows;
        out.cols = self.config.cols;
        self.grid.write_interior_ids(&mut out.board);
        out.current = self.current();
        out.next = self.next();
        out.phase = self.phase;
        out.score = self.score;
        out.lines = self.lines;
        out.speed_level = self.speed_level;
        out.elapsed_ms = self.elapsed_ms;
        out.last_event = self.last_event;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedPieces;
    use crate::types::{Cell, PieceKind, Rotation};

    fn board_with(kind: PieceKind) -> Board<ScriptedPieces> {
        let mut board = Board::new(BoardConfig::default(), ScriptedPieces::repeat(kind)).unwrap();
        board.new_game(1).unwrap();
        board
    }

    #[test]
    fn test_new_board_is_not_started() {
        let mut board = Board::new(BoardConfig::default(), SimpleRng::new(1)).unwrap();
        assert_eq!(board.phase(), Phase::NotStarted);
        assert!(!board.running());
        assert!(board.current().is_none());
        assert_eq!(board.tick(), Err(GameError::NotStarted));
        assert_eq!(board.try_move(1), Err(GameError::NotStarted));
        assert_eq!(board.try_rotate(true), Err(GameError::NotStarted));
        assert_eq!(board.soft_drop(), Err(GameError::NotStarted));
        assert_eq!(board.toggle_pause(), Err(GameError::NotStarted));
    }

    #[test]
    fn test_new_game_rejects_level_zero() {
        let mut board = Board::new(BoardConfig::default(), SimpleRng::new(1)).unwrap();
        assert_eq!(board.new_game(0), Err(GameError::InvalidSpeedLevel(0)));
        assert_eq!(board.phase(), Phase::NotStarted);
    }

    #[test]
    fn test_new_game_spawns_distinct_current_and_next() {
        let mut board = Board::new(
            BoardConfig::default(),
            ScriptedPieces::new(vec![PieceKind::T, PieceKind::S]).unwrap(),
        )
        .unwrap();
        board.new_game(3).unwrap();

        let current = board.current().unwrap();
        let next = board.next().unwrap();
        assert_eq!(current.kind(), PieceKind::T);
        assert_eq!(next.kind(), PieceKind::S);
        assert_eq!((current.row(), current.col()), (0, 4));
        assert_eq!(current.rotation(), Rotation::North);
        assert_eq!(board.speed_level(), 3);
        assert_eq!(board.tick_interval_ms(), 300);
        assert!(board.running());
    }

    #[test]
    fn test_tick_falls_then_locks_on_floor() {
        let mut board = board_with(PieceKind::O);
        // O occupies matrix rows 1-2; it rests with its matrix at row 18.
        for _ in 0..18 {
            assert_eq!(board.tick().unwrap(), TickOutcome::Fell);
        }
        let outcome = board.tick().unwrap();
        let report = outcome.lock_report().expect("piece should lock");
        assert_eq!(report.piece.row(), 18);
        assert!(report.completed_rows.is_empty());
        assert_eq!(report.events().as_slice(), &[GameEvent::Crashed]);
        assert_eq!(board.grid().get(20, 5), Some(Cell::Block(PieceKind::O)));
        assert_eq!(board.current().unwrap().row(), 0);
        assert_eq!(board.last_event(), Some(GameEvent::Crashed));
    }

    #[test]
    fn test_paused_tick_is_idle() {
        let mut board = board_with(PieceKind::T);
        board.toggle_pause().unwrap();
        let before = board.current();
        assert_eq!(board.tick().unwrap(), TickOutcome::Idle);
        assert_eq!(board.current(), before);

        board.advance_clock(500);
        assert_eq!(board.elapsed_ms(), 0);

        assert_eq!(
            board.toggle_pause().unwrap(),
            Some(GameEvent::PauseToggled { paused: false })
        );
        board.advance_clock(500);
        assert_eq!(board.elapsed_ms(), 500);
    }

    #[test]
    fn test_lock_window_ignores_rows_outside_the_piece() {
        let mut board = board_with(PieceKind::O);
        // A completed row far above the landing spot is not in the search window.
        for col in 1..=10 {
            board.grid_mut().set(5, col, Cell::Block(PieceKind::J));
        }
        board.set_current(Piece::at(PieceKind::O, Rotation::North, 18, 0)).unwrap();
        let outcome = board.tick().unwrap();
        let report = outcome.lock_report().unwrap();
        assert!(report.completed_rows.is_empty());
        assert!(board.grid().is_row_complete(5));
    }

    #[test]
    fn test_clear_at_huge_speed_level_does_not_overflow() {
        for level in [400_000_000, u32::MAX] {
            let mut board = board_with(PieceKind::O);
            board.new_game(level).unwrap();
            for col in 3..=10 {
                board.grid_mut().set(20, col, Cell::Block(PieceKind::J));
            }
            board.set_current(Piece::at(PieceKind::O, Rotation::North, 18, 0)).unwrap();

            let outcome = board.tick().unwrap();
            let report = outcome.lock_report().unwrap();
            assert_eq!(report.completed_rows.as_slice(), &[20]);
            assert_eq!(report.level_up, None);
            assert_eq!(board.speed_level(), level);
            assert_eq!(board.lines(), 1);
            assert_eq!(board.tick_interval_ms(), 10);
        }
    }
}
