//! Core game logic - pure, deterministic, and testable
//!
//! Everything about the rules lives here: the bordered grid, the shape
//! catalog, collision, locking, row clearing, scoring and speed levels. The
//! crate has no terminal or I/O dependencies; front-ends read
//! [`GameSnapshot`]s and react to the [`GameEvent`](types::GameEvent)s the
//! board reports.
//!
//! # Module Structure
//!
//! - [`grid`]: bordered occupancy grid, collision and row clearing
//! - [`piece`]: 5x5 shape matrices for the seven kinds, piece poses
//! - [`board`]: match state machine (new game, moves, gravity tick, pause)
//! - [`scoring`]: run bonuses, level thresholds, tick intervals
//! - [`rng`]: piece sources (seeded uniform draws or a fixed script)
//! - [`timer`]: gravity tick scheduling
//! - [`session`]: action and time driver around a board
//! - [`snapshot`]: read-only view for renderers
//!
//! # Rules
//!
//! - Pieces spawn at the top of the matrix, one column left of center.
//! - Moves and rotations that collide are undone silently. No wall kicks.
//! - A piece locks the moment gravity cannot move it down. There is no lock
//!   delay and no hard drop.
//! - Completed rows are grouped into consecutive runs and each run scores on
//!   its own.
//! - The match ends when a lock leaves anything in the top interior row.
//!
//! # Example
//!
//! ```
//! use jatc_core::{Board, BoardConfig, ScriptedPieces, TickOutcome};
//! use jatc_core::types::PieceKind;
//!
//! let mut board = Board::new(BoardConfig::default(), ScriptedPieces::repeat(PieceKind::O)).unwrap();
//! board.new_game(1).unwrap();
//!
//! board.try_move(-1).unwrap();
//! assert_eq!(board.tick().unwrap(), TickOutcome::Fell);
//! assert_eq!(board.current().unwrap().row(), 1);
//! assert_eq!(board.score(), 0);
//! ```

pub mod board;
pub mod config;
pub mod error;
pub mod grid;
pub mod piece;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod snapshot;
pub mod timer;

pub use jatc_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, LockReport, TickOutcome};
pub use config::BoardConfig;
pub use error::{ConfigError, GameError};
pub use grid::Grid;
pub use piece::Piece;
pub use rng::{PieceSource, ScriptedPieces, SimpleRng};
pub use session::{Session, SessionEvents};
pub use snapshot::GameSnapshot;
pub use timer::{GravityTimer, TimerEvent};
