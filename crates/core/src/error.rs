//! Error types for the core crate.

use thiserror::Error;

/// Failures of gameplay calls.
///
/// Rejected moves and rotations are not errors; they are silent no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GameError {
    /// A gameplay method was called before the first `new_game`.
    #[error("no game has been started on this board")]
    NotStarted,
    /// Speed levels start at 1.
    #[error("invalid speed level {0}: levels start at 1")]
    InvalidSpeedLevel(u32),
}

/// Rejected board configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("board needs between {min} and {max} rows, got {rows}")]
    Rows { rows: u16, min: u16, max: u16 },
    #[error("board needs between {min} and {max} columns, got {cols}")]
    Cols { cols: u16, min: u16, max: u16 },
}
