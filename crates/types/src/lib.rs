//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data with no external dependencies, so they can be used
//! by the core rules, the input layer and the terminal renderer alike.
//!
//! # Board Dimensions
//!
//! The playable area defaults to 20 rows by 10 columns. The core surrounds it
//! with a one-cell border of [`Cell::Wall`], so the allocated grid is
//! `(rows + 2) x (cols + 2)` and playable rows/columns are numbered from 1.
//!
//! # Timing Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Frame interval of the terminal driver |
//! | `SPEED_INTERVALS_MS` | 500..10 | Gravity interval per speed level |
//! | `MOVE_REPEAT_MS` | 100 | Held left/right repeat |
//! | `SOFT_DROP_REPEAT_MS` | 66 | Held down repeat |
//! | `ROTATE_REPEAT_MS` | 133 | Held rotate repeat |
//!
//! # Examples
//!
//! ```
//! use jatc_types::{Cell, PieceKind, Rotation, DEFAULT_COLS, DEFAULT_ROWS};
//!
//! let kind = PieceKind::from_str("t").unwrap();
//! assert_eq!(kind, PieceKind::T);
//! assert_eq!(kind.id(), 6);
//! assert_eq!(Cell::Block(kind).id(), 6);
//!
//! assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
//! assert_eq!((DEFAULT_ROWS, DEFAULT_COLS), (20, 10));
//! ```

/// Default number of playable rows
pub const DEFAULT_ROWS: u16 = 20;

/// Default number of playable columns
pub const DEFAULT_COLS: u16 = 10;

/// Side length of the square occupancy matrix each piece is defined in
pub const SHAPE_SIZE: usize = 5;

/// Grid value used for border and obstacle cells
pub const WALL_ID: u8 = 8;

/// Frame interval of the terminal driver in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Gravity interval by speed level (milliseconds per row)
///
/// Index 0 = level 1. Levels past the end of the table use the last entry.
pub const SPEED_INTERVALS_MS: [u32; 10] = [500, 400, 300, 200, 150, 100, 75, 50, 25, 10];

/// Lines needed per level step: the threshold at level `n` is
/// `LEVEL_LINES_FACTOR * n - LEVEL_LINES_OFFSET`.
pub const LEVEL_LINES_FACTOR: u32 = 12;

/// See [`LEVEL_LINES_FACTOR`].
pub const LEVEL_LINES_OFFSET: u32 = 2;

/// Flat bonus for a run of four or more consecutive cleared rows
pub const MAX_RUN_BONUS: u32 = 2000;

/// Held left/right repeat interval (3 frames at 30 FPS)
pub const MOVE_REPEAT_MS: u32 = 100;

/// Held soft drop repeat interval (2 frames at 30 FPS)
pub const SOFT_DROP_REPEAT_MS: u32 = 66;

/// Held rotate repeat interval (4 frames at 30 FPS)
pub const ROTATE_REPEAT_MS: u32 = 133;

/// The seven tetromino piece kinds
///
/// The numeric id of each kind is what the grid stores for its blocks:
/// - **I** (1): cyan bar
/// - **J** (2): blue
/// - **L** (3): orange
/// - **O** (4): gold square
/// - **S** (5): green
/// - **T** (6): magenta
/// - **Z** (7): red
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl PieceKind {
    /// All kinds in id order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    /// Numeric grid id (1..=7)
    pub fn id(self) -> u8 {
        self.index() as u8 + 1
    }

    /// Zero-based table index (`id() - 1`)
    pub fn index(self) -> usize {
        match self {
            PieceKind::I => 0,
            PieceKind::J => 1,
            PieceKind::L => 2,
            PieceKind::O => 3,
            PieceKind::S => 4,
            PieceKind::T => 5,
            PieceKind::Z => 6,
        }
    }

    /// Inverse of [`PieceKind::id`]
    ///
    /// ```
    /// use jatc_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_id(4), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_id(0), None);
    /// assert_eq!(PieceKind::from_id(8), None);
    /// ```
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1..=7 => Some(Self::ALL[(id - 1) as usize]),
            _ => None,
        }
    }

    /// Display color as an RGB triple
    pub fn color(self) -> (u8, u8, u8) {
        match self {
            PieceKind::I => (0, 255, 255),
            PieceKind::J => (0, 0, 255),
            PieceKind::L => (255, 140, 0),
            PieceKind::O => (255, 255, 0),
            PieceKind::S => (0, 255, 0),
            PieceKind::T => (255, 0, 255),
            PieceKind::Z => (255, 0, 0),
        }
    }

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use jatc_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            "o" => Some(PieceKind::O),
            "s" => Some(PieceKind::S),
            "t" => Some(PieceKind::T),
            "z" => Some(PieceKind::Z),
            _ => None,
        }
    }

    /// Convert to uppercase letter
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "I",
            PieceKind::J => "J",
            PieceKind::L => "L",
            PieceKind::O => "O",
            PieceKind::S => "S",
            PieceKind::T => "T",
            PieceKind::Z => "Z",
        }
    }
}

/// Color of border/obstacle cells
pub const WALL_COLOR: (u8, u8, u8) = (105, 105, 105);

/// Rotation states (North = spawn orientation)
///
/// The cycle goes North → East → South → West → North when rotating
/// clockwise. Each state selects one of the four precomputed matrices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation {
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Rotate clockwise (90°)
    ///
    /// ```
    /// use jatc_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
    /// assert_eq!(Rotation::West.rotate_cw(), Rotation::North);
    /// ```
    pub fn rotate_cw(&self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    /// Rotate counter-clockwise (-90°)
    pub fn rotate_ccw(&self) -> Self {
        match self {
            Rotation::North => Rotation::West,
            Rotation::West => Rotation::South,
            Rotation::South => Rotation::East,
            Rotation::East => Rotation::North,
        }
    }

    /// Matrix index 0..=3 (0°, 90°, 180°, 270°)
    pub fn index(self) -> usize {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }
}

/// A cell of the bordered grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    /// Block left behind by a locked piece
    Block(PieceKind),
    /// Permanent border or obstacle
    Wall,
}

impl Cell {
    /// Numeric value: 0 empty, 1..=7 block kind, 8 wall
    pub fn id(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Block(kind) => kind.id(),
            Cell::Wall => WALL_ID,
        }
    }

    pub fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }
}

/// Match lifecycle
///
/// `NotStarted → Running → (Paused ⇄ Running) → GameOver`; only a new game
/// leads back into `Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    #[default]
    NotStarted,
    Running,
    Paused,
    GameOver,
}

/// Game actions that drivers feed into a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Drop piece one row without locking it
    SoftDrop,
    /// Rotate piece 90° clockwise
    RotateCw,
    /// Rotate piece 90° counter-clockwise
    RotateCcw,
    /// Toggle pause state
    Pause,
    /// Abandon the current match and start a new one
    NewGame,
}

impl GameAction {
    /// Whether the action manipulates the falling piece
    pub fn is_movement(&self) -> bool {
        matches!(
            self,
            GameAction::MoveLeft
                | GameAction::MoveRight
                | GameAction::SoftDrop
                | GameAction::RotateCw
                | GameAction::RotateCcw
        )
    }
}

/// Signals the core reports back to the presentation layer.
///
/// The core never plays sounds or draws; it returns these and the front-end
/// decides what effect (if any) each one maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A rotation request was accepted
    RotationAccepted,
    /// A lock completed `rows` rows worth `points`
    RowsCleared { rows: u32, points: u32 },
    /// A piece locked without completing any row
    Crashed,
    /// Speed level advanced to `level`
    LevelUp { level: u32 },
    /// The stack reached the top row
    GameOver,
    /// Pause state changed
    PauseToggled { paused: bool },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn piece_ids_match_grid_encoding() {
        let ids: Vec<u8> = PieceKind::ALL.iter().map(|k| k.id()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6, 7]);
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_id(kind.id()), Some(kind));
        }
    }

    #[test]
    fn cell_ids_match_grid_encoding() {
        assert_eq!(Cell::Empty.id(), 0);
        assert_eq!(Cell::Wall.id(), WALL_ID);
        assert_eq!(Cell::Block(PieceKind::L).id(), 3);
    }

    #[test]
    fn speed_table_is_strictly_decreasing() {
        assert!(SPEED_INTERVALS_MS.windows(2).all(|w| w[0] > w[1]));
        assert_eq!(SPEED_INTERVALS_MS[0], 500);
        assert_eq!(SPEED_INTERVALS_MS[9], 10);
    }

    #[test]
    fn only_piece_actions_count_as_movement() {
        assert!(GameAction::SoftDrop.is_movement());
        assert!(GameAction::RotateCcw.is_movement());
        assert!(!GameAction::Pause.is_movement());
        assert!(!GameAction::NewGame.is_movement());
    }
}
