//! Board configuration and its validation.

use crate::error::ConfigError;
use crate::types::{DEFAULT_COLS, DEFAULT_ROWS};

/// Smallest playable height: a vertical I piece is four rows tall.
pub const MIN_ROWS: u16 = 4;
pub const MAX_ROWS: u16 = 60;

/// Smallest playable width: a horizontal I piece is four columns wide.
pub const MIN_COLS: u16 = 4;
pub const MAX_COLS: u16 = 40;

/// Playable dimensions, excluding the border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoardConfig {
    pub rows: u16,
    pub cols: u16,
}

impl BoardConfig {
    pub fn new(rows: u16, cols: u16) -> Self {
        Self { rows, cols }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_ROWS..=MAX_ROWS).contains(&self.rows) {
            return Err(ConfigError::Rows {
                rows: self.rows,
                min: MIN_ROWS,
                max: MAX_ROWS,
            });
        }
        if !(MIN_COLS..=MAX_COLS).contains(&self.cols) {
            return Err(ConfigError::Cols {
                cols: self.cols,
                min: MIN_COLS,
                max: MAX_COLS,
            });
        }
        Ok(())
    }

    /// Column new pieces are centered on (`cols / 2`).
    pub fn center_column(&self) -> i32 {
        (self.cols / 2) as i32
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ROWS, DEFAULT_COLS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_twenty_by_ten() {
        let config = BoardConfig::default();
        assert_eq!((config.rows, config.cols), (20, 10));
        assert_eq!(config.center_column(), 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_out_of_range_dimensions() {
        assert_eq!(
            BoardConfig::new(3, 10).validate(),
            Err(ConfigError::Rows {
                rows: 3,
                min: MIN_ROWS,
                max: MAX_ROWS
            })
        );
        assert!(matches!(
            BoardConfig::new(20, 41).validate(),
            Err(ConfigError::Cols { cols: 41, .. })
        ));
        assert!(BoardConfig::new(MIN_ROWS, MIN_COLS).validate().is_ok());
    }
}
