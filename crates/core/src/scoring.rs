//! Scoring module - run bonuses, speed levels and tick intervals
//!
//! Completed rows are grouped into maximal runs of consecutive row numbers and
//! each run is scored on its own, so two separated single rows are worth less
//! than one double. Growth is quadratic up to three rows and then flat.

use arrayvec::ArrayVec;

use crate::types::{LEVEL_LINES_FACTOR, LEVEL_LINES_OFFSET, MAX_RUN_BONUS, SHAPE_SIZE, SPEED_INTERVALS_MS};

/// Run lengths found in one lock
pub type Runs = ArrayVec<usize, SHAPE_SIZE>;

/// Bonus for a single run of `len` consecutive completed rows.
///
/// `100 * (len + 1)^2` for one to three rows, a flat [`MAX_RUN_BONUS`] from four on.
pub fn run_bonus(len: usize) -> u32 {
    match len {
        0 => 0,
        1..=3 => {
            let k = len as u32 + 1;
            100 * k * k
        }
        _ => MAX_RUN_BONUS,
    }
}

/// Split ascending row indices into the lengths of their consecutive runs.
///
/// ```
/// use jatc_core::scoring::consecutive_runs;
///
/// assert_eq!(consecutive_runs(&[3, 4, 6]).as_slice(), &[2, 1]);
/// assert!(consecutive_runs(&[]).is_empty());
/// ```
pub fn consecutive_runs(sorted_rows: &[usize]) -> Runs {
    let mut runs = Runs::new();
    let mut previous: Option<usize> = None;
    let mut len = 0usize;

    for &row in sorted_rows {
        match previous {
            Some(prev) if prev + 1 == row => len += 1,
            Some(_) => {
                if runs.try_push(len).is_err() {
                    return runs;
                }
                len = 1;
            }
            None => len = 1,
        }
        previous = Some(row);
    }

    if len > 0 {
        let _ = runs.try_push(len);
    }
    runs
}

/// Total bonus for a set of completed rows (ascending).
pub fn score_rows(sorted_rows: &[usize]) -> u32 {
    consecutive_runs(sorted_rows)
        .iter()
        .map(|&len| run_bonus(len))
        .sum()
}

/// Gravity interval for a speed level (1-based), clamped to the fastest entry.
pub fn tick_interval_ms(level: u32) -> u32 {
    let idx = (level.max(1) - 1) as usize;
    SPEED_INTERVALS_MS[idx.min(SPEED_INTERVALS_MS.len() - 1)]
}

/// Total lines at which `level` advances to the next one.
pub fn level_threshold(level: u32) -> u32 {
    LEVEL_LINES_FACTOR
        .saturating_mul(level)
        .saturating_sub(LEVEL_LINES_OFFSET)
}

/// Whether the running line total reaches the threshold for `level`.
pub fn reaches_next_level(total_lines: u32, level: u32) -> bool {
    total_lines >= level_threshold(level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_threshold_saturates_for_huge_levels() {
        assert_eq!(level_threshold(1), 10);
        assert_eq!(level_threshold(2), 22);
        assert_eq!(level_threshold(400_000_000), u32::MAX - LEVEL_LINES_OFFSET);
        assert!(!reaches_next_level(4, u32::MAX));
    }

    #[test]
    fn test_run_bonus_table() {
        assert_eq!(run_bonus(0), 0);
        assert_eq!(run_bonus(1), 400);
        assert_eq!(run_bonus(2), 900);
        assert_eq!(run_bonus(3), 1600);
        // Flat cap from four rows on.
        assert_eq!(run_bonus(4), 2000);
        assert_eq!(run_bonus(5), 2000);
    }

    #[test]
    fn test_consecutive_runs() {
        assert_eq!(consecutive_runs(&[20]).as_slice(), &[1]);
        assert_eq!(consecutive_runs(&[17, 18, 19, 20]).as_slice(), &[4]);
        assert_eq!(consecutive_runs(&[16, 18, 19]).as_slice(), &[1, 2]);
        assert_eq!(consecutive_runs(&[1, 3, 5]).as_slice(), &[1, 1, 1]);
    }

    #[test]
    fn test_separated_rows_score_per_run() {
        assert_eq!(score_rows(&[18, 20]), 800);
        assert_eq!(score_rows(&[19, 20]), 900);
        assert_eq!(score_rows(&[]), 0);
    }

    #[test]
    fn test_tick_intervals() {
        assert_eq!(tick_interval_ms(1), 500);
        assert_eq!(tick_interval_ms(2), 400);
        assert_eq!(tick_interval_ms(10), 10);
        assert_eq!(tick_interval_ms(25), 10); // clamp to fastest
        assert_eq!(tick_interval_ms(0), 500);
    }

    #[test]
    fn test_level_threshold_boundary() {
        assert_eq!(level_threshold(1), 10);
        assert_eq!(level_threshold(2), 22);
        assert!(!reaches_next_level(9, 1));
        assert!(reaches_next_level(10, 1));
        assert!(!reaches_next_level(21, 2));
        assert!(reaches_next_level(22, 2));
    }
}
