//! Depth-first backtracking search.
//!
//! The search walks the blank cells of the puzzle in row-major order with an
//! explicit cursor instead of recursion. Each step tries the next candidate
//! above the cell's current value, so candidates are visited in ascending
//! order and the first solution found is the lexicographically smallest
//! one. Pre-filled cells never enter the cursor and are never retried.

use tokio_util::sync::CancellationToken;

use super::{ensure_not_cancelled, Grid, SudokuError, SIZE};

/// Solve a legal puzzle, returning a completed copy.
///
/// `puzzle` is left untouched. Fails with [`SudokuError::Unsolvable`] when
/// the search space is exhausted and with [`SudokuError::Cancelled`] as soon
/// as `cancel` fires; the token is polled on every step.
pub fn solve(puzzle: &Grid, cancel: &CancellationToken) -> Result<Grid, SudokuError> {
    let mut work = *puzzle;
    let blanks: Vec<(usize, usize)> = puzzle.blank_cells().collect();

    let mut depth = 0;
    while depth < blanks.len() {
        ensure_not_cancelled(cancel)?;

        let (row, col) = blanks[depth];
        let first_candidate = work.get(row, col) + 1;
        work.set(row, col, 0);

        match (first_candidate..=SIZE as u8).find(|&digit| work.is_safe(row, col, digit)) {
            Some(digit) => {
                work.set(row, col, digit);
                depth += 1;
            }
            // Undo already happened above; resume the previous cell.
            None if depth > 0 => depth -= 1,
            None => return Err(SudokuError::Unsolvable),
        }
    }

    ensure_not_cancelled(cancel)?;
    debug_assert!(work.is_solved());
    Ok(work)
}
