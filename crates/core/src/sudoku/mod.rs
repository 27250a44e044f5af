//! Classic 9x9 sudoku: definition codec, legality checks and solver.
//!
//! A *definition* is a flat, row-major string of 81 cells where each cell is
//! a digit `1`-`9` or a blank (`' '`) placeholder. Anything that is neither a
//! digit nor a blank is discarded before the length check, so definitions
//! may carry line breaks between rows.
//!
//! Both the codec and the solver observe a [`CancellationToken`] so a long
//! search can be aborted from the outside. Cancellation is reported as
//! [`SudokuError::Cancelled`] and is never folded into
//! [`SudokuError::Unsolvable`].

use std::fmt;

use tokio_util::sync::CancellationToken;

use crate::error::CoreError;

mod grid;
mod solver;

pub use grid::Grid;
pub use solver::solve;

/// Side length of the grid (and number of distinct digits).
pub const SIZE: usize = 9;

/// Side length of a box.
pub const BOX_SIZE: usize = 3;

/// Number of cells in a definition.
pub const CELL_COUNT: usize = SIZE * SIZE;

/// Placeholder for an unfilled cell in a definition string.
pub const BLANK: char = ' ';

// ---------------------------------------------------------------------------
// Units
// ---------------------------------------------------------------------------

/// A group of nine cells that must not repeat a digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Row,
    Column,
    Box,
}

impl Unit {
    /// Legality is checked over units in this fixed order.
    pub const ALL: [Unit; 3] = [Unit::Row, Unit::Column, Unit::Box];

    /// Coordinates `(row, col)` of the `offset`-th cell of unit `index`.
    ///
    /// Boxes are numbered row-major, so box 0 is top-left and box 8 is
    /// bottom-right.
    pub fn cell(self, index: usize, offset: usize) -> (usize, usize) {
        match self {
            Unit::Row => (index, offset),
            Unit::Column => (offset, index),
            Unit::Box => (
                (index / BOX_SIZE) * BOX_SIZE + offset / BOX_SIZE,
                (index % BOX_SIZE) * BOX_SIZE + offset % BOX_SIZE,
            ),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Row => f.write_str("row"),
            Unit::Column => f.write_str("column"),
            Unit::Box => f.write_str("box"),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failures of the codec, the legality checker and the solver.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SudokuError {
    #[error("definition must be provided")]
    Empty,

    #[error("definition must contain exactly 81 cells (digits or ' ')")]
    InvalidLength { found: usize },

    #[error("definition contains invalid characters")]
    InvalidCharacters { character: char, position: usize },

    /// `index` is zero-based; the message reports it one-based.
    #[error("definition violates Sudoku constraints: digit {digit} repeats in {unit} {}", .index + 1)]
    ConstraintViolation { unit: Unit, index: usize, digit: u8 },

    #[error("Sudoku is unsolvable")]
    Unsolvable,

    #[error("solve cancelled")]
    Cancelled,
}

impl From<SudokuError> for CoreError {
    fn from(err: SudokuError) -> Self {
        match err {
            SudokuError::Unsolvable => CoreError::Unsolvable(err.to_string()),
            SudokuError::Cancelled => CoreError::Cancelled,
            other => CoreError::Validation(other.to_string()),
        }
    }
}

/// Return [`SudokuError::Cancelled`] once `cancel` has fired.
pub(crate) fn ensure_not_cancelled(cancel: &CancellationToken) -> Result<(), SudokuError> {
    if cancel.is_cancelled() {
        Err(SudokuError::Cancelled)
    } else {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Parse, check and solve a definition, returning the 81-digit solution.
///
/// Deterministic: cells are filled row-major and candidates are tried in
/// ascending order, so the same definition always yields the same string.
pub fn solve_definition(definition: &str, cancel: &CancellationToken) -> Result<String, SudokuError> {
    let puzzle = Grid::parse(definition, cancel)?;
    let solution = solve(&puzzle, cancel)?;
    Ok(solution.encode())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    const CLASSIC: &str = concat!(
        "53  7    ", "6  195   ", " 98    6 ", "8   6   3", "4  8 3  1", "7   2   6",
        " 6    28 ", "   419  5", "    8  79",
    );

    #[test]
    fn box_cells_are_row_major() {
        assert_eq!(Unit::Box.cell(0, 0), (0, 0));
        assert_eq!(Unit::Box.cell(4, 4), (4, 4));
        assert_eq!(Unit::Box.cell(5, 2), (3, 8));
        assert_eq!(Unit::Box.cell(8, 8), (8, 8));
    }

    #[test]
    fn solve_definition_returns_solution_string() {
        let cancel = CancellationToken::new();
        let solution = solve_definition(CLASSIC, &cancel).unwrap();
        assert_eq!(
            solution,
            "534678912672195348198342567859761423426853791713924856961537284287419635345286179"
        );
    }

    #[test]
    fn unsolvable_maps_to_its_own_core_variant() {
        let core: CoreError = SudokuError::Unsolvable.into();
        assert_eq!(core, CoreError::Unsolvable("Sudoku is unsolvable".into()));
    }

    #[test]
    fn cancellation_is_not_unsolvable() {
        let core: CoreError = SudokuError::Cancelled.into();
        assert_matches!(core, CoreError::Cancelled);
    }

    #[test]
    fn codec_errors_map_to_validation() {
        let core: CoreError = SudokuError::InvalidLength { found: 6 }.into();
        assert_eq!(
            core,
            CoreError::Validation("definition must contain exactly 81 cells (digits or ' ')".into())
        );

        let core: CoreError = SudokuError::ConstraintViolation {
            unit: Unit::Row,
            index: 0,
            digit: 1,
        }
        .into();
        assert_eq!(
            core,
            CoreError::Validation(
                "definition violates Sudoku constraints: digit 1 repeats in row 1".into()
            )
        );
    }
}
