use std::fmt;

use tokio_util::sync::CancellationToken;

use super::{ensure_not_cancelled, SudokuError, Unit, BLANK, BOX_SIZE, CELL_COUNT, SIZE};

/// A 9x9 matrix of digits where `0` marks an unfilled cell.
///
/// Derived transiently from a definition string; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    cells: [[u8; SIZE]; SIZE],
}

impl Grid {
    /// Decode a definition string and verify no pre-filled digit repeats.
    ///
    /// Steps, each failing with its own [`SudokuError`] variant:
    /// 1. reject blank or whitespace-only input,
    /// 2. drop every character that is neither an ASCII digit nor a blank and
    ///    require exactly 81 cells to remain,
    /// 3. reject `0` (the only digit that is not a valid cell value),
    /// 4. check rows, then columns, then boxes for repeated digits.
    pub fn parse(definition: &str, cancel: &CancellationToken) -> Result<Self, SudokuError> {
        if definition.trim().is_empty() {
            return Err(SudokuError::Empty);
        }
        ensure_not_cancelled(cancel)?;

        let cells: Vec<char> = definition
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == BLANK)
            .collect();
        if cells.len() != CELL_COUNT {
            return Err(SudokuError::InvalidLength { found: cells.len() });
        }

        let mut grid = Self {
            cells: [[0; SIZE]; SIZE],
        };
        for (position, &character) in cells.iter().enumerate() {
            ensure_not_cancelled(cancel)?;
            let value = match character {
                BLANK => 0,
                '1'..='9' => character as u8 - b'0',
                _ => {
                    return Err(SudokuError::InvalidCharacters {
                        character,
                        position,
                    })
                }
            };
            grid.cells[position / SIZE][position % SIZE] = value;
        }

        grid.check_legality(cancel)?;
        Ok(grid)
    }

    /// Report the first repeated digit, scanning every row, then every
    /// column, then every box.
    fn check_legality(&self, cancel: &CancellationToken) -> Result<(), SudokuError> {
        for unit in Unit::ALL {
            for index in 0..SIZE {
                ensure_not_cancelled(cancel)?;
                let mut seen = [false; SIZE + 1];
                for offset in 0..SIZE {
                    let (row, col) = unit.cell(index, offset);
                    let digit = self.cells[row][col];
                    if digit == 0 {
                        continue;
                    }
                    if seen[digit as usize] {
                        return Err(SudokuError::ConstraintViolation { unit, index, digit });
                    }
                    seen[digit as usize] = true;
                }
            }
        }
        Ok(())
    }

    /// Digit at `(row, col)`, `0` when unfilled.
    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.cells[row][col]
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, digit: u8) {
        self.cells[row][col] = digit;
    }

    /// Whether `digit` is absent from the row, column and box of `(row, col)`.
    pub fn is_safe(&self, row: usize, col: usize, digit: u8) -> bool {
        let box_row = (row / BOX_SIZE) * BOX_SIZE;
        let box_col = (col / BOX_SIZE) * BOX_SIZE;

        (0..SIZE).all(|i| {
            self.cells[row][i] != digit
                && self.cells[i][col] != digit
                && self.cells[box_row + i / BOX_SIZE][box_col + i % BOX_SIZE] != digit
        })
    }

    /// Unfilled cells in row-major order.
    pub fn blank_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..CELL_COUNT)
            .map(|i| (i / SIZE, i % SIZE))
            .filter(|&(row, col)| self.cells[row][col] == 0)
    }

    /// True when every row, column and box holds each digit 1-9 exactly once.
    pub fn is_solved(&self) -> bool {
        Unit::ALL.iter().all(|&unit| {
            (0..SIZE).all(|index| {
                let mut seen = [false; SIZE + 1];
                (0..SIZE).all(|offset| {
                    let (row, col) = unit.cell(index, offset);
                    let digit = self.cells[row][col] as usize;
                    digit != 0 && !std::mem::replace(&mut seen[digit], true)
                })
            })
        })
    }

    /// True when every filled cell of `puzzle` holds the same digit here.
    pub fn preserves_clues(&self, puzzle: &Grid) -> bool {
        (0..CELL_COUNT).all(|i| {
            let (row, col) = (i / SIZE, i % SIZE);
            puzzle.cells[row][col] == 0 || puzzle.cells[row][col] == self.cells[row][col]
        })
    }

    /// Serialize back to an 81-character, row-major definition string.
    pub fn encode(&self) -> String {
        self.cells
            .iter()
            .flatten()
            .map(|&digit| match digit {
                0 => BLANK,
                d => char::from(b'0' + d),
            })
            .collect()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}
