//! # Board — Queen Placements, Attack Test, Canonical Encoding
//!
//! A [`Board`] is one column index per row: entry `r` is the column of the
//! queen in row `r`. Complete boards come out of the search engine or out of
//! [`validate`]; partially filled boards exist only while a player is editing
//! and are modelled separately by [`PartialBoard`], where an empty row is
//! `None`.
//!
//! ## Attack Test
//!
//! [`is_safe`] folds the column and both diagonal checks into one pass over
//! the prior rows: a queen at `(i, c_i)` attacks `(row, col)` iff `c_i == col`,
//! `c_i - i == col - row` (same "\" diagonal), or `c_i + i == col + row` (same
//! "/" diagonal).
//!
//! ## Canonical Encoding
//!
//! The identity key of a solution is the literal list rendering
//! `"[0, 4, 7, 5, 2, 6, 1, 3]"`. The recognition store keys records on exactly
//! this string, so [`Board::encoding`] and the `Display` impl must never change
//! format.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Board size of the reference puzzle.
pub const BOARD_SIZE: usize = 8;

/// Returns true if a queen at (`candidate_row`, `candidate_col`) is not
/// attacked by any queen in the rows of `partial` before `candidate_row`.
pub fn is_safe(partial: &[usize], candidate_row: usize, candidate_col: usize) -> bool {
    let row = candidate_row as i64;
    let col = candidate_col as i64;
    partial
        .iter()
        .take(candidate_row)
        .enumerate()
        .all(|(i, &c)| {
            let (i, c) = (i as i64, c as i64);
            c != col && c - i != col - row && c + i != col + row
        })
}

/// Check that `cells` is a complete, non-attacking placement on a
/// `size`x`size` board. Reports the first violation found, scanning rows top
/// to bottom.
pub fn validate(cells: &[usize], size: usize) -> Result<Board, ValidationError> {
    if cells.len() != size {
        return Err(ValidationError::WrongLength {
            expected: size,
            found: cells.len(),
        });
    }
    if let Some((row, &col)) = cells.iter().enumerate().find(|&(_, &c)| c >= size) {
        return Err(ValidationError::OutOfRange { row, col, size });
    }
    for second in 1..cells.len() {
        for first in 0..second {
            let (a, b) = (cells[first], cells[second]);
            if a == b {
                return Err(ValidationError::ColumnConflict {
                    first,
                    second,
                    col: a,
                });
            }
            if a.abs_diff(b) == second - first {
                return Err(ValidationError::DiagonalConflict { first, second });
            }
        }
    }
    Ok(Board(cells.to_vec()))
}

/// A complete placement, one column per row.
///
/// Search output is always a solution; boards parsed from text are not
/// checked until passed through [`validate`] (or [`Board::is_solution`]).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Board(Vec<usize>);

impl Board {
    pub fn from_cells(cells: Vec<usize>) -> Self {
        Board(cells)
    }

    pub fn cells(&self) -> &[usize] {
        &self.0
    }

    pub fn size(&self) -> usize {
        self.0.len()
    }

    pub fn into_cells(self) -> Vec<usize> {
        self.0
    }

    /// Canonical identity key, e.g. `"[0, 4, 7, 5, 2, 6, 1, 3]"`.
    pub fn encoding(&self) -> String {
        self.to_string()
    }

    pub fn is_solution(&self) -> bool {
        validate(&self.0, self.0.len()).is_ok()
    }

    /// Text grid, `Q` for a queen and `.` for an empty square, one line per
    /// row and no trailing newline.
    pub fn render(&self) -> String {
        let size = self.0.len();
        self.0
            .iter()
            .map(|&queen| {
                (0..size)
                    .map(|col| if col == queen { "Q" } else { "." })
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, col) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", col)?;
        }
        f.write_str("]")
    }
}

/// Parses `[0, 4, 7, 5, 2, 6, 1, 3]`, `0,4,7,5,2,6,1,3` or
/// `0 4 7 5 2 6 1 3`. Only the syntax is checked here.
impl FromStr for Board {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unparseable = || ValidationError::Unparseable {
            input: s.to_string(),
        };
        let trimmed = s.trim();
        let inner = match (trimmed.strip_prefix('['), trimmed.strip_suffix(']')) {
            (Some(_), Some(_)) => &trimmed[1..trimmed.len() - 1],
            (None, None) => trimmed,
            _ => return Err(unparseable()),
        };
        let cells = inner
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|tok| !tok.is_empty())
            .map(|tok| tok.parse::<usize>().map_err(|_| unparseable()))
            .collect::<Result<Vec<_>, _>>()?;
        if cells.is_empty() {
            return Err(unparseable());
        }
        Ok(Board(cells))
    }
}

/// A board being edited interactively: each row holds at most one queen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartialBoard {
    rows: Vec<Option<usize>>,
}

impl PartialBoard {
    pub fn new(size: usize) -> Self {
        PartialBoard {
            rows: vec![None; size],
        }
    }

    pub fn size(&self) -> usize {
        self.rows.len()
    }

    /// Put a queen on (`row`, `col`), replacing any queen already in `row`.
    pub fn place(&mut self, row: usize, col: usize) -> Result<(), ValidationError> {
        let size = self.rows.len();
        if row >= size || col >= size {
            return Err(ValidationError::OutOfRange { row, col, size });
        }
        self.rows[row] = Some(col);
        Ok(())
    }

    pub fn clear(&mut self, row: usize) {
        if let Some(slot) = self.rows.get_mut(row) {
            *slot = None;
        }
    }

    pub fn get(&self, row: usize) -> Option<usize> {
        self.rows.get(row).copied().flatten()
    }

    pub fn placed(&self) -> usize {
        self.rows.iter().filter(|r| r.is_some()).count()
    }

    /// Convert to a complete board, failing on the first empty row and then
    /// on any attack.
    pub fn to_board(&self) -> Result<Board, ValidationError> {
        let cells = self
            .rows
            .iter()
            .enumerate()
            .map(|(row, col)| col.ok_or(ValidationError::Unplaced { row }))
            .collect::<Result<Vec<_>, _>>()?;
        validate(&cells, self.rows.len())
    }
}

impl From<&Board> for PartialBoard {
    fn from(board: &Board) -> Self {
        PartialBoard {
            rows: board.cells().iter().map(|&c| Some(c)).collect(),
        }
    }
}
