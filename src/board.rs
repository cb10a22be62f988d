#![warn(clippy::nursery)]
#![warn(clippy::pedantic)]
// #![warn(clippy::restriction)]

use std::fmt;
use std::ops::Index;
use std::str::FromStr;

use strum::Display;
use thiserror::Error;

const SEPARATOR: &str = "-----------------------";

/// One of the three constraint-group kinds a duplicate can show up in.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum House {
    Row,
    Column,
    Box,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InputError {
    #[error("expected 81 values in a flat grid, got {0}")]
    FlatLength(usize),
    #[error("expected 9 rows in a nested grid, got {0}")]
    RowCount(usize),
    #[error("row {row} has {len} values, expected 9")]
    RowLength { row: usize, len: usize },
    #[error("value {value} at ({row}, {col}) is outside 0..=9")]
    ValueOutOfRange { row: usize, col: usize, value: u8 },
    #[error("invalid character {0:?} in puzzle line")]
    BadChar(char),
    #[error("{value} appears more than once in {house} {index}")]
    Duplicate { house: House, index: usize, value: u8 },
}

/// A 9x9 grid of cells in `0..=9`, 0 meaning empty. The fallible
/// constructors validate shape, value range, and the given cells'
/// consistency, so every `Board` handed out is free of row, column,
/// and box duplicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board([[u8; 9]; 9]);

impl Board {
    /// The all-empty grid.
    #[must_use]
    pub const fn empty() -> Self {
        Self([[0; 9]; 9])
    }

    /// Builds a board from 81 row-major values.
    pub fn from_flat(values: &[u8]) -> Result<Self, InputError> {
        if values.len() != 81 {
            return Err(InputError::FlatLength(values.len()));
        }
        let mut cells = [[0; 9]; 9];
        for (index, &value) in values.iter().enumerate() {
            cells[index / 9][index % 9] = value;
        }
        Self::from_cells(cells)
    }

    /// Builds a board from 9 rows of 9 values each.
    pub fn from_nested(rows: &[Vec<u8>]) -> Result<Self, InputError> {
        if rows.len() != 9 {
            return Err(InputError::RowCount(rows.len()));
        }
        let mut cells = [[0; 9]; 9];
        for (row, values) in rows.iter().enumerate() {
            if values.len() != 9 {
                return Err(InputError::RowLength { row, len: values.len() });
            }
            for (col, &value) in values.iter().enumerate() {
                cells[row][col] = value;
            }
        }
        Self::from_cells(cells)
    }

    /// Builds a board from an already shaped 9x9 array.
    pub fn from_rows(rows: [[u8; 9]; 9]) -> Result<Self, InputError> {
        Self::from_cells(rows)
    }

    /// Parses the 81 character line format: `'1'..='9'` for givens, `'.'`
    /// or `'0'` for empty cells.
    pub fn from_line(line: &str) -> Result<Self, InputError> {
        if line.len() != 81 {
            return Err(InputError::FlatLength(line.len()));
        }
        let mut values = [0; 81];
        for (index, byte) in line.bytes().enumerate() {
            values[index] = match byte {
                b'1'..=b'9' => byte - b'0',
                b'.' | b'0' => 0,
                _ => return Err(InputError::BadChar(char::from(byte))),
            };
        }
        Self::from_flat(&values)
    }

    fn from_cells(cells: [[u8; 9]; 9]) -> Result<Self, InputError> {
        for (row, values) in cells.iter().enumerate() {
            for (col, &value) in values.iter().enumerate() {
                if value > 9 {
                    return Err(InputError::ValueOutOfRange { row, col, value });
                }
            }
        }
        let board = Self(cells);
        board.check_givens()?;
        Ok(board)
    }

    fn check_givens(&self) -> Result<(), InputError> {
        for row in 0..9 {
            for col in 0..9 {
                let value = self.0[row][col];
                if value == 0 {
                    continue;
                }
                if let Some((house, index)) = self.duplicate_in(row, col, value) {
                    return Err(InputError::Duplicate { house, index, value });
                }
            }
        }
        Ok(())
    }

    fn duplicate_in(&self, row: usize, col: usize, value: u8) -> Option<(House, usize)> {
        if self.0[row].iter().filter(|&&cell| cell == value).count() > 1 {
            return Some((House::Row, row));
        }
        if (0..9).filter(|&r| self.0[r][col] == value).count() > 1 {
            return Some((House::Column, col));
        }
        let (box_row, box_col) = (row / 3 * 3, col / 3 * 3);
        let in_box = self.0[box_row..box_row + 3]
            .iter()
            .flat_map(|cells| &cells[box_col..box_col + 3])
            .filter(|&&cell| cell == value)
            .count();
        if in_box > 1 {
            return Some((House::Box, box_row + box_col / 3));
        }
        None
    }

    /// Trial legality: whether `value` may go into the empty cell at
    /// (`row`, `col`) without clashing in its row, column, or box.
    #[must_use]
    pub fn can_place(&self, row: usize, col: usize, value: u8) -> bool {
        for i in 0..9 {
            if self.0[row][i] == value || self.0[i][col] == value {
                return false;
            }
        }
        let (box_row, box_col) = (row / 3 * 3, col / 3 * 3);
        for r in box_row..box_row + 3 {
            for c in box_col..box_col + 3 {
                if self.0[r][c] == value {
                    return false;
                }
            }
        }
        true
    }

    /// Pre-fill validity for a single cell: 0 is always consistent, a
    /// non-zero value must not occur more than once in the cell's row,
    /// column, or box.
    #[must_use]
    pub fn placement_consistent(&self, row: usize, col: usize, value: u8) -> bool {
        value == 0 || self.duplicate_in(row, col, value).is_none()
    }

    /// Row-major scan for the next empty cell.
    #[must_use]
    pub fn first_empty(&self) -> Option<(usize, usize)> {
        for (row, cells) in self.0.iter().enumerate() {
            for (col, &cell) in cells.iter().enumerate() {
                if cell == 0 {
                    return Some((row, col));
                }
            }
        }
        None
    }

    /// Whether the grid has no empty cells left.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.0.iter().flatten().all(|&cell| cell != 0)
    }

    /// Whether every row, column, and box holds each of 1..=9 exactly once.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        let mut rows = [[false; 10]; 9];
        let mut cols = [[false; 10]; 9];
        let mut boxes = [[false; 10]; 9];
        for row in 0..9 {
            for col in 0..9 {
                let value = usize::from(self.0[row][col]);
                if value == 0 {
                    return false;
                }
                let box_index = row / 3 * 3 + col / 3;
                if rows[row][value] || cols[col][value] || boxes[box_index][value] {
                    return false;
                }
                rows[row][value] = true;
                cols[col][value] = true;
                boxes[box_index][value] = true;
            }
        }
        true
    }

    /// Number of filled cells.
    #[must_use]
    pub fn clue_count(&self) -> usize {
        self.0.iter().flatten().filter(|&&cell| cell != 0).count()
    }

    #[must_use]
    pub fn to_flat_array(&self) -> [u8; 81] {
        let mut flat = [0; 81];
        for (index, &cell) in self.0.iter().flatten().enumerate() {
            flat[index] = cell;
        }
        flat
    }

    #[must_use]
    pub const fn to_2d_array(&self) -> [[u8; 9]; 9] {
        self.0
    }

    /// Fixed-width text block: one `digit + space` per cell, `" | "` after
    /// columns 2 and 5, and a 23 dash separator line before row 0 and after
    /// rows 2, 5, and 8. Empty cells render as `0`.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(4 * 24 + 9 * 25);
        out.push_str(SEPARATOR);
        out.push('\n');
        for (row, cells) in self.0.iter().enumerate() {
            for (col, &cell) in cells.iter().enumerate() {
                out.push(char::from(b'0' + cell));
                out.push(' ');
                if col == 2 || col == 5 {
                    out.push_str(" | ");
                }
            }
            out.push('\n');
            if row == 2 || row == 5 || row == 8 {
                out.push_str(SEPARATOR);
                out.push('\n');
            }
        }
        out
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, value: u8) {
        self.0[row][col] = value;
    }
}

impl Index<(usize, usize)> for Board {
    type Output = u8;

    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        &self.0[row][col]
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl FromStr for Board {
    type Err = InputError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        Self::from_line(line)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[rustfmt::skip]
    const CANONICAL: [u8; 81] = [
        5, 3, 0,  0, 7, 0,  0, 0, 0,
        6, 0, 0,  1, 9, 5,  0, 0, 0,
        0, 9, 8,  0, 0, 0,  0, 6, 0,
        8, 0, 0,  0, 6, 0,  0, 0, 3,
        4, 0, 0,  8, 0, 3,  0, 0, 1,
        7, 0, 0,  0, 2, 0,  0, 0, 6,
        0, 6, 0,  0, 0, 0,  2, 8, 0,
        0, 0, 0,  4, 1, 9,  0, 0, 5,
        0, 0, 0,  0, 8, 0,  0, 7, 9,
    ];

    #[rustfmt::skip]
    const CANONICAL_SOLUTION: [u8; 81] = [
        5, 3, 4,  6, 7, 8,  9, 1, 2,
        6, 7, 2,  1, 9, 5,  3, 4, 8,
        1, 9, 8,  3, 4, 2,  5, 6, 7,
        8, 5, 9,  7, 6, 1,  4, 2, 3,
        4, 2, 6,  8, 5, 3,  7, 9, 1,
        7, 1, 3,  9, 2, 4,  8, 5, 6,
        9, 6, 1,  5, 3, 7,  2, 8, 4,
        2, 8, 7,  4, 1, 9,  6, 3, 5,
        3, 4, 5,  2, 8, 6,  1, 7, 9,
    ];

    const RENDERED_CANONICAL: &str = concat!(
        "-----------------------\n",
        "5 3 0  | 0 7 0  | 0 0 0 \n",
        "6 0 0  | 1 9 5  | 0 0 0 \n",
        "0 9 8  | 0 0 0  | 0 6 0 \n",
        "-----------------------\n",
        "8 0 0  | 0 6 0  | 0 0 3 \n",
        "4 0 0  | 8 0 3  | 0 0 1 \n",
        "7 0 0  | 0 2 0  | 0 0 6 \n",
        "-----------------------\n",
        "0 6 0  | 0 0 0  | 2 8 0 \n",
        "0 0 0  | 4 1 9  | 0 0 5 \n",
        "0 0 0  | 0 8 0  | 0 7 9 \n",
        "-----------------------\n",
    );

    const RENDERED_SOLUTION: &str = concat!(
        "-----------------------\n",
        "5 3 4  | 6 7 8  | 9 1 2 \n",
        "6 7 2  | 1 9 5  | 3 4 8 \n",
        "1 9 8  | 3 4 2  | 5 6 7 \n",
        "-----------------------\n",
        "8 5 9  | 7 6 1  | 4 2 3 \n",
        "4 2 6  | 8 5 3  | 7 9 1 \n",
        "7 1 3  | 9 2 4  | 8 5 6 \n",
        "-----------------------\n",
        "9 6 1  | 5 3 7  | 2 8 4 \n",
        "2 8 7  | 4 1 9  | 6 3 5 \n",
        "3 4 5  | 2 8 6  | 1 7 9 \n",
        "-----------------------\n",
    );

    #[test]
    fn flat_round_trip() {
        let board = Board::from_flat(&CANONICAL).unwrap();
        assert_eq!(board.to_flat_array(), CANONICAL);
        assert_eq!(Board::from_flat(&board.to_flat_array()), Ok(board));
    }

    #[test]
    fn nested_round_trip() {
        let board = Board::from_flat(&CANONICAL).unwrap();
        assert_eq!(Board::from_rows(board.to_2d_array()), Ok(board));

        let rows: Vec<Vec<u8>> = board.to_2d_array().iter().map(|row| row.to_vec()).collect();
        assert_eq!(Board::from_nested(&rows), Ok(board));
    }

    #[test]
    fn rejects_wrong_flat_length() {
        assert_eq!(Board::from_flat(&[0; 80]), Err(InputError::FlatLength(80)));
        assert_eq!(Board::from_flat(&[0; 82]), Err(InputError::FlatLength(82)));
    }

    #[test]
    fn rejects_wrong_nested_shape() {
        let short = vec![vec![0; 9]; 8];
        assert_eq!(Board::from_nested(&short), Err(InputError::RowCount(8)));

        let mut ragged = vec![vec![0; 9]; 9];
        ragged[3] = vec![0; 10];
        assert_eq!(Board::from_nested(&ragged), Err(InputError::RowLength { row: 3, len: 10 }));
    }

    #[test]
    fn rejects_out_of_range_value() {
        let mut values = [0; 81];
        values[40] = 10;
        assert_eq!(
            Board::from_flat(&values),
            Err(InputError::ValueOutOfRange { row: 4, col: 4, value: 10 })
        );
    }

    #[test]
    fn rejects_row_duplicate() {
        let mut values = [0; 81];
        values[0] = 5;
        values[1] = 5;
        assert_eq!(
            Board::from_flat(&values),
            Err(InputError::Duplicate { house: House::Row, index: 0, value: 5 })
        );
    }

    #[test]
    fn rejects_column_duplicate() {
        let mut values = [0; 81];
        values[0] = 7;
        values[5 * 9] = 7;
        assert_eq!(
            Board::from_flat(&values),
            Err(InputError::Duplicate { house: House::Column, index: 0, value: 7 })
        );
    }

    #[test]
    fn rejects_box_duplicate() {
        let mut values = [0; 81];
        values[0] = 3;
        values[9 + 1] = 3;
        assert_eq!(
            Board::from_flat(&values),
            Err(InputError::Duplicate { house: House::Box, index: 0, value: 3 })
        );
    }

    #[test]
    fn parses_line_format() {
        let dotted =
            "53..7....6..195....98....6.8...6...34..8.3..17...2...6.6....28....419..5....8..79";
        let zeroed =
            "530070000600195000098000060800060003400803001700020006060000280000419005000080079";
        let board = Board::from_flat(&CANONICAL).unwrap();
        assert_eq!(Board::from_line(dotted), Ok(board));
        assert_eq!(zeroed.parse::<Board>(), Ok(board));
    }

    #[test]
    fn rejects_bad_line() {
        assert_eq!(Board::from_line(&"1".repeat(80)), Err(InputError::FlatLength(80)));
        let with_letter = format!("x{}", "0".repeat(80));
        assert_eq!(Board::from_line(&with_letter), Err(InputError::BadChar('x')));
    }

    #[test]
    fn trial_legality_on_canonical() {
        let board = Board::from_flat(&CANONICAL).unwrap();
        assert!(board.can_place(0, 2, 4));
        assert!(!board.can_place(0, 2, 5)); // 5 already in row 0
        assert!(!board.can_place(0, 2, 9)); // 9 already in box 0
        assert!(board.can_place(0, 2, 1)); // legal even though not the solution value
        assert!(board.can_place(4, 4, 5));
        assert!(!board.can_place(4, 4, 6)); // 6 already in column 4
        assert!(board.can_place(8, 0, 3));
        assert!(!board.can_place(8, 0, 8));
    }

    #[test]
    fn placement_consistency() {
        let mut board = Board::from_flat(&CANONICAL).unwrap();
        assert!(board.placement_consistent(0, 2, 0)); // empty is never a violation
        assert!(board.placement_consistent(0, 0, 5));
        assert!(board.placement_consistent(4, 3, 8));

        // force a duplicate behind the constructor's back
        board.set(0, 1, 5);
        assert!(!board.placement_consistent(0, 0, 5));
        assert!(!board.placement_consistent(0, 1, 5));
    }

    #[test]
    fn first_empty_scans_row_major() {
        let board = Board::from_flat(&CANONICAL).unwrap();
        assert_eq!(board.first_empty(), Some((0, 2)));
        assert_eq!(Board::empty().first_empty(), Some((0, 0)));

        let solved = Board::from_flat(&CANONICAL_SOLUTION).unwrap();
        assert_eq!(solved.first_empty(), None);
    }

    #[test]
    fn full_and_solved_predicates() {
        let board = Board::from_flat(&CANONICAL).unwrap();
        assert!(!board.is_full());
        assert!(!board.is_solved());

        let solved = Board::from_flat(&CANONICAL_SOLUTION).unwrap();
        assert!(solved.is_full());
        assert!(solved.is_solved());
    }

    #[test]
    fn full_grid_with_duplicates_is_not_solved() {
        let mut tampered = Board::from_flat(&CANONICAL_SOLUTION).unwrap();
        tampered.set(0, 0, 9);
        tampered.set(8, 8, 5);
        assert!(tampered.is_full());
        assert!(!tampered.is_solved());
    }

    #[test]
    fn counts_clues() {
        assert_eq!(Board::from_flat(&CANONICAL).unwrap().clue_count(), 30);
        assert_eq!(Board::empty().clue_count(), 0);
        assert_eq!(Board::from_flat(&CANONICAL_SOLUTION).unwrap().clue_count(), 81);
    }

    #[test]
    fn renders_fixed_layout() {
        let board = Board::from_flat(&CANONICAL).unwrap();
        assert_eq!(board.render(), RENDERED_CANONICAL);

        let solved = Board::from_flat(&CANONICAL_SOLUTION).unwrap();
        assert_eq!(solved.render(), RENDERED_SOLUTION);
    }

    #[test]
    fn display_matches_render() {
        let board = Board::from_flat(&CANONICAL).unwrap();
        assert_eq!(board.to_string(), board.render());
    }

    #[test]
    fn accessors_are_idempotent() {
        let board = Board::from_flat(&CANONICAL).unwrap();
        assert_eq!(board.render(), board.render());
        assert_eq!(board.to_flat_array(), board.to_flat_array());
        assert_eq!(board.to_2d_array(), board.to_2d_array());
    }

    #[test]
    fn indexes_cells() {
        let board = Board::from_flat(&CANONICAL).unwrap();
        assert_eq!(board[(0, 0)], 5);
        assert_eq!(board[(0, 2)], 0);
        assert_eq!(board[(8, 8)], 9);
    }

    #[test]
    fn empty_board_is_all_zeros() {
        assert_eq!(Board::from_flat(&[0; 81]), Ok(Board::empty()));
        assert_eq!(Board::empty().to_flat_array(), [0; 81]);
    }
}
