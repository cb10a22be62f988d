use thiserror::Error;

use crate::board::Board;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SolveError {
    #[error("the grid is already complete")]
    AlreadySolved,
    #[error("no completion satisfies the row, column, and box constraints")]
    Unsolvable,
}

/// Depth-first backtracking search over a single owned grid.
///
/// Decision points are visited in row-major order and candidates tried in
/// ascending order, so the solution reached on a multi-solution puzzle is
/// deterministic: the lexicographically smallest completion.
#[derive(Debug)]
pub struct Solver {
    board: Board,
}

impl Solver {
    #[must_use]
    pub const fn new(board: Board) -> Self {
        Self { board }
    }

    /// Builds a solver and immediately runs the search, propagating its
    /// failure. A full grid is rejected with `AlreadySolved` here exactly
    /// like an explicit `solve` call.
    pub fn auto_solve(board: Board) -> Result<Self, SolveError> {
        let mut solver = Self::new(board);
        solver.solve()?;
        Ok(solver)
    }

    /// Fills every empty cell in place and returns the solved grid.
    ///
    /// On failure the grid is left exactly as it was: every trial placement
    /// of the search is rolled back.
    pub fn solve(&mut self) -> Result<Board, SolveError> {
        if self.board.is_full() {
            return Err(SolveError::AlreadySolved);
        }
        if Self::solve_rec(&mut self.board) {
            #[cfg(feature = "paranoid")]
            assert!(self.board.is_solved(), "search accepted a grid that fails validation");

            Ok(self.board)
        } else {
            Err(SolveError::Unsolvable)
        }
    }

    fn solve_rec(board: &mut Board) -> bool {
        let Some((row, col)) = board.first_empty() else {
            return true;
        };
        for value in 1..=9_u8 {
            if !board.can_place(row, col, value) {
                continue;
            }
            let mut trial = Trial::place(board, row, col, value);
            if Self::solve_rec(trial.board()) {
                trial.commit();
                return true;
            }
        }
        false
    }

    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn into_board(self) -> Board {
        self.board
    }
}

/// A tentative placement. Rolls the cell back to empty on drop unless the
/// placement was committed, so no failing search path can leave a trial
/// value behind.
struct Trial<'b> {
    board: &'b mut Board,
    row: usize,
    col: usize,
    keep: bool,
}

impl<'b> Trial<'b> {
    fn place(board: &'b mut Board, row: usize, col: usize, value: u8) -> Self {
        #[cfg(feature = "paranoid")]
        assert_eq!(board[(row, col)], 0, "trial placement on a filled cell");

        board.set(row, col, value);
        Self { board, row, col, keep: false }
    }

    fn board(&mut self) -> &mut Board {
        &mut *self.board
    }

    fn commit(mut self) {
        self.keep = true;
    }
}

impl Drop for Trial<'_> {
    fn drop(&mut self) {
        if !self.keep {
            self.board.set(self.row, self.col, 0);
        }
    }
}
