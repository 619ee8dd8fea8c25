use std::{fmt, str::FromStr};

use strum::{Display, VariantArray};

use crate::{
    env::{DiscreteAction, Environment},
    Error, Result,
};

/// Reward for stepping onto a [`Cell::Success`] square
pub const SUCCESS_REWARD: f64 = 100.0;
/// Reward for stepping onto a [`Cell::Fail`] square
pub const FAIL_REWARD: f64 = -100.0;
/// Reward for any other move that changes position
pub const STEP_REWARD: f64 = -1.0;
/// Reward for a move blocked by the edge of the grid, overriding the cell reward
pub const BLOCKED_REWARD: f64 = -10.0;

/// Text definition of the canonical 4x4 maze
pub const CANONICAL: [&str; 4] = ["----", "--x-", "-xo-", "----"];

/// The kind of a square in the maze
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cell {
    Free,
    /// Terminal square with a negative reward
    Fail,
    /// Terminal square with a positive reward
    Success,
}

impl Cell {
    /// Character used for this cell in maze definitions and rendering
    pub const fn symbol(self) -> char {
        match self {
            Cell::Free => '-',
            Cell::Fail => 'x',
            Cell::Success => 'o',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '-' => Some(Cell::Free),
            'x' => Some(Cell::Fail),
            'o' => Some(Cell::Success),
            _ => None,
        }
    }

    pub const fn is_terminal(self) -> bool {
        !matches!(self, Cell::Free)
    }
}

/// Grid coordinates of the agent
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl From<(usize, usize)> for Pos {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(VariantArray, Display, Clone, Copy, Debug, Hash, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum Action {
    Left,
    Right,
    Up,
    Down,
}

impl DiscreteAction for Action {
    fn all() -> &'static [Self] {
        Self::VARIANTS
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// A small grid world with free squares, failing squares and a goal
///
/// The agent moves one square per action. Moves into the edge of the grid leave it in
/// place and are penalized with [`BLOCKED_REWARD`]. Entering a [`Cell::Fail`] or
/// [`Cell::Success`] square ends the episode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maze {
    cells: Vec<Cell>,
    rows: usize,
    cols: usize,
}

impl Maze {
    /// Parse a maze from text rows, using `-` for free squares, `x` for failing squares
    /// and `o` for the goal
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self> {
        let cols = rows
            .first()
            .map(|r| r.as_ref().chars().count())
            .ok_or(Error::EmptyGrid)?;
        if cols == 0 {
            return Err(Error::EmptyGrid);
        }

        let mut cells = Vec::with_capacity(rows.len() * cols);
        for (row, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            let got = line.chars().count();
            if got != cols {
                return Err(Error::RaggedGrid {
                    row,
                    expected: cols,
                    got,
                });
            }

            for (col, character) in line.chars().enumerate() {
                let cell = Cell::from_symbol(character).ok_or(Error::InvalidCell {
                    character,
                    row,
                    col,
                })?;
                cells.push(cell);
            }
        }

        Ok(Self {
            cells,
            rows: rows.len(),
            cols,
        })
    }

    /// The 4x4 maze with failing squares at (1, 2) and (2, 1) and the goal at (2, 2)
    pub fn canonical() -> Self {
        use Cell::{Fail as X, Free as F, Success as O};
        Self {
            cells: vec![
                F, F, F, F, //
                F, F, X, F, //
                F, X, O, F, //
                F, F, F, F, //
            ],
            rows: 4,
            cols: 4,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Get the cell at `pos`, or `None` if it is outside the grid
    pub fn cell(&self, pos: Pos) -> Option<Cell> {
        self.contains(&pos)
            .then(|| self.cells[pos.row * self.cols + pos.col])
    }

    /// Iterate over the grid one row at a time
    pub fn grid(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.cols)
    }

    /// Every position in the grid in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.cols).map(move |col| Pos::new(row, col)))
    }

    pub(crate) fn check(&self, pos: Pos) -> Result<Cell> {
        self.cell(pos).ok_or(Error::InvalidState {
            row: pos.row,
            col: pos.col,
            rows: self.rows,
            cols: self.cols,
        })
    }

    /// Position reached by taking `action` from `pos`, clamped to the grid
    fn shift(&self, pos: Pos, action: Action) -> Pos {
        let Pos { row, col } = pos;
        match action {
            Action::Left => Pos::new(row, col.saturating_sub(1)),
            Action::Right => Pos::new(row, (col + 1).min(self.cols - 1)),
            Action::Up => Pos::new(row.saturating_sub(1), col),
            Action::Down => Pos::new((row + 1).min(self.rows - 1), col),
        }
    }
}

impl Default for Maze {
    fn default() -> Self {
        Self::canonical()
    }
}

impl FromStr for Maze {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let rows = s
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>();
        Self::from_rows(&rows)
    }
}

impl Environment for Maze {
    type State = Pos;
    type Action = Action;

    fn contains(&self, state: &Self::State) -> bool {
        state.row < self.rows && state.col < self.cols
    }

    fn validate(&self, state: &Self::State) -> Result<()> {
        self.check(*state).map(|_| ())
    }

    fn transition(
        &self,
        state: Self::State,
        action: Self::Action,
    ) -> Result<(Self::State, f64, bool)> {
        self.check(state)?;

        let next_state = self.shift(state, action);
        let (mut reward, terminated) = match self.check(next_state)? {
            Cell::Success => (SUCCESS_REWARD, true),
            Cell::Fail => (FAIL_REWARD, true),
            Cell::Free => (STEP_REWARD, false),
        };

        // The cell reward is classified first and then overridden.
        if next_state == state {
            reward = BLOCKED_REWARD;
        }

        Ok((next_state, reward, terminated))
    }
}
