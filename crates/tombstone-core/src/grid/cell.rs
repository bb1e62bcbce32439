use super::Direction;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Number of cells along one side of the grid.
pub const GRID_WIDTH: u8 = 4;
/// Total number of cells in the grid.
pub const CELL_COUNT: usize = (GRID_WIDTH * GRID_WIDTH) as usize;

/// A cell of the 4×4 grid, numbered row-major from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Cell(u8);

impl Cell {
    /// Where the opponent starts (top-right corner).
    pub const START: Cell = Cell(3);
    /// The cell the opponent is trying to reach (bottom-left corner).
    pub const GOAL: Cell = Cell(12);

    pub const fn new(index: u8) -> Option<Self> {
        if (index as usize) < CELL_COUNT {
            Some(Cell(index))
        } else {
            None
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        u8::try_from(index).ok().and_then(Self::new)
    }

    pub fn all() -> impl Iterator<Item = Cell> {
        (0..CELL_COUNT as u8).map(Cell)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn row(self) -> u8 {
        self.0 / GRID_WIDTH
    }

    pub const fn col(self) -> u8 {
        self.0 % GRID_WIDTH
    }

    /// The neighbouring cell one step away, or `None` if the step leaves the grid.
    pub const fn step(self, direction: Direction) -> Option<Cell> {
        match direction {
            Direction::Down if self.row() < GRID_WIDTH - 1 => Some(Cell(self.0 + GRID_WIDTH)),
            Direction::Up if self.row() > 0 => Some(Cell(self.0 - GRID_WIDTH)),
            Direction::Right if self.col() < GRID_WIDTH - 1 => Some(Cell(self.0 + 1)),
            Direction::Left if self.col() > 0 => Some(Cell(self.0 - 1)),
            _ => None,
        }
    }

    pub const fn manhattan(self, other: Cell) -> u8 {
        self.row().abs_diff(other.row()) + self.col().abs_diff(other.col())
    }
}

impl TryFrom<u8> for Cell {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Cell::new(value).ok_or_else(|| format!("cell index {value} is outside the 4x4 grid"))
    }
}

impl From<Cell> for u8 {
    fn from(cell: Cell) -> u8 {
        cell.0
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
