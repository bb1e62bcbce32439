use core::fmt;
use serde::{Deserialize, Serialize};

/// Orientation of an edge: `Horizontal` edges separate left/right neighbours,
/// `Vertical` edges separate up/down neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    Down = 0,
    Up = 1,
    Right = 2,
    Left = 3,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Down,
        Direction::Up,
        Direction::Right,
        Direction::Left,
    ];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Direction::Down),
            1 => Some(Direction::Up),
            2 => Some(Direction::Right),
            3 => Some(Direction::Left),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Down => Direction::Up,
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Left => Direction::Right,
        }
    }

    /// Axis of the edge crossed when stepping in this direction.
    pub const fn axis(self) -> Axis {
        match self {
            Direction::Down | Direction::Up => Axis::Vertical,
            Direction::Right | Direction::Left => Axis::Horizontal,
        }
    }

    pub const fn letter(self) -> char {
        match self {
            Direction::Down => 'D',
            Direction::Up => 'U',
            Direction::Right => 'R',
            Direction::Left => 'L',
        }
    }

    /// Renders a direction sequence as compact `DURL` letters.
    pub fn spell(directions: &[Direction]) -> String {
        directions.iter().map(|dir| dir.letter()).collect()
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Direction::Down => "down",
            Direction::Up => "up",
            Direction::Right => "right",
            Direction::Left => "left",
        };
        f.write_str(label)
    }
}
