use crate::grid::{Axis, CELL_COUNT, Cell, Direction, Edge, GRID_WIDTH};
use core::fmt;
use serde::{Deserialize, Serialize};

/// Passability of every grid edge.
///
/// `right[i]` tells whether cell `i` connects to the cell on its right and
/// `down[i]` whether it connects to the cell below. Entries describing edges
/// that would leave the grid are carried along but never consulted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallLayout {
    right: [bool; CELL_COUNT],
    down: [bool; CELL_COUNT],
}

impl WallLayout {
    pub fn new(right: [bool; CELL_COUNT], down: [bool; CELL_COUNT]) -> Self {
        Self { right, down }
    }

    /// A layout without interior walls.
    pub fn fully_open() -> Self {
        Self::new([true; CELL_COUNT], [true; CELL_COUNT])
    }

    pub fn right(&self) -> &[bool; CELL_COUNT] {
        &self.right
    }

    pub fn down(&self) -> &[bool; CELL_COUNT] {
        &self.down
    }

    pub fn is_open(&self, edge: Edge) -> bool {
        let index = edge.origin().index();
        match edge.axis() {
            Axis::Horizontal => self.right[index],
            Axis::Vertical => self.down[index],
        }
    }

    pub fn set_open(&mut self, edge: Edge, open: bool) {
        let index = edge.origin().index();
        match edge.axis() {
            Axis::Horizontal => self.right[index] = open,
            Axis::Vertical => self.down[index] = open,
        }
    }

    /// The cell reached by stepping from `from`, if no wall or border is in the way.
    pub fn passage(&self, from: Cell, direction: Direction) -> Option<Cell> {
        let edge = Edge::crossing(from, direction)?;
        if self.is_open(edge) {
            from.step(direction)
        } else {
            None
        }
    }

    pub fn open_edges(&self) -> usize {
        Edge::all().filter(|edge| self.is_open(*edge)).count()
    }
}

impl fmt::Display for WallLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = GRID_WIDTH as usize;
        writeln!(f, "┼{}", "─┼".repeat(width))?;
        for row in 0..width {
            f.write_str("│")?;
            for col in 0..width {
                let index = row * width + col;
                let open = col < width - 1 && self.right[index];
                f.write_str(if open { "  " } else { " │" })?;
            }
            f.write_str("\n┼")?;
            for col in 0..width {
                let index = row * width + col;
                let open = row < width - 1 && self.down[index];
                f.write_str(if open { " ┼" } else { "─┼" })?;
            }
            if row < width - 1 {
                f.write_str("\n")?;
            }
        }
        Ok(())
    }
}
