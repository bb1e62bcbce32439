use core::fmt;
use tombstone_core::grid::{CELL_COUNT, Cell, GRID_WIDTH};

/// Cells the opponent has opened, in the order they were first reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitedSet {
    order: Vec<Cell>,
    seen: [bool; CELL_COUNT],
}

impl VisitedSet {
    pub fn new(start: Cell) -> Self {
        let mut set = Self {
            order: Vec::with_capacity(CELL_COUNT),
            seen: [false; CELL_COUNT],
        };
        set.insert(start);
        set
    }

    /// Records `cell`; returns `false` if it was already present.
    pub fn insert(&mut self, cell: Cell) -> bool {
        if self.seen[cell.index()] {
            return false;
        }
        self.seen[cell.index()] = true;
        self.order.push(cell);
        true
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.seen[cell.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        self.order.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl fmt::Display for VisitedSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = GRID_WIDTH as usize;
        write!(f, "V:")?;
        for row in self.seen.chunks(width) {
            let marks: Vec<&str> = row.iter().map(|hit| if *hit { "✓" } else { "X" }).collect();
            write!(f, "\n{}", marks.join("\t"))?;
        }
        Ok(())
    }
}
