use crate::error::OpponentError;
use tombstone_core::grid::{Axis, Cell, Direction};

/// One step taken since the last confirmed position whose outcome was never observed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UncertainMove {
    pub direction: Direction,
    /// Grows with doubt: later and older moves are trusted less.
    pub penalty: f32,
}

impl UncertainMove {
    pub const fn new(direction: Direction, penalty: f32) -> Self {
        Self { direction, penalty }
    }

    pub fn aged(self, increment: f32) -> Self {
        Self {
            direction: self.direction,
            penalty: self.penalty + increment,
        }
    }
}

/// A confirmed cell plus the ordered moves that may have happened since.
///
/// Applying the first `k` pending moves to the confirmed cell yields the
/// `k`-th hypothesis; the deepest hypothesis applies all of them.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionBelief {
    confirmed: Cell,
    pending: Vec<UncertainMove>,
}

impl PositionBelief {
    pub fn new(confirmed: Cell) -> Self {
        Self {
            confirmed,
            pending: Vec::new(),
        }
    }

    pub fn confirmed(&self) -> Cell {
        self.confirmed
    }

    pub fn pending(&self) -> &[UncertainMove] {
        &self.pending
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// The cell reached after the first `depth` pending moves.
    pub fn hypothesis(&self, depth: usize) -> Result<Cell, OpponentError> {
        self.pending
            .iter()
            .take(depth)
            .try_fold(self.confirmed, |cell, mv| {
                cell.step(mv.direction).ok_or(OpponentError::OffGrid {
                    from: cell,
                    direction: mv.direction,
                })
            })
    }

    pub fn deepest(&self) -> Result<Cell, OpponentError> {
        self.hypothesis(self.pending.len())
    }

    pub fn push(&mut self, direction: Direction, penalty: f32) {
        self.pending.push(UncertainMove::new(direction, penalty));
    }

    pub fn extend<I>(&mut self, moves: I)
    where
        I: IntoIterator<Item = UncertainMove>,
    {
        self.pending.extend(moves);
    }

    /// Adds `increment` to the penalty of every pending move.
    pub fn age(&mut self, increment: f32) {
        for mv in self.pending.iter_mut() {
            *mv = mv.aged(increment);
        }
    }

    /// Anchors the belief on `cell` and forgets every pending move.
    pub fn collapse_to(&mut self, cell: Cell) {
        self.confirmed = cell;
        self.pending.clear();
    }

    /// Whether pending moves go both ways along `axis`, which makes the net
    /// displacement on that axis ambiguous.
    pub fn contradicts(&self, axis: Axis) -> bool {
        let (forward, backward) = match axis {
            Axis::Vertical => (Direction::Down, Direction::Up),
            Axis::Horizontal => (Direction::Right, Direction::Left),
        };
        let has = |dir: Direction| self.pending.iter().any(|mv| mv.direction == dir);
        has(forward) && has(backward)
    }
}
