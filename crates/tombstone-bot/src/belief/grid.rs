use tombstone_core::grid::{Axis, CELL_COUNT, Cell, Direction, Edge, GRID_WIDTH};
use tombstone_core::maze::WallLayout;
use core::fmt;

/// Certainty of an edge that is known to be passable.
pub const OPEN: f32 = 1.0;
/// Certainty of an edge that is known to be walled.
pub const BLOCKED: f32 = -1.0;

/// Moves a certainty towards [`OPEN`].
///
/// Non-negative values halve their distance to 1. Negative values are
/// reflected away from -1 by doubling their distance to it, so -1 itself
/// is a fixed point.
pub fn increase(value: f32) -> f32 {
    if value < 0.0 {
        (value + 1.0) * 2.0 - 1.0
    } else {
        1.0 - (1.0 - value) / 2.0
    }
}

/// Moves a certainty towards [`BLOCKED`]; the mirror image of [`increase`].
pub fn decrease(value: f32) -> f32 {
    if value > 0.0 {
        1.0 - (1.0 - value) * 2.0
    } else {
        -1.0 + (1.0 + value) / 2.0
    }
}

/// One staleness step: positive beliefs are decreased, the rest increased.
pub fn decay(value: f32) -> f32 {
    if value > 0.0 {
        decrease(value)
    } else {
        increase(value)
    }
}

/// Cost of crossing an edge with the given certainty: 0 when certainly open,
/// 1 when certainly blocked, 0.5 when unknown.
pub fn traversal_penalty(certainty: f32) -> f32 {
    1.0 - (certainty + 1.0) / 2.0
}

/// Certainty in `[-1, 1]` for every edge of the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct BeliefGrid {
    right: [f32; CELL_COUNT],
    down: [f32; CELL_COUNT],
}

impl BeliefGrid {
    pub fn uniform(certainty: f32) -> Self {
        Self {
            right: [certainty; CELL_COUNT],
            down: [certainty; CELL_COUNT],
        }
    }

    /// Seeds beliefs from a layout: `open` where the layout has a passage,
    /// `wall` everywhere else.
    pub fn from_layout(layout: &WallLayout, open: f32, wall: f32) -> Self {
        let seed = |passable: &bool| if *passable { open } else { wall };
        Self {
            right: layout.right().each_ref().map(seed),
            down: layout.down().each_ref().map(seed),
        }
    }

    pub fn certainty(&self, edge: Edge) -> f32 {
        *self.slot(edge)
    }

    /// Certainty of the edge to the right of `cell`; `None` on the last column.
    pub fn pass_right(&self, cell: Cell) -> Option<f32> {
        Edge::new(cell, Axis::Horizontal).map(|edge| self.certainty(edge))
    }

    /// Certainty of the edge below `cell`; `None` on the last row.
    pub fn pass_down(&self, cell: Cell) -> Option<f32> {
        Edge::new(cell, Axis::Vertical).map(|edge| self.certainty(edge))
    }

    /// Certainty of the edge crossed by stepping from `from`; `None` off the grid.
    pub fn crossing(&self, from: Cell, direction: Direction) -> Option<f32> {
        Edge::crossing(from, direction).map(|edge| self.certainty(edge))
    }

    pub fn set(&mut self, edge: Edge, certainty: f32) {
        *self.slot_mut(edge) = certainty.clamp(BLOCKED, OPEN);
    }

    pub fn increase(&mut self, edge: Edge) {
        let slot = self.slot_mut(edge);
        *slot = increase(*slot);
    }

    pub fn decrease(&mut self, edge: Edge) {
        let slot = self.slot_mut(edge);
        *slot = decrease(*slot);
    }

    pub fn confirm(&mut self, edge: Edge) {
        self.set(edge, OPEN);
    }

    pub fn decay_all(&mut self) {
        for edge in Edge::all() {
            let slot = self.slot_mut(edge);
            *slot = decay(*slot);
        }
    }

    fn slot(&self, edge: Edge) -> &f32 {
        let index = edge.origin().index();
        match edge.axis() {
            Axis::Horizontal => &self.right[index],
            Axis::Vertical => &self.down[index],
        }
    }

    fn slot_mut(&mut self, edge: Edge) -> &mut f32 {
        let index = edge.origin().index();
        match edge.axis() {
            Axis::Horizontal => &mut self.right[index],
            Axis::Vertical => &mut self.down[index],
        }
    }
}

impl fmt::Display for BeliefGrid {
    /// Two tab-separated tables: `R:` (4 rows × 3 edges) and `D:` (3 rows × 4 edges).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = GRID_WIDTH as usize;
        writeln!(f, "R:")?;
        for row in 0..width {
            let cells: Vec<String> = (0..width - 1)
                .map(|col| format!("{:.3}", self.right[row * width + col]))
                .collect();
            writeln!(f, "{}", cells.join("\t"))?;
        }
        write!(f, "D:")?;
        for row in 0..width - 1 {
            let cells: Vec<String> = (0..width)
                .map(|col| format!("{:.3}", self.down[row * width + col]))
                .collect();
            write!(f, "\n{}", cells.join("\t"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: [f32; 9] = [-0.99, -0.75, -0.5, -0.2, 0.0, 0.2, 0.5, 0.75, 0.99];

    fn cell(index: u8) -> Cell {
        Cell::new(index).unwrap()
    }

    #[test]
    fn increase_halves_distance_to_one() {
        assert_eq!(increase(0.0), 0.5);
        assert_eq!(increase(0.5), 0.75);
        assert_eq!(increase(-0.5), 0.0);
        assert_eq!(increase(BLOCKED), BLOCKED);
    }

    #[test]
    fn decrease_mirrors_increase() {
        for value in SAMPLES {
            assert!((decrease(value) + increase(-value)).abs() < 1e-6);
        }
        assert_eq!(decrease(0.75), 0.5);
        assert_eq!(decrease(OPEN), OPEN);
    }

    #[test]
    fn operators_stay_within_bounds() {
        for start in SAMPLES {
            let (mut up, mut down, mut stale) = (start, start, start);
            for _ in 0..64 {
                up = increase(up);
                down = decrease(down);
                stale = decay(stale);
                for value in [up, down, stale] {
                    assert!((BLOCKED..=OPEN).contains(&value), "{value} escaped [-1, 1]");
                }
            }
        }
    }

    #[test]
    fn repeated_updates_saturate_without_overshoot() {
        for start in SAMPLES {
            let mut up = start;
            let mut down = start;
            for _ in 0..40 {
                up = increase(up);
                down = decrease(down);
            }
            assert!(up > 0.999 && up <= OPEN, "increase from {start} reached {up}");
            assert!(down < -0.999 && down >= BLOCKED, "decrease from {start} reached {down}");
        }
    }

    #[test]
    fn traversal_penalty_maps_certainty() {
        assert_eq!(traversal_penalty(OPEN), 0.0);
        assert_eq!(traversal_penalty(BLOCKED), 1.0);
        assert_eq!(traversal_penalty(0.0), 0.5);
    }

    #[test]
    fn seeding_follows_layout() {
        let mut layout = WallLayout::fully_open();
        layout.set_open(Edge::crossing(Cell::START, Direction::Left).unwrap(), false);
        let grid = BeliefGrid::from_layout(&layout, 1.0, -0.5);

        assert_eq!(grid.crossing(Cell::START, Direction::Left), Some(-0.5));
        assert_eq!(grid.crossing(Cell::START, Direction::Down), Some(1.0));
        assert_eq!(grid.pass_right(Cell::START), None);
        assert_eq!(grid.pass_down(Cell::GOAL), None);
    }

    #[test]
    fn opposite_steps_share_certainty() {
        let mut grid = BeliefGrid::uniform(0.0);
        let edge = Edge::crossing(cell(6), Direction::Down).unwrap();
        grid.decrease(edge);
        assert_eq!(grid.crossing(cell(10), Direction::Up), Some(-0.5));
        grid.confirm(edge);
        assert_eq!(grid.pass_down(cell(6)), Some(OPEN));
    }

    #[test]
    fn decay_pulls_strong_beliefs_towards_zero() {
        let mut grid = BeliefGrid::uniform(0.9);
        grid.decay_all();
        let right = grid.pass_right(cell(0)).unwrap();
        assert!((right - 0.8).abs() < 1e-6);

        let mut grid = BeliefGrid::uniform(-0.9);
        grid.decay_all();
        let down = grid.pass_down(cell(0)).unwrap();
        assert!((down + 0.8).abs() < 1e-6);
    }

    #[test]
    fn display_lists_both_tables() {
        let text = BeliefGrid::uniform(0.0).to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "R:");
        assert_eq!(lines[5], "D:");
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[1].split('\t').count(), 3);
        assert_eq!(lines[6].split('\t').count(), 4);
    }
}
