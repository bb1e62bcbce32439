use super::{Axis, Cell, Direction, GRID_WIDTH};
use serde::{Deserialize, Serialize};

/// An undirected edge between two orthogonally adjacent cells.
///
/// Edges are named by their top/left cell: a `Horizontal` edge separates
/// `origin` from the cell to its right, a `Vertical` edge separates `origin`
/// from the cell below it. Edges leaving the grid are never constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    origin: Cell,
    axis: Axis,
}

impl Edge {
    pub fn new(origin: Cell, axis: Axis) -> Option<Self> {
        let inside = match axis {
            Axis::Horizontal => origin.col() < GRID_WIDTH - 1,
            Axis::Vertical => origin.row() < GRID_WIDTH - 1,
        };
        inside.then_some(Self { origin, axis })
    }

    /// The edge crossed when stepping from `from` towards `direction`.
    pub fn crossing(from: Cell, direction: Direction) -> Option<Self> {
        let to = from.step(direction)?;
        let origin = match direction {
            Direction::Down | Direction::Right => from,
            Direction::Up | Direction::Left => to,
        };
        Some(Self {
            origin,
            axis: direction.axis(),
        })
    }

    /// Every edge of the grid: the 12 horizontal edges first, then the 12 vertical ones.
    pub fn all() -> impl Iterator<Item = Edge> {
        [Axis::Horizontal, Axis::Vertical]
            .into_iter()
            .flat_map(|axis| Cell::all().filter_map(move |cell| Edge::new(cell, axis)))
    }

    pub const fn origin(self) -> Cell {
        self.origin
    }

    pub const fn axis(self) -> Axis {
        self.axis
    }
}

/// A single step from `origin` into the adjacent `destination`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub origin: Cell,
    pub destination: Cell,
    pub direction: Direction,
}

impl Move {
    pub fn new(origin: Cell, direction: Direction) -> Option<Self> {
        origin.step(direction).map(|destination| Self {
            origin,
            destination,
            direction,
        })
    }

    /// Legal moves out of `cell`, in the order Left, Right, Up, Down.
    pub fn adjacent(cell: Cell) -> impl Iterator<Item = Move> {
        [
            Direction::Left,
            Direction::Right,
            Direction::Up,
            Direction::Down,
        ]
        .into_iter()
        .filter_map(move |direction| Move::new(cell, direction))
    }

    pub fn edge(self) -> Edge {
        Edge {
            origin: match self.direction {
                Direction::Down | Direction::Right => self.origin,
                Direction::Up | Direction::Left => self.destination,
            },
            axis: self.direction.axis(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(index: u8) -> Cell {
        Cell::new(index).unwrap()
    }

    #[test]
    fn grid_has_twenty_four_edges() {
        assert_eq!(Edge::all().count(), 24);
        assert!(Edge::new(cell(3), Axis::Horizontal).is_none());
        assert!(Edge::new(cell(13), Axis::Vertical).is_none());
    }

    #[test]
    fn opposite_steps_cross_the_same_edge() {
        let down = Edge::crossing(cell(5), Direction::Down).unwrap();
        let up = Edge::crossing(cell(9), Direction::Up).unwrap();
        assert_eq!(down, up);
        assert_eq!(down.origin(), cell(5));

        let right = Edge::crossing(cell(5), Direction::Right).unwrap();
        let left = Edge::crossing(cell(6), Direction::Left).unwrap();
        assert_eq!(right, left);
        assert_eq!(right.axis(), Axis::Horizontal);
    }

    #[test]
    fn crossing_off_grid_is_none() {
        assert!(Edge::crossing(cell(0), Direction::Up).is_none());
        assert!(Edge::crossing(cell(7), Direction::Right).is_none());
    }

    #[test]
    fn adjacent_moves_follow_fixed_order() {
        let moves: Vec<Direction> = Move::adjacent(cell(5)).map(|m| m.direction).collect();
        assert_eq!(
            moves,
            vec![
                Direction::Left,
                Direction::Right,
                Direction::Up,
                Direction::Down
            ]
        );
        let corner: Vec<Cell> = Move::adjacent(Cell::START).map(|m| m.destination).collect();
        assert_eq!(corner, vec![cell(2), cell(7)]);
    }

    #[test]
    fn move_edge_matches_crossing() {
        for origin in Cell::all() {
            for mv in Move::adjacent(origin) {
                assert_eq!(Some(mv.edge()), Edge::crossing(origin, mv.direction));
            }
        }
    }
}
