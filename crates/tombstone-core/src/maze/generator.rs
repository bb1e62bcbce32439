use super::WallLayout;
use crate::grid::{CELL_COUNT, Cell, Edge, Move};
use rand::Rng;
use rand::seq::SliceRandom;

/// Builds random 4×4 mazes: a spanning tree grown from a random cell, with a
/// few extra walls knocked out so that some loops exist.
#[derive(Debug, Clone, Copy)]
pub struct MazeGenerator {
    /// Interior walls removed after the spanning tree is complete (default: 2).
    pub extra_openings: usize,
}

impl Default for MazeGenerator {
    fn default() -> Self {
        Self { extra_openings: 2 }
    }
}

impl MazeGenerator {
    pub fn new(extra_openings: usize) -> Self {
        Self { extra_openings }
    }

    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> WallLayout {
        let mut layout = WallLayout::new([false; CELL_COUNT], [false; CELL_COUNT]);
        let mut reached = [false; CELL_COUNT];
        let mut active: Vec<Cell> = Vec::with_capacity(CELL_COUNT);

        let seed = Cell::all()
            .nth(rng.gen_range(0..CELL_COUNT))
            .unwrap_or(Cell::START);
        reached[seed.index()] = true;
        active.push(seed);

        while !active.is_empty() {
            let slot = rng.gen_range(0..active.len());
            let cell = active[slot];
            let frontier: Vec<Move> = Move::adjacent(cell)
                .filter(|mv| !reached[mv.destination.index()])
                .collect();

            let Some(&mv) = frontier.choose(rng) else {
                active.swap_remove(slot);
                continue;
            };

            layout.set_open(mv.edge(), true);
            reached[mv.destination.index()] = true;
            active.push(mv.destination);
        }

        let mut walls: Vec<Edge> = Edge::all().filter(|edge| !layout.is_open(*edge)).collect();
        walls.shuffle(rng);
        for edge in walls.into_iter().take(self.extra_openings) {
            layout.set_open(edge, true);
        }

        layout
    }
}
