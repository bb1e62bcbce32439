//! Risk-weighted route projection over the believed maze.

use crate::belief::{BeliefGrid, PositionBelief, traversal_penalty};
use crate::error::OpponentError;
use std::array;
use std::collections::VecDeque;
use tombstone_core::grid::{CELL_COUNT, Cell, Direction, Move};

/// Cheapest known way to reach one cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub penalty: f32,
    pub directions: Vec<Direction>,
}

impl Route {
    fn unreachable() -> Self {
        Self {
            penalty: f32::INFINITY,
            directions: Vec::new(),
        }
    }

    pub fn is_reachable(&self) -> bool {
        self.penalty.is_finite()
    }

    pub fn len(&self) -> usize {
        self.directions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directions.is_empty()
    }
}

/// A weighted starting hypothesis for projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Seed {
    pub cell: Cell,
    pub penalty: f32,
}

/// Best route to every cell of the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    routes: [Route; CELL_COUNT],
}

impl Projection {
    pub fn route(&self, cell: Cell) -> &Route {
        &self.routes[cell.index()]
    }

    pub fn penalty(&self, cell: Cell) -> f32 {
        self.routes[cell.index()].penalty
    }

    pub fn path_len(&self, cell: Cell) -> usize {
        self.routes[cell.index()].len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Cell, &Route)> {
        Cell::all().zip(self.routes.iter())
    }
}

/// Label-correcting relaxation seeded from every position hypothesis.
///
/// The work list is a plain FIFO that skips edges already waiting in it.
/// Which of several equally cheap routes wins depends on that order.
#[derive(Debug, Clone, Copy)]
pub struct PathProjector {
    step_penalty: f32,
}

impl PathProjector {
    pub fn new(step_penalty: f32) -> Self {
        Self { step_penalty }
    }

    /// Seeds for `position`: the confirmed cell at zero penalty, then each
    /// deeper hypothesis at the previous penalty plus the crossed edge's risk
    /// plus the move's own penalty.
    pub fn seeds(
        &self,
        grid: &BeliefGrid,
        position: &PositionBelief,
    ) -> Result<Vec<Seed>, OpponentError> {
        let mut seeds = Vec::with_capacity(position.pending_len() + 1);
        let mut current = Seed {
            cell: position.confirmed(),
            penalty: 0.0,
        };
        seeds.push(current);

        for mv in position.pending() {
            let fault = OpponentError::OffGrid {
                from: current.cell,
                direction: mv.direction,
            };
            let certainty = grid.crossing(current.cell, mv.direction).ok_or(fault)?;
            let cell = current.cell.step(mv.direction).ok_or(fault)?;
            current = Seed {
                cell,
                penalty: current.penalty + traversal_penalty(certainty) + mv.penalty,
            };
            seeds.push(current);
        }

        Ok(seeds)
    }

    pub fn project(
        &self,
        grid: &BeliefGrid,
        position: &PositionBelief,
    ) -> Result<Projection, OpponentError> {
        let seeds = self.seeds(grid, position)?;
        Ok(self.project_from(grid, &seeds))
    }

    pub fn project_from(&self, grid: &BeliefGrid, seeds: &[Seed]) -> Projection {
        let mut routes: [Route; CELL_COUNT] = array::from_fn(|_| Route::unreachable());
        let mut queue: VecDeque<Move> = VecDeque::new();
        let mut queued = [[false; 4]; CELL_COUNT];

        // Later seeds overwrite earlier ones even when they are more expensive.
        for seed in seeds {
            routes[seed.cell.index()] = Route {
                penalty: seed.penalty,
                directions: Vec::new(),
            };
            enqueue_adjacent(seed.cell, &mut queue, &mut queued);
        }

        while let Some(mv) = queue.pop_front() {
            queued[mv.origin.index()][mv.direction.index()] = false;

            let certainty = grid.certainty(mv.edge());
            let from = &routes[mv.origin.index()];
            let candidate = from.penalty + self.step_penalty + traversal_penalty(certainty);
            if candidate < routes[mv.destination.index()].penalty {
                let mut directions = Vec::with_capacity(from.len() + 1);
                directions.extend_from_slice(&from.directions);
                directions.push(mv.direction);
                routes[mv.destination.index()] = Route {
                    penalty: candidate,
                    directions,
                };
                enqueue_adjacent(mv.destination, &mut queue, &mut queued);
            }
        }

        Projection { routes }
    }
}

fn enqueue_adjacent(cell: Cell, queue: &mut VecDeque<Move>, queued: &mut [[bool; 4]; CELL_COUNT]) {
    for mv in Move::adjacent(cell) {
        let flag = &mut queued[mv.origin.index()][mv.direction.index()];
        if !*flag {
            *flag = true;
            queue.push_back(mv);
        }
    }
}
