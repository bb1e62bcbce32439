use crate::belief::{BLOCKED, BeliefGrid, traversal_penalty};
use crate::params::OpponentParams;
use crate::projector::{Projection, Route};
use tombstone_core::grid::{Cell, GRID_WIDTH, Move};

/// Scores candidate moves against one projection.
#[derive(Debug, Clone, Copy)]
pub struct Scorer<'a> {
    params: &'a OpponentParams,
    grid: &'a BeliefGrid,
    projection: &'a Projection,
    moves_made: u32,
}

impl<'a> Scorer<'a> {
    pub fn new(
        params: &'a OpponentParams,
        grid: &'a BeliefGrid,
        projection: &'a Projection,
        moves_made: u32,
    ) -> Self {
        Self {
            params,
            grid,
            projection,
            moves_made,
        }
    }

    pub fn score(&self, candidate: Move) -> f32 {
        score_candidate(
            self.params,
            candidate.destination,
            self.grid.crossing(candidate.origin, candidate.direction),
            self.projection.route(candidate.origin),
            self.moves_made,
        )
    }
}

/// Desirability of probing into `destination` across an edge with certainty
/// `crossed`, after walking `route` to the probe's origin.
///
/// Returns negative infinity when the crossed edge does not exist or is
/// believed to be certainly blocked.
pub fn score_candidate(
    params: &OpponentParams,
    destination: Cell,
    crossed: Option<f32>,
    route: &Route,
    moves_made: u32,
) -> f32 {
    let Some(certainty) = crossed else {
        return f32::NEG_INFINITY;
    };
    if certainty == BLOCKED {
        return f32::NEG_INFINITY;
    }

    let last_move_penalty = traversal_penalty(certainty);
    let x = destination.col() as f32;
    let y = destination.row() as f32;
    let far = (GRID_WIDTH - 1) as f32;
    let length_multiplier = moves_made as f32 * params.length_rate;

    params.distance_weight * (far - x + y)
        - params.path_weight * (last_move_penalty + route.penalty)
        - length_multiplier * route.len() as f32
}
