//! Candidate generation, scoring and plan selection.
//!
//! Planning either yields a concrete route-plus-probe [`Plan`] or a
//! [`PanicReason`]; the opponent turns the latter into a single random probe.

mod plan;
mod scoring;

pub use plan::{Plan, encode_walk};
pub use scoring::{Scorer, score_candidate};

use crate::belief::{BeliefGrid, PositionBelief, VisitedSet};
use crate::error::OpponentError;
use crate::params::OpponentParams;
use crate::projector::PathProjector;
use crate::telemetry::{EventSink, OpponentEvent};
use core::fmt;
use rand::Rng;
use rand::seq::SliceRandom;
use tombstone_core::grid::{CELL_COUNT, Cell, Direction, Move};

/// Why planning gave up and fell back to a random probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanicReason {
    /// Too many unverified moves are queued.
    Backlog { pending: usize },
    /// A previous belief replay failed.
    Flagged,
    /// A position hypothesis left the grid.
    Projection(OpponentError),
    /// Every candidate was filtered out.
    NoCandidate,
    /// The driver asked for more actions than the plan holds.
    Exhausted,
}

impl fmt::Display for PanicReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanicReason::Backlog { pending } => write!(f, "{pending} unverified moves queued"),
            PanicReason::Flagged => f.write_str("belief replay failed earlier"),
            PanicReason::Projection(err) => write!(f, "projection failed: {err}"),
            PanicReason::NoCandidate => f.write_str("no viable candidate"),
            PanicReason::Exhausted => f.write_str("plan exhausted before feedback"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    Planned {
        plan: Plan,
        target: Move,
        route: Vec<Direction>,
        score: f32,
    },
    Panic(PanicReason),
}

/// Everything planning reads from the opponent's state.
#[derive(Debug, Clone, Copy)]
pub struct PlanningState<'a> {
    pub grid: &'a BeliefGrid,
    pub position: &'a PositionBelief,
    pub visited: &'a VisitedSet,
    /// The previous plan's target, which must not be attempted twice in a row.
    pub last_attempt: Option<Move>,
    /// Forbids probing from the deepest position hypothesis.
    pub must_move: bool,
    pub should_panic: bool,
    pub moves_made: u32,
}

pub struct PlanSelector<'a> {
    params: &'a OpponentParams,
}

impl<'a> PlanSelector<'a> {
    pub fn new(params: &'a OpponentParams) -> Self {
        Self { params }
    }

    pub fn decide<R, S>(&self, state: &PlanningState<'_>, rng: &mut R, sink: &mut S) -> Decision
    where
        R: Rng + ?Sized,
        S: EventSink + ?Sized,
    {
        let pending = state.position.pending_len();
        if pending > self.params.panic_backlog {
            return Decision::Panic(PanicReason::Backlog { pending });
        }
        if state.should_panic {
            return Decision::Panic(PanicReason::Flagged);
        }

        sink.record(&OpponentEvent::Position {
            confirmed: state.position.confirmed(),
            pending: state.position.pending(),
            disallowed: state.last_attempt,
        });

        let projector = PathProjector::new(self.params.step_penalty);
        let projection = match projector.project(state.grid, state.position) {
            Ok(projection) => projection,
            Err(err) => return Decision::Panic(PanicReason::Projection(err)),
        };
        sink.record(&OpponentEvent::Routes {
            projection: &projection,
        });

        let scorer = Scorer::new(self.params, state.grid, &projection, state.moves_made);
        let mut best: Vec<Move> = Vec::new();
        let mut best_score: Option<f32> = None;
        for candidate in self.candidates(state) {
            let score = scorer.score(candidate);
            sink.record(&OpponentEvent::Scored { candidate, score });
            // NaN ranks with certainly-blocked candidates.
            let score = if score.is_nan() { f32::NEG_INFINITY } else { score };
            match best_score {
                Some(top) if score < top => continue,
                Some(top) if score == top => {}
                _ => {
                    best_score = Some(score);
                    best.clear();
                }
            }
            best.push(candidate);
        }

        let (Some(&target), Some(best_score)) = (best.choose(rng), best_score) else {
            return Decision::Panic(PanicReason::NoCandidate);
        };

        let route = projection.route(target.origin).directions.clone();
        Decision::Planned {
            plan: Plan::route(&route, target.direction),
            target,
            route,
            score: best_score,
        }
    }

    /// Moves out of visited cells that are still worth probing, deduplicated
    /// and in visiting order.
    pub fn candidates(&self, state: &PlanningState<'_>) -> Vec<Move> {
        let stuck_at: Option<Cell> = if state.must_move {
            state.position.deepest().ok()
        } else {
            None
        };

        let mut seen = [[false; 4]; CELL_COUNT];
        let mut out = Vec::new();
        for cell in state.visited.iter() {
            for mv in Move::adjacent(cell) {
                let slot = &mut seen[mv.origin.index()][mv.direction.index()];
                if *slot {
                    continue;
                }
                *slot = true;

                if state.last_attempt == Some(mv) {
                    continue;
                }
                if stuck_at == Some(mv.origin) {
                    continue;
                }
                if state.visited.contains(mv.destination) && mv.destination != Cell::GOAL {
                    continue;
                }
                out.push(mv);
            }
        }
        out
    }
}
