//! Structured diagnostics emitted by the opponent.
//!
//! Every notable step of planning and belief revision is described by an
//! [`OpponentEvent`] and handed to an [`EventSink`]. Sinks observe only: they
//! cannot influence decisions. [`TracingSink`] forwards events to `tracing`;
//! [`NoopSink`] drops them.

use crate::belief::{BeliefGrid, UncertainMove, VisitedSet};
use crate::error::OpponentError;
use crate::opponent::Signal;
use crate::planner::{PanicReason, Plan};
use crate::projector::Projection;
use tombstone_core::grid::{Cell, Direction, Move};
use tracing::{Level, event};

/// How a positive narrow lined up with the deepest position hypothesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Agreement {
    pub row: bool,
    pub col: bool,
    /// Both axes matched without contradicting moves; traversed edges were confirmed outright.
    pub exact: bool,
}

/// What the opponent did about an internal fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// The next planning cycle will panic.
    Panic,
    /// The update stopped early and planning continues normally.
    Ignored,
}

#[derive(Debug, Clone, Copy)]
pub enum OpponentEvent<'a> {
    Created {
        start: Cell,
    },
    Position {
        confirmed: Cell,
        pending: &'a [UncertainMove],
        disallowed: Option<Move>,
    },
    Routes {
        projection: &'a Projection,
    },
    Scored {
        candidate: Move,
        score: f32,
    },
    Planned {
        target: Move,
        route: &'a [Direction],
        plan: &'a Plan,
        score: f32,
    },
    Panic {
        reason: &'a PanicReason,
        probe: Direction,
    },
    Randomized {
        plan: &'a Plan,
    },
    Narrowed {
        signal: Signal,
        agreement: Option<Agreement>,
        grid: &'a BeliefGrid,
        visited: &'a VisitedSet,
        pending: usize,
    },
    Fault {
        error: OpponentError,
        recovery: Recovery,
    },
    Relocated {
        cell: Cell,
    },
    Decayed {
        moves_made: u32,
    },
}

pub trait EventSink {
    fn record(&mut self, event: &OpponentEvent<'_>);
}

impl<F> EventSink for F
where
    F: FnMut(&OpponentEvent<'_>),
{
    fn record(&mut self, event: &OpponentEvent<'_>) {
        self(event)
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn record(&mut self, _event: &OpponentEvent<'_>) {}
}

/// Forwards events to `tracing` under the `tombstone_bot::opponent` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink {
    route_details: bool,
}

impl TracingSink {
    /// `route_details` additionally dumps the projected route of every cell at TRACE level.
    pub fn new(route_details: bool) -> Self {
        Self { route_details }
    }
}

impl EventSink for TracingSink {
    fn record(&mut self, event: &OpponentEvent<'_>) {
        match *event {
            OpponentEvent::Created { start } => {
                event!(
                    target: "tombstone_bot::opponent",
                    Level::INFO,
                    start = %start,
                    "new opponent created"
                );
            }
            OpponentEvent::Position {
                confirmed,
                pending,
                disallowed,
            } => {
                if !tracing::enabled!(target: "tombstone_bot::opponent", Level::DEBUG) {
                    return;
                }
                let pending: String = pending.iter().map(|mv| mv.direction.letter()).collect();
                let disallowed = disallowed
                    .map(|mv| format!("{}{}", mv.destination, mv.direction.letter()))
                    .unwrap_or_default();
                event!(
                    target: "tombstone_bot::opponent",
                    Level::DEBUG,
                    confirmed = %confirmed,
                    pending = %pending,
                    disallowed = %disallowed,
                    "position"
                );
            }
            OpponentEvent::Routes { projection } => {
                if !self.route_details
                    || !tracing::enabled!(target: "tombstone_bot::routes", Level::TRACE)
                {
                    return;
                }
                for (cell, route) in projection.iter() {
                    let spelled = Direction::spell(&route.directions);
                    let risk = route.penalty;
                    event!(
                        target: "tombstone_bot::routes",
                        Level::TRACE,
                        cell = %cell,
                        route = %spelled,
                        risk,
                    );
                }
            }
            OpponentEvent::Scored { candidate, score } => {
                let cell = candidate.destination;
                let direction = candidate.direction.letter();
                event!(
                    target: "tombstone_bot::routes",
                    Level::TRACE,
                    cell = %cell,
                    direction = %direction,
                    score,
                    "scored candidate"
                );
            }
            OpponentEvent::Planned {
                target,
                route,
                plan,
                score,
            } => {
                let mut spelled = Direction::spell(route);
                spelled.push(target.direction.letter());
                let destination = target.destination;
                event!(
                    target: "tombstone_bot::opponent",
                    Level::INFO,
                    cell = %destination,
                    moves = %spelled,
                    plan = %plan,
                    score,
                    "planned"
                );
            }
            OpponentEvent::Panic { reason, probe } => {
                tracing::warn!(
                    target: "tombstone_bot::opponent",
                    reason = %reason,
                    probe = %probe,
                    message = "panic mode, probing a random direction"
                );
            }
            OpponentEvent::Randomized { plan } => {
                event!(
                    target: "tombstone_bot::opponent",
                    Level::INFO,
                    plan = %plan,
                    "randomize mode"
                );
            }
            OpponentEvent::Narrowed {
                signal,
                agreement,
                grid,
                visited,
                pending,
            } => {
                if !tracing::enabled!(target: "tombstone_bot::opponent", Level::DEBUG) {
                    return;
                }
                event!(
                    target: "tombstone_bot::opponent",
                    Level::DEBUG,
                    signal = ?signal,
                    agreement = ?agreement,
                    pending,
                    beliefs = %grid,
                    visited = %visited,
                    "learned new information"
                );
            }
            OpponentEvent::Fault { error, recovery } => {
                tracing::warn!(
                    target: "tombstone_bot::opponent",
                    error = %error,
                    recovery = ?recovery,
                    message = "uncertainty built up"
                );
            }
            OpponentEvent::Relocated { cell } => {
                event!(
                    target: "tombstone_bot::opponent",
                    Level::INFO,
                    cell = %cell,
                    "opponent relocated"
                );
            }
            OpponentEvent::Decayed { moves_made } => {
                event!(
                    target: "tombstone_bot::opponent",
                    Level::DEBUG,
                    moves_made,
                    "beliefs decayed"
                );
            }
        }
    }
}
