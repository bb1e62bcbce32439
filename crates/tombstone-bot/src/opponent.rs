use crate::belief::{BeliefGrid, PositionBelief, VisitedSet};
use crate::error::OpponentError;
use crate::params::OpponentParams;
use crate::planner::{Decision, PanicReason, Plan, PlanSelector, PlanningState};
use crate::telemetry::{EventSink, OpponentEvent, Recovery, TracingSink};
use crate::updater::BeliefUpdater;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tombstone_core::grid::{Action, CELL_COUNT, Cell, Direction, MAX_STEPS, Move};
use tombstone_core::maze::WallLayout;

/// Feedback handed to [`Opponent::narrow`] after a probe resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// The probe did not confirm any new position.
    Unresolved,
    /// The opponent is known to stand on this cell.
    Confirmed(Cell),
}

impl Signal {
    /// Integer form used by drivers: `-1` or a cell index.
    pub const UNRESOLVED_CODE: i32 = -1;

    pub fn from_code(code: i32) -> Result<Self, OpponentError> {
        if code == Self::UNRESOLVED_CODE {
            return Ok(Signal::Unresolved);
        }
        if code < 0 {
            return Err(OpponentError::InvalidSignal { code });
        }
        u8::try_from(code)
            .ok()
            .and_then(Cell::new)
            .map(Signal::Confirmed)
            .ok_or(OpponentError::InvalidCell { index: code })
    }

    pub fn code(self) -> i32 {
        match self {
            Signal::Unresolved => Self::UNRESOLVED_CODE,
            Signal::Confirmed(cell) => cell.index() as i32,
        }
    }
}

impl From<Cell> for Signal {
    fn from(cell: Cell) -> Self {
        Signal::Confirmed(cell)
    }
}

/// The maze opponent.
///
/// A driver alternates [`act`](Self::act) with [`narrow`](Self::narrow) or
/// [`set_position`](Self::set_position). The opponent owns all of its
/// beliefs; nothing it holds is shared with other instances. Internal faults
/// never surface: they degrade into random probes and are reported to the
/// event sink.
pub struct Opponent<S = TracingSink, R = StdRng> {
    params: OpponentParams,
    grid: BeliefGrid,
    position: PositionBelief,
    visited: VisitedSet,
    plan: Plan,
    last_attempt: Option<Move>,
    must_move: bool,
    should_panic: bool,
    moves_made: u32,
    random_counter: u32,
    sink: S,
    rng: R,
}

impl<S: EventSink> Opponent<S, StdRng> {
    /// Creates an opponent at [`Cell::START`] that knows the visible maze
    /// `right`/`down` passability, using default parameters and an
    /// entropy-seeded generator.
    pub fn new(sink: S, right: [bool; CELL_COUNT], down: [bool; CELL_COUNT]) -> Self {
        Self::with_rng(
            sink,
            &WallLayout::new(right, down),
            OpponentParams::default(),
            StdRng::from_entropy(),
        )
    }
}

impl<S: EventSink, R: Rng> Opponent<S, R> {
    pub fn with_rng(mut sink: S, layout: &WallLayout, params: OpponentParams, rng: R) -> Self {
        sink.record(&OpponentEvent::Created { start: Cell::START });

        let mut opponent = Self {
            grid: BeliefGrid::from_layout(layout, params.seed_open, params.seed_wall),
            position: PositionBelief::new(Cell::START),
            visited: VisitedSet::new(Cell::START),
            plan: Plan::default(),
            last_attempt: None,
            must_move: false,
            should_panic: false,
            moves_made: 0,
            random_counter: 0,
            params,
            sink,
            rng,
        };
        opponent.replan();
        opponent
    }

    /// Emits the next action of the current plan.
    ///
    /// Every `decay_interval` calls the belief grid decays first. Running past
    /// the end of the plan yields a random probe instead of failing.
    pub fn act(&mut self) -> Action {
        self.moves_made += 1;
        self.random_counter += 1;

        let interval = self.params.decay_interval;
        if interval > 0 && self.moves_made % interval == 0 {
            self.grid.decay_all();
            self.sink.record(&OpponentEvent::Decayed {
                moves_made: self.moves_made,
            });
        }

        if let Some(action) = self.plan.next_action() {
            return action;
        }
        let probe = self.enter_panic(PanicReason::Exhausted);
        self.plan.next_action().unwrap_or(Action::probe(probe))
    }

    /// Absorbs the outcome of the current plan's probe and prepares the next plan.
    pub fn narrow(&mut self, signal: Signal) {
        let updater = BeliefUpdater::new(&self.params);
        let agreement = match signal {
            Signal::Unresolved => {
                if let Err(error) =
                    updater.absorb_failure(&mut self.grid, &mut self.position, &self.plan)
                {
                    self.should_panic = true;
                    self.sink.record(&OpponentEvent::Fault {
                        error,
                        recovery: Recovery::Panic,
                    });
                }
                self.must_move = true;
                None
            }
            Signal::Confirmed(cell) => {
                let confirmation = updater.absorb_success(
                    &mut self.grid,
                    &mut self.position,
                    &mut self.visited,
                    &self.plan,
                    cell,
                );
                if let Some(error) = confirmation.fault {
                    self.sink.record(&OpponentEvent::Fault {
                        error,
                        recovery: Recovery::Ignored,
                    });
                }
                self.must_move = false;
                self.should_panic = false;
                Some(confirmation.agreement)
            }
        };

        self.sink.record(&OpponentEvent::Narrowed {
            signal,
            agreement,
            grid: &self.grid,
            visited: &self.visited,
            pending: self.position.pending_len(),
        });

        if self.random_counter > self.params.exploration_threshold {
            self.explore();
        } else {
            self.replan();
        }
    }

    /// Forcibly relocates the opponent to `cell` and plans afresh.
    ///
    /// Calling this twice with the same cell leaves the same state behind.
    pub fn set_position(&mut self, cell: Cell) {
        self.position.collapse_to(cell);
        self.must_move = false;
        self.should_panic = false;
        self.random_counter = 0;
        self.last_attempt = None;
        self.sink.record(&OpponentEvent::Relocated { cell });
        self.replan();
    }

    pub fn grid(&self) -> &BeliefGrid {
        &self.grid
    }

    pub fn position(&self) -> &PositionBelief {
        &self.position
    }

    pub fn visited(&self) -> &VisitedSet {
        &self.visited
    }

    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    pub fn params(&self) -> &OpponentParams {
        &self.params
    }

    pub fn moves_made(&self) -> u32 {
        self.moves_made
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    fn replan(&mut self) {
        let state = PlanningState {
            grid: &self.grid,
            position: &self.position,
            visited: &self.visited,
            last_attempt: self.last_attempt,
            must_move: self.must_move,
            should_panic: self.should_panic,
            moves_made: self.moves_made,
        };
        let decision =
            PlanSelector::new(&self.params).decide(&state, &mut self.rng, &mut self.sink);

        match decision {
            Decision::Planned {
                plan,
                target,
                route,
                score,
            } => {
                self.sink.record(&OpponentEvent::Planned {
                    target,
                    route: &route,
                    plan: &plan,
                    score,
                });
                self.last_attempt = Some(target);
                self.plan = plan;
            }
            Decision::Panic(reason) => {
                self.enter_panic(reason);
            }
        }
    }

    fn enter_panic(&mut self, reason: PanicReason) -> Direction {
        let probe = random_direction(&mut self.rng);
        self.plan = Plan::probe(probe);
        self.sink.record(&OpponentEvent::Panic {
            reason: &reason,
            probe,
        });
        probe
    }

    fn explore(&mut self) {
        self.random_counter = 0;

        let mut actions = Vec::with_capacity(self.params.exploration_moves + 1);
        for _ in 0..self.params.exploration_moves {
            let direction = random_direction(&mut self.rng);
            let steps = self.rng.gen_range(1..=MAX_STEPS);
            actions.extend(Action::walk(direction, steps));
        }
        actions.push(Action::probe(random_direction(&mut self.rng)));
        self.plan = Plan::from_actions(actions);

        self.sink.record(&OpponentEvent::Randomized { plan: &self.plan });
    }
}

fn random_direction<R: Rng + ?Sized>(rng: &mut R) -> Direction {
    Direction::ALL[rng.gen_range(0..Direction::ALL.len())]
}
