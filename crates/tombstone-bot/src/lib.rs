pub mod belief;
pub mod error;
pub mod opponent;
pub mod params;
pub mod planner;
pub mod projector;
pub mod telemetry;
pub mod updater;

pub use belief::{BeliefGrid, PositionBelief, UncertainMove, VisitedSet};
pub use error::OpponentError;
pub use opponent::{Opponent, Signal};
pub use params::OpponentParams;
pub use planner::{Decision, PanicReason, Plan, PlanSelector, PlanningState, Scorer};
pub use projector::{PathProjector, Projection, Route, Seed};
pub use telemetry::{Agreement, EventSink, NoopSink, OpponentEvent, Recovery, TracingSink};
pub use updater::{BeliefUpdater, Confirmation};
