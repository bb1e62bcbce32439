//! What the opponent believes about the maze and about itself.
//!
//! This module is composed of:
//! - `grid`: continuous certainty per edge and the asymmetric update operators.
//! - `position`: a confirmed cell plus the queue of unverified moves taken since.
//! - `visited`: the cells the opponent has opened so far.

mod grid;
mod position;
mod visited;

pub use grid::{BLOCKED, BeliefGrid, OPEN, decay, decrease, increase, traversal_penalty};
pub use position::{PositionBelief, UncertainMove};
pub use visited::VisitedSet;
