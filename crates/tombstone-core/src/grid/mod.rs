//! Vocabulary for the fixed 4×4 maze grid.
//!
//! - `cell`: validated cell identifiers and coordinate helpers.
//! - `direction`: the four compass steps in their canonical order.
//! - `edge`: undirected edges between cells and single-step moves across them.
//! - `action`: the button-level actions an agent emits, with their integer codes.

pub mod action;
pub mod cell;
pub mod direction;
pub mod edge;

pub use action::{Action, ActionKind, MAX_STEPS};
pub use cell::{CELL_COUNT, Cell, GRID_WIDTH};
pub use direction::{Axis, Direction};
pub use edge::{Edge, Move};
