use thiserror::Error;
use tombstone_core::grid::{Cell, Direction};

/// Faults raised while replaying or projecting position hypotheses.
///
/// None of these reach the driver: the opponent turns them into panic mode or
/// a panic flag and keeps producing legal actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OpponentError {
    #[error("hypothesis leaves the grid moving {direction} from cell {from}")]
    OffGrid { from: Cell, direction: Direction },
    #[error("narrow signal {code} is neither -1 nor a cell index")]
    InvalidSignal { code: i32 },
    #[error("cell index {index} is outside the 4x4 grid")]
    InvalidCell { index: i32 },
}
