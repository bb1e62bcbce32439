use super::Direction;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Longest walk a single action may request.
pub const MAX_STEPS: u8 = 3;

const PROBE_SLOT: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    /// Walk up to `steps` cells, stopping early at walls or occupied cells.
    Walk { steps: u8 },
    /// Try to open the adjacent cell without moving.
    Probe,
}

/// A button-level action: one direction plus a walk length or a probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Action {
    pub direction: Direction,
    pub kind: ActionKind,
}

impl Action {
    /// A walk of `steps` cells; `None` unless `1 <= steps <= MAX_STEPS`.
    pub fn walk(direction: Direction, steps: u8) -> Option<Self> {
        (1..=MAX_STEPS).contains(&steps).then_some(Self {
            direction,
            kind: ActionKind::Walk { steps },
        })
    }

    pub const fn probe(direction: Direction) -> Self {
        Self {
            direction,
            kind: ActionKind::Probe,
        }
    }

    pub const fn is_probe(self) -> bool {
        matches!(self.kind, ActionKind::Probe)
    }

    /// Number of cells this action tries to walk; zero for probes.
    pub const fn steps(self) -> u8 {
        match self.kind {
            ActionKind::Walk { steps } => steps,
            ActionKind::Probe => 0,
        }
    }

    /// Integer code `4 * direction + slot`, where slot is `steps - 1` for
    /// walks and 3 for probes.
    pub const fn code(self) -> u8 {
        let slot = match self.kind {
            ActionKind::Walk { steps } => steps - 1,
            ActionKind::Probe => PROBE_SLOT,
        };
        4 * self.direction as u8 + slot
    }

    pub fn from_code(code: u8) -> Option<Self> {
        let direction = Direction::from_index((code / 4) as usize)?;
        match code % 4 {
            PROBE_SLOT => Some(Self::probe(direction)),
            slot => Self::walk(direction, slot + 1),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ActionKind::Walk { steps } => {
                for _ in 0..steps {
                    write!(f, "{}", self.direction.letter())?;
                }
                Ok(())
            }
            ActionKind::Probe => write!(f, "dig {}", self.direction.letter()),
        }
    }
}
