//! One episode: a generated maze, the opponent, and an optional roaming pawn.
//!
//! The arena plays the driver's part. It resolves every action against the
//! true layout and feeds probe outcomes back through `narrow`/`set_position`.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use serde::Serialize;
use tombstone_bot::{EventSink, Opponent, OpponentEvent, OpponentParams, Signal, TracingSink};
use tombstone_core::grid::{ActionKind, Cell, Direction, MAX_STEPS};
use tombstone_core::maze::{MazeGenerator, WallLayout};

use crate::config::PlayerKind;

/// Where a relocated opponent lands when the pawn occupies [`Cell::START`].
const RELOCATION_FALLBACK: Cell = match Cell::new(7) {
    Some(cell) => cell,
    None => Cell::START,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The opponent dug into the goal.
    OpponentWon,
    /// The turn limit ran out first.
    TurnLimit,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EpisodeStats {
    pub probes: usize,
    pub failed_probes: usize,
    pub relocations: usize,
    pub panics: usize,
    pub explorations: usize,
    pub faults: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeOutcome {
    pub outcome: Outcome,
    pub turns: usize,
    pub stats: EpisodeStats,
    pub opponent_cell: Cell,
    pub layout: WallLayout,
}

/// Counts the opponent's fallbacks while forwarding everything to `tracing`.
#[derive(Debug, Default)]
struct CountingSink {
    inner: TracingSink,
    panics: usize,
    explorations: usize,
    faults: usize,
}

impl EventSink for CountingSink {
    fn record(&mut self, event: &OpponentEvent<'_>) {
        match event {
            OpponentEvent::Panic { .. } => self.panics += 1,
            OpponentEvent::Randomized { .. } => self.explorations += 1,
            OpponentEvent::Fault { .. } => self.faults += 1,
            _ => {}
        }
        self.inner.record(event);
    }
}

pub struct Arena {
    layout: WallLayout,
    opponent: Opponent<CountingSink, StdRng>,
    opponent_at: Cell,
    pawn: Option<Cell>,
    rng: StdRng,
    stats: EpisodeStats,
}

impl Arena {
    /// Builds an episode from `seed`: the maze, the opponent's generator and
    /// the pawn's moves are all derived from it.
    pub fn new(seed: u64, player: PlayerKind, params: OpponentParams, route_details: bool) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let layout = MazeGenerator::default().generate(&mut rng);
        let opponent_rng = StdRng::seed_from_u64(rng.next_u64());
        let sink = CountingSink {
            inner: TracingSink::new(route_details),
            ..CountingSink::default()
        };
        let opponent = Opponent::with_rng(sink, &layout, params, opponent_rng);

        Self {
            layout,
            opponent,
            opponent_at: Cell::START,
            pawn: match player {
                PlayerKind::Absent => None,
                PlayerKind::Roam => Some(Cell::GOAL),
            },
            rng,
            stats: EpisodeStats::default(),
        }
    }

    pub fn layout(&self) -> &WallLayout {
        &self.layout
    }

    pub fn play(mut self, max_turns: usize) -> EpisodeOutcome {
        let mut turns = 0;
        let mut outcome = Outcome::TurnLimit;
        while turns < max_turns {
            turns += 1;
            let long_walk = self.player_turn();
            if self.opponent_turn(long_walk) {
                outcome = Outcome::OpponentWon;
                break;
            }
        }

        let sink = self.opponent.sink();
        let stats = EpisodeStats {
            panics: sink.panics,
            explorations: sink.explorations,
            faults: sink.faults,
            ..self.stats
        };
        EpisodeOutcome {
            outcome,
            turns,
            stats,
            opponent_cell: self.opponent_at,
            layout: self.layout,
        }
    }

    /// Walks the pawn in a random direction. Returns whether it tried a
    /// full-length walk, which shields the goal on the opponent's next turn.
    fn player_turn(&mut self) -> bool {
        let Some(mut at) = self.pawn else {
            return false;
        };
        let direction = Direction::ALL[self.rng.gen_range(0..Direction::ALL.len())];
        let steps = self.rng.gen_range(1..=MAX_STEPS);
        for _ in 0..steps {
            match self.layout.passage(at, direction) {
                Some(next) if next != self.opponent_at => at = next,
                _ => break,
            }
        }
        self.pawn = Some(at);
        steps == MAX_STEPS
    }

    /// Resolves one opponent action. Returns `true` when the opponent wins.
    fn opponent_turn(&mut self, goal_shielded: bool) -> bool {
        let action = self.opponent.act();
        let direction = action.direction;

        match action.kind {
            ActionKind::Walk { steps } => {
                for _ in 0..steps {
                    match self.open_passage(self.opponent_at, direction) {
                        Some(next) => self.opponent_at = next,
                        None => break,
                    }
                }
                false
            }
            ActionKind::Probe => {
                self.stats.probes += 1;
                match self.open_passage(self.opponent_at, direction) {
                    None => {
                        self.stats.failed_probes += 1;
                        self.opponent.narrow(Signal::Unresolved);
                        false
                    }
                    Some(dug) if dug == Cell::GOAL => {
                        if !goal_shielded {
                            return true;
                        }
                        let relocated = if self.pawn == Some(Cell::START) {
                            RELOCATION_FALLBACK
                        } else {
                            Cell::START
                        };
                        self.opponent.narrow(Signal::Confirmed(self.opponent_at));
                        self.opponent.set_position(relocated);
                        self.opponent_at = relocated;
                        self.stats.relocations += 1;
                        false
                    }
                    Some(_) => {
                        self.opponent.narrow(Signal::Confirmed(self.opponent_at));
                        false
                    }
                }
            }
        }
    }

    /// The neighbouring cell when the wall is open and the pawn is elsewhere.
    fn open_passage(&self, from: Cell, direction: Direction) -> Option<Cell> {
        self.layout
            .passage(from, direction)
            .filter(|next| Some(*next) != self.pawn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_cell_is_below_start() {
        assert_eq!(Cell::START.step(Direction::Down), Some(RELOCATION_FALLBACK));
    }

    #[test]
    fn episodes_are_reproducible() {
        let params = OpponentParams::default();
        let first = Arena::new(77, PlayerKind::Roam, params, false).play(120);
        let second = Arena::new(77, PlayerKind::Roam, params, false).play(120);
        assert_eq!(first, second);
    }

    #[test]
    fn turn_limit_is_respected() {
        let outcome = Arena::new(5, PlayerKind::Roam, OpponentParams::default(), false).play(3);
        assert!(outcome.turns <= 3);
        if outcome.outcome == Outcome::TurnLimit {
            assert_eq!(outcome.turns, 3);
        }
    }

    #[test]
    fn probes_are_accounted() {
        let outcome = Arena::new(9, PlayerKind::Absent, OpponentParams::default(), false).play(200);
        assert!(outcome.stats.probes >= outcome.stats.failed_probes);
        assert!(outcome.stats.probes > 0);
        assert_eq!(outcome.stats.relocations, 0);
    }

    #[test]
    fn lone_opponent_finds_the_goal() {
        let won = (0..10)
            .map(|seed| Arena::new(seed, PlayerKind::Absent, OpponentParams::default(), false))
            .map(|arena| arena.play(400))
            .filter(|outcome| outcome.outcome == Outcome::OpponentWon)
            .count();
        assert!(won > 0);
    }
}
