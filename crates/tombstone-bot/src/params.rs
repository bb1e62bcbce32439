/// Tunable opponent parameters.
///
/// The defaults reproduce the reference opponent; every value can be
/// overridden through `TOMBSTONE_*` environment variables for experiments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpponentParams {
    // === Initial beliefs ===
    /// Certainty seeded for edges that are open in the visible maze (default: 1.0)
    pub seed_open: f32,

    /// Certainty seeded for edges that are walled in the visible maze (default: -0.5)
    pub seed_wall: f32,

    // === Schedules ===
    /// Actions between two passes of certainty decay (default: 20)
    pub decay_interval: u32,

    /// Actions after which the next feedback triggers a randomized plan (default: 40)
    pub exploration_threshold: u32,

    /// Queued uncertain moves tolerated before planning panics (default: 3)
    pub panic_backlog: usize,

    /// Random walk actions in a forced-exploration plan (default: 6)
    pub exploration_moves: usize,

    // === Projection ===
    /// Flat penalty per step of a projected route (default: 0.2)
    pub step_penalty: f32,

    /// Penalty added to every queued move after unresolved feedback (default: 1.0)
    pub age_increment: f32,

    // === Scoring ===
    /// Weight of the goal-proximity term (default: 4.0)
    pub distance_weight: f32,

    /// Weight of the edge-risk plus route-risk term (default: 2.0)
    pub path_weight: f32,

    /// Per-move factor of the route-length term (default: -0.1)
    pub length_rate: f32,
}

impl Default for OpponentParams {
    fn default() -> Self {
        Self {
            seed_open: 1.0,
            seed_wall: -0.5,
            decay_interval: 20,
            exploration_threshold: 40,
            panic_backlog: 3,
            exploration_moves: 6,
            step_penalty: 0.2,
            age_increment: 1.0,
            distance_weight: 4.0,
            path_weight: 2.0,
            length_rate: -0.1,
        }
    }
}

impl OpponentParams {
    pub fn from_env() -> Self {
        Self::from_reader(|key| std::env::var(key).ok())
    }

    pub fn from_reader<F>(mut read: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let base = Self::default();
        let mut float = |key: &str, fallback: f32| {
            read(key)
                .and_then(|raw| raw.trim().parse::<f32>().ok())
                .filter(|value| value.is_finite())
                .unwrap_or(fallback)
        };

        let seed_open = float("TOMBSTONE_SEED_OPEN", base.seed_open).clamp(-1.0, 1.0);
        let seed_wall = float("TOMBSTONE_SEED_WALL", base.seed_wall).clamp(-1.0, 1.0);
        let step_penalty = float("TOMBSTONE_STEP_PENALTY", base.step_penalty).clamp(0.0, 5.0);
        let age_increment = float("TOMBSTONE_AGE_INCREMENT", base.age_increment).clamp(0.0, 10.0);
        let distance_weight = float("TOMBSTONE_DISTANCE_WEIGHT", base.distance_weight);
        let path_weight = float("TOMBSTONE_PATH_WEIGHT", base.path_weight);
        let length_rate = float("TOMBSTONE_LENGTH_RATE", base.length_rate);

        let mut count = |key: &str, fallback: u32| {
            read(key)
                .and_then(|raw| raw.trim().parse::<u32>().ok())
                .unwrap_or(fallback)
        };

        let decay_interval = count("TOMBSTONE_DECAY_INTERVAL", base.decay_interval).max(1);
        let exploration_threshold =
            count("TOMBSTONE_EXPLORATION_THRESHOLD", base.exploration_threshold);
        let panic_backlog = count("TOMBSTONE_PANIC_BACKLOG", base.panic_backlog as u32) as usize;
        let exploration_moves =
            count("TOMBSTONE_EXPLORATION_MOVES", base.exploration_moves as u32).min(32) as usize;

        Self {
            seed_open,
            seed_wall,
            decay_interval,
            exploration_threshold,
            panic_backlog,
            exploration_moves,
            step_penalty,
            age_increment,
            distance_weight,
            path_weight,
            length_rate,
        }
    }
}
