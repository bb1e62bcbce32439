use core::fmt;
use tombstone_core::grid::{Action, Direction, MAX_STEPS};

/// An ordered list of actions plus the cursor of the next one to emit.
///
/// Plans are replaced wholesale whenever the opponent re-plans.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Plan {
    actions: Vec<Action>,
    cursor: usize,
}

impl Plan {
    pub fn from_actions(actions: Vec<Action>) -> Self {
        Self { actions, cursor: 0 }
    }

    /// A single probe, used by panic mode.
    pub fn probe(direction: Direction) -> Self {
        Self::from_actions(vec![Action::probe(direction)])
    }

    /// Walks `directions` in runs of at most [`MAX_STEPS`], then probes towards `probe`.
    pub fn route(directions: &[Direction], probe: Direction) -> Self {
        let mut actions = encode_walk(directions);
        actions.push(Action::probe(probe));
        Self::from_actions(actions)
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.actions.len()
    }

    pub fn next_action(&mut self) -> Option<Action> {
        let action = self.actions.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(action)
    }

    /// Direction of the trailing probe.
    pub fn probe_direction(&self) -> Option<Direction> {
        self.actions.last().map(|action| action.direction)
    }

    /// One direction per cell the plan tries to walk before its trailing probe.
    pub fn walked_directions(&self) -> Vec<Direction> {
        let Some((_, walk)) = self.actions.split_last() else {
            return Vec::new();
        };
        walk.iter()
            .flat_map(|action| std::iter::repeat(action.direction).take(action.steps() as usize))
            .collect()
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.actions.iter().map(Action::to_string).collect();
        f.write_str(&parts.join(" "))
    }
}

/// Run-length encodes a direction sequence into walk actions of at most [`MAX_STEPS`] cells.
pub fn encode_walk(directions: &[Direction]) -> Vec<Action> {
    let mut actions = Vec::new();
    for run in directions.chunk_by(|a, b| a == b) {
        for piece in run.chunks(MAX_STEPS as usize) {
            if let Some(action) = Action::walk(piece[0], piece.len() as u8) {
                actions.push(action);
            }
        }
    }
    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use tombstone_core::grid::Direction::{Down, Left, Up};

    #[test]
    fn runs_are_split_at_three_steps() {
        let walk = encode_walk(&[Down, Down, Down, Down, Down, Left]);
        let codes: Vec<u8> = walk.iter().map(|a| a.code()).collect();
        assert_eq!(codes, vec![2, 1, 12]);
    }

    #[test]
    fn route_appends_probe_and_decodes_back() {
        let path = [Down, Down, Left, Left, Left, Up];
        let plan = Plan::route(&path, Left);
        assert_eq!(plan.len(), 4);
        assert_eq!(plan.probe_direction(), Some(Left));
        assert!(plan.actions().last().unwrap().is_probe());
        assert_eq!(plan.walked_directions(), path.to_vec());
    }

    #[test]
    fn cursor_walks_the_plan_once() {
        let mut plan = Plan::route(&[Down], Left);
        assert_eq!(plan.next_action(), Action::walk(Down, 1));
        assert_eq!(plan.next_action(), Some(Action::probe(Left)));
        assert!(plan.is_exhausted());
        assert_eq!(plan.next_action(), None);
    }

    #[test]
    fn probe_only_plan_walks_nowhere() {
        let plan = Plan::probe(Up);
        assert!(plan.walked_directions().is_empty());
        assert_eq!(plan.to_string(), "dig U");
    }
}
