//! Folding probe outcomes back into the opponent's beliefs.

use crate::belief::{BeliefGrid, PositionBelief, UncertainMove, VisitedSet};
use crate::error::OpponentError;
use crate::params::OpponentParams;
use crate::planner::Plan;
use crate::telemetry::Agreement;
use tombstone_core::grid::{Axis, Cell, Direction, Edge};

/// Outcome of absorbing a confirmed position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Confirmation {
    pub agreement: Agreement,
    /// Replay stopped early at this fault; the position was still anchored.
    pub fault: Option<OpponentError>,
}

#[derive(Debug, Clone, Copy)]
pub struct BeliefUpdater<'a> {
    params: &'a OpponentParams,
}

impl<'a> BeliefUpdater<'a> {
    pub fn new(params: &'a OpponentParams) -> Self {
        Self { params }
    }

    /// The probe at the end of `plan` did not relocate the opponent.
    ///
    /// Older pending moves age, the plan's walk joins the queue, and every
    /// edge along the hypothesised path plus the probe is decreased. A fault
    /// leaves the edges already visited decreased.
    pub fn absorb_failure(
        &self,
        grid: &mut BeliefGrid,
        position: &mut PositionBelief,
        plan: &Plan,
    ) -> Result<(), OpponentError> {
        position.age(self.params.age_increment);
        position.extend(uncertain_moves(plan));

        let path = replay_path(position, plan);
        replay(grid, position.confirmed(), &path, |grid, edge| grid.decrease(edge))?;
        Ok(())
    }

    /// The opponent was confirmed standing on `cell` after `plan` ran.
    ///
    /// Each axis on which the deepest hypothesis agrees with `cell` has its
    /// replayed edges increased, the others decreased. When both axes agree
    /// and no pending moves cancel each other out, the replayed edges are
    /// confirmed outright.
    pub fn absorb_success(
        &self,
        grid: &mut BeliefGrid,
        position: &mut PositionBelief,
        visited: &mut VisitedSet,
        plan: &Plan,
        cell: Cell,
    ) -> Confirmation {
        position.extend(uncertain_moves(plan));

        let (row, col) = match position.deepest() {
            Ok(guess) => (guess.row() == cell.row(), guess.col() == cell.col()),
            Err(_) => (false, false),
        };
        let exact = row
            && col
            && !position.contradicts(Axis::Vertical)
            && !position.contradicts(Axis::Horizontal);
        let agreement = Agreement { row, col, exact };

        let path = replay_path(position, plan);
        let fault = replay(grid, position.confirmed(), &path, |grid, edge| {
            let matched = match edge.axis() {
                Axis::Vertical => row,
                Axis::Horizontal => col,
            };
            if exact {
                grid.confirm(edge);
            } else if matched {
                grid.increase(edge);
            } else {
                grid.decrease(edge);
            }
        })
        .err();

        if let Some(dug) = plan.probe_direction().and_then(|dir| cell.step(dir)) {
            visited.insert(dug);
        }
        position.collapse_to(cell);

        Confirmation { agreement, fault }
    }
}

/// One pending move per walked cell of `plan`; later moves are trusted less.
pub fn uncertain_moves(plan: &Plan) -> Vec<UncertainMove> {
    let walked = plan.walked_directions();
    let total = walked.len() as f32;
    walked
        .into_iter()
        .enumerate()
        .map(|(rank, direction)| UncertainMove::new(direction, (rank + 1) as f32 / total))
        .collect()
}

fn replay_path(position: &PositionBelief, plan: &Plan) -> Vec<Direction> {
    position
        .pending()
        .iter()
        .map(|mv| mv.direction)
        .chain(plan.probe_direction())
        .collect()
}

/// Walks `path` from `start`, handing every crossed edge to `update`.
fn replay<F>(
    grid: &mut BeliefGrid,
    start: Cell,
    path: &[Direction],
    mut update: F,
) -> Result<Cell, OpponentError>
where
    F: FnMut(&mut BeliefGrid, Edge),
{
    path.iter().try_fold(start, |at, &direction| {
        let fault = OpponentError::OffGrid {
            from: at,
            direction,
        };
        let edge = Edge::crossing(at, direction).ok_or(fault)?;
        let next = at.step(direction).ok_or(fault)?;
        update(grid, edge);
        Ok(next)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tombstone_core::grid::Direction::{Down, Left, Right};

    fn cell(index: u8) -> Cell {
        Cell::new(index).unwrap()
    }

    #[test]
    fn failure_queues_walk_with_ranked_penalties() {
        let params = OpponentParams::default();
        let mut grid = BeliefGrid::uniform(0.5);
        let mut position = PositionBelief::new(Cell::START);
        position.push(Left, 0.5);
        let plan = Plan::route(&[Down, Down, Down], Left);

        // Starting from 3: L to 2, then D D D to 14, probe L towards 13.
        BeliefUpdater::new(&params)
            .absorb_failure(&mut grid, &mut position, &plan)
            .unwrap();

        let penalties: Vec<f32> = position.pending().iter().map(|mv| mv.penalty).collect();
        assert_eq!(penalties.len(), 4);
        assert_eq!(penalties[0], 1.5);
        assert!((penalties[1] - 1.0 / 3.0).abs() < 1e-6);
        assert!((penalties[2] - 2.0 / 3.0).abs() < 1e-6);
        assert_eq!(penalties[3], 1.0);

        assert_eq!(grid.crossing(Cell::START, Left), Some(0.0));
        assert_eq!(grid.crossing(cell(2), Down), Some(0.0));
        assert_eq!(grid.crossing(cell(10), Down), Some(0.0));
        assert_eq!(grid.crossing(cell(14), Left), Some(0.0));
        assert_eq!(grid.crossing(cell(0), Right), Some(0.5));
    }

    #[test]
    fn failure_reports_off_grid_replay() {
        let params = OpponentParams::default();
        let mut grid = BeliefGrid::uniform(0.0);
        let mut position = PositionBelief::new(Cell::START);
        let plan = Plan::probe(Right);

        let result = BeliefUpdater::new(&params).absorb_failure(&mut grid, &mut position, &plan);
        assert_eq!(
            result,
            Err(OpponentError::OffGrid {
                from: Cell::START,
                direction: Right
            })
        );
        assert_eq!(grid, BeliefGrid::uniform(0.0));
    }

    #[test]
    fn exact_confirmation_sets_edges_open() {
        let params = OpponentParams::default();
        let mut grid = BeliefGrid::uniform(-0.25);
        let mut position = PositionBelief::new(Cell::START);
        let mut visited = VisitedSet::new(Cell::START);
        let plan = Plan::route(&[Down], Down);

        let confirmation = BeliefUpdater::new(&params).absorb_success(
            &mut grid,
            &mut position,
            &mut visited,
            &plan,
            cell(7),
        );

        assert_eq!(
            confirmation.agreement,
            Agreement {
                row: true,
                col: true,
                exact: true
            }
        );
        assert_eq!(confirmation.fault, None);
        assert_eq!(grid.crossing(Cell::START, Down), Some(1.0));
        assert_eq!(grid.crossing(cell(7), Down), Some(1.0));
        assert_eq!(grid.crossing(cell(2), Right), Some(-0.25));
        assert!(visited.contains(cell(11)));
        assert_eq!(position, PositionBelief::new(cell(7)));
    }

    #[test]
    fn mismatched_axis_is_decreased() {
        let params = OpponentParams::default();
        let mut grid = BeliefGrid::uniform(0.0);
        let mut position = PositionBelief::new(Cell::START);
        let mut visited = VisitedSet::new(Cell::START);
        let plan = Plan::route(&[Down], Left);

        // The guess is 7 but the opponent turns out to stand on 6.
        let confirmation = BeliefUpdater::new(&params).absorb_success(
            &mut grid,
            &mut position,
            &mut visited,
            &plan,
            cell(6),
        );

        assert!(confirmation.agreement.row);
        assert!(!confirmation.agreement.col);
        assert!(!confirmation.agreement.exact);
        assert_eq!(grid.crossing(Cell::START, Down), Some(0.5));
        assert_eq!(grid.crossing(cell(7), Left), Some(-0.5));
        assert!(visited.contains(cell(5)));
        assert_eq!(position.confirmed(), cell(6));
        assert_eq!(position.pending_len(), 0);
    }

    #[test]
    fn contradicting_moves_prevent_exact_confirmation() {
        let params = OpponentParams::default();
        let mut grid = BeliefGrid::uniform(0.0);
        let mut position = PositionBelief::new(cell(2));
        let mut visited = VisitedSet::new(cell(2));
        let plan = Plan::route(&[Right, Left, Down], Down);

        let confirmation = BeliefUpdater::new(&params).absorb_success(
            &mut grid,
            &mut position,
            &mut visited,
            &plan,
            cell(6),
        );

        assert!(confirmation.agreement.row && confirmation.agreement.col);
        assert!(!confirmation.agreement.exact);
        assert_eq!(grid.crossing(cell(2), Right), Some(0.75));
        assert_eq!(grid.crossing(cell(2), Down), Some(0.5));
        assert_eq!(grid.crossing(cell(6), Down), Some(0.5));
    }

    #[test]
    fn success_fault_still_anchors_position() {
        let params = OpponentParams::default();
        let mut grid = BeliefGrid::uniform(0.0);
        let mut position = PositionBelief::new(Cell::START);
        position.push(Right, 1.0);
        let mut visited = VisitedSet::new(Cell::START);

        let confirmation = BeliefUpdater::new(&params).absorb_success(
            &mut grid,
            &mut position,
            &mut visited,
            &Plan::probe(Down),
            cell(7),
        );

        assert!(confirmation.fault.is_some());
        assert!(!confirmation.agreement.exact);
        assert_eq!(position, PositionBelief::new(cell(7)));
        assert!(visited.contains(cell(11)));
    }
}
