//! Win condition: every target ball inside the goal region.

use crate::types::SimulationState;

/// Pure predicate over the final table.
pub struct WinEvaluator;

impl WinEvaluator {
    /// Number of non-cue balls strictly inside the goal region.
    pub fn balls_in_goal(state: &SimulationState) -> usize {
        let goal = &state.table.goal;
        state
            .balls
            .iter()
            .skip(1)
            .filter(|ball| goal.contains(&ball.pos))
            .count()
    }

    /// A round is won when all target balls are in the goal.
    ///
    /// A table with no target balls is never a win.
    pub fn is_win(state: &SimulationState) -> bool {
        let targets = state.balls.len().saturating_sub(1);
        targets > 0 && Self::balls_in_goal(state) == targets
    }
}
