//! Tests for the move module.

use std::fmt::Debug;

use phaseforge_core::PlanningSolution;
use phaseforge_scoring::ScoreDirector;

use super::*;

mod k_opt;
mod list_change;

/// Does `m`, then its undo, and checks that solution and score are restored.
/// Returns the undo move.
fn assert_undo_restores<S, D, M>(director: &mut D, m: &M) -> M
where
    S: PlanningSolution + PartialEq + Debug,
    D: ScoreDirector<S>,
    M: Move<S>,
{
    let score_before = director.calculate_init_score();
    let solution_before = director.clone_working_solution();

    let undo = m.do_move(director).unwrap();
    undo.do_move(director).unwrap();

    assert_eq!(director.calculate_init_score(), score_before);
    assert_eq!(director.working_solution(), &solution_before);
    undo
}
