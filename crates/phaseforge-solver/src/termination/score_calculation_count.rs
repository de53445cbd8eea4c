//! Score calculation count termination.

use phaseforge_core::PlanningSolution;
use phaseforge_scoring::ScoreDirector;

use super::Termination;
use crate::scope::SolverScope;

/// Terminates after the score director performed N score calculations.
#[derive(Debug, Clone)]
pub struct ScoreCalculationCountTermination {
    limit: u64,
}

impl ScoreCalculationCountTermination {
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }
}

impl<S: PlanningSolution, D: ScoreDirector<S>> Termination<S, D>
    for ScoreCalculationCountTermination
{
    fn is_solver_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool {
        solver_scope.score_director().calculation_count() >= self.limit
    }
}
