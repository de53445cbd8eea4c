//! Step count termination.

use phaseforge_core::PlanningSolution;
use phaseforge_scoring::ScoreDirector;

use super::Termination;
use crate::scope::{PhaseScope, SolverScope};

/// Terminates after a number of steps.
///
/// Counts every step of the run at solver level and only the current
/// phase's steps at phase level.
#[derive(Debug, Clone)]
pub struct StepCountTermination {
    limit: u64,
}

impl StepCountTermination {
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }
}

impl<S: PlanningSolution, D: ScoreDirector<S>> Termination<S, D> for StepCountTermination {
    fn is_solver_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool {
        solver_scope.total_step_count() >= self.limit
    }

    fn is_phase_terminated(&self, phase_scope: &PhaseScope<'_, S, D>) -> bool {
        phase_scope.step_count() >= self.limit
    }
}
