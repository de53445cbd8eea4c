//! Score-based termination conditions.

use phaseforge_core::{InitScore, PlanningSolution, Score};
use phaseforge_scoring::ScoreDirector;

use super::Termination;
use crate::scope::SolverScope;

/// Terminates when the best score reaches or exceeds a target.
///
/// The target is a fully initialized score, so a best solution with
/// unassigned variables never reaches it.
///
/// # Example
///
/// ```
/// use phaseforge_solver::termination::BestScoreTermination;
/// use phaseforge_core::score::SimpleScore;
///
/// let term: BestScoreTermination<SimpleScore> = BestScoreTermination::new(SimpleScore::of(0));
/// ```
#[derive(Debug, Clone)]
pub struct BestScoreTermination<Sc: Score> {
    target_score: InitScore<Sc>,
}

impl<Sc: Score> BestScoreTermination<Sc> {
    pub fn new(target_score: Sc) -> Self {
        Self {
            target_score: InitScore::initialized(target_score),
        }
    }
}

impl<S, Sc, D> Termination<S, D> for BestScoreTermination<Sc>
where
    S: PlanningSolution<Score = Sc>,
    Sc: Score,
    D: ScoreDirector<S>,
{
    fn is_solver_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool {
        solver_scope
            .best_score()
            .is_some_and(|score| score >= self.target_score)
    }
}

/// Terminates when the best solution is fully initialized and feasible.
#[derive(Debug, Clone, Copy, Default)]
pub struct BestScoreFeasibleTermination;

impl BestScoreFeasibleTermination {
    pub fn new() -> Self {
        Self
    }
}

impl<S: PlanningSolution, D: ScoreDirector<S>> Termination<S, D> for BestScoreFeasibleTermination {
    fn is_solver_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool {
        solver_scope
            .best_score()
            .is_some_and(|score| score.is_feasible())
    }
}
