//! Best solution recaller.
//!
//! Keeps the solver scope's best solution in step with the working solution.
//! The best solution is a deep copy taken on strict improvement and replaced
//! wholesale, never mutated in place.

use phaseforge_core::{InitScore, PlanningSolution};
use phaseforge_scoring::ScoreDirector;
use tracing::debug;

use crate::scope::SolverScope;

/// Compares working scores with the best score and snapshots improvements.
#[derive(Debug, Clone, Copy, Default)]
pub struct BestSolutionRecaller;

impl BestSolutionRecaller {
    pub fn new() -> Self {
        Self
    }

    /// Seeds the best solution from the input solution.
    ///
    /// Runs once at solving start, so a run that terminates before any
    /// phase finishes still returns a scored solution.
    pub fn solving_started<S, D>(&self, solver_scope: &mut SolverScope<S, D>)
    where
        S: PlanningSolution,
        D: ScoreDirector<S>,
    {
        let score = solver_scope.calculate_init_score();
        let solution = solver_scope.score_director().clone_working_solution();
        debug!(event = "best_seeded", score = %score);
        solver_scope.set_best_solution(solution, score, 0);
    }

    /// Recalculates the working score and snapshots the working solution if
    /// it strictly improves on the best.
    ///
    /// Returns `true` if the best solution was replaced.
    pub fn update_best_solution<S, D>(
        &self,
        solver_scope: &mut SolverScope<S, D>,
        step_index: u64,
    ) -> bool
    where
        S: PlanningSolution,
        D: ScoreDirector<S>,
    {
        let score = solver_scope.calculate_init_score();
        self.process_working_solution_during_move(solver_scope, score, step_index)
    }

    /// Like [`update_best_solution`](Self::update_best_solution) with an
    /// already known working score.
    pub fn process_working_solution_during_move<S, D>(
        &self,
        solver_scope: &mut SolverScope<S, D>,
        score: InitScore<S::Score>,
        step_index: u64,
    ) -> bool
    where
        S: PlanningSolution,
        D: ScoreDirector<S>,
    {
        let improved = solver_scope.best_score().map_or(true, |best| score > best);
        if improved {
            let solution = solver_scope.score_director().clone_working_solution();
            debug!(
                event = "new_best_solution",
                score = %score,
                step_index,
            );
            solver_scope.set_best_solution(solution, score, step_index);
        }
        improved
    }
}
