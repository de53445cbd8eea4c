//! Step-level scope.

use phaseforge_core::{InitScore, PlanningSolution};
use phaseforge_scoring::ScoreDirector;

use super::{PhaseScope, SolverRng};

/// Scope for a single step within a phase.
pub struct StepScope<'a, 'p, S: PlanningSolution, D: ScoreDirector<S>> {
    /// Reference to the parent phase scope.
    phase_scope: &'a mut PhaseScope<'p, S, D>,
    /// Index of this step within the phase (0-based).
    step_index: u64,
    /// Score after this step.
    step_score: Option<InitScore<S::Score>>,
}

impl<'a, 'p, S: PlanningSolution, D: ScoreDirector<S>> StepScope<'a, 'p, S, D> {
    pub fn new(phase_scope: &'a mut PhaseScope<'p, S, D>) -> Self {
        let step_index = phase_scope.step_count();
        Self {
            phase_scope,
            step_index,
            step_score: None,
        }
    }

    pub fn step_index(&self) -> u64 {
        self.step_index
    }

    pub fn step_score(&self) -> Option<InitScore<S::Score>> {
        self.step_score
    }

    pub fn set_step_score(&mut self, score: InitScore<S::Score>) {
        self.step_score = Some(score);
    }

    /// Marks this step as complete and increments counters.
    pub fn complete(&mut self) {
        if let Some(score) = self.step_score {
            self.phase_scope.set_last_completed_step_score(score);
        }
        self.phase_scope.increment_step_count();
    }

    pub fn phase_scope(&self) -> &PhaseScope<'p, S, D> {
        self.phase_scope
    }

    pub fn phase_scope_mut(&mut self) -> &mut PhaseScope<'p, S, D> {
        self.phase_scope
    }

    pub fn score_director(&self) -> &D {
        self.phase_scope.score_director()
    }

    pub fn score_director_mut(&mut self) -> &mut D {
        self.phase_scope.score_director_mut()
    }

    pub fn calculate_init_score(&mut self) -> InitScore<S::Score> {
        self.phase_scope.calculate_init_score()
    }

    pub fn fork_rng(&mut self) -> SolverRng {
        self.phase_scope.fork_rng()
    }
}
