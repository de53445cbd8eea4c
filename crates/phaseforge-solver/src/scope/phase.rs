//! Phase-level scope.

use std::time::{Duration, Instant};

use phaseforge_core::{InitScore, PlanningSolution};
use phaseforge_scoring::ScoreDirector;

use super::{SolverRng, SolverScope};
use crate::termination::Termination;

/// Scope for a single phase of solving.
///
/// # Type Parameters
/// * `'a` - Lifetime of the solver scope reference
/// * `S` - The planning solution type
/// * `D` - The score director type
pub struct PhaseScope<'a, S: PlanningSolution, D: ScoreDirector<S>> {
    /// Reference to the parent solver scope.
    solver_scope: &'a mut SolverScope<S, D>,
    /// Index of this phase (0-based).
    phase_index: usize,
    /// Best score at the start of this phase.
    starting_score: Option<InitScore<S::Score>>,
    /// Number of steps in this phase.
    step_count: u64,
    /// Working score after the last completed step.
    last_completed_step_score: Option<InitScore<S::Score>>,
    start_time: Instant,
}

impl<'a, S: PlanningSolution, D: ScoreDirector<S>> PhaseScope<'a, S, D> {
    pub fn new(solver_scope: &'a mut SolverScope<S, D>, phase_index: usize) -> Self {
        let starting_score = solver_scope.best_score();
        Self {
            solver_scope,
            phase_index,
            starting_score,
            step_count: 0,
            last_completed_step_score: None,
            start_time: Instant::now(),
        }
    }

    pub fn phase_index(&self) -> usize {
        self.phase_index
    }

    pub fn starting_score(&self) -> Option<InitScore<S::Score>> {
        self.starting_score
    }

    /// The solver's best score so far.
    pub fn best_score(&self) -> Option<InitScore<S::Score>> {
        self.solver_scope.best_score()
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Increments the phase and solver step counts.
    pub fn increment_step_count(&mut self) -> u64 {
        self.step_count += 1;
        self.solver_scope.increment_step_count();
        self.step_count
    }

    pub fn last_completed_step_score(&self) -> Option<InitScore<S::Score>> {
        self.last_completed_step_score
    }

    pub fn set_last_completed_step_score(&mut self, score: InitScore<S::Score>) {
        self.last_completed_step_score = Some(score);
    }

    pub fn solver_scope(&self) -> &SolverScope<S, D> {
        self.solver_scope
    }

    pub fn solver_scope_mut(&mut self) -> &mut SolverScope<S, D> {
        self.solver_scope
    }

    pub fn score_director(&self) -> &D {
        self.solver_scope.score_director()
    }

    pub fn score_director_mut(&mut self) -> &mut D {
        self.solver_scope.score_director_mut()
    }

    pub fn calculate_init_score(&mut self) -> InitScore<S::Score> {
        self.solver_scope.calculate_init_score()
    }

    pub fn rng(&mut self) -> &mut SolverRng {
        self.solver_scope.rng()
    }

    pub fn fork_rng(&mut self) -> SolverRng {
        self.solver_scope.fork_rng()
    }

    /// True if the phase's own termination, the solver termination or the
    /// external flag says to stop.
    pub fn is_terminated<T>(&self, phase_termination: &T) -> bool
    where
        T: Termination<S, D> + ?Sized,
    {
        self.solver_scope.is_terminated() || phase_termination.is_phase_terminated(self)
    }
}
