//! Solver-level scope.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use phaseforge_config::EnvironmentMode;
use phaseforge_core::{InitScore, PlanningSolution};
use phaseforge_scoring::ScoreDirector;
use rand::SeedableRng;

use super::{fork_rng, SolverRng};
use crate::termination::Termination;

/// Top-level scope for the entire solving process.
///
/// Generic over `D: ScoreDirector<S>` for zero type erasure. Owns the score
/// director for the whole run; phases borrow it through [`PhaseScope`](super::PhaseScope).
pub struct SolverScope<S: PlanningSolution, D: ScoreDirector<S>> {
    score_director: D,
    best_solution: Option<S>,
    best_score: Option<InitScore<S::Score>>,
    best_solution_step_index: Option<u64>,
    rng: SolverRng,
    environment_mode: EnvironmentMode,
    start_time: Option<Instant>,
    total_step_count: u64,
    last_improvement_step_count: u64,
    phase_count: usize,
    terminate_early_flag: Option<Arc<AtomicBool>>,
    termination: Option<Box<dyn Termination<S, D>>>,
}

impl<S: PlanningSolution, D: ScoreDirector<S>> SolverScope<S, D> {
    /// Creates a scope with an OS-seeded RNG.
    pub fn new(score_director: D) -> Self {
        Self::with_rng(score_director, SolverRng::from_os_rng())
    }

    pub fn with_seed(score_director: D, seed: u64) -> Self {
        Self::with_rng(score_director, SolverRng::seed_from_u64(seed))
    }

    fn with_rng(score_director: D, rng: SolverRng) -> Self {
        Self {
            score_director,
            best_solution: None,
            best_score: None,
            best_solution_step_index: None,
            rng,
            environment_mode: EnvironmentMode::default(),
            start_time: None,
            total_step_count: 0,
            last_improvement_step_count: 0,
            phase_count: 0,
            terminate_early_flag: None,
            termination: None,
        }
    }

    pub fn with_environment_mode(mut self, environment_mode: EnvironmentMode) -> Self {
        self.environment_mode = environment_mode;
        self
    }

    /// Sets the solver-level termination checked by every phase.
    pub fn with_termination(mut self, termination: Box<dyn Termination<S, D>>) -> Self {
        self.termination = Some(termination);
        self
    }

    /// Removes the solver-level termination so it can outlive this scope.
    pub fn take_termination(&mut self) -> Option<Box<dyn Termination<S, D>>> {
        self.termination.take()
    }

    pub fn set_terminate_early_flag(&mut self, flag: Arc<AtomicBool>) {
        self.terminate_early_flag = Some(flag);
    }

    /// Resets timing and counters for a new run.
    pub fn start_solving(&mut self) {
        self.start_time = Some(Instant::now());
        self.total_step_count = 0;
        self.last_improvement_step_count = 0;
        self.phase_count = 0;
    }

    /// Hands out the index of the phase about to start.
    pub fn next_phase_index(&mut self) -> usize {
        let index = self.phase_count;
        self.phase_count += 1;
        index
    }

    /// Time since [`start_solving`](Self::start_solving), zero before it.
    pub fn elapsed(&self) -> Duration {
        self.start_time.map_or(Duration::ZERO, |t| t.elapsed())
    }

    pub fn environment_mode(&self) -> EnvironmentMode {
        self.environment_mode
    }

    pub fn score_director(&self) -> &D {
        &self.score_director
    }

    pub fn score_director_mut(&mut self) -> &mut D {
        &mut self.score_director
    }

    pub fn working_solution(&self) -> &S {
        self.score_director.working_solution()
    }

    pub fn calculate_score(&mut self) -> S::Score {
        self.score_director.calculate_score()
    }

    pub fn calculate_init_score(&mut self) -> InitScore<S::Score> {
        self.score_director.calculate_init_score()
    }

    pub fn best_solution(&self) -> Option<&S> {
        self.best_solution.as_ref()
    }

    pub fn best_score(&self) -> Option<InitScore<S::Score>> {
        self.best_score
    }

    /// Step index at which the current best solution was found.
    pub fn best_solution_step_index(&self) -> Option<u64> {
        self.best_solution_step_index
    }

    /// Replaces the best solution snapshot.
    pub fn set_best_solution(&mut self, solution: S, score: InitScore<S::Score>, step_index: u64) {
        self.best_solution = Some(solution);
        self.best_score = Some(score);
        self.best_solution_step_index = Some(step_index);
        self.last_improvement_step_count = self.total_step_count;
    }

    pub fn rng(&mut self) -> &mut SolverRng {
        &mut self.rng
    }

    /// Forks a child RNG for one selector iteration.
    pub fn fork_rng(&mut self) -> SolverRng {
        fork_rng(&mut self.rng)
    }

    pub fn increment_step_count(&mut self) -> u64 {
        self.total_step_count += 1;
        self.total_step_count
    }

    pub fn total_step_count(&self) -> u64 {
        self.total_step_count
    }

    /// Steps since the best solution last improved.
    pub fn unimproved_step_count(&self) -> u64 {
        self.total_step_count.saturating_sub(self.last_improvement_step_count)
    }

    pub fn is_terminate_early(&self) -> bool {
        self.terminate_early_flag
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    /// True if the external flag is raised or the solver termination fires.
    pub fn is_terminated(&self) -> bool {
        self.is_terminate_early()
            || self
                .termination
                .as_ref()
                .is_some_and(|t| t.is_solver_terminated(self))
    }

    /// The solver-level termination, if any.
    pub fn termination(&self) -> Option<&dyn Termination<S, D>> {
        self.termination.as_deref()
    }

    pub fn take_best_solution(self) -> Option<S> {
        self.best_solution
    }

    /// Returns the best solution, or a clone of the working solution if no
    /// best was ever recorded.
    pub fn take_best_or_working_solution(self) -> S {
        match self.best_solution {
            Some(best) => best,
            None => self.score_director.clone_working_solution(),
        }
    }
}

impl<S: PlanningSolution, D: ScoreDirector<S>> fmt::Debug for SolverScope<S, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolverScope")
            .field("best_score", &self.best_score)
            .field("total_step_count", &self.total_step_count)
            .field("environment_mode", &self.environment_mode)
            .field("termination", &self.termination)
            .finish()
    }
}
