//! Solver implementation.

use std::fmt::{self, Debug};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use phaseforge_config::{EnvironmentMode, SolverConfig};
use phaseforge_core::{ParseableScore, PlanningSolution, Result};
use phaseforge_scoring::ScoreDirector;
use tracing::{debug, info};

use crate::builder::PhaseBuilder;
use crate::phase::Phase;
use crate::recaller::BestSolutionRecaller;
use crate::scope::SolverScope;
use crate::termination::{BoxedTermination, Termination};

/// The main solver that optimizes planning solutions.
///
/// Runs a tuple of phases in order against one score director. Phase types
/// stay concrete through macro-generated tuple implementations; only the
/// solver-level termination is boxed, because the solver scope checks it on
/// behalf of every phase.
///
/// A phase is skipped once the solver termination or the external flag
/// fires. The returned solution is the best one recorded by any phase.
///
/// # Type Parameters
/// * `P` - Tuple of phases to execute
/// * `S` - Solution type
/// * `D` - Score director type
///
/// # Example
///
/// ```
/// use phaseforge_solver::solver::Solver;
/// use phaseforge_solver::phase::Phase;
/// use phaseforge_solver::scope::SolverScope;
/// use phaseforge_solver::termination::StepCountTermination;
/// use phaseforge_core::{PlanningSolution, Result, SimpleScore, SolutionDescriptor};
/// use phaseforge_scoring::{EasyScoreCalculator, ScoreDirector, TypedScoreDirector};
///
/// #[derive(Clone, Debug)]
/// struct MySolution { score: Option<SimpleScore> }
///
/// impl PlanningSolution for MySolution {
///     type Score = SimpleScore;
///     fn score(&self) -> Option<Self::Score> { self.score }
///     fn set_score(&mut self, score: Option<Self::Score>) { self.score = score; }
/// }
///
/// #[derive(Debug)]
/// struct NoOpPhase;
///
/// impl<S: PlanningSolution, D: ScoreDirector<S>> Phase<S, D> for NoOpPhase {
///     fn solve(&mut self, _: &mut SolverScope<S, D>) -> Result<()> { Ok(()) }
///     fn phase_type_name(&self) -> &'static str { "NoOp" }
/// }
///
/// type Calculator = EasyScoreCalculator<fn(&MySolution) -> SimpleScore>;
/// type MyDirector = TypedScoreDirector<MySolution, Calculator>;
///
/// let mut solver: Solver<(NoOpPhase,), MySolution, MyDirector> = Solver::new((NoOpPhase,))
///     .with_termination(StepCountTermination::new(10))
///     .with_random_seed(42);
///
/// let director = TypedScoreDirector::new(
///     MySolution { score: None },
///     SolutionDescriptor::new("MySolution"),
///     EasyScoreCalculator::new((|_: &MySolution| SimpleScore::of(0)) as fn(&MySolution) -> SimpleScore),
/// );
/// assert!(solver.solve(director).is_ok());
/// assert!(!solver.is_solving());
/// ```
pub struct Solver<P, S: PlanningSolution, D: ScoreDirector<S>> {
    phases: P,
    termination: Option<BoxedTermination<S, D>>,
    environment_mode: EnvironmentMode,
    random_seed: Option<u64>,
    terminate_early_flag: Arc<AtomicBool>,
    solving: Arc<AtomicBool>,
    config: Option<SolverConfig>,
    _phantom: PhantomData<fn(S, D)>,
}

impl<P: Debug, S: PlanningSolution, D: ScoreDirector<S>> Debug for Solver<P, S, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Solver")
            .field("phases", &self.phases)
            .field("termination", &self.termination)
            .field("environment_mode", &self.environment_mode)
            .field("random_seed", &self.random_seed)
            .finish()
    }
}

impl<P, S, D> Solver<P, S, D>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
{
    /// Creates a new solver with the given phases tuple and no termination.
    pub fn new(phases: P) -> Self {
        Solver {
            phases,
            termination: None,
            environment_mode: EnvironmentMode::default(),
            random_seed: None,
            terminate_early_flag: Arc::new(AtomicBool::new(false)),
            solving: Arc::new(AtomicBool::new(false)),
            config: None,
            _phantom: PhantomData,
        }
    }

    /// Creates a solver whose seed, environment mode and termination come
    /// from `config`.
    ///
    /// The phases are built by the caller, typically with
    /// [`PhaseBuilder`] from `config.phases`.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the config is invalid or its termination
    /// does not parse.
    pub fn from_config(config: &SolverConfig, phases: P) -> Result<Self>
    where
        S::Score: ParseableScore,
        D: 'static,
    {
        config.validate()?;
        let mut solver = Self::new(phases).with_environment_mode(config.environment_mode);
        solver.random_seed = config.random_seed;
        if let Some(termination) = PhaseBuilder::termination::<S, D>(config.termination.as_ref())? {
            solver.termination = Some(Box::new(termination));
        }
        solver.config = Some(config.clone());
        Ok(solver)
    }

    /// Sets the solver termination, checked by every phase.
    pub fn with_termination<T>(mut self, termination: T) -> Self
    where
        T: Termination<S, D> + 'static,
    {
        self.termination = Some(Box::new(termination));
        self
    }

    /// Seeds the RNG; without a seed every run draws one from the OS.
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    pub fn with_environment_mode(mut self, environment_mode: EnvironmentMode) -> Self {
        self.environment_mode = environment_mode;
        self
    }

    /// Requests early termination of the solving process.
    ///
    /// This method is thread-safe and can be called from another thread.
    /// Returns false if the solver is not solving.
    pub fn terminate_early(&self) -> bool {
        if self.solving.load(Ordering::SeqCst) {
            self.terminate_early_flag.store(true, Ordering::SeqCst);
            true
        } else {
            false
        }
    }

    /// Returns true if the solver is currently solving.
    pub fn is_solving(&self) -> bool {
        self.solving.load(Ordering::SeqCst)
    }

    /// Returns a handle that can raise the early-termination flag from
    /// another thread.
    pub fn terminate_early_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.terminate_early_flag)
    }

    pub fn phases(&self) -> &P {
        &self.phases
    }

    /// Returns the configuration if the solver was built from one.
    pub fn config(&self) -> Option<&SolverConfig> {
        self.config.as_ref()
    }

    fn create_scope(&mut self, score_director: D) -> SolverScope<S, D> {
        let scope = match (self.environment_mode, self.random_seed) {
            (EnvironmentMode::NonReproducible, _) | (_, None) => SolverScope::new(score_director),
            (_, Some(seed)) => SolverScope::with_seed(score_director, seed),
        };
        let mut scope = scope.with_environment_mode(self.environment_mode);
        if let Some(termination) = self.termination.take() {
            scope = scope.with_termination(termination);
        }
        scope.set_terminate_early_flag(Arc::clone(&self.terminate_early_flag));
        scope
    }

    fn start(&mut self, solver_scope: &mut SolverScope<S, D>, phase_count: usize) {
        self.solving.store(true, Ordering::SeqCst);
        self.terminate_early_flag.store(false, Ordering::SeqCst);
        solver_scope.start_solving();
        BestSolutionRecaller::new().solving_started(solver_scope);
        info!(
            event = "solve_start",
            environment_mode = ?self.environment_mode,
            random_seed = ?self.random_seed,
            phases = phase_count,
            best_score = ?solver_scope.best_score(),
        );
    }

    /// Hands the termination back and returns the best solution.
    fn finish(&mut self, mut solver_scope: SolverScope<S, D>) -> S {
        self.termination = solver_scope.take_termination();
        self.solving.store(false, Ordering::SeqCst);
        info!(
            event = "solve_end",
            duration_ms = solver_scope.elapsed().as_millis() as u64,
            steps = solver_scope.total_step_count(),
            calculations = solver_scope.score_director().calculation_count(),
            best_score = ?solver_scope.best_score(),
            terminated_early = solver_scope.is_terminate_early(),
        );
        solver_scope.take_best_or_working_solution()
    }

    fn abort(&mut self, mut solver_scope: SolverScope<S, D>) {
        self.termination = solver_scope.take_termination();
        self.solving.store(false, Ordering::SeqCst);
    }
}

macro_rules! impl_solver {
    ($($idx:tt: $P:ident),+) => {
        impl<S, D, $($P),+> Solver<($($P,)+), S, D>
        where
            S: PlanningSolution,
            D: ScoreDirector<S>,
            $($P: Phase<S, D>,)+
        {
            /// Solves using the provided score director.
            ///
            /// # Errors
            ///
            /// Returns the first error a phase reports; the remaining phases
            /// do not run.
            pub fn solve(&mut self, score_director: D) -> Result<S> {
                let mut solver_scope = self.create_scope(score_director);
                self.start(&mut solver_scope, [$($idx),+].len());

                $( self.phases.$idx.solving_started(&mut solver_scope); )+
                if let Err(err) = self.run_phases(&mut solver_scope) {
                    self.abort(solver_scope);
                    return Err(err);
                }
                $( self.phases.$idx.solving_ended(&mut solver_scope); )+

                Ok(self.finish(solver_scope))
            }

            fn run_phases(&mut self, solver_scope: &mut SolverScope<S, D>) -> Result<()> {
                $(
                    if solver_scope.is_terminated() {
                        debug!(
                            event = "phase_skipped",
                            phase = self.phases.$idx.phase_type_name(),
                            phase_index = $idx,
                        );
                    } else {
                        self.phases.$idx.solve(solver_scope)?;
                    }
                )+
                Ok(())
            }
        }
    };
}

impl_solver!(0: P0);
impl_solver!(0: P0, 1: P1);
impl_solver!(0: P0, 1: P1, 2: P2);
impl_solver!(0: P0, 1: P1, 2: P2, 3: P3);
impl_solver!(0: P0, 1: P1, 2: P2, 3: P3, 4: P4);
impl_solver!(0: P0, 1: P1, 2: P2, 3: P3, 4: P4, 5: P5);
impl_solver!(0: P0, 1: P1, 2: P2, 3: P3, 4: P4, 5: P5, 6: P6);
impl_solver!(0: P0, 1: P1, 2: P2, 3: P3, 4: P4, 5: P5, 6: P6, 7: P7);
