//! Termination conditions for the solver and its phases.
//!
//! A termination is checked at two granularities. The solver termination is
//! asked [`Termination::is_solver_terminated`] against the whole run; a phase
//! termination is asked [`Termination::is_phase_terminated`] against the
//! current phase. Phases stop when their own termination, the solver
//! termination or the external flag says so.

mod best_score;
mod builder;
mod composite;
mod external;
mod score_calculation_count;
mod step_count;
mod time;
mod unimproved;

use std::fmt::Debug;

use phaseforge_core::PlanningSolution;
use phaseforge_scoring::ScoreDirector;

use crate::scope::{PhaseScope, SolverScope};

pub use best_score::{BestScoreFeasibleTermination, BestScoreTermination};
pub use builder::{build_termination, BoxedTermination};
pub use composite::{AndTermination, OrTermination};
pub use external::ExternalTermination;
pub use score_calculation_count::ScoreCalculationCountTermination;
pub use step_count::StepCountTermination;
pub use time::TimeTermination;
pub use unimproved::UnimprovedStepCountTermination;

/// Trait for determining when to stop solving.
///
/// Implementations are pure with respect to the scopes they inspect: all the
/// state they read lives in the scopes or the clock.
///
/// # Type Parameters
/// * `S` - The planning solution type
/// * `D` - The score director type
pub trait Termination<S: PlanningSolution, D: ScoreDirector<S>>: Send + Debug {
    /// Returns true if the whole run should stop.
    fn is_solver_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool;

    /// Returns true if the current phase should stop.
    ///
    /// Defaults to the solver-level answer for limits that do not depend on
    /// where the phase started.
    fn is_phase_terminated(&self, phase_scope: &PhaseScope<'_, S, D>) -> bool {
        self.is_solver_terminated(phase_scope.solver_scope())
    }
}

impl<S, D, T> Termination<S, D> for Box<T>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    T: Termination<S, D> + ?Sized,
{
    fn is_solver_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool {
        (**self).is_solver_terminated(solver_scope)
    }

    fn is_phase_terminated(&self, phase_scope: &PhaseScope<'_, S, D>) -> bool {
        (**self).is_phase_terminated(phase_scope)
    }
}

/// Never terminates on its own.
///
/// Phases without a configured termination use this; they still stop on the
/// solver termination and the external flag.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTermination;

impl<S: PlanningSolution, D: ScoreDirector<S>> Termination<S, D> for NoTermination {
    fn is_solver_terminated(&self, _solver_scope: &SolverScope<S, D>) -> bool {
        false
    }

    fn is_phase_terminated(&self, _phase_scope: &PhaseScope<'_, S, D>) -> bool {
        false
    }
}

/// An absent termination never fires.
impl<S, D, T> Termination<S, D> for Option<T>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    T: Termination<S, D>,
{
    fn is_solver_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool {
        self.as_ref()
            .is_some_and(|t| t.is_solver_terminated(solver_scope))
    }

    fn is_phase_terminated(&self, phase_scope: &PhaseScope<'_, S, D>) -> bool {
        self.as_ref()
            .is_some_and(|t| t.is_phase_terminated(phase_scope))
    }
}

#[cfg(test)]
mod tests;
