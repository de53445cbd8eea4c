//! Composite termination conditions (AND/OR).
//!
//! Uses macro-generated tuple implementations for zero type erasure. A
//! `Vec` of boxed terminations is supported for compositions only known at
//! runtime, such as the ones built from configuration.

use phaseforge_core::PlanningSolution;
use phaseforge_scoring::ScoreDirector;

use super::Termination;
use crate::scope::{PhaseScope, SolverScope};

/// Combines multiple terminations with OR logic (any must terminate).
///
/// # Examples
///
/// ```
/// use phaseforge_solver::termination::{OrTermination, StepCountTermination, TimeTermination};
///
/// // Terminate after 30 seconds OR 1000 steps
/// let termination = OrTermination::new((
///     TimeTermination::seconds(30),
///     StepCountTermination::new(1000),
/// ));
/// ```
#[derive(Debug)]
pub struct OrTermination<T>(pub T);

impl<T> OrTermination<T> {
    /// Creates a new OR termination from a tuple of terminations.
    pub fn new(terminations: T) -> Self {
        Self(terminations)
    }
}

/// Generates `Termination` implementations for OR tuples.
macro_rules! impl_or_termination {
    // Single termination
    ($idx:tt: $T:ident) => {
        impl<S, D, $T> Termination<S, D> for OrTermination<($T,)>
        where
            S: PlanningSolution,
            D: ScoreDirector<S>,
            $T: Termination<S, D>,
        {
            fn is_solver_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool {
                (self.0).$idx.is_solver_terminated(solver_scope)
            }

            fn is_phase_terminated(&self, phase_scope: &PhaseScope<'_, S, D>) -> bool {
                (self.0).$idx.is_phase_terminated(phase_scope)
            }
        }
    };

    // Multiple terminations - any must be true
    ($($idx:tt: $T:ident),+) => {
        impl<S, D, $($T),+> Termination<S, D> for OrTermination<($($T,)+)>
        where
            S: PlanningSolution,
            D: ScoreDirector<S>,
            $($T: Termination<S, D>,)+
        {
            fn is_solver_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool {
                $((self.0).$idx.is_solver_terminated(solver_scope))||+
            }

            fn is_phase_terminated(&self, phase_scope: &PhaseScope<'_, S, D>) -> bool {
                $((self.0).$idx.is_phase_terminated(phase_scope))||+
            }
        }
    };
}

impl_or_termination!(0: T0);
impl_or_termination!(0: T0, 1: T1);
impl_or_termination!(0: T0, 1: T1, 2: T2);
impl_or_termination!(0: T0, 1: T1, 2: T2, 3: T3);
impl_or_termination!(0: T0, 1: T1, 2: T2, 3: T3, 4: T4);
impl_or_termination!(0: T0, 1: T1, 2: T2, 3: T3, 4: T4, 5: T5);
impl_or_termination!(0: T0, 1: T1, 2: T2, 3: T3, 4: T4, 5: T5, 6: T6);
impl_or_termination!(0: T0, 1: T1, 2: T2, 3: T3, 4: T4, 5: T5, 6: T6, 7: T7);

/// An empty list never terminates.
impl<S, D, T> Termination<S, D> for OrTermination<Vec<T>>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    T: Termination<S, D>,
{
    fn is_solver_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool {
        self.0.iter().any(|t| t.is_solver_terminated(solver_scope))
    }

    fn is_phase_terminated(&self, phase_scope: &PhaseScope<'_, S, D>) -> bool {
        self.0.iter().any(|t| t.is_phase_terminated(phase_scope))
    }
}

/// Combines multiple terminations with AND logic (all must terminate).
///
/// # Examples
///
/// ```
/// use phaseforge_solver::termination::{AndTermination, BestScoreFeasibleTermination, StepCountTermination};
///
/// // Terminate only when BOTH score is feasible AND 100 steps passed
/// let termination = AndTermination::new((
///     BestScoreFeasibleTermination::new(),
///     StepCountTermination::new(100),
/// ));
/// ```
#[derive(Debug)]
pub struct AndTermination<T>(pub T);

impl<T> AndTermination<T> {
    /// Creates a new AND termination from a tuple of terminations.
    pub fn new(terminations: T) -> Self {
        Self(terminations)
    }
}

/// Generates `Termination` implementations for AND tuples.
macro_rules! impl_and_termination {
    // Single termination
    ($idx:tt: $T:ident) => {
        impl<S, D, $T> Termination<S, D> for AndTermination<($T,)>
        where
            S: PlanningSolution,
            D: ScoreDirector<S>,
            $T: Termination<S, D>,
        {
            fn is_solver_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool {
                (self.0).$idx.is_solver_terminated(solver_scope)
            }

            fn is_phase_terminated(&self, phase_scope: &PhaseScope<'_, S, D>) -> bool {
                (self.0).$idx.is_phase_terminated(phase_scope)
            }
        }
    };

    // Multiple terminations - all must be true
    ($($idx:tt: $T:ident),+) => {
        impl<S, D, $($T),+> Termination<S, D> for AndTermination<($($T,)+)>
        where
            S: PlanningSolution,
            D: ScoreDirector<S>,
            $($T: Termination<S, D>,)+
        {
            fn is_solver_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool {
                $((self.0).$idx.is_solver_terminated(solver_scope))&&+
            }

            fn is_phase_terminated(&self, phase_scope: &PhaseScope<'_, S, D>) -> bool {
                $((self.0).$idx.is_phase_terminated(phase_scope))&&+
            }
        }
    };
}

impl_and_termination!(0: T0);
impl_and_termination!(0: T0, 1: T1);
impl_and_termination!(0: T0, 1: T1, 2: T2);
impl_and_termination!(0: T0, 1: T1, 2: T2, 3: T3);
impl_and_termination!(0: T0, 1: T1, 2: T2, 3: T3, 4: T4);
impl_and_termination!(0: T0, 1: T1, 2: T2, 3: T3, 4: T4, 5: T5);
impl_and_termination!(0: T0, 1: T1, 2: T2, 3: T3, 4: T4, 5: T5, 6: T6);
impl_and_termination!(0: T0, 1: T1, 2: T2, 3: T3, 4: T4, 5: T5, 6: T6, 7: T7);

/// An empty list never terminates.
impl<S, D, T> Termination<S, D> for AndTermination<Vec<T>>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    T: Termination<S, D>,
{
    fn is_solver_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool {
        !self.0.is_empty() && self.0.iter().all(|t| t.is_solver_terminated(solver_scope))
    }

    fn is_phase_terminated(&self, phase_scope: &PhaseScope<'_, S, D>) -> bool {
        !self.0.is_empty() && self.0.iter().all(|t| t.is_phase_terminated(phase_scope))
    }
}
