//! Solver phases.
//!
//! Phases are the main building blocks of solving:
//! - [`ConstructionHeuristicPhase`](construction::ConstructionHeuristicPhase): builds an initial solution
//! - [`ExhaustiveSearchPhase`](exhaustive::ExhaustiveSearchPhase): explores the search tree with branch and bound

pub mod construction;
pub mod exhaustive;

use std::fmt::Debug;

use phaseforge_core::{PlanningSolution, Result};
use phaseforge_scoring::ScoreDirector;

use crate::scope::SolverScope;

/// A phase of the solving process.
///
/// Phases are executed in sequence by the solver. The lifecycle is
/// `solving_started`, then `solve` (which runs the phase's own
/// `phase_started → {step}* → phase_ended`), then `solving_ended`.
///
/// # Type Parameters
/// * `S` - The planning solution type
/// * `D` - The score director type
pub trait Phase<S: PlanningSolution, D: ScoreDirector<S>>: Send + Debug {
    /// Called once before any phase of the run solves.
    fn solving_started(&mut self, _solver_scope: &mut SolverScope<S, D>) {}

    /// Executes this phase.
    ///
    /// The phase modifies the working solution in the solver scope and
    /// offers improvements to the best solution recaller.
    ///
    /// # Errors
    ///
    /// Returns consistency errors (`ScoreCorruption`, `UndoMoveCorruption`,
    /// change notification failures) and configuration errors detected when
    /// the phase starts.
    fn solve(&mut self, solver_scope: &mut SolverScope<S, D>) -> Result<()>;

    /// Called once after the last phase of the run.
    fn solving_ended(&mut self, _solver_scope: &mut SolverScope<S, D>) {}

    /// Returns the name of this phase type.
    fn phase_type_name(&self) -> &'static str;
}
