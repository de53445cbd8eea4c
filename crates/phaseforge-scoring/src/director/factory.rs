//! Score director factory for creating score directors.

use std::fmt;
use std::sync::Arc;

use phaseforge_core::{PlanningSolution, SolutionDescriptor};

use super::typed::{ListenerRegistration, TypedScoreDirector};
use crate::calculator::ScoreCalculator;

/// Creates the variable listeners of one director.
///
/// Listeners carry per-director state, so every director gets its own set.
pub type ListenerBuilder<S> = Arc<dyn Fn() -> Vec<ListenerRegistration<S>> + Send + Sync>;

/// Factory for creating score directors.
///
/// Holds the solution descriptor, a pristine calculator prototype and the
/// listener builder. Every director keeps a clone of its factory so it can
/// spawn independent child directors.
pub struct ScoreDirectorFactory<S: PlanningSolution, C> {
    solution_descriptor: SolutionDescriptor<S>,
    calculator: C,
    listener_builder: Option<ListenerBuilder<S>>,
}

impl<S, C> ScoreDirectorFactory<S, C>
where
    S: PlanningSolution,
    C: ScoreCalculator<S> + Clone,
{
    pub fn new(solution_descriptor: SolutionDescriptor<S>, calculator: C) -> Self {
        Self {
            solution_descriptor,
            calculator,
            listener_builder: None,
        }
    }

    /// Registers the variable listeners every built director receives.
    pub fn with_listeners<F>(mut self, builder: F) -> Self
    where
        F: Fn() -> Vec<ListenerRegistration<S>> + Send + Sync + 'static,
    {
        self.listener_builder = Some(Arc::new(builder));
        self
    }

    /// Creates a new score director for the given solution.
    pub fn build_score_director(&self, solution: S) -> TypedScoreDirector<S, C> {
        TypedScoreDirector::from_factory(self.clone(), solution)
    }

    pub fn solution_descriptor(&self) -> &SolutionDescriptor<S> {
        &self.solution_descriptor
    }

    pub(crate) fn calculator_prototype(&self) -> C {
        self.calculator.clone()
    }

    pub(crate) fn build_listeners(&self) -> Vec<ListenerRegistration<S>> {
        self.listener_builder
            .as_ref()
            .map(|build| build())
            .unwrap_or_default()
    }
}

impl<S: PlanningSolution, C: Clone> Clone for ScoreDirectorFactory<S, C> {
    fn clone(&self) -> Self {
        Self {
            solution_descriptor: self.solution_descriptor.clone(),
            calculator: self.calculator.clone(),
            listener_builder: self.listener_builder.clone(),
        }
    }
}

impl<S: PlanningSolution, C> fmt::Debug for ScoreDirectorFactory<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScoreDirectorFactory")
            .field("solution", &self.solution_descriptor.type_name)
            .field("has_listeners", &self.listener_builder.is_some())
            .finish()
    }
}
