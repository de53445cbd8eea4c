//! Incremental score director over a typed score calculator.

use std::collections::VecDeque;
use std::fmt;

use phaseforge_core::{
    FactHandle, PhaseForgeError, PlanningSolution, Result, ShadowNotifier, SolutionDescriptor,
    VariableListener,
};
use tracing::trace;

use super::factory::ScoreDirectorFactory;
use super::registry::FactRegistry;
use super::traits::ScoreDirector;
use crate::calculator::ScoreCalculator;

/// A variable listener bound to its source variable.
pub struct ListenerRegistration<S> {
    descriptor_index: usize,
    variable_name: &'static str,
    listener: Box<dyn VariableListener<S>>,
}

impl<S> ListenerRegistration<S> {
    /// Registers `listener` on variable `variable_name` of collection
    /// `descriptor_index`. The source may be a genuine or a shadow variable.
    pub fn new<L>(descriptor_index: usize, variable_name: &'static str, listener: L) -> Self
    where
        L: VariableListener<S> + 'static,
    {
        Self {
            descriptor_index,
            variable_name,
            listener: Box::new(listener),
        }
    }

    fn listens_to(&self, descriptor_index: usize, variable_name: &str) -> bool {
        self.descriptor_index == descriptor_index && self.variable_name == variable_name
    }
}

impl<S> fmt::Debug for ListenerRegistration<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistration")
            .field("descriptor_index", &self.descriptor_index)
            .field("variable_name", &self.variable_name)
            .finish()
    }
}

// Initialization state of a basic variable captured before a change.
#[derive(Debug, Clone, Copy)]
struct TrailEntry {
    descriptor_index: usize,
    entity_index: usize,
    variable_index: usize,
    was_initialized: bool,
}

// Hands listeners the working solution while routing their shadow
// changes to the calculator.
struct ShadowSession<'a, S, C> {
    solution: &'a mut S,
    calculator: &'a mut C,
    changed: Vec<(usize, usize, &'static str)>,
}

impl<S, C> ShadowNotifier<S> for ShadowSession<'_, S, C>
where
    S: PlanningSolution,
    C: ScoreCalculator<S>,
{
    fn working_solution(&self) -> &S {
        self.solution
    }

    fn working_solution_mut(&mut self) -> &mut S {
        self.solution
    }

    fn before_shadow_changed(
        &mut self,
        descriptor_index: usize,
        entity_index: usize,
        variable_name: &'static str,
    ) {
        self.calculator.before_update(
            &*self.solution,
            FactHandle::entity(descriptor_index, entity_index),
            variable_name,
        );
    }

    fn after_shadow_changed(
        &mut self,
        descriptor_index: usize,
        entity_index: usize,
        variable_name: &'static str,
    ) {
        self.calculator.update(
            &*self.solution,
            FactHandle::entity(descriptor_index, entity_index),
            variable_name,
        );
        self.changed
            .push((descriptor_index, entity_index, variable_name));
    }
}

/// Incremental score director.
///
/// Forwards every validated notification to the calculator `C`, runs the
/// variable listeners and caches the score until the next change.
///
/// ```
/// use phaseforge_core::{
///     EntityDescriptor, GenuineVariableDescriptor, PlanningSolution, SimpleScore,
///     SolutionDescriptor,
/// };
/// use phaseforge_scoring::{EasyScoreCalculator, ScoreDirector, TypedScoreDirector};
///
/// #[derive(Clone)]
/// struct Slots {
///     values: Vec<Option<i64>>,
///     score: Option<SimpleScore>,
/// }
///
/// impl PlanningSolution for Slots {
///     type Score = SimpleScore;
///     fn score(&self) -> Option<Self::Score> { self.score }
///     fn set_score(&mut self, score: Option<Self::Score>) { self.score = score; }
/// }
///
/// let descriptor = SolutionDescriptor::new("Slots").with_entity(
///     EntityDescriptor::new("Slot", |s: &Slots| s.values.len()).with_genuine_variable(
///         GenuineVariableDescriptor::basic("value", |s: &Slots, i| s.values[i].is_some()),
///     ),
/// );
/// let calculator = EasyScoreCalculator::new(|s: &Slots| {
///     SimpleScore::of(-s.values.iter().flatten().sum::<i64>())
/// });
/// let slots = Slots { values: vec![Some(2), None], score: None };
/// let mut director = TypedScoreDirector::new(slots, descriptor, calculator);
///
/// assert_eq!(director.calculate_score(), SimpleScore::of(-2));
/// assert_eq!(director.uninitialized_variable_count(), 1);
///
/// director.before_variable_changed(0, 1, "value").unwrap();
/// director.working_solution_mut().values[1] = Some(3);
/// director.after_variable_changed(0, 1, "value").unwrap();
///
/// assert_eq!(director.calculate_score(), SimpleScore::of(-5));
/// assert_eq!(director.uninitialized_variable_count(), 0);
/// ```
pub struct TypedScoreDirector<S: PlanningSolution, C> {
    working_solution: S,
    calculator: C,
    listeners: Vec<ListenerRegistration<S>>,
    registry: FactRegistry,
    cached_score: Option<S::Score>,
    uninitialized_count: usize,
    initialization_trail: Vec<TrailEntry>,
    calculation_count: u64,
    factory: ScoreDirectorFactory<S, C>,
}

impl<S, C> TypedScoreDirector<S, C>
where
    S: PlanningSolution,
    C: ScoreCalculator<S> + Clone,
{
    /// Creates a director without variable listeners.
    pub fn new(solution: S, solution_descriptor: SolutionDescriptor<S>, calculator: C) -> Self {
        ScoreDirectorFactory::new(solution_descriptor, calculator).build_score_director(solution)
    }

    pub(crate) fn from_factory(factory: ScoreDirectorFactory<S, C>, solution: S) -> Self {
        let mut director = Self {
            working_solution: solution,
            calculator: factory.calculator_prototype(),
            listeners: factory.build_listeners(),
            registry: FactRegistry::default(),
            cached_score: None,
            uninitialized_count: 0,
            initialization_trail: Vec::new(),
            calculation_count: 0,
            factory,
        };
        director.reset();
        director
    }

    pub fn calculator(&self) -> &C {
        &self.calculator
    }

    pub fn registry(&self) -> &FactRegistry {
        &self.registry
    }

    pub fn factory(&self) -> &ScoreDirectorFactory<S, C> {
        &self.factory
    }

    /// Consumes the director and returns the working solution.
    pub fn into_working_solution(self) -> S {
        self.working_solution
    }

    fn reset(&mut self) {
        let descriptor = self.factory.solution_descriptor();
        self.registry = FactRegistry::from_solution(descriptor, &self.working_solution);
        for registration in &mut self.listeners {
            registration
                .listener
                .reset_working_solution(&mut self.working_solution);
        }
        self.calculator.reset_working_memory(&self.working_solution);
        self.uninitialized_count = descriptor.count_uninitialized_variables(&self.working_solution);
        self.initialization_trail.clear();
        self.cached_score = None;
    }

    fn basic_variable_index(&self, descriptor_index: usize, variable_name: &str) -> Option<usize> {
        self.factory
            .solution_descriptor()
            .entity_descriptor(descriptor_index)?
            .genuine_variables()
            .iter()
            .position(|v| !v.is_list() && v.name() == variable_name)
    }

    fn is_variable_initialized(
        &self,
        descriptor_index: usize,
        entity_index: usize,
        variable_index: usize,
    ) -> bool {
        self.factory
            .solution_descriptor()
            .entity_descriptor(descriptor_index)
            .and_then(|d| d.genuine_variables().get(variable_index))
            .is_some_and(|v| v.is_initialized(&self.working_solution, entity_index))
    }

    // Runs the listeners on the changed variable, then cascades into
    // listeners on every shadow variable they touched.
    fn fire_after_listeners(
        &mut self,
        descriptor_index: usize,
        entity_index: usize,
        variable_name: &str,
    ) {
        let mut pending = VecDeque::new();
        self.notify_after(descriptor_index, entity_index, variable_name, &mut pending);
        while let Some((descriptor_index, entity_index, shadow_name)) = pending.pop_front() {
            self.notify_after(descriptor_index, entity_index, shadow_name, &mut pending);
        }
    }

    fn notify_after(
        &mut self,
        descriptor_index: usize,
        entity_index: usize,
        variable_name: &str,
        pending: &mut VecDeque<(usize, usize, &'static str)>,
    ) {
        let Self {
            working_solution,
            calculator,
            listeners,
            ..
        } = self;
        for registration in listeners
            .iter_mut()
            .filter(|r| r.listens_to(descriptor_index, variable_name))
        {
            let mut session = ShadowSession {
                solution: &mut *working_solution,
                calculator: &mut *calculator,
                changed: Vec::new(),
            };
            registration
                .listener
                .after_variable_changed(&mut session, entity_index);
            pending.extend(session.changed);
        }
    }

    fn source_variables_of(&self, descriptor_index: usize) -> Vec<&'static str> {
        let mut sources: Vec<&'static str> = Vec::new();
        for registration in &self.listeners {
            if registration.descriptor_index == descriptor_index
                && !sources.contains(&registration.variable_name)
            {
                sources.push(registration.variable_name);
            }
        }
        sources
    }

    fn reset_after_index_shift(&mut self, handle: FactHandle) {
        trace!(
            event = "director_reset",
            handle = %handle,
            "Collection indices shifted, rebuilding incremental state"
        );
        self.reset();
    }
}

impl<S, C> ScoreDirector<S> for TypedScoreDirector<S, C>
where
    S: PlanningSolution,
    C: ScoreCalculator<S> + Clone,
{
    fn working_solution(&self) -> &S {
        &self.working_solution
    }

    fn working_solution_mut(&mut self) -> &mut S {
        self.cached_score = None;
        &mut self.working_solution
    }

    fn set_working_solution(&mut self, solution: S) {
        self.working_solution = solution;
        self.reset();
    }

    fn solution_descriptor(&self) -> &SolutionDescriptor<S> {
        self.factory.solution_descriptor()
    }

    fn calculate_score(&mut self) -> S::Score {
        if let Some(score) = self.cached_score {
            return score;
        }
        let score = self.calculator.calculate_score(&self.working_solution);
        self.calculation_count += 1;
        self.working_solution.set_score(Some(score));
        self.cached_score = Some(score);
        score
    }

    fn set_score(&mut self, score: S::Score) {
        self.working_solution.set_score(Some(score));
        self.cached_score = Some(score);
    }

    fn calculation_count(&self) -> u64 {
        self.calculation_count
    }

    fn before_variable_changed(
        &mut self,
        descriptor_index: usize,
        entity_index: usize,
        variable_name: &str,
    ) -> Result<()> {
        let handle = FactHandle::entity(descriptor_index, entity_index);
        self.registry.check(handle, variable_name)?;

        if let Some(variable_index) = self.basic_variable_index(descriptor_index, variable_name) {
            let was_initialized =
                self.is_variable_initialized(descriptor_index, entity_index, variable_index);
            self.initialization_trail.push(TrailEntry {
                descriptor_index,
                entity_index,
                variable_index,
                was_initialized,
            });
        }

        for registration in self
            .listeners
            .iter_mut()
            .filter(|r| r.listens_to(descriptor_index, variable_name))
        {
            registration
                .listener
                .before_variable_changed(&self.working_solution, entity_index);
        }
        self.calculator
            .before_update(&self.working_solution, handle, variable_name);
        self.cached_score = None;
        Ok(())
    }

    fn after_variable_changed(
        &mut self,
        descriptor_index: usize,
        entity_index: usize,
        variable_name: &str,
    ) -> Result<()> {
        let handle = FactHandle::entity(descriptor_index, entity_index);
        self.registry.check(handle, variable_name)?;

        if let Some(variable_index) = self.basic_variable_index(descriptor_index, variable_name) {
            let position = self
                .initialization_trail
                .iter()
                .rposition(|t| {
                    t.descriptor_index == descriptor_index
                        && t.entity_index == entity_index
                        && t.variable_index == variable_index
                })
                .ok_or_else(|| {
                    PhaseForgeError::InvalidState(format!(
                        "after_variable_changed({}, '{}') without matching before_variable_changed",
                        handle, variable_name
                    ))
                })?;
            let entry = self.initialization_trail.remove(position);
            let now_initialized =
                self.is_variable_initialized(descriptor_index, entity_index, variable_index);
            match (entry.was_initialized, now_initialized) {
                (false, true) => {
                    self.uninitialized_count = self.uninitialized_count.saturating_sub(1)
                }
                (true, false) => self.uninitialized_count += 1,
                _ => {}
            }
        }

        self.calculator
            .update(&self.working_solution, handle, variable_name);
        self.fire_after_listeners(descriptor_index, entity_index, variable_name);
        self.cached_score = None;
        Ok(())
    }

    fn after_entity_added(&mut self, descriptor_index: usize, entity_index: usize) -> Result<()> {
        let handle = FactHandle::entity(descriptor_index, entity_index);
        self.registry.register(handle)?;
        if let Some(descriptor) = self
            .factory
            .solution_descriptor()
            .entity_descriptor(descriptor_index)
        {
            self.uninitialized_count +=
                descriptor.count_uninitialized_variables(&self.working_solution, entity_index);
        }
        self.calculator.insert(&self.working_solution, handle);
        for source in self.source_variables_of(descriptor_index) {
            self.fire_after_listeners(descriptor_index, entity_index, source);
        }
        self.cached_score = None;
        Ok(())
    }

    fn before_entity_removed(
        &mut self,
        descriptor_index: usize,
        entity_index: usize,
    ) -> Result<()> {
        let handle = FactHandle::entity(descriptor_index, entity_index);
        self.registry.check(handle, "")?;
        if let Some(descriptor) = self
            .factory
            .solution_descriptor()
            .entity_descriptor(descriptor_index)
        {
            let uninitialized =
                descriptor.count_uninitialized_variables(&self.working_solution, entity_index);
            self.uninitialized_count = self.uninitialized_count.saturating_sub(uninitialized);
        }
        self.calculator.delete(&self.working_solution, handle);
        self.cached_score = None;
        Ok(())
    }

    fn after_entity_removed(&mut self, descriptor_index: usize, entity_index: usize) -> Result<()> {
        let handle = FactHandle::entity(descriptor_index, entity_index);
        let was_last = self.registry.unregister(handle)?;
        if !was_last {
            self.reset_after_index_shift(handle);
        }
        self.cached_score = None;
        Ok(())
    }

    fn after_problem_fact_added(
        &mut self,
        descriptor_index: usize,
        fact_index: usize,
    ) -> Result<()> {
        let handle = FactHandle::problem_fact(descriptor_index, fact_index);
        self.registry.register(handle)?;
        self.calculator.insert(&self.working_solution, handle);
        self.cached_score = None;
        Ok(())
    }

    fn before_problem_property_changed(&mut self, handle: FactHandle) -> Result<()> {
        self.registry.check(handle, "")?;
        self.calculator
            .before_update(&self.working_solution, handle, "");
        self.cached_score = None;
        Ok(())
    }

    fn after_problem_property_changed(&mut self, handle: FactHandle) -> Result<()> {
        self.registry.check(handle, "")?;
        self.calculator.update(&self.working_solution, handle, "");
        self.cached_score = None;
        Ok(())
    }

    fn before_problem_fact_removed(
        &mut self,
        descriptor_index: usize,
        fact_index: usize,
    ) -> Result<()> {
        let handle = FactHandle::problem_fact(descriptor_index, fact_index);
        self.registry.check(handle, "")?;
        self.calculator.delete(&self.working_solution, handle);
        self.cached_score = None;
        Ok(())
    }

    fn after_problem_fact_removed(
        &mut self,
        descriptor_index: usize,
        fact_index: usize,
    ) -> Result<()> {
        let handle = FactHandle::problem_fact(descriptor_index, fact_index);
        let was_last = self.registry.unregister(handle)?;
        if !was_last {
            self.reset_after_index_shift(handle);
        }
        self.cached_score = None;
        Ok(())
    }

    fn requires_flushing(&self) -> bool {
        self.calculator.requires_flushing()
    }

    fn uninitialized_variable_count(&self) -> usize {
        self.uninitialized_count
    }

    fn create_child_director(&self) -> Self {
        self.factory
            .build_score_director(self.working_solution.clone())
    }
}

impl<S, C> fmt::Debug for TypedScoreDirector<S, C>
where
    S: PlanningSolution,
    C: ScoreCalculator<S> + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedScoreDirector")
            .field("solution", &self.factory.solution_descriptor().type_name)
            .field("cached_score", &self.cached_score)
            .field("uninitialized_count", &self.uninitialized_count)
            .field("listeners", &self.listeners.len())
            .field("calculation_count", &self.calculation_count)
            .finish()
    }
}
