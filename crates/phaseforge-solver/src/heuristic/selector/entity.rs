//! Entity selectors for iterating over planning entities

use std::cmp::Ordering;
use std::fmt::Debug;

use phaseforge_core::{PhaseForgeError, PlanningSolution, Result};
use phaseforge_scoring::ScoreDirector;

use super::iter::SelectionIter;
use super::selection_order::{
    validate_cache_type, SelectionCacheType, SelectionOrder, SelectionSorterOrder,
};
use crate::scope::SolverRng;

/// A reference to an entity within a solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityReference {
    /// Index of the entity descriptor.
    pub descriptor_index: usize,
    /// Index of the entity within its collection.
    pub entity_index: usize,
}

impl EntityReference {
    /// Creates a new entity reference.
    pub fn new(descriptor_index: usize, entity_index: usize) -> Self {
        Self {
            descriptor_index,
            entity_index,
        }
    }
}

/// Trait for selecting entities from a planning solution.
///
/// Entity selectors provide an iteration order over the entities that
/// the solver will consider for moves. `iter` receives a child RNG forked
/// from the solver's RNG; it is only consumed by random orders.
///
/// The lifecycle methods mirror the phase and step boundaries so cached
/// selectors can fill and drop their caches at the right time.
pub trait EntitySelector<S: PlanningSolution>: Send + Debug {
    /// Returns an iterator over entity references.
    fn iter<'a, D: ScoreDirector<S>>(
        &'a self,
        score_director: &'a D,
        rng: SolverRng,
    ) -> impl Iterator<Item = EntityReference> + 'a;

    /// Returns the number of selectable entities.
    fn size<D: ScoreDirector<S>>(&self, score_director: &D) -> usize;

    /// Returns true if this selector may return the same entity multiple times.
    fn is_never_ending(&self) -> bool {
        false
    }

    /// Returns the scope at which the candidate list is cached.
    fn cache_type(&self) -> SelectionCacheType {
        SelectionCacheType::JustInTime
    }

    fn phase_started<D: ScoreDirector<S>>(&mut self, _score_director: &D) {}

    fn step_started<D: ScoreDirector<S>>(&mut self, _score_director: &D) {}

    fn step_ended(&mut self) {}

    fn phase_ended(&mut self) {}
}

/// Selects the entities of one descriptor from the working solution.
///
/// Supports every [`SelectionOrder`]: `Sorted` uses the difficulty sorter,
/// `Probabilistic` the probability weight. Orders that need the full list
/// require a cache type of at least `Step`, checked by [`build`](Self::build).
pub struct FromSolutionEntitySelector<S> {
    descriptor_index: usize,
    selection_order: SelectionOrder,
    cache_type: SelectionCacheType,
    sorter: Option<(fn(&S, usize, usize) -> Ordering, SelectionSorterOrder)>,
    probability_weight: Option<fn(&S, usize) -> f64>,
    skip_pinned: bool,
    cached: Option<Vec<usize>>,
}

impl<S> Debug for FromSolutionEntitySelector<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FromSolutionEntitySelector")
            .field("descriptor_index", &self.descriptor_index)
            .field("selection_order", &self.selection_order)
            .field("cache_type", &self.cache_type)
            .field("skip_pinned", &self.skip_pinned)
            .field("cached", &self.cached.as_ref().map(Vec::len))
            .finish()
    }
}

impl<S: PlanningSolution> FromSolutionEntitySelector<S> {
    /// Creates a selector over all entities of the given descriptor, in
    /// original order, skipping pinned entities.
    pub fn new(descriptor_index: usize) -> Self {
        Self {
            descriptor_index,
            selection_order: SelectionOrder::Original,
            cache_type: SelectionCacheType::JustInTime,
            sorter: None,
            probability_weight: None,
            skip_pinned: true,
            cached: None,
        }
    }

    pub fn with_selection_order(mut self, order: SelectionOrder) -> Self {
        self.selection_order = order;
        self
    }

    pub fn with_cache_type(mut self, cache_type: SelectionCacheType) -> Self {
        self.cache_type = cache_type;
        self
    }

    /// Sets the difficulty comparator used by `Sorted`.
    pub fn with_sorter(
        mut self,
        sorter: fn(&S, usize, usize) -> Ordering,
        order: SelectionSorterOrder,
    ) -> Self {
        self.sorter = Some((sorter, order));
        self
    }

    /// Sets the weight function used by `Probabilistic`.
    pub fn with_probability_weight(mut self, weight: fn(&S, usize) -> f64) -> Self {
        self.probability_weight = Some(weight);
        self
    }

    pub fn with_skip_pinned(mut self, skip: bool) -> Self {
        self.skip_pinned = skip;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the order needs a cache the cache type does
    /// not provide, or needs a sorter or weight that was not set.
    pub fn build(self) -> Result<Self> {
        validate_cache_type("entity selector", self.selection_order, self.cache_type)?;
        match self.selection_order {
            SelectionOrder::Sorted if self.sorter.is_none() => Err(PhaseForgeError::Config(
                "entity selector: Sorted selection order requires a sorter".to_string(),
            )),
            SelectionOrder::Probabilistic if self.probability_weight.is_none() => {
                Err(PhaseForgeError::Config(
                    "entity selector: Probabilistic selection order requires a probability weight"
                        .to_string(),
                ))
            }
            _ => Ok(self),
        }
    }

    pub fn descriptor_index(&self) -> usize {
        self.descriptor_index
    }

    pub fn selection_order(&self) -> SelectionOrder {
        self.selection_order
    }

    pub fn has_sorter(&self) -> bool {
        self.sorter.is_some()
    }

    /// Changes the direction of an already set difficulty sorter.
    pub fn with_sorter_order(mut self, order: SelectionSorterOrder) -> Self {
        if let Some((_, current)) = &mut self.sorter {
            *current = order;
        }
        self
    }

    /// Entity indices in base order: unpinned (if requested), sorted if the
    /// order is `Sorted`.
    fn candidates<D: ScoreDirector<S>>(&self, score_director: &D) -> Vec<usize> {
        let solution = score_director.working_solution();
        let count = score_director
            .entity_count(self.descriptor_index)
            .unwrap_or(0);
        let descriptor = score_director
            .solution_descriptor()
            .entity_descriptor(self.descriptor_index);

        let mut entities: Vec<usize> = (0..count)
            .filter(|&i| {
                !self.skip_pinned || descriptor.map_or(true, |d| !d.is_pinned(solution, i))
            })
            .collect();

        if self.selection_order == SelectionOrder::Sorted {
            if let Some((sorter, order)) = self.sorter {
                // Stable, so equally difficult entities keep their original order.
                entities.sort_by(|&a, &b| order.apply(sorter(solution, a, b)));
            }
        }
        entities
    }

    fn fill_cache<D: ScoreDirector<S>>(&mut self, score_director: &D) {
        self.cached = Some(self.candidates(score_director));
    }
}

impl<S: PlanningSolution> EntitySelector<S> for FromSolutionEntitySelector<S> {
    fn iter<'a, D: ScoreDirector<S>>(
        &'a self,
        score_director: &'a D,
        rng: SolverRng,
    ) -> impl Iterator<Item = EntityReference> + 'a {
        let entities = match &self.cached {
            Some(cached) => cached.clone(),
            None => self.candidates(score_director),
        };
        let weights = match (self.selection_order, self.probability_weight) {
            (SelectionOrder::Probabilistic, Some(weight)) => {
                let solution = score_director.working_solution();
                Some(entities.iter().map(|&i| weight(solution, i)).collect())
            }
            _ => None,
        };

        let descriptor_index = self.descriptor_index;
        SelectionIter::new(entities, self.selection_order, weights, rng)
            .map(move |i| EntityReference::new(descriptor_index, i))
    }

    fn size<D: ScoreDirector<S>>(&self, score_director: &D) -> usize {
        match &self.cached {
            Some(cached) => cached.len(),
            None => self.candidates(score_director).len(),
        }
    }

    fn is_never_ending(&self) -> bool {
        self.selection_order.is_never_ending()
    }

    fn cache_type(&self) -> SelectionCacheType {
        self.cache_type
    }

    fn phase_started<D: ScoreDirector<S>>(&mut self, score_director: &D) {
        if self.cache_type == SelectionCacheType::Phase {
            self.fill_cache(score_director);
        }
    }

    fn step_started<D: ScoreDirector<S>>(&mut self, score_director: &D) {
        if self.cache_type == SelectionCacheType::Step {
            self.fill_cache(score_director);
        }
    }

    fn step_ended(&mut self) {
        if self.cache_type == SelectionCacheType::Step {
            self.cached = None;
        }
    }

    fn phase_ended(&mut self) {
        self.cached = None;
    }
}

/// An entity selector that iterates over all entities from all descriptors.
#[derive(Debug, Clone, Default)]
pub struct AllEntitiesSelector;

impl AllEntitiesSelector {
    /// Creates a new selector for all entities.
    pub fn new() -> Self {
        Self
    }
}

impl<S: PlanningSolution> EntitySelector<S> for AllEntitiesSelector {
    fn iter<'a, D: ScoreDirector<S>>(
        &'a self,
        score_director: &'a D,
        _rng: SolverRng,
    ) -> impl Iterator<Item = EntityReference> + 'a {
        let descriptor_count = score_director.solution_descriptor().entity_descriptors.len();
        (0..descriptor_count).flat_map(move |descriptor_index| {
            let count = score_director.entity_count(descriptor_index).unwrap_or(0);
            (0..count).map(move |i| EntityReference::new(descriptor_index, i))
        })
    }

    fn size<D: ScoreDirector<S>>(&self, score_director: &D) -> usize {
        score_director.total_entity_count()
    }
}

/// Keeps only the entities whose `variable_name` is still unassigned.
///
/// Pinned entities are never reinitializable, so they are dropped too.
#[derive(Debug, Clone)]
pub struct UnassignedEntitySelector<ES> {
    child: ES,
    variable_name: &'static str,
}

impl<ES> UnassignedEntitySelector<ES> {
    pub fn new(child: ES, variable_name: &'static str) -> Self {
        Self {
            child,
            variable_name,
        }
    }
}

impl<S, ES> EntitySelector<S> for UnassignedEntitySelector<ES>
where
    S: PlanningSolution,
    ES: EntitySelector<S>,
{
    fn iter<'a, D: ScoreDirector<S>>(
        &'a self,
        score_director: &'a D,
        rng: SolverRng,
    ) -> impl Iterator<Item = EntityReference> + 'a {
        let solution = score_director.working_solution();
        let descriptor = score_director.solution_descriptor();
        let variable_name = self.variable_name;
        self.child.iter(score_director, rng).filter(move |entity| {
            descriptor
                .entity_descriptor(entity.descriptor_index)
                .is_some_and(|d| {
                    d.is_variable_reinitializable(solution, entity.entity_index, variable_name)
                })
        })
    }

    fn size<D: ScoreDirector<S>>(&self, score_director: &D) -> usize {
        self.child.size(score_director)
    }

    fn is_never_ending(&self) -> bool {
        self.child.is_never_ending()
    }

    fn cache_type(&self) -> SelectionCacheType {
        self.child.cache_type()
    }

    fn phase_started<D: ScoreDirector<S>>(&mut self, score_director: &D) {
        self.child.phase_started(score_director);
    }

    fn step_started<D: ScoreDirector<S>>(&mut self, score_director: &D) {
        self.child.step_started(score_director);
    }

    fn step_ended(&mut self) {
        self.child.step_ended();
    }

    fn phase_ended(&mut self) {
        self.child.phase_ended();
    }
}
