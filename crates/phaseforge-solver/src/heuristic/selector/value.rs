//! Value selectors for planning variables.
//!
//! Value selectors yield candidate values of type `V` for one entity. The
//! entity is passed in so entity-dependent value ranges can be resolved.

use std::cmp::Ordering;
use std::fmt::Debug;

use phaseforge_core::{PhaseForgeError, PlanningSolution, Result};
use phaseforge_scoring::ScoreDirector;

use super::iter::SelectionIter;
use super::selection_order::{
    validate_cache_type, SelectionCacheType, SelectionOrder, SelectionSorterOrder,
};
use crate::scope::SolverRng;

/// A value selector that yields values of type `V` directly.
///
/// # Type Parameters
/// * `S` - The planning solution type
/// * `V` - The value type
pub trait ValueSelector<S: PlanningSolution, V>: Send + Debug {
    /// Returns an iterator over values for the given entity.
    fn iter<'a, D: ScoreDirector<S>>(
        &'a self,
        score_director: &'a D,
        descriptor_index: usize,
        entity_index: usize,
        rng: SolverRng,
    ) -> impl Iterator<Item = V> + 'a;

    /// Returns the number of values for the given entity.
    fn size<D: ScoreDirector<S>>(
        &self,
        score_director: &D,
        descriptor_index: usize,
        entity_index: usize,
    ) -> usize;

    /// Returns true if this selector may return the same value multiple times.
    fn is_never_ending(&self) -> bool {
        false
    }

    fn phase_started<D: ScoreDirector<S>>(&mut self, _score_director: &D) {}

    fn step_started<D: ScoreDirector<S>>(&mut self, _score_director: &D) {}

    fn step_ended(&mut self) {}

    fn phase_ended(&mut self) {}
}

/// A value selector over a fixed list of values.
pub struct StaticValueSelector<S, V> {
    values: Vec<V>,
    selection_order: SelectionOrder,
    _phantom: std::marker::PhantomData<fn() -> S>,
}

impl<S, V: Clone> Clone for StaticValueSelector<S, V> {
    fn clone(&self) -> Self {
        Self {
            values: self.values.clone(),
            selection_order: self.selection_order,
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<S, V: Debug> Debug for StaticValueSelector<S, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticValueSelector")
            .field("values", &self.values)
            .field("selection_order", &self.selection_order)
            .finish()
    }
}

impl<S, V> StaticValueSelector<S, V> {
    pub fn new(values: Vec<V>) -> Self {
        Self {
            values,
            selection_order: SelectionOrder::Original,
            _phantom: std::marker::PhantomData,
        }
    }

    /// Sets the order. The list is already materialized, so every order
    /// except `Probabilistic` (which has no weights here) is allowed.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error for `Sorted` and `Probabilistic`.
    pub fn with_selection_order(mut self, order: SelectionOrder) -> Result<Self> {
        if matches!(order, SelectionOrder::Sorted | SelectionOrder::Probabilistic) {
            return Err(PhaseForgeError::Config(format!(
                "static value selector: unsupported selection order {order:?}"
            )));
        }
        self.selection_order = order;
        Ok(self)
    }

    pub fn values(&self) -> &[V] {
        &self.values
    }
}

impl<S, V> ValueSelector<S, V> for StaticValueSelector<S, V>
where
    S: PlanningSolution,
    V: Clone + Send + Debug + 'static,
{
    fn iter<'a, D: ScoreDirector<S>>(
        &'a self,
        _score_director: &'a D,
        _descriptor_index: usize,
        _entity_index: usize,
        rng: SolverRng,
    ) -> impl Iterator<Item = V> + 'a {
        SelectionIter::new(self.values.clone(), self.selection_order, None, rng)
    }

    fn size<D: ScoreDirector<S>>(
        &self,
        _score_director: &D,
        _descriptor_index: usize,
        _entity_index: usize,
    ) -> usize {
        self.values.len()
    }

    fn is_never_ending(&self) -> bool {
        self.selection_order.is_never_ending()
    }
}

/// Where a [`FromSolutionValueSelector`] reads its values from.
pub enum ValueRange<S, V> {
    /// One range shared by every entity.
    Solution(fn(&S) -> Vec<V>),
    /// A range per entity, indexed by entity.
    Entity(fn(&S, usize) -> Vec<V>),
}

impl<S, V> Clone for ValueRange<S, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, V> Copy for ValueRange<S, V> {}

impl<S, V> Debug for ValueRange<S, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Solution(_) => f.write_str("ValueRange::Solution"),
            Self::Entity(_) => f.write_str("ValueRange::Entity"),
        }
    }
}

/// A value selector that extracts values from the working solution.
///
/// `Sorted` uses the strength comparator. Entity-independent ranges are
/// cached per step or phase when the cache type asks for it; entity-dependent
/// ranges are always resolved per iteration.
pub struct FromSolutionValueSelector<S, V> {
    range: ValueRange<S, V>,
    selection_order: SelectionOrder,
    cache_type: SelectionCacheType,
    sorter: Option<(fn(&S, &V, &V) -> Ordering, SelectionSorterOrder)>,
    probability_weight: Option<fn(&S, &V) -> f64>,
    cached: Option<Vec<V>>,
}

impl<S, V: Debug> Debug for FromSolutionValueSelector<S, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FromSolutionValueSelector")
            .field("range", &self.range)
            .field("selection_order", &self.selection_order)
            .field("cache_type", &self.cache_type)
            .field("cached", &self.cached.as_ref().map(Vec::len))
            .finish()
    }
}

impl<S: PlanningSolution, V: Clone> FromSolutionValueSelector<S, V> {
    /// Selects from an entity-independent range.
    pub fn new(extractor: fn(&S) -> Vec<V>) -> Self {
        Self::with_range(ValueRange::Solution(extractor))
    }

    /// Selects from an entity-dependent range.
    pub fn entity_dependent(extractor: fn(&S, usize) -> Vec<V>) -> Self {
        Self::with_range(ValueRange::Entity(extractor))
    }

    fn with_range(range: ValueRange<S, V>) -> Self {
        Self {
            range,
            selection_order: SelectionOrder::Original,
            cache_type: SelectionCacheType::JustInTime,
            sorter: None,
            probability_weight: None,
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

    /// Sets the strength comparator used by `Sorted`.
    pub fn with_sorter(
        mut self,
        sorter: fn(&S, &V, &V) -> Ordering,
        order: SelectionSorterOrder,
    ) -> Self {
        self.sorter = Some((sorter, order));
        self
    }

    pub fn with_probability_weight(mut self, weight: fn(&S, &V) -> f64) -> Self {
        self.probability_weight = Some(weight);
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the order needs a cache the cache type does
    /// not provide, or needs a sorter or weight that was not set.
    pub fn build(self) -> Result<Self> {
        validate_cache_type("value selector", self.selection_order, self.cache_type)?;
        match self.selection_order {
            SelectionOrder::Sorted if self.sorter.is_none() => Err(PhaseForgeError::Config(
                "value selector: Sorted selection order requires a sorter".to_string(),
            )),
            SelectionOrder::Probabilistic if self.probability_weight.is_none() => {
                Err(PhaseForgeError::Config(
                    "value selector: Probabilistic selection order requires a probability weight"
                        .to_string(),
                ))
            }
            _ => Ok(self),
        }
    }

    pub fn has_sorter(&self) -> bool {
        self.sorter.is_some()
    }

    /// Changes the direction of an already set strength sorter.
    pub fn with_sorter_order(mut self, order: SelectionSorterOrder) -> Self {
        if let Some((_, current)) = &mut self.sorter {
            *current = order;
        }
        self
    }

    fn values(&self, solution: &S, entity_index: usize) -> Vec<V> {
        let mut values = match self.range {
            ValueRange::Solution(extractor) => extractor(solution),
            ValueRange::Entity(extractor) => extractor(solution, entity_index),
        };
        if self.selection_order == SelectionOrder::Sorted {
            if let Some((sorter, order)) = self.sorter {
                values.sort_by(|a, b| order.apply(sorter(solution, a, b)));
            }
        }
        values
    }

    fn fill_cache<D: ScoreDirector<S>>(&mut self, score_director: &D) {
        if let ValueRange::Solution(_) = self.range {
            self.cached = Some(self.values(score_director.working_solution(), 0));
        }
    }
}

impl<S, V> ValueSelector<S, V> for FromSolutionValueSelector<S, V>
where
    S: PlanningSolution,
    V: Clone + Send + Debug + 'static,
{
    fn iter<'a, D: ScoreDirector<S>>(
        &'a self,
        score_director: &'a D,
        _descriptor_index: usize,
        entity_index: usize,
        rng: SolverRng,
    ) -> impl Iterator<Item = V> + 'a {
        let solution = score_director.working_solution();
        let values = match &self.cached {
            Some(cached) => cached.clone(),
            None => self.values(solution, entity_index),
        };
        let weights = match (self.selection_order, self.probability_weight) {
            (SelectionOrder::Probabilistic, Some(weight)) => {
                Some(values.iter().map(|v| weight(solution, v)).collect())
            }
            _ => None,
        };
        SelectionIter::new(values, self.selection_order, weights, rng)
    }

    fn size<D: ScoreDirector<S>>(
        &self,
        score_director: &D,
        _descriptor_index: usize,
        entity_index: usize,
    ) -> usize {
        match &self.cached {
            Some(cached) => cached.len(),
            None => match self.range {
                ValueRange::Solution(extractor) => extractor(score_director.working_solution()).len(),
                ValueRange::Entity(extractor) => {
                    extractor(score_director.working_solution(), entity_index).len()
                }
            },
        }
    }

    fn is_never_ending(&self) -> bool {
        self.selection_order.is_never_ending()
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
