//! Caching move selector decorator.
//!
//! Materializes the moves of a finite child once per step or once per phase
//! and replays them in the configured selection order.

use std::cmp::Ordering;
use std::fmt::Debug;
use std::marker::PhantomData;

use phaseforge_core::{PhaseForgeError, PlanningSolution, Result};
use phaseforge_scoring::ScoreDirector;

use crate::heuristic::r#move::Move;
use crate::heuristic::selector::iter::SelectionIter;
use crate::heuristic::selector::move_selector::MoveSelector;
use crate::heuristic::selector::selection_order::{SelectionCacheType, SelectionOrder};
use crate::scope::{fork_rng, SolverRng};

/// Caches moves from a child selector for repeated iteration.
///
/// The cache is filled at `step_started` (cache type `Step`) or
/// `phase_started` (cache type `Phase`) and dropped at the matching end.
/// Outside that window each iteration materializes the child on the fly.
///
/// # Example
///
/// ```
/// use phaseforge_solver::heuristic::selector::decorator::CachingMoveSelector;
/// use phaseforge_solver::heuristic::selector::{ChangeMoveSelector, SelectionCacheType, SelectionOrder};
/// use phaseforge_core::PlanningSolution;
/// use phaseforge_core::score::SimpleScore;
///
/// #[derive(Clone, Debug)]
/// struct Task { priority: Option<i32> }
///
/// #[derive(Clone, Debug)]
/// struct Solution { tasks: Vec<Task>, score: Option<SimpleScore> }
///
/// impl PlanningSolution for Solution {
///     type Score = SimpleScore;
///     fn score(&self) -> Option<Self::Score> { self.score }
///     fn set_score(&mut self, score: Option<Self::Score>) { self.score = score; }
/// }
///
/// fn get_priority(s: &Solution, i: usize) -> Option<i32> { s.tasks.get(i).and_then(|t| t.priority) }
/// fn set_priority(s: &mut Solution, i: usize, v: Option<i32>) { if let Some(t) = s.tasks.get_mut(i) { t.priority = v; } }
///
/// let inner = ChangeMoveSelector::<Solution, i32, _, _>::simple(
///     get_priority, set_priority, 0, "priority", vec![1, 2, 3],
/// );
/// let caching = CachingMoveSelector::new(inner, SelectionCacheType::Step)
///     .unwrap()
///     .with_selection_order(SelectionOrder::Shuffled);
/// assert!(caching.build().is_ok());
///
/// let inner = ChangeMoveSelector::<Solution, i32, _, _>::simple(
///     get_priority, set_priority, 0, "priority", vec![1],
/// );
/// assert!(CachingMoveSelector::new(inner, SelectionCacheType::JustInTime).is_err());
/// ```
pub struct CachingMoveSelector<S, M, Inner> {
    inner: Inner,
    cache_type: SelectionCacheType,
    selection_order: SelectionOrder,
    sorter: Option<fn(&S, &M, &M) -> Ordering>,
    probability_weight: Option<fn(&S, &M) -> f64>,
    cached: Option<Vec<M>>,
    _phantom: PhantomData<fn() -> S>,
}

impl<S, M, Inner: Debug> Debug for CachingMoveSelector<S, M, Inner> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachingMoveSelector")
            .field("inner", &self.inner)
            .field("cache_type", &self.cache_type)
            .field("selection_order", &self.selection_order)
            .field("cached", &self.cached.as_ref().map(Vec::len))
            .finish()
    }
}

impl<S, M, Inner> CachingMoveSelector<S, M, Inner>
where
    S: PlanningSolution,
    M: Move<S>,
    Inner: MoveSelector<S, M>,
{
    /// Wraps `inner` with a cache of the given lifetime.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error for `JustInTime` (nothing to cache) or a
    /// never-ending child (cannot be materialized).
    pub fn new(inner: Inner, cache_type: SelectionCacheType) -> Result<Self> {
        if cache_type == SelectionCacheType::JustInTime {
            return Err(PhaseForgeError::Config(
                "caching move selector: cache type JustInTime caches nothing".to_string(),
            ));
        }
        if inner.is_never_ending() {
            return Err(PhaseForgeError::Config(
                "caching move selector: cannot cache a never-ending child".to_string(),
            ));
        }
        Ok(Self {
            inner,
            cache_type,
            selection_order: SelectionOrder::Original,
            sorter: None,
            probability_weight: None,
            cached: None,
            _phantom: PhantomData,
        })
    }

    pub fn with_selection_order(mut self, order: SelectionOrder) -> Self {
        self.selection_order = order;
        self
    }

    pub fn with_sorter(mut self, sorter: fn(&S, &M, &M) -> Ordering) -> Self {
        self.sorter = Some(sorter);
        self
    }

    pub fn with_probability_weight(mut self, weight: fn(&S, &M) -> f64) -> Self {
        self.probability_weight = Some(weight);
        self
    }

    /// Checks that `Sorted` has a sorter and `Probabilistic` a weight.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error naming the missing function.
    pub fn build(self) -> Result<Self> {
        match self.selection_order {
            SelectionOrder::Sorted if self.sorter.is_none() => Err(PhaseForgeError::Config(
                "caching move selector: Sorted selection order requires a sorter".to_string(),
            )),
            SelectionOrder::Probabilistic if self.probability_weight.is_none() => {
                Err(PhaseForgeError::Config(
                    "caching move selector: Probabilistic selection order requires a probability weight"
                        .to_string(),
                ))
            }
            _ => Ok(self),
        }
    }

    pub fn inner(&self) -> &Inner {
        &self.inner
    }

    pub fn is_cached(&self) -> bool {
        self.cached.is_some()
    }

    fn materialize<D: ScoreDirector<S>>(&self, score_director: &D, rng: SolverRng) -> Vec<M> {
        let mut moves: Vec<M> = self.inner.iter_moves(score_director, rng).collect();
        if self.selection_order == SelectionOrder::Sorted {
            if let Some(sorter) = self.sorter {
                let solution = score_director.working_solution();
                moves.sort_by(|a, b| sorter(solution, a, b));
            }
        }
        moves
    }
}

impl<S, M, Inner> MoveSelector<S, M> for CachingMoveSelector<S, M, Inner>
where
    S: PlanningSolution,
    M: Move<S>,
    Inner: MoveSelector<S, M>,
{
    fn iter_moves<'a, D: ScoreDirector<S>>(
        &'a self,
        score_director: &'a D,
        mut rng: SolverRng,
    ) -> impl Iterator<Item = M> + 'a {
        let moves = match &self.cached {
            Some(cached) => cached.clone(),
            None => self.materialize(score_director, fork_rng(&mut rng)),
        };
        let weights = match (self.selection_order, self.probability_weight) {
            (SelectionOrder::Probabilistic, Some(weight)) => {
                let solution = score_director.working_solution();
                Some(moves.iter().map(|m| weight(solution, m)).collect())
            }
            _ => None,
        };
        SelectionIter::new(moves, self.selection_order, weights, rng)
    }

    fn size<D: ScoreDirector<S>>(&self, score_director: &D) -> usize {
        match &self.cached {
            Some(cached) => cached.len(),
            None => self.inner.size(score_director),
        }
    }

    fn is_never_ending(&self) -> bool {
        self.selection_order.is_never_ending()
    }

    fn phase_started<D: ScoreDirector<S>>(&mut self, score_director: &D, rng: &mut SolverRng) {
        self.inner.phase_started(score_director, rng);
        if self.cache_type == SelectionCacheType::Phase {
            self.cached = Some(self.materialize(score_director, fork_rng(rng)));
        }
    }

    fn step_started<D: ScoreDirector<S>>(&mut self, score_director: &D, rng: &mut SolverRng) {
        self.inner.step_started(score_director, rng);
        if self.cache_type == SelectionCacheType::Step {
            self.cached = Some(self.materialize(score_director, fork_rng(rng)));
        }
    }

    fn step_ended(&mut self) {
        self.inner.step_ended();
        if self.cache_type == SelectionCacheType::Step {
            self.cached = None;
        }
    }

    fn phase_ended(&mut self) {
        self.inner.phase_ended();
        self.cached = None;
    }
}
