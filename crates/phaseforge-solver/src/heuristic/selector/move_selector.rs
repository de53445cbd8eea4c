//! Typed move selectors.
//!
//! Move selectors yield concrete move types directly, so phases are
//! monomorphized over the move type and never box a move.

use std::fmt::Debug;
use std::marker::PhantomData;

use phaseforge_core::PlanningSolution;
use phaseforge_scoring::ScoreDirector;
use rand::Rng;

use super::entity::{EntityReference, EntitySelector, FromSolutionEntitySelector};
use super::iter::{per_element_limit, EitherIter};
use super::value::{StaticValueSelector, ValueSelector};
use crate::heuristic::r#move::{ChangeMove, Move, SwapMove};
use crate::scope::{fork_rng, SolverRng};

/// A typed move selector that yields moves of type `M` directly.
///
/// # Type Parameters
/// * `S` - The planning solution type
/// * `M` - The move type
pub trait MoveSelector<S: PlanningSolution, M: Move<S>>: Send + Debug {
    /// Returns an iterator over typed moves.
    fn iter_moves<'a, D: ScoreDirector<S>>(
        &'a self,
        score_director: &'a D,
        rng: SolverRng,
    ) -> impl Iterator<Item = M> + 'a;

    /// Returns the approximate number of moves.
    fn size<D: ScoreDirector<S>>(&self, score_director: &D) -> usize;

    /// Returns true if this selector may return the same move multiple times.
    fn is_never_ending(&self) -> bool {
        false
    }

    fn phase_started<D: ScoreDirector<S>>(&mut self, _score_director: &D, _rng: &mut SolverRng) {}

    fn step_started<D: ScoreDirector<S>>(&mut self, _score_director: &D, _rng: &mut SolverRng) {}

    fn step_ended(&mut self) {}

    fn phase_ended(&mut self) {}
}

/// A change move selector that generates `ChangeMove` instances.
///
/// For every selected entity, every selected value becomes one move. A
/// never-ending value selector contributes one value per entity.
pub struct ChangeMoveSelector<S, V, ES, VS> {
    entity_selector: ES,
    value_selector: VS,
    getter: fn(&S, usize) -> Option<V>,
    setter: fn(&mut S, usize, Option<V>),
    descriptor_index: usize,
    variable_name: &'static str,
    _phantom: PhantomData<(fn() -> S, fn() -> V)>,
}

impl<S, V, ES: Debug, VS: Debug> Debug for ChangeMoveSelector<S, V, ES, VS> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeMoveSelector")
            .field("entity_selector", &self.entity_selector)
            .field("value_selector", &self.value_selector)
            .field("descriptor_index", &self.descriptor_index)
            .field("variable_name", &self.variable_name)
            .finish()
    }
}

impl<S: PlanningSolution, V: Clone, ES, VS> ChangeMoveSelector<S, V, ES, VS> {
    /// Creates a new change move selector with typed function pointers.
    ///
    /// # Arguments
    /// * `entity_selector` - Selects entities to modify
    /// * `value_selector` - Selects values to assign
    /// * `getter` - Function pointer to get current value from solution
    /// * `setter` - Function pointer to set value on solution
    /// * `descriptor_index` - Index of the entity descriptor
    /// * `variable_name` - Name of the variable
    pub fn new(
        entity_selector: ES,
        value_selector: VS,
        getter: fn(&S, usize) -> Option<V>,
        setter: fn(&mut S, usize, Option<V>),
        descriptor_index: usize,
        variable_name: &'static str,
    ) -> Self {
        Self {
            entity_selector,
            value_selector,
            getter,
            setter,
            descriptor_index,
            variable_name,
            _phantom: PhantomData,
        }
    }

    pub fn entity_selector(&self) -> &ES {
        &self.entity_selector
    }

    pub fn value_selector(&self) -> &VS {
        &self.value_selector
    }
}

impl<S: PlanningSolution, V: Clone + Send + Debug + 'static>
    ChangeMoveSelector<S, V, FromSolutionEntitySelector<S>, StaticValueSelector<S, V>>
{
    /// Creates a simple selector with static values.
    pub fn simple(
        getter: fn(&S, usize) -> Option<V>,
        setter: fn(&mut S, usize, Option<V>),
        descriptor_index: usize,
        variable_name: &'static str,
        values: Vec<V>,
    ) -> Self {
        Self::new(
            FromSolutionEntitySelector::new(descriptor_index),
            StaticValueSelector::new(values),
            getter,
            setter,
            descriptor_index,
            variable_name,
        )
    }
}

impl<S, V, ES, VS> MoveSelector<S, ChangeMove<S, V>> for ChangeMoveSelector<S, V, ES, VS>
where
    S: PlanningSolution,
    V: Clone + PartialEq + Send + Sync + Debug + 'static,
    ES: EntitySelector<S>,
    VS: ValueSelector<S, V>,
{
    fn iter_moves<'a, D: ScoreDirector<S>>(
        &'a self,
        score_director: &'a D,
        mut rng: SolverRng,
    ) -> impl Iterator<Item = ChangeMove<S, V>> + 'a {
        let descriptor_index = self.descriptor_index;
        let variable_name = self.variable_name;
        let getter = self.getter;
        let setter = self.setter;
        let value_selector = &self.value_selector;
        let values_per_entity = per_element_limit(value_selector.is_never_ending());

        let entity_rng = fork_rng(&mut rng);
        self.entity_selector
            .iter(score_director, entity_rng)
            .flat_map(move |entity_ref| {
                value_selector
                    .iter(
                        score_director,
                        entity_ref.descriptor_index,
                        entity_ref.entity_index,
                        fork_rng(&mut rng),
                    )
                    .take(values_per_entity)
                    .map(move |value| {
                        ChangeMove::new(
                            entity_ref.entity_index,
                            Some(value),
                            getter,
                            setter,
                            variable_name,
                            descriptor_index,
                        )
                    })
            })
    }

    fn size<D: ScoreDirector<S>>(&self, score_director: &D) -> usize {
        let count = score_director
            .entity_count(self.descriptor_index)
            .unwrap_or(0);
        (0..count)
            .map(|i| self.value_selector.size(score_director, self.descriptor_index, i))
            .sum()
    }

    fn is_never_ending(&self) -> bool {
        self.entity_selector.is_never_ending()
    }

    fn phase_started<D: ScoreDirector<S>>(&mut self, score_director: &D, _rng: &mut SolverRng) {
        self.entity_selector.phase_started(score_director);
        self.value_selector.phase_started(score_director);
    }

    fn step_started<D: ScoreDirector<S>>(&mut self, score_director: &D, _rng: &mut SolverRng) {
        self.entity_selector.step_started(score_director);
        self.value_selector.step_started(score_director);
    }

    fn step_ended(&mut self) {
        self.entity_selector.step_ended();
        self.value_selector.step_ended();
    }

    fn phase_ended(&mut self) {
        self.entity_selector.phase_ended();
        self.value_selector.phase_ended();
    }
}

/// A swap move selector that generates `SwapMove` instances.
///
/// With finite entity selectors every unordered pair is yielded once
/// (left index below right index). With a never-ending left selector each
/// left entity is paired with a random distinct right entity.
pub struct SwapMoveSelector<S, V, LES, RES> {
    left_entity_selector: LES,
    right_entity_selector: RES,
    getter: fn(&S, usize) -> Option<V>,
    setter: fn(&mut S, usize, Option<V>),
    descriptor_index: usize,
    variable_name: &'static str,
    _phantom: PhantomData<(fn() -> S, fn() -> V)>,
}

impl<S, V, LES: Debug, RES: Debug> Debug for SwapMoveSelector<S, V, LES, RES> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwapMoveSelector")
            .field("left_entity_selector", &self.left_entity_selector)
            .field("right_entity_selector", &self.right_entity_selector)
            .field("descriptor_index", &self.descriptor_index)
            .field("variable_name", &self.variable_name)
            .finish()
    }
}

impl<S: PlanningSolution, V, LES, RES> SwapMoveSelector<S, V, LES, RES> {
    pub fn new(
        left_entity_selector: LES,
        right_entity_selector: RES,
        getter: fn(&S, usize) -> Option<V>,
        setter: fn(&mut S, usize, Option<V>),
        descriptor_index: usize,
        variable_name: &'static str,
    ) -> Self {
        Self {
            left_entity_selector,
            right_entity_selector,
            getter,
            setter,
            descriptor_index,
            variable_name,
            _phantom: PhantomData,
        }
    }
}

impl<S: PlanningSolution, V>
    SwapMoveSelector<S, V, FromSolutionEntitySelector<S>, FromSolutionEntitySelector<S>>
{
    /// Swaps between all entities of one descriptor.
    pub fn simple(
        getter: fn(&S, usize) -> Option<V>,
        setter: fn(&mut S, usize, Option<V>),
        descriptor_index: usize,
        variable_name: &'static str,
    ) -> Self {
        Self::new(
            FromSolutionEntitySelector::new(descriptor_index),
            FromSolutionEntitySelector::new(descriptor_index),
            getter,
            setter,
            descriptor_index,
            variable_name,
        )
    }
}

impl<S, V, LES, RES> MoveSelector<S, SwapMove<S, V>> for SwapMoveSelector<S, V, LES, RES>
where
    S: PlanningSolution,
    V: Clone + PartialEq + Send + Sync + Debug + 'static,
    LES: EntitySelector<S>,
    RES: EntitySelector<S>,
{
    fn iter_moves<'a, D: ScoreDirector<S>>(
        &'a self,
        score_director: &'a D,
        mut rng: SolverRng,
    ) -> impl Iterator<Item = SwapMove<S, V>> + 'a {
        let descriptor_index = self.descriptor_index;
        let variable_name = self.variable_name;
        let getter = self.getter;
        let setter = self.setter;

        let rights: Vec<EntityReference> = self
            .right_entity_selector
            .iter(score_director, fork_rng(&mut rng))
            .take(self.right_entity_selector.size(score_director))
            .collect();
        let lefts = self
            .left_entity_selector
            .iter(score_director, fork_rng(&mut rng));
        let to_move = move |(left, right): (EntityReference, EntityReference)| {
            SwapMove::new(
                left.entity_index,
                right.entity_index,
                getter,
                setter,
                variable_name,
                descriptor_index,
            )
        };

        if self.left_entity_selector.is_never_ending() {
            // A single candidate can never form a pair.
            let limit = if rights.len() < 2 { 0 } else { usize::MAX };
            let pairs = lefts.take(limit).filter_map(move |left| {
                let right = rights[rng.random_range(0..rights.len())];
                (right != left).then_some((left, right))
            });
            EitherIter::Left(pairs.map(to_move))
        } else {
            let pairs = lefts.flat_map(move |left| {
                rights
                    .clone()
                    .into_iter()
                    .filter(move |right| {
                        right.descriptor_index == left.descriptor_index
                            && right.entity_index > left.entity_index
                    })
                    .map(move |right| (left, right))
            });
            EitherIter::Right(pairs.map(to_move))
        }
    }

    fn size<D: ScoreDirector<S>>(&self, score_director: &D) -> usize {
        let left = self.left_entity_selector.size(score_director);
        let right = self.right_entity_selector.size(score_director);
        left * right.saturating_sub(1) / 2
    }

    fn is_never_ending(&self) -> bool {
        self.left_entity_selector.is_never_ending()
    }

    fn phase_started<D: ScoreDirector<S>>(&mut self, score_director: &D, _rng: &mut SolverRng) {
        self.left_entity_selector.phase_started(score_director);
        self.right_entity_selector.phase_started(score_director);
    }

    fn step_started<D: ScoreDirector<S>>(&mut self, score_director: &D, _rng: &mut SolverRng) {
        self.left_entity_selector.step_started(score_director);
        self.right_entity_selector.step_started(score_director);
    }

    fn step_ended(&mut self) {
        self.left_entity_selector.step_ended();
        self.right_entity_selector.step_ended();
    }

    fn phase_ended(&mut self) {
        self.left_entity_selector.phase_ended();
        self.right_entity_selector.phase_ended();
    }
}
