//! Pillar move selectors.
//!
//! A pillar is the group of unpinned entities of one descriptor that share
//! the same assigned value. Unassigned entities belong to no pillar.

use std::fmt::Debug;
use std::marker::PhantomData;

use phaseforge_core::PlanningSolution;
use phaseforge_scoring::ScoreDirector;

use super::move_selector::MoveSelector;
use super::value::ValueSelector;
use crate::heuristic::r#move::{PillarChangeMove, PillarSwapMove};
use crate::scope::SolverRng;

/// Groups the unpinned entities of `descriptor_index` by their current value.
///
/// Pillars appear in order of their first member; members keep entity order.
pub fn collect_pillars<S, V, D>(
    score_director: &D,
    descriptor_index: usize,
    getter: fn(&S, usize) -> Option<V>,
) -> Vec<Vec<usize>>
where
    S: PlanningSolution,
    V: PartialEq,
    D: ScoreDirector<S>,
{
    let solution = score_director.working_solution();
    let count = score_director.entity_count(descriptor_index).unwrap_or(0);
    let descriptor = score_director
        .solution_descriptor()
        .entity_descriptor(descriptor_index);

    let mut keys: Vec<V> = Vec::new();
    let mut pillars: Vec<Vec<usize>> = Vec::new();
    for entity in 0..count {
        if descriptor.is_some_and(|d| d.is_pinned(solution, entity)) {
            continue;
        }
        let Some(value) = getter(solution, entity) else {
            continue;
        };
        match keys.iter().position(|k| *k == value) {
            Some(i) => pillars[i].push(entity),
            None => {
                keys.push(value);
                pillars.push(vec![entity]);
            }
        }
    }
    pillars
}

/// Generates a `PillarChangeMove` for every pillar and every value.
///
/// Values come from the value selector, asked for the pillar's first entity.
pub struct PillarChangeMoveSelector<S, V, VS> {
    value_selector: VS,
    getter: fn(&S, usize) -> Option<V>,
    setter: fn(&mut S, usize, Option<V>),
    descriptor_index: usize,
    variable_name: &'static str,
    _phantom: PhantomData<fn() -> V>,
}

impl<S, V, VS: Debug> Debug for PillarChangeMoveSelector<S, V, VS> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PillarChangeMoveSelector")
            .field("value_selector", &self.value_selector)
            .field("descriptor_index", &self.descriptor_index)
            .field("variable_name", &self.variable_name)
            .finish()
    }
}

impl<S, V, VS> PillarChangeMoveSelector<S, V, VS> {
    pub fn new(
        value_selector: VS,
        getter: fn(&S, usize) -> Option<V>,
        setter: fn(&mut S, usize, Option<V>),
        descriptor_index: usize,
        variable_name: &'static str,
    ) -> Self {
        Self {
            value_selector,
            getter,
            setter,
            descriptor_index,
            variable_name,
            _phantom: PhantomData,
        }
    }
}

impl<S, V, VS> MoveSelector<S, PillarChangeMove<S, V>> for PillarChangeMoveSelector<S, V, VS>
where
    S: PlanningSolution,
    V: Clone + PartialEq + Send + Sync + Debug + 'static,
    VS: ValueSelector<S, V>,
{
    fn iter_moves<'a, D: ScoreDirector<S>>(
        &'a self,
        score_director: &'a D,
        mut rng: SolverRng,
    ) -> impl Iterator<Item = PillarChangeMove<S, V>> + 'a {
        let descriptor_index = self.descriptor_index;
        let variable_name = self.variable_name;
        let getter = self.getter;
        let setter = self.setter;
        let value_selector = &self.value_selector;
        let values_per_pillar = super::iter::per_element_limit(value_selector.is_never_ending());

        collect_pillars(score_director, descriptor_index, getter)
            .into_iter()
            .flat_map(move |pillar| {
                let first = pillar[0];
                value_selector
                    .iter(
                        score_director,
                        descriptor_index,
                        first,
                        crate::scope::fork_rng(&mut rng),
                    )
                    .take(values_per_pillar)
                    .map(move |value| {
                        PillarChangeMove::new(
                            pillar.clone(),
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
        collect_pillars(score_director, self.descriptor_index, self.getter)
            .iter()
            .map(|p| {
                self.value_selector
                    .size(score_director, self.descriptor_index, p[0])
            })
            .sum()
    }

    fn phase_started<D: ScoreDirector<S>>(&mut self, score_director: &D, _rng: &mut SolverRng) {
        self.value_selector.phase_started(score_director);
    }

    fn step_started<D: ScoreDirector<S>>(&mut self, score_director: &D, _rng: &mut SolverRng) {
        self.value_selector.step_started(score_director);
    }

    fn step_ended(&mut self) {
        self.value_selector.step_ended();
    }

    fn phase_ended(&mut self) {
        self.value_selector.phase_ended();
    }
}

/// Generates a `PillarSwapMove` for every unordered pair of pillars.
pub struct PillarSwapMoveSelector<S, V> {
    getter: fn(&S, usize) -> Option<V>,
    setter: fn(&mut S, usize, Option<V>),
    descriptor_index: usize,
    variable_name: &'static str,
}

impl<S, V> Debug for PillarSwapMoveSelector<S, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PillarSwapMoveSelector")
            .field("descriptor_index", &self.descriptor_index)
            .field("variable_name", &self.variable_name)
            .finish()
    }
}

impl<S, V> PillarSwapMoveSelector<S, V> {
    pub fn new(
        getter: fn(&S, usize) -> Option<V>,
        setter: fn(&mut S, usize, Option<V>),
        descriptor_index: usize,
        variable_name: &'static str,
    ) -> Self {
        Self {
            getter,
            setter,
            descriptor_index,
            variable_name,
        }
    }
}

impl<S, V> MoveSelector<S, PillarSwapMove<S, V>> for PillarSwapMoveSelector<S, V>
where
    S: PlanningSolution,
    V: Clone + PartialEq + Send + Sync + Debug + 'static,
{
    fn iter_moves<'a, D: ScoreDirector<S>>(
        &'a self,
        score_director: &'a D,
        _rng: SolverRng,
    ) -> impl Iterator<Item = PillarSwapMove<S, V>> + 'a {
        let pillars = collect_pillars(score_director, self.descriptor_index, self.getter);
        let mut moves = Vec::new();
        for (i, left) in pillars.iter().enumerate() {
            for right in &pillars[i + 1..] {
                moves.push(PillarSwapMove::new(
                    left.clone(),
                    right.clone(),
                    self.getter,
                    self.setter,
                    self.variable_name,
                    self.descriptor_index,
                ));
            }
        }
        moves.into_iter()
    }

    fn size<D: ScoreDirector<S>>(&self, score_director: &D) -> usize {
        let n = collect_pillars(score_director, self.descriptor_index, self.getter).len();
        n * n.saturating_sub(1) / 2
    }
}
