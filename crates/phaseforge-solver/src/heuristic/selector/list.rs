//! List variable move selectors.
//!
//! Both selectors enumerate positions exhaustively and are finite.
//!
//! # Example
//!
//! ```
//! use phaseforge_solver::heuristic::selector::entity::FromSolutionEntitySelector;
//! use phaseforge_solver::heuristic::selector::list::ListChangeMoveSelector;
//! use phaseforge_core::PlanningSolution;
//! use phaseforge_core::score::SimpleScore;
//!
//! #[derive(Clone, Debug)]
//! struct Vehicle { visits: Vec<i32> }
//!
//! #[derive(Clone, Debug)]
//! struct Plan { vehicles: Vec<Vehicle>, score: Option<SimpleScore> }
//!
//! impl PlanningSolution for Plan {
//!     type Score = SimpleScore;
//!     fn score(&self) -> Option<Self::Score> { self.score }
//!     fn set_score(&mut self, score: Option<Self::Score>) { self.score = score; }
//! }
//!
//! fn list_len(s: &Plan, e: usize) -> usize {
//!     s.vehicles.get(e).map_or(0, |v| v.visits.len())
//! }
//! fn list_remove(s: &mut Plan, e: usize, pos: usize) -> Option<i32> {
//!     s.vehicles.get_mut(e).map(|v| v.visits.remove(pos))
//! }
//! fn list_insert(s: &mut Plan, e: usize, pos: usize, val: i32) {
//!     if let Some(v) = s.vehicles.get_mut(e) { v.visits.insert(pos, val); }
//! }
//!
//! let selector = ListChangeMoveSelector::<Plan, i32, _>::new(
//!     FromSolutionEntitySelector::<Plan>::new(0),
//!     list_len,
//!     list_remove,
//!     list_insert,
//!     "visits",
//!     0,
//! );
//! ```

use std::fmt::Debug;
use std::marker::PhantomData;

use phaseforge_core::PlanningSolution;
use phaseforge_scoring::ScoreDirector;

use super::entity::EntitySelector;
use super::mimic::MimicValueRecorder;
use super::move_selector::MoveSelector;
use super::value::ValueSelector;
use crate::heuristic::r#move::{ListAssignMove, ListChangeMove, ListSwapMove};
use crate::scope::SolverRng;

/// Entities from `entity_selector` paired with their current list length.
fn entities_with_len<S, ES, D>(
    entity_selector: &ES,
    score_director: &D,
    list_len: fn(&S, usize) -> usize,
    rng: SolverRng,
) -> Vec<(usize, usize)>
where
    S: PlanningSolution,
    ES: EntitySelector<S>,
    D: ScoreDirector<S>,
{
    let solution = score_director.working_solution();
    let limit = entity_selector.size(score_director);
    let mut entities: Vec<usize> = entity_selector
        .iter(score_director, rng)
        .take(limit)
        .map(|r| r.entity_index)
        .collect();
    entities.sort_unstable();
    entities.dedup();
    entities
        .into_iter()
        .map(|e| (e, list_len(solution, e)))
        .collect()
}

/// Generates a `ListChangeMove` for every element and every destination.
///
/// Within one list the element goes to any other position; into another
/// list it goes to any position including the end.
pub struct ListChangeMoveSelector<S, V, ES> {
    entity_selector: ES,
    list_len: fn(&S, usize) -> usize,
    list_remove: fn(&mut S, usize, usize) -> Option<V>,
    list_insert: fn(&mut S, usize, usize, V),
    variable_name: &'static str,
    descriptor_index: usize,
    _phantom: PhantomData<fn() -> V>,
}

impl<S, V, ES: Debug> Debug for ListChangeMoveSelector<S, V, ES> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListChangeMoveSelector")
            .field("entity_selector", &self.entity_selector)
            .field("variable_name", &self.variable_name)
            .field("descriptor_index", &self.descriptor_index)
            .finish()
    }
}

impl<S, V, ES> ListChangeMoveSelector<S, V, ES> {
    pub fn new(
        entity_selector: ES,
        list_len: fn(&S, usize) -> usize,
        list_remove: fn(&mut S, usize, usize) -> Option<V>,
        list_insert: fn(&mut S, usize, usize, V),
        variable_name: &'static str,
        descriptor_index: usize,
    ) -> Self {
        Self {
            entity_selector,
            list_len,
            list_remove,
            list_insert,
            variable_name,
            descriptor_index,
            _phantom: PhantomData,
        }
    }
}

impl<S, V, ES> MoveSelector<S, ListChangeMove<S, V>> for ListChangeMoveSelector<S, V, ES>
where
    S: PlanningSolution,
    V: Clone + PartialEq + Send + Sync + Debug + 'static,
    ES: EntitySelector<S>,
{
    fn iter_moves<'a, D: ScoreDirector<S>>(
        &'a self,
        score_director: &'a D,
        rng: SolverRng,
    ) -> impl Iterator<Item = ListChangeMove<S, V>> + 'a {
        let entities =
            entities_with_len(&self.entity_selector, score_director, self.list_len, rng);

        let mut moves = Vec::new();
        for &(src, src_len) in &entities {
            for src_pos in 0..src_len {
                for &(dst, dst_len) in &entities {
                    let positions = if dst == src {
                        0..src_len
                    } else {
                        0..dst_len + 1
                    };
                    for dst_pos in positions {
                        if dst == src && dst_pos == src_pos {
                            continue;
                        }
                        moves.push(ListChangeMove::new(
                            src,
                            src_pos,
                            dst,
                            dst_pos,
                            self.list_len,
                            self.list_remove,
                            self.list_insert,
                            self.variable_name,
                            self.descriptor_index,
                        ));
                    }
                }
            }
        }
        moves.into_iter()
    }

    fn size<D: ScoreDirector<S>>(&self, score_director: &D) -> usize {
        let solution = score_director.working_solution();
        let count = score_director
            .entity_count(self.descriptor_index)
            .unwrap_or(0);
        let lens: Vec<usize> = (0..count).map(|e| (self.list_len)(solution, e)).collect();
        let total: usize = lens.iter().sum();
        lens.iter()
            .map(|&len| {
                // intra: len * (len - 1); inter: len * (other elements + other lists)
                let others = total - len + count.saturating_sub(1);
                len * len.saturating_sub(1) + len * others
            })
            .sum()
    }

    fn phase_started<D: ScoreDirector<S>>(&mut self, score_director: &D, _rng: &mut SolverRng) {
        self.entity_selector.phase_started(score_director);
    }

    fn step_started<D: ScoreDirector<S>>(&mut self, score_director: &D, _rng: &mut SolverRng) {
        self.entity_selector.step_started(score_director);
    }

    fn step_ended(&mut self) {
        self.entity_selector.step_ended();
    }

    fn phase_ended(&mut self) {
        self.entity_selector.phase_ended();
    }
}

/// Generates a `ListSwapMove` for every unordered pair of list positions.
pub struct ListSwapMoveSelector<S, V, ES> {
    entity_selector: ES,
    list_len: fn(&S, usize) -> usize,
    list_get: fn(&S, usize, usize) -> Option<V>,
    list_set: fn(&mut S, usize, usize, V),
    variable_name: &'static str,
    descriptor_index: usize,
    _phantom: PhantomData<fn() -> V>,
}

impl<S, V, ES: Debug> Debug for ListSwapMoveSelector<S, V, ES> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListSwapMoveSelector")
            .field("entity_selector", &self.entity_selector)
            .field("variable_name", &self.variable_name)
            .field("descriptor_index", &self.descriptor_index)
            .finish()
    }
}

impl<S, V, ES> ListSwapMoveSelector<S, V, ES> {
    pub fn new(
        entity_selector: ES,
        list_len: fn(&S, usize) -> usize,
        list_get: fn(&S, usize, usize) -> Option<V>,
        list_set: fn(&mut S, usize, usize, V),
        variable_name: &'static str,
        descriptor_index: usize,
    ) -> Self {
        Self {
            entity_selector,
            list_len,
            list_get,
            list_set,
            variable_name,
            descriptor_index,
            _phantom: PhantomData,
        }
    }
}

impl<S, V, ES> MoveSelector<S, ListSwapMove<S, V>> for ListSwapMoveSelector<S, V, ES>
where
    S: PlanningSolution,
    V: Clone + PartialEq + Send + Sync + Debug + 'static,
    ES: EntitySelector<S>,
{
    fn iter_moves<'a, D: ScoreDirector<S>>(
        &'a self,
        score_director: &'a D,
        rng: SolverRng,
    ) -> impl Iterator<Item = ListSwapMove<S, V>> + 'a {
        let positions: Vec<(usize, usize)> =
            entities_with_len(&self.entity_selector, score_director, self.list_len, rng)
                .into_iter()
                .flat_map(|(e, len)| (0..len).map(move |p| (e, p)))
                .collect();

        let mut moves = Vec::new();
        for (i, &(e1, p1)) in positions.iter().enumerate() {
            for &(e2, p2) in &positions[i + 1..] {
                moves.push(ListSwapMove::new(
                    e1,
                    p1,
                    e2,
                    p2,
                    self.list_len,
                    self.list_get,
                    self.list_set,
                    self.variable_name,
                    self.descriptor_index,
                ));
            }
        }
        moves.into_iter()
    }

    fn size<D: ScoreDirector<S>>(&self, score_director: &D) -> usize {
        let solution = score_director.working_solution();
        let count = score_director
            .entity_count(self.descriptor_index)
            .unwrap_or(0);
        let n: usize = (0..count).map(|e| (self.list_len)(solution, e)).sum();
        n * n.saturating_sub(1) / 2
    }

    fn phase_started<D: ScoreDirector<S>>(&mut self, score_director: &D, _rng: &mut SolverRng) {
        self.entity_selector.phase_started(score_director);
    }

    fn step_started<D: ScoreDirector<S>>(&mut self, score_director: &D, _rng: &mut SolverRng) {
        self.entity_selector.step_started(score_director);
    }

    fn step_ended(&mut self) {
        self.entity_selector.step_ended();
    }

    fn phase_ended(&mut self) {
        self.entity_selector.phase_ended();
    }
}

/// Keeps the values of `child` that no list of the descriptor holds yet.
pub struct UnassignedListValueSelector<S, V, VS> {
    child: VS,
    list_len: fn(&S, usize) -> usize,
    list_get: fn(&S, usize, usize) -> Option<V>,
    descriptor_index: usize,
}

impl<S, V, VS: Debug> Debug for UnassignedListValueSelector<S, V, VS> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnassignedListValueSelector")
            .field("child", &self.child)
            .field("descriptor_index", &self.descriptor_index)
            .finish()
    }
}

impl<S, V, VS> UnassignedListValueSelector<S, V, VS> {
    pub fn new(
        child: VS,
        list_len: fn(&S, usize) -> usize,
        list_get: fn(&S, usize, usize) -> Option<V>,
        descriptor_index: usize,
    ) -> Self {
        Self {
            child,
            list_len,
            list_get,
            descriptor_index,
        }
    }
}

impl<S, V, VS> ValueSelector<S, V> for UnassignedListValueSelector<S, V, VS>
where
    S: PlanningSolution,
    V: PartialEq + Send + Debug + 'static,
    VS: ValueSelector<S, V>,
{
    fn iter<'a, D: ScoreDirector<S>>(
        &'a self,
        score_director: &'a D,
        descriptor_index: usize,
        entity_index: usize,
        rng: SolverRng,
    ) -> impl Iterator<Item = V> + 'a {
        let solution = score_director.working_solution();
        let count = score_director
            .entity_count(self.descriptor_index)
            .unwrap_or(0);
        let list_get = self.list_get;
        let assigned: Vec<V> = (0..count)
            .flat_map(|e| {
                (0..(self.list_len)(solution, e)).filter_map(move |pos| list_get(solution, e, pos))
            })
            .collect();
        self.child
            .iter(score_director, descriptor_index, entity_index, rng)
            .filter(move |v| !assigned.contains(v))
    }

    fn size<D: ScoreDirector<S>>(
        &self,
        score_director: &D,
        descriptor_index: usize,
        entity_index: usize,
    ) -> usize {
        self.child.size(score_director, descriptor_index, entity_index)
    }

    fn is_never_ending(&self) -> bool {
        self.child.is_never_ending()
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

/// Generates a `ListAssignMove` of the recorded value to every position
/// of every selected list, the end included.
pub struct ListAssignMoveSelector<S, V, ES> {
    entity_selector: ES,
    recorder: MimicValueRecorder<V>,
    list_len: fn(&S, usize) -> usize,
    list_remove: fn(&mut S, usize, usize) -> Option<V>,
    list_insert: fn(&mut S, usize, usize, V),
    variable_name: &'static str,
    descriptor_index: usize,
}

impl<S, V, ES: Debug> Debug for ListAssignMoveSelector<S, V, ES> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListAssignMoveSelector")
            .field("entity_selector", &self.entity_selector)
            .field("recorder_id", &self.recorder.id())
            .field("variable_name", &self.variable_name)
            .finish()
    }
}

impl<S, V, ES> ListAssignMoveSelector<S, V, ES> {
    pub fn new(
        entity_selector: ES,
        recorder: MimicValueRecorder<V>,
        list_len: fn(&S, usize) -> usize,
        list_remove: fn(&mut S, usize, usize) -> Option<V>,
        list_insert: fn(&mut S, usize, usize, V),
        variable_name: &'static str,
        descriptor_index: usize,
    ) -> Self {
        Self {
            entity_selector,
            recorder,
            list_len,
            list_remove,
            list_insert,
            variable_name,
            descriptor_index,
        }
    }
}

impl<S, V, ES> MoveSelector<S, ListAssignMove<S, V>> for ListAssignMoveSelector<S, V, ES>
where
    S: PlanningSolution,
    V: Clone + PartialEq + Send + Sync + Debug + 'static,
    ES: EntitySelector<S>,
{
    fn iter_moves<'a, D: ScoreDirector<S>>(
        &'a self,
        score_director: &'a D,
        rng: SolverRng,
    ) -> impl Iterator<Item = ListAssignMove<S, V>> + 'a {
        let entities =
            entities_with_len(&self.entity_selector, score_director, self.list_len, rng);
        let value = self.recorder.recorded_value();

        let mut moves = Vec::new();
        if let Some(value) = value {
            for (entity, len) in entities {
                for position in 0..=len {
                    moves.push(ListAssignMove::new(
                        value.clone(),
                        entity,
                        position,
                        self.list_len,
                        self.list_remove,
                        self.list_insert,
                        self.variable_name,
                        self.descriptor_index,
                    ));
                }
            }
        }
        moves.into_iter()
    }

    fn size<D: ScoreDirector<S>>(&self, score_director: &D) -> usize {
        let solution = score_director.working_solution();
        let count = score_director
            .entity_count(self.descriptor_index)
            .unwrap_or(0);
        (0..count).map(|e| (self.list_len)(solution, e) + 1).sum()
    }

    fn phase_started<D: ScoreDirector<S>>(&mut self, score_director: &D, _rng: &mut SolverRng) {
        self.entity_selector.phase_started(score_director);
    }

    fn step_started<D: ScoreDirector<S>>(&mut self, score_director: &D, _rng: &mut SolverRng) {
        self.entity_selector.step_started(score_director);
    }

    fn step_ended(&mut self) {
        self.entity_selector.step_ended();
    }

    fn phase_ended(&mut self) {
        self.entity_selector.phase_ended();
    }
}
