//! Incremental single-entity score calculator.
//!
//! All closure types are concrete generics, fully monomorphized.

use std::fmt::{self, Debug};
use std::marker::PhantomData;

use phaseforge_core::{FactHandle, PlanningSolution, Score};

use super::ScoreCalculator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Impact {
    Penalty,
    Reward,
}

/// Maintains a running total of per-entity contributions.
///
/// Each entity of one collection that passes `filter` contributes
/// `weight(entity)`, negated for penalties. A variable change retracts the
/// entity's contribution in `before_update` and adds the new one in
/// `update`, so a step costs O(1) regardless of problem size.
///
/// `filter` and `weight` may only read the entity itself.
pub struct IncrementalUniCalculator<S, A, E, F, W, Sc> {
    name: &'static str,
    descriptor_index: usize,
    impact: Impact,
    extractor: E,
    filter: F,
    weight: W,
    score: Sc,
    _phantom: PhantomData<fn() -> (S, A)>,
}

impl<S, A, E, F, W, Sc> IncrementalUniCalculator<S, A, E, F, W, Sc>
where
    E: Fn(&S) -> &[A] + Send + Sync,
    F: Fn(&A) -> bool + Send + Sync,
    W: Fn(&A) -> Sc + Send + Sync,
    Sc: Score,
{
    /// Penalizes every matching entity of collection `descriptor_index`.
    pub fn penalize(
        name: &'static str,
        descriptor_index: usize,
        extractor: E,
        filter: F,
        weight: W,
    ) -> Self {
        Self::with_impact(name, descriptor_index, Impact::Penalty, extractor, filter, weight)
    }

    /// Rewards every matching entity of collection `descriptor_index`.
    pub fn reward(
        name: &'static str,
        descriptor_index: usize,
        extractor: E,
        filter: F,
        weight: W,
    ) -> Self {
        Self::with_impact(name, descriptor_index, Impact::Reward, extractor, filter, weight)
    }

    fn with_impact(
        name: &'static str,
        descriptor_index: usize,
        impact: Impact,
        extractor: E,
        filter: F,
        weight: W,
    ) -> Self {
        Self {
            name,
            descriptor_index,
            impact,
            extractor,
            filter,
            weight,
            score: Sc::zero(),
            _phantom: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    fn contribution(&self, solution: &S, entity_index: usize) -> Sc {
        let Some(entity) = (self.extractor)(solution).get(entity_index) else {
            return Sc::zero();
        };
        if !(self.filter)(entity) {
            return Sc::zero();
        }
        let base = (self.weight)(entity);
        match self.impact {
            Impact::Penalty => -base,
            Impact::Reward => base,
        }
    }

    #[inline]
    fn own_entity(&self, handle: FactHandle) -> Option<usize> {
        match handle {
            FactHandle::Entity {
                descriptor_index,
                entity_index,
            } if descriptor_index == self.descriptor_index => Some(entity_index),
            _ => None,
        }
    }
}

impl<S, A, E, F, W, Sc> ScoreCalculator<S> for IncrementalUniCalculator<S, A, E, F, W, Sc>
where
    S: PlanningSolution<Score = Sc>,
    A: Send + Sync,
    E: Fn(&S) -> &[A] + Send + Sync,
    F: Fn(&A) -> bool + Send + Sync,
    W: Fn(&A) -> Sc + Send + Sync,
    Sc: Score,
{
    fn reset_working_memory(&mut self, solution: &S) {
        let count = (self.extractor)(solution).len();
        self.score = (0..count).fold(Sc::zero(), |total, i| {
            total + self.contribution(solution, i)
        });
    }

    fn insert(&mut self, solution: &S, handle: FactHandle) {
        if let Some(i) = self.own_entity(handle) {
            self.score = self.score + self.contribution(solution, i);
        }
    }

    fn before_update(&mut self, solution: &S, handle: FactHandle, _variable_name: &str) {
        if let Some(i) = self.own_entity(handle) {
            self.score = self.score - self.contribution(solution, i);
        }
    }

    fn update(&mut self, solution: &S, handle: FactHandle, _variable_name: &str) {
        if let Some(i) = self.own_entity(handle) {
            self.score = self.score + self.contribution(solution, i);
        }
    }

    fn delete(&mut self, solution: &S, handle: FactHandle) {
        if let Some(i) = self.own_entity(handle) {
            self.score = self.score - self.contribution(solution, i);
        }
    }

    fn calculate_score(&mut self, _solution: &S) -> S::Score {
        self.score
    }
}

impl<S, A, E: Clone, F: Clone, W: Clone, Sc: Clone> Clone
    for IncrementalUniCalculator<S, A, E, F, W, Sc>
{
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            descriptor_index: self.descriptor_index,
            impact: self.impact,
            extractor: self.extractor.clone(),
            filter: self.filter.clone(),
            weight: self.weight.clone(),
            score: self.score.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<S, A, E, F, W, Sc: Debug> Debug for IncrementalUniCalculator<S, A, E, F, W, Sc> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IncrementalUniCalculator")
            .field("name", &self.name)
            .field("descriptor_index", &self.descriptor_index)
            .field("impact", &self.impact)
            .field("score", &self.score)
            .finish()
    }
}
