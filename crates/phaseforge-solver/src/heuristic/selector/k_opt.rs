//! K-opt move selector for tour-style list variables.
//!
//! `k = 2` yields every segment reversal of length at least two.
//! `k = 3` additionally yields pairs of adjacent reversals, which together
//! reconnect three edges.

use std::fmt::Debug;
use std::marker::PhantomData;

use phaseforge_core::{PhaseForgeError, PlanningSolution, Result};
use phaseforge_scoring::ScoreDirector;

use super::entity::EntitySelector;
use super::move_selector::MoveSelector;
use crate::heuristic::r#move::KOptMove;
use crate::scope::SolverRng;

pub struct KOptMoveSelector<S, V, ES> {
    entity_selector: ES,
    k: usize,
    list_len: fn(&S, usize) -> usize,
    list_reverse: fn(&mut S, usize, usize, usize),
    variable_name: &'static str,
    descriptor_index: usize,
    _phantom: PhantomData<fn() -> V>,
}

impl<S, V, ES: Debug> Debug for KOptMoveSelector<S, V, ES> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KOptMoveSelector")
            .field("entity_selector", &self.entity_selector)
            .field("k", &self.k)
            .field("variable_name", &self.variable_name)
            .finish()
    }
}

impl<S, V, ES> KOptMoveSelector<S, V, ES> {
    /// Creates a selector for `k`-opt moves.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error unless `k` is 2 or 3.
    pub fn new(
        entity_selector: ES,
        k: usize,
        list_len: fn(&S, usize) -> usize,
        list_reverse: fn(&mut S, usize, usize, usize),
        variable_name: &'static str,
        descriptor_index: usize,
    ) -> Result<Self> {
        if !(2..=3).contains(&k) {
            return Err(PhaseForgeError::Config(format!(
                "k-opt move selector: k must be 2 or 3, got {k}"
            )));
        }
        Ok(Self {
            entity_selector,
            k,
            list_len,
            list_reverse,
            variable_name,
            descriptor_index,
            _phantom: PhantomData,
        })
    }

    pub fn k(&self) -> usize {
        self.k
    }
}

/// Reversal sets for one list of length `len`.
fn reversals(len: usize, k: usize) -> Vec<Vec<(usize, usize)>> {
    let mut out = Vec::new();
    for start in 0..len {
        for end in start + 2..=len {
            out.push(vec![(start, end)]);
        }
    }
    if k >= 3 {
        for a in 0..len {
            for b in a + 2..=len {
                for c in b + 2..=len {
                    out.push(vec![(a, b), (b, c)]);
                }
            }
        }
    }
    out
}

impl<S, V, ES> MoveSelector<S, KOptMove<S, V>> for KOptMoveSelector<S, V, ES>
where
    S: PlanningSolution,
    V: Send + Sync + 'static,
    ES: EntitySelector<S>,
{
    fn iter_moves<'a, D: ScoreDirector<S>>(
        &'a self,
        score_director: &'a D,
        rng: SolverRng,
    ) -> impl Iterator<Item = KOptMove<S, V>> + 'a {
        let solution = score_director.working_solution();
        let limit = self.entity_selector.size(score_director);
        let k = self.k;
        self.entity_selector
            .iter(score_director, rng)
            .take(limit)
            .flat_map(move |entity| {
                let len = (self.list_len)(solution, entity.entity_index);
                reversals(len, k).into_iter().map(move |segments| {
                    KOptMove::new(
                        entity.entity_index,
                        &segments,
                        self.list_len,
                        self.list_reverse,
                        self.variable_name,
                        self.descriptor_index,
                    )
                })
            })
    }

    fn size<D: ScoreDirector<S>>(&self, score_director: &D) -> usize {
        let solution = score_director.working_solution();
        let count = score_director
            .entity_count(self.descriptor_index)
            .unwrap_or(0);
        (0..count)
            .map(|e| reversals((self.list_len)(solution, e), self.k).len())
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
