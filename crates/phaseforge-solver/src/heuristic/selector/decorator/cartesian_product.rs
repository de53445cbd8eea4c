//! Cartesian product move selector.
//!
//! Pairs every move of the first child with every move of the second and
//! yields each pair as one [`CompositeMove`]. The second child is iterated
//! again for every move of the first, so a second child built on a mimic
//! replaying selector follows the entity the first child selected.

use std::fmt::Debug;
use std::marker::PhantomData;

use phaseforge_core::PlanningSolution;
use phaseforge_scoring::ScoreDirector;

use crate::heuristic::r#move::{CompositeMove, Move};
use crate::heuristic::selector::iter::per_element_limit;
use crate::heuristic::selector::move_selector::MoveSelector;
use crate::scope::{fork_rng, SolverRng};

pub struct CartesianProductMoveSelector<S, M, A, B> {
    first: A,
    second: B,
    _phantom: PhantomData<fn() -> (S, M)>,
}

impl<S, M, A, B> CartesianProductMoveSelector<S, M, A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self {
            first,
            second,
            _phantom: PhantomData,
        }
    }
}

impl<S, M, A: Debug, B: Debug> Debug for CartesianProductMoveSelector<S, M, A, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartesianProductMoveSelector")
            .field("first", &self.first)
            .field("second", &self.second)
            .finish()
    }
}

impl<S, M, A, B> MoveSelector<S, CompositeMove<S, M>> for CartesianProductMoveSelector<S, M, A, B>
where
    S: PlanningSolution,
    M: Move<S>,
    A: MoveSelector<S, M>,
    B: MoveSelector<S, M>,
{
    fn iter_moves<'a, D: ScoreDirector<S>>(
        &'a self,
        score_director: &'a D,
        mut rng: SolverRng,
    ) -> impl Iterator<Item = CompositeMove<S, M>> + 'a {
        let second = &self.second;
        let per_first = per_element_limit(second.is_never_ending());
        let first_rng = fork_rng(&mut rng);
        self.first
            .iter_moves(score_director, first_rng)
            .flat_map(move |a| {
                second
                    .iter_moves(score_director, fork_rng(&mut rng))
                    .take(per_first)
                    .map(move |b| CompositeMove::new(vec![a.clone(), b]))
            })
    }

    fn size<D: ScoreDirector<S>>(&self, score_director: &D) -> usize {
        self.first
            .size(score_director)
            .saturating_mul(self.second.size(score_director))
    }

    fn is_never_ending(&self) -> bool {
        self.first.is_never_ending()
    }

    fn phase_started<D: ScoreDirector<S>>(&mut self, score_director: &D, rng: &mut SolverRng) {
        self.first.phase_started(score_director, rng);
        self.second.phase_started(score_director, rng);
    }

    fn step_started<D: ScoreDirector<S>>(&mut self, score_director: &D, rng: &mut SolverRng) {
        self.first.step_started(score_director, rng);
        self.second.step_started(score_director, rng);
    }

    fn step_ended(&mut self) {
        self.first.step_ended();
        self.second.step_ended();
    }

    fn phase_ended(&mut self) {
        self.first.phase_ended();
        self.second.phase_ended();
    }
}
