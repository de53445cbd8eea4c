//! Union move selector combinators.
//!
//! Combines moves from two selectors into a single stream, either
//! sequentially or by picking a random child for every move.

use std::fmt::Debug;
use std::marker::PhantomData;

use phaseforge_core::PlanningSolution;
use phaseforge_scoring::ScoreDirector;
use rand::Rng;

use crate::heuristic::r#move::{EitherMove, Move};
use crate::heuristic::selector::move_selector::MoveSelector;
use crate::scope::{fork_rng, SolverRng};

/// Iterator behind both union selectors.
///
/// Without an RNG it yields all of `first` then all of `second`. With one it
/// draws the child for each move, weighted by the child sizes, and falls back
/// to the other child once one is exhausted.
pub struct UnionIter<A, B> {
    first: A,
    second: B,
    first_done: bool,
    second_done: bool,
    random: Option<(SolverRng, f64)>,
}

impl<T, A, B> Iterator for UnionIter<A, B>
where
    A: Iterator<Item = T>,
    B: Iterator<Item = T>,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        loop {
            let pick_first = match (self.first_done, self.second_done) {
                (true, true) => return None,
                (false, true) => true,
                (true, false) => false,
                (false, false) => match &mut self.random {
                    Some((rng, first_probability)) => rng.random_bool(*first_probability),
                    None => true,
                },
            };
            if pick_first {
                match self.first.next() {
                    Some(m) => return Some(m),
                    None => self.first_done = true,
                }
            } else {
                match self.second.next() {
                    Some(m) => return Some(m),
                    None => self.second_done = true,
                }
            }
        }
    }
}

fn first_probability(first_size: usize, second_size: usize) -> f64 {
    let total = first_size + second_size;
    if total == 0 {
        0.5
    } else {
        first_size as f64 / total as f64
    }
}

/// Combines moves from two selectors into a single stream.
///
/// Yields all moves from the first selector, then all moves from the second,
/// unless random selection is enabled. Both selectors must produce the same
/// move type.
///
/// # Example
///
/// ```
/// use phaseforge_solver::heuristic::selector::decorator::UnionMoveSelector;
/// use phaseforge_solver::heuristic::selector::{ChangeMoveSelector, MoveSelector};
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
/// let low_values = ChangeMoveSelector::<Solution, i32, _, _>::simple(get_priority, set_priority, 0, "priority", vec![1, 2, 3]);
/// let high_values = ChangeMoveSelector::<Solution, i32, _, _>::simple(get_priority, set_priority, 0, "priority", vec![100, 200]);
/// let combined: UnionMoveSelector<Solution, _, _, _> = UnionMoveSelector::new(low_values, high_values);
/// assert!(!combined.is_never_ending());
/// ```
pub struct UnionMoveSelector<S, M, A, B> {
    first: A,
    second: B,
    random_selection: bool,
    _phantom: PhantomData<fn() -> (S, M)>,
}

impl<S, M, A, B> UnionMoveSelector<S, M, A, B> {
    /// Creates a new union selector combining two selectors.
    ///
    /// # Arguments
    /// * `first` - The first selector (yields moves first)
    /// * `second` - The second selector (yields moves after first is exhausted)
    pub fn new(first: A, second: B) -> Self {
        Self {
            first,
            second,
            random_selection: false,
            _phantom: PhantomData,
        }
    }

    /// Draws the child per move instead of chaining.
    pub fn with_random_selection(mut self, random: bool) -> Self {
        self.random_selection = random;
        self
    }
}

impl<S, M, A: Debug, B: Debug> Debug for UnionMoveSelector<S, M, A, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnionMoveSelector")
            .field("first", &self.first)
            .field("second", &self.second)
            .field("random_selection", &self.random_selection)
            .finish()
    }
}

impl<S, M, A, B> MoveSelector<S, M> for UnionMoveSelector<S, M, A, B>
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
    ) -> impl Iterator<Item = M> + 'a {
        let random = self.random_selection.then(|| {
            let p = first_probability(
                self.first.size(score_director),
                self.second.size(score_director),
            );
            (fork_rng(&mut rng), p)
        });
        UnionIter {
            first: self.first.iter_moves(score_director, fork_rng(&mut rng)),
            second: self.second.iter_moves(score_director, fork_rng(&mut rng)),
            first_done: false,
            second_done: false,
            random,
        }
    }

    fn size<D: ScoreDirector<S>>(&self, score_director: &D) -> usize {
        self.first.size(score_director) + self.second.size(score_director)
    }

    fn is_never_ending(&self) -> bool {
        self.first.is_never_ending() || self.second.is_never_ending()
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

/// Union of two selectors with different move types.
///
/// Moves are wrapped in [`EitherMove`] so the phase still sees one concrete
/// move type.
pub struct EitherUnionMoveSelector<S, MA, MB, A, B> {
    first: A,
    second: B,
    random_selection: bool,
    _phantom: PhantomData<fn() -> (S, MA, MB)>,
}

impl<S, MA, MB, A, B> EitherUnionMoveSelector<S, MA, MB, A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self {
            first,
            second,
            random_selection: false,
            _phantom: PhantomData,
        }
    }

    pub fn with_random_selection(mut self, random: bool) -> Self {
        self.random_selection = random;
        self
    }
}

impl<S, MA, MB, A: Debug, B: Debug> Debug for EitherUnionMoveSelector<S, MA, MB, A, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EitherUnionMoveSelector")
            .field("first", &self.first)
            .field("second", &self.second)
            .field("random_selection", &self.random_selection)
            .finish()
    }
}

impl<S, MA, MB, A, B> MoveSelector<S, EitherMove<MA, MB>> for EitherUnionMoveSelector<S, MA, MB, A, B>
where
    S: PlanningSolution,
    MA: Move<S>,
    MB: Move<S>,
    A: MoveSelector<S, MA>,
    B: MoveSelector<S, MB>,
{
    fn iter_moves<'a, D: ScoreDirector<S>>(
        &'a self,
        score_director: &'a D,
        mut rng: SolverRng,
    ) -> impl Iterator<Item = EitherMove<MA, MB>> + 'a {
        let random = self.random_selection.then(|| {
            let p = first_probability(
                self.first.size(score_director),
                self.second.size(score_director),
            );
            (fork_rng(&mut rng), p)
        });
        UnionIter {
            first: self
                .first
                .iter_moves(score_director, fork_rng(&mut rng))
                .map(EitherMove::Left),
            second: self
                .second
                .iter_moves(score_director, fork_rng(&mut rng))
                .map(EitherMove::Right),
            first_done: false,
            second_done: false,
            random,
        }
    }

    fn size<D: ScoreDirector<S>>(&self, score_director: &D) -> usize {
        self.first.size(score_director) + self.second.size(score_director)
    }

    fn is_never_ending(&self) -> bool {
        self.first.is_never_ending() || self.second.is_never_ending()
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
