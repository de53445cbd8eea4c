//! K-opt move for tour optimization.
//!
//! A k-opt move removes k edges from one list and reconnects the pieces.
//! Every reconnection used here is expressible as a sequence of segment
//! reversals: 2-opt is one reversal, the sequential 3-opt variants are two
//! or three. Reversing the same segments in reverse order restores the list.
//!
//! # Example
//!
//! ```
//! use phaseforge_solver::heuristic::r#move::KOptMove;
//! use phaseforge_core::{PlanningSolution, SimpleScore};
//!
//! #[derive(Clone, Debug)]
//! struct Tour { cities: Vec<i32>, score: Option<SimpleScore> }
//!
//! impl PlanningSolution for Tour {
//!     type Score = SimpleScore;
//!     fn score(&self) -> Option<Self::Score> { self.score }
//!     fn set_score(&mut self, score: Option<Self::Score>) { self.score = score; }
//! }
//!
//! fn list_len(s: &Tour, _: usize) -> usize { s.cities.len() }
//! fn list_reverse(s: &mut Tour, _: usize, start: usize, end: usize) {
//!     s.cities[start..end].reverse();
//! }
//!
//! // Reverse cities[1..4): the edges (0,1) and (3,4) are replaced.
//! let m = KOptMove::<Tour, i32>::two_opt(0, 1, 4, list_len, list_reverse, "cities", 0);
//! assert_eq!(m.reversals(), &[(1, 4)]);
//! assert_eq!(m.k(), 2);
//! ```

use std::fmt::Debug;
use std::marker::PhantomData;

use phaseforge_core::{PlanningSolution, Result};
use phaseforge_scoring::ScoreDirector;
use smallvec::SmallVec;

use super::Move;

/// Half-open `[start, end)` segments reversed in order.
pub type Reversals = SmallVec<[(usize, usize); 3]>;

/// A k-opt move over one list variable.
///
/// # Type Parameters
/// * `S` - The planning solution type
/// * `V` - The list element type
pub struct KOptMove<S, V> {
    entity_index: usize,
    reversals: Reversals,
    list_len: fn(&S, usize) -> usize,
    list_reverse: fn(&mut S, usize, usize, usize),
    variable_name: &'static str,
    descriptor_index: usize,
    _phantom: PhantomData<fn() -> V>,
}

impl<S, V> Clone for KOptMove<S, V> {
    fn clone(&self) -> Self {
        Self {
            entity_index: self.entity_index,
            reversals: self.reversals.clone(),
            list_len: self.list_len,
            list_reverse: self.list_reverse,
            variable_name: self.variable_name,
            descriptor_index: self.descriptor_index,
            _phantom: PhantomData,
        }
    }
}

impl<S, V> Debug for KOptMove<S, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KOptMove")
            .field("entity_index", &self.entity_index)
            .field("reversals", &self.reversals.as_slice())
            .field("variable_name", &self.variable_name)
            .finish()
    }
}

impl<S, V> KOptMove<S, V> {
    /// Creates a move that applies `reversals` in order.
    pub fn new(
        entity_index: usize,
        reversals: &[(usize, usize)],
        list_len: fn(&S, usize) -> usize,
        list_reverse: fn(&mut S, usize, usize, usize),
        variable_name: &'static str,
        descriptor_index: usize,
    ) -> Self {
        Self {
            entity_index,
            reversals: SmallVec::from_slice(reversals),
            list_len,
            list_reverse,
            variable_name,
            descriptor_index,
            _phantom: PhantomData,
        }
    }

    /// Creates a 2-opt move reversing `[start, end)`.
    pub fn two_opt(
        entity_index: usize,
        start: usize,
        end: usize,
        list_len: fn(&S, usize) -> usize,
        list_reverse: fn(&mut S, usize, usize, usize),
        variable_name: &'static str,
        descriptor_index: usize,
    ) -> Self {
        Self::new(
            entity_index,
            &[(start, end)],
            list_len,
            list_reverse,
            variable_name,
            descriptor_index,
        )
    }

    pub fn entity_index(&self) -> usize {
        self.entity_index
    }

    pub fn reversals(&self) -> &[(usize, usize)] {
        &self.reversals
    }

    /// Number of edges replaced.
    pub fn k(&self) -> usize {
        self.reversals.len() + 1
    }
}

impl<S, V> Move<S> for KOptMove<S, V>
where
    S: PlanningSolution,
    V: Send + Sync + 'static,
{
    fn is_doable<D: ScoreDirector<S>>(&self, score_director: &D) -> bool {
        if self.reversals.is_empty() {
            return false;
        }
        let len = (self.list_len)(score_director.working_solution(), self.entity_index);
        self.reversals
            .iter()
            .all(|&(start, end)| start + 1 < end && end <= len)
    }

    fn do_move<D: ScoreDirector<S>>(&self, score_director: &mut D) -> Result<Self> {
        score_director.before_variable_changed(
            self.descriptor_index,
            self.entity_index,
            self.variable_name,
        )?;
        let solution = score_director.working_solution_mut();
        for &(start, end) in &self.reversals {
            (self.list_reverse)(solution, self.entity_index, start, end);
        }
        score_director.after_variable_changed(
            self.descriptor_index,
            self.entity_index,
            self.variable_name,
        )?;

        let mut undo = self.clone();
        undo.reversals.reverse();
        Ok(undo)
    }

    fn descriptor_index(&self) -> usize {
        self.descriptor_index
    }

    fn entity_indices(&self) -> &[usize] {
        std::slice::from_ref(&self.entity_index)
    }

    fn variable_name(&self) -> &str {
        self.variable_name
    }
}
