//! PillarSwapMove - exchanges values between two pillars.

use std::fmt::Debug;

use phaseforge_core::{PlanningSolution, Result};
use phaseforge_scoring::ScoreDirector;

use super::Move;

/// A move that swaps the shared values of two pillars.
///
/// Both pillars are stored in one vector: the first `left_count` indices
/// form the left pillar, the rest the right pillar. The move is its own undo.
pub struct PillarSwapMove<S, V> {
    indices: Vec<usize>,
    left_count: usize,
    getter: fn(&S, usize) -> Option<V>,
    setter: fn(&mut S, usize, Option<V>),
    variable_name: &'static str,
    descriptor_index: usize,
}

impl<S, V> Clone for PillarSwapMove<S, V> {
    fn clone(&self) -> Self {
        Self {
            indices: self.indices.clone(),
            left_count: self.left_count,
            getter: self.getter,
            setter: self.setter,
            variable_name: self.variable_name,
            descriptor_index: self.descriptor_index,
        }
    }
}

impl<S, V> Debug for PillarSwapMove<S, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PillarSwapMove")
            .field("left_indices", &self.left_indices())
            .field("right_indices", &self.right_indices())
            .field("descriptor_index", &self.descriptor_index)
            .field("variable_name", &self.variable_name)
            .finish()
    }
}

impl<S, V> PillarSwapMove<S, V> {
    pub fn new(
        left_indices: Vec<usize>,
        right_indices: Vec<usize>,
        getter: fn(&S, usize) -> Option<V>,
        setter: fn(&mut S, usize, Option<V>),
        variable_name: &'static str,
        descriptor_index: usize,
    ) -> Self {
        let left_count = left_indices.len();
        let mut indices = left_indices;
        indices.extend(right_indices);
        Self {
            indices,
            left_count,
            getter,
            setter,
            variable_name,
            descriptor_index,
        }
    }

    pub fn left_indices(&self) -> &[usize] {
        &self.indices[..self.left_count]
    }

    pub fn right_indices(&self) -> &[usize] {
        &self.indices[self.left_count..]
    }
}

impl<S, V> Move<S> for PillarSwapMove<S, V>
where
    S: PlanningSolution,
    V: Clone + PartialEq + Send + Sync + Debug + 'static,
{
    fn is_doable<D: ScoreDirector<S>>(&self, score_director: &D) -> bool {
        let (Some(&left), Some(&right)) =
            (self.left_indices().first(), self.right_indices().first())
        else {
            return false;
        };
        let solution = score_director.working_solution();
        (self.getter)(solution, left) != (self.getter)(solution, right)
    }

    fn do_move<D: ScoreDirector<S>>(&self, score_director: &mut D) -> Result<Self> {
        let solution = score_director.working_solution();
        let left_value = self
            .left_indices()
            .first()
            .and_then(|&idx| (self.getter)(solution, idx));
        let right_value = self
            .right_indices()
            .first()
            .and_then(|&idx| (self.getter)(solution, idx));

        for &idx in &self.indices {
            score_director.before_variable_changed(self.descriptor_index, idx, self.variable_name)?;
        }
        let solution = score_director.working_solution_mut();
        for &idx in self.left_indices() {
            (self.setter)(solution, idx, right_value.clone());
        }
        for &idx in self.right_indices() {
            (self.setter)(solution, idx, left_value.clone());
        }
        for &idx in &self.indices {
            score_director.after_variable_changed(self.descriptor_index, idx, self.variable_name)?;
        }

        Ok(self.clone())
    }

    fn descriptor_index(&self) -> usize {
        self.descriptor_index
    }

    fn entity_indices(&self) -> &[usize] {
        &self.indices
    }

    fn variable_name(&self) -> &str {
        self.variable_name
    }
}
