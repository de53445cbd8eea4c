//! SwapMove - exchanges values between two entities.
//!
//! A swap is its own inverse.

use std::fmt::Debug;

use phaseforge_core::{PlanningSolution, Result};
use phaseforge_scoring::ScoreDirector;

use super::Move;

/// A move that swaps one variable's values between two entities.
///
/// # Type Parameters
/// * `S` - The planning solution type
/// * `V` - The variable value type
pub struct SwapMove<S, V> {
    indices: [usize; 2],
    getter: fn(&S, usize) -> Option<V>,
    setter: fn(&mut S, usize, Option<V>),
    variable_name: &'static str,
    descriptor_index: usize,
}

impl<S, V> Clone for SwapMove<S, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, V> Copy for SwapMove<S, V> {}

impl<S, V> Debug for SwapMove<S, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwapMove")
            .field("left_entity_index", &self.indices[0])
            .field("right_entity_index", &self.indices[1])
            .field("descriptor_index", &self.descriptor_index)
            .field("variable_name", &self.variable_name)
            .finish()
    }
}

impl<S, V> SwapMove<S, V> {
    pub fn new(
        left_entity_index: usize,
        right_entity_index: usize,
        getter: fn(&S, usize) -> Option<V>,
        setter: fn(&mut S, usize, Option<V>),
        variable_name: &'static str,
        descriptor_index: usize,
    ) -> Self {
        Self {
            indices: [left_entity_index, right_entity_index],
            getter,
            setter,
            variable_name,
            descriptor_index,
        }
    }

    pub fn left_entity_index(&self) -> usize {
        self.indices[0]
    }

    pub fn right_entity_index(&self) -> usize {
        self.indices[1]
    }
}

impl<S, V> Move<S> for SwapMove<S, V>
where
    S: PlanningSolution,
    V: Clone + PartialEq + Send + Sync + Debug + 'static,
{
    fn is_doable<D: ScoreDirector<S>>(&self, score_director: &D) -> bool {
        let [left, right] = self.indices;
        if left == right {
            return false;
        }
        let solution = score_director.working_solution();
        (self.getter)(solution, left) != (self.getter)(solution, right)
    }

    fn do_move<D: ScoreDirector<S>>(&self, score_director: &mut D) -> Result<Self> {
        let [left, right] = self.indices;
        let left_value = (self.getter)(score_director.working_solution(), left);
        let right_value = (self.getter)(score_director.working_solution(), right);

        score_director.before_variable_changed(self.descriptor_index, left, self.variable_name)?;
        score_director.before_variable_changed(self.descriptor_index, right, self.variable_name)?;

        let solution = score_director.working_solution_mut();
        (self.setter)(solution, left, right_value);
        (self.setter)(solution, right, left_value);

        score_director.after_variable_changed(self.descriptor_index, left, self.variable_name)?;
        score_director.after_variable_changed(self.descriptor_index, right, self.variable_name)?;

        Ok(*self)
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
