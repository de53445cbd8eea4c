//! ListSwapMove - swaps two elements of list variables.

use std::fmt::Debug;

use phaseforge_core::{PhaseForgeError, PlanningSolution, Result};
use phaseforge_scoring::ScoreDirector;

use super::Move;

/// A move that swaps the elements at two list positions, in the same list
/// or in two different lists. The move is its own undo.
pub struct ListSwapMove<S, V> {
    entities: [usize; 2],
    positions: [usize; 2],
    list_len: fn(&S, usize) -> usize,
    list_get: fn(&S, usize, usize) -> Option<V>,
    list_set: fn(&mut S, usize, usize, V),
    variable_name: &'static str,
    descriptor_index: usize,
}

impl<S, V> Clone for ListSwapMove<S, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, V> Copy for ListSwapMove<S, V> {}

impl<S, V> Debug for ListSwapMove<S, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListSwapMove")
            .field("first_entity", &self.entities[0])
            .field("first_position", &self.positions[0])
            .field("second_entity", &self.entities[1])
            .field("second_position", &self.positions[1])
            .field("variable_name", &self.variable_name)
            .finish()
    }
}

impl<S, V> ListSwapMove<S, V> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        first_entity_index: usize,
        first_position: usize,
        second_entity_index: usize,
        second_position: usize,
        list_len: fn(&S, usize) -> usize,
        list_get: fn(&S, usize, usize) -> Option<V>,
        list_set: fn(&mut S, usize, usize, V),
        variable_name: &'static str,
        descriptor_index: usize,
    ) -> Self {
        Self {
            entities: [first_entity_index, second_entity_index],
            positions: [first_position, second_position],
            list_len,
            list_get,
            list_set,
            variable_name,
            descriptor_index,
        }
    }

    pub fn is_intra_list(&self) -> bool {
        self.entities[0] == self.entities[1]
    }
}

impl<S, V> Move<S> for ListSwapMove<S, V>
where
    S: PlanningSolution,
    V: Clone + PartialEq + Send + Sync + Debug + 'static,
{
    fn is_doable<D: ScoreDirector<S>>(&self, score_director: &D) -> bool {
        if self.is_intra_list() && self.positions[0] == self.positions[1] {
            return false;
        }
        let solution = score_director.working_solution();
        let first = (self.list_get)(solution, self.entities[0], self.positions[0]);
        let second = (self.list_get)(solution, self.entities[1], self.positions[1]);
        match (first, second) {
            (Some(a), Some(b)) => a != b,
            _ => false,
        }
    }

    fn do_move<D: ScoreDirector<S>>(&self, score_director: &mut D) -> Result<Self> {
        let [e1, e2] = self.entities;
        let [p1, p2] = self.positions;
        let solution = score_director.working_solution();
        let missing = |entity: usize, position: usize| {
            PhaseForgeError::InvalidState(format!(
                "list {} of entity {} has no element at position {} (len {})",
                self.variable_name,
                entity,
                position,
                (self.list_len)(solution, entity)
            ))
        };
        let first = (self.list_get)(solution, e1, p1).ok_or_else(|| missing(e1, p1))?;
        let second = (self.list_get)(solution, e2, p2).ok_or_else(|| missing(e2, p2))?;

        score_director.before_variable_changed(self.descriptor_index, e1, self.variable_name)?;
        if !self.is_intra_list() {
            score_director.before_variable_changed(self.descriptor_index, e2, self.variable_name)?;
        }

        let solution = score_director.working_solution_mut();
        (self.list_set)(solution, e1, p1, second);
        (self.list_set)(solution, e2, p2, first);

        score_director.after_variable_changed(self.descriptor_index, e1, self.variable_name)?;
        if !self.is_intra_list() {
            score_director.after_variable_changed(self.descriptor_index, e2, self.variable_name)?;
        }

        Ok(*self)
    }

    fn descriptor_index(&self) -> usize {
        self.descriptor_index
    }

    fn entity_indices(&self) -> &[usize] {
        if self.is_intra_list() {
            &self.entities[..1]
        } else {
            &self.entities
        }
    }

    fn variable_name(&self) -> &str {
        self.variable_name
    }
}
