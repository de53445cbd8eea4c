//! ListChangeMove - relocates an element within or between list variables.

use std::fmt::Debug;

use phaseforge_core::{PhaseForgeError, PlanningSolution, Result};
use phaseforge_scoring::ScoreDirector;

use super::Move;

/// A move that removes the element at `source_position` of one list and
/// inserts it at `dest_position` of another (or the same) list.
///
/// `dest_position` is interpreted after the removal, so the undo move is
/// simply the same relocation with source and destination exchanged.
///
/// # Type Parameters
/// * `S` - The planning solution type
/// * `V` - The list element type
pub struct ListChangeMove<S, V> {
    entities: [usize; 2],
    source_position: usize,
    dest_position: usize,
    list_len: fn(&S, usize) -> usize,
    list_remove: fn(&mut S, usize, usize) -> Option<V>,
    list_insert: fn(&mut S, usize, usize, V),
    variable_name: &'static str,
    descriptor_index: usize,
}

impl<S, V> Clone for ListChangeMove<S, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, V> Copy for ListChangeMove<S, V> {}

impl<S, V> Debug for ListChangeMove<S, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListChangeMove")
            .field("source_entity", &self.entities[0])
            .field("source_position", &self.source_position)
            .field("dest_entity", &self.entities[1])
            .field("dest_position", &self.dest_position)
            .field("variable_name", &self.variable_name)
            .finish()
    }
}

impl<S, V> ListChangeMove<S, V> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        source_entity_index: usize,
        source_position: usize,
        dest_entity_index: usize,
        dest_position: usize,
        list_len: fn(&S, usize) -> usize,
        list_remove: fn(&mut S, usize, usize) -> Option<V>,
        list_insert: fn(&mut S, usize, usize, V),
        variable_name: &'static str,
        descriptor_index: usize,
    ) -> Self {
        Self {
            entities: [source_entity_index, dest_entity_index],
            source_position,
            dest_position,
            list_len,
            list_remove,
            list_insert,
            variable_name,
            descriptor_index,
        }
    }

    pub fn source_entity_index(&self) -> usize {
        self.entities[0]
    }

    pub fn source_position(&self) -> usize {
        self.source_position
    }

    pub fn dest_entity_index(&self) -> usize {
        self.entities[1]
    }

    pub fn dest_position(&self) -> usize {
        self.dest_position
    }

    pub fn is_intra_list(&self) -> bool {
        self.entities[0] == self.entities[1]
    }
}

impl<S, V> Move<S> for ListChangeMove<S, V>
where
    S: PlanningSolution,
    V: Clone + PartialEq + Send + Sync + Debug + 'static,
{
    fn is_doable<D: ScoreDirector<S>>(&self, score_director: &D) -> bool {
        let solution = score_director.working_solution();
        let source_len = (self.list_len)(solution, self.entities[0]);
        if self.source_position >= source_len {
            return false;
        }
        if self.is_intra_list() {
            // One element leaves before it is reinserted.
            self.source_position != self.dest_position && self.dest_position < source_len
        } else {
            self.dest_position <= (self.list_len)(solution, self.entities[1])
        }
    }

    fn do_move<D: ScoreDirector<S>>(&self, score_director: &mut D) -> Result<Self> {
        let [source, dest] = self.entities;

        score_director.before_variable_changed(self.descriptor_index, source, self.variable_name)?;
        if !self.is_intra_list() {
            score_director.before_variable_changed(self.descriptor_index, dest, self.variable_name)?;
        }

        let solution = score_director.working_solution_mut();
        let element = (self.list_remove)(solution, source, self.source_position).ok_or_else(|| {
            PhaseForgeError::InvalidState(format!(
                "list {} of entity {} has no element at position {}",
                self.variable_name, source, self.source_position
            ))
        })?;
        (self.list_insert)(solution, dest, self.dest_position, element);

        score_director.after_variable_changed(self.descriptor_index, source, self.variable_name)?;
        if !self.is_intra_list() {
            score_director.after_variable_changed(self.descriptor_index, dest, self.variable_name)?;
        }

        Ok(Self {
            entities: [dest, source],
            source_position: self.dest_position,
            dest_position: self.source_position,
            ..*self
        })
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
