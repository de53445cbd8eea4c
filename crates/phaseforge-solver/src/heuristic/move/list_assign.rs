//! ListAssignMove - puts an unassigned element into a list variable.

use std::fmt::Debug;

use phaseforge_core::{PhaseForgeError, PlanningSolution, Result};
use phaseforge_scoring::ScoreDirector;

use super::Move;

/// A move that inserts `value` at `position` of one entity's list.
///
/// The undo move takes the element at `position` back out, leaving it
/// unassigned. A move without a value is such an undo.
///
/// # Type Parameters
/// * `S` - The planning solution type
/// * `V` - The list element type
pub struct ListAssignMove<S, V> {
    value: Option<V>,
    entities: [usize; 1],
    position: usize,
    list_len: fn(&S, usize) -> usize,
    list_remove: fn(&mut S, usize, usize) -> Option<V>,
    list_insert: fn(&mut S, usize, usize, V),
    variable_name: &'static str,
    descriptor_index: usize,
}

impl<S, V: Clone> Clone for ListAssignMove<S, V> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            ..*self
        }
    }
}

impl<S, V: Debug> Debug for ListAssignMove<S, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListAssignMove")
            .field("value", &self.value)
            .field("entity", &self.entities[0])
            .field("position", &self.position)
            .field("variable_name", &self.variable_name)
            .finish()
    }
}

impl<S, V> ListAssignMove<S, V> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        value: V,
        entity_index: usize,
        position: usize,
        list_len: fn(&S, usize) -> usize,
        list_remove: fn(&mut S, usize, usize) -> Option<V>,
        list_insert: fn(&mut S, usize, usize, V),
        variable_name: &'static str,
        descriptor_index: usize,
    ) -> Self {
        Self {
            value: Some(value),
            entities: [entity_index],
            position,
            list_len,
            list_remove,
            list_insert,
            variable_name,
            descriptor_index,
        }
    }

    /// The element this move inserts; `None` for an undo move.
    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    pub fn entity_index(&self) -> usize {
        self.entities[0]
    }

    pub fn position(&self) -> usize {
        self.position
    }
}

impl<S, V> Move<S> for ListAssignMove<S, V>
where
    S: PlanningSolution,
    V: Clone + PartialEq + Send + Sync + Debug + 'static,
{
    fn is_doable<D: ScoreDirector<S>>(&self, score_director: &D) -> bool {
        let len = (self.list_len)(score_director.working_solution(), self.entities[0]);
        match self.value {
            Some(_) => self.position <= len,
            None => self.position < len,
        }
    }

    fn do_move<D: ScoreDirector<S>>(&self, score_director: &mut D) -> Result<Self> {
        let entity = self.entities[0];
        score_director.before_variable_changed(self.descriptor_index, entity, self.variable_name)?;
        let solution = score_director.working_solution_mut();
        let undo_value = match &self.value {
            Some(value) => {
                (self.list_insert)(solution, entity, self.position, value.clone());
                None
            }
            None => {
                let removed = (self.list_remove)(solution, entity, self.position).ok_or_else(|| {
                    PhaseForgeError::InvalidState(format!(
                        "list {} of entity {} has no element at position {}",
                        self.variable_name, entity, self.position
                    ))
                })?;
                Some(removed)
            }
        };
        score_director.after_variable_changed(self.descriptor_index, entity, self.variable_name)?;

        Ok(Self {
            value: undo_value,
            ..*self
        })
    }

    fn descriptor_index(&self) -> usize {
        self.descriptor_index
    }

    fn entity_indices(&self) -> &[usize] {
        &self.entities
    }

    fn variable_name(&self) -> &str {
        self.variable_name
    }
}
