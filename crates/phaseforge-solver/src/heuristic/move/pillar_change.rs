//! PillarChangeMove - assigns a value to every entity of a pillar.
//!
//! A pillar is a group of entities that share the same planning value.
//! Changing them together keeps the pillar intact.

use std::fmt::Debug;

use phaseforge_core::{PlanningSolution, Result};
use phaseforge_scoring::ScoreDirector;

use super::Move;

/// A move that assigns the same value to all entities in a pillar.
///
/// The undo move restores the value the first entity held before the
/// change; pillars share a value, so that value belongs to all of them.
pub struct PillarChangeMove<S, V> {
    entity_indices: Vec<usize>,
    to_value: Option<V>,
    getter: fn(&S, usize) -> Option<V>,
    setter: fn(&mut S, usize, Option<V>),
    variable_name: &'static str,
    descriptor_index: usize,
}

impl<S, V: Clone> Clone for PillarChangeMove<S, V> {
    fn clone(&self) -> Self {
        Self {
            entity_indices: self.entity_indices.clone(),
            to_value: self.to_value.clone(),
            getter: self.getter,
            setter: self.setter,
            variable_name: self.variable_name,
            descriptor_index: self.descriptor_index,
        }
    }
}

impl<S, V: Debug> Debug for PillarChangeMove<S, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PillarChangeMove")
            .field("entity_indices", &self.entity_indices)
            .field("descriptor_index", &self.descriptor_index)
            .field("variable_name", &self.variable_name)
            .field("to_value", &self.to_value)
            .finish()
    }
}

impl<S, V> PillarChangeMove<S, V> {
    pub fn new(
        entity_indices: Vec<usize>,
        to_value: Option<V>,
        getter: fn(&S, usize) -> Option<V>,
        setter: fn(&mut S, usize, Option<V>),
        variable_name: &'static str,
        descriptor_index: usize,
    ) -> Self {
        Self {
            entity_indices,
            to_value,
            getter,
            setter,
            variable_name,
            descriptor_index,
        }
    }

    pub fn pillar_size(&self) -> usize {
        self.entity_indices.len()
    }

    pub fn to_value(&self) -> Option<&V> {
        self.to_value.as_ref()
    }
}

impl<S, V> Move<S> for PillarChangeMove<S, V>
where
    S: PlanningSolution,
    V: Clone + PartialEq + Send + Sync + Debug + 'static,
{
    fn is_doable<D: ScoreDirector<S>>(&self, score_director: &D) -> bool {
        match self.entity_indices.first() {
            Some(&first) => {
                (self.getter)(score_director.working_solution(), first) != self.to_value
            }
            None => false,
        }
    }

    fn do_move<D: ScoreDirector<S>>(&self, score_director: &mut D) -> Result<Self> {
        let old_value = self
            .entity_indices
            .first()
            .and_then(|&first| (self.getter)(score_director.working_solution(), first));

        for &idx in &self.entity_indices {
            score_director.before_variable_changed(self.descriptor_index, idx, self.variable_name)?;
        }
        for &idx in &self.entity_indices {
            (self.setter)(
                score_director.working_solution_mut(),
                idx,
                self.to_value.clone(),
            );
        }
        for &idx in &self.entity_indices {
            score_director.after_variable_changed(self.descriptor_index, idx, self.variable_name)?;
        }

        Ok(Self {
            to_value: old_value,
            ..self.clone()
        })
    }

    fn descriptor_index(&self) -> usize {
        self.descriptor_index
    }

    fn entity_indices(&self) -> &[usize] {
        &self.entity_indices
    }

    fn variable_name(&self) -> &str {
        self.variable_name
    }
}
