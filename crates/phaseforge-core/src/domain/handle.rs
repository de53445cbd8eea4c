//! Index-based identities for entities and problem facts.

use std::fmt;

/// Identifies an entity or problem fact inside the working solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FactHandle {
    Entity {
        descriptor_index: usize,
        entity_index: usize,
    },
    ProblemFact {
        descriptor_index: usize,
        fact_index: usize,
    },
}

impl FactHandle {
    pub fn entity(descriptor_index: usize, entity_index: usize) -> Self {
        FactHandle::Entity {
            descriptor_index,
            entity_index,
        }
    }

    pub fn problem_fact(descriptor_index: usize, fact_index: usize) -> Self {
        FactHandle::ProblemFact {
            descriptor_index,
            fact_index,
        }
    }

    pub fn descriptor_index(&self) -> usize {
        match *self {
            FactHandle::Entity {
                descriptor_index, ..
            }
            | FactHandle::ProblemFact {
                descriptor_index, ..
            } => descriptor_index,
        }
    }

    /// Index of the entity or fact within its collection.
    pub fn index(&self) -> usize {
        match *self {
            FactHandle::Entity { entity_index, .. } => entity_index,
            FactHandle::ProblemFact { fact_index, .. } => fact_index,
        }
    }

    pub fn is_entity(&self) -> bool {
        matches!(self, FactHandle::Entity { .. })
    }
}

impl fmt::Display for FactHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactHandle::Entity {
                descriptor_index,
                entity_index,
            } => write!(f, "entity[{}#{}]", descriptor_index, entity_index),
            FactHandle::ProblemFact {
                descriptor_index,
                fact_index,
            } => write!(f, "fact[{}#{}]", descriptor_index, fact_index),
        }
    }
}
