//! Registration state of entities and problem facts.

use phaseforge_core::{FactHandle, PhaseForgeError, Result, SolutionDescriptor};

/// Tracks which fact handles the score director knows about.
///
/// Collections are index-addressed, so a collection is registered as a
/// contiguous prefix `0..count`. Adding must append exactly at `count`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FactRegistry {
    entity_counts: Vec<usize>,
    fact_counts: Vec<usize>,
}

impl FactRegistry {
    /// Registers every entity and fact currently in `solution`.
    pub fn from_solution<S>(descriptor: &SolutionDescriptor<S>, solution: &S) -> Self {
        Self {
            entity_counts: descriptor
                .entity_descriptors
                .iter()
                .map(|d| d.entity_count(solution))
                .collect(),
            fact_counts: descriptor
                .problem_fact_descriptors
                .iter()
                .map(|d| d.fact_count(solution))
                .collect(),
        }
    }

    fn counts(&self, handle: FactHandle) -> Option<usize> {
        match handle {
            FactHandle::Entity {
                descriptor_index, ..
            } => self.entity_counts.get(descriptor_index).copied(),
            FactHandle::ProblemFact {
                descriptor_index, ..
            } => self.fact_counts.get(descriptor_index).copied(),
        }
    }

    fn counts_mut(&mut self, handle: FactHandle) -> Option<&mut usize> {
        match handle {
            FactHandle::Entity {
                descriptor_index, ..
            } => self.entity_counts.get_mut(descriptor_index),
            FactHandle::ProblemFact {
                descriptor_index, ..
            } => self.fact_counts.get_mut(descriptor_index),
        }
    }

    pub fn is_registered(&self, handle: FactHandle) -> bool {
        self.counts(handle).is_some_and(|count| handle.index() < count)
    }

    /// Fails with `UnregisteredFact` unless `handle` is registered.
    pub fn check(&self, handle: FactHandle, variable_name: &str) -> Result<()> {
        if self.is_registered(handle) {
            Ok(())
        } else {
            Err(PhaseForgeError::UnregisteredFact {
                handle,
                variable: variable_name.to_string(),
            })
        }
    }

    /// Registers a newly appended entity or fact.
    pub fn register(&mut self, handle: FactHandle) -> Result<()> {
        let count = self.counts_mut(handle).ok_or_else(|| {
            PhaseForgeError::InvalidState(format!("{} has no known collection", handle))
        })?;
        let index = handle.index();
        if index < *count {
            return Err(PhaseForgeError::DuplicateFact { handle });
        }
        if index > *count {
            return Err(PhaseForgeError::InvalidState(format!(
                "{} is not contiguous: collection holds {} registered items",
                handle, *count
            )));
        }
        *count += 1;
        Ok(())
    }

    /// Unregisters a removed entity or fact.
    ///
    /// Returns true if it was the last of its collection, i.e. no other
    /// index shifted.
    pub fn unregister(&mut self, handle: FactHandle) -> Result<bool> {
        self.check(handle, "")?;
        let count = self.counts_mut(handle).ok_or_else(|| {
            PhaseForgeError::InvalidState(format!("{} has no known collection", handle))
        })?;
        *count -= 1;
        Ok(handle.index() == *count)
    }

    pub fn entity_count(&self, descriptor_index: usize) -> Option<usize> {
        self.entity_counts.get(descriptor_index).copied()
    }

    pub fn fact_count(&self, descriptor_index: usize) -> Option<usize> {
        self.fact_counts.get(descriptor_index).copied()
    }
}
