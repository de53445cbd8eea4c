//! Runtime descriptors of a planning solution.
//!
//! Descriptors are built once per problem type from plain function
//! pointers, so they are `Copy`-cheap to clone and safe to share between
//! worker threads.

use std::fmt;

/// Whether a genuine variable holds one value or an ordered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableKind {
    Basic,
    List,
}

/// A genuine planning variable: chosen by moves, never derived.
pub struct GenuineVariableDescriptor<S> {
    name: &'static str,
    kind: VariableKind,
    is_initialized: fn(&S, usize) -> bool,
}

impl<S> GenuineVariableDescriptor<S> {
    /// A single-valued variable, initialized when `is_initialized` says so.
    pub fn basic(name: &'static str, is_initialized: fn(&S, usize) -> bool) -> Self {
        Self {
            name,
            kind: VariableKind::Basic,
            is_initialized,
        }
    }

    /// A list variable. List variables never count as uninitialized.
    pub fn list(name: &'static str) -> Self {
        Self {
            name,
            kind: VariableKind::List,
            is_initialized: |_, _| true,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> VariableKind {
        self.kind
    }

    pub fn is_list(&self) -> bool {
        self.kind == VariableKind::List
    }

    pub fn is_initialized(&self, solution: &S, entity_index: usize) -> bool {
        (self.is_initialized)(solution, entity_index)
    }
}

impl<S> Clone for GenuineVariableDescriptor<S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            kind: self.kind,
            is_initialized: self.is_initialized,
        }
    }
}

impl<S> fmt::Debug for GenuineVariableDescriptor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenuineVariableDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Describes one collection of planning entities.
pub struct EntityDescriptor<S> {
    pub type_name: &'static str,
    entity_count: fn(&S) -> usize,
    genuine_variables: Vec<GenuineVariableDescriptor<S>>,
    shadow_variables: Vec<&'static str>,
    is_pinned: Option<fn(&S, usize) -> bool>,
}

impl<S> EntityDescriptor<S> {
    pub fn new(type_name: &'static str, entity_count: fn(&S) -> usize) -> Self {
        Self {
            type_name,
            entity_count,
            genuine_variables: Vec::new(),
            shadow_variables: Vec::new(),
            is_pinned: None,
        }
    }

    pub fn with_genuine_variable(mut self, variable: GenuineVariableDescriptor<S>) -> Self {
        self.genuine_variables.push(variable);
        self
    }

    /// Declares a shadow variable maintained by a variable listener.
    pub fn with_shadow_variable(mut self, name: &'static str) -> Self {
        self.shadow_variables.push(name);
        self
    }

    /// Pinned entities are never changed by the solver.
    pub fn with_pinning(mut self, is_pinned: fn(&S, usize) -> bool) -> Self {
        self.is_pinned = Some(is_pinned);
        self
    }

    pub fn entity_count(&self, solution: &S) -> usize {
        (self.entity_count)(solution)
    }

    pub fn genuine_variables(&self) -> &[GenuineVariableDescriptor<S>] {
        &self.genuine_variables
    }

    pub fn shadow_variables(&self) -> &[&'static str] {
        &self.shadow_variables
    }

    pub fn find_genuine_variable(&self, name: &str) -> Option<&GenuineVariableDescriptor<S>> {
        self.genuine_variables.iter().find(|v| v.name == name)
    }

    pub fn has_shadow_variable(&self, name: &str) -> bool {
        self.shadow_variables.iter().any(|v| *v == name)
    }

    pub fn has_list_variable(&self) -> bool {
        self.genuine_variables.iter().any(|v| v.is_list())
    }

    pub fn is_pinned(&self, solution: &S, entity_index: usize) -> bool {
        self.is_pinned
            .is_some_and(|pinned| pinned(solution, entity_index))
    }

    /// Counts basic variables on a movable entity that are still unassigned.
    pub fn count_uninitialized_variables(&self, solution: &S, entity_index: usize) -> usize {
        self.genuine_variables
            .iter()
            .filter(|v| !v.is_list() && !v.is_initialized(solution, entity_index))
            .count()
    }

    /// Variables a construction or exhaustive phase may still assign.
    ///
    /// Pinned entities have none.
    pub fn count_reinitializable_variables(&self, solution: &S, entity_index: usize) -> usize {
        if self.is_pinned(solution, entity_index) {
            0
        } else {
            self.count_uninitialized_variables(solution, entity_index)
        }
    }

    /// Whether the named basic variable is unassigned on a movable entity.
    ///
    /// Unknown names and list variables are never reinitializable.
    pub fn is_variable_reinitializable(&self, solution: &S, entity_index: usize, name: &str) -> bool {
        !self.is_pinned(solution, entity_index)
            && self
                .find_genuine_variable(name)
                .is_some_and(|v| !v.is_list() && !v.is_initialized(solution, entity_index))
    }
}

impl<S> Clone for EntityDescriptor<S> {
    fn clone(&self) -> Self {
        Self {
            type_name: self.type_name,
            entity_count: self.entity_count,
            genuine_variables: self.genuine_variables.clone(),
            shadow_variables: self.shadow_variables.clone(),
            is_pinned: self.is_pinned,
        }
    }
}

impl<S> fmt::Debug for EntityDescriptor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityDescriptor")
            .field("type_name", &self.type_name)
            .field("genuine_variables", &self.genuine_variables)
            .field("shadow_variables", &self.shadow_variables)
            .field("pinning", &self.is_pinned.is_some())
            .finish()
    }
}

/// Describes one collection of problem facts.
pub struct ProblemFactDescriptor<S> {
    pub type_name: &'static str,
    fact_count: fn(&S) -> usize,
}

impl<S> ProblemFactDescriptor<S> {
    pub fn new(type_name: &'static str, fact_count: fn(&S) -> usize) -> Self {
        Self {
            type_name,
            fact_count,
        }
    }

    pub fn fact_count(&self, solution: &S) -> usize {
        (self.fact_count)(solution)
    }
}

impl<S> Clone for ProblemFactDescriptor<S> {
    fn clone(&self) -> Self {
        Self {
            type_name: self.type_name,
            fact_count: self.fact_count,
        }
    }
}

impl<S> fmt::Debug for ProblemFactDescriptor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProblemFactDescriptor")
            .field("type_name", &self.type_name)
            .finish()
    }
}

/// Describes a planning solution: its entity and problem fact collections.
///
/// Descriptor indices are positions in these vectors and are used by every
/// move, selector and change notification.
pub struct SolutionDescriptor<S> {
    pub type_name: &'static str,
    pub entity_descriptors: Vec<EntityDescriptor<S>>,
    pub problem_fact_descriptors: Vec<ProblemFactDescriptor<S>>,
}

impl<S> SolutionDescriptor<S> {
    pub fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            entity_descriptors: Vec::new(),
            problem_fact_descriptors: Vec::new(),
        }
    }

    pub fn with_entity(mut self, descriptor: EntityDescriptor<S>) -> Self {
        self.entity_descriptors.push(descriptor);
        self
    }

    pub fn with_problem_fact(mut self, descriptor: ProblemFactDescriptor<S>) -> Self {
        self.problem_fact_descriptors.push(descriptor);
        self
    }

    pub fn entity_descriptor(&self, descriptor_index: usize) -> Option<&EntityDescriptor<S>> {
        self.entity_descriptors.get(descriptor_index)
    }

    pub fn find_entity_descriptor(&self, type_name: &str) -> Option<&EntityDescriptor<S>> {
        self.entity_descriptors
            .iter()
            .find(|d| d.type_name == type_name)
    }

    pub fn entity_count(&self, solution: &S, descriptor_index: usize) -> Option<usize> {
        self.entity_descriptors
            .get(descriptor_index)
            .map(|d| d.entity_count(solution))
    }

    pub fn total_entity_count(&self, solution: &S) -> usize {
        self.entity_descriptors
            .iter()
            .map(|d| d.entity_count(solution))
            .sum()
    }

    pub fn problem_fact_count(&self, solution: &S, descriptor_index: usize) -> Option<usize> {
        self.problem_fact_descriptors
            .get(descriptor_index)
            .map(|d| d.fact_count(solution))
    }

    /// Counts unassigned basic variables over every entity, pinned or not.
    pub fn count_uninitialized_variables(&self, solution: &S) -> usize {
        self.entity_descriptors
            .iter()
            .map(|d| {
                (0..d.entity_count(solution))
                    .map(|i| d.count_uninitialized_variables(solution, i))
                    .sum::<usize>()
            })
            .sum()
    }

    /// Returns true if any entity collection declares a list variable.
    pub fn has_list_variable(&self) -> bool {
        self.entity_descriptors.iter().any(|d| d.has_list_variable())
    }
}

impl<S> Clone for SolutionDescriptor<S> {
    fn clone(&self) -> Self {
        Self {
            type_name: self.type_name,
            entity_descriptors: self.entity_descriptors.clone(),
            problem_fact_descriptors: self.problem_fact_descriptors.clone(),
        }
    }
}

impl<S> fmt::Debug for SolutionDescriptor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolutionDescriptor")
            .field("type_name", &self.type_name)
            .field("entity_descriptors", &self.entity_descriptors)
            .field("problem_fact_descriptors", &self.problem_fact_descriptors)
            .finish()
    }
}
