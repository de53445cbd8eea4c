//! Shadow variable test fixtures.
//!
//! Children choose a value; each parent carries a `total` shadow variable
//! equal to the sum of its children's values, and an `overloaded` shadow
//! variable derived from `total`. The score penalizes every unit a parent's
//! total exceeds its capacity, so it only reads shadow variables.
//!
//! Two listeners are registered:
//! - [`ParentTotalListener`] on `Child.value`, maintaining `Parent.total`
//! - [`OverloadListener`] on `Parent.total`, maintaining `Parent.overloaded`

use phaseforge_core::{
    EntityDescriptor, GenuineVariableDescriptor, PlanningSolution, ShadowNotifier, SimpleScore,
    SolutionDescriptor, VariableListener,
};
use phaseforge_scoring::{
    IncrementalUniCalculator, ListenerRegistration, ScoreDirectorFactory, TypedScoreDirector,
};

pub const CHILD_DESCRIPTOR: usize = 0;
pub const PARENT_DESCRIPTOR: usize = 1;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Child {
    pub parent: usize,
    pub value: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Parent {
    pub capacity: i64,
    pub total: i64,
    pub overloaded: bool,
}

impl Parent {
    pub fn new(capacity: i64) -> Self {
        Self {
            capacity,
            total: 0,
            overloaded: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FamilySolution {
    pub children: Vec<Child>,
    pub parents: Vec<Parent>,
    pub score: Option<SimpleScore>,
}

impl FamilySolution {
    /// Creates parents with the given capacities and unassigned children,
    /// `children[i]` naming the parent of child `i`.
    pub fn new(capacities: &[i64], children: &[usize]) -> Self {
        Self {
            children: children
                .iter()
                .map(|&parent| Child {
                    parent,
                    value: None,
                })
                .collect(),
            parents: capacities.iter().map(|&c| Parent::new(c)).collect(),
            score: None,
        }
    }

    pub fn with_values(mut self, values: &[Option<i64>]) -> Self {
        for (child, &value) in self.children.iter_mut().zip(values) {
            child.value = value;
        }
        self
    }

    pub fn totals(&self) -> Vec<i64> {
        self.parents.iter().map(|p| p.total).collect()
    }
}

impl PlanningSolution for FamilySolution {
    type Score = SimpleScore;

    fn score(&self) -> Option<Self::Score> {
        self.score
    }

    fn set_score(&mut self, score: Option<Self::Score>) {
        self.score = score;
    }
}

pub fn child_count(s: &FamilySolution) -> usize {
    s.children.len()
}

pub fn parent_count(s: &FamilySolution) -> usize {
    s.parents.len()
}

pub fn parents(s: &FamilySolution) -> &[Parent] {
    &s.parents
}

pub fn get_child_value(s: &FamilySolution, idx: usize) -> Option<i64> {
    s.children.get(idx).and_then(|c| c.value)
}

pub fn set_child_value(s: &mut FamilySolution, idx: usize, v: Option<i64>) {
    if let Some(child) = s.children.get_mut(idx) {
        child.value = v;
    }
}

pub fn is_value_initialized(s: &FamilySolution, idx: usize) -> bool {
    get_child_value(s, idx).is_some()
}

/// Values `1..=3`.
pub fn child_values(_s: &FamilySolution) -> Vec<i64> {
    vec![1, 2, 3]
}

/// Maintains `Parent.total` from `Child.value`.
#[derive(Debug, Default)]
pub struct ParentTotalListener {
    old_values: Vec<(usize, i64)>,
}

impl VariableListener<FamilySolution> for ParentTotalListener {
    fn before_variable_changed(&mut self, solution: &FamilySolution, entity_index: usize) {
        let old = get_child_value(solution, entity_index).unwrap_or(0);
        self.old_values.push((entity_index, old));
    }

    fn after_variable_changed(
        &mut self,
        notifier: &mut dyn ShadowNotifier<FamilySolution>,
        entity_index: usize,
    ) {
        let old = self
            .old_values
            .iter()
            .rposition(|(i, _)| *i == entity_index)
            .map(|pos| self.old_values.remove(pos).1)
            .unwrap_or(0);
        let solution = notifier.working_solution();
        let Some(child) = solution.children.get(entity_index) else {
            return;
        };
        let parent = child.parent;
        let delta = child.value.unwrap_or(0) - old;
        if delta == 0 || parent >= solution.parents.len() {
            return;
        }

        notifier.before_shadow_changed(PARENT_DESCRIPTOR, parent, "total");
        notifier.working_solution_mut().parents[parent].total += delta;
        notifier.after_shadow_changed(PARENT_DESCRIPTOR, parent, "total");
    }

    fn reset_working_solution(&mut self, solution: &mut FamilySolution) {
        self.old_values.clear();
        for parent in &mut solution.parents {
            parent.total = 0;
        }
        for child in &solution.children {
            if let Some(parent) = solution.parents.get_mut(child.parent) {
                parent.total += child.value.unwrap_or(0);
            }
        }
    }
}

/// Maintains `Parent.overloaded` from `Parent.total`.
#[derive(Debug, Default)]
pub struct OverloadListener;

impl VariableListener<FamilySolution> for OverloadListener {
    fn after_variable_changed(
        &mut self,
        notifier: &mut dyn ShadowNotifier<FamilySolution>,
        entity_index: usize,
    ) {
        let Some(parent) = notifier.working_solution().parents.get(entity_index) else {
            return;
        };
        let overloaded = parent.total > parent.capacity;
        if overloaded == parent.overloaded {
            return;
        }
        notifier.before_shadow_changed(PARENT_DESCRIPTOR, entity_index, "overloaded");
        notifier.working_solution_mut().parents[entity_index].overloaded = overloaded;
        notifier.after_shadow_changed(PARENT_DESCRIPTOR, entity_index, "overloaded");
    }

    fn reset_working_solution(&mut self, solution: &mut FamilySolution) {
        for parent in &mut solution.parents {
            parent.overloaded = parent.total > parent.capacity;
        }
    }
}

fn is_over_capacity(parent: &Parent) -> bool {
    parent.total > parent.capacity
}

fn excess(parent: &Parent) -> SimpleScore {
    SimpleScore::of(parent.total - parent.capacity)
}

/// Recomputes the excess from the genuine variables, ignoring shadows.
pub fn calculate_excess_from_values(s: &FamilySolution) -> SimpleScore {
    let mut totals = vec![0i64; s.parents.len()];
    for child in &s.children {
        if let Some(total) = totals.get_mut(child.parent) {
            *total += child.value.unwrap_or(0);
        }
    }
    let excess: i64 = s
        .parents
        .iter()
        .zip(totals)
        .map(|(p, total)| (total - p.capacity).max(0))
        .sum();
    SimpleScore::of(-excess)
}

pub fn create_family_descriptor() -> SolutionDescriptor<FamilySolution> {
    SolutionDescriptor::new("FamilySolution")
        .with_entity(
            EntityDescriptor::new("Child", child_count).with_genuine_variable(
                GenuineVariableDescriptor::basic("value", is_value_initialized),
            ),
        )
        .with_entity(
            EntityDescriptor::new("Parent", parent_count)
                .with_shadow_variable("total")
                .with_shadow_variable("overloaded"),
        )
}

pub type FamilyCalculator = IncrementalUniCalculator<
    FamilySolution,
    Parent,
    fn(&FamilySolution) -> &[Parent],
    fn(&Parent) -> bool,
    fn(&Parent) -> SimpleScore,
    SimpleScore,
>;

pub type FamilyDirector = TypedScoreDirector<FamilySolution, FamilyCalculator>;

pub fn family_calculator() -> FamilyCalculator {
    IncrementalUniCalculator::penalize(
        "Parent capacity",
        PARENT_DESCRIPTOR,
        parents as fn(&FamilySolution) -> &[Parent],
        is_over_capacity as fn(&Parent) -> bool,
        excess as fn(&Parent) -> SimpleScore,
    )
}

fn family_listeners() -> Vec<ListenerRegistration<FamilySolution>> {
    vec![
        ListenerRegistration::new(CHILD_DESCRIPTOR, "value", ParentTotalListener::default()),
        ListenerRegistration::new(PARENT_DESCRIPTOR, "total", OverloadListener),
    ]
}

pub fn create_family_factory() -> ScoreDirectorFactory<FamilySolution, FamilyCalculator> {
    ScoreDirectorFactory::new(create_family_descriptor(), family_calculator())
        .with_listeners(family_listeners)
}

pub fn create_family_director(solution: FamilySolution) -> FamilyDirector {
    create_family_factory().build_score_director(solution)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_recomputes_totals() {
        let mut s = FamilySolution::new(&[2, 5], &[0, 0, 1]).with_values(&[Some(2), Some(3), None]);
        ParentTotalListener::default().reset_working_solution(&mut s);
        OverloadListener.reset_working_solution(&mut s);
        assert_eq!(s.totals(), vec![5, 0]);
        assert!(s.parents[0].overloaded);
        assert!(!s.parents[1].overloaded);
    }

    #[test]
    fn test_excess_from_values() {
        let s = FamilySolution::new(&[2, 5], &[0, 0, 1]).with_values(&[Some(2), Some(3), Some(1)]);
        assert_eq!(calculate_excess_from_values(&s), SimpleScore::of(-3));
    }
}
