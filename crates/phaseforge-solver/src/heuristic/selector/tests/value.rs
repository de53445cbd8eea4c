//! Tests for value selectors.

use std::cmp::Ordering;

use phaseforge_core::PhaseForgeError;
use phaseforge_scoring::ScoreDirector;
use phaseforge_test::task::{create_task_director, machine_values, TaskSolution};

use super::rng;
use crate::heuristic::selector::{
    FromSolutionValueSelector, SelectionCacheType, SelectionOrder, SelectionSorterOrder,
    StaticValueSelector, ValueSelector,
};

fn director() -> phaseforge_test::task::TaskDirector {
    create_task_director(TaskSolution::with_durations(&[1, 2], 3, 2))
}

#[test]
fn test_static_values_in_order() {
    let director = director();
    let selector = StaticValueSelector::new(vec![7usize, 8, 9]);

    let values: Vec<_> = selector.iter(&director, 0, 0, rng()).collect();
    assert_eq!(values, vec![7, 8, 9]);
    assert_eq!(selector.size(&director, 0, 0), 3);
    assert!(!ValueSelector::<TaskSolution, usize>::is_never_ending(&selector));
}

#[test]
fn test_static_shuffled_is_permutation() {
    let director = director();
    let selector = StaticValueSelector::new((0..10usize).collect())
        .with_selection_order(SelectionOrder::Shuffled)
        .unwrap();

    let mut values: Vec<_> = selector.iter(&director, 0, 0, rng()).collect();
    values.sort_unstable();
    assert_eq!(values, (0..10).collect::<Vec<_>>());
}

#[test]
fn test_static_rejects_sorted() {
    let result = StaticValueSelector::<TaskSolution, usize>::new(vec![1])
        .with_selection_order(SelectionOrder::Sorted);
    assert!(matches!(result, Err(PhaseForgeError::Config(_))));
}

#[test]
fn test_from_solution_values() {
    let director = director();
    let selector = FromSolutionValueSelector::new(machine_values);

    let values: Vec<_> = selector.iter(&director, 0, 1, rng()).collect();
    assert_eq!(values, vec![0, 1, 2]);
    assert_eq!(selector.size(&director, 0, 1), 3);
}

fn machines_below_entity(s: &TaskSolution, entity: usize) -> Vec<usize> {
    s.machines.iter().copied().filter(|&m| m <= entity).collect()
}

#[test]
fn test_entity_dependent_range() {
    let director = director();
    let selector = FromSolutionValueSelector::entity_dependent(machines_below_entity);

    assert_eq!(selector.iter(&director, 0, 0, rng()).collect::<Vec<_>>(), vec![0]);
    assert_eq!(selector.iter(&director, 0, 1, rng()).collect::<Vec<_>>(), vec![0, 1]);
    assert_eq!(selector.size(&director, 0, 1), 2);
}

fn compare_machine(_s: &TaskSolution, a: &usize, b: &usize) -> Ordering {
    a.cmp(b)
}

#[test]
fn test_sorted_by_decreasing_strength() {
    let director = director();
    let selector = FromSolutionValueSelector::new(machine_values)
        .with_selection_order(SelectionOrder::Sorted)
        .with_cache_type(SelectionCacheType::Step)
        .with_sorter(compare_machine, SelectionSorterOrder::Descending)
        .build()
        .unwrap();

    assert!(selector.has_sorter());
    let values: Vec<_> = selector.iter(&director, 0, 0, rng()).collect();
    assert_eq!(values, vec![2, 1, 0]);
}

#[test]
fn test_probabilistic_requires_weight() {
    let result = FromSolutionValueSelector::new(machine_values)
        .with_selection_order(SelectionOrder::Probabilistic)
        .with_cache_type(SelectionCacheType::Phase)
        .build();
    assert!(matches!(result, Err(PhaseForgeError::Config(_))));
}

#[test]
fn test_random_values_never_end() {
    let director = director();
    let selector =
        FromSolutionValueSelector::new(machine_values).with_selection_order(SelectionOrder::Random);

    assert!(selector.is_never_ending());
    let values: Vec<_> = selector.iter(&director, 0, 0, rng()).take(25).collect();
    assert_eq!(values.len(), 25);
    assert!(values.iter().all(|v| *v < 3));
}

#[test]
fn test_phase_cache_holds_until_phase_end() {
    let mut director = director();
    let mut selector =
        FromSolutionValueSelector::new(machine_values).with_cache_type(SelectionCacheType::Phase);

    selector.phase_started(&director);
    director.working_solution_mut().machines.push(3);
    selector.step_started(&director);
    selector.step_ended();
    assert_eq!(selector.size(&director, 0, 0), 3);

    selector.phase_ended();
    assert_eq!(selector.size(&director, 0, 0), 4);
}
