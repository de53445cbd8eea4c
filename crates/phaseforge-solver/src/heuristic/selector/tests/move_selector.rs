//! Tests for ChangeMoveSelector and SwapMoveSelector.

use phaseforge_test::nqueens::{
    create_nqueens_director, get_queen_row, set_queen_row, NQueensSolution,
};
use phaseforge_test::task::{create_task_director, get_machine, set_machine, Task, TaskSolution};

use super::rng;
use crate::heuristic::r#move::Move;
use crate::heuristic::selector::{
    ChangeMoveSelector, FromSolutionEntitySelector, MoveSelector, SelectionOrder,
    StaticValueSelector, SwapMoveSelector,
};

fn row_selector(values: Vec<i64>) -> ChangeMoveSelector<
    NQueensSolution,
    i64,
    FromSolutionEntitySelector<NQueensSolution>,
    StaticValueSelector<NQueensSolution, i64>,
> {
    ChangeMoveSelector::simple(get_queen_row, set_queen_row, 0, "row", values)
}

#[test]
fn test_change_selector_entity_major_order() {
    let director = create_nqueens_director(&[0, 0]);
    let selector = row_selector(vec![0, 1]);

    let moves: Vec<_> = selector
        .iter_moves(&director, rng())
        .map(|m| (m.entity_index(), *m.to_value().unwrap()))
        .collect();
    assert_eq!(moves, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
    assert_eq!(selector.size(&director), 4);
    assert!(!selector.is_never_ending());
}

#[test]
fn test_change_moves_carry_variable_metadata() {
    let director = create_nqueens_director(&[0, 1]);
    let selector = row_selector(vec![1]);

    for m in selector.iter_moves(&director, rng()) {
        assert_eq!(m.descriptor_index(), 0);
        assert_eq!(m.variable_name(), "row");
    }
    let doable: Vec<_> = selector
        .iter_moves(&director, rng())
        .filter(|m| m.is_doable(&director))
        .map(|m| m.entity_index())
        .collect();
    assert_eq!(doable, vec![0]);
}

#[test]
fn test_never_ending_values_give_one_move_per_entity() {
    let director = create_nqueens_director(&[0, 0, 0]);
    let values = StaticValueSelector::new(vec![0i64, 1, 2])
        .with_selection_order(SelectionOrder::Random)
        .unwrap();
    let selector = ChangeMoveSelector::new(
        FromSolutionEntitySelector::new(0),
        values,
        get_queen_row,
        set_queen_row,
        0,
        "row",
    );

    let entities: Vec<_> = selector
        .iter_moves(&director, rng())
        .map(|m| m.entity_index())
        .collect();
    assert_eq!(entities, vec![0, 1, 2]);
}

#[test]
fn test_random_entities_make_selector_never_ending() {
    let director = create_nqueens_director(&[0, 0, 0]);
    let selector = ChangeMoveSelector::new(
        FromSolutionEntitySelector::new(0).with_selection_order(SelectionOrder::Random),
        StaticValueSelector::new(vec![0i64, 1]),
        get_queen_row,
        set_queen_row,
        0,
        "row",
    );

    assert!(selector.is_never_ending());
    let moves: Vec<_> = selector.iter_moves(&director, rng()).take(40).collect();
    assert_eq!(moves.len(), 40);
    assert!(moves.iter().all(|m| m.entity_index() < 3));
}

#[test]
fn test_change_selector_is_reproducible() {
    let director = create_nqueens_director(&[0, 0, 0, 0]);
    let selector = ChangeMoveSelector::new(
        FromSolutionEntitySelector::new(0).with_selection_order(SelectionOrder::Random),
        StaticValueSelector::new(vec![0i64, 1, 2, 3])
            .with_selection_order(SelectionOrder::Random)
            .unwrap(),
        get_queen_row,
        set_queen_row,
        0,
        "row",
    );

    let pick = |_| {
        selector
            .iter_moves(&director, rng())
            .take(12)
            .map(|m| (m.entity_index(), m.to_value().copied()))
            .collect::<Vec<_>>()
    };
    assert_eq!(pick(0), pick(1));
}

fn machine_swaps() -> SwapMoveSelector<
    TaskSolution,
    usize,
    FromSolutionEntitySelector<TaskSolution>,
    FromSolutionEntitySelector<TaskSolution>,
> {
    SwapMoveSelector::simple(get_machine, set_machine, 0, "machine")
}

#[test]
fn test_swap_selector_yields_each_pair_once() {
    let director = create_task_director(TaskSolution::new(
        vec![
            Task::new(0, 1).assigned(0, 0),
            Task::new(1, 1).assigned(1, 0),
            Task::new(2, 1).assigned(2, 0),
        ],
        3,
        1,
    ));
    let selector = machine_swaps();

    let pairs: Vec<_> = selector
        .iter_moves(&director, rng())
        .map(|m| (m.left_entity_index(), m.right_entity_index()))
        .collect();
    assert_eq!(pairs, vec![(0, 1), (0, 2), (1, 2)]);
    assert_eq!(selector.size(&director), 3);
}

#[test]
fn test_swap_selector_skips_pinned() {
    let director = create_task_director(TaskSolution::new(
        vec![
            Task::new(0, 1).assigned(0, 0),
            Task::new(1, 1).assigned(1, 0).pinned(),
            Task::new(2, 1).assigned(2, 0),
        ],
        3,
        1,
    ));

    let pairs: Vec<_> = machine_swaps()
        .iter_moves(&director, rng())
        .map(|m| (m.left_entity_index(), m.right_entity_index()))
        .collect();
    assert_eq!(pairs, vec![(0, 2)]);
}

#[test]
fn test_random_swap_never_pairs_entity_with_itself() {
    let director = create_task_director(TaskSolution::with_durations(&[1, 2, 3, 4], 2, 2));
    let selector = SwapMoveSelector::new(
        FromSolutionEntitySelector::new(0).with_selection_order(SelectionOrder::Random),
        FromSolutionEntitySelector::new(0),
        get_machine,
        set_machine,
        0,
        "machine",
    );

    assert!(selector.is_never_ending());
    let moves: Vec<_> = selector.iter_moves(&director, rng()).take(30).collect();
    assert_eq!(moves.len(), 30);
    assert!(moves
        .iter()
        .all(|m| m.left_entity_index() != m.right_entity_index()));
}

#[test]
fn test_random_swap_with_single_entity_is_empty() {
    let director = create_task_director(TaskSolution::with_durations(&[1], 2, 2));
    let selector = SwapMoveSelector::new(
        FromSolutionEntitySelector::new(0).with_selection_order(SelectionOrder::Random),
        FromSolutionEntitySelector::new(0),
        get_machine,
        set_machine,
        0,
        "machine",
    );

    assert_eq!(selector.iter_moves(&director, rng()).count(), 0);
}
