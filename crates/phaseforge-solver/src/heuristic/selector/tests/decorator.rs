//! Tests for move selector decorators.

use phaseforge_core::PhaseForgeError;
use phaseforge_scoring::ScoreDirector;
use phaseforge_test::nqueens::{
    create_nqueens_director, get_queen_row, set_queen_row, NQueensSolution,
};
use phaseforge_test::task::{
    create_task_director, get_machine, get_slot, set_machine, set_slot, TaskSolution,
};

use super::rng;
use crate::heuristic::r#move::{ChangeMove, EitherMove, Move};
use crate::heuristic::selector::{
    CachingMoveSelector, CartesianProductMoveSelector, ChangeMoveSelector, EitherUnionMoveSelector,
    FromSolutionEntitySelector, MimicRecorder, MimicRecordingEntitySelector,
    MimicReplayingEntitySelector, MoveSelector, SelectionCacheType, SelectionOrder,
    StaticValueSelector, SwapMoveSelector, UnionMoveSelector,
};

type RowSelector = ChangeMoveSelector<
    NQueensSolution,
    i64,
    FromSolutionEntitySelector<NQueensSolution>,
    StaticValueSelector<NQueensSolution, i64>,
>;

fn rows(values: Vec<i64>) -> RowSelector {
    ChangeMoveSelector::simple(get_queen_row, set_queen_row, 0, "row", values)
}

fn entity_value(m: &ChangeMove<NQueensSolution, i64>) -> (usize, i64) {
    (m.entity_index(), *m.to_value().unwrap())
}

#[test]
fn test_union_chains_children() {
    let director = create_nqueens_director(&[0, 0]);
    let union: UnionMoveSelector<NQueensSolution, _, _, _> =
        UnionMoveSelector::new(rows(vec![0]), rows(vec![1]));

    let moves: Vec<_> = union
        .iter_moves(&director, rng())
        .map(|m| entity_value(&m))
        .collect();
    assert_eq!(moves, vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
    assert_eq!(union.size(&director), 4);
    assert!(!union.is_never_ending());
}

#[test]
fn test_random_union_yields_every_move_once() {
    let director = create_nqueens_director(&[0, 0, 0]);
    let union: UnionMoveSelector<NQueensSolution, _, _, _> =
        UnionMoveSelector::new(rows(vec![0, 1]), rows(vec![2])).with_random_selection(true);

    let mut moves: Vec<_> = union
        .iter_moves(&director, rng())
        .map(|m| entity_value(&m))
        .collect();
    moves.sort_unstable();
    assert_eq!(
        moves,
        vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2), (2, 0), (2, 1), (2, 2)]
    );
}

#[test]
fn test_either_union_wraps_both_move_types() {
    let director = create_nqueens_director(&[0, 1]);
    let swaps = SwapMoveSelector::simple(get_queen_row, set_queen_row, 0, "row");
    let union: EitherUnionMoveSelector<NQueensSolution, _, _, _, _> =
        EitherUnionMoveSelector::new(rows(vec![2, 3]), swaps);

    let moves: Vec<_> = union.iter_moves(&director, rng()).collect();
    assert_eq!(moves.len(), 5);
    assert!(moves[..4].iter().all(|m| matches!(m, EitherMove::Left(_))));
    assert!(matches!(moves[4], EitherMove::Right(_)));
    assert!(moves.iter().all(|m| m.is_doable(&director)));
}

#[test]
fn test_cartesian_product_with_mimic_targets_one_entity() {
    let director = create_task_director(TaskSolution::with_durations(&[1, 2], 2, 2));
    let recorder = MimicRecorder::new("task");
    let machines = ChangeMoveSelector::new(
        MimicRecordingEntitySelector::new(FromSolutionEntitySelector::new(0), recorder.clone()),
        StaticValueSelector::new(vec![0usize, 1]),
        get_machine,
        set_machine,
        0,
        "machine",
    );
    let slots = ChangeMoveSelector::new(
        MimicReplayingEntitySelector::new(recorder),
        StaticValueSelector::new(vec![0usize, 1]),
        get_slot,
        set_slot,
        0,
        "slot",
    );
    let product = CartesianProductMoveSelector::new(machines, slots);

    let moves: Vec<_> = product.iter_moves(&director, rng()).collect();
    assert_eq!(moves.len(), 8);
    for m in &moves {
        assert_eq!(m.len(), 2);
        assert_eq!(m.entity_indices().len(), 1);
        assert_eq!(m.moves()[0].variable_name(), "machine");
        assert_eq!(m.moves()[1].variable_name(), "slot");
    }
    assert_eq!(moves[0].entity_indices(), &[0]);
    assert_eq!(moves[7].entity_indices(), &[1]);
}

#[test]
fn test_caching_rejects_just_in_time_and_never_ending() {
    let result = CachingMoveSelector::new(rows(vec![0]), SelectionCacheType::JustInTime);
    assert!(matches!(result, Err(PhaseForgeError::Config(_))));

    let never_ending = ChangeMoveSelector::new(
        FromSolutionEntitySelector::new(0).with_selection_order(SelectionOrder::Random),
        StaticValueSelector::new(vec![0i64]),
        get_queen_row,
        set_queen_row,
        0,
        "row",
    );
    let result = CachingMoveSelector::new(never_ending, SelectionCacheType::Step);
    assert!(matches!(result, Err(PhaseForgeError::Config(_))));
}

#[test]
fn test_step_cache_lifecycle() {
    let mut director = create_nqueens_director(&[0, 0]);
    let mut caching = CachingMoveSelector::new(rows(vec![0, 1]), SelectionCacheType::Step).unwrap();
    let mut solver_rng = rng();

    caching.step_started(&director, &mut solver_rng);
    assert!(caching.is_cached());
    director.working_solution_mut().queens.pop();
    assert_eq!(caching.iter_moves(&director, rng()).count(), 4);

    caching.step_ended();
    assert!(!caching.is_cached());
    assert_eq!(caching.iter_moves(&director, rng()).count(), 2);
}

fn by_value_descending(
    _s: &NQueensSolution,
    a: &ChangeMove<NQueensSolution, i64>,
    b: &ChangeMove<NQueensSolution, i64>,
) -> std::cmp::Ordering {
    b.to_value().cmp(&a.to_value())
}

fn only_value_two(_s: &NQueensSolution, m: &ChangeMove<NQueensSolution, i64>) -> f64 {
    if m.to_value() == Some(&2) {
        1.0
    } else {
        0.0
    }
}

#[test]
fn test_cached_sorted_and_probabilistic_orders() {
    let director = create_nqueens_director(&[0]);

    let sorted = CachingMoveSelector::new(rows(vec![0, 1, 2]), SelectionCacheType::Phase)
        .unwrap()
        .with_selection_order(SelectionOrder::Sorted)
        .with_sorter(by_value_descending)
        .build()
        .unwrap();
    let values: Vec<_> = sorted
        .iter_moves(&director, rng())
        .map(|m| entity_value(&m).1)
        .collect();
    assert_eq!(values, vec![2, 1, 0]);

    let weighted = CachingMoveSelector::new(rows(vec![0, 1, 2]), SelectionCacheType::Phase)
        .unwrap()
        .with_selection_order(SelectionOrder::Probabilistic)
        .with_probability_weight(only_value_two)
        .build()
        .unwrap();
    assert!(weighted.is_never_ending());
    let values: Vec<_> = weighted
        .iter_moves(&director, rng())
        .take(10)
        .map(|m| entity_value(&m).1)
        .collect();
    assert_eq!(values, vec![2; 10]);

    let missing = CachingMoveSelector::new(rows(vec![0]), SelectionCacheType::Phase)
        .unwrap()
        .with_selection_order(SelectionOrder::Probabilistic)
        .build();
    assert!(matches!(missing, Err(PhaseForgeError::Config(_))));
}
