//! Tests for pillar selectors.

use phaseforge_test::task::{create_task_director, get_machine, set_machine, Task, TaskSolution};

use super::rng;
use crate::heuristic::r#move::Move;
use crate::heuristic::selector::{
    collect_pillars, MoveSelector, PillarChangeMoveSelector, PillarSwapMoveSelector,
    StaticValueSelector,
};

fn tasks() -> TaskSolution {
    TaskSolution::new(
        vec![
            Task::new(0, 1).assigned(0, 0),
            Task::new(1, 1).assigned(0, 1),
            Task::new(2, 1).assigned(1, 0),
            Task::new(3, 1),
            Task::new(4, 1).assigned(1, 1).pinned(),
        ],
        3,
        2,
    )
}

#[test]
fn test_pillars_group_by_value_and_skip_unassigned_and_pinned() {
    let director = create_task_director(tasks());
    let pillars = collect_pillars(&director, 0, get_machine);
    assert_eq!(pillars, vec![vec![0, 1], vec![2]]);
}

#[test]
fn test_pillar_change_selector() {
    let director = create_task_director(tasks());
    let selector = PillarChangeMoveSelector::new(
        StaticValueSelector::new(vec![0usize, 1, 2]),
        get_machine,
        set_machine,
        0,
        "machine",
    );

    let moves: Vec<_> = selector.iter_moves(&director, rng()).collect();
    assert_eq!(moves.len(), 6);
    assert_eq!(selector.size(&director), 6);

    let first = &moves[0];
    assert_eq!(first.entity_indices(), &[0, 1]);
    assert_eq!(first.to_value(), Some(&0));
    assert!(!first.is_doable(&director));
    assert!(moves[2].is_doable(&director));
}

#[test]
fn test_pillar_swap_selector() {
    let director = create_task_director(tasks());
    let selector = PillarSwapMoveSelector::new(get_machine, set_machine, 0, "machine");

    let moves: Vec<_> = selector.iter_moves(&director, rng()).collect();
    assert_eq!(moves.len(), 1);
    assert_eq!(moves[0].left_indices(), &[0, 1]);
    assert_eq!(moves[0].right_indices(), &[2]);
    assert_eq!(selector.size(&director), 1);
}
