//! Tests for the construction heuristic phase, decider and forager.

use phaseforge_config::{ConstructionHeuristicPickEarlyType, EnvironmentMode};
use phaseforge_core::{HardSoftScore, InitScore, SimpleScore};
use phaseforge_test::choice::{
    choice_values, create_uninitialized_choice_director, get_choice, set_choice, Choice,
    ChoiceDirector, ChoiceSolution,
};
use phaseforge_test::task::{
    create_task_director, get_machine, get_slot, machine_values, set_machine, set_slot,
    slot_values, Task, TaskSolution,
};

use super::*;
use crate::heuristic::r#move::ChangeMove;
use crate::heuristic::selector::{
    FromSolutionEntitySelector, FromSolutionValueSelector, StaticValueSelector,
};
use crate::phase::Phase;
use crate::scope::SolverScope;
use crate::termination::StepCountTermination;

type ChoiceMove = ChangeMove<ChoiceSolution, Choice>;

fn choice_placer() -> impl EntityPlacer<ChoiceSolution, ChoiceMove> {
    QueuedEntityPlacer::change(
        FromSolutionEntitySelector::new(0),
        FromSolutionValueSelector::new(choice_values),
        get_choice,
        set_choice,
        0,
        "choice",
    )
}

fn choice_scope(n: usize) -> SolverScope<ChoiceSolution, ChoiceDirector> {
    let mut scope = SolverScope::with_seed(create_uninitialized_choice_director(n), 0);
    scope.start_solving();
    scope
}

fn solve_choices(
    n: usize,
    decider: ConstructionHeuristicDecider<ChoiceSolution>,
) -> Vec<Option<Choice>> {
    let mut scope = choice_scope(n);
    let mut phase = ConstructionHeuristicPhase::new(choice_placer(), decider);
    phase.solve(&mut scope).unwrap();
    scope.working_solution().choices()
}

#[test]
fn test_assigns_best_value_per_slot() {
    let mut scope = choice_scope(2);
    let decider = ConstructionHeuristicDecider::new(ConstructionHeuristicPickEarlyType::Never);
    let mut phase = ConstructionHeuristicPhase::new(choice_placer(), decider);

    phase.solve(&mut scope).unwrap();

    assert_eq!(
        scope.working_solution().choices(),
        vec![Some(Choice::A), Some(Choice::A)]
    );
    assert_eq!(
        scope.best_score(),
        Some(InitScore::initialized(SimpleScore::of(0)))
    );
    assert_eq!(phase.decider().forager().evaluated_count(), 2);
    assert_eq!(scope.total_step_count(), 2);
}

#[test]
fn test_pick_early_stops_after_first_move() {
    let mut scope = choice_scope(3);
    let decider = ConstructionHeuristicDecider::new(
        ConstructionHeuristicPickEarlyType::FirstNonDeterioratingScore,
    );
    let mut phase = ConstructionHeuristicPhase::new(choice_placer(), decider);

    phase.solve(&mut scope).unwrap();

    assert_eq!(
        scope.working_solution().choices(),
        vec![Some(Choice::A); 3]
    );
    assert_eq!(phase.decider().forager().evaluated_count(), 1);
}

#[test]
fn test_skip_undo_keeps_picked_move() {
    let decider = ConstructionHeuristicDecider::new(
        ConstructionHeuristicPickEarlyType::FirstFeasibleScore,
    )
    .with_skip_undo(true)
    .unwrap();

    assert_eq!(solve_choices(2, decider), vec![Some(Choice::A); 2]);
}

#[test]
fn test_skip_undo_rejects_move_threads() {
    let decider = ConstructionHeuristicDecider::<ChoiceSolution>::new(
        ConstructionHeuristicPickEarlyType::Never,
    )
    .with_move_thread_count(2)
    .unwrap();
    assert!(decider.with_skip_undo(true).is_err());

    assert!(ConstructionHeuristicDecider::<ChoiceSolution>::new(
        ConstructionHeuristicPickEarlyType::Never
    )
    .with_move_thread_count(0)
    .is_err());
}

#[test]
fn test_move_threads_match_single_threaded() {
    let single = ConstructionHeuristicDecider::new(ConstructionHeuristicPickEarlyType::Never);
    let threaded = ConstructionHeuristicDecider::new(ConstructionHeuristicPickEarlyType::Never)
        .with_move_thread_count(2)
        .unwrap();

    assert_eq!(solve_choices(4, single), solve_choices(4, threaded));
    assert_eq!(
        solve_choices(
            4,
            ConstructionHeuristicDecider::new(ConstructionHeuristicPickEarlyType::Never)
                .with_move_thread_count(3)
                .unwrap()
        ),
        vec![Some(Choice::A); 4]
    );
}

#[test]
fn test_full_assert_mode_passes() {
    let mut scope = SolverScope::with_seed(create_uninitialized_choice_director(3), 7)
        .with_environment_mode(EnvironmentMode::FullAssert);
    scope.start_solving();
    let decider = ConstructionHeuristicDecider::new(ConstructionHeuristicPickEarlyType::Never);
    let mut phase = ConstructionHeuristicPhase::new(choice_placer(), decider);

    phase.solve(&mut scope).unwrap();
    assert_eq!(
        scope.working_solution().choices(),
        vec![Some(Choice::A); 3]
    );
}

#[test]
fn test_phase_termination_stops_construction() {
    let mut scope = choice_scope(3);
    let decider = ConstructionHeuristicDecider::new(ConstructionHeuristicPickEarlyType::Never);
    let mut phase = ConstructionHeuristicPhase::new(choice_placer(), decider)
        .with_termination(StepCountTermination::new(1));

    phase.solve(&mut scope).unwrap();

    assert_eq!(
        scope.working_solution().choices(),
        vec![Some(Choice::A), None, None]
    );
    let best = scope.best_score().unwrap();
    assert_eq!(best.uninitialized_count(), 2);
    assert!(!best.is_solution_initialized());
}

#[test]
fn test_empty_placement_ends_phase() {
    let mut scope = choice_scope(2);
    let placer = QueuedEntityPlacer::change(
        FromSolutionEntitySelector::new(0),
        StaticValueSelector::new(Vec::<Choice>::new()),
        get_choice,
        set_choice,
        0,
        "choice",
    );
    let decider = ConstructionHeuristicDecider::new(ConstructionHeuristicPickEarlyType::Never);
    let mut phase = ConstructionHeuristicPhase::new(placer, decider);

    phase.solve(&mut scope).unwrap();

    assert_eq!(scope.working_solution().choices(), vec![None, None]);
    assert_eq!(scope.total_step_count(), 0);
    assert_eq!(scope.best_score().map(|s| s.uninitialized_count()), Some(2));
}

#[test]
fn test_initialized_solution_has_no_steps() {
    let mut scope = SolverScope::with_seed(
        phaseforge_test::choice::create_choice_director(&[Some(Choice::B)]),
        0,
    );
    scope.start_solving();
    let decider = ConstructionHeuristicDecider::new(ConstructionHeuristicPickEarlyType::Never);
    let mut phase = ConstructionHeuristicPhase::new(choice_placer(), decider);

    phase.solve(&mut scope).unwrap();

    assert_eq!(scope.working_solution().choices(), vec![Some(Choice::B)]);
    assert_eq!(scope.total_step_count(), 0);
}

#[test]
fn test_pinned_entities_are_skipped() {
    let solution = TaskSolution::new(
        vec![Task::new(0, 3).pinned(), Task::new(1, 2), Task::new(2, 1)],
        2,
        2,
    );
    let mut scope = SolverScope::with_seed(create_task_director(solution), 0);
    scope.start_solving();
    let placer = QueuedEntityPlacer::change(
        FromSolutionEntitySelector::new(0),
        FromSolutionValueSelector::new(machine_values),
        get_machine,
        set_machine,
        0,
        "machine",
    );
    let decider = ConstructionHeuristicDecider::new(ConstructionHeuristicPickEarlyType::Never);
    let mut phase = ConstructionHeuristicPhase::new(placer, decider);

    phase.solve(&mut scope).unwrap();

    let solution = scope.working_solution();
    assert_eq!(get_machine(solution, 0), None);
    assert_eq!(get_machine(solution, 1), Some(0));
    assert_eq!(get_machine(solution, 2), Some(0));
    assert_eq!(scope.total_step_count(), 2);
}

#[test]
fn test_assigned_variable_is_left_alone() {
    // Task 0 already sits in the best slot but has no machine yet.
    let mut tasks = vec![Task::new(0, 3), Task::new(1, 2)];
    tasks[0].slot = Some(0);
    let mut scope = SolverScope::with_seed(create_task_director(TaskSolution::new(tasks, 2, 2)), 0);
    scope.start_solving();
    let placer = QueuedEntityPlacer::change(
        FromSolutionEntitySelector::new(0),
        FromSolutionValueSelector::new(slot_values),
        get_slot,
        set_slot,
        0,
        "slot",
    );
    let decider = ConstructionHeuristicDecider::new(ConstructionHeuristicPickEarlyType::Never);
    let mut phase = ConstructionHeuristicPhase::new(placer, decider);

    phase.solve(&mut scope).unwrap();

    let solution = scope.working_solution();
    assert_eq!(get_slot(solution, 0), Some(0));
    assert_eq!(get_slot(solution, 1), Some(0));
    assert_eq!(get_machine(solution, 0), None);
    assert_eq!(scope.total_step_count(), 1);
    assert_eq!(scope.calculate_init_score().score(), HardSoftScore::of(0, 0));
}

#[test]
fn test_forager_keeps_first_of_equal_scores() {
    let mut forager = ConstructionForager::new(ConstructionHeuristicPickEarlyType::Never);
    forager.step_started(None);

    assert!(!forager.add_move(0, InitScore::new(1, SimpleScore::of(-1))));
    assert!(!forager.add_move(1, InitScore::new(1, SimpleScore::of(0))));
    assert!(!forager.add_move(2, InitScore::new(1, SimpleScore::of(0))));

    assert_eq!(forager.picked().map(|(i, _)| i), Some(1));
    assert_eq!(forager.evaluated_count(), 3);
    assert!(!forager.is_quit_early());
}

#[test]
fn test_forager_first_feasible() {
    let mut forager = ConstructionForager::new(ConstructionHeuristicPickEarlyType::FirstFeasibleScore);
    forager.step_started(Some(InitScore::new(2, HardSoftScore::of(0, 0))));

    assert!(!forager.add_move(0, InitScore::new(1, HardSoftScore::of(-1, 0))));
    assert!(forager.add_move(1, InitScore::new(1, HardSoftScore::of(0, -5))));
    assert_eq!(forager.picked().map(|(i, _)| i), Some(1));
    assert!(forager.is_quit_early());
}

#[test]
fn test_forager_non_deteriorating_hard() {
    let mut forager = ConstructionForager::new(
        ConstructionHeuristicPickEarlyType::FirstFeasibleScoreOrNonDeterioratingHard,
    );
    forager.step_started(Some(InitScore::new(2, HardSoftScore::of(-2, -10))));

    assert!(!forager.add_move(0, InitScore::new(1, HardSoftScore::of(-3, 0))));
    // Hard level unchanged, soft worse: still picked.
    assert!(forager.add_move(1, InitScore::new(1, HardSoftScore::of(-2, -20))));
}

#[test]
fn test_forager_non_deteriorating_rejects_worse() {
    let mut forager = ConstructionForager::new(
        ConstructionHeuristicPickEarlyType::FirstNonDeterioratingScore,
    );
    forager.step_started(Some(InitScore::new(2, SimpleScore::of(0))));

    assert!(!forager.add_move(0, InitScore::new(1, SimpleScore::of(-1))));
    assert!(forager.add_move(1, InitScore::new(1, SimpleScore::of(0))));
    assert_eq!(forager.evaluated_count(), 2);
}
