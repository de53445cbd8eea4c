//! Tests for the exhaustive search phase.

use std::sync::{Arc, Mutex};

use phaseforge_config::{EnvironmentMode, ExhaustiveSearchType, NodeExplorationType};
use phaseforge_core::{
    HardSoftScore, InitScore, InitializingScoreTrend, InitializingScoreTrendLevel,
    PhaseForgeError, SimpleScore,
};
use phaseforge_scoring::ScoreDirector;
use phaseforge_test::choice::{
    choice_values, create_choice_director, create_incremental_choice_director,
    create_uninitialized_choice_director, get_choice, set_choice, Choice, ChoiceSolution,
};
use phaseforge_test::route::{create_route_director, RouteSolution};
use phaseforge_test::task::{
    create_task_director, get_machine, get_slot, machine_values, set_machine, set_slot,
    slot_values, TaskDirector, TaskSolution,
};

use super::*;
use crate::heuristic::selector::{
    FromSolutionEntitySelector, FromSolutionValueSelector, SelectionCacheType,
    StaticValueSelector,
};
use crate::phase::Phase;
use crate::scope::SolverScope;
use crate::termination::StepCountTermination;

fn slots() -> FromSolutionEntitySelector<ChoiceSolution> {
    FromSolutionEntitySelector::new(0).with_cache_type(SelectionCacheType::Phase)
}

fn choices() -> FromSolutionValueSelector<ChoiceSolution, Choice> {
    FromSolutionValueSelector::new(choice_values)
}

fn only_down() -> TrendBasedScoreBounder {
    TrendBasedScoreBounder::new(InitializingScoreTrend::uniform(
        InitializingScoreTrendLevel::OnlyDown,
        1,
    ))
}

fn scope_for<D: ScoreDirector<ChoiceSolution>>(director: D) -> SolverScope<ChoiceSolution, D> {
    let mut scope = SolverScope::with_seed(director, 0);
    scope.start_solving();
    scope
}

fn recording_observer() -> (
    Arc<Mutex<Vec<ExhaustiveSearchStepInfo>>>,
    impl FnMut(&ExhaustiveSearchStepInfo) + Send + 'static,
) {
    let steps = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&steps);
    (steps, move |info: &ExhaustiveSearchStepInfo| {
        sink.lock().unwrap().push(*info);
    })
}

#[test]
fn test_brute_force_visits_every_leaf() {
    let mut scope = scope_for(create_uninitialized_choice_director(3));
    let mut phase = ExhaustiveSearchPhase::change(
        slots(),
        choices(),
        get_choice,
        set_choice,
        0,
        "choice",
        only_down(),
    )
    .unwrap()
    .with_exhaustive_search_type(ExhaustiveSearchType::BruteForce);

    phase.solve(&mut scope).unwrap();

    assert_eq!(phase.leaf_count(), 8);
    assert_eq!(phase.pruned_count(), 0);
    assert_eq!(phase.frontier_len(), 0);
    assert_eq!(
        scope.working_solution().choices(),
        vec![Some(Choice::A); 3]
    );
    assert_eq!(
        scope.best_score(),
        Some(InitScore::initialized(SimpleScore::of(0)))
    );
}

#[test]
fn test_brute_force_constructor_uses_original_order() {
    let recorder = crate::heuristic::selector::MimicRecorder::new("bf");
    let move_selector = crate::heuristic::selector::ChangeMoveSelector::new(
        crate::heuristic::selector::MimicReplayingEntitySelector::new(recorder.clone()),
        choices(),
        get_choice,
        set_choice,
        0,
        "choice",
    );
    let mut phase = ExhaustiveSearchPhase::brute_force(slots(), move_selector, recorder).unwrap();
    assert_eq!(phase.node_exploration_type(), NodeExplorationType::OriginalOrder);
    assert!(!phase.is_bounding_enabled());

    let mut scope = scope_for(create_uninitialized_choice_director(2));
    phase.solve(&mut scope).unwrap();
    assert_eq!(phase.leaf_count(), 4);
}

#[test]
fn test_bound_prunes_worse_branch() {
    let (steps, observer) = recording_observer();
    let mut scope = scope_for(create_uninitialized_choice_director(2));
    let mut phase = ExhaustiveSearchPhase::change(
        slots(),
        choices(),
        get_choice,
        set_choice,
        0,
        "choice",
        DeltaScoreBounder::new(SimpleScore::of(0), SimpleScore::of(-1)),
    )
    .unwrap()
    .with_step_observer(observer);

    phase.solve(&mut scope).unwrap();

    let steps = steps.lock().unwrap();
    assert_eq!(steps[0].depth, 0);
    assert_eq!(steps[0].frontier_len, 1);
    assert_eq!(steps[0].pruned_count, 1);
    assert_eq!(steps.len(), 2);
    assert_eq!(phase.leaf_count(), 2);
    assert_eq!(
        scope.working_solution().choices(),
        vec![Some(Choice::A); 2]
    );
}

#[test]
fn test_every_exploration_type_finds_optimum() {
    for exploration in [
        NodeExplorationType::DepthFirst,
        NodeExplorationType::BreadthFirst,
        NodeExplorationType::ScoreFirst,
        NodeExplorationType::OptimisticBoundFirst,
        NodeExplorationType::OriginalOrder,
    ] {
        let mut scope = scope_for(create_choice_director(&[None, Some(Choice::B), None]));
        let mut phase = ExhaustiveSearchPhase::change(
            slots(),
            choices(),
            get_choice,
            set_choice,
            0,
            "choice",
            only_down(),
        )
        .unwrap()
        .with_node_exploration_type(exploration)
        .unwrap();

        phase.solve(&mut scope).unwrap();

        assert_eq!(
            scope.working_solution().choices(),
            vec![Some(Choice::A), Some(Choice::B), Some(Choice::A)],
            "{exploration:?}"
        );
        assert_eq!(
            scope.best_score(),
            Some(InitScore::initialized(SimpleScore::of(-1))),
            "{exploration:?}"
        );
    }
}

#[test]
fn test_brute_force_rejects_other_exploration() {
    let phase = ExhaustiveSearchPhase::change(
        slots(),
        choices(),
        get_choice,
        set_choice,
        0,
        "choice",
        only_down(),
    )
    .unwrap()
    .with_exhaustive_search_type(ExhaustiveSearchType::BruteForce);

    let err = phase
        .with_node_exploration_type(NodeExplorationType::DepthFirst)
        .unwrap_err();
    assert!(matches!(err, PhaseForgeError::Config(_)));
}

#[test]
fn test_entity_selector_must_cache_per_phase() {
    let result = ExhaustiveSearchPhase::change(
        FromSolutionEntitySelector::<ChoiceSolution>::new(0)
            .with_cache_type(SelectionCacheType::Step),
        choices(),
        get_choice,
        set_choice,
        0,
        "choice",
        only_down(),
    );
    assert!(matches!(result, Err(PhaseForgeError::Config(_))));
}

fn no_visit(_: &RouteSolution, _: usize) -> Option<usize> {
    None
}

fn ignore_visit(_: &mut RouteSolution, _: usize, _: Option<usize>) {}

#[test]
fn test_list_variables_are_rejected() {
    let mut scope = SolverScope::with_seed(create_route_director(vec![0, 1], vec![vec![0, 1]]), 0);
    scope.start_solving();
    let mut phase = ExhaustiveSearchPhase::change(
        FromSolutionEntitySelector::new(0).with_cache_type(SelectionCacheType::Phase),
        StaticValueSelector::new(vec![0usize]),
        no_visit,
        ignore_visit,
        0,
        "visits",
        TrendBasedScoreBounder::new(InitializingScoreTrend::new(Vec::new())),
    )
    .unwrap();

    let err = phase.solve(&mut scope).unwrap_err();
    assert!(matches!(err, PhaseForgeError::Config(_)));
}

#[test]
fn test_termination_leaves_frontier() {
    let mut scope = scope_for(create_uninitialized_choice_director(3));
    let mut phase = ExhaustiveSearchPhase::change(
        slots(),
        choices(),
        get_choice,
        set_choice,
        0,
        "choice",
        only_down(),
    )
    .unwrap()
    .with_exhaustive_search_type(ExhaustiveSearchType::BruteForce)
    .with_termination(StepCountTermination::new(1));

    phase.solve(&mut scope).unwrap();

    assert_eq!(scope.total_step_count(), 1);
    assert_eq!(phase.leaf_count(), 0);
    assert_eq!(phase.frontier_len(), 2);
}

#[test]
fn test_initialized_solution_is_a_single_leaf_layer() {
    let mut scope = scope_for(create_choice_director(&[Some(Choice::B)]));
    let mut phase = ExhaustiveSearchPhase::change(
        slots(),
        choices(),
        get_choice,
        set_choice,
        0,
        "choice",
        only_down(),
    )
    .unwrap();

    phase.solve(&mut scope).unwrap();

    assert_eq!(scope.total_step_count(), 0);
    assert_eq!(phase.leaf_count(), 0);
    assert_eq!(scope.working_solution().choices(), vec![Some(Choice::B)]);
    assert_eq!(
        scope.best_score(),
        Some(InitScore::initialized(SimpleScore::of(-1)))
    );
}

#[test]
fn test_full_assert_with_incremental_director() {
    let director = create_incremental_choice_director(&[None, None, None]);
    let mut scope = SolverScope::with_seed(director, 3)
        .with_environment_mode(EnvironmentMode::FullAssert);
    scope.start_solving();
    let mut phase = ExhaustiveSearchPhase::change(
        slots(),
        choices(),
        get_choice,
        set_choice,
        0,
        "choice",
        DeltaScoreBounder::new(SimpleScore::of(0), SimpleScore::of(-1)),
    )
    .unwrap()
    .with_node_exploration_type(NodeExplorationType::BreadthFirst)
    .unwrap();

    phase.solve(&mut scope).unwrap();

    assert_eq!(
        scope.working_solution().choices(),
        vec![Some(Choice::A); 3]
    );
    assert!(phase.pruned_count() > 0);
}

fn task_scope(solution: TaskSolution) -> SolverScope<TaskSolution, TaskDirector> {
    let mut scope = SolverScope::with_seed(create_task_director(solution), 0);
    scope.start_solving();
    scope
}

fn tasks() -> FromSolutionEntitySelector<TaskSolution> {
    FromSolutionEntitySelector::new(0).with_cache_type(SelectionCacheType::Phase)
}

#[test]
fn test_exact_bounder_still_reaches_a_leaf() {
    // Distinct slots: no machine choice can clash, so the score is fixed
    // and the bounds are exact.
    let mut solution = TaskSolution::with_durations(&[2, 3], 2, 2);
    solution.tasks[0].slot = Some(0);
    solution.tasks[1].slot = Some(1);
    let mut scope = task_scope(solution);
    let mut phase = ExhaustiveSearchPhase::change(
        tasks(),
        FromSolutionValueSelector::new(machine_values),
        get_machine,
        set_machine,
        0,
        "machine",
        DeltaScoreBounder::new(HardSoftScore::of(0, 0), HardSoftScore::of(0, 0)),
    )
    .unwrap();

    phase.solve(&mut scope).unwrap();

    assert!(phase.leaf_count() >= 1);
    let solution = scope.working_solution();
    assert!(get_machine(solution, 0).is_some());
    assert!(get_machine(solution, 1).is_some());
    assert_eq!(
        scope.best_score(),
        Some(InitScore::initialized(HardSoftScore::of(0, -3)))
    );
}

#[test]
fn test_equal_bound_sibling_is_still_pruned() {
    let (steps, observer) = recording_observer();
    let mut scope = scope_for(create_uninitialized_choice_director(3));
    let mut phase = ExhaustiveSearchPhase::change(
        slots(),
        choices(),
        get_choice,
        set_choice,
        0,
        "choice",
        DeltaScoreBounder::new(SimpleScore::of(0), SimpleScore::of(0)),
    )
    .unwrap()
    .with_step_observer(observer);

    phase.solve(&mut scope).unwrap();

    // Only the all-A path survives: every B child is bounded by its A sibling.
    let steps = steps.lock().unwrap();
    assert_eq!(steps.len(), 3);
    assert!(steps.iter().all(|step| step.frontier_len <= 1));
    assert_eq!(phase.leaf_count(), 2);
    assert_eq!(
        scope.working_solution().choices(),
        vec![Some(Choice::A); 3]
    );
}

#[test]
fn test_layers_skip_entities_with_the_variable_assigned() {
    // Task 0 keeps its slot. Only its machine and task 1 are open.
    let mut solution = TaskSolution::with_durations(&[3, 2], 1, 2);
    solution.tasks[0].slot = Some(1);
    let mut scope = task_scope(solution);
    let mut phase = ExhaustiveSearchPhase::change(
        tasks(),
        FromSolutionValueSelector::new(slot_values),
        get_slot,
        set_slot,
        0,
        "slot",
        TrendBasedScoreBounder::new(InitializingScoreTrend::uniform(
            InitializingScoreTrendLevel::OnlyDown,
            2,
        )),
    )
    .unwrap();

    phase.solve(&mut scope).unwrap();

    let solution = scope.working_solution();
    assert_eq!(get_slot(solution, 0), Some(1));
    assert_eq!(get_slot(solution, 1), Some(0));
    assert_eq!(get_machine(solution, 0), None);
    assert_eq!(phase.leaf_count(), 2);
}
