//! Tests for the score director.
//!
//! Directors are built from `crate` types here; only the fixture solution
//! types, accessors and listeners come from `phaseforge-test`.

use phaseforge_core::{FactHandle, InitScore, PhaseForgeError, SimpleScore};
use phaseforge_test::family::{
    self, create_family_descriptor, FamilySolution, OverloadListener, Parent, ParentTotalListener,
    CHILD_DESCRIPTOR, PARENT_DESCRIPTOR,
};
use phaseforge_test::nqueens::{calculate_conflicts, create_nqueens_descriptor, NQueensSolution};
use phaseforge_test::task::{calculate_task_score, create_task_descriptor, Task, TaskSolution};

use crate::calculator::{EasyScoreCalculator, IncrementalUniCalculator, ScoreCalculator};
use crate::director::{ListenerRegistration, ScoreDirector, ScoreDirectorFactory, TypedScoreDirector};

type NQueensCalculator = EasyScoreCalculator<fn(&NQueensSolution) -> SimpleScore>;

fn nqueens_director(
    solution: NQueensSolution,
) -> TypedScoreDirector<NQueensSolution, NQueensCalculator> {
    TypedScoreDirector::new(
        solution,
        create_nqueens_descriptor(),
        EasyScoreCalculator::new(calculate_conflicts as fn(&NQueensSolution) -> SimpleScore),
    )
}

fn set_row<D: ScoreDirector<NQueensSolution>>(director: &mut D, queen: usize, row: Option<i64>) {
    director.before_variable_changed(0, queen, "row").unwrap();
    director.working_solution_mut().queens[queen].row = row;
    director.after_variable_changed(0, queen, "row").unwrap();
}

fn is_over_capacity(parent: &Parent) -> bool {
    parent.total > parent.capacity
}

fn excess(parent: &Parent) -> SimpleScore {
    SimpleScore::of(parent.total - parent.capacity)
}

type FamilyCalculator = IncrementalUniCalculator<
    FamilySolution,
    Parent,
    fn(&FamilySolution) -> &[Parent],
    fn(&Parent) -> bool,
    fn(&Parent) -> SimpleScore,
    SimpleScore,
>;

fn family_director(solution: FamilySolution) -> TypedScoreDirector<FamilySolution, FamilyCalculator> {
    let calculator: FamilyCalculator = IncrementalUniCalculator::penalize(
        "Parent capacity",
        PARENT_DESCRIPTOR,
        family::parents as fn(&FamilySolution) -> &[Parent],
        is_over_capacity as fn(&Parent) -> bool,
        excess as fn(&Parent) -> SimpleScore,
    );
    ScoreDirectorFactory::new(create_family_descriptor(), calculator)
        .with_listeners(|| {
            vec![
                ListenerRegistration::new(CHILD_DESCRIPTOR, "value", ParentTotalListener::default()),
                ListenerRegistration::new(PARENT_DESCRIPTOR, "total", OverloadListener),
            ]
        })
        .build_score_director(solution)
}

fn set_child<D: ScoreDirector<FamilySolution>>(director: &mut D, child: usize, value: Option<i64>) {
    director
        .before_variable_changed(CHILD_DESCRIPTOR, child, "value")
        .unwrap();
    director.working_solution_mut().children[child].value = value;
    director
        .after_variable_changed(CHILD_DESCRIPTOR, child, "value")
        .unwrap();
}

// Keeps the score computed at reset and ignores every change.
#[derive(Clone, Debug, Default)]
struct StaleCalculator {
    score: SimpleScore,
}

impl ScoreCalculator<NQueensSolution> for StaleCalculator {
    fn reset_working_memory(&mut self, solution: &NQueensSolution) {
        self.score = calculate_conflicts(solution);
    }

    fn insert(&mut self, _solution: &NQueensSolution, _handle: FactHandle) {}

    fn update(&mut self, _solution: &NQueensSolution, _handle: FactHandle, _variable_name: &str) {}

    fn delete(&mut self, _solution: &NQueensSolution, _handle: FactHandle) {}

    fn calculate_score(&mut self, _solution: &NQueensSolution) -> SimpleScore {
        self.score
    }
}

#[test]
fn test_initial_score_and_cache() {
    let mut director = nqueens_director(NQueensSolution::with_rows(&[0, 1, 2, 3]));

    assert_eq!(director.calculate_score(), SimpleScore::of(-6));
    assert_eq!(director.calculate_score(), SimpleScore::of(-6));
    assert_eq!(director.calculation_count(), 1);
    assert_eq!(director.working_solution().score, Some(SimpleScore::of(-6)));
}

#[test]
fn test_debug_names_the_solution_type() {
    let mut director = nqueens_director(NQueensSolution::with_rows(&[0, 1, 2, 3]));
    director.calculate_score();

    let text = format!("{:?}", director);
    assert!(text.starts_with("TypedScoreDirector"));
    assert!(text.contains("NQueensSolution"));
    assert!(text.contains("calculation_count: 1"));
}

#[test]
fn test_variable_change_invalidates_cache() {
    let mut director = nqueens_director(NQueensSolution::with_rows(&[0, 1, 2, 3]));
    director.calculate_score();

    set_row(&mut director, 1, Some(3));

    assert_eq!(director.calculate_score(), SimpleScore::of(-5));
    assert_eq!(director.calculation_count(), 2);
}

#[test]
fn test_set_score_is_served_from_cache() {
    let mut director = nqueens_director(NQueensSolution::with_rows(&[1, 3, 0, 2]));
    director.set_score(SimpleScore::of(-42));

    assert_eq!(director.calculate_score(), SimpleScore::of(-42));
    assert_eq!(director.calculation_count(), 0);
}

#[test]
fn test_uninitialized_count_tracking() {
    let mut director =
        nqueens_director(NQueensSolution::with_optional_rows(&[Some(0), None, None]));
    assert_eq!(director.uninitialized_variable_count(), 2);

    set_row(&mut director, 1, Some(2));
    assert_eq!(director.uninitialized_variable_count(), 1);

    set_row(&mut director, 0, None);
    assert_eq!(director.uninitialized_variable_count(), 2);

    set_row(&mut director, 0, Some(1));
    set_row(&mut director, 2, Some(2));
    let init_score = director.calculate_init_score();
    assert_eq!(init_score.uninitialized_count(), 0);
    assert!(init_score.is_solution_initialized());
}

#[test]
fn test_unregistered_entity_is_rejected() {
    let mut director = nqueens_director(NQueensSolution::with_rows(&[0, 1]));

    let err = director.before_variable_changed(0, 5, "row").unwrap_err();
    assert!(matches!(
        err,
        PhaseForgeError::UnregisteredFact {
            handle: FactHandle::Entity {
                descriptor_index: 0,
                entity_index: 5
            },
            ..
        }
    ));

    let err = director.before_variable_changed(3, 0, "row").unwrap_err();
    assert!(matches!(err, PhaseForgeError::UnregisteredFact { .. }));
}

#[test]
fn test_after_without_before_is_invalid() {
    let mut director = nqueens_director(NQueensSolution::with_rows(&[0, 1]));

    let err = director.after_variable_changed(0, 1, "row").unwrap_err();
    assert!(matches!(err, PhaseForgeError::InvalidState(_)));
}

#[test]
fn test_entity_added_and_duplicate() {
    let mut director = nqueens_director(NQueensSolution::with_rows(&[0, 2]));
    director.calculate_score();

    director
        .working_solution_mut()
        .queens
        .push(phaseforge_test::Queen::unassigned(2, 2));
    director.after_entity_added(0, 2).unwrap();

    assert_eq!(director.registry().entity_count(0), Some(3));
    assert_eq!(director.uninitialized_variable_count(), 1);

    let err = director.after_entity_added(0, 2).unwrap_err();
    assert!(matches!(err, PhaseForgeError::DuplicateFact { .. }));

    let err = director.after_entity_added(0, 7).unwrap_err();
    assert!(matches!(err, PhaseForgeError::InvalidState(_)));
}

#[test]
fn test_entity_removed_from_middle_rebuilds_state() {
    let mut director = nqueens_director(NQueensSolution::with_rows(&[0, 1, 2, 3]));
    assert_eq!(director.calculate_score(), SimpleScore::of(-6));

    director.before_entity_removed(0, 1).unwrap();
    director.working_solution_mut().queens.remove(1);
    director.after_entity_removed(0, 1).unwrap();

    assert_eq!(director.registry().entity_count(0), Some(3));
    assert_eq!(director.calculate_score(), SimpleScore::of(-3));
    assert!(director.before_variable_changed(0, 3, "row").is_err());
}

#[test]
fn test_problem_fact_lifecycle() {
    let solution = TaskSolution::new(vec![Task::new(0, 2).assigned(1, 0)], 2, 2);
    let mut director = TypedScoreDirector::new(
        solution,
        create_task_descriptor(),
        EasyScoreCalculator::new(calculate_task_score),
    );
    assert_eq!(director.registry().fact_count(0), Some(2));

    director.working_solution_mut().machines.push(2);
    director.after_problem_fact_added(0, 2).unwrap();
    assert_eq!(director.registry().fact_count(0), Some(3));

    let handle = FactHandle::problem_fact(0, 1);
    director.before_problem_property_changed(handle).unwrap();
    director.after_problem_property_changed(handle).unwrap();

    director.before_problem_fact_removed(0, 0).unwrap();
    director.working_solution_mut().machines.remove(0);
    director.after_problem_fact_removed(0, 0).unwrap();
    assert_eq!(director.registry().fact_count(0), Some(2));

    let err = director
        .before_problem_property_changed(FactHandle::problem_fact(0, 10))
        .unwrap_err();
    assert!(matches!(err, PhaseForgeError::UnregisteredFact { .. }));

    let err = director.after_problem_fact_added(0, 1).unwrap_err();
    assert!(matches!(err, PhaseForgeError::DuplicateFact { .. }));
}

#[test]
fn test_shadow_variables_cascade() {
    let solution = FamilySolution::new(&[2, 5], &[0, 0, 1]);
    let mut director = family_director(solution);
    assert_eq!(director.calculate_score(), SimpleScore::of(0));
    assert_eq!(director.uninitialized_variable_count(), 3);

    set_child(&mut director, 0, Some(2));
    assert_eq!(director.working_solution().totals(), vec![2, 0]);
    assert!(!director.working_solution().parents[0].overloaded);
    assert_eq!(director.calculate_score(), SimpleScore::of(0));

    set_child(&mut director, 1, Some(3));
    assert_eq!(director.working_solution().totals(), vec![5, 0]);
    assert!(director.working_solution().parents[0].overloaded);
    assert_eq!(director.calculate_score(), SimpleScore::of(-3));
    assert_eq!(director.uninitialized_variable_count(), 1);

    set_child(&mut director, 1, None);
    assert_eq!(director.working_solution().totals(), vec![2, 0]);
    assert!(!director.working_solution().parents[0].overloaded);
    assert_eq!(director.calculate_score(), SimpleScore::of(0));
}

#[test]
fn test_shadow_score_matches_from_scratch() {
    let solution = FamilySolution::new(&[3, 1], &[0, 1, 1, 0]);
    let mut director = family_director(solution);

    for (child, value) in [(0, 2), (1, 3), (2, 1), (3, 3), (1, 1), (0, 1)] {
        set_child(&mut director, child, Some(value));
        director
            .assert_working_score_from_scratch("after child change")
            .unwrap();
        assert_eq!(
            director.calculate_score(),
            family::calculate_excess_from_values(director.working_solution())
        );
    }
}

#[test]
fn test_entity_added_triggers_listeners() {
    let solution = FamilySolution::new(&[2, 5], &[0]).with_values(&[Some(1)]);
    let mut director = family_director(solution);
    assert_eq!(director.working_solution().totals(), vec![1, 0]);

    director
        .working_solution_mut()
        .children
        .push(family::Child {
            parent: 1,
            value: Some(3),
        });
    director.after_entity_added(CHILD_DESCRIPTOR, 1).unwrap();

    assert_eq!(director.working_solution().totals(), vec![1, 3]);
    director.assert_working_score_from_scratch("entity added").unwrap();
}

#[test]
fn test_score_corruption_detected() {
    let mut director = TypedScoreDirector::new(
        NQueensSolution::with_rows(&[1, 3, 0, 2]),
        create_nqueens_descriptor(),
        StaleCalculator::default(),
    );
    director.assert_working_score_from_scratch("fresh").unwrap();

    set_row(&mut director, 0, Some(3));

    let err = director
        .assert_working_score_from_scratch("after move")
        .unwrap_err();
    assert!(err.is_corruption());
    match err {
        PhaseForgeError::ScoreCorruption {
            expected,
            actual,
            context,
        } => {
            assert_eq!(expected, "0");
            assert_ne!(actual, "0");
            assert_eq!(context, "after move");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_undo_score_assertion() {
    let mut director = nqueens_director(NQueensSolution::with_rows(&[0, 1, 2, 3]));
    let before = director.calculate_init_score();

    set_row(&mut director, 2, Some(0));
    set_row(&mut director, 2, Some(2));
    director.assert_expected_undo_score(before, "undo").unwrap();

    let err = director
        .assert_expected_undo_score(InitScore::initialized(SimpleScore::of(5)), "undo")
        .unwrap_err();
    assert!(matches!(err, PhaseForgeError::UndoMoveCorruption { .. }));
}

#[test]
fn test_child_director_is_independent() {
    let mut director = nqueens_director(NQueensSolution::with_rows(&[0, 1, 2, 3]));
    let mut child = director.create_child_director();

    set_row(&mut child, 0, Some(1));

    assert_eq!(director.working_solution().queens[0].row, Some(0));
    assert_eq!(director.calculate_score(), SimpleScore::of(-6));
    assert_ne!(child.calculate_score(), SimpleScore::of(-6));
}

#[test]
fn test_set_working_solution_resets() {
    let mut director = nqueens_director(NQueensSolution::uninitialized(3));
    assert_eq!(director.uninitialized_variable_count(), 3);

    director.set_working_solution(NQueensSolution::with_rows(&[1, 3, 0, 2]));

    assert_eq!(director.uninitialized_variable_count(), 0);
    assert_eq!(director.registry().entity_count(0), Some(4));
    assert_eq!(director.calculate_score(), SimpleScore::of(0));
}

#[test]
fn test_into_working_solution() {
    let mut director = nqueens_director(NQueensSolution::with_rows(&[1, 3, 0, 2]));
    director.calculate_score();
    let solution = director.into_working_solution();
    assert_eq!(solution.score, Some(SimpleScore::of(0)));
}
