//! Tests for termination conditions.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use phaseforge_config::TerminationConfig;
use phaseforge_core::{InitScore, PhaseForgeError, SimpleScore};
use phaseforge_scoring::ScoreDirector;
use phaseforge_test::nqueens::{
    create_nqueens_director, create_uninitialized_nqueens_director, NQueensDirector,
};
use phaseforge_test::NQueensSolution;

use super::*;
use crate::scope::{PhaseScope, SolverScope};

fn create_scope() -> SolverScope<NQueensSolution, NQueensDirector> {
    let mut scope = SolverScope::with_seed(create_nqueens_director(&[0, 2, 1]), 0);
    scope.start_solving();
    scope
}

fn create_scope_with_best(score: InitScore<SimpleScore>) -> SolverScope<NQueensSolution, NQueensDirector> {
    let mut scope = create_scope();
    let solution = scope.score_director().clone_working_solution();
    scope.set_best_solution(solution, score, 0);
    scope
}

#[test]
fn test_step_count_termination() {
    let mut scope = create_scope();
    let term = StepCountTermination::new(3);

    assert!(!term.is_solver_terminated(&scope));
    scope.increment_step_count();
    scope.increment_step_count();
    assert!(!term.is_solver_terminated(&scope));
    scope.increment_step_count();
    assert!(term.is_solver_terminated(&scope));
}

#[test]
fn test_step_count_termination_counts_phase_steps_in_phase() {
    let mut scope = create_scope();
    scope.increment_step_count();
    scope.increment_step_count();
    let term = StepCountTermination::new(2);

    let mut phase = PhaseScope::new(&mut scope, 1);
    assert!(!term.is_phase_terminated(&phase));
    phase.increment_step_count();
    phase.increment_step_count();
    assert!(term.is_phase_terminated(&phase));
}

#[test]
fn test_time_termination() {
    let scope = create_scope();

    assert!(!Termination::<_, NQueensDirector>::is_solver_terminated(
        &TimeTermination::seconds(3600),
        &scope
    ));
    assert!(Termination::<_, NQueensDirector>::is_solver_terminated(
        &TimeTermination::new(Duration::ZERO),
        &scope
    ));
}

#[test]
fn test_best_score_termination() {
    let term = BestScoreTermination::new(SimpleScore::of(0));

    assert!(!term.is_solver_terminated(&create_scope()));
    assert!(!term.is_solver_terminated(&create_scope_with_best(InitScore::initialized(
        SimpleScore::of(-5)
    ))));
    assert!(term.is_solver_terminated(&create_scope_with_best(InitScore::initialized(
        SimpleScore::of(0)
    ))));
    assert!(term.is_solver_terminated(&create_scope_with_best(InitScore::initialized(
        SimpleScore::of(5)
    ))));
}

#[test]
fn test_best_score_termination_requires_initialized_solution() {
    let term = BestScoreTermination::new(SimpleScore::of(0));
    let scope = create_scope_with_best(InitScore::new(1, SimpleScore::of(0)));

    assert!(!term.is_solver_terminated(&scope));
}

#[test]
fn test_best_score_feasible_termination() {
    let term = BestScoreFeasibleTermination::new();

    assert!(Termination::<_, NQueensDirector>::is_solver_terminated(
        &term,
        &create_scope_with_best(InitScore::initialized(SimpleScore::of(0)))
    ));
    assert!(!Termination::<_, NQueensDirector>::is_solver_terminated(
        &term,
        &create_scope_with_best(InitScore::initialized(SimpleScore::of(-5)))
    ));
    assert!(!Termination::<_, NQueensDirector>::is_solver_terminated(
        &term,
        &create_scope_with_best(InitScore::new(2, SimpleScore::of(0)))
    ));
}

#[test]
fn test_unimproved_step_count_termination() {
    let mut scope = create_scope_with_best(InitScore::initialized(SimpleScore::of(-3)));
    let term = UnimprovedStepCountTermination::new(2);

    scope.increment_step_count();
    assert!(!term.is_solver_terminated(&scope));

    let solution = scope.score_director().clone_working_solution();
    scope.set_best_solution(solution, InitScore::initialized(SimpleScore::of(-1)), 1);
    scope.increment_step_count();
    assert!(!term.is_solver_terminated(&scope));
    scope.increment_step_count();
    assert!(term.is_solver_terminated(&scope));
}

#[test]
fn test_score_calculation_count_termination() {
    let mut scope = SolverScope::with_seed(create_uninitialized_nqueens_director(3), 0);
    let term = ScoreCalculationCountTermination::new(1);

    assert!(!term.is_solver_terminated(&scope));
    scope.calculate_score();
    assert!(term.is_solver_terminated(&scope));
}

#[test]
fn test_external_termination() {
    let scope = create_scope();
    let flag = Arc::new(AtomicBool::new(false));
    let term = ExternalTermination::new(Arc::clone(&flag));

    assert!(!Termination::<_, NQueensDirector>::is_solver_terminated(&term, &scope));
    flag.store(true, Ordering::SeqCst);
    assert!(Termination::<_, NQueensDirector>::is_solver_terminated(&term, &scope));
}

#[test]
fn test_or_termination() {
    let mut scope = create_scope();
    let term = OrTermination::new((StepCountTermination::new(5), StepCountTermination::new(1)));

    assert!(!term.is_solver_terminated(&scope));
    scope.increment_step_count();
    assert!(term.is_solver_terminated(&scope));
}

#[test]
fn test_and_termination() {
    let mut scope = create_scope();
    let term = AndTermination::new((StepCountTermination::new(2), StepCountTermination::new(1)));

    scope.increment_step_count();
    assert!(!term.is_solver_terminated(&scope));
    scope.increment_step_count();
    assert!(term.is_solver_terminated(&scope));
}

#[test]
fn test_empty_vec_composites_never_terminate() {
    let scope = create_scope();
    let or: OrTermination<Vec<BoxedTermination<NQueensSolution, NQueensDirector>>> =
        OrTermination::new(Vec::new());
    let and: AndTermination<Vec<BoxedTermination<NQueensSolution, NQueensDirector>>> =
        AndTermination::new(Vec::new());

    assert!(!or.is_solver_terminated(&scope));
    assert!(!and.is_solver_terminated(&scope));
}

#[test]
fn test_no_termination() {
    let mut scope = create_scope();
    for _ in 0..100 {
        scope.increment_step_count();
    }
    let phase = PhaseScope::new(&mut scope, 0);

    assert!(!Termination::<_, NQueensDirector>::is_phase_terminated(&NoTermination, &phase));
}

#[test]
fn test_build_termination_from_config() {
    let config = TerminationConfig::default()
        .with_step_count_limit(2)
        .with_best_score_limit("0");
    let term = build_termination::<NQueensSolution, NQueensDirector>(&config)
        .unwrap()
        .unwrap();
    assert_eq!(term.0.len(), 2);

    let mut scope = create_scope();
    assert!(!term.is_solver_terminated(&scope));
    scope.increment_step_count();
    scope.increment_step_count();
    assert!(term.is_solver_terminated(&scope));
}

#[test]
fn test_build_termination_empty_config() {
    let term =
        build_termination::<NQueensSolution, NQueensDirector>(&TerminationConfig::default())
            .unwrap();
    assert!(term.is_none());
}

#[test]
fn test_build_termination_rejects_bad_score_limit() {
    let config = TerminationConfig::default().with_best_score_limit("0hard/0soft");
    let err = build_termination::<NQueensSolution, NQueensDirector>(&config).unwrap_err();

    assert!(matches!(err, PhaseForgeError::Config(_)));
}
