use phaseforge::prelude::*;
use phaseforge::DeltaScoreBounder;
use phaseforge_test::choice::{
    choice_values, create_uninitialized_choice_director, get_choice, set_choice, ChoiceDirector,
};
use phaseforge_test::Choice;

#[test]
fn construction_then_branch_and_bound() {
    phaseforge::init_tracing();

    let variable = BasicVariable::new(0, "choice", get_choice, set_choice, choice_values);
    let construction = PhaseBuilder::construction_heuristic::<_, ChoiceDirector, _>(
        &ConstructionHeuristicConfig::default(),
        variable,
    )
    .unwrap();
    let exhaustive = PhaseBuilder::exhaustive_search::<_, ChoiceDirector, _, _>(
        &ExhaustiveSearchConfig::default(),
        variable,
        DeltaScoreBounder::new(SimpleScore::of(0), SimpleScore::of(-1)),
    )
    .unwrap();

    let config = SolverConfig::new().with_random_seed(42);
    let mut solver = Solver::from_config(&config, (construction, exhaustive)).unwrap();
    let best = solver
        .solve(create_uninitialized_choice_director(4))
        .unwrap();

    assert_eq!(best.choices(), vec![Some(Choice::A); 4]);
    assert_eq!(best.score(), Some(SimpleScore::of(0)));
}
